//! Translation of command-line parser failures
//!
//! clap reports every parse failure as free text. The patterns below pick
//! the kind and its arguments out of that text; anything they miss becomes
//! `PARSER_UNKNOWN`.

use crate::domain::{ErrorKind, PatternError, TranslationSet};

/// Patterns for clap's rendered errors, most specific first.
pub fn parser_patterns() -> Result<TranslationSet, PatternError> {
    TranslationSet::from_specs(&[
        (
            ErrorKind::ParserPermissionDenied,
            r"(?s)error: invalid value '(?<file>[^']*)' for '(?<argument>[^']*)': insufficient permissions to read file.*",
            &["file", "argument"],
        ),
        (
            ErrorKind::ParserTooFewArguments,
            r"(?s)error: a value is required for '(?<arguments>[^']*)' but none was supplied.*",
            &["arguments"],
        ),
        (
            ErrorKind::ParserInvalidChoice,
            r"(?s)error: invalid value '(?<choice>[^']*)' for '(?<argument>[^']*)'\n\s*\[possible values: (?<validChoices>[^\]]*)\].*",
            &["choice", "argument", "validChoices"],
        ),
        (
            ErrorKind::ParserInvalidValue,
            r"(?s)error: invalid value '(?<value>[^']*)' for '(?<argument>[^']*)': (?<reason>[^\n]*).*",
            &["value", "argument", "reason"],
        ),
        (
            ErrorKind::ParserUnrecognizedArgument,
            r"(?s)error: unexpected (?:argument|value) '(?<argument>[^']*)'.*",
            &["argument"],
        ),
        (
            ErrorKind::ParserUnrecognizedCommand,
            r"(?s)error: unrecognized subcommand '(?<command>[^']*)'.*",
            &["command"],
        ),
        (
            ErrorKind::ParserMissingCommand,
            r"(?s)error: '(?<command>[^']*)' requires a subcommand but one was not provided\n\s*\[subcommands: (?<validChoices>[^\]]*)\].*",
            &["command", "validChoices"],
        ),
        (
            ErrorKind::ParserTooFewArguments,
            r"(?s)error: the following required arguments were not provided:\n\s*(?<arguments>[^\n]*).*",
            &["arguments"],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::operations::PERMISSION_REASON;
    use crate::application::Registry;
    use crate::cli::args::build_command;
    use clap::{Arg, Command};
    use rstest::rstest;
    use std::path::PathBuf;

    /// Rendered clap error for `argv` against the real command line.
    fn clap_message(argv: &[&str]) -> String {
        let registry = Registry::new().unwrap();
        build_command(registry.tree())
            .try_get_matches_from(argv)
            .unwrap_err()
            .to_string()
    }

    #[test]
    fn given_patterns_when_compiling_then_every_group_exists() {
        let patterns = parser_patterns().unwrap();
        assert_eq!(patterns.patterns().len(), 8);
    }

    #[rstest]
    #[case(&["pdfops", "get", "version", "a.pdf", "--format", "xml"], ErrorKind::ParserInvalidChoice)]
    #[case(&["pdfops", "get", "version", "a.pdf", "--bogus"], ErrorKind::ParserUnrecognizedArgument)]
    #[case(&["pdfops", "get", "version", "a.pdf", "extra"], ErrorKind::ParserUnrecognizedArgument)]
    #[case(&["pdfops", "delete"], ErrorKind::ParserUnrecognizedCommand)]
    #[case(&["pdfops"], ErrorKind::ParserMissingCommand)]
    #[case(&["pdfops", "get"], ErrorKind::ParserMissingCommand)]
    #[case(&["pdfops", "get", "version"], ErrorKind::ParserTooFewArguments)]
    #[case(&["pdfops", "set", "version", "a.pdf"], ErrorKind::ParserTooFewArguments)]
    #[case(&["pdfops", "set", "version", "a.pdf", "1.7", "-o"], ErrorKind::ParserTooFewArguments)]
    fn given_real_clap_error_when_translating_then_maps_to_parser_kind(
        #[case] argv: &[&str],
        #[case] expected: ErrorKind,
    ) {
        let message = clap_message(argv);

        let failure = parser_patterns()
            .unwrap()
            .translate(&message, ErrorKind::ParserUnknown);

        assert_eq!(failure.kind(), expected, "message was: {message}");
    }

    #[test]
    fn given_invalid_format_when_translating_then_binds_choice_and_valid_choices() {
        // Arrange
        let message = clap_message(&["pdfops", "get", "version", "a.pdf", "--format", "xml"]);

        // Act
        let failure = parser_patterns()
            .unwrap()
            .translate(&message, ErrorKind::ParserUnknown);

        // Assert
        let args = failure.arguments();
        assert_eq!(args.get("choice"), Some("xml"));
        assert_eq!(args.get("validChoices"), Some("text, json"));
        assert!(args.get("argument").unwrap().contains("--format"));
        assert!(failure.cause().is_none());
    }

    #[test]
    fn given_missing_subcommand_when_translating_then_binds_command_name() {
        let message = clap_message(&["pdfops", "set"]);

        let failure = parser_patterns()
            .unwrap()
            .translate(&message, ErrorKind::ParserUnknown);

        assert_eq!(failure.arguments().get("command"), Some("pdfops set"));
        assert!(failure
            .arguments()
            .get("validChoices")
            .unwrap()
            .contains("version"));
    }

    #[test]
    fn given_unreadable_input_when_translating_then_permission_denied() {
        let message = Command::new("tool")
            .arg(
                Arg::new("input")
                    .value_name("INPUT")
                    .required(true)
                    .value_parser(|_: &str| Err::<PathBuf, String>(PERMISSION_REASON.into())),
            )
            .try_get_matches_from(["tool", "secret.pdf"])
            .unwrap_err()
            .to_string();

        let failure = parser_patterns()
            .unwrap()
            .translate(&message, ErrorKind::ParserUnknown);

        assert_eq!(failure.kind(), ErrorKind::ParserPermissionDenied);
        assert_eq!(failure.arguments().get("file"), Some("secret.pdf"));
        assert_eq!(failure.arguments().get("argument"), Some("<INPUT>"));
    }

    #[test]
    fn given_other_validation_failure_when_translating_then_invalid_value_with_reason() {
        let message = Command::new("tool")
            .arg(Arg::new("count").value_parser(clap::value_parser!(u8)))
            .try_get_matches_from(["tool", "many"])
            .unwrap_err()
            .to_string();

        let failure = parser_patterns()
            .unwrap()
            .translate(&message, ErrorKind::ParserUnknown);

        assert_eq!(failure.kind(), ErrorKind::ParserInvalidValue);
        assert_eq!(failure.arguments().get("value"), Some("many"));
        assert!(!failure.arguments().get("reason").unwrap().is_empty());
    }

    #[test]
    fn given_unmatched_message_when_translating_then_parser_unknown_with_opaque_cause() {
        let failure = parser_patterns()
            .unwrap()
            .translate("something odd happened", ErrorKind::ParserUnknown);

        assert_eq!(failure.kind(), ErrorKind::ParserUnknown);
        assert_eq!(failure.cause().unwrap().to_string(), "something odd happened");
    }
}
