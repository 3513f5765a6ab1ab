//! Translation of free-text error messages into classified failures
//!
//! Libraries such as the argument parser report failures only as text. A
//! [`MessagePattern`] recognizes one known message shape and rebuilds the
//! failure's arguments from named capture groups. A [`TranslationSet`] tries
//! its patterns in order, so the most specific pattern must come first.

use regex::Regex;
use thiserror::Error;
use tracing::trace;

use crate::domain::failure::{ClassifiedFailure, OpaqueError};
use crate::domain::ErrorKind;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid pattern for {kind}: {source}")]
    InvalidRegex {
        kind: ErrorKind,
        #[source]
        source: regex::Error,
    },

    #[error("pattern for {kind} has no capture group named '{group}'")]
    UnknownGroup { kind: ErrorKind, group: String },
}

/// One known message shape mapped to an [`ErrorKind`].
#[derive(Debug, Clone)]
pub struct MessagePattern {
    kind: ErrorKind,
    regex: Regex,
    groups: Vec<String>,
}

impl MessagePattern {
    /// Compile `pattern`, which must match a message end to end.
    ///
    /// Every entry of `groups` must name a capture group of `pattern`.
    pub fn new(kind: ErrorKind, pattern: &str, groups: &[&str]) -> Result<Self, PatternError> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|source| PatternError::InvalidRegex { kind, source })?;

        for group in groups {
            if !regex.capture_names().flatten().any(|name| name == *group) {
                return Err(PatternError::UnknownGroup {
                    kind,
                    group: (*group).to_string(),
                });
            }
        }

        Ok(Self {
            kind,
            regex,
            groups: groups.iter().map(|g| (*g).to_string()).collect(),
        })
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Classify `message` if it has this pattern's shape.
    pub fn try_translate(&self, message: &str) -> Option<ClassifiedFailure> {
        let captures = self.regex.captures(message)?;
        let bindings = self.groups.iter().filter_map(|group| {
            captures
                .name(group)
                .map(|matched| (group.as_str(), matched.as_str()))
        });
        trace!(kind = %self.kind, "message matched pattern");
        Some(ClassifiedFailure::with_arguments(self.kind, bindings))
    }
}

/// Ordered patterns for one message source; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct TranslationSet {
    patterns: Vec<MessagePattern>,
}

impl TranslationSet {
    pub fn new(patterns: Vec<MessagePattern>) -> Self {
        Self { patterns }
    }

    /// Build a set from `(kind, regex, groups)` triples, keeping their order.
    pub fn from_specs(specs: &[(ErrorKind, &str, &[&str])]) -> Result<Self, PatternError> {
        let patterns = specs
            .iter()
            .map(|(kind, pattern, groups)| MessagePattern::new(*kind, pattern, groups))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(patterns))
    }

    pub fn patterns(&self) -> &[MessagePattern] {
        &self.patterns
    }

    pub fn try_translate(&self, message: &str) -> Option<ClassifiedFailure> {
        self.patterns.iter().find_map(|p| p.try_translate(message))
    }

    /// Classify `message`, degrading to `fallback` with the message as cause.
    pub fn translate(&self, message: &str, fallback: ErrorKind) -> ClassifiedFailure {
        self.try_translate(message).unwrap_or_else(|| {
            trace!(%fallback, "no pattern matched message");
            ClassifiedFailure::caused_by(fallback, OpaqueError(message.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INVALID_CHOICE: &str = r"argument (?<argument>.*): invalid choice: '(?<choice>.*)' \(choose from \{(?<validChoices>.*)\}\)";

    fn invalid_choice() -> MessagePattern {
        MessagePattern::new(
            ErrorKind::ParserInvalidChoice,
            INVALID_CHOICE,
            &["argument", "choice", "validChoices"],
        )
        .expect("valid pattern")
    }

    #[test]
    fn given_matching_message_when_translating_then_binds_named_groups() {
        let pattern = invalid_choice();

        let failure = pattern
            .try_translate("argument FMT: invalid choice: 'xml' (choose from {json,text})")
            .expect("match");

        assert_eq!(failure.kind(), ErrorKind::ParserInvalidChoice);
        let arguments = failure.arguments();
        assert_eq!(arguments.get("argument"), Some("FMT"));
        assert_eq!(arguments.get("choice"), Some("xml"));
        assert_eq!(arguments.get("validChoices"), Some("json,text"));
        assert_eq!(arguments.len(), 3);
        assert!(failure.cause().is_none());
    }

    #[test]
    fn given_message_with_extra_text_when_translating_then_does_not_match() {
        let pattern = invalid_choice();

        let prefixed = pattern
            .try_translate("fatal: argument FMT: invalid choice: 'xml' (choose from {json,text})");
        let suffixed = pattern
            .try_translate("argument FMT: invalid choice: 'xml' (choose from {json,text}) later");

        assert!(prefixed.is_none());
        assert!(suffixed.is_none());
    }

    #[test]
    fn given_declared_group_missing_from_regex_when_constructing_then_errors() {
        let err = MessagePattern::new(ErrorKind::InputNotFound, r"no file (?<path>.*)", &["file"])
            .unwrap_err();

        assert!(matches!(err, PatternError::UnknownGroup { group, .. } if group == "file"));
    }

    #[test]
    fn given_invalid_regex_when_constructing_then_errors() {
        let err = MessagePattern::new(ErrorKind::Unknown, r"(unclosed", &[]).unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    fn given_unmatched_message_when_translating_set_then_falls_back_with_cause() {
        let set = TranslationSet::new(vec![invalid_choice()]);

        let failure = set.translate("something else entirely", ErrorKind::Unknown);

        assert_eq!(failure.kind(), ErrorKind::Unknown);
        assert!(failure.arguments().is_empty());
        assert_eq!(
            failure.cause().map(|c| c.to_string()),
            Some("something else entirely".to_string())
        );
    }

    #[test]
    fn given_overlapping_patterns_when_translating_then_first_in_order_wins() {
        let set = TranslationSet::from_specs(&[
            (
                ErrorKind::ParserPermissionDenied,
                r"cannot read (?<file>.*): permission denied",
                &["file"],
            ),
            (ErrorKind::InputReadFailure, r"cannot read (?<file>.*)", &["file"]),
        ])
        .expect("valid patterns");

        let specific = set.try_translate("cannot read a.pdf: permission denied").unwrap();
        let generic = set.try_translate("cannot read a.pdf").unwrap();

        assert_eq!(specific.kind(), ErrorKind::ParserPermissionDenied);
        assert_eq!(specific.arguments().get("file"), Some("a.pdf"));
        assert_eq!(generic.kind(), ErrorKind::InputReadFailure);
    }

    #[test]
    fn given_optional_group_not_participating_when_translating_then_leaves_it_unbound() {
        let pattern = MessagePattern::new(
            ErrorKind::ParserInvalidValue,
            r"bad value '(?<value>[^']*)'(?: because (?<reason>.*))?",
            &["value", "reason"],
        )
        .unwrap();

        let failure = pattern.try_translate("bad value 'x'").unwrap();

        assert_eq!(failure.arguments().get("value"), Some("x"));
        assert_eq!(failure.arguments().get("reason"), None);
    }
}
