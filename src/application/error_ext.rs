//! Classification helpers for I/O results
//!
//! Every `io::Error` that leaves the document backend goes through here,
//! so the file path always lands in the failure's arguments.

use std::io;
use std::path::Path;

use crate::domain::{ClassifiedFailure, ErrorKind, TranslationSet};

/// Extension trait turning `io::Result` into a classified result.
///
/// Resolution order: the error's `io::ErrorKind` first, then the message
/// against `patterns`, then the read or write fallback with the error as cause.
pub trait IoResultExt<T> {
    /// Classify as a failure reading `path`.
    ///
    /// # Example
    /// ```ignore
    /// backend.read_version(&input)
    ///     .classify_input(&input, &patterns)?;
    /// ```
    fn classify_input(self, path: &Path, patterns: &TranslationSet)
        -> Result<T, ClassifiedFailure>;

    /// Classify as a failure writing `path`.
    fn classify_output(
        self,
        path: &Path,
        patterns: &TranslationSet,
    ) -> Result<T, ClassifiedFailure>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn classify_input(
        self,
        path: &Path,
        patterns: &TranslationSet,
    ) -> Result<T, ClassifiedFailure> {
        self.map_err(|e| classify_read(e, path, patterns))
    }

    fn classify_output(
        self,
        path: &Path,
        patterns: &TranslationSet,
    ) -> Result<T, ClassifiedFailure> {
        self.map_err(|e| classify_write(e, path, patterns))
    }
}

fn classify_read(err: io::Error, path: &Path, patterns: &TranslationSet) -> ClassifiedFailure {
    let file = path.display().to_string();
    match err.kind() {
        io::ErrorKind::NotFound => {
            ClassifiedFailure::with_arguments(ErrorKind::InputNotFound, [("file", file)])
        }
        io::ErrorKind::PermissionDenied => {
            ClassifiedFailure::with_arguments(ErrorKind::InputPermissionDenied, [("file", file)])
        }
        _ => patterns.try_translate(&err.to_string()).unwrap_or_else(|| {
            ClassifiedFailure::with_cause_and_arguments(
                ErrorKind::InputReadFailure,
                err,
                [("file", file)],
            )
        }),
    }
}

fn classify_write(err: io::Error, path: &Path, patterns: &TranslationSet) -> ClassifiedFailure {
    let file = path.display().to_string();
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            ClassifiedFailure::with_arguments(ErrorKind::OutputPermissionDenied, [("file", file)])
        }
        _ => patterns.try_translate(&err.to_string()).unwrap_or_else(|| {
            ClassifiedFailure::with_cause_and_arguments(
                ErrorKind::OutputWriteFailure,
                err,
                [("file", file)],
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn patterns() -> TranslationSet {
        TranslationSet::from_specs(&[(
            ErrorKind::DocumentInvalidHeader,
            r"Header doesn't contain versioninfo",
            &[],
        )])
        .unwrap()
    }

    #[rstest]
    #[case(io::ErrorKind::NotFound, ErrorKind::InputNotFound)]
    #[case(io::ErrorKind::PermissionDenied, ErrorKind::InputPermissionDenied)]
    #[case(io::ErrorKind::Interrupted, ErrorKind::InputReadFailure)]
    fn given_io_kind_when_classifying_read_then_maps_to_input_kind(
        #[case] io_kind: io::ErrorKind,
        #[case] expected: ErrorKind,
    ) {
        let result: io::Result<()> = Err(io::Error::new(io_kind, "boom"));

        let failure = result
            .classify_input(Path::new("doc.pdf"), &patterns())
            .unwrap_err();

        assert_eq!(failure.kind(), expected);
        assert_eq!(failure.arguments().get("file"), Some("doc.pdf"));
    }

    #[test]
    fn given_known_message_when_classifying_read_then_pattern_wins_over_fallback() {
        let err = io::Error::new(
            io::ErrorKind::InvalidData,
            "Header doesn't contain versioninfo",
        );

        let failure = classify_read(err, Path::new("doc.pdf"), &patterns());

        assert_eq!(failure.kind(), ErrorKind::DocumentInvalidHeader);
        assert!(failure.cause().is_none());
    }

    #[test]
    fn given_unknown_message_when_classifying_read_then_keeps_error_as_cause() {
        let err = io::Error::new(io::ErrorKind::Other, "device not ready");

        let failure = classify_read(err, Path::new("doc.pdf"), &patterns());

        assert_eq!(failure.kind(), ErrorKind::InputReadFailure);
        assert_eq!(failure.cause().unwrap().to_string(), "device not ready");
    }

    #[rstest]
    #[case(io::ErrorKind::PermissionDenied, ErrorKind::OutputPermissionDenied)]
    #[case(io::ErrorKind::NotFound, ErrorKind::OutputWriteFailure)]
    #[case(io::ErrorKind::Other, ErrorKind::OutputWriteFailure)]
    fn given_io_kind_when_classifying_write_then_maps_to_output_kind(
        #[case] io_kind: io::ErrorKind,
        #[case] expected: ErrorKind,
    ) {
        let result: io::Result<()> = Err(io::Error::new(io_kind, "boom"));

        let failure = result
            .classify_output(Path::new("out.pdf"), &patterns())
            .unwrap_err();

        assert_eq!(failure.kind(), expected);
        assert_eq!(failure.arguments().get("file"), Some("out.pdf"));
    }
}
