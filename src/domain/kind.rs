//! The closed set of failure kinds

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One recognized failure category.
///
/// The symbolic name is the key into the code and message tables; both the
/// name and the code it maps to are a released contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    Unknown,

    ParserUnknown,
    ParserUnrecognizedArgument,
    ParserInvalidChoice,
    ParserInvalidValue,
    ParserTooFewArguments,
    ParserUnrecognizedCommand,
    ParserMissingCommand,
    ParserPermissionDenied,

    InputNotFound,
    InputPermissionDenied,
    InputReadFailure,
    InputCloseFailure,

    OutputPermissionDenied,
    OutputWriteFailure,

    DocumentInvalidHeader,
    DocumentTruncated,
    DocumentUnsupportedVersion,

    ConfigInvalid,

    InternalUnregisteredCommand,
    InternalOutputFailure,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [ErrorKind] = &[
        ErrorKind::Unknown,
        ErrorKind::ParserUnknown,
        ErrorKind::ParserUnrecognizedArgument,
        ErrorKind::ParserInvalidChoice,
        ErrorKind::ParserInvalidValue,
        ErrorKind::ParserTooFewArguments,
        ErrorKind::ParserUnrecognizedCommand,
        ErrorKind::ParserMissingCommand,
        ErrorKind::ParserPermissionDenied,
        ErrorKind::InputNotFound,
        ErrorKind::InputPermissionDenied,
        ErrorKind::InputReadFailure,
        ErrorKind::InputCloseFailure,
        ErrorKind::OutputPermissionDenied,
        ErrorKind::OutputWriteFailure,
        ErrorKind::DocumentInvalidHeader,
        ErrorKind::DocumentTruncated,
        ErrorKind::DocumentUnsupportedVersion,
        ErrorKind::ConfigInvalid,
        ErrorKind::InternalUnregisteredCommand,
        ErrorKind::InternalOutputFailure,
    ];

    /// Stable symbolic name, as used in the taxonomy tables.
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Unknown => "UNKNOWN",
            ErrorKind::ParserUnknown => "PARSER_UNKNOWN",
            ErrorKind::ParserUnrecognizedArgument => "PARSER_UNRECOGNIZED_ARGUMENT",
            ErrorKind::ParserInvalidChoice => "PARSER_INVALID_CHOICE",
            ErrorKind::ParserInvalidValue => "PARSER_INVALID_VALUE",
            ErrorKind::ParserTooFewArguments => "PARSER_TOO_FEW_ARGUMENTS",
            ErrorKind::ParserUnrecognizedCommand => "PARSER_UNRECOGNIZED_COMMAND",
            ErrorKind::ParserMissingCommand => "PARSER_MISSING_COMMAND",
            ErrorKind::ParserPermissionDenied => "PARSER_PERMISSION_DENIED",
            ErrorKind::InputNotFound => "INPUT_NOT_FOUND",
            ErrorKind::InputPermissionDenied => "INPUT_PERMISSION_DENIED",
            ErrorKind::InputReadFailure => "INPUT_READ_FAILURE",
            ErrorKind::InputCloseFailure => "INPUT_CLOSE_FAILURE",
            ErrorKind::OutputPermissionDenied => "OUTPUT_PERMISSION_DENIED",
            ErrorKind::OutputWriteFailure => "OUTPUT_WRITE_FAILURE",
            ErrorKind::DocumentInvalidHeader => "DOCUMENT_INVALID_HEADER",
            ErrorKind::DocumentTruncated => "DOCUMENT_TRUNCATED",
            ErrorKind::DocumentUnsupportedVersion => "DOCUMENT_UNSUPPORTED_VERSION",
            ErrorKind::ConfigInvalid => "CONFIG_INVALID",
            ErrorKind::InternalUnregisteredCommand => "INTERNAL_UNREGISTERED_COMMAND",
            ErrorKind::InternalOutputFailure => "INTERNAL_OUTPUT_FAILURE",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown error kind: {0}")]
pub struct UnknownKindError(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}
