//! Leaf operations and their shared argument helpers

mod info;
mod version;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use clap::{value_parser, Arg};
use serde::Serialize;

use crate::application::operation::{Namespace, OperationResult};
use crate::domain::{ClassifiedFailure, ErrorKind};

pub use info::GetInfo;
pub use version::{GetVersion, SetVersion};

pub const INPUT_ARG: &str = "input";
/// Not `version`: clap reserves that id for the propagated `--version` flag.
pub const TARGET_VERSION_ARG: &str = "target_version";
pub const OUTPUT_ARG: &str = "output";

/// Reason given by [`readable_file`] for a file that exists but cannot be read.
pub const PERMISSION_REASON: &str = "insufficient permissions to read file";

/// Value parser for input documents.
///
/// A missing file is accepted here and reported by the operation, so the
/// requested output format still applies to that failure.
pub fn readable_file(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    match File::open(&path) {
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            Err(PERMISSION_REASON.to_string())
        }
        _ => Ok(path),
    }
}

fn input_arg() -> Arg {
    Arg::new(INPUT_ARG)
        .value_name("INPUT")
        .help("Document to read")
        .required(true)
        .value_parser(readable_file)
}

fn output_arg() -> Arg {
    Arg::new(OUTPUT_ARG)
        .short('o')
        .long("output")
        .value_name("OUTPUT")
        .help("Where to write the result (defaults to INPUT)")
        .value_parser(value_parser!(PathBuf))
}

fn required_path<'a>(args: &'a Namespace, id: &str) -> Result<&'a Path, ClassifiedFailure> {
    args.path(id)
        .map(PathBuf::as_path)
        .ok_or_else(|| missing(id))
}

fn required_string<'a>(args: &'a Namespace, id: &str) -> Result<&'a str, ClassifiedFailure> {
    args.string(id).map(String::as_str).ok_or_else(|| missing(id))
}

fn missing(id: &str) -> ClassifiedFailure {
    ClassifiedFailure::with_arguments(ErrorKind::ParserTooFewArguments, [("arguments", id)])
}

/// Serialize an operation's report into its result value.
fn report(value: &impl Serialize) -> OperationResult {
    serde_json::to_value(value).map_err(|e| ClassifiedFailure::caused_by(ErrorKind::Unknown, e))
}
