//! CLI surface built with the clap builder API
//!
//! Subcommands come from the command tree at runtime, so only the root and
//! its global flags are declared here.

use clap::{value_parser, Arg, ArgAction, Command};

use crate::application::operation::{CommandTree, FORMAT_ARG, VERBOSE_ARG};
use crate::application::sink::OutputFormat;

pub const BIN_NAME: &str = "pdfops";

/// Inspect and rewrite document headers
pub fn build_command(tree: &CommandTree) -> Command {
    let root = Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect and rewrite document headers")
        .propagate_version(true)
        .arg(
            Arg::new(FORMAT_ARG)
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format (default: from settings, else text)")
                .global(true)
                .value_parser(value_parser!(OutputFormat)),
        )
        .arg(
            Arg::new(VERBOSE_ARG)
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .global(true)
                .action(ArgAction::Count),
        );
    tree.declare(root)
}
