//! Header version operations

use std::path::Path;
use std::sync::Arc;

use clap::{Arg, Command};
use serde::Serialize;
use tracing::{info, instrument};

use super::{
    input_arg, output_arg, report, required_path, required_string, INPUT_ARG, OUTPUT_ARG,
    TARGET_VERSION_ARG,
};
use crate::application::operation::{Namespace, Operation, OperationResult};
use crate::application::services::{DocumentService, SUPPORTED_VERSIONS};
use crate::application::sink::OutputSink;

#[derive(Debug, Serialize)]
struct VersionReport {
    version: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RewriteReport {
    previous_version: String,
    version: String,
    output: String,
}

/// `get version <INPUT>`
pub struct GetVersion {
    documents: Arc<DocumentService>,
}

impl GetVersion {
    pub fn new(documents: Arc<DocumentService>) -> Self {
        Self { documents }
    }
}

impl Operation for GetVersion {
    fn declare(&self, command: Command) -> Command {
        command
            .about("Print the version declared in the document header")
            .arg(input_arg())
    }

    #[instrument(level = "debug", skip_all)]
    fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult {
        let input = required_path(args, INPUT_ARG)?;

        sink.line(&format!("Reading header of {}", input.display()));
        sink.indent();
        let version = self.documents.version(input);
        if let Ok(version) = &version {
            sink.line(&format!("Version: {}", version));
        }
        sink.dedent();

        report(&VersionReport { version: version? })
    }
}

/// `set version <INPUT> <VERSION> [-o OUTPUT]`
pub struct SetVersion {
    documents: Arc<DocumentService>,
}

impl SetVersion {
    pub fn new(documents: Arc<DocumentService>) -> Self {
        Self { documents }
    }
}

impl Operation for SetVersion {
    fn declare(&self, command: Command) -> Command {
        command
            .about("Rewrite the version declared in the document header")
            .arg(input_arg())
            .arg(
                Arg::new(TARGET_VERSION_ARG)
                    .value_name("VERSION")
                    .help(format!("New version ({})", SUPPORTED_VERSIONS.join(", ")))
                    .required(true),
            )
            .arg(output_arg())
    }

    #[instrument(level = "debug", skip_all)]
    fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult {
        let input = required_path(args, INPUT_ARG)?;
        let version = required_string(args, TARGET_VERSION_ARG)?;
        let output: &Path = args.path(OUTPUT_ARG).map_or(input, |p| p.as_path());

        sink.line(&format!("Rewriting header of {}", input.display()));
        sink.indent();
        let previous = self.documents.rewrite_version(input, output, version);
        if let Ok(previous) = &previous {
            sink.line(&format!("Version: {} -> {}", previous, version));
            sink.line(&format!("Written to {}", output.display()));
        }
        sink.dedent();

        let previous = previous?;
        info!(%previous, version, output = %output.display(), "version updated");
        report(&RewriteReport {
            previous_version: previous,
            version: version.to_string(),
            output: output.display().to_string(),
        })
    }
}
