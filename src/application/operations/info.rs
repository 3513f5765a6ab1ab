use std::sync::Arc;

use clap::Command;
use serde::Serialize;
use tracing::instrument;

use super::{input_arg, report, required_path, INPUT_ARG};
use crate::application::operation::{Namespace, Operation, OperationResult};
use crate::application::services::DocumentService;
use crate::application::sink::OutputSink;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoReport {
    version: String,
    size_bytes: u64,
    has_eof_marker: bool,
}

/// `get info <INPUT>`
pub struct GetInfo {
    documents: Arc<DocumentService>,
}

impl GetInfo {
    pub fn new(documents: Arc<DocumentService>) -> Self {
        Self { documents }
    }
}

impl Operation for GetInfo {
    fn declare(&self, command: Command) -> Command {
        command
            .about("Print header-level facts about the document")
            .arg(input_arg())
    }

    #[instrument(level = "debug", skip_all)]
    fn execute(&self, args: &Namespace, sink: &mut dyn OutputSink) -> OperationResult {
        let input = required_path(args, INPUT_ARG)?;

        sink.line(&format!("Inspecting {}", input.display()));
        sink.indent();
        let info = self.documents.inspect(input);
        if let Ok(info) = &info {
            sink.line(&format!("Version: {}", info.version));
            sink.line(&format!("Size: {} bytes", info.size_bytes));
            let marker = if info.has_eof_marker { "present" } else { "missing" };
            sink.line(&format!("EOF marker: {}", marker));
        }
        sink.dedent();

        let info = info?;
        report(&InfoReport {
            version: info.version,
            size_bytes: info.size_bytes,
            has_eof_marker: info.has_eof_marker,
        })
    }
}
