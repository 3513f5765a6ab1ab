//! Text and JSON output sinks
//!
//! The text sink respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use std::io::{self, Write};

use colored::Colorize;

use crate::application::operation::OperationResult;
use crate::application::sink::{OutputFormat, OutputSink};
use crate::domain::RpcResponse;

/// Spaces per indentation level.
const INDENT_WIDTH: usize = 2;

/// Human-readable lines on the diagnostic stream.
pub struct TextSink<W: Write> {
    out: W,
    level: usize,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, level: 0 }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for TextSink<W> {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn line(&mut self, text: &str) {
        let pad = self.level * INDENT_WIDTH;
        writeln!(self.out, "{:pad$}{}", "", text, pad = pad).ok();
    }

    fn indent(&mut self) {
        self.level += 1;
    }

    fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn finish(&mut self, outcome: &OperationResult) -> io::Result<()> {
        if let Err(failure) = outcome {
            writeln!(
                self.out,
                "{}: {}",
                "error".red().bold(),
                failure.rendered_message()
            )?;
            if let Some(cause) = failure.cause() {
                writeln!(self.out, "  caused by: {}", cause)?;
            }
        }
        self.out.flush()
    }
}

/// A single JSON-RPC style document, written when the invocation finishes.
pub struct JsonSink<W: Write> {
    out: W,
    finished: bool,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            finished: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> OutputSink for JsonSink<W> {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn line(&mut self, _text: &str) {}

    fn indent(&mut self) {}

    fn dedent(&mut self) {}

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn finish(&mut self, outcome: &OperationResult) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let response = match outcome {
            Ok(value) => RpcResponse::success(value.clone()),
            Err(failure) => RpcResponse::failure(failure.to_structured_error()),
        };
        serde_json::to_writer_pretty(&mut self.out, &response)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

/// Bind the sink for `format`, writing text to `diagnostic` and JSON to `output`.
pub fn bind<'a>(
    format: OutputFormat,
    output: &'a mut dyn Write,
    diagnostic: &'a mut dyn Write,
) -> Box<dyn OutputSink + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextSink::new(diagnostic)),
        OutputFormat::Json => Box::new(JsonSink::new(output)),
    }
}
