//! Output sink contract shared by every operation

use std::io;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::application::operation::OperationResult;

/// Presentation selected for one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented human-readable lines on stderr
    #[default]
    Text,
    /// One JSON-RPC style document on stdout
    Json,
}

/// Where an operation narrates progress and where its outcome is rendered.
///
/// Exactly one sink is bound per invocation. Operations must not depend on
/// which one: they always return their structured value and treat
/// [`OutputSink::line`] as a side channel.
pub trait OutputSink {
    fn format(&self) -> OutputFormat;

    /// Write one line at the current indentation level.
    fn line(&mut self, text: &str);

    fn indent(&mut self);

    /// Decrease indentation; a no-op at level zero.
    fn dedent(&mut self);

    fn flush(&mut self) -> io::Result<()>;

    /// Render the invocation's outcome. Called once, at the very end.
    fn finish(&mut self, outcome: &OperationResult) -> io::Result<()>;
}
