//! Document service
//!
//! Wraps a [`DocumentBackend`] so that every failure leaving it is a
//! [`ClassifiedFailure`] carrying the affected file.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error_ext::IoResultExt;
use crate::domain::{ClassifiedFailure, ErrorKind, TranslationSet};
use crate::infrastructure::document::{DocumentBackend, DocumentInfo, RewriteError};

/// Versions a header may be rewritten to.
pub const SUPPORTED_VERSIONS: &[&str] = &[
    "1.0", "1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "2.0",
];

pub struct DocumentService {
    backend: Arc<dyn DocumentBackend>,
    patterns: TranslationSet,
}

impl DocumentService {
    /// `patterns` translates the backend's failure messages.
    pub fn new(backend: Arc<dyn DocumentBackend>, patterns: TranslationSet) -> Self {
        Self { backend, patterns }
    }

    pub fn version(&self, input: &Path) -> Result<String, ClassifiedFailure> {
        self.backend
            .read_version(input)
            .classify_input(input, &self.patterns)
    }

    pub fn inspect(&self, input: &Path) -> Result<DocumentInfo, ClassifiedFailure> {
        self.backend.inspect(input).classify_input(input, &self.patterns)
    }

    /// Rewrite the header of `input` into `output`; returns the previous version.
    #[instrument(level = "debug", skip(self))]
    pub fn rewrite_version(
        &self,
        input: &Path,
        output: &Path,
        version: &str,
    ) -> Result<String, ClassifiedFailure> {
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ClassifiedFailure::with_arguments(
                ErrorKind::DocumentUnsupportedVersion,
                [
                    ("version", version.to_string()),
                    ("supportedVersions", SUPPORTED_VERSIONS.join(", ")),
                ],
            ));
        }

        let previous = match self.backend.write_version(input, output, version) {
            Ok(previous) => previous,
            Err(RewriteError::Read(e)) => return Err(e).classify_input(input, &self.patterns),
            Err(RewriteError::Write(e)) => return Err(e).classify_output(output, &self.patterns),
        };
        debug!(%previous, "header rewritten");
        Ok(previous)
    }
}
