//! Startup errors: the built-in tables failed to load

use thiserror::Error;

use crate::domain::{PatternError, TaxonomyError};

/// Raised before any command runs; the process cannot classify anything yet.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("error taxonomy: {0}")]
    Taxonomy(#[from] TaxonomyError),

    #[error("message patterns: {0}")]
    Pattern(#[from] PatternError),
}

impl StartupError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        crate::exitcode::SOFTWARE
    }
}
