//! Infrastructure layer: I/O implementations
//!
//! This layer implements the document boundary trait.

pub mod document;

pub use document::{DocumentBackend, DocumentInfo, HeaderBackend, RewriteError};
