//! Application services
//!
//! Concrete services that sit between the operations and the I/O boundary
//! traits. Services are structs, not traits.

mod document;

pub use document::{DocumentService, SUPPORTED_VERSIONS};
