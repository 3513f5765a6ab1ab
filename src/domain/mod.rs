//! Domain layer: error taxonomy, classified failures, message translation
//!
//! This layer is independent of the command line and of document I/O.

pub mod failure;
pub mod kind;
pub mod pattern;
pub mod response;
pub mod taxonomy;

pub use failure::{Arguments, ClassifiedFailure, OpaqueError, DEFAULT_CODE};
pub use kind::ErrorKind;
pub use pattern::{MessagePattern, PatternError, TranslationSet};
pub use response::{RpcError, RpcErrorData, RpcResponse};
pub use taxonomy::{Taxonomy, TaxonomyError};
