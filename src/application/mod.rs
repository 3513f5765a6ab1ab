//! Application layer: operations, services and the command tree
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error_ext;
pub mod operation;
pub mod operations;
pub mod registry;
pub mod services;
pub mod sink;

pub use error_ext::IoResultExt;
pub use operation::{CommandNode, CommandTree, Namespace, Operation, OperationGroup, OperationResult};
pub use registry::Registry;
pub use sink::{OutputFormat, OutputSink};
