//! pdfops: document operations behind a stable, numerically coded error taxonomy
//!
//! Layering:
//! - `domain`: error kinds, the taxonomy, classified failures, message patterns
//! - `application`: operations, the command tree, services, the sink contract
//! - `infrastructure`: the document backend
//! - `cli`: argument surface, sinks and the driver

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
