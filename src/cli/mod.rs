//! CLI layer: argument surface, parser-failure translation, sinks and the driver

pub mod args;
pub mod driver;
pub mod error;
pub mod output;
pub mod parser_patterns;

pub use driver::Driver;
pub use error::StartupError;
