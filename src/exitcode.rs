//! Exit codes outside the error taxonomy (BSD sysexits.h compatible)
//!
//! Classified failures exit with their taxonomy code instead.

/// Successful termination
pub const OK: i32 = 0;

/// Internal software error (taxonomy or pattern tables unusable)
pub const SOFTWARE: i32 = 70;
