//! Structured error types for axprobe
//!
//! Using thiserror for automatic Display implementation.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    /// The library could not be opened. Display is the line the binary prints.
    #[error("dlopen failed: {reason}")]
    LibraryLoad { path: String, reason: String },

    #[error("Invalid probe target: {0}")]
    InvalidTarget(String),
}
