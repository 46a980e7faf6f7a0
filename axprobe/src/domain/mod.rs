//! Domain model for axprobe
//!
//! Core types and errors shared by the loader, the probe and the binary.

pub mod errors;
pub mod types;

pub use types::{BindingMode, ProbeReport, SymbolAddress};

pub use errors::ProbeError;
