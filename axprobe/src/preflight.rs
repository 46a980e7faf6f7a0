//! Pre-flight checks for axprobe
//!
//! Validates the probe target before handing it to the loader.
//! Provides clear, actionable error messages when something is off.

use crate::config::ProbeTarget;
use anyhow::{bail, Result};
use log::warn;

/// Run all pre-flight checks before loading the library
pub fn run_preflight_checks(target: &ProbeTarget<'_>) -> Result<()> {
    check_library_path(target.library)?;
    check_symbol_name(target.symbol)?;
    check_platform(target);
    Ok(())
}

/// Check the library path can be passed to the loader
fn check_library_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!(
            "Library path is empty.\n\n\
             Unset AXPROBE_LIBRARY or point it at a library, then rebuild."
        );
    }
    if path.contains('\0') {
        bail!("Library path contains a NUL byte: {path:?}");
    }
    Ok(())
}

/// Check the symbol name can be passed to the loader
fn check_symbol_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!(
            "Symbol name is empty.\n\n\
             Unset AXPROBE_SYMBOL or set it to an exported symbol, then rebuild."
        );
    }
    if name.contains('\0') {
        bail!("Symbol name contains a NUL byte: {name:?}");
    }
    Ok(())
}

/// Warn when probing an Apple framework on a platform that has none.
///
/// Not fatal: the loader's own error is what gets reported.
fn check_platform(target: &ProbeTarget<'_>) {
    if !platform_has_library(target) {
        warn!(
            "{} is a macOS framework; expect dlopen to fail on {}",
            target.library,
            std::env::consts::OS
        );
    }
}

/// Frameworks only exist on Apple platforms; plain libraries may exist anywhere
fn platform_has_library(target: &ProbeTarget<'_>) -> bool {
    cfg!(target_vendor = "apple") || !target.is_framework()
}
