//! CLI argument definitions

use clap::Parser;

/// The probe target is fixed at build time, so the only flags are
/// `--help` and `--version`.
#[derive(Parser, Debug)]
#[command(
    name = "axprobe",
    version,
    about = "Check whether AXIsProcessTrustedWithOptions resolves at runtime",
    after_help = "\
The library and symbol are fixed at build time. To probe something else, rebuild with:
    AXPROBE_LIBRARY=/path/to/lib AXPROBE_SYMBOL=name cargo build

Set RUST_LOG=debug to trace each loader call on stderr."
)]
pub struct Args {}
