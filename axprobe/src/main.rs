//! # axprobe - Main Entry Point
//!
//! Probes the build-time target once and prints a single line to stdout.

use anyhow::Result;
use axprobe::cli::Args;
use axprobe::config::ProbeTarget;
use axprobe::domain::{ProbeError, ProbeReport};
use axprobe::preflight::run_preflight_checks;
use axprobe::probe::probe;
use clap::Parser;
use log::info;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;

fn main() {
    env_logger::init();
    Args::parse();

    std::process::exit(match run() {
        Ok(report) => {
            println!("{report}");
            EXIT_SUCCESS
        }
        Err(e) => report_error(&e),
    });
}

/// Print a failed run and pick its exit code
fn report_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ProbeError>() {
        // The load failure is the probe's own output, so it goes to stdout as is
        Some(load @ ProbeError::LibraryLoad { .. }) => println!("{load}"),
        _ => eprintln!("error: {err:#}"),
    }
    EXIT_ERROR
}

fn run() -> Result<ProbeReport> {
    let target = ProbeTarget::BUILT_IN;
    info!("probing {} in {}", target.symbol, target.library);

    run_preflight_checks(&target)?;
    let report = probe(&target)?;

    info!("{} {}", report.symbol(), if report.is_found() { "resolved" } else { "missing" });
    Ok(report)
}
