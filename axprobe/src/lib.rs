//! # axprobe - runtime symbol availability check
//!
//! Loads a dynamic library with immediate binding, looks up one symbol, and
//! reports whether it resolved. Built to confirm that macOS exposes
//! `AXIsProcessTrustedWithOptions` through the ApplicationServices framework
//! before code that depends on it is written.
//!
//! ```text
//!   config ──▶ preflight ──▶ probe ──▶ dl::Library ──▶ dlopen / dlsym / dlclose
//!                              │
//!                              ▼
//!                         ProbeReport (one line on stdout)
//! ```
//!
//! ## Module Structure
//!
//! - [`config`]: Build-time probe target (`AXPROBE_LIBRARY`, `AXPROBE_SYMBOL`)
//! - [`preflight`]: Target validation before anything is loaded
//! - [`probe`]: Open, look up, release
//! - [`dl`]: [`dl::Loader`] seam, the `dlfcn` implementation, and the scoped
//!   [`dl::Library`] handle
//! - [`domain`]: Addresses, reports and errors
//! - [`cli`]: Command-line argument parsing
//!
//! ## Outcomes
//!
//! | Outcome | stdout | exit |
//! |---|---|---|
//! | library failed to load | `dlopen failed: <reason>` | 1 |
//! | symbol missing | `<symbol> Not Found: <reason>` | 0 |
//! | symbol resolved | `<symbol> Found, Addr: 0x<addr>` | 0 |

pub mod cli;
pub mod config;
pub mod dl;
pub mod domain;
pub mod preflight;
pub mod probe;
