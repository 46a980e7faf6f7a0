use axprobe::config::ProbeTarget;
use std::process::Command;

fn run_probe(args: &[&str]) -> (Option<i32>, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_axprobe"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run axprobe");
    (output.status.code(), String::from_utf8_lossy(&output.stdout).into_owned())
}

#[test]
fn test_prints_exactly_one_line() {
    let (_, stdout) = run_probe(&[]);
    assert_eq!(stdout.lines().count(), 1, "unexpected output: {stdout:?}");
}

#[cfg(target_os = "macos")]
#[test]
fn test_application_services_exports_ax_trust_check() {
    let target = ProbeTarget::BUILT_IN;
    let (code, stdout) = run_probe(&[]);

    assert_eq!(code, Some(0), "stdout: {stdout}");
    let prefix = format!("{} Found, Addr: 0x", target.symbol);
    assert!(stdout.starts_with(&prefix), "unexpected output: {stdout}");
    assert_ne!(stdout.trim_end(), format!("{} Found, Addr: 0x0", target.symbol));
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_framework_missing_off_macos() {
    if !ProbeTarget::BUILT_IN.is_framework() {
        // Built with AXPROBE_LIBRARY pointing somewhere else
        return;
    }
    let (code, stdout) = run_probe(&[]);

    assert_eq!(code, Some(1), "stdout: {stdout}");
    assert!(stdout.starts_with("dlopen failed: "), "unexpected output: {stdout}");
}

#[test]
fn test_version_flag() {
    let (code, stdout) = run_probe(&["--version"]);
    assert_eq!(code, Some(0));
    assert!(stdout.starts_with("axprobe "));
}

#[test]
fn test_unknown_argument_is_usage_error() {
    let (code, _) = run_probe(&["--library", "/usr/lib/libc.dylib"]);
    assert_eq!(code, Some(2));
}
