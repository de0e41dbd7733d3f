//! CLI arg parsing tests for sysdash
use assert_cmd::Command;

fn output_text(args: &[&str]) -> (bool, String) {
    let out = Command::cargo_bin("sysdash")
        .expect("sysdash binary")
        .args(args)
        .output()
        .expect("run sysdash");
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    (out.status.success(), text)
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let (_ok, text) = output_text(&["--help"]);
    for flag in [
        "--tls-ca", "-t", "--profile", "-P", "--interval", "-i", "--range", "-r", "--once",
    ] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn test_flags_accepted_before_help() {
    // --help after other flags still exits early without touching the network
    for args in [
        &["--tls-ca", "/tmp/cert.pem", "--help"][..],
        &["-t", "/tmp/cert.pem", "--help"],
        &["--profile", "dev", "--help"],
        &["-i", "10", "--help"],
        &["--range=6", "--help"],
    ] {
        let (ok, text) = output_text(args);
        assert!(ok, "sysdash {args:?} did not succeed");
        assert!(text.contains("Usage:"), "{args:?}: {text}");
    }
}

#[test]
fn test_non_numeric_interval_is_reported() {
    let (_ok, text) = output_text(&["--interval", "fast", "http://127.0.0.1:1"]);
    assert!(text.contains("expects a number"), "{text}");
}

#[test]
fn test_dry_run_prints_resolved_url() {
    let td = tempfile::tempdir().unwrap();
    let out = Command::cargo_bin("sysdash")
        .unwrap()
        .env("XDG_CONFIG_HOME", td.path())
        .args(["--dry-run", "http://metrics.local:5000"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "http://metrics.local:5000"
    );
}
