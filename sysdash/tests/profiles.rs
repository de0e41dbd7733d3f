//! Tests for profile load/save and resolution logic (non-interactive paths only)
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use sysdash::profiles::{ProfileEntry, ProfileRequest, ProfilesFile, ResolveProfile};

fn run_sysdash(config_home: &Path, args: &[&str]) -> (bool, String) {
    let exe = env!("CARGO_BIN_EXE_sysdash");
    let output = Command::new(exe)
        .env("XDG_CONFIG_HOME", config_home)
        .args(args)
        .output()
        .expect("run sysdash");
    let ok = output.status.success();
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    (ok, text)
}

fn profiles_path(config_home: &Path) -> PathBuf {
    config_home.join("sysdash").join("profiles.json")
}

#[test]
fn test_profile_created_on_first_use() {
    let td = tempfile::tempdir().unwrap();
    let (_ok, _out) = run_sysdash(
        td.path(),
        &["--profile", "unittest", "http://example:1", "--dry-run"],
    );
    let data = fs::read_to_string(profiles_path(td.path())).expect("profiles.json created");
    assert!(
        data.contains("unittest"),
        "profiles.json missing profile entry: {data}"
    );
}

#[test]
fn test_profile_overwrite_only_when_changed() {
    let td = tempfile::tempdir().unwrap();
    let path = profiles_path(td.path());
    run_sysdash(td.path(), &["--profile", "prod", "http://one", "--dry-run"]); // create
    let first = fs::read_to_string(&path).unwrap();
    // Re-run identical (should not duplicate or corrupt)
    run_sysdash(td.path(), &["--profile", "prod", "http://one", "--dry-run"]);
    let second = fs::read_to_string(&path).unwrap();
    assert_eq!(first, second, "Profile file changed despite identical input");
    // Overwrite with different URL using --save (no prompt path)
    run_sysdash(
        td.path(),
        &["--profile", "prod", "--save", "http://two", "--dry-run"],
    );
    let third = fs::read_to_string(&path).unwrap();
    assert!(third.contains("two"), "Updated URL not written: {third}");
}

#[test]
fn test_profile_tls_ca_and_interval_persisted() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(
        td.path(),
        &[
            "--profile",
            "secureX",
            "--tls-ca",
            "/tmp/cert.pem",
            "-i",
            "15",
            "https://host:5000",
            "--dry-run",
        ],
    );
    let data = fs::read_to_string(profiles_path(td.path())).unwrap();
    let pf: ProfilesFile = serde_json::from_str(&data).unwrap();
    let entry = &pf.profiles["secureX"];
    assert_eq!(entry.tls_ca.as_deref(), Some("/tmp/cert.pem"));
    assert_eq!(entry.interval_secs, Some(15));
}

#[test]
fn test_saved_profile_resolves_without_url() {
    let td = tempfile::tempdir().unwrap();
    run_sysdash(td.path(), &["-P", "lab", "http://lab:5000", "--dry-run"]);
    let (ok, out) = run_sysdash(td.path(), &["-P", "lab", "--dry-run"]);
    assert!(ok);
    assert_eq!(out.trim(), "http://lab:5000");
}

#[test]
fn test_resolve_is_pure() {
    let mut pf = ProfilesFile::default();
    pf.profiles.insert(
        "a".into(),
        ProfileEntry {
            url: "http://a".into(),
            tls_ca: None,
            interval_secs: None,
        },
    );
    let req = ProfileRequest {
        profile_name: None,
        url: None,
        tls_ca: None,
        interval_secs: None,
    };
    assert_eq!(req.resolve(&pf), ResolveProfile::PromptSelect(vec!["a".into()]));
}
