//! Integration tests for the mdskills CLI.
//!
//! Tests argument parsing and the fail-fast paths that need no network or
//! database access.

use std::process::Command;

fn mdskills(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_mdskills"))
        .args(args)
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_ANON_KEY")
        .env_remove("SUPABASE_SERVICE_ROLE_KEY")
        .output()
        .expect("Failed to execute mdskills")
}

#[test]
fn test_help_lists_subcommands() {
    let output = mdskills(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["search", "list", "info", "install", "import", "reviews"] {
        assert!(
            stdout.contains(subcommand),
            "help should mention '{}'",
            subcommand
        );
    }
}

#[test]
fn test_version() {
    let output = mdskills(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("mdskills"));
}

/// An unparseable URL fails immediately with a parse error, before any
/// network or database access.
#[test]
fn test_import_rejects_garbage_url() {
    let output = mdskills(&["import", "not a url"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Cannot parse GitHub URL"),
        "expected parse error, got: {}",
        stderr
    );
}

/// Read commands without SUPABASE_URL fail with a remediation hint, not a
/// panic.
#[test]
fn test_search_without_config_has_hint() {
    let output = mdskills(&["search", "pdf"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SUPABASE_URL"));
}

/// Under --json the error contract is a JSON object on stdout.
#[test]
fn test_search_json_error_contract() {
    let output = mdskills(&["search", "pdf", "--json"]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value =
        serde_json::from_str(stdout.trim()).expect("stdout should be JSON");
    assert!(value.get("error").is_some());
}

#[test]
fn test_reviews_requires_slug_or_all() {
    let output = Command::new(env!("CARGO_BIN_EXE_mdskills"))
        .args(["reviews"])
        .env("SUPABASE_URL", "https://example.supabase.co")
        .env("SUPABASE_ANON_KEY", "test-key")
        .env("ANTHROPIC_API_KEY", "test-key")
        .output()
        .expect("Failed to execute mdskills");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--slug") || stderr.contains("--all"));
}
