use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn strings_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("strings");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
url = "sqlite://{}/data/strings.sqlite"

[server]
bind = "127.0.0.1:0"
"#,
        root.display()
    );

    let config_path = config_dir.join("strings.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_strings(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = strings_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("DATABASE_URL")
        .env_remove("SQL_ECHO")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run strings binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_strings(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/strings.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_strings(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_strings(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_analyze_prints_properties() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_strings(&config_path, &["analyze", "AaB"]);
    assert!(success, "analyze failed: stderr={}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["value"], "AaB");
    assert_eq!(json["properties"]["length"], 3);
    assert_eq!(json["properties"]["unique_characters"], 2);
    assert_eq!(json["properties"]["character_frequency_map"]["a"], 2);
    assert_eq!(json["id"], json["properties"]["sha256_hash"]);
}

#[test]
fn test_list_empty_store() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_strings(&config_path, &["list", "--is-palindrome", "true"]);
    assert!(success, "list failed: stderr={}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["count"], 0);
    assert_eq!(json["filters_applied"]["is_palindrome"], true);
}

#[test]
fn test_list_natural_language_query() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_strings(
        &config_path,
        &["list", "--query", "strings containing the letter z"],
    );
    assert!(success, "list failed: stderr={}", stderr);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        json["interpreted_query"]["parsed_filters"]["contains_character"],
        "z"
    );
}

#[test]
fn test_list_rejects_mixed_modes() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_strings(
        &config_path,
        &["list", "--query", "strings containing the letter z", "--min-length", "3"],
    );
    assert!(!success);
    assert!(stderr.contains("cannot be combined"));
}

#[test]
fn test_list_rejects_zero_word_count() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_strings(&config_path, &["list", "--word-count", "0"]);
    assert!(!success);
    assert!(stderr.contains("word_count"));
}
