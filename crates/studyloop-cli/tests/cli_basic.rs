//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory,
//! so every test gets its own database and config file.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(home, args, "")
}

fn run_cli_with_input(home: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_studyloop"))
        .args(args)
        .env("HOME", home)
        .env_remove("STUDYLOOP_ENV")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start CLI");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn total_xp(home: &Path) -> u64 {
    let (stdout, _, code) = run_cli(home, &["xp", "show"]);
    assert_eq!(code, 0);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("xp show prints JSON");
    json["total_xp"].as_u64().unwrap()
}

fn write_questions(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("questions.json");
    std::fs::write(
        &path,
        r#"[
            {"question": "2 + 2?", "answer": "B", "options": ["3", "4", "5", "6"], "explanation": "Arithmetic."},
            {"question": "Largest planet?", "answer": "Jupiter", "options": ["Mars", "Jupiter", "Venus", "Earth"]}
        ]"#,
    )
    .unwrap();
    path
}

#[test]
fn test_xp_starts_at_zero() {
    let home = TempDir::new().unwrap();
    assert_eq!(total_xp(home.path()), 0);
}

#[test]
fn test_xp_add_and_reset() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["xp", "add", "25"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("25"));
    run_cli(home.path(), &["xp", "add", "5"]);
    assert_eq!(total_xp(home.path()), 30);

    let (_, _, code) = run_cli(home.path(), &["xp", "reset"]);
    assert_eq!(code, 0);
    assert_eq!(total_xp(home.path()), 0);
}

#[test]
fn test_modes_lists_catalog() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["modes"]);
    assert_eq!(code, 0);
    let modes: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let modes = modes.as_array().unwrap();
    assert_eq!(modes.len(), 4);
    assert_eq!(modes[2]["mode"], "match");
    assert_eq!(modes[2]["xp_range"], "20-75 XP");
}

#[test]
fn test_check_reports_question_count() {
    let home = TempDir::new().unwrap();
    let file = write_questions(home.path());
    let (stdout, _, code) = run_cli(home.path(), &["check", file.to_str().unwrap()]);
    assert_eq!(code, 0);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["questions"], 2);
    assert_eq!(report["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn test_check_missing_file_fails() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["check", "/nonexistent/questions.json"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(home.path(), &["config", "get", "matching.hearts"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "3");

    let (_, _, code) = run_cli(home.path(), &["config", "set", "matching.hearts", "5"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(home.path(), &["config", "get", "matching.hearts"]);
    assert_eq!(stdout.trim(), "5");
}

#[test]
fn test_config_unknown_key_fails() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["config", "get", "theme"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_play_flashcards_awards_xp() {
    let home = TempDir::new().unwrap();
    let file = write_questions(home.path());
    let (stdout, _, code) = run_cli_with_input(
        home.path(),
        &["play", "flashcards", file.to_str().unwrap()],
        "f\nn\nf\nq\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("+15 XP"));
    assert_eq!(total_xp(home.path()), 15);
}

#[test]
fn test_play_test_mode() {
    let home = TempDir::new().unwrap();
    let file = write_questions(home.path());
    let (stdout, _, code) = run_cli_with_input(
        home.path(),
        &["play", "test", file.to_str().unwrap()],
        "1 2\n2 2\nsubmit\n",
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Perfect score! Congratulations!"));
    assert_eq!(total_xp(home.path()), 60);
}

#[test]
fn test_play_unknown_mode_fails() {
    let home = TempDir::new().unwrap();
    let file = write_questions(home.path());
    let (_, _, code) = run_cli(home.path(), &["play", "quiz", file.to_str().unwrap()]);
    assert_ne!(code, 0);
}
