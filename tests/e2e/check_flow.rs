//! Check, fields, and config command E2E flows.

use std::error::Error;
use std::path::PathBuf;
use std::process::{Command, Output};

const SCOPED_ENV: [&str; 5] = [
    "SORTGUARD_LOCALE",
    "SORTGUARD_LOG_LEVEL",
    "SORTGUARD_LOG_FORMAT",
    "SORTGUARD_DEFAULT_TARGET",
    "RUST_LOG",
];

fn run_cli(args: &[&str], env: &[(&str, &str)]) -> std::io::Result<Output> {
    let mut command = Command::new(env!("CARGO_BIN_EXE_sortguard"));
    command.args(args);
    for key in SCOPED_ENV {
        command.env_remove(key);
    }
    command.envs(env.iter().copied());
    command.output()
}

fn config_fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../crates/config/tests/fixtures/config")
        .join(name)
}

fn stdout_json(output: &Output) -> Result<serde_json::Value, Box<dyn Error>> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn check_exits_two_on_rejection() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["check", "--value", "bogus", "--output", "json"], &[])?;

    assert_eq!(output.status.code(), Some(2));
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/status").and_then(serde_json::Value::as_str),
        Some("rejected")
    );
    assert_eq!(
        value.pointer("/target").and_then(serde_json::Value::as_str),
        Some("articles")
    );
    assert_eq!(
        value.pointer("/errors/0/tag").and_then(serde_json::Value::as_str),
        Some("is-sort")
    );
    assert_eq!(
        value.pointer("/errors/0/message").and_then(serde_json::Value::as_str),
        Some("SortField must be one of [field_str1, field_str2, field_str3, str4, str5], got bogus")
    );
    Ok(())
}

#[test]
fn check_accepts_request_json() -> Result<(), Box<dyn Error>> {
    let output = run_cli(
        &[
            "check",
            "--request",
            r#"{"sortField":"score","target":"comments"}"#,
            "--output",
            "json",
        ],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(0));
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/status").and_then(serde_json::Value::as_str),
        Some("ok")
    );
    assert_eq!(
        value.pointer("/message").and_then(serde_json::Value::as_str),
        Some("validation passed")
    );
    Ok(())
}

#[test]
fn check_rejects_malformed_request() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["check", "--request", r#"{"sortField":""}"#], &[])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sortField must be non-empty"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn padded_request_sort_field_is_rejected() -> Result<(), Box<dyn Error>> {
    let output = run_cli(
        &["check", "--request", r#"{"sortField":" field_str1 "}"#, "--output", "json"],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(2));
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/value").and_then(serde_json::Value::as_str),
        Some(" field_str1 ")
    );
    Ok(())
}

#[test]
fn target_flag_ignores_case() -> Result<(), Box<dyn Error>> {
    let output = run_cli(
        &["check", "--target", "Comments", "--value", "score", "--output", "json"],
        &[],
    )?;

    assert_eq!(output.status.code(), Some(0));
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/target").and_then(serde_json::Value::as_str),
        Some("comments")
    );
    Ok(())
}

#[test]
fn env_default_target_is_used() -> Result<(), Box<dyn Error>> {
    let output = run_cli(
        &["check", "--value", "field_str1"],
        &[("SORTGUARD_DEFAULT_TARGET", "articles-legacy")],
    )?;

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[field_str, field_str2"), "stdout: {stdout}");
    Ok(())
}

#[test]
fn invalid_env_locale_fails_fast() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["demo"], &[("SORTGUARD_LOCALE", "fr")])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SORTGUARD_LOCALE"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn fields_lists_allowed_values() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["fields", "--target", "comments", "--output", "json"], &[])?;

    assert!(output.status.success());
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/allowed"),
        Some(&serde_json::json!(["created_at", "author_name", "score"]))
    );
    Ok(())
}

#[test]
fn parse_tag_prints_settings() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["parse-tag", "column:id;type:int"], &[])?;

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "COLUMN: id\nTYPE: int\n"
    );
    Ok(())
}

#[test]
fn config_show_reflects_file_and_env() -> Result<(), Box<dyn Error>> {
    let path = config_fixture("sortguard.valid.toml");
    let path = path.to_str().ok_or("fixture path is not UTF-8")?;
    let output = run_cli(
        &["config", "show", "--config", path, "--output", "json"],
        &[("SORTGUARD_LOCALE", "en")],
    )?;

    assert!(output.status.success());
    let value = stdout_json(&output)?;
    assert_eq!(
        value.pointer("/effectiveConfig/locale").and_then(serde_json::Value::as_str),
        Some("en")
    );
    assert_eq!(
        value.pointer("/effectiveConfig/defaultTarget").and_then(serde_json::Value::as_str),
        Some("articles-legacy")
    );
    Ok(())
}

#[test]
fn config_file_locale_applies_to_messages() -> Result<(), Box<dyn Error>> {
    let path = config_fixture("sortguard.valid.toml");
    let path = path.to_str().ok_or("fixture path is not UTF-8")?;
    let output = run_cli(&["check", "--config", path, "--value", "field_str"], &[])?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "验证通过\n");
    Ok(())
}

#[test]
fn missing_config_file_is_reported() -> Result<(), Box<dyn Error>> {
    let output = run_cli(&["config", "show", "--config", "does/not/exist.toml"], &[])?;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read config file"), "stderr: {stderr}");
    Ok(())
}
