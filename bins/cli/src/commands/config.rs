//! Config command handlers.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use sortguard_config::{SortguardConfig, sort_request_schema, to_pretty_json, to_pretty_toml};
use std::path::Path;

/// Print the effective config (TOML for text output).
pub fn run_config_show(
    mode: OutputMode,
    config: &SortguardConfig,
    path: Option<&Path>,
) -> Result<CliOutput, CliError> {
    let stdout = if mode.is_json() {
        let effective: serde_json::Value = serde_json::from_str(to_pretty_json(config)?.trim())?;
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "configPath": path.map(|value| value.to_string_lossy().to_string()),
            "effectiveConfig": effective,
        }))?
    } else {
        to_pretty_toml(config)?
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

/// Print the JSON Schema accepted by `check --request`.
pub fn run_config_schema() -> Result<CliOutput, CliError> {
    let schema = serde_json::to_value(sort_request_schema())?;
    Ok(CliOutput {
        stdout: to_pretty_json_line(&schema)?,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
