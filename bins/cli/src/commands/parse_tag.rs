//! Parse-tag command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use sortguard_domain::TagSettings;

/// Parse a raw field tag and print its settings.
pub fn run_parse_tag(mode: OutputMode, raw: &str, separator: char) -> Result<CliOutput, CliError> {
    let settings = TagSettings::parse(raw, separator);
    tracing::debug!(
        target: "sortguard::cli",
        raw,
        %separator,
        settings = settings.len(),
        "tag parsed"
    );

    let stdout = if mode.is_json() {
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "settings": settings,
            "column": settings.column(),
        }))?
    } else {
        let mut out = String::new();
        for (key, value) in &settings {
            out.push_str(&format!("{key}: {value}\n"));
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
