//! Demo and check command handlers.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::targets::TargetEntry;
use sortguard_rules::{
    FieldError, FieldRef, IS_SORT_TAG, Inspect, Locale, ValidationContext, Validator,
};

/// Candidate sort value used when `demo` runs without `--value`.
pub const DEMO_SORT_VALUE: &str = "field_str1";

/// List query whose sort column is checked against a reference struct.
#[derive(Debug, Clone, Copy)]
pub struct ListQuery<'a> {
    pub cursor: &'a str,
    pub sort_field: &'a str,
}

impl Inspect for ListQuery<'_> {
    fn inspect(&self) -> Vec<FieldRef<'_>> {
        vec![
            FieldRef::new("Cursor", self.cursor, &[]),
            FieldRef::new("SortField", self.sort_field, &[IS_SORT_TAG]),
        ]
    }
}

/// How a rejected value maps to the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionPolicy {
    /// Print the errors and exit 0.
    Report,
    /// Print the errors and exit with [`ExitCode::InvalidInput`].
    Fail,
}

/// Inputs shared by `demo` and `check`.
#[derive(Debug, Clone, Copy)]
pub struct SortCheck<'a> {
    pub target: TargetEntry,
    pub value: &'a str,
    pub locale: Locale,
    pub policy: RejectionPolicy,
}

/// Validate one sort value and render the outcome.
pub fn run_sort_check(
    mode: OutputMode,
    validator: &Validator,
    check: SortCheck<'_>,
) -> Result<CliOutput, CliError> {
    let query = ListQuery {
        cursor: "",
        sort_field: check.value,
    };
    let context = ValidationContext::with_table(check.target.table);
    let translator = validator.translator(check.locale);

    if let Err(errors) = validator.validate_struct(&query, &context) {
        let failures = errors
            .iter()
            .map(|error| (error, translator.translate(error)))
            .collect::<Vec<_>>();
        let stdout = format_rejection(mode, &check, &failures)?;
        tracing::info!(
            target: "sortguard::cli",
            target_name = check.target.name,
            value = check.value,
            failures = errors.len(),
            "sort value rejected"
        );
        let exit_code = match check.policy {
            RejectionPolicy::Report => ExitCode::Ok,
            RejectionPolicy::Fail => ExitCode::InvalidInput,
        };
        return Ok(CliOutput {
            stdout,
            stderr: String::new(),
            exit_code,
        });
    }

    tracing::debug!(
        target: "sortguard::cli",
        target_name = check.target.name,
        value = check.value,
        "sort value accepted"
    );
    let message = check.locale.validation_passed();
    let stdout = if mode.is_json() {
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "target": check.target.name,
            "value": check.value,
            "message": message,
        }))?
    } else {
        format!("{message}\n")
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_rejection(
    mode: OutputMode,
    check: &SortCheck<'_>,
    failures: &[(&FieldError, String)],
) -> Result<String, CliError> {
    if !mode.is_json() {
        let mut out = String::new();
        for (_, message) in failures {
            out.push_str(message);
            out.push('\n');
        }
        return Ok(out);
    }

    let errors = failures
        .iter()
        .map(|(error, message)| {
            serde_json::json!({
                "field": error.field(),
                "tag": error.tag(),
                "value": error.value(),
                "message": message,
            })
        })
        .collect::<Vec<_>>();
    let payload = serde_json::json!({
        "status": "rejected",
        "target": check.target.name,
        "value": check.value,
        "allowed": check.target.table.allowed_sort_values(),
        "errors": errors,
    });
    Ok(to_pretty_json_line(&payload)?)
}
