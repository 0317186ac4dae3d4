//! Fields command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_pretty_json_line};
use crate::targets::TargetEntry;
use sortguard_domain::SortIntent;

/// Print the allowed sort values of a reference struct.
pub fn run_fields(mode: OutputMode, target: TargetEntry) -> Result<CliOutput, CliError> {
    let allowed = target.table.allowed_sort_values();
    let duplicates = allowed.duplicates();

    let stdout = if mode.is_json() {
        let fields = target
            .table
            .fields
            .iter()
            .map(|field| {
                serde_json::json!({
                    "name": field.name,
                    "sort": field.sort_tag,
                    "column": field.column_tag,
                    "value": field.sort_value(),
                })
            })
            .collect::<Vec<_>>();
        to_pretty_json_line(&serde_json::json!({
            "status": "ok",
            "target": target.name,
            "struct": target.table.name,
            "allowed": allowed,
            "duplicates": duplicates,
            "fields": fields,
        }))?
    } else {
        let mut out = format!("target: {} ({})\n", target.name, target.table.name);
        for field in target.table.fields {
            let shown = match (field.intent(), field.sort_value()) {
                (_, Some(value)) => value,
                (SortIntent::Default, None) => "(no column)".to_owned(),
                (_, None) => "(not sortable)".to_owned(),
            };
            out.push_str(&format!("  {}: {shown}\n", field.name));
        }
        out.push_str(&format!("allowed: {allowed}\n"));
        if !duplicates.is_empty() {
            out.push_str(&format!("duplicates: {}\n", duplicates.join(", ")));
        }
        out
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}
