//! Check command implementation.
//!
//! Runs the same parse an import would, then reports anything that would
//! load but looks off.

use std::collections::BTreeMap;
use std::path::Path;

use medhist_lib::SavedDocument;
use medhist_lib::document::read_document;
use serde::Serialize;

use crate::cli::CheckArgs;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct CheckReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(path: &Path, report: &CheckReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("medhist check {}", path.display());
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

fn check_active_count(document: &SavedDocument, checks: &mut Vec<CheckResult>) {
    let counted = document.counted_active();
    if i64::try_from(counted).ok() == Some(document.active_count) {
        push_check(checks, "document.active_count", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "document.active_count",
            CheckStatus::Warn,
            Some(format!(
                "activeCount is {} but {counted} entries are active; loading uses {}",
                document.active_count, document.active_count
            )),
            Some(serde_json::json!({
                "declared": document.active_count,
                "counted": counted,
            })),
        );
    }
}

fn check_unique_ids(document: &SavedDocument, checks: &mut Vec<CheckResult>) {
    let mut seen: BTreeMap<u64, usize> = BTreeMap::new();
    for entry in &document.entries {
        *seen.entry(entry.id).or_default() += 1;
    }
    let duplicates: Vec<u64> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect();

    if duplicates.is_empty() {
        push_check(checks, "entries.ids", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "entries.ids",
            CheckStatus::Warn,
            Some(format!("Duplicate ids: {duplicates:?}; edits will touch every copy")),
            Some(serde_json::json!({ "duplicates": duplicates })),
        );
    }
}

fn check_inactive(document: &SavedDocument, checks: &mut Vec<CheckResult>) {
    let removed = document.entries.iter().filter(|e| !e.active).count();
    if removed == 0 {
        push_check(checks, "entries.inactive", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "entries.inactive",
            CheckStatus::Warn,
            Some(format!(
                "{removed} removed entries present; they load hidden"
            )),
            None,
        );
    }
}

fn build_report(path: &Path) -> CheckReport {
    let mut checks = Vec::new();

    match read_document(path) {
        Ok(document) => {
            push_check(
                &mut checks,
                "document.parse",
                CheckStatus::Ok,
                None,
                Some(serde_json::json!({
                    "entries": document.entries.len(),
                    "timestamp": document.timestamp,
                })),
            );
            check_active_count(&document, &mut checks);
            check_unique_ids(&document, &mut checks);
            check_inactive(&document, &mut checks);
        }
        Err(err) => {
            push_check(
                &mut checks,
                "document.parse",
                CheckStatus::Error,
                Some(err.to_string()),
                None,
            );
        }
    }

    CheckReport {
        ok: !has_error(&checks),
        checks,
    }
}

/// Execute the check command. Returns `false` when any check errors.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized.
pub fn execute(args: &CheckArgs, json: bool) -> Result<bool> {
    let report = build_report(&args.file);
    print_report(&args.file, &report, json)?;
    Ok(report.ok)
}
