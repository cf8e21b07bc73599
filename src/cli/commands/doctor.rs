//! Doctor command implementation.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{CliOverrides, Settings, user_config_path};
use crate::error::{AppError, Result};
use crate::format::OutputContext;
use crate::storage::SqliteCache;

#[derive(Debug, Clone, Serialize)]
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
struct DoctorReport {
    ok: bool,
    checked_at: DateTime<Utc>,
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

fn error_count(checks: &[CheckResult]) -> usize {
    checks
        .iter()
        .filter(|check| matches!(check.status, CheckStatus::Error))
        .count()
}

fn print_report(report: &DoctorReport, output: &OutputContext) -> Result<()> {
    if output.is_json() {
        return output.json(report);
    }

    output.line("nissue doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            output.line(&format!("{label} {}: {}", check.name, message));
        } else {
            output.line(&format!("{label} {}", check.name));
        }
    }
    Ok(())
}

fn check_settings(settings: &Settings, checks: &mut Vec<CheckResult>) {
    if settings.token.is_some() {
        push_check(checks, "config.token", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "config.token",
            CheckStatus::Error,
            Some(AppError::MissingToken.to_string()),
            None,
        );
    }

    match &settings.database_id {
        Some(id) => push_check(
            checks,
            "config.database_id",
            CheckStatus::Ok,
            Some(id.clone()),
            None,
        ),
        None => push_check(
            checks,
            "config.database_id",
            CheckStatus::Warn,
            Some("No default database; pass --db-id per command".to_string()),
            None,
        ),
    }
}

fn check_cache(path: &Path, checks: &mut Vec<CheckResult>) {
    let details = Some(serde_json::json!({ "path": path.display().to_string() }));
    if !path.exists() {
        push_check(
            checks,
            "cache",
            CheckStatus::Ok,
            Some("No cache file yet".to_string()),
            details,
        );
        return;
    }

    match SqliteCache::new(path).count() {
        Ok(entries) => push_check(
            checks,
            "cache",
            CheckStatus::Ok,
            Some(format!("{entries} cached schema(s)")),
            Some(serde_json::json!({
                "path": path.display().to_string(),
                "entries": entries
            })),
        ),
        Err(err) => push_check(
            checks,
            "cache",
            CheckStatus::Error,
            Some(format!("Unreadable cache (run `nissue maintenance`): {err}")),
            details,
        ),
    }
}

fn collect_checks(loaded: std::result::Result<Settings, AppError>) -> Vec<CheckResult> {
    let mut checks = Vec::new();
    let config_details = user_config_path()
        .map(|path| serde_json::json!({ "path": path.display().to_string() }));

    match loaded {
        Ok(settings) => {
            push_check(&mut checks, "config.load", CheckStatus::Ok, None, config_details);
            check_settings(&settings, &mut checks);
            check_cache(&settings.cache_path, &mut checks);
        }
        Err(err) => push_check(
            &mut checks,
            "config.load",
            CheckStatus::Error,
            Some(err.to_string()),
            config_details,
        ),
    }
    checks
}

/// Execute the doctor command.
///
/// # Errors
///
/// Returns `ChecksFailed` if any check reported an error, or an error if
/// the report cannot be serialized.
pub fn execute(overrides: &CliOverrides, output: &OutputContext) -> Result<()> {
    let checks = collect_checks(Settings::load(overrides));
    let failed = error_count(&checks);
    let report = DoctorReport {
        ok: failed == 0,
        checked_at: Utc::now(),
        checks,
    };
    print_report(&report, output)?;

    if failed > 0 {
        return Err(AppError::ChecksFailed { count: failed });
    }
    Ok(())
}
