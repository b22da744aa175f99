use serde::Serialize;
use tx_core::{Diagnostic, Session, TestXmlError, ValidationReport};

use crate::error_map::map_cli_json;

pub(crate) const EXIT_INVALID: i32 = 2;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    file: &'a str,
    valid: bool,
    error_count: usize,
    warning_count: usize,
    diagnostics: &'a [Diagnostic],
}

pub(crate) fn exit_code_for(report: &ValidationReport) -> i32 {
    if report.is_valid() {
        0
    } else {
        EXIT_INVALID
    }
}

pub(crate) fn validity_label(report: &ValidationReport) -> &'static str {
    if report.is_valid() {
        "VALID"
    } else {
        "INVALID"
    }
}

pub(crate) fn render_text(file: &str, report: &ValidationReport) -> String {
    let mut lines = vec![
        format!("RESULT:{}", validity_label(report)),
        format!("FILE:{file}"),
        format!("ERRORS:{}", report.errors().count()),
        format!("WARNINGS:{}", report.warnings().count()),
    ];
    for diagnostic in &report.diagnostics {
        lines.push(format!(
            "DIAG:{}:{}:{}:{}",
            diagnostic.severity,
            diagnostic.rule_name,
            diagnostic.element_path.as_deref().unwrap_or("-"),
            diagnostic.message
        ));
        if let Some(fix) = diagnostic.suggested_fix.as_deref() {
            lines.push(format!("FIX:{fix}"));
        }
    }
    lines.join("\n")
}

pub(crate) fn render_json(file: &str, report: &ValidationReport) -> Result<String, TestXmlError> {
    serde_json::to_string_pretty(&JsonReport {
        file,
        valid: report.is_valid(),
        error_count: report.errors().count(),
        warning_count: report.warnings().count(),
        diagnostics: &report.diagnostics,
    })
    .map_err(map_cli_json)
}

pub(crate) fn render_sessions(sessions: &[Session]) -> Result<String, TestXmlError> {
    let mut lines = vec![
        "RESULT:OK".to_string(),
        format!("SESSIONS:{}", sessions.len()),
    ];
    for session in sessions {
        lines.push(format!(
            "SESSION_JSON:{}",
            serde_json::to_string(session).map_err(map_cli_json)?
        ));
    }
    Ok(lines.join("\n"))
}
