use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tx_core::{Diagnostic, RuleName, Test};

use crate::paths::{located_steps, section_path, session_path, step_path};

const ID_FORMAT_FIX: &str = "Use only alphanumeric characters, underscores, and hyphens";

pub(crate) fn id_format_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("id format regex must compile"))
}

pub fn is_valid_id(id: &str) -> bool {
    id_format_regex().is_match(id)
}

pub fn check_structure(test: &Test) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if test.id.trim().is_empty() {
        diagnostics.push(Diagnostic::error(RuleName::RequiredField, "Test ID is required").at("test/@id"));
    } else if !is_valid_id(&test.id) {
        diagnostics.push(
            Diagnostic::error(
                RuleName::IdFormat,
                format!("Test ID '{}' contains invalid characters", test.id),
            )
            .at("test/@id")
            .with_fix(ID_FORMAT_FIX),
        );
    }

    let steps = located_steps(test);
    for located in &steps {
        if located.step.id.trim().is_empty() {
            diagnostics.push(
                Diagnostic::error(RuleName::RequiredField, "Step ID is required")
                    .at(format!("{}/@id", located.path)),
            );
        }
    }
    for id in duplicates(steps.iter().map(|located| located.step.id.as_str())) {
        diagnostics.push(
            Diagnostic::error(RuleName::UniqueId, format!("Duplicate step ID: '{id}'"))
                .at(step_path(id)),
        );
    }

    for section in &test.sections {
        if section.id.trim().is_empty() {
            diagnostics.push(
                Diagnostic::error(RuleName::RequiredField, "Section ID is required")
                    .at(format!("{}/@id", section_path(&section.id))),
            );
        }
    }
    for id in duplicates(test.sections.iter().map(|section| section.id.as_str())) {
        diagnostics.push(
            Diagnostic::error(RuleName::UniqueId, format!("Duplicate section ID: '{id}'"))
                .at(section_path(id)),
        );
    }

    for session in &test.sessions {
        if session.name.trim().is_empty() {
            diagnostics.push(
                Diagnostic::error(RuleName::RequiredField, "Session name is required")
                    .at(format!("{}/@name", session_path(&session.name))),
            );
        }
    }
    for name in duplicates(test.sessions.iter().map(|session| session.name.as_str())) {
        diagnostics.push(
            Diagnostic::error(
                RuleName::UniqueId,
                format!("Duplicate session name: '{name}'"),
            )
            .at(session_path(name)),
        );
    }

    diagnostics
}

pub(crate) fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut order = Vec::new();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values.filter(|value| !value.trim().is_empty()) {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    order
        .into_iter()
        .filter(|value| counts.get(value).copied().unwrap_or(0) > 1)
        .collect()
}
