use tx_core::{Diagnostic, RuleName, Test, TestConfiguration};
use tx_resolver::check_target_mappings;

use crate::paths::{located_steps, step_path};

pub fn check_connections(test: &Test, config: &TestConfiguration) -> Vec<Diagnostic> {
    let steps = located_steps(test);
    check_target_mappings(test, config)
        .into_iter()
        .map(|issue| {
            let path = steps
                .get(issue.step_index())
                .map(|located| located.path.clone())
                .unwrap_or_else(|| step_path(issue.step_id()));
            Diagnostic::error(RuleName::TargetMapping, issue.message())
                .at(format!("{path}/@target"))
                .with_fix(issue.suggested_fix())
        })
        .collect()
}
