use regex::Regex;
use tx_core::{Diagnostic, RuleName, TargetType, Test};
use tx_resolver::placeholder_regex;

use crate::expect::is_valid_expect;
use crate::paths::{extract_path, located_steps, session_path};

const REGEX_FIX: &str = "Ensure the pattern is a valid regular expression";
const EXPECT_FIX: &str = "Use format: 'REGEX:pattern', 'GE|LE|GT|LT|EQ|NE:number', 'CONTAINS|STARTS|ENDS:text', or literal text";

pub fn is_valid_pattern(pattern: &str) -> bool {
    let literal = placeholder_regex().replace_all(pattern, "placeholder");
    Regex::new(&literal).is_ok()
}

pub fn check_business_rules(test: &Test) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for session in &test.sessions {
        let path = session_path(&session.name);
        let required: &[(&str, bool)] = match session.session_type {
            TargetType::Ssh | TargetType::Telnet => &[
                ("host", session.host.as_deref().is_some_and(|host| !host.is_empty())),
                ("port", session.port.is_some()),
            ],
            TargetType::Http => &[(
                "baseUrl",
                session.base_url.as_deref().is_some_and(|url| !url.is_empty()),
            )],
            TargetType::Manual => &[],
        };
        for (attribute, present) in required {
            if *present {
                continue;
            }
            diagnostics.push(
                Diagnostic::error(
                    RuleName::ConditionalRequired,
                    format!(
                        "{} session '{}' must specify {attribute}",
                        session.session_type, session.name
                    ),
                )
                .at(format!("{path}/@{attribute}")),
            );
        }
    }

    for located in located_steps(test) {
        let step = located.step;
        let path = &located.path;

        if step.target_type == Some(TargetType::Http) && step.method.is_none() {
            diagnostics.push(
                Diagnostic::error(
                    RuleName::ConditionalRequired,
                    format!("HTTP step '{}' must specify method", step.id),
                )
                .at(format!("{path}/@method")),
            );
        }

        if step.timeout.is_some_and(|timeout| timeout < 0) {
            diagnostics.push(
                Diagnostic::error(
                    RuleName::ValueRange,
                    format!("Step '{}' timeout must be non-negative", step.id),
                )
                .at(format!("{path}/@timeout")),
            );
        }

        for extract in &step.extracts {
            let extract_path = extract_path(path, &extract.name);
            if !is_valid_pattern(&extract.pattern) {
                diagnostics.push(
                    Diagnostic::error(
                        RuleName::RegexPattern,
                        format!("Extract '{}' pattern is not a valid regex", extract.name),
                    )
                    .at(format!("{extract_path}/@pattern"))
                    .with_fix(REGEX_FIX),
                );
            }

            for check in &extract.checks {
                if is_valid_expect(&check.expect) {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::error(
                        RuleName::ExpectFormat,
                        format!("Check expect value '{}' has invalid format", check.expect),
                    )
                    .at(format!(
                        "{extract_path}/checks/check[@expect='{}']",
                        check.expect
                    ))
                    .with_fix(EXPECT_FIX),
                );
            }
        }
    }

    diagnostics
}
