use tx_core::{Session, Step, Test, TestConfiguration};

use crate::connection::generate_session_mappings;
use crate::placeholder::{resolve, PlaceholderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub generate_sessions: bool,
    pub substitute_placeholders: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            generate_sessions: true,
            substitute_placeholders: true,
        }
    }
}

pub fn export_runtime_test(
    test: &Test,
    config: &TestConfiguration,
    context: &PlaceholderContext,
    options: &ExportOptions,
) -> Test {
    let mut runtime = test.clone();

    if options.generate_sessions {
        runtime.sessions = generate_session_mappings(test, config);
    }

    if options.substitute_placeholders {
        for session in &mut runtime.sessions {
            substitute_session(session, context);
        }
        for step in runtime.all_steps_mut() {
            substitute_step(step, context);
        }
    }

    tracing::debug!(
        test = %runtime.id,
        sessions = runtime.sessions.len(),
        "exported runtime test"
    );
    runtime
}

fn substitute_optional(value: &mut Option<String>, context: &PlaceholderContext) {
    if let Some(text) = value.as_mut() {
        *text = resolve(text, context);
    }
}

fn substitute_session(session: &mut Session, context: &PlaceholderContext) {
    substitute_optional(&mut session.host, context);
    substitute_optional(&mut session.base_url, context);
    substitute_optional(&mut session.user, context);
    substitute_optional(&mut session.password, context);
    substitute_optional(&mut session.prompt, context);
}

fn substitute_step(step: &mut Step, context: &PlaceholderContext) {
    substitute_optional(&mut step.target, context);
    substitute_optional(&mut step.command, context);
    step.params = step.params.map_values(|value| resolve(value, context));
    step.headers = step.headers.map_values(|value| resolve(value, context));
    for extract in &mut step.extracts {
        extract.pattern = resolve(&extract.pattern, context);
        for check in &mut extract.checks {
            check.expect = resolve(&check.expect, context);
        }
    }
}
