use tx_core::{Diagnostic, RuleName, Test};
use tx_resolver::{unresolved_names, PlaceholderContext};

use crate::paths::{extract_path, located_steps};

pub fn check_placeholders(test: &Test, context: &PlaceholderContext) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for located in located_steps(test) {
        let step = located.step;
        let mut fields = Vec::new();
        if let Some(target) = step.target.as_deref() {
            fields.push((target, "step target", format!("{}/@target", located.path)));
        }
        if let Some(command) = step.command.as_deref() {
            fields.push((command, "step command", format!("{}/@command", located.path)));
        }
        for extract in &step.extracts {
            fields.push((
                extract.pattern.as_str(),
                "extract pattern",
                format!("{}/@pattern", extract_path(&located.path, &extract.name)),
            ));
        }

        for (text, label, path) in fields {
            for name in unresolved_names(text, context) {
                diagnostics.push(
                    Diagnostic::error(
                        RuleName::PlaceholderResolution,
                        format!("Unresolved placeholder '${{{name}}}' in {label}"),
                    )
                    .at(path.clone())
                    .with_fix(format!(
                        "Define '{name}' in inputs, variables, constants, or TestConfiguration"
                    )),
                );
            }
        }
    }

    diagnostics
}
