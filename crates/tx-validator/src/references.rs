use std::collections::BTreeSet;

use tx_core::{Diagnostic, RefMode, RuleName, Test};

use crate::paths::{extract_path, located_steps, section_path};
use crate::structural::duplicates;

pub fn check_references(test: &Test) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let steps = located_steps(test);

    let step_ids: BTreeSet<&str> = steps.iter().map(|located| located.step.id.as_str()).collect();
    let step_aliases: BTreeSet<&str> = steps
        .iter()
        .filter_map(|located| located.step.alias.as_deref())
        .filter(|alias| !alias.is_empty())
        .collect();
    let section_ids: BTreeSet<&str> = test
        .sections
        .iter()
        .map(|section| section.id.as_str())
        .collect();

    for section in &test.sections {
        let path = section_path(&section.id);

        for (attribute, link) in [
            ("passNext", &section.pass_next),
            ("failNext", &section.fail_next),
            ("retestPoint", &section.retest_point),
        ] {
            let Some(target) = link.as_deref().filter(|target| !target.is_empty()) else {
                continue;
            };
            if !section_ids.contains(target) {
                diagnostics.push(
                    Diagnostic::error(
                        RuleName::ReferenceIntegrity,
                        format!(
                            "Section '{}' {attribute} references unknown section '{target}'",
                            section.id
                        ),
                    )
                    .at(format!("{path}/@{attribute}")),
                );
            }
        }

        for reference in &section.refs {
            let ref_path = format!("{path}/refs/ref[@step='{}']", reference.step);
            let (known, label) = match reference.effective_mode() {
                RefMode::Id => (step_ids.contains(reference.step.as_str()), "step ID"),
                RefMode::Alias => (step_aliases.contains(reference.step.as_str()), "step alias"),
            };
            if !known {
                diagnostics.push(
                    Diagnostic::error(
                        RuleName::ReferenceIntegrity,
                        format!(
                            "Section '{}' references unknown {label} '{}'",
                            section.id, reference.step
                        ),
                    )
                    .at(ref_path),
                );
            }
        }
    }

    for located in &steps {
        let step = located.step;
        for name in duplicates(step.extracts.iter().map(|extract| extract.name.as_str())) {
            diagnostics.push(
                Diagnostic::error(
                    RuleName::UniqueExtractName,
                    format!("Duplicate extract name '{name}' in step '{}'", step.id),
                )
                .at(extract_path(&located.path, name)),
            );
        }

        let extract_names: BTreeSet<&str> = step
            .extracts
            .iter()
            .map(|extract| extract.name.as_str())
            .collect();
        for extract in &step.extracts {
            for check in &extract.checks {
                if extract_names.contains(check.source_ref.as_str()) {
                    continue;
                }
                diagnostics.push(
                    Diagnostic::error(
                        RuleName::ReferenceIntegrity,
                        format!(
                            "Check references unknown extract '{}' in step '{}'",
                            check.source_ref, step.id
                        ),
                    )
                    .at(format!(
                        "{}/checks/check[@sourceRef='{}']",
                        extract_path(&located.path, &extract.name),
                        check.source_ref
                    )),
                );
            }
        }
    }

    diagnostics
}

#[cfg(test)]
mod references_tests {
    use super::*;
    use tx_core::{Check, Extract, Ref, Section, Step};

    fn rules_and_messages(test: &Test) -> Vec<(RuleName, String)> {
        check_references(test)
            .into_iter()
            .map(|diagnostic| (diagnostic.rule_name, diagnostic.message))
            .collect()
    }

    #[test]
    fn section_links_must_name_existing_sections() {
        let mut test = Test::new("T1");
        let mut first = Section::new("S1");
        first.pass_next = Some("S2".to_string());
        first.fail_next = Some("GONE".to_string());
        first.retest_point = Some("S9".to_string());
        test.sections.push(first);
        test.sections.push(Section::new("S2"));

        let diagnostics = check_references(&test);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            "Section 'S1' failNext references unknown section 'GONE'"
        );
        assert_eq!(
            diagnostics[0].element_path.as_deref(),
            Some("sections/section[@id='S1']/@failNext")
        );
        assert!(diagnostics[1].message.contains("retestPoint"));
    }

    #[test]
    fn refs_resolve_by_id_or_alias() {
        let mut test = Test::new("T1");
        test.steps.push(Step {
            alias: Some("boot".to_string()),
            ..Step::new("step1")
        });
        let mut section = Section::new("S1");
        section.refs.push(Ref::by_id("step1"));
        section.refs.push(Ref::by_alias("boot"));
        section.refs.push(Ref::by_id("boot"));
        section.refs.push(Ref::by_alias("step1"));
        test.sections.push(section);

        assert_eq!(
            rules_and_messages(&test),
            vec![
                (
                    RuleName::ReferenceIntegrity,
                    "Section 'S1' references unknown step ID 'boot'".to_string()
                ),
                (
                    RuleName::ReferenceIntegrity,
                    "Section 'S1' references unknown step alias 'step1'".to_string()
                ),
            ]
        );
    }

    #[test]
    fn refs_can_point_at_section_owned_steps() {
        let mut test = Test::new("T1");
        let mut section = Section::new("S1");
        section.steps.push(Step::new("inner"));
        section.refs.push(Ref::by_id("inner"));
        test.sections.push(section);
        assert!(check_references(&test).is_empty());
    }

    #[test]
    fn extract_names_and_check_sources_are_checked_per_step() {
        let mut step = Step::new("step1");
        let mut first = Extract::new("value", "(\\d+)");
        first.checks.push(Check::new("value", "GE:1"));
        first.checks.push(Check::new("other", "GE:1"));
        step.extracts.push(first);
        step.extracts.push(Extract::new("value", "x"));
        step.extracts.push(Extract::new("value", "y"));
        let mut test = Test::new("T1");
        test.steps.push(step);

        assert_eq!(
            rules_and_messages(&test),
            vec![
                (
                    RuleName::UniqueExtractName,
                    "Duplicate extract name 'value' in step 'step1'".to_string()
                ),
                (
                    RuleName::ReferenceIntegrity,
                    "Check references unknown extract 'other' in step 'step1'".to_string()
                ),
            ]
        );
    }
}
