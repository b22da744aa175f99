use tx_core::{Step, Test};

pub(crate) struct LocatedStep<'a> {
    pub step: &'a Step,
    pub path: String,
}

pub(crate) fn step_path(step_id: &str) -> String {
    format!("steps/step[@id='{step_id}']")
}

pub(crate) fn section_path(section_id: &str) -> String {
    format!("sections/section[@id='{section_id}']")
}

pub(crate) fn section_step_path(section_id: &str, step_id: &str) -> String {
    format!("{}/step[@id='{step_id}']", section_path(section_id))
}

pub(crate) fn session_path(name: &str) -> String {
    format!("sessions/session[@name='{name}']")
}

pub(crate) fn extract_path(step_path: &str, extract_name: &str) -> String {
    format!("{step_path}/extracts/extract[@name='{extract_name}']")
}

pub(crate) fn located_steps(test: &Test) -> Vec<LocatedStep<'_>> {
    let top_level = test.steps.iter().map(|step| LocatedStep {
        step,
        path: step_path(&step.id),
    });
    let owned = test.sections.iter().flat_map(|section| {
        section.steps.iter().map(move |step| LocatedStep {
            step,
            path: section_step_path(&section.id, &step.id),
        })
    });
    top_level.chain(owned).collect()
}

#[cfg(test)]
mod paths_tests {
    use super::*;
    use tx_core::Section;

    #[test]
    fn located_steps_use_owner_specific_paths() {
        let mut test = Test::new("T");
        test.steps.push(Step::new("a"));
        let mut section = Section::new("S1");
        section.steps.push(Step::new("b"));
        test.sections.push(section);

        let paths = located_steps(&test)
            .into_iter()
            .map(|located| located.path)
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![
                "steps/step[@id='a']".to_string(),
                "sections/section[@id='S1']/step[@id='b']".to_string(),
            ]
        );
        assert_eq!(
            extract_path("steps/step[@id='a']", "x"),
            "steps/step[@id='a']/extracts/extract[@name='x']"
        );
    }
}
