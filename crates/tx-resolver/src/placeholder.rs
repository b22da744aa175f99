use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tx_core::TestConfiguration;

/// Value sources, highest priority first. Runtime locals and extracted values
/// together form the top tier; locals win between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceholderTier {
    RuntimeLocal,
    Extracted,
    Input,
    Variable,
    Constant,
    Configuration,
    Environment,
}

impl PlaceholderTier {
    pub const ALL: [PlaceholderTier; 7] = [
        Self::RuntimeLocal,
        Self::Extracted,
        Self::Input,
        Self::Variable,
        Self::Constant,
        Self::Configuration,
        Self::Environment,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

pub fn placeholder_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex must compile"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderContext {
    tiers: [BTreeMap<String, String>; 7],
}

impl PlaceholderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_configuration(config: &TestConfiguration) -> Self {
        let mut context = Self::new();
        for input in &config.inputs {
            context.set(PlaceholderTier::Input, &input.name, &input.value);
        }
        for variable in &config.variables {
            context.set(PlaceholderTier::Variable, &variable.name, &variable.value);
        }
        for constant in &config.constants {
            context.set(PlaceholderTier::Constant, &constant.name, &constant.value);
        }
        if let Some(log_directory) = &config.log_directory {
            context.set(PlaceholderTier::Configuration, "LogDirectory", log_directory);
        }
        if let Some(uut) = &config.uut {
            for (key, value) in uut.properties.iter() {
                context.set(PlaceholderTier::Configuration, format!("UUT.{key}"), value);
            }
        }
        context
    }

    pub fn from_process_env() -> Self {
        Self::new().with_process_environment()
    }

    pub fn with_process_environment(self) -> Self {
        self.with_environment(std::env::vars())
    }

    pub fn with_environment<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in vars {
            self.set(PlaceholderTier::Environment, name, value);
        }
        self
    }

    pub fn with_runtime_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(PlaceholderTier::RuntimeLocal, name, value);
        self
    }

    pub fn with_extracted_value(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set(PlaceholderTier::Extracted, name, value);
        self
    }

    pub fn with_value(
        mut self,
        tier: PlaceholderTier,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set(tier, name, value);
        self
    }

    pub fn set(&mut self, tier: PlaceholderTier, name: impl Into<String>, value: impl Into<String>) {
        self.tiers[tier.index()].insert(name.into(), value.into());
    }

    pub fn clear_tier(&mut self, tier: PlaceholderTier) {
        self.tiers[tier.index()].clear();
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.lookup_with_tier(name).map(|(_, value)| value)
    }

    pub fn lookup_with_tier(&self, name: &str) -> Option<(PlaceholderTier, &str)> {
        PlaceholderTier::ALL.into_iter().find_map(|tier| {
            self.tiers[tier.index()]
                .get(name)
                .map(|value| (tier, value.as_str()))
        })
    }
}

/// Substitutes every resolvable `${name}` in one pass. Unknown names are left
/// as written and substituted values are never rescanned.
pub fn resolve(text: &str, context: &PlaceholderContext) -> String {
    if text.is_empty() {
        return String::new();
    }
    placeholder_regex()
        .replace_all(text, |captures: &Captures<'_>| {
            let name = &captures[1];
            match context.lookup_with_tier(name) {
                Some((tier, value)) => {
                    tracing::trace!(placeholder = name, ?tier, "resolved placeholder");
                    value.to_string()
                }
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}

pub fn extract_placeholder_names(text: &str) -> BTreeSet<String> {
    placeholder_regex()
        .captures_iter(text)
        .map(|captures| captures[1].to_string())
        .collect()
}

pub fn unresolved_names(text: &str, context: &PlaceholderContext) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut unresolved = Vec::new();
    for captures in placeholder_regex().captures_iter(text) {
        let name = &captures[1];
        if context.lookup(name).is_some() || !seen.insert(name.to_string()) {
            continue;
        }
        unresolved.push(name.to_string());
    }
    unresolved
}

#[cfg(test)]
mod placeholder_tests {
    use super::*;
    use tx_core::{NamedValue, Uut};

    fn configuration() -> TestConfiguration {
        TestConfiguration {
            inputs: vec![NamedValue::new("HOST", "input-host")],
            variables: vec![
                NamedValue::new("HOST", "variable-host"),
                NamedValue::new("RETRIES", "3"),
            ],
            constants: vec![NamedValue::new("VERSION", "1.0")],
            log_directory: Some("/logs".to_string()),
            uut: Some(Uut {
                properties: [("Name", "DUT"), ("SerialNumber", "SN1")]
                    .into_iter()
                    .collect(),
            }),
            ..TestConfiguration::default()
        }
    }

    #[test]
    fn resolve_uses_highest_priority_tier() {
        let context = PlaceholderContext::from_configuration(&configuration())
            .with_environment([("HOST", "env-host"), ("HOME", "/root")]);
        assert_eq!(resolve("ssh ${HOST}", &context), "ssh input-host");
        assert_eq!(resolve("${HOME}", &context), "/root");
        assert_eq!(
            resolve("${UUT.SerialNumber} ${LogDirectory} ${VERSION}", &context),
            "SN1 /logs 1.0"
        );

        let context = context.with_runtime_value("HOST", "runtime-host");
        assert_eq!(
            context.lookup_with_tier("HOST"),
            Some((PlaceholderTier::RuntimeLocal, "runtime-host"))
        );
    }

    #[test]
    fn runtime_locals_shadow_extracted_values() {
        let context = PlaceholderContext::new()
            .with_extracted_value("kernel", "5.10")
            .with_runtime_value("kernel", "6.1");
        assert_eq!(resolve("${kernel}", &context), "6.1");
    }

    #[test]
    fn resolve_leaves_unknown_names_and_does_not_rescan() {
        let context = PlaceholderContext::new().with_runtime_value("A", "${B}");
        let context = context.with_runtime_value("B", "never");
        assert_eq!(resolve("${A} ${MISSING}", &context), "${B} ${MISSING}");
        assert_eq!(resolve("", &context), "");
        assert_eq!(resolve("no placeholders", &context), "no placeholders");
    }

    #[test]
    fn names_are_extracted_and_unresolved_ones_deduplicated() {
        let text = "${B} ${A} ${B} ${C} $x {y}";
        let names = extract_placeholder_names(text);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["A", "B", "C"]);

        let context = PlaceholderContext::new().with_value(PlaceholderTier::Constant, "A", "1");
        assert_eq!(unresolved_names(text, &context), vec!["B", "C"]);
        assert!(unresolved_names("", &context).is_empty());
    }

    #[test]
    fn clear_tier_drops_bindings() {
        let mut context = PlaceholderContext::new().with_runtime_value("x", "1");
        context.clear_tier(PlaceholderTier::RuntimeLocal);
        assert_eq!(context.lookup("x"), None);
    }
}
