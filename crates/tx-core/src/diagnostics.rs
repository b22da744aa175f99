use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleName {
    RequiredField,
    IdFormat,
    UniqueId,
    ReferenceIntegrity,
    UniqueExtractName,
    ConditionalRequired,
    ValueRange,
    RegexPattern,
    ExpectFormat,
    TargetMapping,
    PlaceholderResolution,
    #[serde(rename = "XSD")]
    Xsd,
}

impl RuleName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequiredField => "RequiredField",
            Self::IdFormat => "IdFormat",
            Self::UniqueId => "UniqueId",
            Self::ReferenceIntegrity => "ReferenceIntegrity",
            Self::UniqueExtractName => "UniqueExtractName",
            Self::ConditionalRequired => "ConditionalRequired",
            Self::ValueRange => "ValueRange",
            Self::RegexPattern => "RegexPattern",
            Self::ExpectFormat => "ExpectFormat",
            Self::TargetMapping => "TargetMapping",
            Self::PlaceholderResolution => "PlaceholderResolution",
            Self::Xsd => "XSD",
        }
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub element_path: Option<String>,
    pub rule_name: RuleName,
    pub suggested_fix: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, rule_name: RuleName, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            element_path: None,
            rule_name,
            suggested_fix: None,
        }
    }

    pub fn error(rule_name: RuleName, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, rule_name, message)
    }

    pub fn warning(rule_name: RuleName, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, rule_name, message)
    }

    pub fn info(rule_name: RuleName, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, rule_name, message)
    }

    pub fn at(mut self, element_path: impl Into<String>) -> Self {
        self.element_path = Some(element_path.into());
        self
    }

    pub fn with_fix(mut self, suggested_fix: impl Into<String>) -> Self {
        self.suggested_fix = Some(suggested_fix.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Warning)
    }

    /// Valid means no diagnostic has severity `Error`.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.by_severity(Severity::Warning)
    }

    pub fn by_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.severity == severity)
    }

    pub fn by_rule(&self, rule_name: RuleName) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |diagnostic| diagnostic.rule_name == rule_name)
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.by_severity(severity).count()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
