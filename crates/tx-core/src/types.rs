use std::fmt;

use serde::{Deserialize, Serialize};

use crate::property::PropertyMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn synthetic() -> Self {
        Self {
            start: SourceLocation { line: 1, column: 1 },
            end: SourceLocation { line: 1, column: 1 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetType {
    Ssh,
    Http,
    Telnet,
    Manual,
}

impl TargetType {
    pub const ALL: [TargetType; 4] = [Self::Ssh, Self::Http, Self::Telnet, Self::Manual];

    pub fn parse_xml(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_xml_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn as_xml_str(self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Http => "http",
            Self::Telnet => "telnet",
            Self::Manual => "manual",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ssh => "Ssh",
            Self::Http => "Http",
            Self::Telnet => "Telnet",
            Self::Manual => "Manual",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Delete,
        Self::Patch,
        Self::Head,
        Self::Options,
    ];

    pub fn parse_xml(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_xml_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn as_xml_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    #[default]
    Serial,
    Manual,
    Final,
    Cleanup,
}

impl SectionType {
    pub const ALL: [SectionType; 4] = [Self::Serial, Self::Manual, Self::Final, Self::Cleanup];

    pub fn parse_xml(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_xml_str().eq_ignore_ascii_case(raw.trim()))
    }

    pub fn as_xml_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Manual => "manual",
            Self::Final => "final",
            Self::Cleanup => "cleanup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RefMode {
    #[default]
    Id,
    Alias,
}

impl RefMode {
    pub fn parse_xml(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "alias" => Some(Self::Alias),
            _ => None,
        }
    }

    pub fn as_xml_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Alias => "alias",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    pub id: String,
    pub alias: Option<String>,
    pub namespace: Option<String>,
    pub meta: PropertyMap,
    pub description: Option<String>,
    pub display_order: Option<i32>,
    pub sessions: Vec<Session>,
    pub config: PropertyMap,
    pub functions: PropertyMap,
    pub steps: Vec<Step>,
    pub test_groups: Vec<TestGroup>,
    pub sections: Vec<Section>,
}

impl Test {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn all_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps
            .iter()
            .chain(self.sections.iter().flat_map(|section| section.steps.iter()))
    }

    pub fn all_steps_mut(&mut self) -> impl Iterator<Item = &mut Step> {
        self.steps.iter_mut().chain(
            self.sections
                .iter_mut()
                .flat_map(|section| section.steps.iter_mut()),
        )
    }

    pub fn find_step(&self, id: &str) -> Option<&Step> {
        self.all_steps().find(|step| step.id == id)
    }

    pub fn find_section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    #[serde(rename = "type")]
    pub session_type: TargetType,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub base_url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub prompt: Option<String>,
}

impl Session {
    pub fn new(name: impl Into<String>, session_type: TargetType) -> Self {
        Self {
            name: name.into(),
            session_type,
            host: None,
            port: None,
            base_url: None,
            user: None,
            password: None,
            prompt: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub id: String,
    pub alias: Option<String>,
    pub target: Option<String>,
    pub target_type: Option<TargetType>,
    pub timeout: Option<i64>,
    pub method: Option<HttpMethod>,
    pub command: Option<String>,
    pub params: PropertyMap,
    pub headers: PropertyMap,
    pub extracts: Vec<Extract>,
    pub interaction: PropertyMap,
}

impl Step {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>, target_type: TargetType) -> Self {
        self.target = Some(target.into());
        self.target_type = Some(target_type);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extract {
    pub name: String,
    pub pattern: String,
    pub options: Option<String>,
    pub checks: Vec<Check>,
}

impl Extract {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Check {
    pub source_ref: String,
    pub expect: String,
}

impl Check {
    pub fn new(source_ref: impl Into<String>, expect: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            expect: expect.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TestGroup {
    pub name: String,
    pub properties: PropertyMap,
}

impl TestGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: PropertyMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub alias: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub section_type: Option<SectionType>,
    pub fail_continue: Option<bool>,
    pub retry_count: Option<u32>,
    pub retest_point: Option<String>,
    pub pass_next: Option<String>,
    pub fail_next: Option<String>,
    pub steps: Vec<Step>,
    pub refs: Vec<Ref>,
}

impl Section {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn effective_type(&self) -> SectionType {
        self.section_type.unwrap_or_default()
    }

    pub fn effective_fail_continue(&self) -> bool {
        self.fail_continue.unwrap_or(false)
    }

    pub fn effective_retry_count(&self) -> u32 {
        self.retry_count.unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    pub step: String,
    pub mode: Option<RefMode>,
}

impl Ref {
    pub fn by_id(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            mode: None,
        }
    }

    pub fn by_alias(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            mode: Some(RefMode::Alias),
        }
    }

    pub fn effective_mode(&self) -> RefMode {
        self.mode.unwrap_or_default()
    }
}

#[cfg(test)]
mod types_tests {
    use super::*;

    #[test]
    fn enum_parsing_is_case_insensitive() {
        assert_eq!(TargetType::parse_xml("SSH"), Some(TargetType::Ssh));
        assert_eq!(TargetType::parse_xml(" http "), Some(TargetType::Http));
        assert_eq!(TargetType::parse_xml("serial"), None);
        assert_eq!(HttpMethod::parse_xml("post"), Some(HttpMethod::Post));
        assert_eq!(SectionType::parse_xml("Cleanup"), Some(SectionType::Cleanup));
        assert_eq!(RefMode::parse_xml("ALIAS"), Some(RefMode::Alias));
        assert_eq!(RefMode::parse_xml("name"), None);
    }

    #[test]
    fn target_type_display_uses_pascal_case() {
        assert_eq!(TargetType::Telnet.to_string(), "Telnet");
        assert_eq!(TargetType::Telnet.as_xml_str(), "telnet");
    }

    #[test]
    fn all_steps_walks_top_level_then_sections() {
        let mut test = Test::new("T1");
        test.steps.push(Step::new("a"));
        let mut section = Section::new("S1");
        section.steps.push(Step::new("b"));
        test.sections.push(section);

        let ids = test.all_steps().map(|step| step.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(test.find_step("b").is_some());
        assert!(test.find_section("S1").is_some());

        for step in test.all_steps_mut() {
            step.timeout = Some(5);
        }
        assert!(test.all_steps().all(|step| step.timeout == Some(5)));
    }

    #[test]
    fn optional_section_fields_have_effective_defaults() {
        let section = Section::new("S1");
        assert_eq!(section.effective_type(), SectionType::Serial);
        assert!(!section.effective_fail_continue());
        assert_eq!(section.effective_retry_count(), 0);
        assert_eq!(Ref::by_id("x").effective_mode(), RefMode::Id);
        assert_eq!(Ref::by_alias("x").effective_mode(), RefMode::Alias);
    }
}
