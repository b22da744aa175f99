use std::collections::BTreeMap;

use tx_core::{Session, Test, TestConfiguration, TestXmlError, ValidationReport};
use tx_mapper::{parse_configuration, parse_test, write_configuration, write_test};
use tx_resolver::{export_runtime_test, generate_session_mappings, ExportOptions, PlaceholderContext};
use tx_validator::{validate_test, ValidationOptions};

#[derive(Debug, Clone, Default)]
pub struct ValidateTestXmlOptions {
    pub test_xml: String,
    pub configuration_xml: Option<String>,
    pub schema_xml: Option<String>,
    pub environment: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default)]
pub struct ExportRuntimeXmlOptions {
    pub test_xml: String,
    pub configuration_xml: String,
    pub environment: Option<BTreeMap<String, String>>,
    pub export: ExportOptions,
}

pub fn load_test_from_xml(xml: &str) -> Result<Test, TestXmlError> {
    parse_test(xml)
}

pub fn save_test_to_xml(test: &Test) -> String {
    write_test(test)
}

pub fn load_configuration_from_xml(xml: &str) -> Result<TestConfiguration, TestXmlError> {
    parse_configuration(xml)
}

pub fn save_configuration_to_xml(config: &TestConfiguration) -> String {
    write_configuration(config)
}

pub fn format_test_xml(xml: &str) -> Result<String, TestXmlError> {
    Ok(save_test_to_xml(&load_test_from_xml(xml)?))
}

pub fn format_configuration_xml(xml: &str) -> Result<String, TestXmlError> {
    Ok(save_configuration_to_xml(&load_configuration_from_xml(xml)?))
}

pub fn placeholder_context_for(
    config: &TestConfiguration,
    environment: Option<&BTreeMap<String, String>>,
) -> PlaceholderContext {
    let context = PlaceholderContext::from_configuration(config);
    match environment {
        Some(vars) => context.with_environment(vars.iter().map(|(name, value)| (name.as_str(), value.as_str()))),
        None => context.with_process_environment(),
    }
}

pub fn validate_test_xml(options: &ValidateTestXmlOptions) -> Result<ValidationReport, TestXmlError> {
    let test = load_test_from_xml(&options.test_xml)?;
    let config = options
        .configuration_xml
        .as_deref()
        .map(load_configuration_from_xml)
        .transpose()?;
    let context = config
        .as_ref()
        .map(|config| placeholder_context_for(config, options.environment.as_ref()));

    let mut validation = ValidationOptions::new().with_raw_document(&options.test_xml);
    if let Some(config) = config.as_ref() {
        validation = validation.with_configuration(config);
    }
    if let Some(context) = context.as_ref() {
        validation = validation.with_placeholder_context(context);
    }
    if let Some(schema) = options.schema_xml.as_deref() {
        validation = validation.with_schema(schema);
    }

    let report = validate_test(&test, &validation);
    tracing::debug!(
        test = %test.id,
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validated test xml"
    );
    Ok(report)
}

pub fn export_runtime_xml(options: &ExportRuntimeXmlOptions) -> Result<String, TestXmlError> {
    let test = load_test_from_xml(&options.test_xml)?;
    let config = load_configuration_from_xml(&options.configuration_xml)?;
    let context = placeholder_context_for(&config, options.environment.as_ref());
    let runtime = export_runtime_test(&test, &config, &context, &options.export);
    Ok(save_test_to_xml(&runtime))
}

pub fn generate_sessions_from_xml(
    test_xml: &str,
    configuration_xml: &str,
) -> Result<Vec<Session>, TestXmlError> {
    let test = load_test_from_xml(test_xml)?;
    let config = load_configuration_from_xml(configuration_xml)?;
    Ok(generate_session_mappings(&test, &config))
}
