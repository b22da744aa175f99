mod business_rules;
mod connections;
mod expect;
mod paths;
mod placeholders;
mod references;
mod schema;
mod structural;

pub use business_rules::{check_business_rules, is_valid_pattern};
pub use connections::check_connections;
pub use expect::{is_valid_expect, parse_expect, CompareOp, ExpectError, Expectation, TextOp};
pub use placeholders::check_placeholders;
pub use references::check_references;
pub use schema::{parse_schema, schema_from_element, Schema, SchemaViolation, XS_NAMESPACE};
pub use structural::{check_structure, is_valid_id};

use tx_core::{Diagnostic, RuleName, Test, TestConfiguration, ValidationReport};
use tx_parser::parse_xml_document;
use tx_resolver::PlaceholderContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationOptions<'a> {
    pub configuration: Option<&'a TestConfiguration>,
    pub schema: Option<&'a str>,
    pub raw_document: Option<&'a str>,
    pub placeholder_context: Option<&'a PlaceholderContext>,
}

impl<'a> ValidationOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_configuration(mut self, configuration: &'a TestConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_schema(mut self, schema: &'a str) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_raw_document(mut self, raw_document: &'a str) -> Self {
        self.raw_document = Some(raw_document);
        self
    }

    pub fn with_placeholder_context(mut self, context: &'a PlaceholderContext) -> Self {
        self.placeholder_context = Some(context);
        self
    }
}

/// Runs every applicable pass and concatenates the findings in pass order:
/// structure, references, business rules, schema, connections, placeholders.
pub fn validate_test(test: &Test, options: &ValidationOptions<'_>) -> ValidationReport {
    let mut report = ValidationReport::new();

    run_pass(&mut report, "structure", check_structure(test));
    run_pass(&mut report, "references", check_references(test));
    run_pass(&mut report, "business_rules", check_business_rules(test));

    if let Some(schema) = options.schema {
        let diagnostics = match options.raw_document {
            Some(raw) => validate_document_against_schema(raw, schema),
            None => validate_document_against_schema(&tx_mapper::write_test(test), schema),
        };
        run_pass(&mut report, "schema", diagnostics);
    }

    if let Some(config) = options.configuration {
        run_pass(&mut report, "connections", check_connections(test, config));

        let built;
        let context = match options.placeholder_context {
            Some(context) => context,
            None => {
                built = PlaceholderContext::from_configuration(config).with_process_environment();
                &built
            }
        };
        run_pass(&mut report, "placeholders", check_placeholders(test, context));
    }

    tracing::debug!(
        test = %test.id,
        diagnostics = report.len(),
        valid = report.is_valid(),
        "validation finished"
    );
    report
}

fn run_pass(report: &mut ValidationReport, pass: &str, diagnostics: Vec<Diagnostic>) {
    tracing::debug!(pass, found = diagnostics.len(), "validation pass finished");
    report.extend(diagnostics);
}

pub fn validate_document_against_schema(xml: &str, xsd: &str) -> Vec<Diagnostic> {
    let schema = match parse_schema(xsd) {
        Ok(schema) => schema,
        Err(error) => return vec![schema_failure(&error.message)],
    };
    let document = match parse_xml_document(xml) {
        Ok(document) => document,
        Err(error) => return vec![schema_failure(&error.message)],
    };
    schema
        .validate(&document.root)
        .into_iter()
        .map(|violation| Diagnostic::error(RuleName::Xsd, violation.message).at(violation.path))
        .collect()
}

fn schema_failure(message: &str) -> Diagnostic {
    Diagnostic::error(RuleName::Xsd, format!("XSD validation failed: {message}"))
}
