use std::collections::BTreeMap;

use regex::Regex;
use tx_core::TestXmlError;
use tx_parser::{parse_xml_document, XmlElementNode};

pub const XS_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

const SCHEMA_PARSE_ERROR: &str = "SCHEMA_PARSE_ERROR";
const MAX_REF_DEPTH: usize = 16;

#[derive(Debug, Clone, Default)]
pub struct Schema {
    elements: BTreeMap<String, ElementDecl>,
    complex_types: BTreeMap<String, ComplexType>,
    simple_types: BTreeMap<String, SimpleType>,
}

#[derive(Debug, Clone)]
struct ElementDecl {
    name: String,
    kind: ElementKind,
}

#[derive(Debug, Clone)]
enum ElementKind {
    Ref(String),
    TypeName(String),
    Complex(ComplexType),
    Simple(SimpleType),
    Any,
}

#[derive(Debug, Clone)]
struct Particle {
    decl: ElementDecl,
    min: u32,
    max: Option<u32>,
}

#[derive(Debug, Clone, Default)]
struct ComplexType {
    children: Vec<Particle>,
    any_children: bool,
    attributes: Vec<AttributeDecl>,
    any_attribute: bool,
    text: TextRule,
}

#[derive(Debug, Clone)]
struct AttributeDecl {
    name: String,
    required: bool,
    value_type: ValueType,
}

#[derive(Debug, Clone, Default)]
enum TextRule {
    #[default]
    None,
    Any,
    Typed(ValueType),
}

#[derive(Debug, Clone)]
enum ValueType {
    Any,
    Named(String),
    Inline(SimpleType),
}

#[derive(Debug, Clone, Default)]
struct SimpleType {
    base: Option<String>,
    enumeration: Vec<String>,
    patterns: Vec<Regex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    pub message: String,
    pub path: String,
}

enum Resolved<'a> {
    Any,
    Complex(&'a ComplexType),
    Simple(&'a SimpleType),
    Builtin(&'a str),
}

fn schema_error(message: impl Into<String>) -> TestXmlError {
    TestXmlError::new(SCHEMA_PARSE_ERROR, message)
}

fn is_xs(node: &XmlElementNode, name: &str) -> bool {
    node.name == name && node.namespace.as_deref() == Some(XS_NAMESPACE)
}

fn xs_children(node: &XmlElementNode) -> impl Iterator<Item = &XmlElementNode> {
    node.element_children()
        .filter(|child| child.namespace.as_deref() == Some(XS_NAMESPACE))
}

fn local_name(qname: &str) -> &str {
    qname.rsplit_once(':').map_or(qname, |(_, local)| local)
}

fn is_builtin_prefix(qname: &str) -> bool {
    matches!(qname.split_once(':'), Some(("xs" | "xsd", _)))
}

fn parse_occurs(node: &XmlElementNode) -> Result<(u32, Option<u32>), TestXmlError> {
    let min = match node.attr("minOccurs") {
        None => 1,
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| schema_error(format!("Invalid minOccurs value '{raw}'")))?,
    };
    let max = match node.attr("maxOccurs") {
        None => Some(1),
        Some("unbounded") => None,
        Some(raw) => Some(
            raw.trim()
                .parse::<u32>()
                .map_err(|_| schema_error(format!("Invalid maxOccurs value '{raw}'")))?,
        ),
    };
    Ok((min, max))
}

pub fn parse_schema(source: &str) -> Result<Schema, TestXmlError> {
    let document = parse_xml_document(source)
        .map_err(|error| schema_error(error.message))?;
    schema_from_element(&document.root)
}

pub fn schema_from_element(root: &XmlElementNode) -> Result<Schema, TestXmlError> {
    if !is_xs(root, "schema") {
        return Err(schema_error(format!(
            "Expected xs:schema root element, found '{}'",
            root.name
        )));
    }

    let mut schema = Schema::default();
    for child in xs_children(root) {
        match child.name.as_str() {
            "element" => {
                let decl = parse_element_decl(child)?;
                schema.elements.insert(decl.name.clone(), decl);
            }
            "complexType" => {
                let name = child
                    .attr("name")
                    .ok_or_else(|| schema_error("Global xs:complexType requires a name"))?;
                schema
                    .complex_types
                    .insert(name.to_string(), parse_complex_type(child)?);
            }
            "simpleType" => {
                let name = child
                    .attr("name")
                    .ok_or_else(|| schema_error("Global xs:simpleType requires a name"))?;
                schema
                    .simple_types
                    .insert(name.to_string(), parse_simple_type(child)?);
            }
            "annotation" => {}
            other => tracing::warn!(construct = other, "unsupported top-level schema construct skipped"),
        }
    }

    tracing::debug!(
        elements = schema.elements.len(),
        complex_types = schema.complex_types.len(),
        simple_types = schema.simple_types.len(),
        "parsed schema"
    );
    Ok(schema)
}

fn parse_element_decl(node: &XmlElementNode) -> Result<ElementDecl, TestXmlError> {
    if let Some(reference) = node.attr("ref") {
        let name = local_name(reference).to_string();
        return Ok(ElementDecl {
            kind: ElementKind::Ref(name.clone()),
            name,
        });
    }
    let name = node
        .attr("name")
        .ok_or_else(|| schema_error("xs:element requires a name or ref attribute"))?
        .to_string();

    let kind = if let Some(type_name) = node.attr("type") {
        ElementKind::TypeName(type_name.to_string())
    } else if let Some(complex) = xs_children(node).find(|child| child.name == "complexType") {
        ElementKind::Complex(parse_complex_type(complex)?)
    } else if let Some(simple) = xs_children(node).find(|child| child.name == "simpleType") {
        ElementKind::Simple(parse_simple_type(simple)?)
    } else {
        ElementKind::Any
    };
    Ok(ElementDecl { name, kind })
}

fn parse_complex_type(node: &XmlElementNode) -> Result<ComplexType, TestXmlError> {
    let mut complex = ComplexType::default();
    if node.attr("mixed") == Some("true") {
        complex.text = TextRule::Any;
    }

    for child in xs_children(node) {
        match child.name.as_str() {
            "sequence" | "choice" | "all" => collect_particles(child, false, false, &mut complex)?,
            "attribute" => complex.attributes.push(parse_attribute(child)?),
            "anyAttribute" => complex.any_attribute = true,
            "simpleContent" => parse_simple_content(child, &mut complex)?,
            "annotation" => {}
            other => {
                tracing::warn!(construct = other, "unsupported complexType content treated as open");
                complex.any_children = true;
                complex.any_attribute = true;
                complex.text = TextRule::Any;
            }
        }
    }
    Ok(complex)
}

fn parse_simple_content(node: &XmlElementNode, complex: &mut ComplexType) -> Result<(), TestXmlError> {
    let Some(derivation) = xs_children(node).find(|child| matches!(child.name.as_str(), "extension" | "restriction")) else {
        complex.text = TextRule::Any;
        return Ok(());
    };
    complex.text = match derivation.attr("base") {
        Some(base) => TextRule::Typed(ValueType::Named(base.to_string())),
        None => TextRule::Any,
    };
    for child in xs_children(derivation) {
        match child.name.as_str() {
            "attribute" => complex.attributes.push(parse_attribute(child)?),
            "anyAttribute" => complex.any_attribute = true,
            "annotation" => {}
            other => tracing::warn!(construct = other, "unsupported simpleContent construct skipped"),
        }
    }
    Ok(())
}

fn collect_particles(
    group: &XmlElementNode,
    optional: bool,
    repeating: bool,
    complex: &mut ComplexType,
) -> Result<(), TestXmlError> {
    let (group_min, group_max) = parse_occurs(group)?;
    let optional = optional || group_min == 0 || group.name == "choice";
    let repeating = repeating || group_max != Some(1);

    for child in xs_children(group) {
        match child.name.as_str() {
            "element" => {
                let decl = parse_element_decl(child)?;
                let (min, max) = parse_occurs(child)?;
                let min = if optional { 0 } else { min };
                let max = if repeating { None } else { max };
                add_particle(complex, Particle { decl, min, max });
            }
            "sequence" | "choice" | "all" => collect_particles(child, optional, repeating, complex)?,
            "any" => complex.any_children = true,
            "annotation" => {}
            other => {
                tracing::warn!(construct = other, "unsupported model group content treated as open");
                complex.any_children = true;
            }
        }
    }
    Ok(())
}

fn add_particle(complex: &mut ComplexType, particle: Particle) {
    match complex
        .children
        .iter_mut()
        .find(|existing| existing.decl.name == particle.decl.name)
    {
        Some(existing) => {
            existing.min = existing.min.saturating_add(particle.min);
            existing.max = existing
                .max
                .zip(particle.max)
                .map(|(a, b)| a.saturating_add(b));
        }
        None => complex.children.push(particle),
    }
}

fn parse_attribute(node: &XmlElementNode) -> Result<AttributeDecl, TestXmlError> {
    let name = match (node.attr("name"), node.attr("ref")) {
        (Some(name), _) => name.to_string(),
        (None, Some(reference)) => local_name(reference).to_string(),
        (None, None) => return Err(schema_error("xs:attribute requires a name or ref attribute")),
    };
    let value_type = if let Some(type_name) = node.attr("type") {
        ValueType::Named(type_name.to_string())
    } else if let Some(simple) = xs_children(node).find(|child| child.name == "simpleType") {
        ValueType::Inline(parse_simple_type(simple)?)
    } else {
        ValueType::Any
    };
    Ok(AttributeDecl {
        name,
        required: node.attr("use") == Some("required"),
        value_type,
    })
}

fn parse_simple_type(node: &XmlElementNode) -> Result<SimpleType, TestXmlError> {
    let mut simple = SimpleType::default();
    for child in xs_children(node) {
        match child.name.as_str() {
            "restriction" => {
                simple.base = child.attr("base").map(str::to_string);
                for facet in xs_children(child) {
                    match facet.name.as_str() {
                        "enumeration" => {
                            if let Some(value) = facet.attr("value") {
                                simple.enumeration.push(value.to_string());
                            }
                        }
                        "pattern" => {
                            let Some(value) = facet.attr("value") else {
                                continue;
                            };
                            let regex = Regex::new(&format!("^(?:{value})$")).map_err(|error| {
                                schema_error(format!("Invalid xs:pattern '{value}': {error}"))
                            })?;
                            simple.patterns.push(regex);
                        }
                        "annotation" => {}
                        other => tracing::trace!(facet = other, "ignoring facet"),
                    }
                }
            }
            "annotation" => {}
            other => tracing::warn!(construct = other, "unsupported simpleType derivation accepts any value"),
        }
    }
    Ok(simple)
}

fn builtin_accepts(type_name: &str, value: &str) -> bool {
    let value = value.trim();
    match type_name {
        "int" | "integer" | "long" | "short" | "byte" => value.parse::<i64>().is_ok(),
        "nonNegativeInteger" | "unsignedInt" | "unsignedLong" | "unsignedShort" | "unsignedByte" => {
            value.parse::<u64>().is_ok()
        }
        "positiveInteger" => value.parse::<u64>().is_ok_and(|number| number > 0),
        "boolean" => matches!(value, "true" | "false" | "1" | "0"),
        "decimal" | "double" | "float" => value.parse::<f64>().is_ok(),
        _ => true,
    }
}

impl Schema {
    pub fn root_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn validate(&self, root: &XmlElementNode) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        let path = format!("/{}", root.name);
        match self.elements.get(&root.name) {
            Some(decl) => self.validate_element(root, &decl.kind, &path, &mut violations),
            None => violations.push(SchemaViolation {
                message: format!("Element '{}' is not declared as a root element", root.name),
                path,
            }),
        }
        violations
    }

    fn resolve<'a>(&'a self, kind: &'a ElementKind) -> Resolved<'a> {
        let mut kind = kind;
        for _ in 0..MAX_REF_DEPTH {
            match kind {
                ElementKind::Ref(name) => match self.elements.get(name) {
                    Some(decl) => kind = &decl.kind,
                    None => return Resolved::Any,
                },
                ElementKind::TypeName(type_name) => return self.resolve_type_name(type_name),
                ElementKind::Complex(complex) => return Resolved::Complex(complex),
                ElementKind::Simple(simple) => return Resolved::Simple(simple),
                ElementKind::Any => return Resolved::Any,
            }
        }
        Resolved::Any
    }

    fn resolve_type_name<'a>(&'a self, type_name: &'a str) -> Resolved<'a> {
        let local = local_name(type_name);
        if !is_builtin_prefix(type_name) {
            if let Some(complex) = self.complex_types.get(local) {
                return Resolved::Complex(complex);
            }
            if let Some(simple) = self.simple_types.get(local) {
                return Resolved::Simple(simple);
            }
        }
        if local == "anyType" {
            Resolved::Any
        } else {
            Resolved::Builtin(local)
        }
    }

    fn value_type_accepts(&self, value_type: &ValueType, value: &str) -> bool {
        match value_type {
            ValueType::Any => true,
            ValueType::Named(type_name) => self.named_type_accepts(type_name, value, 0),
            ValueType::Inline(simple) => self.simple_accepts(simple, value, 0),
        }
    }

    fn named_type_accepts(&self, type_name: &str, value: &str, depth: usize) -> bool {
        if depth >= MAX_REF_DEPTH {
            return true;
        }
        match self.resolve_type_name(type_name) {
            Resolved::Simple(simple) => self.simple_accepts(simple, value, depth + 1),
            Resolved::Builtin(builtin) => builtin_accepts(builtin, value),
            Resolved::Complex(_) | Resolved::Any => true,
        }
    }

    fn simple_accepts(&self, simple: &SimpleType, value: &str, depth: usize) -> bool {
        if let Some(base) = &simple.base {
            if !self.named_type_accepts(base, value, depth) {
                return false;
            }
        }
        if !simple.enumeration.is_empty() && !simple.enumeration.iter().any(|allowed| allowed == value) {
            return false;
        }
        simple.patterns.is_empty() || simple.patterns.iter().any(|pattern| pattern.is_match(value))
    }

    fn validate_element(
        &self,
        node: &XmlElementNode,
        kind: &ElementKind,
        path: &str,
        violations: &mut Vec<SchemaViolation>,
    ) {
        match self.resolve(kind) {
            Resolved::Any => {}
            Resolved::Complex(complex) => self.validate_complex(node, complex, path, violations),
            Resolved::Simple(simple) => {
                if self.check_simple_element(node, path, violations) {
                    let value = node.text_content();
                    if !self.simple_accepts(simple, &value, 0) {
                        violations.push(invalid_value(node, &value, path));
                    }
                }
            }
            Resolved::Builtin(builtin) => {
                if self.check_simple_element(node, path, violations) {
                    let value = node.text_content();
                    if !builtin_accepts(builtin, &value) {
                        violations.push(invalid_value(node, &value, path));
                    }
                }
            }
        }
    }

    fn check_simple_element(
        &self,
        node: &XmlElementNode,
        path: &str,
        violations: &mut Vec<SchemaViolation>,
    ) -> bool {
        if node.has_element_children() {
            violations.push(SchemaViolation {
                message: format!("Element '{}' must not contain child elements", node.name),
                path: path.to_string(),
            });
            return false;
        }
        true
    }

    fn validate_complex(
        &self,
        node: &XmlElementNode,
        complex: &ComplexType,
        path: &str,
        violations: &mut Vec<SchemaViolation>,
    ) {
        for declared in &complex.attributes {
            if declared.required && !node.has_attr(&declared.name) {
                violations.push(SchemaViolation {
                    message: format!(
                        "Missing required attribute '{}' on element '{}'",
                        declared.name, node.name
                    ),
                    path: path.to_string(),
                });
            }
        }
        for attribute in node.attributes.iter().filter(|attribute| attribute.namespace.is_none()) {
            let attribute_path = format!("{path}/@{}", attribute.name);
            match complex.attributes.iter().find(|declared| declared.name == attribute.name) {
                Some(declared) => {
                    if !self.value_type_accepts(&declared.value_type, &attribute.value) {
                        violations.push(SchemaViolation {
                            message: format!(
                                "Attribute '{}' on element '{}' has invalid value '{}'",
                                attribute.name, node.name, attribute.value
                            ),
                            path: attribute_path,
                        });
                    }
                }
                None if complex.any_attribute => {}
                None => violations.push(SchemaViolation {
                    message: format!(
                        "Attribute '{}' is not declared on element '{}'",
                        attribute.name, node.name
                    ),
                    path: attribute_path,
                }),
            }
        }

        let text = node.text_content();
        if !text.trim().is_empty() {
            match &complex.text {
                TextRule::None => violations.push(SchemaViolation {
                    message: format!("Element '{}' does not allow text content", node.name),
                    path: path.to_string(),
                }),
                TextRule::Any => {}
                TextRule::Typed(value_type) => {
                    if !self.value_type_accepts(value_type, &text) {
                        violations.push(invalid_value(node, &text, path));
                    }
                }
            }
        }

        let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
        for child in node.element_children() {
            let index = counts.entry(child.name.as_str()).or_insert(0);
            *index += 1;
            let child_path = format!("{path}/{}[{index}]", child.name);
            match complex.children.iter().find(|particle| particle.decl.name == child.name) {
                Some(particle) => self.validate_element(child, &particle.decl.kind, &child_path, violations),
                None if complex.any_children => {}
                None => violations.push(SchemaViolation {
                    message: format!(
                        "Element '{}' is not allowed in '{}'",
                        child.name, node.name
                    ),
                    path: child_path,
                }),
            }
        }

        for particle in &complex.children {
            let count = counts.get(particle.decl.name.as_str()).copied().unwrap_or(0);
            if count < particle.min {
                violations.push(SchemaViolation {
                    message: format!(
                        "Element '{}' is missing required child '{}'",
                        node.name, particle.decl.name
                    ),
                    path: path.to_string(),
                });
            }
            if let Some(max) = particle.max {
                if count > max {
                    violations.push(SchemaViolation {
                        message: format!(
                            "Element '{}' allows at most {max} '{}' element(s), found {count}",
                            node.name, particle.decl.name
                        ),
                        path: path.to_string(),
                    });
                }
            }
        }
    }
}

fn invalid_value(node: &XmlElementNode, value: &str, path: &str) -> SchemaViolation {
    SchemaViolation {
        message: format!("Element '{}' has invalid value '{}'", node.name, value.trim()),
        path: path.to_string(),
    }
}

#[cfg(test)]
mod schema_tests {
    use super::*;

    const SCHEMA: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="TargetType">
    <xs:restriction base="xs:string">
      <xs:enumeration value="ssh"/>
      <xs:enumeration value="http"/>
    </xs:restriction>
  </xs:simpleType>
  <xs:complexType name="StepType">
    <xs:sequence>
      <xs:element name="extracts" minOccurs="0">
        <xs:complexType>
          <xs:sequence>
            <xs:element name="extract" maxOccurs="unbounded">
              <xs:complexType>
                <xs:attribute name="name" type="xs:string" use="required"/>
              </xs:complexType>
            </xs:element>
          </xs:sequence>
        </xs:complexType>
      </xs:element>
    </xs:sequence>
    <xs:attribute name="id" use="required">
      <xs:simpleType>
        <xs:restriction base="xs:string">
          <xs:pattern value="[A-Za-z0-9_\-]+"/>
        </xs:restriction>
      </xs:simpleType>
    </xs:attribute>
    <xs:attribute name="targetType" type="TargetType"/>
    <xs:attribute name="timeout" type="xs:int"/>
  </xs:complexType>
  <xs:element name="test">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="description" type="xs:string" minOccurs="0"/>
        <xs:element name="displayOrder" type="xs:int" minOccurs="0"/>
        <xs:element name="steps">
          <xs:complexType>
            <xs:sequence>
              <xs:element name="step" type="StepType" minOccurs="0" maxOccurs="unbounded"/>
            </xs:sequence>
          </xs:complexType>
        </xs:element>
        <xs:choice minOccurs="0">
          <xs:element name="meta"><xs:complexType><xs:sequence><xs:any minOccurs="0" maxOccurs="unbounded"/></xs:sequence></xs:complexType></xs:element>
        </xs:choice>
      </xs:sequence>
      <xs:attribute name="id" type="xs:string" use="required"/>
      <xs:anyAttribute/>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;

    fn violations(instance: &str) -> Vec<SchemaViolation> {
        let schema = parse_schema(SCHEMA).expect("schema should parse");
        let document = parse_xml_document(instance).expect("instance should parse");
        schema.validate(&document.root)
    }

    fn messages(instance: &str) -> Vec<String> {
        violations(instance)
            .into_iter()
            .map(|violation| violation.message)
            .collect()
    }

    #[test]
    fn conforming_instance_has_no_violations() {
        let instance = r#"<test id="T1" extra="ok">
  <description>Smoke</description>
  <displayOrder>3</displayOrder>
  <steps>
    <step id="s1" targetType="ssh" timeout="10">
      <extracts><extract name="a"/><extract name="b"/></extracts>
    </step>
    <step id="s2"/>
  </steps>
  <meta><author>qa</author></meta>
</test>"#;
        assert_eq!(violations(instance), Vec::new());
    }

    #[test]
    fn undeclared_root_is_reported() {
        let found = violations("<other/>");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Element 'other' is not declared as a root element");
        assert_eq!(found[0].path, "/other");
    }

    #[test]
    fn attribute_violations_are_reported() {
        let found = messages(
            r#"<test><steps><step id="bad id" targetType="bogus" timeout="x" color="red"/></steps></test>"#,
        );
        assert_eq!(
            found,
            vec![
                "Missing required attribute 'id' on element 'test'",
                "Attribute 'id' on element 'step' has invalid value 'bad id'",
                "Attribute 'targetType' on element 'step' has invalid value 'bogus'",
                "Attribute 'timeout' on element 'step' has invalid value 'x'",
                "Attribute 'color' is not declared on element 'step'",
            ]
        );
    }

    #[test]
    fn child_element_violations_are_reported() {
        let found = violations(
            r#"<test id="T1"><displayOrder>abc</displayOrder><unknown/><steps><step id="a"><extracts/></step></steps><steps/></test>"#,
        );
        let messages = found
            .iter()
            .map(|violation| violation.message.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "Element 'displayOrder' has invalid value 'abc'",
                "Element 'unknown' is not allowed in 'test'",
                "Element 'extracts' is missing required child 'extract'",
                "Element 'test' allows at most 1 'steps' element(s), found 2",
            ]
        );
        assert_eq!(found[1].path, "/test/unknown[1]");
        assert_eq!(found[2].path, "/test/steps[1]/step[1]/extracts[1]");
    }

    #[test]
    fn missing_required_child_and_stray_text() {
        let found = messages(r#"<test id="T1">loose text</test>"#);
        assert_eq!(
            found,
            vec![
                "Element 'test' does not allow text content",
                "Element 'test' is missing required child 'steps'",
            ]
        );
    }

    #[test]
    fn simple_element_with_children_is_reported() {
        let found = messages(r#"<test id="T1"><description><b>x</b></description><steps/></test>"#);
        assert_eq!(found, vec!["Element 'description' must not contain child elements"]);
    }

    #[test]
    fn non_schema_root_is_a_parse_error() {
        let error = parse_schema("<schema/>").expect_err("schema without xs namespace should fail");
        assert_eq!(error.code, SCHEMA_PARSE_ERROR);
        let error = parse_schema("<xs:schema").expect_err("malformed schema should fail");
        assert_eq!(error.code, SCHEMA_PARSE_ERROR);
    }

    #[test]
    fn invalid_pattern_facet_is_a_parse_error() {
        let source = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:simpleType name="Bad"><xs:restriction base="xs:string"><xs:pattern value="[a-"/></xs:restriction></xs:simpleType>
</xs:schema>"#;
        let error = parse_schema(source).expect_err("bad pattern should fail");
        assert!(error.message.contains("Invalid xs:pattern"));
    }

    #[test]
    fn global_element_refs_resolve() {
        let source = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="port" type="xs:nonNegativeInteger"/>
  <xs:element name="root">
    <xs:complexType><xs:sequence><xs:element ref="port" maxOccurs="2"/></xs:sequence></xs:complexType>
  </xs:element>
</xs:schema>"#;
        let schema = parse_schema(source).expect("schema should parse");
        assert_eq!(schema.root_names().collect::<Vec<_>>(), vec!["port", "root"]);
        let document = parse_xml_document("<root><port>22</port><port>-1</port></root>")
            .expect("instance should parse");
        let found = schema.validate(&document.root);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].message, "Element 'port' has invalid value '-1'");
        assert_eq!(found[0].path, "/root/port[2]");
    }

    #[test]
    fn repeated_particles_with_huge_bounds_saturate() {
        let source = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="root">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="item" minOccurs="4294967295" maxOccurs="4294967295"/>
        <xs:element name="item" minOccurs="4294967295" maxOccurs="4294967295"/>
      </xs:sequence>
    </xs:complexType>
  </xs:element>
</xs:schema>"#;
        let schema = parse_schema(source).expect("schema should parse");
        let document = parse_xml_document("<root><item/></root>").expect("instance should parse");
        let found = schema.validate(&document.root);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.contains("item"));
    }

    #[test]
    fn builtin_types_accept_expected_lexical_forms() {
        assert!(builtin_accepts("int", " 42 "));
        assert!(!builtin_accepts("positiveInteger", "0"));
        assert!(builtin_accepts("boolean", "1"));
        assert!(!builtin_accepts("boolean", "yes"));
        assert!(builtin_accepts("double", "2.5"));
        assert!(builtin_accepts("string", "anything"));
    }
}
