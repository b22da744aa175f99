use tx_core::{
    Check, Extract, HttpMethod, PropertyMap, Ref, RefMode, Section, SectionType, Session,
    Step, TargetType, Test, TestGroup, TestXmlError,
};
use tx_parser::{parse_xml_document, write_document, XmlElementNode};

use crate::xml_utils::{
    attr_or_empty, optional_attr, parse_bool_attr, parse_enum_attr,
    parse_number_attr, parse_number_text, property_bag_element, read_property_bag,
    required_attr, text_element,
};

pub const TEST_ROOT: &str = "test";

const TARGET_TYPES: &str = "ssh, http, telnet, manual";
const HTTP_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, HEAD, OPTIONS";
const SECTION_TYPES: &str = "serial, manual, final, cleanup";
const REF_MODES: &str = "id, alias";

pub fn parse_test(source: &str) -> Result<Test, TestXmlError> {
    let document = parse_xml_document(source)?;
    test_from_element(&document.root)
}

pub fn write_test(test: &Test) -> String {
    write_document(&test_to_element(test))
}

pub fn test_from_element(root: &XmlElementNode) -> Result<Test, TestXmlError> {
    if root.name != TEST_ROOT {
        return Err(TestXmlError::with_span(
            "XML_ROOT_MISMATCH",
            format!("Expected root <{}>, found <{}>.", TEST_ROOT, root.name),
            root.location.clone(),
        ));
    }

    let mut test = Test {
        id: attr_or_empty(root, "id"),
        alias: optional_attr(root, "alias"),
        namespace: root.namespace.clone(),
        ..Test::default()
    };

    for child in root.element_children() {
        match child.name.as_str() {
            "meta" => test.meta = read_property_bag(child),
            "description" => test.description = Some(child.text_content()),
            "displayOrder" => {
                test.display_order = Some(parse_number_text(
                    child,
                    "displayOrder",
                    &child.text_content(),
                )?)
            }
            "sessions" => {
                for session in child.children_named("session") {
                    test.sessions.push(map_session(session)?);
                }
            }
            "config" => test.config = read_property_bag(child),
            "functions" => test.functions = read_property_bag(child),
            "steps" => {
                for step in child.children_named("step") {
                    test.steps.push(map_step(step)?);
                }
            }
            "testGroups" => {
                for group in child.children_named("testGroup") {
                    test.test_groups.push(map_test_group(group));
                }
            }
            "sections" => {
                for section in child.children_named("section") {
                    test.sections.push(map_section(section)?);
                }
            }
            other => tracing::debug!(element = other, "ignoring unknown <test> child"),
        }
    }

    tracing::debug!(
        test = %test.id,
        steps = test.all_steps().count(),
        sections = test.sections.len(),
        sessions = test.sessions.len(),
        "mapped test document"
    );
    Ok(test)
}

fn map_session(node: &XmlElementNode) -> Result<Session, TestXmlError> {
    let raw_type = required_attr(node, "type")?;
    let Some(session_type) = TargetType::parse_xml(&raw_type) else {
        return Err(TestXmlError::with_span(
            "XML_ATTR_INVALID",
            format!(
                "Attribute \"type\" on <session> must be one of {}, got \"{}\".",
                TARGET_TYPES, raw_type
            ),
            node.location.clone(),
        ));
    };

    Ok(Session {
        name: attr_or_empty(node, "name"),
        session_type,
        host: optional_attr(node, "host"),
        port: parse_number_attr(node, "port")?,
        base_url: optional_attr(node, "baseUrl"),
        user: optional_attr(node, "user"),
        password: optional_attr(node, "password"),
        prompt: optional_attr(node, "prompt"),
    })
}

fn map_step(node: &XmlElementNode) -> Result<Step, TestXmlError> {
    let mut step = Step {
        id: attr_or_empty(node, "id"),
        alias: optional_attr(node, "alias"),
        target: optional_attr(node, "target"),
        target_type: parse_enum_attr(node, "targetType", TargetType::parse_xml, TARGET_TYPES)?,
        timeout: parse_number_attr(node, "timeout")?,
        method: parse_enum_attr(node, "method", HttpMethod::parse_xml, HTTP_METHODS)?,
        command: optional_attr(node, "command"),
        ..Step::default()
    };

    for child in node.element_children() {
        match child.name.as_str() {
            "params" => step.params = read_named_values(child, "param"),
            "headers" => step.headers = read_named_values(child, "header"),
            "extracts" => {
                for extract in child.children_named("extract") {
                    step.extracts.push(map_extract(extract));
                }
            }
            "interaction" => step.interaction = read_property_bag(child),
            other => tracing::debug!(step = %step.id, element = other, "ignoring unknown <step> child"),
        }
    }

    Ok(step)
}

fn read_named_values(node: &XmlElementNode, entry_name: &str) -> PropertyMap {
    node.element_children()
        .map(|child| {
            if child.name == entry_name {
                (attr_or_empty(child, "name"), attr_or_empty(child, "value"))
            } else {
                (child.name.clone(), child.text_content())
            }
        })
        .collect()
}

fn map_extract(node: &XmlElementNode) -> Extract {
    let checks = node
        .first_child("checks")
        .map(|checks| {
            checks
                .children_named("check")
                .map(|check| Check {
                    source_ref: attr_or_empty(check, "sourceRef"),
                    expect: attr_or_empty(check, "expect"),
                })
                .collect()
        })
        .unwrap_or_default();

    Extract {
        name: attr_or_empty(node, "name"),
        pattern: attr_or_empty(node, "pattern"),
        options: optional_attr(node, "options"),
        checks,
    }
}

fn map_test_group(node: &XmlElementNode) -> TestGroup {
    TestGroup {
        name: attr_or_empty(node, "name"),
        properties: read_property_bag(node),
    }
}

fn map_section(node: &XmlElementNode) -> Result<Section, TestXmlError> {
    let mut section = Section {
        id: attr_or_empty(node, "id"),
        alias: optional_attr(node, "alias"),
        name: optional_attr(node, "name"),
        section_type: parse_enum_attr(node, "type", SectionType::parse_xml, SECTION_TYPES)?,
        fail_continue: parse_bool_attr(node, "failContinue")?,
        retry_count: parse_number_attr(node, "retryCount")?,
        retest_point: optional_attr(node, "retestPoint"),
        pass_next: optional_attr(node, "passNext"),
        fail_next: optional_attr(node, "failNext"),
        ..Section::default()
    };

    for child in node.element_children() {
        match child.name.as_str() {
            "step" => section.steps.push(map_step(child)?),
            "refs" => {
                for reference in child.children_named("ref") {
                    section.refs.push(Ref {
                        step: attr_or_empty(reference, "step"),
                        mode: parse_enum_attr(reference, "mode", RefMode::parse_xml, REF_MODES)?,
                    });
                }
            }
            other => tracing::debug!(section = %section.id, element = other, "ignoring unknown <section> child"),
        }
    }

    Ok(section)
}

pub fn test_to_element(test: &Test) -> XmlElementNode {
    let mut root = XmlElementNode::new(TEST_ROOT)
        .with_attr("id", test.id.as_str())
        .with_optional_attr("alias", test.alias.as_deref());
    root.namespace = test.namespace.clone();

    if !test.meta.is_empty() {
        root.push_element(property_bag_element("meta", &test.meta));
    }
    if let Some(description) = &test.description {
        root.push_element(text_element("description", description));
    }
    if let Some(display_order) = test.display_order {
        root.push_element(text_element("displayOrder", &display_order.to_string()));
    }
    if !test.sessions.is_empty() {
        let mut sessions = XmlElementNode::new("sessions");
        for session in &test.sessions {
            sessions.push_element(session_to_element(session));
        }
        root.push_element(sessions);
    }
    if !test.config.is_empty() {
        root.push_element(property_bag_element("config", &test.config));
    }
    if !test.functions.is_empty() {
        root.push_element(property_bag_element("functions", &test.functions));
    }

    let mut steps = XmlElementNode::new("steps");
    for step in &test.steps {
        steps.push_element(step_to_element(step));
    }
    root.push_element(steps);

    if !test.test_groups.is_empty() {
        let mut groups = XmlElementNode::new("testGroups");
        for group in &test.test_groups {
            let mut element = property_bag_element("testGroup", &group.properties);
            element.set_attr("name", group.name.as_str());
            groups.push_element(element);
        }
        root.push_element(groups);
    }
    if !test.sections.is_empty() {
        let mut sections = XmlElementNode::new("sections");
        for section in &test.sections {
            sections.push_element(section_to_element(section));
        }
        root.push_element(sections);
    }

    root
}

fn session_to_element(session: &Session) -> XmlElementNode {
    XmlElementNode::new("session")
        .with_attr("name", session.name.as_str())
        .with_attr("type", session.session_type.as_xml_str())
        .with_optional_attr("host", session.host.as_deref())
        .with_optional_attr("port", session.port.map(|port| port.to_string()))
        .with_optional_attr("baseUrl", session.base_url.as_deref())
        .with_optional_attr("user", session.user.as_deref())
        .with_optional_attr("password", session.password.as_deref())
        .with_optional_attr("prompt", session.prompt.as_deref())
}

fn step_to_element(step: &Step) -> XmlElementNode {
    let mut element = XmlElementNode::new("step")
        .with_attr("id", step.id.as_str())
        .with_optional_attr("alias", step.alias.as_deref())
        .with_optional_attr("target", step.target.as_deref())
        .with_optional_attr(
            "targetType",
            step.target_type.map(|target_type| target_type.as_xml_str()),
        )
        .with_optional_attr("timeout", step.timeout.map(|timeout| timeout.to_string()))
        .with_optional_attr("method", step.method.map(|method| method.as_xml_str()))
        .with_optional_attr("command", step.command.as_deref());

    if !step.params.is_empty() {
        element.push_element(named_values_element("params", "param", &step.params));
    }
    if !step.headers.is_empty() {
        element.push_element(named_values_element("headers", "header", &step.headers));
    }
    if !step.extracts.is_empty() {
        let mut extracts = XmlElementNode::new("extracts");
        for extract in &step.extracts {
            extracts.push_element(extract_to_element(extract));
        }
        element.push_element(extracts);
    }
    if !step.interaction.is_empty() {
        element.push_element(property_bag_element("interaction", &step.interaction));
    }
    element
}

fn named_values_element(name: &str, entry_name: &str, values: &PropertyMap) -> XmlElementNode {
    let mut element = XmlElementNode::new(name);
    for (key, value) in values.iter() {
        element.push_element(
            XmlElementNode::new(entry_name)
                .with_attr("name", key)
                .with_attr("value", value),
        );
    }
    element
}

fn extract_to_element(extract: &Extract) -> XmlElementNode {
    let mut element = XmlElementNode::new("extract")
        .with_attr("name", extract.name.as_str())
        .with_attr("pattern", extract.pattern.as_str())
        .with_optional_attr("options", extract.options.as_deref());
    if !extract.checks.is_empty() {
        let mut checks = XmlElementNode::new("checks");
        for check in &extract.checks {
            checks.push_element(
                XmlElementNode::new("check")
                    .with_attr("sourceRef", check.source_ref.as_str())
                    .with_attr("expect", check.expect.as_str()),
            );
        }
        element.push_element(checks);
    }
    element
}

fn section_to_element(section: &Section) -> XmlElementNode {
    let mut element = XmlElementNode::new("section")
        .with_attr("id", section.id.as_str())
        .with_optional_attr("alias", section.alias.as_deref())
        .with_optional_attr("name", section.name.as_deref())
        .with_optional_attr(
            "type",
            section.section_type.map(|section_type| section_type.as_xml_str()),
        )
        .with_optional_attr(
            "failContinue",
            section.fail_continue.map(|flag| flag.to_string()),
        )
        .with_optional_attr(
            "retryCount",
            section.retry_count.map(|count| count.to_string()),
        )
        .with_optional_attr("retestPoint", section.retest_point.as_deref())
        .with_optional_attr("passNext", section.pass_next.as_deref())
        .with_optional_attr("failNext", section.fail_next.as_deref());

    for step in &section.steps {
        element.push_element(step_to_element(step));
    }
    if !section.refs.is_empty() {
        let mut refs = XmlElementNode::new("refs");
        for reference in &section.refs {
            refs.push_element(
                XmlElementNode::new("ref")
                    .with_attr("step", reference.step.as_str())
                    .with_optional_attr("mode", reference.mode.map(|mode| mode.as_xml_str())),
            );
        }
        element.push_element(refs);
    }
    element
}
