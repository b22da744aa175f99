use crate::xml::{XmlElementNode, XmlNode};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

const INDENT: &str = "  ";

pub fn write_document(root: &XmlElementNode) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    write_element_into(&mut out, root, 0, None);
    out
}

pub fn write_element(element: &XmlElementNode) -> String {
    let mut out = String::new();
    write_element_into(&mut out, element, 0, None);
    out
}

fn write_element_into(
    out: &mut String,
    element: &XmlElementNode,
    depth: usize,
    inherited_namespace: Option<&str>,
) {
    push_indent(out, depth);
    out.push('<');
    out.push_str(&element.name);

    let namespace = element.namespace.as_deref().or(inherited_namespace);
    if let Some(declared) = element.namespace.as_deref() {
        if Some(declared) != inherited_namespace {
            push_attribute(out, "xmlns", declared);
        }
    }

    for attribute in &element.attributes {
        // Prefixed attributes carry no meaning for the mapped model.
        if attribute.namespace.is_some() {
            continue;
        }
        push_attribute(out, &attribute.name, &attribute.value);
    }

    if element.has_element_children() {
        out.push_str(">\n");
        for child in &element.children {
            match child {
                XmlNode::Element(child) => write_element_into(out, child, depth + 1, namespace),
                XmlNode::Text(text) => {
                    let trimmed = text.value.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    push_indent(out, depth + 1);
                    out.push_str(&escape_text(trimmed));
                    out.push('\n');
                }
            }
        }
        push_indent(out, depth);
        out.push_str("</");
        out.push_str(&element.name);
        out.push_str(">\n");
        return;
    }

    let text = element.text_content();
    if text.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push('>');
    out.push_str(&escape_text(&text));
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape_attribute(value));
    out.push('"');
}

fn normalize_line_endings(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

fn escape_text(value: &str) -> String {
    let normalized = normalize_line_endings(value);
    let mut escaped = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn escape_attribute(value: &str) -> String {
    let normalized = normalize_line_endings(value);
    let mut escaped = String::with_capacity(normalized.len());
    for ch in normalized.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#xA;"),
            '\t' => escaped.push_str("&#x9;"),
            other => escaped.push(other),
        }
    }
    escaped
}
