use std::str::FromStr;

use tx_core::{PropertyMap, TestXmlError};
use tx_parser::XmlElementNode;

pub(crate) fn optional_attr(node: &XmlElementNode, name: &str) -> Option<String> {
    node.attr(name).map(str::to_string)
}

pub(crate) fn optional_attr_any(node: &XmlElementNode, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| optional_attr(node, name))
}

pub(crate) fn attr_or_empty(node: &XmlElementNode, name: &str) -> String {
    optional_attr(node, name).unwrap_or_default()
}

pub(crate) fn required_attr(node: &XmlElementNode, name: &str) -> Result<String, TestXmlError> {
    optional_attr(node, name).ok_or_else(|| {
        TestXmlError::with_span(
            "XML_ATTR_INVALID",
            format!(
                "Missing required attribute \"{}\" on <{}>.",
                name, node.name
            ),
            node.location.clone(),
        )
    })
}

pub(crate) fn parse_enum_attr<T>(
    node: &XmlElementNode,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
    expected: &str,
) -> Result<Option<T>, TestXmlError> {
    let Some(raw) = node.attr(name) else {
        return Ok(None);
    };
    parse(raw).map(Some).ok_or_else(|| {
        TestXmlError::with_span(
            "XML_ATTR_INVALID",
            format!(
                "Attribute \"{}\" on <{}> must be one of {}, got \"{}\".",
                name, node.name, expected, raw
            ),
            node.location.clone(),
        )
    })
}

pub(crate) fn parse_number_attr<T: FromStr>(
    node: &XmlElementNode,
    name: &str,
) -> Result<Option<T>, TestXmlError> {
    let Some(raw) = node.attr(name) else {
        return Ok(None);
    };
    parse_number_text(node, name, raw).map(Some)
}

pub(crate) fn parse_number_text<T: FromStr>(
    node: &XmlElementNode,
    label: &str,
    raw: &str,
) -> Result<T, TestXmlError> {
    raw.trim().parse::<T>().map_err(|_| {
        TestXmlError::with_span(
            "XML_ATTR_INVALID",
            format!(
                "\"{}\" on <{}> must be an integer, got \"{}\".",
                label, node.name, raw
            ),
            node.location.clone(),
        )
    })
}

pub(crate) fn parse_bool_attr(
    node: &XmlElementNode,
    name: &str,
) -> Result<Option<bool>, TestXmlError> {
    let Some(value) = node.attr(name) else {
        return Ok(None);
    };

    match value.trim() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(TestXmlError::with_span(
            "XML_ATTR_INVALID",
            format!(
                "Attribute \"{}\" on <{}> must be \"true\" or \"false\".",
                name, node.name
            ),
            node.location.clone(),
        )),
    }
}

const PROPERTY_ENTRY: &str = "property";

/// Reads `<bag><key>value</key>...</bag>` into an ordered map. Keys that are
/// not usable as element names arrive as `<property name="key">value</property>`.
pub(crate) fn read_property_bag(node: &XmlElementNode) -> PropertyMap {
    node.element_children()
        .map(|child| match child.attr("name") {
            Some(key) if child.name == PROPERTY_ENTRY => (key.to_string(), child.text_content()),
            _ => (child.name.clone(), child.text_content()),
        })
        .collect()
}

pub(crate) fn property_bag_element(name: &str, properties: &PropertyMap) -> XmlElementNode {
    let mut element = XmlElementNode::new(name);
    for (key, value) in properties.iter() {
        if is_plain_element_name(key) {
            element.push_element(text_element(key, value));
        } else {
            element.push_element(text_element(PROPERTY_ENTRY, value).with_attr("name", key));
        }
    }
    element
}

fn is_plain_element_name(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !key.to_ascii_lowercase().starts_with("xml")
        && key != PROPERTY_ENTRY
}

pub(crate) fn text_element(name: &str, value: &str) -> XmlElementNode {
    XmlElementNode::new(name).with_text(value)
}

#[cfg(test)]
mod xml_utils_tests {
    use super::*;
    use tx_core::TargetType;
    use tx_parser::parse_xml_document;

    fn root(source: &str) -> XmlElementNode {
        parse_xml_document(source).expect("xml should parse").root
    }

    #[test]
    fn enum_and_number_attributes_reject_bad_values() {
        let node = root(r#"<step targetType="bogus" timeout="ten" />"#);
        let error = parse_enum_attr(&node, "targetType", TargetType::parse_xml, "ssh|http")
            .expect_err("bogus target type should fail");
        assert_eq!(error.code, "XML_ATTR_INVALID");
        assert!(error.message.contains("bogus"));

        let error = parse_number_attr::<i64>(&node, "timeout").expect_err("ten is not a number");
        assert_eq!(error.code, "XML_ATTR_INVALID");
        assert_eq!(
            parse_number_attr::<i64>(&node, "missing").expect("absent is fine"),
            None
        );
    }

    #[test]
    fn bool_and_alternate_attributes() {
        let node = root(r#"<section failContinue="true" Username="admin" />"#);
        assert_eq!(
            parse_bool_attr(&node, "failContinue").expect("bool should parse"),
            Some(true)
        );
        assert_eq!(
            optional_attr_any(&node, &["User", "Username"]),
            Some("admin".to_string())
        );
        assert!(required_attr(&node, "id").is_err());
    }

    #[test]
    fn keys_that_are_not_element_names_use_property_entries() {
        let bag: PropertyMap = [
            ("build number", "42"),
            ("1prompt", "ready"),
            ("ns:key", "x"),
            ("property", "literal"),
            ("", "empty key"),
            ("größe", "xl"),
            ("owner", "qa"),
        ]
        .into_iter()
        .collect();

        let element = property_bag_element("meta", &bag);
        let names = element
            .element_children()
            .map(|child| child.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["property", "property", "property", "property", "property", "property", "owner"]
        );
        assert_eq!(read_property_bag(&element), bag);

        let text = tx_parser::write_element(&element);
        let reparsed = root(&text);
        assert_eq!(read_property_bag(&reparsed), bag);
    }

    #[test]
    fn property_bags_round_trip_through_elements() {
        let node = root("<meta><author>qa</author><version>1.2</version></meta>");
        let bag = read_property_bag(&node);
        assert_eq!(bag.keys().collect::<Vec<_>>(), vec!["author", "version"]);

        let element = property_bag_element("meta", &bag);
        assert_eq!(read_property_bag(&element), bag);
        assert_eq!(
            element.first_child("author").map(XmlElementNode::text_content),
            Some("qa".to_string())
        );
    }
}
