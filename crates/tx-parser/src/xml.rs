use roxmltree::{Document, Node, NodeType};
use tx_core::{SourceLocation, SourceSpan, TestXmlError};

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElementNode),
    Text(XmlTextNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,
    pub namespace: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    pub name: String,
    pub namespace: Option<String>,
    pub attributes: Vec<XmlAttribute>,
    pub children: Vec<XmlNode>,
    pub location: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlTextNode {
    pub value: String,
    pub location: SourceSpan,
}

impl XmlElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            children: Vec::new(),
            location: SourceSpan::synthetic(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.namespace.is_none() && attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self
            .attributes
            .iter_mut()
            .find(|attribute| attribute.namespace.is_none() && attribute.name == name)
        {
            existing.value = value;
            return;
        }
        self.attributes.push(XmlAttribute {
            name,
            namespace: None,
            value,
        });
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_optional_attr(self, name: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with_attr(name, value),
            None => self,
        }
    }

    pub fn push_element(&mut self, child: XmlElementNode) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn with_child(mut self, child: XmlElementNode) -> Self {
        self.push_element(child);
        self
    }

    pub fn with_text(mut self, value: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(XmlTextNode {
            value: value.into(),
            location: SourceSpan::synthetic(),
        }));
        self
    }

    pub fn element_children(&self) -> impl Iterator<Item = &XmlElementNode> {
        self.children.iter().filter_map(|entry| match entry {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElementNode> + 'a {
        self.element_children()
            .filter(move |element| element.name == name)
    }

    pub fn first_child(&self, name: &str) -> Option<&XmlElementNode> {
        self.element_children().find(|element| element.name == name)
    }

    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|entry| match entry {
                XmlNode::Text(XmlTextNode { value, .. }) => Some(value.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    pub fn has_element_children(&self) -> bool {
        self.element_children().next().is_some()
    }
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, TestXmlError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let document = Document::parse(source)
        .map_err(|error| TestXmlError::new("XML_PARSE_ERROR", error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(TestXmlError::new(
            "XML_PARSE_ERROR",
            "XML document must contain a root element.",
        ));
    };

    let root = parse_element(&document, root);
    tracing::trace!(root = %root.name, "parsed xml document");
    Ok(XmlDocument { root })
}

fn parse_element(document: &Document<'_>, node: Node<'_, '_>) -> XmlElementNode {
    let attributes = node
        .attributes()
        .map(|attribute| XmlAttribute {
            name: attribute.name().to_string(),
            namespace: attribute.namespace().map(str::to_string),
            value: attribute.value().to_string(),
        })
        .collect();

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(XmlNode::Element(parse_element(document, child))),
            NodeType::Text => {
                let value = child.text().unwrap_or_default().to_string();
                if value.is_empty() {
                    continue;
                }
                children.push(XmlNode::Text(XmlTextNode {
                    value,
                    location: node_span(document, child.range().start, child.range().end),
                }));
            }
            _ => {}
        }
    }

    XmlElementNode {
        name: node.tag_name().name().to_string(),
        namespace: node.tag_name().namespace().map(str::to_string),
        attributes,
        children,
        location: node_span(document, node.range().start, node.range().end),
    }
}

fn node_span(document: &Document<'_>, start: usize, end: usize) -> SourceSpan {
    let start_pos = document.text_pos_at(start);
    let end_pos = document.text_pos_at(end);
    SourceSpan {
        start: SourceLocation {
            line: start_pos.row as usize,
            column: start_pos.col as usize,
        },
        end: SourceLocation {
            line: end_pos.row as usize,
            column: end_pos.col as usize,
        },
    }
}
