mod writer;
mod xml;

pub use writer::{write_document, write_element, XML_DECLARATION};
pub use xml::{
    parse_xml_document, XmlAttribute, XmlDocument, XmlElementNode, XmlNode, XmlTextNode,
};
