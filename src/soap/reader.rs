//! Response reader.
//!
//! Responses are small, so the whole envelope is read into an [`XmlNode`]
//! tree keyed by local names; namespace prefixes are dropped.

use std::fmt;
use std::str::FromStr;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// A SOAP fault returned by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapFault {
    /// `faultcode`, e.g. `s:Client` or `a:InternalServiceFault`.
    pub code: String,
    /// `faultstring`.
    pub message: String,
    /// Text of the detail's `Message` element, when the server sent one.
    pub detail: Option<String>,
}

impl fmt::Display for SoapFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(detail) = &self.detail {
            if detail != &self.message {
                write!(f, " ({})", detail)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for SoapFault {}

/// Errors produced while reading a SOAP response.
#[derive(Debug, Error)]
pub enum SoapError {
    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(String),

    /// The server returned a SOAP fault.
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),

    /// A required element is missing.
    #[error("missing element: {0}")]
    MissingElement(String),
}

/// An element of a parsed response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Local name (without namespace prefix).
    pub name: String,
    /// Concatenated text content, entities resolved.
    pub text: String,
    /// `true` if the element carried `xsi:nil="true"`.
    pub nil: bool,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// First child with the given local name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// First child with the given local name, or [`SoapError::MissingElement`].
    pub fn require(&self, name: &str) -> Result<&XmlNode, SoapError> {
        self.child(name)
            .ok_or_else(|| SoapError::MissingElement(format!("{}/{}", self.name, name)))
    }

    /// All children with the given local name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant (depth-first, self excluded) with the given local name.
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.children
            .iter()
            .find_map(|c| if c.name == name { Some(c) } else { c.find(name) })
    }

    /// Trimmed text of a child; `None` when missing, nil or empty.
    pub fn text_of(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(XmlNode::value)
    }

    /// Trimmed text of this node; `None` when nil or empty.
    pub fn value(&self) -> Option<&str> {
        let text = self.text.trim();
        if self.nil || text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parses the text of a child.
    pub fn parse_of<T: FromStr>(&self, name: &str) -> Option<T> {
        self.text_of(name).and_then(|s| s.parse().ok())
    }

    /// Text of every child, in order. Used for serialized arrays.
    pub fn values(&self) -> Vec<String> {
        self.children
            .iter()
            .filter_map(XmlNode::value)
            .map(str::to_string)
            .collect()
    }
}

fn node_from_start(e: &BytesStart<'_>) -> XmlNode {
    let nil = e.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"nil" && attr.value.as_ref() == b"true"
    });
    XmlNode {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        nil,
        ..XmlNode::default()
    }
}

/// Parses an XML document into its root element.
pub fn parse_document(xml: &str) -> Result<XmlNode, SoapError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                if root.is_none() {
                    *root = Some(node);
                }
            }
        }
    }

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(node_from_start(e)),
            Ok(Event::Empty(ref e)) => attach(&mut stack, &mut root, node_from_start(e)),
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| SoapError::Xml("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, node);
            }
            Ok(Event::Text(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    let text = e
                        .decode()
                        .map_err(|e| SoapError::Xml(format!("invalid text: {}", e)))?;
                    top.text.push_str(&text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Ok(Event::GeneralRef(ref e)) => {
                if let Some(top) = stack.last_mut() {
                    let char_ref = e
                        .resolve_char_ref()
                        .map_err(|err| SoapError::Xml(err.to_string()))?;
                    match char_ref {
                        Some(ch) => top.text.push(ch),
                        None => {
                            let name = e
                                .decode()
                                .map_err(|err| SoapError::Xml(err.to_string()))?;
                            let value = resolve_predefined_entity(&name).ok_or_else(|| {
                                SoapError::Xml(format!("unknown entity reference: &{};", name))
                            })?;
                            top.text.push_str(value);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SoapError::Xml(e.to_string())),
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(SoapError::Xml("unclosed element at end of document".to_string()));
    }

    root.ok_or_else(|| SoapError::Xml("empty document".to_string()))
}

/// Parses a SOAP response and returns the body's payload element
/// (normally `<{operation}Response>`).
///
/// A `Fault` in the body is returned as [`SoapError::Fault`].
pub fn parse_response(xml: &str) -> Result<XmlNode, SoapError> {
    let root = parse_document(xml)?;
    if root.name != "Envelope" {
        return Err(SoapError::MissingElement("Envelope".to_string()));
    }

    let body = root.require("Body")?;

    if let Some(fault) = body.child("Fault") {
        return Err(SoapError::Fault(SoapFault {
            code: fault.text_of("faultcode").unwrap_or_default().to_string(),
            message: fault.text_of("faultstring").unwrap_or_default().to_string(),
            detail: fault
                .child("detail")
                .and_then(|d| d.find("Message"))
                .and_then(XmlNode::value)
                .map(str::to_string),
        }));
    }

    body.children
        .first()
        .cloned()
        .ok_or_else(|| SoapError::MissingElement("Body/*".to_string()))
}
