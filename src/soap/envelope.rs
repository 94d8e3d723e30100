//! Request envelope writer.

use std::fmt::Display;

use quick_xml::escape::escape;

use super::{ARRAYS_NS, ENVELOPE_NS, MEMOQ_NS, XSI_NS};

/// A type that serializes itself as a WCF data contract element.
pub trait DataContract {
    /// Writes `self` as an element called `name`.
    fn to_element(&self, name: &str) -> Element;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Empty,
    Text(String),
    Children(Vec<Element>),
}

/// An XML element under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    content: Content,
}

impl Element {
    /// Creates an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            content: Content::Empty,
        }
    }

    /// Creates an element holding a text value.
    pub fn text(name: impl Into<String>, value: impl Display) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            content: Content::Text(value.to_string()),
        }
    }

    /// Creates an explicit `xsi:nil` element.
    pub fn nil(name: impl Into<String>) -> Self {
        Self::new(name)
            .attr("xmlns:i", XSI_NS)
            .attr("i:nil", "true")
    }

    /// Creates a `string[]` element.
    pub fn string_array<S: AsRef<str>>(name: impl Into<String>, items: &[S]) -> Self {
        items.iter().fold(
            Self::new(name).attr("xmlns:a", ARRAYS_NS),
            |el, item| el.child(Self::text("a:string", item.as_ref())),
        )
    }

    /// Adds an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    /// Appends a child element. Replaces text content, if any.
    pub fn child(mut self, child: Element) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            content => *content = Content::Children(vec![child]),
        }
        self
    }

    /// Appends a child element when present.
    pub fn child_opt(self, child: Option<Element>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }

    /// Appends a text child when `value` is present.
    pub fn text_opt<T: Display>(self, name: &str, value: Option<T>) -> Self {
        self.child_opt(value.map(|v| Element::text(name, v)))
    }

    /// Element name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Serializes the element into `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }

        match &self.content {
            Content::Empty => out.push_str("/>"),
            Content::Text(text) => {
                out.push('>');
                out.push_str(&escape(text.as_str()));
                self.close(out);
            }
            Content::Children(children) => {
                out.push('>');
                for child in children {
                    child.write_to(out);
                }
                self.close(out);
            }
        }
    }

    fn close(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Serializes the element to a string.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// A SOAP 1.1 request envelope.
#[derive(Debug, Clone)]
pub struct Envelope {
    api_key: Option<String>,
    body: Element,
}

impl Envelope {
    /// Wraps an operation element. The element is placed in [`MEMOQ_NS`].
    pub fn new(operation: Element) -> Self {
        Self {
            api_key: None,
            body: operation.attr("xmlns", MEMOQ_NS),
        }
    }

    /// Sets the `ApiKey` SOAP header.
    pub fn api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = key.map(str::to_string);
        self
    }

    /// Serializes the envelope.
    pub fn to_xml(&self) -> String {
        let mut out = String::from(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        out.push_str(r#"<s:Envelope xmlns:s=""#);
        out.push_str(ENVELOPE_NS);
        out.push_str(r#"">"#);

        if let Some(key) = &self.api_key {
            out.push_str("<s:Header>");
            Element::text("ApiKey", key)
                .attr("xmlns", MEMOQ_NS)
                .write_to(&mut out);
            out.push_str("</s:Header>");
        }

        out.push_str("<s:Body>");
        self.body.write_to(&mut out);
        out.push_str("</s:Body></s:Envelope>");
        out
    }
}
