//! Hierarchical document: the tree that sits between tables and wire formats

pub mod codec;
mod names;

use std::io::{self, Write};

use indexmap::IndexMap;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;

pub use names::{decode_name, encode_name};

/// An element node. Mixed content is not modelled: an element carries at
/// most one text value alongside its child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    /// Text content, `None` when empty
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create a text-only element; empty text is stored as no text
    pub fn leaf(name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            name: name.into(),
            text: (!text.is_empty()).then_some(text),
            ..Default::default()
        }
    }

    /// Append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// True when the element has neither attributes nor child elements
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty()
    }

    /// Text content, empty when absent
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// A document with exactly one root element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse XML text. Whitespace-only text next to child elements is dropped.
    pub fn parse_xml(text: &str) -> Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        Ok(Self::new(element_from_node(doc.root_element())))
    }

    /// Serialize as XML without a declaration
    pub fn write_xml<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut writer = Writer::new(writer);
        write_element(&mut writer, &self.root)
    }

    pub fn to_xml(&self) -> io::Result<String> {
        let mut buf = Vec::new();
        self.write_xml(&mut buf)?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

fn element_from_node(node: roxmltree::Node) -> Element {
    let mut element = Element::new(node.tag_name().name());
    for attr in node.attributes() {
        element
            .attributes
            .insert(attr.name().to_string(), attr.value().to_string());
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            element.children.push(element_from_node(child));
        } else if let Some(t) = child.is_text().then(|| child.text()).flatten() {
            text.push_str(t);
        }
    }

    if element.children.is_empty() {
        element.text = (!text.is_empty()).then_some(text);
    } else if !text.trim().is_empty() {
        element.text = Some(text.trim().to_string());
    }
    element
}

fn emit<'a, W: Write>(writer: &mut Writer<W>, event: Event<'a>) -> io::Result<()> {
    writer.write_event(event).map_err(io::Error::other)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> io::Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if element.text.is_none() && element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = &element.text {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}
