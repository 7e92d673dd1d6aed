//! JSON payloads isomorphic to the document tree.
//!
//! Mapping: an element becomes an object keyed by child name, repeated
//! children become an array, attributes are `@name` keys, text next to
//! attributes or children is `#text`, and an element with no content is
//! `null`. A single child is always a bare object, never a one-element
//! array, so a one-row table renders as an object.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::config::MessageType;
use crate::document::{decode_name, encode_name, Document, Element};
use crate::error::{PipelineError, Result};

use super::{payload_text, Encoding};

const TEXT_KEY: &str = "#text";
const CDATA_KEY: &str = "#cdata-section";

/// JSON object graph encoding
pub struct JsonEncoding;

impl Encoding for JsonEncoding {
    fn message_type(&self) -> MessageType {
        MessageType::Json
    }

    fn decode(&self, payload: &[u8]) -> Result<Document> {
        let text = payload_text(MessageType::Json, payload)?;
        let value: Value = serde_json::from_str(text.trim())
            .map_err(|e| PipelineError::decode(MessageType::Json, e))?;
        document_from_json(&value).map_err(|msg| PipelineError::decode(MessageType::Json, msg))
    }

    fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut top = Map::new();
        top.insert(json_key(&doc.root.name), element_to_json(&doc.root));
        serde_json::to_vec(&Value::Object(top))
            .map_err(|e| PipelineError::encode(MessageType::Json, e))
    }
}

fn element_to_json(element: &Element) -> Value {
    if element.attributes.is_empty() && element.children.is_empty() {
        return match &element.text {
            Some(text) => Value::String(text.clone()),
            None => Value::Null,
        };
    }

    let mut obj = Map::new();
    for (name, value) in &element.attributes {
        obj.insert(format!("@{}", json_key(name)), Value::String(value.clone()));
    }
    if let Some(text) = &element.text {
        obj.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
    }

    let mut groups: IndexMap<&str, Vec<Value>> = IndexMap::new();
    for child in &element.children {
        groups
            .entry(child.name.as_str())
            .or_default()
            .push(element_to_json(child));
    }
    for (name, mut values) in groups {
        let value = if values.len() == 1 {
            values.remove(0)
        } else {
            Value::Array(values)
        };
        obj.insert(json_key(name), value);
    }

    Value::Object(obj)
}

/// Element or attribute name as a JSON key: the unescaped name, unless it
/// would read as a `@`, `#` or `?` marker key
fn json_key(name: &str) -> String {
    let decoded = decode_name(name);
    if decoded.starts_with(['@', '#', '?']) {
        name.to_string()
    } else {
        decoded.into_owned()
    }
}

fn document_from_json(value: &Value) -> std::result::Result<Document, String> {
    let Value::Object(top) = value else {
        return Err(format!(
            "expected a JSON object with a single root property, found {}",
            kind(value)
        ));
    };

    let mut properties = top.iter().filter(|(k, _)| !k.starts_with('?'));
    let (name, root_value) = match (properties.next(), properties.next()) {
        (Some(root), None) => root,
        (None, _) => return Err("JSON object has no root property".into()),
        (Some(_), Some(_)) => {
            return Err("JSON root object must contain exactly one property".into())
        }
    };

    if root_value.is_array() {
        return Err(format!("root property {} must not be an array", name));
    }

    let mut elements = elements_from_json(name, root_value)?;
    match elements.pop() {
        Some(root) => Ok(Document::new(root)),
        None => Err(format!("root property {} is empty", name)),
    }
}

fn elements_from_json(name: &str, value: &Value) -> std::result::Result<Vec<Element>, String> {
    let element_name = encode_name(name).into_owned();
    match value {
        Value::Array(items) => {
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                elements.extend(elements_from_json(name, item)?);
            }
            Ok(elements)
        }
        Value::Object(obj) => {
            let mut element = Element::new(element_name);
            let mut text = String::new();
            for (key, child) in obj {
                if let Some(attr) = key.strip_prefix('@') {
                    element
                        .attributes
                        .insert(encode_name(attr).into_owned(), scalar_text(child));
                } else if key == TEXT_KEY || key == CDATA_KEY {
                    text.push_str(&scalar_text(child));
                } else if key.starts_with('#') || key.starts_with('?') {
                    continue;
                } else {
                    element.children.extend(elements_from_json(key, child)?);
                }
            }
            element.text = (!text.is_empty()).then_some(text);
            Ok(vec![element])
        }
        scalar => Ok(vec![Element::leaf(element_name, scalar_text(scalar))]),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
