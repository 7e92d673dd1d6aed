//! Tera-backed transform.
//!
//! The template renders XML. It sees the input document as:
//!
//! - `root`: the element tree (`name`, `attributes`, `text`, `children`)
//! - `records`: one map of leaf name to text per child of the root
//! - `table`: name of the first record element
//! - `columns`: leaf names of the first record
//!
//! Interpolated values are XML-escaped. Names are given unescaped, so a
//! column called `First Name` is reached as `row["First Name"]`.

use indexmap::IndexMap;
use tera::{Context, Tera};

use crate::document::{decode_name, Document, Element};
use crate::error::TransformError;

use super::Transform;

/// The `.xml` suffix turns on tera's autoescaping
const TEMPLATE_NAME: &str = "transform.xml";

/// Renders a tera template against the document and parses the result
#[derive(Debug, Default)]
pub struct TemplateTransform;

impl TemplateTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Transform for TemplateTransform {
    fn apply(&self, doc: &Document, template: &str) -> Result<Document, TransformError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, template)
            .map_err(diagnostic)?;
        let rendered = tera
            .render(TEMPLATE_NAME, &build_context(doc))
            .map_err(diagnostic)?;

        Document::parse_xml(rendered.trim()).map_err(|e| {
            TransformError::new(format!("Template output is not well-formed XML: {}", e))
        })
    }
}

fn build_context(doc: &Document) -> Context {
    let records: Vec<IndexMap<String, String>> =
        doc.root.children.iter().map(record_fields).collect();
    let first = doc.root.children.first();
    let table = first.map(|r| decode_name(&r.name).into_owned());
    let columns: Vec<String> = first
        .map(|r| {
            r.children
                .iter()
                .map(|c| decode_name(&c.name).into_owned())
                .collect()
        })
        .unwrap_or_default();

    let mut context = Context::new();
    context.insert("root", &doc.root);
    context.insert("records", &records);
    context.insert("table", &table);
    context.insert("columns", &columns);
    context
}

fn record_fields(record: &Element) -> IndexMap<String, String> {
    let mut fields = IndexMap::new();
    for leaf in &record.children {
        fields
            .entry(decode_name(&leaf.name).into_owned())
            .or_insert_with(|| leaf.text().to_string());
    }
    fields
}

/// The full tera error chain; the top-level message alone rarely names the
/// cause
fn diagnostic(err: tera::Error) -> TransformError {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    TransformError::new(message)
}
