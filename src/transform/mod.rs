//! Template-driven document rewriting

mod template;

use crate::document::Document;
use crate::error::TransformError;

pub use template::TemplateTransform;

/// Applies a user-authored template to a document
pub trait Transform: Send + Sync {
    fn apply(&self, doc: &Document, template: &str) -> Result<Document, TransformError>;
}

/// Copies the document unchanged, ignoring the template
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    fn apply(&self, doc: &Document, _template: &str) -> Result<Document, TransformError> {
        Ok(doc.clone())
    }
}

/// Apply `template` with `engine`, or copy the document when there is no
/// template
pub fn apply_template(
    engine: &dyn Transform,
    doc: &Document,
    template: Option<&str>,
) -> Result<Document, TransformError> {
    match template {
        Some(template) => engine.apply(doc, template),
        None => IdentityTransform.apply(doc, ""),
    }
}
