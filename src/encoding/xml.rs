//! Literal XML payloads

use crate::config::MessageType;
use crate::document::Document;
use crate::error::{PipelineError, Result};

use super::{payload_text, xml_text, Encoding};

/// Payload is the serialized document itself
pub struct XmlEncoding;

impl Encoding for XmlEncoding {
    fn message_type(&self) -> MessageType {
        MessageType::Xml
    }

    fn decode(&self, payload: &[u8]) -> Result<Document> {
        let text = normalize_line_breaks(payload_text(MessageType::Xml, payload)?);
        Document::parse_xml(&text).map_err(|e| PipelineError::decode(MessageType::Xml, e))
    }

    fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut text = xml_text(MessageType::Xml, doc)?;
        text.push('\n');
        Ok(text.into_bytes())
    }
}

/// Drop CRLF pairs and surrounding whitespace before parsing
pub(crate) fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "").trim().to_string()
}
