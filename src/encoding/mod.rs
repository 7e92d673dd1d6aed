//! Wire encodings for hierarchical documents

mod json;
mod other;
mod xml;

use crate::config::MessageType;
use crate::document::Document;
use crate::error::{PipelineError, Result};

pub use self::json::JsonEncoding;
pub use self::other::{strip_backslashes, strip_quotes, OtherEncoding};
pub use self::xml::XmlEncoding;

/// Converts documents to and from one wire encoding
pub trait Encoding: Send + Sync {
    /// Message type this encoding handles
    fn message_type(&self) -> MessageType;

    /// Parse a payload into a document
    fn decode(&self, payload: &[u8]) -> Result<Document>;

    /// Render a document as a payload
    fn encode(&self, doc: &Document) -> Result<Vec<u8>>;

    /// The document a transform template is authored against for this
    /// payload. Defaults to [`Encoding::decode`].
    fn preview(&self, payload: &[u8]) -> Result<Document> {
        self.decode(payload)
    }
}

/// Factory for encodings by message type
pub struct EncodingFactory;

impl EncodingFactory {
    pub fn create(message_type: MessageType) -> Box<dyn Encoding> {
        match message_type {
            MessageType::Json => Box::new(JsonEncoding),
            MessageType::Xml => Box::new(XmlEncoding),
            MessageType::Other => Box::new(OtherEncoding),
        }
    }
}

/// Payload bytes as text, without a UTF-8 byte order mark
fn payload_text(message_type: MessageType, payload: &[u8]) -> Result<&str> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| PipelineError::decode(message_type, format!("payload is not UTF-8: {}", e)))?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn xml_text(message_type: MessageType, doc: &Document) -> Result<String> {
    doc.to_xml()
        .map_err(|e| PipelineError::encode(message_type, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::codec;
    use crate::model::{Column, FormatPolicy, Table};

    fn two_by_two() -> Table {
        let mut table = Table::new("Orders", vec![Column::new("Id"), Column::new("Name")]);
        table.add_row(vec!["1".into(), "Ada".into()]);
        table.add_row(vec!["2".into(), "Grace".into()]);
        table
    }

    #[test]
    fn test_json_and_xml_agree() {
        let doc = codec::encode(&two_by_two(), &FormatPolicy::invariant());
        let xml = EncodingFactory::create(MessageType::Xml);
        let json = EncodingFactory::create(MessageType::Json);

        let from_xml = xml.decode(&xml.encode(&doc).unwrap()).unwrap();
        let via_json = json.decode(&json.encode(&from_xml).unwrap()).unwrap();
        let back_to_xml = xml.decode(&xml.encode(&via_json).unwrap()).unwrap();

        assert_eq!(back_to_xml, doc);
    }

    #[test]
    fn test_escaped_column_names_survive_json() {
        let mut table = Table::new(
            "Orders",
            vec![Column::new("Id"), Column::new("Customer Name"), Column::new("1st")],
        );
        table.add_row(vec!["1".into(), "Ada".into(), "a".into()]);
        table.add_row(vec!["2".into(), "Grace".into(), "b".into()]);
        let doc = codec::encode(&table, &FormatPolicy::invariant());
        let xml = EncodingFactory::create(MessageType::Xml);
        let json = EncodingFactory::create(MessageType::Json);

        let from_xml = xml.decode(&xml.encode(&doc).unwrap()).unwrap();
        let via_json = json.decode(&json.encode(&from_xml).unwrap()).unwrap();
        assert_eq!(via_json, doc);
        assert_eq!(
            codec::decode(&via_json).column_names(),
            vec!["Id", "Customer Name", "1st"]
        );
    }

    #[test]
    fn test_non_utf8_payload_is_decode_error() {
        for message_type in [MessageType::Json, MessageType::Xml, MessageType::Other] {
            let err = EncodingFactory::create(message_type)
                .decode(&[0xff, 0xfe, 0x00])
                .unwrap_err();
            assert!(matches!(err, PipelineError::Decode { .. }), "{}", message_type);
        }
    }

    #[test]
    fn test_factory_message_types() {
        for message_type in [MessageType::Json, MessageType::Xml, MessageType::Other] {
            assert_eq!(EncodingFactory::create(message_type).message_type(), message_type);
        }
    }
}
