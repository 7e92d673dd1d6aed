//! Opaque text payloads.
//!
//! On the way in the whole payload becomes the text of a single `data`
//! element; on the way out that text is written back, or the serialized
//! document when a template produced markup. Two character normalizations
//! apply to the raw text, one per direction, kept here as named steps so
//! they can be changed without touching the rest of the pipeline. Markup is
//! never normalized.

use crate::config::MessageType;
use crate::document::{Document, Element};
use crate::error::Result;

use super::{payload_text, xml_text, Encoding};

/// Element wrapping an opaque payload
pub const DATA_ELEMENT: &str = "data";

/// Opaque text encoding
pub struct OtherEncoding;

impl Encoding for OtherEncoding {
    fn message_type(&self) -> MessageType {
        MessageType::Other
    }

    fn decode(&self, payload: &[u8]) -> Result<Document> {
        let text = payload_text(MessageType::Other, payload)?;
        Ok(wrap(strip_quotes(text)))
    }

    fn encode(&self, doc: &Document) -> Result<Vec<u8>> {
        let text = if doc.root.is_leaf() {
            strip_backslashes(doc.root.text())
        } else {
            xml_text(MessageType::Other, doc)?.trim_end().to_string()
        };
        Ok(text.into_bytes())
    }

    fn preview(&self, payload: &[u8]) -> Result<Document> {
        let text = payload_text(MessageType::Other, payload)?;
        Ok(wrap(strip_backslashes(text)))
    }
}

fn wrap(text: String) -> Document {
    Document::new(Element::leaf(DATA_ELEMENT, text))
}

/// Import normalization: remove every double quote.
///
/// Kept for compatibility with existing templates; it alters payloads that
/// legitimately contain quotes.
pub fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

/// Export normalization: remove every backslash and trailing whitespace
pub fn strip_backslashes(text: &str) -> String {
    text.trim_end().replace('\\', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wraps_and_strips_quotes() {
        let doc = OtherEncoding.decode(b"id,name\n1,\"Ada\"\n").unwrap();
        assert_eq!(doc.root.name, DATA_ELEMENT);
        assert_eq!(doc.root.text(), "id,name\n1,Ada\n");
    }

    #[test]
    fn test_wrapped_text_is_escaped_in_xml() {
        let doc = OtherEncoding.decode(b"a < b & c").unwrap();
        let xml = doc.to_xml().unwrap();
        assert_eq!(xml, "<data>a &lt; b &amp; c</data>");
        assert_eq!(Document::parse_xml(&xml).unwrap(), doc);
    }

    #[test]
    fn test_encode_unwraps_leaf() {
        let doc = Document::new(Element::leaf(DATA_ELEMENT, "C:\\out\\file.txt  \n"));
        let bytes = OtherEncoding.encode(&doc).unwrap();
        assert_eq!(bytes, b"C:outfile.txt");
    }

    #[test]
    fn test_encode_markup_document() {
        let doc = Document::parse_xml("<lines><l>a</l><l>b</l></lines>").unwrap();
        let bytes = OtherEncoding.encode(&doc).unwrap();
        assert_eq!(bytes, b"<lines><l>a</l><l>b</l></lines>");
    }

    #[test]
    fn test_encode_markup_keeps_backslashes() {
        let xml = r"<paths><p>C:\temp\out.csv</p><p>\\share\x</p></paths>";
        let bytes = OtherEncoding.encode(&Document::parse_xml(xml).unwrap()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), xml);
    }

    #[test]
    fn test_preview_uses_backslash_normalization() {
        let doc = OtherEncoding.preview(b"say \"hi\" \\o/  \n").unwrap();
        assert_eq!(doc.root.text(), "say \"hi\" o/");
    }
}
