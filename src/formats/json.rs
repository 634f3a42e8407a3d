//! JSON encoding, by way of the dict tree.

use crate::errors::SpdxError;
use crate::formats::dict::{document_from_dict, document_to_dict};
use crate::models_v2::Document;
use std::io::{Read, Write};

/// Parse a JSON document.
pub fn parse<R: Read>(reader: R) -> Result<Document, SpdxError> {
    let tree: serde_json::Value = serde_json::from_reader(reader)
        .map_err(|e| SpdxError::parse("json", format!("not valid JSON: {e}")))?;
    document_from_dict(&tree)
}

/// Write a document as pretty-printed JSON.
pub fn write<W: Write>(writer: W, document: &Document) -> Result<(), SpdxError> {
    let tree = document_to_dict(document);
    serde_json::to_writer_pretty(writer, &tree)
        .map_err(|e| SpdxError::Serialization(format!("failed to write JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MINIMAL: &str = r#"{
        "spdxVersion": "SPDX-2.3",
        "dataLicense": "CC0-1.0",
        "SPDXID": "SPDXRef-DOCUMENT",
        "name": "demo",
        "documentNamespace": "https://example.com/demo",
        "creationInfo": {
            "created": "2023-01-02T03:04:05Z",
            "creators": ["Tool: demo-tool"]
        }
    }"#;

    #[test]
    fn parses_a_minimal_document() {
        let document = parse(Cursor::new(MINIMAL)).unwrap();
        assert_eq!(document.name, "demo");
        assert_eq!(document.spdx_id, "SPDXRef-DOCUMENT");
    }

    #[test]
    fn malformed_json_is_its_own_error() {
        let error = parse(Cursor::new("{not json")).unwrap_err();
        assert!(error.to_string().contains("not valid JSON"));
    }

    #[test]
    fn written_output_parses_back() {
        let document = parse(Cursor::new(MINIMAL)).unwrap();
        let mut buffer = Vec::new();
        write(&mut buffer, &document).unwrap();
        let reparsed = parse(Cursor::new(buffer)).unwrap();
        assert_eq!(reparsed, document);
    }
}
