//! YAML encoding. YAML shares the dict tree with JSON, so both sides are
//! thin wrappers around serde_yaml.

use crate::errors::SpdxError;
use crate::formats::dict::{document_from_dict, document_to_dict};
use crate::models_v2::Document;
use std::io::{Read, Write};

/// Parse a YAML document.
pub fn parse<R: Read>(reader: R) -> Result<Document, SpdxError> {
    let tree: serde_json::Value = serde_yaml::from_reader(reader)
        .map_err(|e| SpdxError::parse("yaml", format!("not valid YAML: {e}")))?;
    document_from_dict(&tree)
}

/// Write a document as YAML.
pub fn write<W: Write>(writer: W, document: &Document) -> Result<(), SpdxError> {
    let tree = document_to_dict(document);
    serde_yaml::to_writer(writer, &tree)
        .map_err(|e| SpdxError::Serialization(format!("failed to write YAML: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MINIMAL: &str = "\
spdxVersion: SPDX-2.3
dataLicense: CC0-1.0
SPDXID: SPDXRef-DOCUMENT
name: demo
documentNamespace: https://example.com/demo
creationInfo:
  created: 2023-01-02T03:04:05Z
  creators:
    - 'Tool: demo-tool'
";

    #[test]
    fn parses_a_minimal_document() {
        let document = parse(Cursor::new(MINIMAL)).unwrap();
        assert_eq!(document.name, "demo");
        assert_eq!(document.creation_info.creators.len(), 1);
    }

    #[test]
    fn document_keys_lead_the_output() {
        let document = parse(Cursor::new(MINIMAL)).unwrap();
        let mut buffer = Vec::new();
        write(&mut buffer, &document).unwrap();
        let rendered = String::from_utf8(buffer).unwrap();
        assert!(rendered.starts_with("spdxVersion: SPDX-2.3\n"));
        let reparsed = parse(Cursor::new(rendered)).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn malformed_yaml_is_its_own_error() {
        let error = parse(Cursor::new(": : :")).unwrap_err();
        assert!(error.to_string().contains("not valid YAML"));
    }
}
