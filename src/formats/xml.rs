//! XML encoding of the dict tree.
//!
//! The element layout mirrors the JSON keys: one element per key, arrays as
//! repeated elements, everything inside a single `<Document>` root. XML
//! cannot tell a one-element list from a plain value, so keys listed in
//! `ARRAY_KEYS` are folded back into arrays while reading.

use crate::errors::SpdxError;
use crate::formats::dict::{document_from_dict, document_to_dict, ARRAY_KEYS};
use crate::models_v2::Document;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};
use std::io::{BufReader, Read, Write};

/// Parse an XML document.
pub fn parse<R: Read>(reader: R) -> Result<Document, SpdxError> {
    let root = read_tree(reader, "xml")?;
    if root.name != "Document" {
        return Err(SpdxError::parse(
            "xml",
            format!("expected a <Document> root element, found <{}>", root.name),
        ));
    }
    document_from_dict(&node_to_value(&root))
}

/// Write a document as XML.
pub fn write<W: Write>(mut writer: W, document: &Document) -> Result<(), SpdxError> {
    writer
        .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")
        .map_err(|e| SpdxError::Io(e, "failed to write XML declaration".to_string()))?;
    let tree = document_to_dict(document);
    let mut xml = Writer::new_with_indent(&mut writer, b' ', 2);
    write_value(&mut xml, "Document", &tree)
}

/// One parsed XML element. Kept deliberately plain so the RDF reader can
/// walk the same tree with its own vocabulary.
#[derive(Debug, Default)]
pub(crate) struct XmlNode {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<XmlNode>,
    pub(crate) text: String,
}

impl XmlNode {
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|child| child.name == name)
    }

    pub(crate) fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Read a whole XML document into a tree of nodes.
pub(crate) fn read_tree<R: Read>(source: R, what: &str) -> Result<XmlNode, SpdxError> {
    let mut reader = Reader::from_reader(BufReader::new(source));
    reader.config_mut().trim_text(true);
    let mut buffer = Vec::new();
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;
    loop {
        match reader.read_event_into(&mut buffer) {
            Err(error) => {
                return Err(SpdxError::parse(what, format!("not valid XML: {error}")))
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(start)) => {
                let node = node_from(&reader, &start, what)?;
                stack.push(node);
            }
            Ok(Event::Empty(start)) => {
                let node = node_from(&reader, &start, what)?;
                attach(&mut stack, &mut root, node, what)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| SpdxError::parse(what, "unbalanced XML"))?;
                attach(&mut stack, &mut root, node, what)?;
            }
            Ok(Event::Text(text)) => {
                let decoded = text
                    .unescape()
                    .map_err(|error| SpdxError::parse(what, format!("bad text: {error}")))?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&decoded);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(_) => {}
        }
        buffer.clear();
    }
    root.ok_or_else(|| SpdxError::parse(what, "no root element"))
}

fn node_from<R>(
    reader: &Reader<R>,
    start: &BytesStart<'_>,
    what: &str,
) -> Result<XmlNode, SpdxError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|error| SpdxError::parse(what, format!("bad attribute: {error}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())
            .map_err(|error| SpdxError::parse(what, format!("bad attribute: {error}")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(XmlNode {
        name,
        attributes,
        ..XmlNode::default()
    })
}

fn attach(
    stack: &mut Vec<XmlNode>,
    root: &mut Option<XmlNode>,
    node: XmlNode,
    what: &str,
) -> Result<(), SpdxError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => *root = Some(node),
        None => return Err(SpdxError::parse(what, "multiple root elements")),
    }
    Ok(())
}

fn node_to_value(node: &XmlNode) -> Value {
    if node.children.is_empty() {
        return Value::String(node.text.clone());
    }
    let mut map = Map::new();
    for child in &node.children {
        let value = node_to_value(child);
        match map.get_mut(&child.name) {
            None => {
                map.insert(child.name.clone(), value);
            }
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
        }
    }
    for (key, value) in map.iter_mut() {
        if ARRAY_KEYS.contains(&key.as_str()) && !value.is_array() {
            let single = value.take();
            *value = Value::Array(vec![single]);
        }
    }
    Value::Object(map)
}

fn write_value<W: Write>(
    writer: &mut Writer<W>,
    key: &str,
    value: &Value,
) -> Result<(), SpdxError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_value(writer, key, item)?;
            }
            Ok(())
        }
        Value::Object(map) => {
            writer
                .write_event(Event::Start(BytesStart::new(key)))
                .map_err(write_error)?;
            for (child_key, child) in map {
                write_value(writer, child_key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(key)))
                .map_err(write_error)
        }
        Value::Null => writer
            .write_event(Event::Empty(BytesStart::new(key)))
            .map_err(write_error),
        other => {
            let text = match other {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            writer
                .write_event(Event::Start(BytesStart::new(key)))
                .map_err(write_error)?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(write_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(key)))
                .map_err(write_error)
        }
    }
}

fn write_error(error: quick_xml::Error) -> SpdxError {
    SpdxError::Serialization(format!("failed to write XML: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MINIMAL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Document>
  <spdxVersion>SPDX-2.3</spdxVersion>
  <dataLicense>CC0-1.0</dataLicense>
  <SPDXID>SPDXRef-DOCUMENT</SPDXID>
  <name>demo</name>
  <documentNamespace>https://example.com/demo</documentNamespace>
  <creationInfo>
    <created>2023-01-02T03:04:05Z</created>
    <creators>Tool: demo-tool</creators>
  </creationInfo>
</Document>"#;

    #[test]
    fn parses_a_minimal_document() {
        let document = parse(Cursor::new(MINIMAL)).unwrap();
        assert_eq!(document.name, "demo");
        // A lone <creators> element still decodes as a one-element list.
        assert_eq!(document.creation_info.creators.len(), 1);
    }

    #[test]
    fn single_nested_elements_become_arrays() {
        let xml = r#"<Document>
  <spdxVersion>SPDX-2.3</spdxVersion>
  <dataLicense>CC0-1.0</dataLicense>
  <SPDXID>SPDXRef-DOCUMENT</SPDXID>
  <name>demo</name>
  <documentNamespace>https://example.com/demo</documentNamespace>
  <creationInfo>
    <created>2023-01-02T03:04:05Z</created>
    <creators>Tool: demo-tool</creators>
  </creationInfo>
  <packages>
    <SPDXID>SPDXRef-P</SPDXID>
    <name>pkg</name>
    <downloadLocation>NOASSERTION</downloadLocation>
    <filesAnalyzed>false</filesAnalyzed>
    <checksums>
      <algorithm>SHA256</algorithm>
      <checksumValue>11b6d3ee554eedf79299905a98f9b9a04e498210b59f15094c916c91d150efcd</checksumValue>
    </checksums>
  </packages>
</Document>"#;
        let document = parse(Cursor::new(xml)).unwrap();
        assert_eq!(document.packages.len(), 1);
        let package = &document.packages[0];
        assert_eq!(package.checksums.len(), 1);
        assert!(!package.files_analyzed);
    }

    #[test]
    fn wrong_root_element_is_rejected() {
        let error = parse(Cursor::new("<bom><spdxVersion>x</spdxVersion></bom>")).unwrap_err();
        assert!(error.to_string().contains("expected a <Document> root"));
    }

    #[test]
    fn escaped_characters_survive_a_round_trip() {
        let mut document = parse(Cursor::new(MINIMAL)).unwrap();
        document.comment = Some("a < b & \"c\"".to_string());
        let mut buffer = Vec::new();
        write(&mut buffer, &document).unwrap();
        let rendered = String::from_utf8(buffer.clone()).unwrap();
        assert!(rendered.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(rendered.contains("a &lt; b &amp;"));
        let reparsed = parse(Cursor::new(buffer)).unwrap();
        assert_eq!(reparsed, document);
    }

    #[test]
    fn malformed_xml_is_its_own_error() {
        let error = parse(Cursor::new("<Document><name>demo</Document>")).unwrap_err();
        assert!(error.to_string().contains("not valid XML"));
    }
}
