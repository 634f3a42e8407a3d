//! Format detection and dispatch.
//!
//! Five encodings share one document model: JSON, YAML, and XML go through
//! the dict intermediate form, tag/value and RDF/XML have their own codecs.
//! [`Format`] picks the codec from a filename suffix or, for streams
//! without one, from the content itself.

pub mod dict;
pub mod json;
pub mod rdf;
pub mod tag_value;
pub mod xml;
pub mod yaml;

use crate::errors::SpdxError;
use crate::models_v2::Document;
use crate::validation::validate_document;
use std::io::{Read, Write};
use std::path::Path;

/// The supported encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
    Xml,
    TagValue,
    Rdf,
}

impl Format {
    /// Detect the format from a filename suffix. `.rdf.xml` is RDF, so the
    /// double suffix is checked before the plain `.xml` one.
    pub fn from_path(path: &Path) -> Result<Self, SpdxError> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if name.ends_with(".rdf.xml") || name.ends_with(".rdf") {
            return Ok(Format::Rdf);
        }
        let extension = path.extension().and_then(|s| s.to_str()).ok_or_else(|| {
            SpdxError::UnsupportedFormat(format!(
                "could not determine a file extension for `{}`",
                path.display()
            ))
        })?;
        match extension.to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "xml" => Ok(Format::Xml),
            "tag" | "spdx" => Ok(Format::TagValue),
            other => Err(SpdxError::UnsupportedFormat(format!(
                "`.{other}` is not a recognized suffix; expected .json, .yaml, .yml, .xml, .tag, .spdx, .rdf, or .rdf.xml"
            ))),
        }
    }

    /// Sniff the format from content, for input that arrives without a
    /// filename (stdin).
    pub fn from_content(content: &[u8]) -> Result<Self, SpdxError> {
        let text = String::from_utf8_lossy(content);
        let trimmed = text.trim_start();
        if trimmed.is_empty() {
            return Err(SpdxError::UnsupportedFormat("empty input".to_string()));
        }
        if trimmed.starts_with('{') {
            return Ok(Format::Json);
        }
        if trimmed.starts_with('<') {
            let head: String = trimmed.chars().take(512).collect();
            if head.contains(":RDF") || head.contains("<RDF") {
                return Ok(Format::Rdf);
            }
            return Ok(Format::Xml);
        }
        // Tag/value spells the version tag in camel case, YAML in lower.
        if text.contains("SPDXVersion:") {
            return Ok(Format::TagValue);
        }
        Ok(Format::Yaml)
    }

    /// The typical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Xml => "xml",
            Format::TagValue => "spdx",
            Format::Rdf => "rdf.xml",
        }
    }
}

/// Decode a document from `source`.
pub fn read_document<R: Read>(source: R, format: Format) -> Result<Document, SpdxError> {
    match format {
        Format::Json => json::parse(source),
        Format::Yaml => yaml::parse(source),
        Format::Xml => xml::parse(source),
        Format::TagValue => tag_value::parse(source),
        Format::Rdf => rdf::parse(source),
    }
}

/// Options for the write path.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Refuse to write a document that does not validate.
    pub validate: bool,
    /// Emit equal-by-value duplicate entities once.
    pub drop_duplicates: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            validate: true,
            drop_duplicates: true,
        }
    }
}

/// Encode `document` to `sink`.
///
/// With `options.validate` set, an invalid document is refused and the
/// validation messages come back as [`SpdxError::Validation`].
pub fn write_document<W: Write>(
    sink: W,
    document: &Document,
    format: Format,
    options: WriteOptions,
) -> Result<(), SpdxError> {
    let deduplicated;
    let mut document = document;
    if options.drop_duplicates {
        deduplicated = drop_duplicates(document.clone());
        document = &deduplicated;
    }
    if options.validate {
        let problems = validate_document(document);
        if !problems.is_empty() {
            return Err(SpdxError::Validation(problems));
        }
    }
    match format {
        Format::Json => json::write(sink, document),
        Format::Yaml => yaml::write(sink, document),
        Format::Xml => xml::write(sink, document),
        Format::TagValue => tag_value::write(sink, document),
        Format::Rdf => rdf::write(sink, document),
    }
}

/// Remove exact duplicates from the document's entity lists, keeping the
/// first occurrence of each. Equality is by all fields, and the assertion
/// markers never equal a string of the same spelling.
pub fn drop_duplicates(mut document: Document) -> Document {
    dedup(&mut document.external_document_refs);
    dedup(&mut document.packages);
    dedup(&mut document.files);
    dedup(&mut document.snippets);
    dedup(&mut document.annotations);
    dedup(&mut document.relationships);
    dedup(&mut document.extracted_licensing_info);
    document
}

fn dedup<T: PartialEq>(items: &mut Vec<T>) {
    let mut kept: Vec<T> = Vec::with_capacity(items.len());
    for item in items.drain(..) {
        if !kept.contains(&item) {
            kept.push(item);
        }
    }
    *items = kept;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models_v2::enums::RelationshipType;
    use crate::models_v2::values::{parse_timestamp, Actor, SpdxValue};
    use crate::models_v2::{CreationInfo, Package, Relationship};
    use std::path::PathBuf;

    #[test]
    fn suffixes_map_to_formats() {
        for (name, format) in [
            ("doc.json", Format::Json),
            ("doc.yaml", Format::Yaml),
            ("doc.yml", Format::Yaml),
            ("doc.xml", Format::Xml),
            ("doc.tag", Format::TagValue),
            ("doc.spdx", Format::TagValue),
            ("doc.rdf", Format::Rdf),
            ("doc.rdf.xml", Format::Rdf),
            ("DOC.SPDX", Format::TagValue),
        ] {
            assert_eq!(Format::from_path(&PathBuf::from(name)).unwrap(), format, "{name}");
        }
    }

    #[test]
    fn unknown_suffixes_are_named_in_the_error() {
        let error = Format::from_path(&PathBuf::from("doc.txt")).unwrap_err();
        assert!(error.to_string().contains(".txt"));
        assert!(Format::from_path(&PathBuf::from("doc")).is_err());
    }

    #[test]
    fn content_sniffing_covers_all_five() {
        assert_eq!(Format::from_content(b"{\"spdxVersion\":\"SPDX-2.3\"}").unwrap(), Format::Json);
        assert_eq!(Format::from_content(b"  <Document/>").unwrap(), Format::Xml);
        assert_eq!(
            Format::from_content(b"<?xml version=\"1.0\"?>\n<rdf:RDF xmlns:rdf=\"x\"/>").unwrap(),
            Format::Rdf
        );
        assert_eq!(
            Format::from_content(b"## Document Information\nSPDXVersion: SPDX-2.3\n").unwrap(),
            Format::TagValue
        );
        assert_eq!(
            Format::from_content(b"spdxVersion: SPDX-2.3\n").unwrap(),
            Format::Yaml
        );
        assert!(Format::from_content(b"   ").is_err());
    }

    fn demo_document() -> Document {
        let creation_info = CreationInfo::new(
            vec![Actor::tool("demo-tool")],
            parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
        );
        Document::new("demo", "https://example.com/demo", creation_info)
    }

    #[test]
    fn duplicate_relationships_are_emitted_once() {
        let mut document = demo_document();
        let relationship = Relationship::new(
            "SPDXRef-DOCUMENT",
            RelationshipType::Describes,
            SpdxValue::Value("SPDXRef-P".to_string()),
        );
        document.relationships.push(relationship.clone());
        document.relationships.push(relationship);
        let deduplicated = drop_duplicates(document);
        assert_eq!(deduplicated.relationships.len(), 1);
    }

    #[test]
    fn near_duplicates_survive_deduplication() {
        let mut document = demo_document();
        let package = Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion);
        let mut other = package.clone();
        other.download_location = SpdxValue::Value("https://example.com/pkg".to_string());
        document.packages.push(package);
        document.packages.push(other);
        let deduplicated = drop_duplicates(document);
        assert_eq!(deduplicated.packages.len(), 2);
    }

    #[test]
    fn writing_an_invalid_document_is_refused() {
        let mut document = demo_document();
        // Lowercase idstring violates the SPDXRef grammar.
        document.packages.push(Package::new(
            "spdxref-bad id",
            "pkg",
            SpdxValue::NoAssertion,
        ));
        let mut buffer = Vec::new();
        let error =
            write_document(&mut buffer, &document, Format::Json, WriteOptions::default())
                .unwrap_err();
        assert!(matches!(error, SpdxError::Validation(_)));
        assert!(buffer.is_empty());

        let options = WriteOptions {
            validate: false,
            ..WriteOptions::default()
        };
        write_document(&mut buffer, &document, Format::Json, options).unwrap();
        assert!(!buffer.is_empty());
    }
}
