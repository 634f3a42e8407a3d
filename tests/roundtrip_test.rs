//! Round-trip tests across the five encodings.
//!
//! Every test decodes and re-encodes through the library API; structural
//! equality after a round trip is the contract the codecs share.

use pretty_assertions::assert_eq;
use spdx_convert::formats::{read_document, write_document, Format, WriteOptions};
use spdx_convert::license::parse_license_field;
use spdx_convert::models_v2::enums::{AnnotationType, ChecksumAlgorithm, RelationshipType};
use spdx_convert::models_v2::values::{parse_timestamp, Actor, OrNoAssertion, SpdxValue};
use spdx_convert::models_v2::{
    Annotation, Checksum, CreationInfo, Document, ExternalDocumentRef, ExtractedLicensingInfo,
    File, Package, Relationship, Snippet,
};
use spdx_convert::validation::validate_document;
use std::io::Cursor;

const ALL_FORMATS: [Format; 5] = [
    Format::Json,
    Format::Yaml,
    Format::Xml,
    Format::TagValue,
    Format::Rdf,
];

const MINIMAL_JSON: &str = r#"{"spdxVersion":"SPDX-2.3","dataLicense":"CC0-1.0","SPDXID":"SPDXRef-DOCUMENT","name":"x","documentNamespace":"https://ex/1","creationInfo":{"created":"2023-01-02T03:04:05Z","creators":["Tool: t"]}}"#;

fn sha1() -> Checksum {
    Checksum::new(
        ChecksumAlgorithm::Sha1,
        "d6a770ba38583ed4bb4525bd96e50461655d2758",
    )
}

fn blake2b() -> Checksum {
    Checksum::new(
        ChecksumAlgorithm::Blake2b256,
        "aabbccddeeff00112233445566778899aabbccddeeff00112233445566778899",
    )
}

/// A document exercising every entity array, valid under the 2.3 rules.
fn rich_document() -> Document {
    let creation_info = CreationInfo::new(
        vec![
            Actor::tool("spdx-convert-tests"),
            Actor::person("Jane Doe", Some("jane@example.com".to_string())),
        ],
        parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
    );
    let mut document = Document::new("rich", "https://example.com/rich", creation_info);
    document.external_document_refs.push(ExternalDocumentRef::new(
        "DocumentRef-other",
        "https://example.com/other",
        sha1(),
    ));

    let mut package = Package::new(
        "SPDXRef-P",
        "pkg",
        SpdxValue::Value("https://example.com/pkg.tar.gz".to_string()),
    );
    package.version = Some("1.2.3".to_string());
    package.supplier = Some(OrNoAssertion::Value(Actor::organization("ACME", None)));
    package.checksums.push(blake2b());
    package.license_concluded = Some(parse_license_field("MIT OR Apache-2.0").unwrap());
    package.license_declared = Some(parse_license_field("NOASSERTION").unwrap());
    package.copyright_text = Some(SpdxValue::None);
    package.summary = Some("a package".to_string());
    document.packages.push(package);

    let mut file = File::new("SPDXRef-F", "src/lib.c", vec![sha1()]);
    file.copyright_text = Some(SpdxValue::Value("Copyright ACME".to_string()));
    file.comment = Some("two\nlines".to_string());
    document.files.push(file);

    let mut snippet = Snippet::new("SPDXRef-S", "SPDXRef-F", (100, 400));
    snippet.line_range = Some((5, 23));
    snippet.name = Some("portion".to_string());
    document.snippets.push(snippet);

    document.relationships.push(Relationship::new(
        "SPDXRef-DOCUMENT",
        RelationshipType::Describes,
        SpdxValue::Value("SPDXRef-P".to_string()),
    ));
    document.relationships.push(Relationship::new(
        "SPDXRef-P",
        RelationshipType::Contains,
        SpdxValue::Value("SPDXRef-F".to_string()),
    ));

    document.annotations.push(Annotation::new(
        "SPDXRef-P",
        AnnotationType::Review,
        Actor::person("Reviewer", None),
        parse_timestamp("2023-05-06T07:08:09Z").unwrap(),
        "checked",
    ));

    let mut info = ExtractedLicensingInfo::new("LicenseRef-custom", "Custom license text.");
    info.license_name = Some(OrNoAssertion::Value("Custom".to_string()));
    document.extracted_licensing_info.push(info);

    document
}

fn round_trip(document: &Document, format: Format) -> Document {
    let mut encoded = Vec::new();
    write_document(&mut encoded, document, format, WriteOptions::default())
        .unwrap_or_else(|error| panic!("writing {format:?} failed: {error}"));
    read_document(Cursor::new(&encoded), format)
        .unwrap_or_else(|error| panic!("reading back {format:?} failed: {error}"))
}

#[test]
fn minimal_json_survives_a_yaml_round_trip() {
    let document = read_document(Cursor::new(MINIMAL_JSON), Format::Json).unwrap();
    assert!(validate_document(&document).is_empty());

    let mut yaml = Vec::new();
    write_document(&mut yaml, &document, Format::Yaml, WriteOptions::default()).unwrap();
    let again = read_document(Cursor::new(&yaml), Format::Yaml).unwrap();
    assert_eq!(document, again);
}

#[test]
fn every_format_round_trips_the_rich_document() {
    let document = rich_document();
    assert_eq!(validate_document(&document), vec![]);
    for format in ALL_FORMATS {
        let again = round_trip(&document, format);
        assert_eq!(document, again, "{format:?}");
    }
}

#[test]
fn a_conversion_chain_through_all_five_formats_is_lossless() {
    let document = rich_document();
    let mut current = document.clone();
    for format in ALL_FORMATS {
        current = round_trip(&current, format);
    }
    assert_eq!(document, current);
}

#[test]
fn blake2b_keeps_its_spelling_in_every_encoding() {
    let document = rich_document();
    for format in ALL_FORMATS {
        let again = round_trip(&document, format);
        assert_eq!(
            again.packages[0].checksums[0].algorithm,
            ChecksumAlgorithm::Blake2b256,
            "{format:?}"
        );
    }

    let mut tag_value = Vec::new();
    write_document(&mut tag_value, &document, Format::TagValue, WriteOptions::default()).unwrap();
    let text = String::from_utf8(tag_value).unwrap();
    assert!(text.contains("BLAKE2b-256"));

    let mut rdf = Vec::new();
    write_document(&mut rdf, &document, Format::Rdf, WriteOptions::default()).unwrap();
    let text = String::from_utf8(rdf).unwrap();
    assert!(text.contains("checksumAlgorithm_blake2b256"));
}

#[test]
fn markers_stay_markers_in_every_encoding() {
    let document = rich_document();
    for format in ALL_FORMATS {
        let again = round_trip(&document, format);
        let package = &again.packages[0];
        assert_eq!(package.license_declared, Some(SpdxValue::NoAssertion), "{format:?}");
        assert_eq!(package.copyright_text, Some(SpdxValue::None), "{format:?}");
        // The concluded license is data, not a marker, and renders back to
        // the same expression.
        let concluded = package.license_concluded.as_ref().unwrap();
        let SpdxValue::Value(expression) = concluded else {
            panic!("{format:?}: expression was conflated with a marker");
        };
        assert_eq!(expression.to_string(), "MIT OR Apache-2.0");
    }
}

#[test]
fn json_and_tag_value_writes_are_idempotent() {
    let document = rich_document();
    for format in [Format::Json, Format::TagValue] {
        let mut first = Vec::new();
        write_document(&mut first, &document, format, WriteOptions::default()).unwrap();
        let decoded = read_document(Cursor::new(&first), format).unwrap();
        let mut second = Vec::new();
        write_document(&mut second, &decoded, format, WriteOptions::default()).unwrap();
        assert_eq!(
            String::from_utf8(first).unwrap(),
            String::from_utf8(second).unwrap(),
            "{format:?}"
        );
    }
}
