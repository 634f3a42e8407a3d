//! The 2.x to 3.x bump, from decoded input to payload.

use spdx_convert::bump::{bump_document, bump_document_with_sink};
use spdx_convert::formats::{read_document, Format};
use spdx_convert::models_v2::enums::RelationshipType;
use spdx_convert::models_v3::payload::Payload;
use spdx_convert::models_v3::{Element, HashAlgorithm, IntegrityMethod};
use spdx_convert::notes::NoteList;
use std::io::Cursor;

const DESCRIBED_PACKAGE: &str = r#"{
    "spdxVersion": "SPDX-2.3",
    "dataLicense": "CC0-1.0",
    "SPDXID": "SPDXRef-DOCUMENT",
    "name": "bumpworthy",
    "documentNamespace": "https://example.com/bump",
    "creationInfo": {
        "created": "2023-01-02T03:04:05Z",
        "creators": ["Tool: demo-tool"]
    },
    "packages": [{
        "SPDXID": "SPDXRef-P",
        "name": "pkg",
        "downloadLocation": "NOASSERTION",
        "licenseConcluded": "MIT",
        "checksums": [{
            "algorithm": "SHA1",
            "checksumValue": "d6a770ba38583ed4bb4525bd96e50461655d2758"
        }]
    }],
    "relationships": [{
        "spdxElementId": "SPDXRef-DOCUMENT",
        "relationshipType": "DESCRIBES",
        "relatedSpdxElement": "SPDXRef-P"
    }]
}"#;

fn bumped() -> Payload {
    let document = read_document(Cursor::new(DESCRIBED_PACKAGE), Format::Json).unwrap();
    bump_document(&document).unwrap()
}

#[test]
fn the_payload_opens_with_the_document_element() {
    let payload = bumped();
    let first = payload.iter().next().unwrap();
    let Element::SpdxDocument(bundle) = first else {
        panic!("expected the SpdxDocument first, got {first:?}");
    };
    assert_eq!(bundle.info.name.as_deref(), Some("bumpworthy"));
    assert_eq!(
        bundle.collection.root_elements,
        vec!["https://example.com/bump#SPDXRef-P".to_string()]
    );
    // Every other element is a member of the collection.
    assert_eq!(bundle.collection.elements.len(), payload.len() - 1);
}

#[test]
fn the_package_carries_its_checksum_as_a_hash() {
    let payload = bumped();
    let element = payload.get("https://example.com/bump#SPDXRef-P").unwrap();
    let Element::Package(package) = element else {
        panic!("expected a package, got {element:?}");
    };
    let [IntegrityMethod::Hash(hash)] = package.info.verified_using.as_slice() else {
        panic!("expected exactly one hash");
    };
    assert_eq!(hash.algorithm, HashAlgorithm::Sha1);
    assert_eq!(hash.hash_value, "d6a770ba38583ed4bb4525bd96e50461655d2758");
}

#[test]
fn the_describes_relationship_becomes_an_element() {
    let payload = bumped();
    let element = payload
        .get("https://example.com/bump#SPDXRef-Relationship-0")
        .unwrap();
    let Element::Relationship(relationship) = element else {
        panic!("expected a relationship, got {element:?}");
    };
    assert_eq!(relationship.relationship_type, RelationshipType::Describes);
    assert_eq!(
        relationship.from_element,
        "https://example.com/bump#SPDXRef-DOCUMENT"
    );
    assert_eq!(
        relationship.to,
        vec!["https://example.com/bump#SPDXRef-P".to_string()]
    );
}

#[test]
fn the_creator_tool_is_synthesized_and_linked() {
    let payload = bumped();
    let element = payload
        .get("https://example.com/bump#SPDXRef-Actor-0")
        .unwrap();
    let Element::Tool(tool) = element else {
        panic!("expected a tool, got {element:?}");
    };
    assert_eq!(tool.info.name.as_deref(), Some("demo-tool"));
    assert_eq!(
        tool.info.creation_info.created_using,
        vec!["https://example.com/bump#SPDXRef-Actor-0".to_string()]
    );
}

#[test]
fn dropped_license_fields_reach_the_sink() {
    let document = read_document(Cursor::new(DESCRIBED_PACKAGE), Format::Json).unwrap();
    let mut notes = NoteList::new();
    bump_document_with_sink(&document, &mut notes).unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes.notes[0].context, "SPDXRef-P.license_concluded");
    assert_eq!(
        notes.notes[0].message,
        "missing conversion: missing definitions for license profile"
    );
}
