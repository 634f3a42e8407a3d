//! Rendering of a document into the dict tree.
//!
//! Key order is fixed here and nowhere else; the JSON and YAML writers emit
//! the tree as-is, which is what makes re-encoding deterministic.

use crate::license::LicenseExpression;
use crate::models_v2::enums::RelationshipType;
use crate::models_v2::values::{format_timestamp, SpdxValue};
use crate::models_v2::{
    Annotation, Checksum, Document, ExternalDocumentRef, ExternalPackageRef,
    ExtractedLicensingInfo, File, Package, PackageVerificationCode, Relationship, Snippet,
};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

/// Convert a document to the dict tree shared by JSON, YAML, and XML.
pub fn document_to_dict(document: &Document) -> Value {
    let mut map = Map::new();
    map.insert("spdxVersion".into(), json!(document.spdx_version));
    map.insert("dataLicense".into(), json!(document.data_license));
    map.insert("SPDXID".into(), json!(document.spdx_id));
    map.insert("name".into(), json!(document.name));
    map.insert(
        "documentNamespace".into(),
        json!(document.document_namespace),
    );
    insert_opt_str(&mut map, "comment", document.comment.as_deref());
    insert_array(
        &mut map,
        "externalDocumentRefs",
        document
            .external_document_refs
            .iter()
            .map(external_document_ref_to_dict)
            .collect(),
    );
    map.insert("creationInfo".into(), creation_info_to_dict(document));
    insert_array(
        &mut map,
        "packages",
        document
            .packages
            .iter()
            .map(|package| package_to_dict(package, document))
            .collect(),
    );
    insert_array(
        &mut map,
        "files",
        document
            .files
            .iter()
            .map(|file| file_to_dict(file, document))
            .collect(),
    );
    insert_array(
        &mut map,
        "snippets",
        document
            .snippets
            .iter()
            .map(|snippet| snippet_to_dict(snippet, document))
            .collect(),
    );
    insert_array(
        &mut map,
        "annotations",
        annotations_for(document, &document.spdx_id),
    );
    insert_array(
        &mut map,
        "relationships",
        document
            .relationships
            .iter()
            .map(relationship_to_dict)
            .collect(),
    );
    insert_array(
        &mut map,
        "hasExtractedLicensingInfos",
        document
            .extracted_licensing_info
            .iter()
            .map(extracted_licensing_info_to_dict)
            .collect(),
    );
    Value::Object(map)
}

fn insert_opt_str(map: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        map.insert(key.to_string(), json!(value));
    }
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

fn insert_array(map: &mut Map<String, Value>, key: &str, items: Vec<Value>) {
    if !items.is_empty() {
        map.insert(key.to_string(), Value::Array(items));
    }
}

fn insert_strings(map: &mut Map<String, Value>, key: &str, items: &[String]) {
    insert_array(map, key, items.iter().map(|s| json!(s)).collect());
}

fn license_sum(value: &SpdxValue<LicenseExpression>) -> Value {
    json!(value.to_string())
}

fn creation_info_to_dict(document: &Document) -> Value {
    let info = &document.creation_info;
    let mut map = Map::new();
    map.insert("created".into(), json!(format_timestamp(&info.created)));
    map.insert(
        "creators".into(),
        Value::Array(info.creators.iter().map(|c| json!(c.to_string())).collect()),
    );
    insert_opt_str(&mut map, "comment", info.creator_comment.as_deref());
    insert_opt(
        &mut map,
        "licenseListVersion",
        info.license_list_version.map(|v| json!(v.to_string())),
    );
    Value::Object(map)
}

fn checksum_to_dict(checksum: &Checksum) -> Value {
    json!({
        "algorithm": checksum.algorithm.spelling(),
        "checksumValue": checksum.value,
    })
}

fn external_document_ref_to_dict(external_ref: &ExternalDocumentRef) -> Value {
    json!({
        "externalDocumentId": external_ref.document_ref_id,
        "spdxDocument": external_ref.document_uri,
        "checksum": checksum_to_dict(&external_ref.checksum),
    })
}

fn verification_code_to_dict(code: &PackageVerificationCode) -> Value {
    let mut map = Map::new();
    map.insert("packageVerificationCodeValue".into(), json!(code.value));
    insert_strings(
        &mut map,
        "packageVerificationCodeExcludedFiles",
        &code.excluded_files,
    );
    Value::Object(map)
}

fn external_package_ref_to_dict(external_ref: &ExternalPackageRef) -> Value {
    let mut map = Map::new();
    map.insert(
        "referenceCategory".into(),
        json!(external_ref.category.spelling()),
    );
    map.insert("referenceType".into(), json!(external_ref.reference_type));
    map.insert("referenceLocator".into(), json!(external_ref.locator));
    insert_opt_str(&mut map, "comment", external_ref.comment.as_deref());
    Value::Object(map)
}

fn annotation_to_dict(annotation: &Annotation) -> Value {
    json!({
        "annotationDate": format_timestamp(&annotation.annotation_date),
        "annotationType": annotation.annotation_type.spelling(),
        "annotator": annotation.annotator.to_string(),
        "comment": annotation.annotation_comment,
    })
}

/// Annotations are nested under their subject on write.
fn annotations_for(document: &Document, subject: &str) -> Vec<Value> {
    document
        .annotations
        .iter()
        .filter(|annotation| annotation.spdx_id == subject)
        .map(annotation_to_dict)
        .collect()
}

/// File SPDXIDs this package CONTAINS, for the `hasFiles` key.
fn has_files_for(document: &Document, package_id: &str) -> Vec<Value> {
    let file_ids: HashSet<&str> = document.files.iter().map(|f| f.spdx_id.as_str()).collect();
    document
        .relationships
        .iter()
        .filter(|r| {
            r.spdx_element_id == package_id
                && r.relationship_type == RelationshipType::Contains
        })
        .filter_map(|r| r.related_spdx_element_id.as_value())
        .filter(|related| file_ids.contains(related.as_str()))
        .map(|related| json!(related))
        .collect()
}

fn package_to_dict(package: &Package, document: &Document) -> Value {
    let mut map = Map::new();
    map.insert("SPDXID".into(), json!(package.spdx_id));
    map.insert("name".into(), json!(package.name));
    insert_opt_str(&mut map, "versionInfo", package.version.as_deref());
    insert_opt_str(&mut map, "packageFileName", package.file_name.as_deref());
    insert_opt(
        &mut map,
        "supplier",
        package.supplier.as_ref().map(|s| json!(s.to_string())),
    );
    insert_opt(
        &mut map,
        "originator",
        package.originator.as_ref().map(|o| json!(o.to_string())),
    );
    map.insert(
        "downloadLocation".into(),
        json!(package.download_location.to_string()),
    );
    map.insert("filesAnalyzed".into(), json!(package.files_analyzed));
    insert_opt(
        &mut map,
        "packageVerificationCode",
        package.verification_code.as_ref().map(verification_code_to_dict),
    );
    insert_array(
        &mut map,
        "checksums",
        package.checksums.iter().map(checksum_to_dict).collect(),
    );
    insert_opt_str(&mut map, "homepage", package.homepage.as_deref());
    insert_opt_str(&mut map, "sourceInfo", package.source_info.as_deref());
    insert_opt(
        &mut map,
        "licenseConcluded",
        package.license_concluded.as_ref().map(license_sum),
    );
    insert_array(
        &mut map,
        "licenseInfoFromFiles",
        package.license_info_from_files.iter().map(license_sum).collect(),
    );
    insert_opt(
        &mut map,
        "licenseDeclared",
        package.license_declared.as_ref().map(license_sum),
    );
    insert_opt_str(&mut map, "licenseComments", package.license_comment.as_deref());
    insert_opt(
        &mut map,
        "copyrightText",
        package.copyright_text.as_ref().map(|c| json!(c.to_string())),
    );
    insert_opt_str(&mut map, "summary", package.summary.as_deref());
    insert_opt_str(&mut map, "description", package.description.as_deref());
    insert_opt_str(&mut map, "comment", package.comment.as_deref());
    insert_array(
        &mut map,
        "externalRefs",
        package.external_refs.iter().map(external_package_ref_to_dict).collect(),
    );
    insert_strings(&mut map, "attributionTexts", &package.attribution_texts);
    insert_opt(
        &mut map,
        "primaryPackagePurpose",
        package.primary_package_purpose.map(|p| json!(p.spelling())),
    );
    insert_opt(
        &mut map,
        "releaseDate",
        package.release_date.as_ref().map(|d| json!(format_timestamp(d))),
    );
    insert_opt(
        &mut map,
        "builtDate",
        package.built_date.as_ref().map(|d| json!(format_timestamp(d))),
    );
    insert_opt(
        &mut map,
        "validUntilDate",
        package.valid_until_date.as_ref().map(|d| json!(format_timestamp(d))),
    );
    insert_array(&mut map, "hasFiles", has_files_for(document, &package.spdx_id));
    insert_array(&mut map, "annotations", annotations_for(document, &package.spdx_id));
    Value::Object(map)
}

fn file_to_dict(file: &File, document: &Document) -> Value {
    let mut map = Map::new();
    map.insert("SPDXID".into(), json!(file.spdx_id));
    map.insert("fileName".into(), json!(file.name));
    insert_array(
        &mut map,
        "fileTypes",
        file.file_types.iter().map(|t| json!(t.spelling())).collect(),
    );
    // Checksums are required for files, so the key is always present.
    map.insert(
        "checksums".into(),
        Value::Array(file.checksums.iter().map(checksum_to_dict).collect()),
    );
    insert_opt(
        &mut map,
        "licenseConcluded",
        file.license_concluded.as_ref().map(license_sum),
    );
    insert_array(
        &mut map,
        "licenseInfoInFiles",
        file.license_info_in_file.iter().map(license_sum).collect(),
    );
    insert_opt_str(&mut map, "licenseComments", file.license_comment.as_deref());
    insert_opt(
        &mut map,
        "copyrightText",
        file.copyright_text.as_ref().map(|c| json!(c.to_string())),
    );
    insert_opt_str(&mut map, "comment", file.comment.as_deref());
    insert_opt_str(&mut map, "noticeText", file.notice.as_deref());
    insert_strings(&mut map, "fileContributors", &file.contributors);
    insert_strings(&mut map, "attributionTexts", &file.attribution_texts);
    insert_array(&mut map, "annotations", annotations_for(document, &file.spdx_id));
    Value::Object(map)
}

fn pointer(reference: &str, key: &str, value: u64) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), json!(value));
    map.insert("reference".into(), json!(reference));
    Value::Object(map)
}

fn range(reference: &str, key: &str, begin: u64, end: u64) -> Value {
    json!({
        "startPointer": pointer(reference, key, begin),
        "endPointer": pointer(reference, key, end),
    })
}

fn snippet_to_dict(snippet: &Snippet, document: &Document) -> Value {
    let mut map = Map::new();
    map.insert("SPDXID".into(), json!(snippet.spdx_id));
    map.insert("snippetFromFile".into(), json!(snippet.file_spdx_id));
    let mut ranges = vec![range(
        &snippet.file_spdx_id,
        "offset",
        snippet.byte_range.0,
        snippet.byte_range.1,
    )];
    if let Some((begin, end)) = snippet.line_range {
        ranges.push(range(&snippet.file_spdx_id, "lineNumber", begin, end));
    }
    map.insert("ranges".into(), Value::Array(ranges));
    insert_opt(
        &mut map,
        "licenseConcluded",
        snippet.license_concluded.as_ref().map(license_sum),
    );
    insert_array(
        &mut map,
        "licenseInfoInSnippets",
        snippet.license_info_in_snippet.iter().map(license_sum).collect(),
    );
    insert_opt_str(&mut map, "licenseComments", snippet.license_comment.as_deref());
    insert_opt(
        &mut map,
        "copyrightText",
        snippet.copyright_text.as_ref().map(|c| json!(c.to_string())),
    );
    insert_opt_str(&mut map, "name", snippet.name.as_deref());
    insert_opt_str(&mut map, "comment", snippet.comment.as_deref());
    insert_strings(&mut map, "attributionTexts", &snippet.attribution_texts);
    insert_array(&mut map, "annotations", annotations_for(document, &snippet.spdx_id));
    Value::Object(map)
}

fn relationship_to_dict(relationship: &Relationship) -> Value {
    let mut map = Map::new();
    map.insert("spdxElementId".into(), json!(relationship.spdx_element_id));
    map.insert(
        "relationshipType".into(),
        json!(relationship.relationship_type.spelling()),
    );
    map.insert(
        "relatedSpdxElement".into(),
        json!(relationship.related_spdx_element_id.to_string()),
    );
    insert_opt_str(&mut map, "comment", relationship.comment.as_deref());
    Value::Object(map)
}

fn extracted_licensing_info_to_dict(info: &ExtractedLicensingInfo) -> Value {
    let mut map = Map::new();
    map.insert("licenseId".into(), json!(info.license_id));
    map.insert("extractedText".into(), json!(info.extracted_text));
    insert_opt(
        &mut map,
        "name",
        info.license_name.as_ref().map(|n| json!(n.to_string())),
    );
    insert_strings(&mut map, "seeAlsos", &info.cross_references);
    insert_opt_str(&mut map, "comment", info.comment.as_deref());
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models_v2::enums::{AnnotationType, ChecksumAlgorithm};
    use crate::models_v2::values::{parse_timestamp, Actor};
    use crate::models_v2::CreationInfo;

    fn minimal_document() -> Document {
        let creation_info = CreationInfo::new(
            vec![Actor::tool("demo-tool")],
            parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
        );
        Document::new("demo", "https://example.com/demo", creation_info)
    }

    #[test]
    fn minimal_document_tree() {
        let tree = document_to_dict(&minimal_document());
        assert_eq!(
            tree,
            json!({
                "spdxVersion": "SPDX-2.3",
                "dataLicense": "CC0-1.0",
                "SPDXID": "SPDXRef-DOCUMENT",
                "name": "demo",
                "documentNamespace": "https://example.com/demo",
                "creationInfo": {
                    "created": "2023-01-02T03:04:05Z",
                    "creators": ["Tool: demo-tool"],
                },
            })
        );
    }

    #[test]
    fn key_order_is_stable() {
        let rendered = serde_json::to_string(&document_to_dict(&minimal_document())).unwrap();
        let spdx_version = rendered.find("spdxVersion").unwrap();
        let data_license = rendered.find("dataLicense").unwrap();
        let name = rendered.find("\"name\"").unwrap();
        assert!(spdx_version < data_license);
        assert!(data_license < name);
    }

    #[test]
    fn has_files_reflects_contains_relationships() {
        let mut document = minimal_document();
        document
            .packages
            .push(Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion));
        document.files.push(File::new(
            "SPDXRef-F",
            "f.c",
            vec![Checksum::new(
                ChecksumAlgorithm::Sha1,
                "d6a770ba38583ed4bb4525bd96e50461655d2759",
            )],
        ));
        document.relationships.push(Relationship::new(
            "SPDXRef-P",
            RelationshipType::Contains,
            SpdxValue::Value("SPDXRef-F".to_string()),
        ));
        // CONTAINS pointing at a non-file target stays out of hasFiles.
        document.relationships.push(Relationship::new(
            "SPDXRef-P",
            RelationshipType::Contains,
            SpdxValue::Value("SPDXRef-DOCUMENT".to_string()),
        ));
        let tree = document_to_dict(&document);
        assert_eq!(tree["packages"][0]["hasFiles"], json!(["SPDXRef-F"]));
        // The relationships themselves are still written.
        assert_eq!(tree["relationships"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn annotations_nest_under_their_subject() {
        let mut document = minimal_document();
        document
            .packages
            .push(Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion));
        document.annotations.push(Annotation::new(
            "SPDXRef-P",
            AnnotationType::Review,
            Actor::person("Reviewer", None),
            parse_timestamp("2023-05-06T07:08:09Z").unwrap(),
            "looks fine",
        ));
        document.annotations.push(Annotation::new(
            "SPDXRef-DOCUMENT",
            AnnotationType::Other,
            Actor::person("Reviewer", None),
            parse_timestamp("2023-05-06T07:08:09Z").unwrap(),
            "document note",
        ));
        let tree = document_to_dict(&document);
        assert_eq!(
            tree["packages"][0]["annotations"][0]["comment"],
            json!("looks fine")
        );
        assert_eq!(tree["annotations"][0]["comment"], json!("document note"));
        assert_eq!(tree["packages"][0]["annotations"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn markers_render_as_their_uppercase_strings() {
        let mut document = minimal_document();
        let mut package = Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion);
        package.copyright_text = Some(SpdxValue::None);
        document.packages.push(package);
        let tree = document_to_dict(&document);
        assert_eq!(tree["packages"][0]["downloadLocation"], json!("NOASSERTION"));
        assert_eq!(tree["packages"][0]["copyrightText"], json!("NONE"));
    }

    #[test]
    fn snippet_ranges_use_typed_pointers() {
        let mut document = minimal_document();
        let mut snippet = Snippet::new("SPDXRef-S", "SPDXRef-F", (310, 420));
        snippet.line_range = Some((5, 23));
        document.snippets.push(snippet);
        let tree = document_to_dict(&document);
        let ranges = tree["snippets"][0]["ranges"].as_array().unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0]["startPointer"]["offset"], json!(310));
        assert_eq!(ranges[0]["endPointer"]["offset"], json!(420));
        assert_eq!(ranges[1]["startPointer"]["lineNumber"], json!(5));
        assert_eq!(ranges[1]["startPointer"]["reference"], json!("SPDXRef-F"));
    }
}
