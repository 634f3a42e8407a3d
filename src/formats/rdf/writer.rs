//! Serialization of a document as RDF/XML.

use super::{element_iri, DOAP, LICENSE_LIST, POINTERS, RDF_SCHEMA, RDF_SYNTAX, REFERENCE_TYPES, SPDX_TERMS};
use crate::errors::SpdxError;
use crate::formats::xml::XmlNode;
use crate::license::LicenseExpression;
use crate::models_v2::values::{format_timestamp, SpdxValue};
use crate::models_v2::{
    Annotation, Checksum, CreationInfo, Document, ExternalDocumentRef, ExternalPackageRef, File,
    Package, PackageVerificationCode, Relationship, Snippet,
};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Write `document` as RDF/XML.
pub fn write<W: Write>(mut writer: W, document: &Document) -> Result<(), SpdxError> {
    let tree = rdf_tree(document)?;
    writer
        .write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")
        .map_err(|e| SpdxError::Io(e, "failed to write XML declaration".to_string()))?;
    let mut xml = Writer::new_with_indent(&mut writer, b' ', 2);
    emit(&mut xml, &tree)
}

fn rdf_tree(document: &Document) -> Result<XmlNode, SpdxError> {
    let mut root = named("rdf:RDF");
    for (prefix, uri) in [
        ("xmlns:rdf", RDF_SYNTAX),
        ("xmlns:rdfs", RDF_SCHEMA),
        ("xmlns:spdx", SPDX_TERMS),
        ("xmlns:ptr", POINTERS),
        ("xmlns:doap", DOAP),
    ] {
        root.attributes.push((prefix.to_string(), uri.to_string()));
    }

    let mut node = about("spdx:SpdxDocument", element_iri(document, &document.spdx_id)?);
    node.children.push(literal("spdx:specVersion", &document.spdx_version));
    node.children.push(resource(
        "spdx:dataLicense",
        format!("{LICENSE_LIST}{}", document.data_license),
    ));
    node.children.push(literal("spdx:name", &document.name));
    if let Some(comment) = &document.comment {
        node.children.push(literal("rdfs:comment", comment));
    }
    node.children.push(creation_info_node(&document.creation_info));
    for external in &document.external_document_refs {
        node.children.push(external_document_ref_node(document, external));
    }
    for info in &document.extracted_licensing_info {
        let mut reified = about(
            "spdx:ExtractedLicensingInfo",
            format!("{}#{}", document.document_namespace, info.license_id),
        );
        reified.children.push(literal("spdx:licenseId", &info.license_id));
        reified.children.push(literal("spdx:extractedText", &info.extracted_text));
        if let Some(name) = &info.license_name {
            reified.children.push(literal("spdx:name", name.to_string()));
        }
        for see_also in &info.cross_references {
            reified.children.push(literal("rdfs:seeAlso", see_also));
        }
        if let Some(comment) = &info.comment {
            reified.children.push(literal("rdfs:comment", comment));
        }
        node.children.push(wrap("spdx:hasExtractedLicensingInfo", reified));
    }
    append_relationships(&mut node, document, &document.spdx_id)?;
    append_annotations(&mut node, document, &document.spdx_id);
    root.children.push(node);

    for package in &document.packages {
        root.children.push(package_node(document, package)?);
    }
    for file in &document.files {
        root.children.push(file_node(document, file)?);
    }
    for snippet in &document.snippets {
        root.children.push(snippet_node(document, snippet)?);
    }

    // Relationship sources that are not elements of this document still get
    // their reified nodes, hung off a plain description of the source IRI.
    let mut foreign: Vec<&str> = Vec::new();
    for relationship in &document.relationships {
        let source = relationship.spdx_element_id.as_str();
        if !is_local_element(document, source) && !foreign.contains(&source) {
            foreign.push(source);
        }
    }
    for source in foreign {
        let mut node = about("rdf:Description", element_iri(document, source)?);
        append_relationships(&mut node, document, source)?;
        root.children.push(node);
    }

    Ok(root)
}

fn is_local_element(document: &Document, spdx_id: &str) -> bool {
    spdx_id == document.spdx_id
        || document.packages.iter().any(|p| p.spdx_id == spdx_id)
        || document.files.iter().any(|f| f.spdx_id == spdx_id)
        || document.snippets.iter().any(|s| s.spdx_id == spdx_id)
}

fn append_relationships(
    node: &mut XmlNode,
    document: &Document,
    source: &str,
) -> Result<(), SpdxError> {
    for relationship in &document.relationships {
        if relationship.spdx_element_id == source {
            node.children.push(relationship_node(document, relationship)?);
        }
    }
    Ok(())
}

fn append_annotations(node: &mut XmlNode, document: &Document, subject: &str) {
    for annotation in &document.annotations {
        if annotation.spdx_id == subject {
            node.children.push(annotation_node(annotation));
        }
    }
}

fn relationship_node(
    document: &Document,
    relationship: &Relationship,
) -> Result<XmlNode, SpdxError> {
    let mut reified = named("spdx:Relationship");
    reified.children.push(resource(
        "spdx:relationshipType",
        format!("{SPDX_TERMS}{}", relationship.relationship_type.rdf_term()),
    ));
    let related = match &relationship.related_spdx_element_id {
        SpdxValue::NoAssertion => {
            resource("spdx:relatedSpdxElement", format!("{SPDX_TERMS}noassertion"))
        }
        SpdxValue::None => resource("spdx:relatedSpdxElement", format!("{SPDX_TERMS}none")),
        SpdxValue::Value(reference) => {
            resource("spdx:relatedSpdxElement", element_iri(document, reference)?)
        }
    };
    reified.children.push(related);
    if let Some(comment) = &relationship.comment {
        reified.children.push(literal("rdfs:comment", comment));
    }
    Ok(wrap("spdx:relationship", reified))
}

fn annotation_node(annotation: &Annotation) -> XmlNode {
    let mut reified = named("spdx:Annotation");
    reified.children.push(literal(
        "spdx:annotationDate",
        format_timestamp(&annotation.annotation_date),
    ));
    reified.children.push(resource(
        "spdx:annotationType",
        format!("{SPDX_TERMS}{}", annotation.annotation_type.rdf_term()),
    ));
    reified
        .children
        .push(literal("spdx:annotator", annotation.annotator.to_string()));
    reified
        .children
        .push(literal("rdfs:comment", &annotation.annotation_comment));
    wrap("spdx:annotation", reified)
}

fn creation_info_node(info: &CreationInfo) -> XmlNode {
    let mut reified = named("spdx:CreationInfo");
    if let Some(version) = &info.license_list_version {
        reified
            .children
            .push(literal("spdx:licenseListVersion", version.to_string()));
    }
    for creator in &info.creators {
        reified.children.push(literal("spdx:creator", creator.to_string()));
    }
    reified.children.push(literal("spdx:created", format_timestamp(&info.created)));
    if let Some(comment) = &info.creator_comment {
        reified.children.push(literal("rdfs:comment", comment));
    }
    wrap("spdx:creationInfo", reified)
}

fn external_document_ref_node(document: &Document, external: &ExternalDocumentRef) -> XmlNode {
    let mut reified = about(
        "spdx:ExternalDocumentRef",
        format!("{}#{}", document.document_namespace, external.document_ref_id),
    );
    reified
        .children
        .push(resource("spdx:spdxDocument", &external.document_uri));
    reified.children.push(checksum_node(&external.checksum));
    wrap("spdx:externalDocumentRef", reified)
}

fn checksum_node(checksum: &Checksum) -> XmlNode {
    let mut reified = named("spdx:Checksum");
    reified.children.push(resource(
        "spdx:algorithm",
        format!("{SPDX_TERMS}{}", checksum.algorithm.rdf_term()),
    ));
    reified
        .children
        .push(literal("spdx:checksumValue", &checksum.value));
    wrap("spdx:checksum", reified)
}

fn verification_code_node(code: &PackageVerificationCode) -> XmlNode {
    let mut reified = named("spdx:PackageVerificationCode");
    reified
        .children
        .push(literal("spdx:packageVerificationCodeValue", &code.value));
    for excluded in &code.excluded_files {
        reified
            .children
            .push(literal("spdx:packageVerificationCodeExcludedFile", excluded));
    }
    wrap("spdx:packageVerificationCode", reified)
}

fn external_ref_node(external_ref: &ExternalPackageRef) -> XmlNode {
    let mut reified = named("spdx:ExternalRef");
    reified.children.push(resource(
        "spdx:referenceCategory",
        format!("{SPDX_TERMS}{}", external_ref.category.rdf_term()),
    ));
    reified.children.push(resource(
        "spdx:referenceType",
        format!("{REFERENCE_TYPES}{}", external_ref.reference_type),
    ));
    reified
        .children
        .push(literal("spdx:referenceLocator", &external_ref.locator));
    if let Some(comment) = &external_ref.comment {
        reified.children.push(literal("rdfs:comment", comment));
    }
    wrap("spdx:externalRef", reified)
}

/// Single license ids become IRIs (listed licenses under the license list,
/// `LicenseRef-*` under the document namespace); composite expressions are
/// written as literals.
fn license_node(
    document: &Document,
    name: &str,
    license: &SpdxValue<LicenseExpression>,
) -> Result<XmlNode, SpdxError> {
    Ok(match license {
        SpdxValue::NoAssertion => resource(name, format!("{SPDX_TERMS}noassertion")),
        SpdxValue::None => resource(name, format!("{SPDX_TERMS}none")),
        SpdxValue::Value(expression) => {
            let rendered = expression.to_string();
            if rendered.contains(char::is_whitespace) || rendered.contains('(') {
                literal(name, rendered)
            } else {
                resource(name, license_iri(document, &rendered)?)
            }
        }
    })
}

fn license_iri(document: &Document, id: &str) -> Result<String, SpdxError> {
    if let Some((prefix, local)) = id.split_once(':') {
        let external = document
            .external_document_refs
            .iter()
            .find(|external| external.document_ref_id == prefix)
            .ok_or_else(|| {
                SpdxError::parse("rdf", format!("unknown document reference `{prefix}`"))
            })?;
        return Ok(format!("{}#{}", external.document_uri, local));
    }
    if id.starts_with("LicenseRef-") {
        return Ok(format!("{}#{}", document.document_namespace, id));
    }
    Ok(format!("{LICENSE_LIST}{id}"))
}

fn package_node(document: &Document, package: &Package) -> Result<XmlNode, SpdxError> {
    let mut node = about("spdx:Package", element_iri(document, &package.spdx_id)?);
    node.children.push(literal("spdx:name", &package.name));
    if let Some(version) = &package.version {
        node.children.push(literal("spdx:versionInfo", version));
    }
    if let Some(file_name) = &package.file_name {
        node.children.push(literal("spdx:packageFileName", file_name));
    }
    if let Some(supplier) = &package.supplier {
        node.children.push(literal("spdx:supplier", supplier.to_string()));
    }
    if let Some(originator) = &package.originator {
        node.children.push(literal("spdx:originator", originator.to_string()));
    }
    node.children.push(literal(
        "spdx:downloadLocation",
        package.download_location.to_string(),
    ));
    node.children.push(literal(
        "spdx:filesAnalyzed",
        if package.files_analyzed { "true" } else { "false" },
    ));
    if let Some(code) = &package.verification_code {
        node.children.push(verification_code_node(code));
    }
    for checksum in &package.checksums {
        node.children.push(checksum_node(checksum));
    }
    if let Some(homepage) = &package.homepage {
        node.children.push(literal("doap:homepage", homepage));
    }
    if let Some(source_info) = &package.source_info {
        node.children.push(literal("spdx:sourceInfo", source_info));
    }
    if let Some(license) = &package.license_concluded {
        node.children.push(license_node(document, "spdx:licenseConcluded", license)?);
    }
    for license in &package.license_info_from_files {
        node.children.push(license_node(document, "spdx:licenseInfoFromFiles", license)?);
    }
    if let Some(license) = &package.license_declared {
        node.children.push(license_node(document, "spdx:licenseDeclared", license)?);
    }
    if let Some(comment) = &package.license_comment {
        node.children.push(literal("spdx:licenseComments", comment));
    }
    if let Some(copyright) = &package.copyright_text {
        node.children.push(literal("spdx:copyrightText", copyright.to_string()));
    }
    if let Some(summary) = &package.summary {
        node.children.push(literal("spdx:summary", summary));
    }
    if let Some(description) = &package.description {
        node.children.push(literal("spdx:description", description));
    }
    if let Some(comment) = &package.comment {
        node.children.push(literal("rdfs:comment", comment));
    }
    for external_ref in &package.external_refs {
        node.children.push(external_ref_node(external_ref));
    }
    for attribution in &package.attribution_texts {
        node.children.push(literal("spdx:attributionText", attribution));
    }
    if let Some(purpose) = package.primary_package_purpose {
        node.children.push(resource(
            "spdx:primaryPackagePurpose",
            format!("{SPDX_TERMS}{}", purpose.rdf_term()),
        ));
    }
    if let Some(date) = &package.release_date {
        node.children.push(literal("spdx:releaseDate", format_timestamp(date)));
    }
    if let Some(date) = &package.built_date {
        node.children.push(literal("spdx:builtDate", format_timestamp(date)));
    }
    if let Some(date) = &package.valid_until_date {
        node.children.push(literal("spdx:validUntilDate", format_timestamp(date)));
    }
    append_relationships(&mut node, document, &package.spdx_id)?;
    append_annotations(&mut node, document, &package.spdx_id);
    Ok(node)
}

fn file_node(document: &Document, file: &File) -> Result<XmlNode, SpdxError> {
    let mut node = about("spdx:File", element_iri(document, &file.spdx_id)?);
    node.children.push(literal("spdx:fileName", &file.name));
    for file_type in &file.file_types {
        node.children.push(resource(
            "spdx:fileType",
            format!("{SPDX_TERMS}{}", file_type.rdf_term()),
        ));
    }
    for checksum in &file.checksums {
        node.children.push(checksum_node(checksum));
    }
    if let Some(license) = &file.license_concluded {
        node.children.push(license_node(document, "spdx:licenseConcluded", license)?);
    }
    for license in &file.license_info_in_file {
        node.children.push(license_node(document, "spdx:licenseInfoInFile", license)?);
    }
    if let Some(comment) = &file.license_comment {
        node.children.push(literal("spdx:licenseComments", comment));
    }
    if let Some(copyright) = &file.copyright_text {
        node.children.push(literal("spdx:copyrightText", copyright.to_string()));
    }
    if let Some(comment) = &file.comment {
        node.children.push(literal("rdfs:comment", comment));
    }
    if let Some(notice) = &file.notice {
        node.children.push(literal("spdx:noticeText", notice));
    }
    for contributor in &file.contributors {
        node.children.push(literal("spdx:fileContributor", contributor));
    }
    for attribution in &file.attribution_texts {
        node.children.push(literal("spdx:attributionText", attribution));
    }
    append_relationships(&mut node, document, &file.spdx_id)?;
    append_annotations(&mut node, document, &file.spdx_id);
    Ok(node)
}

fn snippet_node(document: &Document, snippet: &Snippet) -> Result<XmlNode, SpdxError> {
    let mut node = about("spdx:Snippet", element_iri(document, &snippet.spdx_id)?);
    let file_iri = element_iri(document, &snippet.file_spdx_id)?;
    node.children.push(resource("spdx:snippetFromFile", file_iri.clone()));
    node.children.push(range_node(&file_iri, snippet.byte_range, RangeKind::Byte));
    if let Some(line_range) = snippet.line_range {
        node.children.push(range_node(&file_iri, line_range, RangeKind::Line));
    }
    if let Some(license) = &snippet.license_concluded {
        node.children.push(license_node(document, "spdx:licenseConcluded", license)?);
    }
    for license in &snippet.license_info_in_snippet {
        node.children.push(license_node(document, "spdx:licenseInfoInSnippet", license)?);
    }
    if let Some(comment) = &snippet.license_comment {
        node.children.push(literal("spdx:licenseComments", comment));
    }
    if let Some(copyright) = &snippet.copyright_text {
        node.children.push(literal("spdx:copyrightText", copyright.to_string()));
    }
    if let Some(name) = &snippet.name {
        node.children.push(literal("spdx:name", name));
    }
    if let Some(comment) = &snippet.comment {
        node.children.push(literal("rdfs:comment", comment));
    }
    for attribution in &snippet.attribution_texts {
        node.children.push(literal("spdx:attributionText", attribution));
    }
    append_relationships(&mut node, document, &snippet.spdx_id)?;
    append_annotations(&mut node, document, &snippet.spdx_id);
    Ok(node)
}

enum RangeKind {
    Byte,
    Line,
}

fn range_node(file_iri: &str, (begin, end): (u64, u64), kind: RangeKind) -> XmlNode {
    let (class, property) = match kind {
        RangeKind::Byte => ("ptr:ByteOffsetPointer", "ptr:offset"),
        RangeKind::Line => ("ptr:LineCharPointer", "ptr:lineNumber"),
    };
    let pointer = |value: u64| {
        let mut node = named(class);
        node.children.push(resource("ptr:reference", file_iri));
        node.children.push(literal(property, value.to_string()));
        node
    };
    let mut start_end = named("ptr:StartEndPointer");
    start_end.children.push(wrap("ptr:startPointer", pointer(begin)));
    start_end.children.push(wrap("ptr:endPointer", pointer(end)));
    wrap("spdx:range", start_end)
}

fn named(name: &str) -> XmlNode {
    XmlNode {
        name: name.to_string(),
        ..XmlNode::default()
    }
}

fn about(name: &str, iri: impl Into<String>) -> XmlNode {
    let mut node = named(name);
    node.attributes.push(("rdf:about".to_string(), iri.into()));
    node
}

fn resource(name: &str, iri: impl Into<String>) -> XmlNode {
    let mut node = named(name);
    node.attributes.push(("rdf:resource".to_string(), iri.into()));
    node
}

fn literal(name: &str, text: impl Into<String>) -> XmlNode {
    let mut node = named(name);
    node.text = text.into();
    node
}

fn wrap(name: &str, child: XmlNode) -> XmlNode {
    let mut node = named(name);
    node.children.push(child);
    node
}

fn emit<W: Write>(writer: &mut Writer<W>, node: &XmlNode) -> Result<(), SpdxError> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    if node.children.is_empty() && node.text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }
    writer.write_event(Event::Start(start)).map_err(write_error)?;
    if !node.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&node.text)))
            .map_err(write_error)?;
    }
    for child in &node.children {
        emit(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(node.name.as_str())))
        .map_err(write_error)
}

fn write_error(error: quick_xml::Error) -> SpdxError {
    SpdxError::Serialization(format!("failed to write RDF: {error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::parse_license_field;
    use crate::models_v2::enums::{ChecksumAlgorithm, RelationshipType};
    use crate::models_v2::values::{parse_timestamp, Actor};

    fn demo_document() -> Document {
        let creation_info = CreationInfo::new(
            vec![Actor::tool("demo-tool")],
            parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
        );
        Document::new("demo", "https://example.com/demo", creation_info)
    }

    fn render(document: &Document) -> String {
        let mut buffer = Vec::new();
        write(&mut buffer, document).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn elements_get_iris_under_the_document_namespace() {
        let mut document = demo_document();
        document.packages.push(Package::new(
            "SPDXRef-P",
            "pkg",
            SpdxValue::Value("https://example.com/pkg.tar.gz".to_string()),
        ));
        let rendered = render(&document);
        assert!(rendered.contains(
            r#"<spdx:SpdxDocument rdf:about="https://example.com/demo#SPDXRef-DOCUMENT">"#
        ));
        assert!(rendered.contains(r#"<spdx:Package rdf:about="https://example.com/demo#SPDXRef-P">"#));
    }

    #[test]
    fn markers_are_resources_for_licenses_and_literals_for_text() {
        let mut document = demo_document();
        let mut package = Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion);
        package.license_concluded = Some(SpdxValue::NoAssertion);
        document.packages.push(package);
        let rendered = render(&document);
        assert!(rendered.contains(
            r#"<spdx:licenseConcluded rdf:resource="http://spdx.org/rdf/terms#noassertion"/>"#
        ));
        assert!(rendered.contains("<spdx:downloadLocation>NOASSERTION</spdx:downloadLocation>"));
    }

    #[test]
    fn single_license_ids_are_resources_and_expressions_are_literals() {
        let mut document = demo_document();
        let mut package = Package::new("SPDXRef-P", "pkg", SpdxValue::None);
        package.license_concluded = Some(parse_license_field("MIT").unwrap());
        package.license_declared = Some(parse_license_field("MIT OR Apache-2.0").unwrap());
        package
            .license_info_from_files
            .push(parse_license_field("LicenseRef-custom").unwrap());
        document.packages.push(package);
        let rendered = render(&document);
        assert!(rendered.contains(r#"rdf:resource="http://spdx.org/licenses/MIT""#));
        assert!(rendered.contains("<spdx:licenseDeclared>MIT OR Apache-2.0</spdx:licenseDeclared>"));
        assert!(rendered.contains(r#"rdf:resource="https://example.com/demo#LicenseRef-custom""#));
    }

    #[test]
    fn checksums_use_the_vocabulary_short_form() {
        let mut document = demo_document();
        let mut package = Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion);
        package.checksums.push(Checksum::new(
            ChecksumAlgorithm::Blake2b256,
            "11b6d3ee554eedf79299905a98f9b9a04e498210b59f15094c916c91d150efcd",
        ));
        document.packages.push(package);
        let rendered = render(&document);
        assert!(rendered.contains(
            r#"<spdx:algorithm rdf:resource="http://spdx.org/rdf/terms#checksumAlgorithm_blake2b256"/>"#
        ));
    }

    #[test]
    fn relationships_nest_under_their_source() {
        let mut document = demo_document();
        document.packages.push(Package::new(
            "SPDXRef-P",
            "pkg",
            SpdxValue::NoAssertion,
        ));
        document.relationships.push(Relationship::new(
            "SPDXRef-DOCUMENT",
            RelationshipType::Describes,
            SpdxValue::Value("SPDXRef-P".to_string()),
        ));
        let rendered = render(&document);
        let document_start = rendered.find("<spdx:SpdxDocument").unwrap();
        let document_end = rendered.find("</spdx:SpdxDocument>").unwrap();
        let relationship = rendered.find("<spdx:Relationship>").unwrap();
        assert!(document_start < relationship && relationship < document_end);
        assert!(rendered.contains(
            r#"rdf:resource="http://spdx.org/rdf/terms#relationshipType_describes""#
        ));
    }

    #[test]
    fn a_relationship_to_an_undeclared_external_document_fails() {
        let mut document = demo_document();
        document.relationships.push(Relationship::new(
            "SPDXRef-DOCUMENT",
            RelationshipType::Describes,
            SpdxValue::Value("DocumentRef-missing:SPDXRef-thing".to_string()),
        ));
        let mut buffer = Vec::new();
        let error = write(&mut buffer, &document).unwrap_err();
        assert!(error.to_string().contains("DocumentRef-missing"));
    }
}
