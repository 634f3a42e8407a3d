//! Parsing of RDF/XML input.
//!
//! The XML tree is read first, then element names are rewritten to
//! canonical `spdx:`/`rdf:`/`rdfs:`/`ptr:` prefixes by resolving the xmlns
//! declarations in scope. The rest of the reader works on those canonical
//! names, so input may use any prefixes it likes.

use super::{DOAP, LICENSE_LIST, POINTERS, RDF_SCHEMA, RDF_SYNTAX, SPDX_TERMS};
use crate::errors::{ParseMessage, SpdxError};
use crate::formats::xml::{read_tree, XmlNode};
use crate::license::{parse_license_field, LicenseExpression};
use crate::models_v2::enums::{
    AnnotationType, ChecksumAlgorithm, ExternalRefCategory, FileType, PackagePurpose,
    RelationshipType,
};
use crate::models_v2::values::{parse_timestamp, Actor, OrNoAssertion, SpdxValue, Version};
use crate::models_v2::{
    Annotation, Checksum, CreationInfo, Document, ExternalDocumentRef, ExternalPackageRef,
    ExtractedLicensingInfo, File, Package, PackageVerificationCode, Relationship, Snippet,
};
use std::collections::HashMap;
use std::io::Read;

/// Parse RDF/XML input into a document.
pub fn parse<R: Read>(source: R) -> Result<Document, SpdxError> {
    let tree = resolve(read_tree(source, "rdf")?, &HashMap::new());
    if tree.name != "rdf:RDF" {
        return Err(SpdxError::parse(
            "rdf",
            format!("expected an <rdf:RDF> root element, found <{}>", tree.name),
        ));
    }
    let mut typed = Vec::new();
    collect_typed(&tree, "spdx:SpdxDocument", &mut typed);
    let Some(&document_node) = typed.first() else {
        return Err(SpdxError::parse("rdf", "no spdx:SpdxDocument element found"));
    };

    let about = document_node.attribute("rdf:about").unwrap_or_default();
    let (namespace, document_id) = match about.rsplit_once('#') {
        Some((namespace, fragment)) => (namespace.to_string(), fragment.to_string()),
        None => (about.to_string(), "SPDXRef-DOCUMENT".to_string()),
    };

    let mut messages = Vec::new();
    let mut externals = Vec::new();
    for (index, wrapper) in document_node
        .children_named("spdx:externalDocumentRef")
        .enumerate()
    {
        let location = format!("document.externalDocumentRefs[{index}]");
        match parse_external_document_ref(wrapper) {
            Ok(external) => externals.push(external),
            Err(error) => messages.extend(error.into_messages(&location)),
        }
    }
    let context = Context {
        namespace: namespace.clone(),
        externals: externals.clone(),
    };

    let mut reader = NodeReader {
        node: document_node,
        path: "document",
        messages: &mut messages,
    };
    let spdx_version = reader.required_text("spdx:specVersion");
    let name = reader.required_text("spdx:name");
    let comment = reader.optional_text("rdfs:comment");
    let data_license = match document_node.child("spdx:dataLicense") {
        Some(node) => Some(match node.attribute("rdf:resource") {
            Some(resource) => resource
                .strip_prefix(LICENSE_LIST)
                .unwrap_or(resource)
                .to_string(),
            None => node.text.clone(),
        }),
        None => {
            reader.push("missing required property `spdx:dataLicense`");
            None
        }
    };
    let creation_info = match document_node.child("spdx:creationInfo") {
        Some(wrapper) => parse_creation_info(wrapper, &mut messages),
        None => {
            messages.push(ParseMessage::new(
                "document",
                "missing required property `spdx:creationInfo`",
            ));
            None
        }
    };

    let mut extracted = Vec::new();
    for (index, wrapper) in document_node
        .children_named("spdx:hasExtractedLicensingInfo")
        .enumerate()
    {
        let location = format!("document.hasExtractedLicensingInfos[{index}]");
        match parse_extracted(wrapper) {
            Ok(info) => extracted.push(info),
            Err(error) => messages.extend(error.into_messages(&location)),
        }
    }

    let mut relationships = Vec::new();
    let mut annotations = Vec::new();
    parse_extras(
        &context,
        &document_id,
        document_node,
        "document",
        &mut messages,
        &mut relationships,
        &mut annotations,
    );

    let mut packages = Vec::new();
    let mut package_nodes = Vec::new();
    collect_typed(&tree, "spdx:Package", &mut package_nodes);
    for (index, node) in package_nodes.iter().enumerate() {
        let path = format!("document.packages[{index}]");
        if let Some(package) = parse_package(&context, node, &path, &mut messages) {
            parse_extras(
                &context,
                &package.spdx_id,
                node,
                &path,
                &mut messages,
                &mut relationships,
                &mut annotations,
            );
            packages.push(package);
        }
    }

    let mut files = Vec::new();
    let mut file_nodes = Vec::new();
    collect_typed(&tree, "spdx:File", &mut file_nodes);
    for (index, node) in file_nodes.iter().enumerate() {
        let path = format!("document.files[{index}]");
        if let Some(file) = parse_file(&context, node, &path, &mut messages) {
            parse_extras(
                &context,
                &file.spdx_id,
                node,
                &path,
                &mut messages,
                &mut relationships,
                &mut annotations,
            );
            files.push(file);
        }
    }

    let mut snippets = Vec::new();
    let mut snippet_nodes = Vec::new();
    collect_typed(&tree, "spdx:Snippet", &mut snippet_nodes);
    for (index, node) in snippet_nodes.iter().enumerate() {
        let path = format!("document.snippets[{index}]");
        if let Some(snippet) = parse_snippet(&context, node, &path, &mut messages) {
            parse_extras(
                &context,
                &snippet.spdx_id,
                node,
                &path,
                &mut messages,
                &mut relationships,
                &mut annotations,
            );
            snippets.push(snippet);
        }
    }

    // Plain descriptions carry relationships whose source is not an element
    // of this document.
    for child in tree.children_named("rdf:Description") {
        let Some(about) = child.attribute("rdf:about") else {
            continue;
        };
        match context.reference(about) {
            Ok(source) => parse_extras(
                &context,
                &source,
                child,
                "document",
                &mut messages,
                &mut relationships,
                &mut annotations,
            ),
            Err(error) => messages.extend(error.into_messages("document")),
        }
    }

    if !messages.is_empty() {
        return Err(SpdxError::Parse(messages));
    }
    let (Some(spdx_version), Some(data_license), Some(name), Some(creation_info)) =
        (spdx_version, data_license, name, creation_info)
    else {
        return Err(SpdxError::parse("rdf", "required document properties are missing"));
    };
    let mut document = Document::new(name, namespace, creation_info);
    document.spdx_version = spdx_version;
    document.data_license = data_license;
    document.spdx_id = document_id;
    document.comment = comment;
    document.external_document_refs = externals;
    document.packages = packages;
    document.files = files;
    document.snippets = snippets;
    document.annotations = annotations;
    document.relationships = relationships;
    document.extracted_licensing_info = extracted;
    Ok(document)
}

struct Context {
    namespace: String,
    externals: Vec<ExternalDocumentRef>,
}

impl Context {
    /// Turn an IRI back into an element reference. Local IRIs yield the bare
    /// identifier; IRIs under a declared external namespace yield
    /// `DocumentRef-x:SPDXRef-y`.
    fn reference(&self, iri: &str) -> Result<String, SpdxError> {
        if let Some(local) = iri.strip_prefix(&format!("{}#", self.namespace)) {
            return Ok(local.to_string());
        }
        if let Some(local) = iri.strip_prefix('#') {
            return Ok(local.to_string());
        }
        for external in &self.externals {
            let prefix = format!("{}#", external.document_uri);
            if let Some(local) = iri.strip_prefix(&prefix) {
                return Ok(format!("{}:{}", external.document_ref_id, local));
            }
        }
        Err(SpdxError::parse(
            "rdf",
            format!(
                "`{iri}` is outside the document namespace and no DocumentRef-* declares its namespace"
            ),
        ))
    }
}

const VOCABULARIES: [(&str, &str); 5] = [
    (RDF_SYNTAX, "rdf"),
    (RDF_SCHEMA, "rdfs"),
    (SPDX_TERMS, "spdx"),
    (POINTERS, "ptr"),
    (DOAP, "doap"),
];

/// Rewrite names to canonical prefixes using the xmlns declarations in
/// scope; xmlns attributes themselves are dropped from the tree.
fn resolve(mut node: XmlNode, scope: &HashMap<String, String>) -> XmlNode {
    let mut scope = scope.clone();
    let mut kept = Vec::new();
    for (key, value) in node.attributes {
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.insert(prefix.to_string(), value);
        } else if key == "xmlns" {
            scope.insert(String::new(), value);
        } else {
            kept.push((key, value));
        }
    }
    node.name = canonical_name(&node.name, &scope);
    node.attributes = kept
        .into_iter()
        .map(|(key, value)| {
            if key.contains(':') {
                (canonical_name(&key, &scope), value)
            } else {
                (key, value)
            }
        })
        .collect();
    node.children = node
        .children
        .into_iter()
        .map(|child| resolve(child, &scope))
        .collect();
    node
}

fn canonical_name(name: &str, scope: &HashMap<String, String>) -> String {
    let (prefix, local) = match name.split_once(':') {
        Some((prefix, local)) => (prefix, local),
        None => ("", name),
    };
    let Some(uri) = scope.get(prefix) else {
        return name.to_string();
    };
    for (vocabulary, short) in VOCABULARIES {
        if uri == vocabulary {
            return format!("{short}:{local}");
        }
    }
    name.to_string()
}

fn collect_typed<'a>(node: &'a XmlNode, name: &str, found: &mut Vec<&'a XmlNode>) {
    if node.name == name {
        found.push(node);
    }
    for child in &node.children {
        collect_typed(child, name, found);
    }
}

struct NodeReader<'a, 'm> {
    node: &'a XmlNode,
    path: &'a str,
    messages: &'m mut Vec<ParseMessage>,
}

impl NodeReader<'_, '_> {
    fn key_path(&self, key: &str) -> String {
        format!("{}.{}", self.path, key)
    }

    fn push(&mut self, detail: impl Into<String>) {
        self.messages.push(ParseMessage::new(self.path, detail));
    }

    fn required_text(&mut self, name: &str) -> Option<String> {
        match self.node.child(name) {
            Some(child) => Some(child.text.clone()),
            None => {
                self.push(format!("missing required property `{name}`"));
                None
            }
        }
    }

    fn optional_text(&self, name: &str) -> Option<String> {
        self.node.child(name).map(|child| child.text.clone())
    }

    fn collect<T>(&mut self, key: &str, result: Result<T, SpdxError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                let location = self.key_path(key);
                self.messages.extend(error.into_messages(&location));
                None
            }
        }
    }
}

/// The enum term of a property node: the fragment of its `rdf:resource`,
/// or its text when the value was written as a literal.
fn term_of(node: &XmlNode) -> String {
    match node.attribute("rdf:resource") {
        Some(resource) => match resource.rsplit_once('#') {
            Some((_, fragment)) => fragment.to_string(),
            None => resource.to_string(),
        },
        None => node.text.clone(),
    }
}

fn subject_of(
    context: &Context,
    node: &XmlNode,
    reader: &mut NodeReader,
) -> Option<String> {
    match node.attribute("rdf:about") {
        Some(about) => reader.collect("SPDXID", context.reference(about)),
        None => {
            reader.push("missing rdf:about");
            None
        }
    }
}

fn parse_creation_info(
    wrapper: &XmlNode,
    messages: &mut Vec<ParseMessage>,
) -> Option<CreationInfo> {
    let Some(node) = wrapper.child("spdx:CreationInfo") else {
        messages.push(ParseMessage::new(
            "document.creationInfo",
            "missing spdx:CreationInfo node",
        ));
        return None;
    };
    let mut reader = NodeReader {
        node,
        path: "document.creationInfo",
        messages,
    };
    let created = reader
        .required_text("spdx:created")
        .and_then(|raw| reader.collect("created", parse_timestamp(&raw)));
    let mut creators = Vec::new();
    for (index, child) in node.children_named("spdx:creator").enumerate() {
        if let Some(creator) =
            reader.collect(&format!("creators[{index}]"), Actor::parse(&child.text))
        {
            creators.push(creator);
        }
    }
    if creators.is_empty() {
        reader.push("missing required property `spdx:creator`");
    }
    let license_list_version = reader
        .optional_text("spdx:licenseListVersion")
        .and_then(|raw| reader.collect("licenseListVersion", raw.parse::<Version>()));
    let comment = reader.optional_text("rdfs:comment");
    let created = created?;
    if creators.is_empty() {
        return None;
    }
    let mut info = CreationInfo::new(creators, created);
    info.creator_comment = comment;
    info.license_list_version = license_list_version;
    Some(info)
}

fn parse_external_document_ref(wrapper: &XmlNode) -> Result<ExternalDocumentRef, SpdxError> {
    let node = wrapper.child("spdx:ExternalDocumentRef").ok_or_else(|| {
        SpdxError::parse("external document ref", "missing spdx:ExternalDocumentRef node")
    })?;
    let id = node
        .attribute("rdf:about")
        .and_then(|about| about.rsplit_once('#'))
        .map(|(_, fragment)| fragment.to_string())
        .ok_or_else(|| {
            SpdxError::parse("external document ref", "missing DocumentRef-* identifier")
        })?;
    let uri = node
        .child("spdx:spdxDocument")
        .and_then(|child| child.attribute("rdf:resource"))
        .ok_or_else(|| {
            SpdxError::parse("external document ref", "missing spdx:spdxDocument resource")
        })?;
    let checksum = parse_checksum(node.child("spdx:checksum").ok_or_else(|| {
        SpdxError::parse("external document ref", "missing spdx:checksum node")
    })?)?;
    Ok(ExternalDocumentRef::new(id, uri, checksum))
}

fn parse_checksum(wrapper: &XmlNode) -> Result<Checksum, SpdxError> {
    let node = wrapper
        .child("spdx:Checksum")
        .ok_or_else(|| SpdxError::parse("checksum", "missing spdx:Checksum node"))?;
    let algorithm = node
        .child("spdx:algorithm")
        .ok_or_else(|| SpdxError::parse("checksum", "missing spdx:algorithm"))?;
    let algorithm = ChecksumAlgorithm::from_rdf_term(&term_of(algorithm))?;
    let value = node
        .child("spdx:checksumValue")
        .ok_or_else(|| SpdxError::parse("checksum", "missing spdx:checksumValue"))?;
    Ok(Checksum::new(algorithm, value.text.clone()))
}

fn parse_verification_code(wrapper: &XmlNode) -> Result<PackageVerificationCode, SpdxError> {
    let node = wrapper.child("spdx:PackageVerificationCode").ok_or_else(|| {
        SpdxError::parse("verification code", "missing spdx:PackageVerificationCode node")
    })?;
    let value = node
        .child("spdx:packageVerificationCodeValue")
        .ok_or_else(|| {
            SpdxError::parse("verification code", "missing spdx:packageVerificationCodeValue")
        })?;
    let mut code = PackageVerificationCode::new(value.text.clone());
    code.excluded_files = node
        .children_named("spdx:packageVerificationCodeExcludedFile")
        .map(|child| child.text.clone())
        .collect();
    Ok(code)
}

fn parse_external_ref(wrapper: &XmlNode) -> Result<ExternalPackageRef, SpdxError> {
    let node = wrapper
        .child("spdx:ExternalRef")
        .ok_or_else(|| SpdxError::parse("external ref", "missing spdx:ExternalRef node"))?;
    let category = node
        .child("spdx:referenceCategory")
        .ok_or_else(|| SpdxError::parse("external ref", "missing spdx:referenceCategory"))?;
    let category = ExternalRefCategory::from_rdf_term(&term_of(category))?;
    let reference_type = node
        .child("spdx:referenceType")
        .ok_or_else(|| SpdxError::parse("external ref", "missing spdx:referenceType"))?;
    let reference_type = match reference_type.attribute("rdf:resource") {
        Some(resource) => resource
            .rsplit(['/', '#'])
            .next()
            .unwrap_or(resource)
            .to_string(),
        None => reference_type.text.clone(),
    };
    let locator = node
        .child("spdx:referenceLocator")
        .ok_or_else(|| SpdxError::parse("external ref", "missing spdx:referenceLocator"))?;
    let mut external_ref = ExternalPackageRef::new(category, reference_type, locator.text.clone());
    external_ref.comment = node.child("rdfs:comment").map(|child| child.text.clone());
    Ok(external_ref)
}

fn parse_relationship(
    context: &Context,
    source: &str,
    wrapper: &XmlNode,
) -> Result<Relationship, SpdxError> {
    let node = wrapper
        .child("spdx:Relationship")
        .ok_or_else(|| SpdxError::parse("relationship", "missing spdx:Relationship node"))?;
    let relationship_type = node
        .child("spdx:relationshipType")
        .ok_or_else(|| SpdxError::parse("relationship", "missing spdx:relationshipType"))?;
    let relationship_type = RelationshipType::from_rdf_term(&term_of(relationship_type))?;
    let related = node
        .child("spdx:relatedSpdxElement")
        .ok_or_else(|| SpdxError::parse("relationship", "missing spdx:relatedSpdxElement"))?;
    let related = related_element(context, related)?;
    let mut relationship = Relationship::new(source, relationship_type, related);
    relationship.comment = node.child("rdfs:comment").map(|child| child.text.clone());
    Ok(relationship)
}

fn related_element(context: &Context, node: &XmlNode) -> Result<SpdxValue<String>, SpdxError> {
    if let Some(resource) = node.attribute("rdf:resource") {
        if let Some(term) = resource.strip_prefix(SPDX_TERMS) {
            return match term {
                "noassertion" => Ok(SpdxValue::NoAssertion),
                "none" => Ok(SpdxValue::None),
                other => Err(SpdxError::parse(
                    "relationship",
                    format!("`{other}` is not a related element"),
                )),
            };
        }
        return Ok(SpdxValue::Value(context.reference(resource)?));
    }
    // A fully nested element definition counts as a reference to it.
    if let Some(nested) = node.children.first() {
        if let Some(about) = nested.attribute("rdf:about") {
            return Ok(SpdxValue::Value(context.reference(about)?));
        }
    }
    Ok(SpdxValue::from_plain(&node.text))
}

fn parse_annotation(subject: &str, wrapper: &XmlNode) -> Result<Annotation, SpdxError> {
    let node = wrapper
        .child("spdx:Annotation")
        .ok_or_else(|| SpdxError::parse("annotation", "missing spdx:Annotation node"))?;
    let date = node
        .child("spdx:annotationDate")
        .ok_or_else(|| SpdxError::parse("annotation", "missing spdx:annotationDate"))?;
    let date = parse_timestamp(&date.text)?;
    let annotation_type = node
        .child("spdx:annotationType")
        .ok_or_else(|| SpdxError::parse("annotation", "missing spdx:annotationType"))?;
    let annotation_type = AnnotationType::from_rdf_term(&term_of(annotation_type))?;
    let annotator = node
        .child("spdx:annotator")
        .ok_or_else(|| SpdxError::parse("annotation", "missing spdx:annotator"))?;
    let annotator = Actor::parse(&annotator.text)?;
    let comment = node
        .child("rdfs:comment")
        .ok_or_else(|| SpdxError::parse("annotation", "missing rdfs:comment"))?;
    Ok(Annotation::new(
        subject,
        annotation_type,
        annotator,
        date,
        comment.text.clone(),
    ))
}

fn parse_extras(
    context: &Context,
    subject: &str,
    node: &XmlNode,
    path: &str,
    messages: &mut Vec<ParseMessage>,
    relationships: &mut Vec<Relationship>,
    annotations: &mut Vec<Annotation>,
) {
    for (index, wrapper) in node.children_named("spdx:relationship").enumerate() {
        let location = format!("{path}.relationships[{index}]");
        match parse_relationship(context, subject, wrapper) {
            Ok(relationship) => relationships.push(relationship),
            Err(error) => messages.extend(error.into_messages(&location)),
        }
    }
    for (index, wrapper) in node.children_named("spdx:annotation").enumerate() {
        let location = format!("{path}.annotations[{index}]");
        match parse_annotation(subject, wrapper) {
            Ok(annotation) => annotations.push(annotation),
            Err(error) => messages.extend(error.into_messages(&location)),
        }
    }
}

fn license_of(
    context: &Context,
    node: &XmlNode,
) -> Result<SpdxValue<LicenseExpression>, SpdxError> {
    if let Some(resource) = node.attribute("rdf:resource") {
        if let Some(term) = resource.strip_prefix(SPDX_TERMS) {
            return match term {
                "noassertion" => Ok(SpdxValue::NoAssertion),
                "none" => Ok(SpdxValue::None),
                other => Err(SpdxError::parse(
                    "license",
                    format!("`{other}` is not a license term"),
                )),
            };
        }
        if let Some(id) = resource.strip_prefix(LICENSE_LIST) {
            return parse_license_field(id);
        }
        let reference = context.reference(resource)?;
        return parse_license_field(&reference);
    }
    parse_license_field(&node.text)
}

fn parse_package(
    context: &Context,
    node: &XmlNode,
    path: &str,
    messages: &mut Vec<ParseMessage>,
) -> Option<Package> {
    let mut reader = NodeReader { node, path, messages };
    let spdx_id = subject_of(context, node, &mut reader);
    let name = reader.required_text("spdx:name");
    let download_location = reader
        .required_text("spdx:downloadLocation")
        .map(|raw| SpdxValue::from_plain(&raw));

    let (Some(spdx_id), Some(name), Some(download_location)) = (spdx_id, name, download_location)
    else {
        return None;
    };
    let mut package = Package::new(spdx_id, name, download_location);
    package.version = reader.optional_text("spdx:versionInfo");
    package.file_name = reader.optional_text("spdx:packageFileName");
    if let Some(raw) = reader.optional_text("spdx:supplier") {
        package.supplier = reader.collect("supplier", OrNoAssertion::parse_with(&raw, Actor::parse));
    }
    if let Some(raw) = reader.optional_text("spdx:originator") {
        package.originator =
            reader.collect("originator", OrNoAssertion::parse_with(&raw, Actor::parse));
    }
    if let Some(raw) = reader.optional_text("spdx:filesAnalyzed") {
        match raw.as_str() {
            "true" => package.files_analyzed = true,
            "false" => package.files_analyzed = false,
            other => {
                let location = reader.key_path("filesAnalyzed");
                reader.messages.push(ParseMessage::new(
                    location,
                    format!("`{other}` is not a boolean"),
                ));
            }
        }
    }
    if let Some(wrapper) = node.child("spdx:packageVerificationCode") {
        package.verification_code =
            reader.collect("packageVerificationCode", parse_verification_code(wrapper));
    }
    for (index, wrapper) in node.children_named("spdx:checksum").enumerate() {
        if let Some(checksum) =
            reader.collect(&format!("checksums[{index}]"), parse_checksum(wrapper))
        {
            package.checksums.push(checksum);
        }
    }
    package.homepage = reader.optional_text("doap:homepage");
    package.source_info = reader.optional_text("spdx:sourceInfo");
    if let Some(child) = node.child("spdx:licenseConcluded") {
        package.license_concluded = reader.collect("licenseConcluded", license_of(context, child));
    }
    for (index, child) in node.children_named("spdx:licenseInfoFromFiles").enumerate() {
        if let Some(license) = reader.collect(
            &format!("licenseInfoFromFiles[{index}]"),
            license_of(context, child),
        ) {
            package.license_info_from_files.push(license);
        }
    }
    if let Some(child) = node.child("spdx:licenseDeclared") {
        package.license_declared = reader.collect("licenseDeclared", license_of(context, child));
    }
    package.license_comment = reader.optional_text("spdx:licenseComments");
    package.copyright_text = reader
        .optional_text("spdx:copyrightText")
        .map(|raw| SpdxValue::from_plain(&raw));
    package.summary = reader.optional_text("spdx:summary");
    package.description = reader.optional_text("spdx:description");
    package.comment = reader.optional_text("rdfs:comment");
    for (index, wrapper) in node.children_named("spdx:externalRef").enumerate() {
        if let Some(external_ref) =
            reader.collect(&format!("externalRefs[{index}]"), parse_external_ref(wrapper))
        {
            package.external_refs.push(external_ref);
        }
    }
    package.attribution_texts = node
        .children_named("spdx:attributionText")
        .map(|child| child.text.clone())
        .collect();
    if let Some(child) = node.child("spdx:primaryPackagePurpose") {
        package.primary_package_purpose = reader.collect(
            "primaryPackagePurpose",
            PackagePurpose::from_rdf_term(&term_of(child)),
        );
    }
    if let Some(raw) = reader.optional_text("spdx:releaseDate") {
        package.release_date = reader.collect("releaseDate", parse_timestamp(&raw));
    }
    if let Some(raw) = reader.optional_text("spdx:builtDate") {
        package.built_date = reader.collect("builtDate", parse_timestamp(&raw));
    }
    if let Some(raw) = reader.optional_text("spdx:validUntilDate") {
        package.valid_until_date = reader.collect("validUntilDate", parse_timestamp(&raw));
    }
    Some(package)
}

fn parse_file(
    context: &Context,
    node: &XmlNode,
    path: &str,
    messages: &mut Vec<ParseMessage>,
) -> Option<File> {
    let mut reader = NodeReader { node, path, messages };
    let spdx_id = subject_of(context, node, &mut reader);
    let name = reader.required_text("spdx:fileName");
    let mut checksums = Vec::new();
    for (index, wrapper) in node.children_named("spdx:checksum").enumerate() {
        if let Some(checksum) =
            reader.collect(&format!("checksums[{index}]"), parse_checksum(wrapper))
        {
            checksums.push(checksum);
        }
    }
    let (Some(spdx_id), Some(name)) = (spdx_id, name) else {
        return None;
    };
    let mut file = File::new(spdx_id, name, checksums);
    for (index, child) in node.children_named("spdx:fileType").enumerate() {
        if let Some(file_type) = reader.collect(
            &format!("fileTypes[{index}]"),
            FileType::from_rdf_term(&term_of(child)),
        ) {
            file.file_types.push(file_type);
        }
    }
    if let Some(child) = node.child("spdx:licenseConcluded") {
        file.license_concluded = reader.collect("licenseConcluded", license_of(context, child));
    }
    for (index, child) in node.children_named("spdx:licenseInfoInFile").enumerate() {
        if let Some(license) = reader.collect(
            &format!("licenseInfoInFiles[{index}]"),
            license_of(context, child),
        ) {
            file.license_info_in_file.push(license);
        }
    }
    file.license_comment = reader.optional_text("spdx:licenseComments");
    file.copyright_text = reader
        .optional_text("spdx:copyrightText")
        .map(|raw| SpdxValue::from_plain(&raw));
    file.comment = reader.optional_text("rdfs:comment");
    file.notice = reader.optional_text("spdx:noticeText");
    file.contributors = node
        .children_named("spdx:fileContributor")
        .map(|child| child.text.clone())
        .collect();
    file.attribution_texts = node
        .children_named("spdx:attributionText")
        .map(|child| child.text.clone())
        .collect();
    Some(file)
}

#[derive(Clone, Copy, PartialEq)]
enum RangeKind {
    Byte,
    Line,
}

fn parse_snippet(
    context: &Context,
    node: &XmlNode,
    path: &str,
    messages: &mut Vec<ParseMessage>,
) -> Option<Snippet> {
    let mut reader = NodeReader { node, path, messages };
    let spdx_id = subject_of(context, node, &mut reader);
    let file_spdx_id = match node.child("spdx:snippetFromFile") {
        Some(child) => match child.attribute("rdf:resource") {
            Some(resource) => reader.collect("snippetFromFile", context.reference(resource)),
            None => Some(child.text.clone()),
        },
        None => {
            reader.push("missing required property `spdx:snippetFromFile`");
            None
        }
    };
    let mut byte_range = None;
    let mut line_range = None;
    for (index, wrapper) in node.children_named("spdx:range").enumerate() {
        if let Some((kind, range)) =
            reader.collect(&format!("ranges[{index}]"), parse_range(wrapper))
        {
            match kind {
                RangeKind::Byte => byte_range = Some(range),
                RangeKind::Line => line_range = Some(range),
            }
        }
    }
    if byte_range.is_none() {
        reader.push("no byte range found");
    }
    let (Some(spdx_id), Some(file_spdx_id), Some(byte_range)) =
        (spdx_id, file_spdx_id, byte_range)
    else {
        return None;
    };
    let mut snippet = Snippet::new(spdx_id, file_spdx_id, byte_range);
    snippet.line_range = line_range;
    if let Some(child) = node.child("spdx:licenseConcluded") {
        snippet.license_concluded = reader.collect("licenseConcluded", license_of(context, child));
    }
    for (index, child) in node.children_named("spdx:licenseInfoInSnippet").enumerate() {
        if let Some(license) = reader.collect(
            &format!("licenseInfoInSnippets[{index}]"),
            license_of(context, child),
        ) {
            snippet.license_info_in_snippet.push(license);
        }
    }
    snippet.license_comment = reader.optional_text("spdx:licenseComments");
    snippet.copyright_text = reader
        .optional_text("spdx:copyrightText")
        .map(|raw| SpdxValue::from_plain(&raw));
    snippet.name = reader.optional_text("spdx:name");
    snippet.comment = reader.optional_text("rdfs:comment");
    snippet.attribution_texts = node
        .children_named("spdx:attributionText")
        .map(|child| child.text.clone())
        .collect();
    Some(snippet)
}

fn parse_range(wrapper: &XmlNode) -> Result<(RangeKind, (u64, u64)), SpdxError> {
    let node = wrapper
        .child("ptr:StartEndPointer")
        .ok_or_else(|| SpdxError::parse("range", "missing ptr:StartEndPointer node"))?;
    let (start_kind, begin) = pointer_in(node, "ptr:startPointer")?;
    let (end_kind, end) = pointer_in(node, "ptr:endPointer")?;
    if start_kind != end_kind {
        return Err(SpdxError::parse(
            "range",
            "start and end pointers are of different kinds",
        ));
    }
    Ok((start_kind, (begin, end)))
}

fn pointer_in(node: &XmlNode, name: &str) -> Result<(RangeKind, u64), SpdxError> {
    let wrapper = node
        .child(name)
        .ok_or_else(|| SpdxError::parse("range", format!("missing {name} node")))?;
    if let Some(pointer) = wrapper.child("ptr:ByteOffsetPointer") {
        return Ok((RangeKind::Byte, offset_in(pointer, "ptr:offset")?));
    }
    if let Some(pointer) = wrapper.child("ptr:LineCharPointer") {
        return Ok((RangeKind::Line, offset_in(pointer, "ptr:lineNumber")?));
    }
    Err(SpdxError::parse(
        "range",
        format!("no byte or line pointer under {name}"),
    ))
}

fn offset_in(pointer: &XmlNode, name: &str) -> Result<u64, SpdxError> {
    let child = pointer
        .child(name)
        .ok_or_else(|| SpdxError::parse("range", format!("missing {name}")))?;
    child
        .text
        .parse()
        .map_err(|_| SpdxError::parse("range", format!("`{}` is not an integer", child.text)))
}

fn parse_extracted(wrapper: &XmlNode) -> Result<ExtractedLicensingInfo, SpdxError> {
    let node = wrapper.child("spdx:ExtractedLicensingInfo").ok_or_else(|| {
        SpdxError::parse("extracted licensing info", "missing spdx:ExtractedLicensingInfo node")
    })?;
    let license_id = node
        .child("spdx:licenseId")
        .map(|child| child.text.clone())
        .or_else(|| {
            node.attribute("rdf:about")
                .and_then(|about| about.rsplit_once('#'))
                .map(|(_, fragment)| fragment.to_string())
        })
        .ok_or_else(|| SpdxError::parse("extracted licensing info", "missing spdx:licenseId"))?;
    let extracted_text = node
        .child("spdx:extractedText")
        .ok_or_else(|| SpdxError::parse("extracted licensing info", "missing spdx:extractedText"))?;
    let mut info = ExtractedLicensingInfo::new(license_id, extracted_text.text.clone());
    info.license_name = node
        .child("spdx:name")
        .map(|child| OrNoAssertion::from_plain(&child.text));
    info.cross_references = node
        .children_named("rdfs:seeAlso")
        .map(|child| child.text.clone())
        .collect();
    info.comment = node.child("rdfs:comment").map(|child| child.text.clone());
    Ok(info)
}
