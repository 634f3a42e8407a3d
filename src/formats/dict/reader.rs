//! Decoding of the dict tree into a document.
//!
//! Every problem in the tree is collected while parsing; the caller gets one
//! error carrying the whole list instead of the first failure. Locations are
//! dotted paths into the tree, e.g. `document.packages[0].downloadLocation`.

use crate::errors::{ParseMessage, SpdxError};
use crate::license::parse_license_field;
use crate::models_v2::enums::{
    AnnotationType, ChecksumAlgorithm, ExternalRefCategory, FileType, PackagePurpose,
    RelationshipType,
};
use crate::models_v2::values::{parse_timestamp, Actor, OrNoAssertion, SpdxValue, Version};
use crate::models_v2::{
    Annotation, Checksum, CreationInfo, Document, ExternalDocumentRef, ExternalPackageRef,
    ExtractedLicensingInfo, File, Package, PackageVerificationCode, Relationship, Snippet,
};
use serde_json::{Map, Value};

/// Convert a dict tree into a document, aggregating every problem found.
pub fn document_from_dict(tree: &Value) -> Result<Document, SpdxError> {
    let mut messages = Vec::new();
    let Some(map) = tree.as_object() else {
        return Err(SpdxError::parse("document", "expected an object at the top level"));
    };

    let mut reader = EntityReader::new(map, "document", &mut messages);
    let spdx_version = reader.required_str("spdxVersion");
    let data_license = reader.required_str("dataLicense");
    let spdx_id = reader.required_str("SPDXID");
    let name = reader.required_str("name");
    let document_namespace = reader.required_str("documentNamespace");
    let comment = reader.optional_str("comment");
    let describes = reader.strings("documentDescribes");

    let creation_info = match map.get("creationInfo") {
        Some(value) => parse_creation_info(value, "document.creationInfo", &mut messages),
        None => {
            messages.push(ParseMessage::new(
                "document",
                "missing required key `creationInfo`",
            ));
            None
        }
    };

    let external_document_refs = object_list(
        map,
        "externalDocumentRefs",
        "document",
        &mut messages,
        parse_external_document_ref,
    );

    let mut annotations = Vec::new();
    let mut has_files: Vec<(String, String)> = Vec::new();

    let mut packages = Vec::new();
    for (index, item) in array_items(map, "packages", "document", &mut messages) {
        let path = format!("document.packages[{index}]");
        if let Some((package, contained)) = parse_package(item, &path, &mut messages) {
            annotations.extend(parse_nested_annotations(
                item,
                &package.spdx_id,
                &path,
                &mut messages,
            ));
            has_files.extend(
                contained
                    .into_iter()
                    .map(|file_id| (package.spdx_id.clone(), file_id)),
            );
            packages.push(package);
        }
    }

    let mut files = Vec::new();
    for (index, item) in array_items(map, "files", "document", &mut messages) {
        let path = format!("document.files[{index}]");
        if let Some(file) = parse_file(item, &path, &mut messages) {
            annotations.extend(parse_nested_annotations(item, &file.spdx_id, &path, &mut messages));
            files.push(file);
        }
    }

    let mut snippets = Vec::new();
    for (index, item) in array_items(map, "snippets", "document", &mut messages) {
        let path = format!("document.snippets[{index}]");
        if let Some(snippet) = parse_snippet(item, &path, &mut messages) {
            annotations.extend(parse_nested_annotations(
                item,
                &snippet.spdx_id,
                &path,
                &mut messages,
            ));
            snippets.push(snippet);
        }
    }

    let document_id = spdx_id.clone().unwrap_or_else(|| "SPDXRef-DOCUMENT".to_string());
    annotations.extend(parse_nested_annotations(tree, &document_id, "document", &mut messages));

    let relationships = object_list(map, "relationships", "document", &mut messages, parse_relationship);
    let extracted_licensing_info = object_list(
        map,
        "hasExtractedLicensingInfos",
        "document",
        &mut messages,
        parse_extracted_licensing_info,
    );

    if !messages.is_empty() {
        return Err(SpdxError::Parse(messages));
    }
    let (
        Some(spdx_version),
        Some(data_license),
        Some(spdx_id),
        Some(name),
        Some(document_namespace),
        Some(creation_info),
    ) = (spdx_version, data_license, spdx_id, name, document_namespace, creation_info)
    else {
        return Err(SpdxError::parse("document", "required document fields are missing"));
    };

    let mut document = Document::new(name, document_namespace, creation_info);
    document.spdx_version = spdx_version;
    document.data_license = data_license;
    document.spdx_id = spdx_id;
    document.comment = comment;
    document.external_document_refs = external_document_refs;
    document.packages = packages;
    document.files = files;
    document.snippets = snippets;
    document.relationships = relationships;
    document.annotations = annotations;
    document.extracted_licensing_info = extracted_licensing_info;

    // hasFiles and documentDescribes are shorthand for relationships. They
    // become real ones unless an equivalent edge is already present.
    for (package_id, file_id) in has_files {
        if !has_equivalent_relationship(
            &document.relationships,
            &package_id,
            RelationshipType::Contains,
            RelationshipType::ContainedBy,
            &file_id,
        ) {
            document.relationships.push(Relationship::new(
                package_id,
                RelationshipType::Contains,
                SpdxValue::Value(file_id),
            ));
        }
    }
    for described in describes {
        if !has_equivalent_relationship(
            &document.relationships,
            &document.spdx_id,
            RelationshipType::Describes,
            RelationshipType::DescribedBy,
            &described,
        ) {
            document.relationships.push(Relationship::new(
                document.spdx_id.clone(),
                RelationshipType::Describes,
                SpdxValue::Value(described),
            ));
        }
    }
    Ok(document)
}

fn has_equivalent_relationship(
    relationships: &[Relationship],
    source: &str,
    forward: RelationshipType,
    inverse: RelationshipType,
    target: &str,
) -> bool {
    relationships.iter().any(|relationship| {
        let Some(related) = relationship.related_spdx_element_id.as_value() else {
            return false;
        };
        (relationship.spdx_element_id == source
            && relationship.relationship_type == forward
            && related == target)
            || (relationship.spdx_element_id == target
                && relationship.relationship_type == inverse
                && related == source)
    })
}

/// Cursor over one object in the tree. Leaf accessors push a message and
/// return `None` instead of failing, so a single pass reports everything.
struct EntityReader<'a, 'm> {
    map: &'a Map<String, Value>,
    path: &'a str,
    messages: &'m mut Vec<ParseMessage>,
}

impl<'a, 'm> EntityReader<'a, 'm> {
    fn new(map: &'a Map<String, Value>, path: &'a str, messages: &'m mut Vec<ParseMessage>) -> Self {
        EntityReader { map, path, messages }
    }

    fn key_path(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    fn push(&mut self, detail: impl Into<String>) {
        self.messages.push(ParseMessage::new(self.path, detail));
    }

    fn push_key(&mut self, key: &str, detail: impl Into<String>) {
        self.messages.push(ParseMessage::new(self.key_path(key), detail));
    }

    fn required_str(&mut self, key: &str) -> Option<String> {
        match self.map.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                self.push_key(key, "expected a string");
                None
            }
            None => {
                self.push(format!("missing required key `{key}`"));
                None
            }
        }
    }

    fn optional_str(&mut self, key: &str) -> Option<String> {
        match self.map.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(_) => {
                self.push_key(key, "expected a string");
                None
            }
            None => None,
        }
    }

    // XML carries booleans as text, so both spellings are accepted.
    fn optional_bool(&mut self, key: &str) -> Option<bool> {
        match self.map.get(key) {
            Some(Value::Bool(flag)) => Some(*flag),
            Some(Value::String(text)) if text == "true" => Some(true),
            Some(Value::String(text)) if text == "false" => Some(false),
            Some(_) => {
                self.push_key(key, "expected a boolean");
                None
            }
            None => None,
        }
    }

    fn strings(&mut self, key: &str) -> Vec<String> {
        match self.map.get(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::new();
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::String(text) => out.push(text.clone()),
                        _ => self.messages.push(ParseMessage::new(
                            format!("{}.{key}[{index}]", self.path),
                            "expected a string",
                        )),
                    }
                }
                out
            }
            Some(_) => {
                self.push_key(key, "expected an array");
                Vec::new()
            }
        }
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

    fn required_parsed<T>(
        &mut self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, SpdxError>,
    ) -> Option<T> {
        let raw = self.required_str(key)?;
        self.collect(key, parse(&raw))
    }

    fn optional_parsed<T>(
        &mut self,
        key: &str,
        parse: impl FnOnce(&str) -> Result<T, SpdxError>,
    ) -> Option<T> {
        let raw = self.optional_str(key)?;
        self.collect(key, parse(&raw))
    }

    fn parsed_list<T>(
        &mut self,
        key: &str,
        parse: impl Fn(&str) -> Result<T, SpdxError>,
    ) -> Vec<T> {
        match self.map.get(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => {
                let mut out = Vec::new();
                for (index, item) in items.iter().enumerate() {
                    let location = format!("{}.{key}[{index}]", self.path);
                    match item {
                        Value::String(raw) => match parse(raw) {
                            Ok(value) => out.push(value),
                            Err(error) => self.messages.extend(error.into_messages(&location)),
                        },
                        _ => self
                            .messages
                            .push(ParseMessage::new(location, "expected a string")),
                    }
                }
                out
            }
            Some(_) => {
                self.push_key(key, "expected an array");
                Vec::new()
            }
        }
    }
}

fn object<'a>(
    value: &'a Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<&'a Map<String, Value>> {
    match value.as_object() {
        Some(map) => Some(map),
        None => {
            sink.push(ParseMessage::new(path, "expected an object"));
            None
        }
    }
}

fn array_items<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Vec<(usize, &'a Value)> {
    match map.get(key) {
        None => Vec::new(),
        Some(Value::Array(items)) => items.iter().enumerate().collect(),
        Some(_) => {
            sink.push(ParseMessage::new(format!("{path}.{key}"), "expected an array"));
            Vec::new()
        }
    }
}

fn object_list<T>(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
    sink: &mut Vec<ParseMessage>,
    parse: impl Fn(&Value, &str, &mut Vec<ParseMessage>) -> Option<T>,
) -> Vec<T> {
    array_items(map, key, path, sink)
        .into_iter()
        .filter_map(|(index, item)| parse(item, &format!("{path}.{key}[{index}]"), sink))
        .collect()
}

fn parse_creation_info(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<CreationInfo> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let created = reader.required_parsed("created", parse_timestamp);
    if !map.contains_key("creators") {
        reader.push("missing required key `creators`");
        return None;
    }
    let creators = reader.parsed_list("creators", Actor::parse);
    let creator_comment = reader.optional_str("comment");
    let license_list_version =
        reader.optional_parsed("licenseListVersion", |raw| raw.parse::<Version>());
    let mut info = CreationInfo::new(creators, created?);
    info.creator_comment = creator_comment;
    info.license_list_version = license_list_version;
    Some(info)
}

fn parse_checksum(value: &Value, path: &str, sink: &mut Vec<ParseMessage>) -> Option<Checksum> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let algorithm = reader.required_parsed("algorithm", ChecksumAlgorithm::from_spelling);
    let checksum_value = reader.required_str("checksumValue");
    Some(Checksum::new(algorithm?, checksum_value?))
}

fn parse_external_document_ref(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<ExternalDocumentRef> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let document_ref_id = reader.required_str("externalDocumentId");
    let document_uri = reader.required_str("spdxDocument");
    let checksum = match reader.map.get("checksum") {
        Some(value) => {
            let child_path = reader.key_path("checksum");
            parse_checksum(value, &child_path, reader.messages)
        }
        None => {
            reader.push("missing required key `checksum`");
            None
        }
    };
    Some(ExternalDocumentRef::new(document_ref_id?, document_uri?, checksum?))
}

fn parse_verification_code(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<PackageVerificationCode> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let code_value = reader.required_str("packageVerificationCodeValue");
    let excluded_files = reader.strings("packageVerificationCodeExcludedFiles");
    let mut code = PackageVerificationCode::new(code_value?);
    code.excluded_files = excluded_files;
    Some(code)
}

fn parse_external_package_ref(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<ExternalPackageRef> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let category = reader.required_parsed("referenceCategory", ExternalRefCategory::from_spelling);
    let reference_type = reader.required_str("referenceType");
    let locator = reader.required_str("referenceLocator");
    let comment = reader.optional_str("comment");
    let mut external_ref = ExternalPackageRef::new(category?, reference_type?, locator?);
    external_ref.comment = comment;
    Some(external_ref)
}

/// Parse a package. The second half of the pair is the raw `hasFiles` list,
/// resolved into relationships at the document level.
fn parse_package(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<(Package, Vec<String>)> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let spdx_id = reader.required_str("SPDXID");
    let name = reader.required_str("name");
    let download_location = reader
        .required_str("downloadLocation")
        .map(|raw| SpdxValue::from_plain(&raw));
    let version = reader.optional_str("versionInfo");
    let file_name = reader.optional_str("packageFileName");
    let supplier =
        reader.optional_parsed("supplier", |raw| OrNoAssertion::parse_with(raw, Actor::parse));
    let originator =
        reader.optional_parsed("originator", |raw| OrNoAssertion::parse_with(raw, Actor::parse));
    let files_analyzed = reader.optional_bool("filesAnalyzed").unwrap_or(true);
    let verification_code = match reader.map.get("packageVerificationCode") {
        Some(value) => {
            let child_path = reader.key_path("packageVerificationCode");
            parse_verification_code(value, &child_path, reader.messages)
        }
        None => None,
    };
    let checksums = object_list(reader.map, "checksums", path, reader.messages, parse_checksum);
    let homepage = reader.optional_str("homepage");
    let source_info = reader.optional_str("sourceInfo");
    let license_concluded = reader.optional_parsed("licenseConcluded", parse_license_field);
    let license_info_from_files = reader.parsed_list("licenseInfoFromFiles", parse_license_field);
    let license_declared = reader.optional_parsed("licenseDeclared", parse_license_field);
    let license_comment = reader.optional_str("licenseComments");
    let copyright_text = reader
        .optional_str("copyrightText")
        .map(|raw| SpdxValue::from_plain(&raw));
    let summary = reader.optional_str("summary");
    let description = reader.optional_str("description");
    let comment = reader.optional_str("comment");
    let external_refs = object_list(
        reader.map,
        "externalRefs",
        path,
        reader.messages,
        parse_external_package_ref,
    );
    let attribution_texts = reader.strings("attributionTexts");
    let primary_package_purpose =
        reader.optional_parsed("primaryPackagePurpose", PackagePurpose::from_spelling);
    let release_date = reader.optional_parsed("releaseDate", parse_timestamp);
    let built_date = reader.optional_parsed("builtDate", parse_timestamp);
    let valid_until_date = reader.optional_parsed("validUntilDate", parse_timestamp);
    let has_files = reader.strings("hasFiles");

    let (Some(spdx_id), Some(name), Some(download_location)) = (spdx_id, name, download_location)
    else {
        return None;
    };
    let mut package = Package::new(spdx_id, name, download_location);
    package.version = version;
    package.file_name = file_name;
    package.supplier = supplier;
    package.originator = originator;
    package.files_analyzed = files_analyzed;
    package.verification_code = verification_code;
    package.checksums = checksums;
    package.homepage = homepage;
    package.source_info = source_info;
    package.license_concluded = license_concluded;
    package.license_info_from_files = license_info_from_files;
    package.license_declared = license_declared;
    package.license_comment = license_comment;
    package.copyright_text = copyright_text;
    package.summary = summary;
    package.description = description;
    package.comment = comment;
    package.external_refs = external_refs;
    package.attribution_texts = attribution_texts;
    package.primary_package_purpose = primary_package_purpose;
    package.release_date = release_date;
    package.built_date = built_date;
    package.valid_until_date = valid_until_date;
    Some((package, has_files))
}

fn parse_file(value: &Value, path: &str, sink: &mut Vec<ParseMessage>) -> Option<File> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let spdx_id = reader.required_str("SPDXID");
    let name = reader.required_str("fileName");
    let file_types = reader.parsed_list("fileTypes", FileType::from_spelling);
    let checksums_present = map.contains_key("checksums");
    if !checksums_present {
        reader.push("missing required key `checksums`");
    }
    let checksums = object_list(reader.map, "checksums", path, reader.messages, parse_checksum);
    let license_concluded = reader.optional_parsed("licenseConcluded", parse_license_field);
    let license_info_in_file = reader.parsed_list("licenseInfoInFiles", parse_license_field);
    let license_comment = reader.optional_str("licenseComments");
    let copyright_text = reader
        .optional_str("copyrightText")
        .map(|raw| SpdxValue::from_plain(&raw));
    let comment = reader.optional_str("comment");
    let notice = reader.optional_str("noticeText");
    let contributors = reader.strings("fileContributors");
    let attribution_texts = reader.strings("attributionTexts");

    let (Some(spdx_id), Some(name), true) = (spdx_id, name, checksums_present) else {
        return None;
    };
    let mut file = File::new(spdx_id, name, checksums);
    file.file_types = file_types;
    file.license_concluded = license_concluded;
    file.license_info_in_file = license_info_in_file;
    file.license_comment = license_comment;
    file.copyright_text = copyright_text;
    file.comment = comment;
    file.notice = notice;
    file.contributors = contributors;
    file.attribution_texts = attribution_texts;
    Some(file)
}

fn pointer_value(map: &Map<String, Value>, key: &str) -> Option<u64> {
    match map.get(key) {
        Some(Value::Number(number)) => number.as_u64(),
        Some(Value::String(text)) => text.parse().ok(),
        _ => None,
    }
}

fn parse_snippet(value: &Value, path: &str, sink: &mut Vec<ParseMessage>) -> Option<Snippet> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let spdx_id = reader.required_str("SPDXID");
    let file_spdx_id = reader.required_str("snippetFromFile");

    // Ranges are classified by their pointer keys. The pointer `reference`
    // is redundant with snippetFromFile and is not read back.
    let mut byte_range = None;
    let mut line_range = None;
    let ranges_present = reader.map.contains_key("ranges");
    match reader.map.get("ranges") {
        None => reader.push("missing required key `ranges`"),
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                let range_path = format!("{path}.ranges[{index}]");
                let Some(bounds) = object(item, &range_path, reader.messages) else {
                    continue;
                };
                let start = bounds.get("startPointer").and_then(Value::as_object);
                let end = bounds.get("endPointer").and_then(Value::as_object);
                let (Some(start), Some(end)) = (start, end) else {
                    reader.messages.push(ParseMessage::new(
                        range_path,
                        "expected startPointer and endPointer objects",
                    ));
                    continue;
                };
                if let (Some(begin), Some(finish)) =
                    (pointer_value(start, "offset"), pointer_value(end, "offset"))
                {
                    byte_range = Some((begin, finish));
                } else if let (Some(begin), Some(finish)) = (
                    pointer_value(start, "lineNumber"),
                    pointer_value(end, "lineNumber"),
                ) {
                    line_range = Some((begin, finish));
                } else {
                    reader.messages.push(ParseMessage::new(
                        range_path,
                        "pointers carry neither offsets nor line numbers",
                    ));
                }
            }
        }
        Some(_) => reader.push_key("ranges", "expected an array"),
    }
    if ranges_present && byte_range.is_none() {
        reader.push_key("ranges", "no byte range found");
    }

    let license_concluded = reader.optional_parsed("licenseConcluded", parse_license_field);
    let license_info_in_snippet = reader.parsed_list("licenseInfoInSnippets", parse_license_field);
    let license_comment = reader.optional_str("licenseComments");
    let copyright_text = reader
        .optional_str("copyrightText")
        .map(|raw| SpdxValue::from_plain(&raw));
    let name = reader.optional_str("name");
    let comment = reader.optional_str("comment");
    let attribution_texts = reader.strings("attributionTexts");

    let (Some(spdx_id), Some(file_spdx_id), Some(byte_range)) = (spdx_id, file_spdx_id, byte_range)
    else {
        return None;
    };
    let mut snippet = Snippet::new(spdx_id, file_spdx_id, byte_range);
    snippet.line_range = line_range;
    snippet.license_concluded = license_concluded;
    snippet.license_info_in_snippet = license_info_in_snippet;
    snippet.license_comment = license_comment;
    snippet.copyright_text = copyright_text;
    snippet.name = name;
    snippet.comment = comment;
    snippet.attribution_texts = attribution_texts;
    Some(snippet)
}

fn parse_relationship(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<Relationship> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let spdx_element_id = reader.required_str("spdxElementId");
    let relationship_type =
        reader.required_parsed("relationshipType", RelationshipType::from_spelling);
    let related = reader
        .required_str("relatedSpdxElement")
        .map(|raw| SpdxValue::from_plain(&raw));
    let comment = reader.optional_str("comment");
    let mut relationship =
        Relationship::new(spdx_element_id?, relationship_type?, related?);
    relationship.comment = comment;
    Some(relationship)
}

fn parse_annotation(
    value: &Value,
    subject: &str,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<Annotation> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let annotation_date = reader.required_parsed("annotationDate", parse_timestamp);
    let annotation_type = reader.required_parsed("annotationType", AnnotationType::from_spelling);
    let annotator = reader.required_parsed("annotator", Actor::parse);
    let comment = reader.required_str("comment");
    Some(Annotation::new(
        subject,
        annotation_type?,
        annotator?,
        annotation_date?,
        comment?,
    ))
}

/// Annotations sit nested under their subject; reading flattens them into the
/// document list with the subject's SPDXID attached.
fn parse_nested_annotations(
    value: &Value,
    subject: &str,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Vec<Annotation> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };
    object_list(map, "annotations", path, sink, |item, item_path, sink| {
        parse_annotation(item, subject, item_path, sink)
    })
}

fn parse_extracted_licensing_info(
    value: &Value,
    path: &str,
    sink: &mut Vec<ParseMessage>,
) -> Option<ExtractedLicensingInfo> {
    let map = object(value, path, sink)?;
    let mut reader = EntityReader::new(map, path, sink);
    let license_id = reader.required_str("licenseId");
    let extracted_text = reader.required_str("extractedText");
    let license_name = reader
        .optional_str("name")
        .map(|raw| OrNoAssertion::from_plain(&raw));
    let cross_references = reader.strings("seeAlsos");
    let comment = reader.optional_str("comment");
    let mut info = ExtractedLicensingInfo::new(license_id?, extracted_text?);
    info.license_name = license_name;
    info.cross_references = cross_references;
    info.comment = comment;
    Some(info)
}
