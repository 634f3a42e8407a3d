//! Parsing of tag/value input.
//!
//! The reader walks the lines once. Element opener tags close whatever
//! element is in flight, so the machine never needs lookahead. Problems are
//! collected per line and raised as one aggregate error; unknown tags are
//! reported through the caller's [`MessageSink`] and parsing continues.

use crate::errors::{ParseMessage, SpdxError};
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
use crate::notes::{MessageSink, Note, NoteList};
use chrono::{DateTime, Utc};
use std::io::Read;

/// Parse tag/value input, logging recoverable notes as warnings.
pub fn parse<R: Read>(reader: R) -> Result<Document, SpdxError> {
    let mut notes = NoteList::new();
    let document = parse_with_sink(reader, &mut notes)?;
    for note in notes.iter() {
        log::warn!("{note}");
    }
    Ok(document)
}

/// Parse tag/value input, reporting recoverable notes to `sink`.
pub fn parse_with_sink<R: Read>(
    mut reader: R,
    sink: &mut dyn MessageSink,
) -> Result<Document, SpdxError> {
    let mut input = String::new();
    reader
        .read_to_string(&mut input)
        .map_err(|e| SpdxError::Io(e, "failed to read tag/value input".to_string()))?;
    let mut messages = Vec::new();
    let lines = logical_lines(&input, &mut messages);
    let mut parser = Parser::new(sink, messages);
    for line in &lines {
        parser.handle(line);
    }
    parser.finish()
}

struct TagLine {
    number: usize,
    tag: String,
    value: String,
}

impl TagLine {
    fn location(&self) -> String {
        format!("line {}", self.number)
    }
}

/// Split the input into `Tag: value` pairs, folding `<text>` blocks back
/// into single values. Comment lines (`#`) and blank lines are skipped.
fn logical_lines(input: &str, messages: &mut Vec<ParseMessage>) -> Vec<TagLine> {
    let mut lines = Vec::new();
    let mut iter = input.lines().enumerate();
    while let Some((index, raw)) = iter.next() {
        let number = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((tag, rest)) = trimmed.split_once(':') else {
            messages.push(ParseMessage::new(
                format!("line {number}"),
                "expected `Tag: value`",
            ));
            continue;
        };
        let tag = tag.trim().to_string();
        let mut value = rest.trim().to_string();
        if let Some(stripped) = value.strip_prefix("<text>") {
            let mut text = stripped.to_string();
            loop {
                if let Some(end) = text.find("</text>") {
                    if !text[end + "</text>".len()..].trim().is_empty() {
                        messages.push(ParseMessage::new(
                            format!("line {number}"),
                            "unexpected content after </text>",
                        ));
                    }
                    text.truncate(end);
                    break;
                }
                match iter.next() {
                    Some((_, continuation)) => {
                        text.push('\n');
                        text.push_str(continuation);
                    }
                    None => {
                        messages.push(ParseMessage::new(
                            format!("line {number}"),
                            "unterminated <text> block",
                        ));
                        break;
                    }
                }
            }
            value = text;
        }
        lines.push(TagLine { number, tag, value });
    }
    lines
}

enum Element {
    Document,
    Package(PartialPackage),
    File(PartialFile),
    Snippet(PartialSnippet),
    Annotation(PartialAnnotation),
    Extracted(PartialExtracted),
}

struct Parser<'s> {
    sink: &'s mut dyn MessageSink,
    messages: Vec<ParseMessage>,
    spdx_version: Option<String>,
    data_license: Option<String>,
    document_spdx_id: Option<String>,
    document_name: Option<String>,
    document_namespace: Option<String>,
    document_comment: Option<String>,
    external_document_refs: Vec<ExternalDocumentRef>,
    creators: Vec<Actor>,
    created: Option<DateTime<Utc>>,
    creator_comment: Option<String>,
    license_list_version: Option<Version>,
    packages: Vec<Package>,
    files: Vec<File>,
    snippets: Vec<Snippet>,
    annotations: Vec<Annotation>,
    relationships: Vec<Relationship>,
    extracted: Vec<ExtractedLicensingInfo>,
    element: Element,
    last_element_id: Option<String>,
}

impl<'s> Parser<'s> {
    fn new(sink: &'s mut dyn MessageSink, messages: Vec<ParseMessage>) -> Self {
        Parser {
            sink,
            messages,
            spdx_version: None,
            data_license: None,
            document_spdx_id: None,
            document_name: None,
            document_namespace: None,
            document_comment: None,
            external_document_refs: Vec::new(),
            creators: Vec::new(),
            created: None,
            creator_comment: None,
            license_list_version: None,
            packages: Vec::new(),
            files: Vec::new(),
            snippets: Vec::new(),
            annotations: Vec::new(),
            relationships: Vec::new(),
            extracted: Vec::new(),
            element: Element::Document,
            last_element_id: None,
        }
    }

    fn handle(&mut self, line: &TagLine) {
        match line.tag.as_str() {
            "PackageName" => {
                self.close_element();
                self.element = Element::Package(PartialPackage {
                    opened_at: line.number,
                    name: line.value.clone(),
                    ..PartialPackage::default()
                });
            }
            "FileName" => {
                self.close_element();
                self.element = Element::File(PartialFile {
                    opened_at: line.number,
                    name: line.value.clone(),
                    ..PartialFile::default()
                });
            }
            "SnippetSPDXID" => {
                self.close_element();
                self.element = Element::Snippet(PartialSnippet {
                    opened_at: line.number,
                    spdx_id: line.value.clone(),
                    ..PartialSnippet::default()
                });
            }
            "Annotator" => {
                self.close_element();
                let annotator = match Actor::parse(&line.value) {
                    Ok(actor) => Some(actor),
                    Err(error) => {
                        self.messages.extend(error.into_messages(&line.location()));
                        None
                    }
                };
                self.element = Element::Annotation(PartialAnnotation {
                    opened_at: line.number,
                    annotator,
                    default_subject: self.last_element_id.clone(),
                    ..PartialAnnotation::default()
                });
            }
            "LicenseID" => {
                self.close_element();
                self.element = Element::Extracted(PartialExtracted {
                    opened_at: line.number,
                    license_id: line.value.clone(),
                    ..PartialExtracted::default()
                });
            }
            "Relationship" => self.relationship(line),
            "RelationshipComment" => self.relationship_comment(line),
            _ => self.field(line),
        }
    }

    fn close_element(&mut self) {
        let element = std::mem::replace(&mut self.element, Element::Document);
        match element {
            Element::Document => {}
            Element::Package(partial) => {
                let opened_at = partial.opened_at;
                match partial.finish() {
                    Ok(package) => {
                        self.last_element_id = Some(package.spdx_id.clone());
                        self.packages.push(package);
                    }
                    Err(error) => self.report_at(opened_at, error),
                }
            }
            Element::File(partial) => {
                let opened_at = partial.opened_at;
                match partial.finish() {
                    Ok(file) => {
                        self.last_element_id = Some(file.spdx_id.clone());
                        self.files.push(file);
                    }
                    Err(error) => self.report_at(opened_at, error),
                }
            }
            Element::Snippet(partial) => {
                let opened_at = partial.opened_at;
                match partial.finish() {
                    Ok(snippet) => {
                        self.last_element_id = Some(snippet.spdx_id.clone());
                        self.snippets.push(snippet);
                    }
                    Err(error) => self.report_at(opened_at, error),
                }
            }
            Element::Annotation(partial) => {
                let opened_at = partial.opened_at;
                match partial.finish() {
                    Ok(annotation) => self.annotations.push(annotation),
                    Err(error) => self.report_at(opened_at, error),
                }
            }
            Element::Extracted(partial) => {
                let opened_at = partial.opened_at;
                match partial.finish() {
                    Ok(info) => self.extracted.push(info),
                    Err(error) => self.report_at(opened_at, error),
                }
            }
        }
    }

    fn report_at(&mut self, line: usize, error: SpdxError) {
        self.messages.extend(error.into_messages(&format!("line {line}")));
    }

    fn relationship(&mut self, line: &TagLine) {
        let parts: Vec<&str> = line.value.split_whitespace().collect();
        let [source, relationship_type, target] = parts.as_slice() else {
            self.messages.push(ParseMessage::new(
                line.location(),
                "expected `Relationship: <id> <TYPE> <id>`",
            ));
            return;
        };
        match RelationshipType::from_spelling(relationship_type) {
            Ok(relationship_type) => self.relationships.push(Relationship::new(
                *source,
                relationship_type,
                SpdxValue::from_plain(target),
            )),
            Err(error) => self.messages.extend(error.into_messages(&line.location())),
        }
    }

    fn relationship_comment(&mut self, line: &TagLine) {
        match self.relationships.last_mut() {
            Some(relationship) if relationship.comment.is_none() => {
                relationship.comment = Some(line.value.clone());
            }
            Some(_) => self.messages.push(ParseMessage::new(
                line.location(),
                "duplicate tag `RelationshipComment`",
            )),
            None => self.messages.push(ParseMessage::new(
                line.location(),
                "RelationshipComment without a preceding Relationship",
            )),
        }
    }

    fn field(&mut self, line: &TagLine) {
        match self.element {
            Element::Document => self.document_field(line),
            Element::Package(_) => self.package_field(line),
            Element::File(_) => self.file_field(line),
            Element::Snippet(_) => self.snippet_field(line),
            Element::Annotation(_) => self.annotation_field(line),
            Element::Extracted(_) => self.extracted_field(line),
        }
    }

    fn unknown(&mut self, line: &TagLine, context: &str) {
        self.sink.note(Note::new(
            line.location(),
            format!("unknown tag `{}` in {context} context", line.tag),
        ));
    }

    fn document_field(&mut self, line: &TagLine) {
        let messages = &mut self.messages;
        match line.tag.as_str() {
            "SPDXVersion" => set_once_str(&mut self.spdx_version, line, messages),
            "DataLicense" => set_once_str(&mut self.data_license, line, messages),
            "SPDXID" => set_once_str(&mut self.document_spdx_id, line, messages),
            "DocumentName" => set_once_str(&mut self.document_name, line, messages),
            "DocumentNamespace" => set_once_str(&mut self.document_namespace, line, messages),
            "DocumentComment" => set_once_str(&mut self.document_comment, line, messages),
            "ExternalDocumentRef" => match parse_external_document_ref(&line.value) {
                Ok(external_ref) => self.external_document_refs.push(external_ref),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "LicenseListVersion" => set_once(&mut self.license_list_version, line, messages, || {
                line.value.parse::<Version>()
            }),
            "Creator" => match Actor::parse(&line.value) {
                Ok(creator) => self.creators.push(creator),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "Created" => set_once(&mut self.created, line, messages, || {
                parse_timestamp(&line.value)
            }),
            "CreatorComment" => set_once_str(&mut self.creator_comment, line, messages),
            _ => self.unknown(line, "document"),
        }
    }

    fn package_field(&mut self, line: &TagLine) {
        let Element::Package(package) = &mut self.element else {
            return;
        };
        let messages = &mut self.messages;
        match line.tag.as_str() {
            "SPDXID" => set_once_str(&mut package.spdx_id, line, messages),
            "PackageVersion" => set_once_str(&mut package.version, line, messages),
            "PackageFileName" => set_once_str(&mut package.file_name, line, messages),
            "PackageSupplier" => set_once(&mut package.supplier, line, messages, || {
                OrNoAssertion::parse_with(&line.value, Actor::parse)
            }),
            "PackageOriginator" => set_once(&mut package.originator, line, messages, || {
                OrNoAssertion::parse_with(&line.value, Actor::parse)
            }),
            "PackageDownloadLocation" => {
                set_once(&mut package.download_location, line, messages, || {
                    Ok(SpdxValue::from_plain(&line.value))
                })
            }
            "FilesAnalyzed" => set_once(&mut package.files_analyzed, line, messages, || {
                parse_bool(&line.value)
            }),
            "PackageVerificationCode" => {
                set_once(&mut package.verification_code, line, messages, || {
                    parse_verification_code(&line.value)
                })
            }
            "PackageChecksum" => match parse_checksum_value(&line.value) {
                Ok(checksum) => package.checksums.push(checksum),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "PackageHomePage" => set_once_str(&mut package.homepage, line, messages),
            "PackageSourceInfo" => set_once_str(&mut package.source_info, line, messages),
            "PackageLicenseConcluded" => {
                set_once(&mut package.license_concluded, line, messages, || {
                    parse_license_field(&line.value)
                })
            }
            "PackageLicenseInfoFromFiles" => match parse_license_field(&line.value) {
                Ok(license) => package.license_info_from_files.push(license),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "PackageLicenseDeclared" => {
                set_once(&mut package.license_declared, line, messages, || {
                    parse_license_field(&line.value)
                })
            }
            "PackageLicenseComments" => set_once_str(&mut package.license_comment, line, messages),
            "PackageCopyrightText" => set_once(&mut package.copyright_text, line, messages, || {
                Ok(SpdxValue::from_plain(&line.value))
            }),
            "PackageSummary" => set_once_str(&mut package.summary, line, messages),
            "PackageDescription" => set_once_str(&mut package.description, line, messages),
            "PackageComment" => set_once_str(&mut package.comment, line, messages),
            "ExternalRef" => match parse_external_ref(&line.value) {
                Ok(external_ref) => package.external_refs.push(external_ref),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "ExternalRefComment" => match package.external_refs.last_mut() {
                Some(external_ref) if external_ref.comment.is_none() => {
                    external_ref.comment = Some(line.value.clone());
                }
                Some(_) => messages.push(ParseMessage::new(
                    line.location(),
                    "duplicate tag `ExternalRefComment`",
                )),
                None => messages.push(ParseMessage::new(
                    line.location(),
                    "ExternalRefComment without a preceding ExternalRef",
                )),
            },
            "PackageAttributionText" => package.attribution_texts.push(line.value.clone()),
            "PrimaryPackagePurpose" => {
                set_once(&mut package.primary_package_purpose, line, messages, || {
                    PackagePurpose::from_spelling(&line.value)
                })
            }
            "ReleaseDate" => set_once(&mut package.release_date, line, messages, || {
                parse_timestamp(&line.value)
            }),
            "BuiltDate" => set_once(&mut package.built_date, line, messages, || {
                parse_timestamp(&line.value)
            }),
            "ValidUntilDate" => set_once(&mut package.valid_until_date, line, messages, || {
                parse_timestamp(&line.value)
            }),
            _ => self.unknown(line, "package"),
        }
    }

    fn file_field(&mut self, line: &TagLine) {
        let Element::File(file) = &mut self.element else {
            return;
        };
        let messages = &mut self.messages;
        match line.tag.as_str() {
            "SPDXID" => set_once_str(&mut file.spdx_id, line, messages),
            "FileType" => match FileType::from_spelling(&line.value) {
                Ok(file_type) => file.file_types.push(file_type),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "FileChecksum" => match parse_checksum_value(&line.value) {
                Ok(checksum) => file.checksums.push(checksum),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "LicenseConcluded" => set_once(&mut file.license_concluded, line, messages, || {
                parse_license_field(&line.value)
            }),
            "LicenseInfoInFile" => match parse_license_field(&line.value) {
                Ok(license) => file.license_info_in_file.push(license),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "LicenseComments" => set_once_str(&mut file.license_comment, line, messages),
            "FileCopyrightText" => set_once(&mut file.copyright_text, line, messages, || {
                Ok(SpdxValue::from_plain(&line.value))
            }),
            "FileComment" => set_once_str(&mut file.comment, line, messages),
            "FileNotice" => set_once_str(&mut file.notice, line, messages),
            "FileContributor" => file.contributors.push(line.value.clone()),
            "FileAttributionText" => file.attribution_texts.push(line.value.clone()),
            _ => self.unknown(line, "file"),
        }
    }

    fn snippet_field(&mut self, line: &TagLine) {
        let Element::Snippet(snippet) = &mut self.element else {
            return;
        };
        let messages = &mut self.messages;
        match line.tag.as_str() {
            "SnippetFromFileSPDXID" => set_once_str(&mut snippet.file_spdx_id, line, messages),
            "SnippetByteRange" => set_once(&mut snippet.byte_range, line, messages, || {
                parse_range(&line.value)
            }),
            "SnippetLineRange" => set_once(&mut snippet.line_range, line, messages, || {
                parse_range(&line.value)
            }),
            "SnippetLicenseConcluded" => {
                set_once(&mut snippet.license_concluded, line, messages, || {
                    parse_license_field(&line.value)
                })
            }
            "LicenseInfoInSnippet" => match parse_license_field(&line.value) {
                Ok(license) => snippet.license_info_in_snippet.push(license),
                Err(error) => messages.extend(error.into_messages(&line.location())),
            },
            "SnippetLicenseComments" => set_once_str(&mut snippet.license_comment, line, messages),
            "SnippetCopyrightText" => set_once(&mut snippet.copyright_text, line, messages, || {
                Ok(SpdxValue::from_plain(&line.value))
            }),
            "SnippetName" => set_once_str(&mut snippet.name, line, messages),
            "SnippetComment" => set_once_str(&mut snippet.comment, line, messages),
            "SnippetAttributionText" => snippet.attribution_texts.push(line.value.clone()),
            _ => self.unknown(line, "snippet"),
        }
    }

    fn annotation_field(&mut self, line: &TagLine) {
        let Element::Annotation(annotation) = &mut self.element else {
            return;
        };
        let messages = &mut self.messages;
        match line.tag.as_str() {
            "AnnotationDate" => set_once(&mut annotation.date, line, messages, || {
                parse_timestamp(&line.value)
            }),
            "AnnotationType" => set_once(&mut annotation.annotation_type, line, messages, || {
                AnnotationType::from_spelling(&line.value)
            }),
            "SPDXREF" => set_once_str(&mut annotation.subject, line, messages),
            "AnnotationComment" => set_once_str(&mut annotation.comment, line, messages),
            _ => self.unknown(line, "annotation"),
        }
    }

    fn extracted_field(&mut self, line: &TagLine) {
        let Element::Extracted(extracted) = &mut self.element else {
            return;
        };
        let messages = &mut self.messages;
        match line.tag.as_str() {
            "ExtractedText" => set_once_str(&mut extracted.extracted_text, line, messages),
            "LicenseName" => set_once(&mut extracted.license_name, line, messages, || {
                Ok(OrNoAssertion::from_plain(&line.value))
            }),
            "LicenseCrossReference" => extracted.cross_references.push(line.value.clone()),
            "LicenseComment" => set_once_str(&mut extracted.comment, line, messages),
            _ => self.unknown(line, "extracted license"),
        }
    }

    fn finish(mut self) -> Result<Document, SpdxError> {
        self.close_element();
        let mut missing = Vec::new();
        if self.spdx_version.is_none() {
            missing.push("SPDXVersion");
        }
        if self.data_license.is_none() {
            missing.push("DataLicense");
        }
        if self.document_spdx_id.is_none() {
            missing.push("SPDXID");
        }
        if self.document_name.is_none() {
            missing.push("DocumentName");
        }
        if self.document_namespace.is_none() {
            missing.push("DocumentNamespace");
        }
        if self.created.is_none() {
            missing.push("Created");
        }
        if self.creators.is_empty() {
            missing.push("Creator");
        }
        if !missing.is_empty() {
            let error = missing_tags("Document", &missing);
            self.messages.extend(error.into_messages("document"));
        }
        if !self.messages.is_empty() {
            return Err(SpdxError::Parse(self.messages));
        }
        let (Some(name), Some(namespace), Some(created)) =
            (self.document_name, self.document_namespace, self.created)
        else {
            return Err(SpdxError::parse("document", "required document tags are missing"));
        };
        let mut creation_info = CreationInfo::new(self.creators, created);
        creation_info.creator_comment = self.creator_comment;
        creation_info.license_list_version = self.license_list_version;
        let mut document = Document::new(name, namespace, creation_info);
        if let Some(version) = self.spdx_version {
            document.spdx_version = version;
        }
        if let Some(data_license) = self.data_license {
            document.data_license = data_license;
        }
        if let Some(spdx_id) = self.document_spdx_id {
            document.spdx_id = spdx_id;
        }
        document.comment = self.document_comment;
        document.external_document_refs = self.external_document_refs;
        document.packages = self.packages;
        document.files = self.files;
        document.snippets = self.snippets;
        document.annotations = self.annotations;
        document.relationships = self.relationships;
        document.extracted_licensing_info = self.extracted;
        Ok(document)
    }
}

/// Set a single-valued slot. The first value wins; later occurrences are
/// reported as duplicates and ignored.
fn set_once<T>(
    slot: &mut Option<T>,
    line: &TagLine,
    messages: &mut Vec<ParseMessage>,
    parse: impl FnOnce() -> Result<T, SpdxError>,
) {
    if slot.is_some() {
        messages.push(ParseMessage::new(
            line.location(),
            format!("duplicate tag `{}`", line.tag),
        ));
        return;
    }
    match parse() {
        Ok(value) => *slot = Some(value),
        Err(error) => messages.extend(error.into_messages(&line.location())),
    }
}

fn set_once_str(slot: &mut Option<String>, line: &TagLine, messages: &mut Vec<ParseMessage>) {
    set_once(slot, line, messages, || Ok(line.value.clone()));
}

fn missing_tags(type_name: &'static str, tags: &[&str]) -> SpdxError {
    SpdxError::Constructor {
        type_name,
        messages: tags.iter().map(|tag| format!("missing tag `{tag}`")).collect(),
    }
}

fn parse_bool(value: &str) -> Result<bool, SpdxError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(SpdxError::parse(
            "boolean",
            format!("`{value}` is neither true nor false"),
        ))
    }
}

fn parse_range(value: &str) -> Result<(u64, u64), SpdxError> {
    let invalid =
        || SpdxError::parse("range", format!("`{value}` is not of the form <begin>:<end>"));
    let (begin, end) = value.split_once(':').ok_or_else(invalid)?;
    Ok((
        begin.trim().parse().map_err(|_| invalid())?,
        end.trim().parse().map_err(|_| invalid())?,
    ))
}

fn parse_checksum_value(value: &str) -> Result<Checksum, SpdxError> {
    let Some((algorithm, rest)) = value.split_once(':') else {
        return Err(SpdxError::parse(
            "checksum",
            format!("`{value}` is not of the form <algorithm>: <value>"),
        ));
    };
    Ok(Checksum::new(
        ChecksumAlgorithm::from_spelling(algorithm.trim())?,
        rest.trim(),
    ))
}

fn parse_verification_code(value: &str) -> Result<PackageVerificationCode, SpdxError> {
    match value.split_once("(excludes:") {
        None => Ok(PackageVerificationCode::new(value.trim())),
        Some((code, rest)) => {
            let Some(excluded) = rest.trim_end().strip_suffix(')') else {
                return Err(SpdxError::parse(
                    "verification code",
                    "unclosed `(excludes: ...)`",
                ));
            };
            let mut parsed = PackageVerificationCode::new(code.trim());
            parsed.excluded_files = excluded.split_whitespace().map(str::to_string).collect();
            Ok(parsed)
        }
    }
}

fn parse_external_document_ref(value: &str) -> Result<ExternalDocumentRef, SpdxError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [id, uri, algorithm, checksum] = parts.as_slice() else {
        return Err(SpdxError::parse(
            "external document ref",
            "expected `DocumentRef-<id> <uri> <algorithm>: <checksum>`",
        ));
    };
    let Some(algorithm) = algorithm.strip_suffix(':') else {
        return Err(SpdxError::parse(
            "external document ref",
            "the checksum algorithm must end with `:`",
        ));
    };
    Ok(ExternalDocumentRef::new(
        *id,
        *uri,
        Checksum::new(ChecksumAlgorithm::from_spelling(algorithm)?, *checksum),
    ))
}

fn parse_external_ref(value: &str) -> Result<ExternalPackageRef, SpdxError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    let [category, reference_type, locator] = parts.as_slice() else {
        return Err(SpdxError::parse(
            "external ref",
            "expected `<category> <type> <locator>`",
        ));
    };
    Ok(ExternalPackageRef::new(
        ExternalRefCategory::from_spelling(category)?,
        *reference_type,
        *locator,
    ))
}

#[derive(Default)]
struct PartialPackage {
    opened_at: usize,
    name: String,
    spdx_id: Option<String>,
    version: Option<String>,
    file_name: Option<String>,
    supplier: Option<OrNoAssertion<Actor>>,
    originator: Option<OrNoAssertion<Actor>>,
    download_location: Option<SpdxValue<String>>,
    files_analyzed: Option<bool>,
    verification_code: Option<PackageVerificationCode>,
    checksums: Vec<Checksum>,
    homepage: Option<String>,
    source_info: Option<String>,
    license_concluded: Option<SpdxValue<LicenseExpression>>,
    license_info_from_files: Vec<SpdxValue<LicenseExpression>>,
    license_declared: Option<SpdxValue<LicenseExpression>>,
    license_comment: Option<String>,
    copyright_text: Option<SpdxValue<String>>,
    summary: Option<String>,
    description: Option<String>,
    comment: Option<String>,
    external_refs: Vec<ExternalPackageRef>,
    attribution_texts: Vec<String>,
    primary_package_purpose: Option<PackagePurpose>,
    release_date: Option<DateTime<Utc>>,
    built_date: Option<DateTime<Utc>>,
    valid_until_date: Option<DateTime<Utc>>,
}

impl PartialPackage {
    fn finish(self) -> Result<Package, SpdxError> {
        match (self.spdx_id, self.download_location) {
            (Some(spdx_id), Some(download_location)) => {
                let mut package = Package::new(spdx_id, self.name, download_location);
                package.version = self.version;
                package.file_name = self.file_name;
                package.supplier = self.supplier;
                package.originator = self.originator;
                package.files_analyzed = self.files_analyzed.unwrap_or(true);
                package.verification_code = self.verification_code;
                package.checksums = self.checksums;
                package.homepage = self.homepage;
                package.source_info = self.source_info;
                package.license_concluded = self.license_concluded;
                package.license_info_from_files = self.license_info_from_files;
                package.license_declared = self.license_declared;
                package.license_comment = self.license_comment;
                package.copyright_text = self.copyright_text;
                package.summary = self.summary;
                package.description = self.description;
                package.comment = self.comment;
                package.external_refs = self.external_refs;
                package.attribution_texts = self.attribution_texts;
                package.primary_package_purpose = self.primary_package_purpose;
                package.release_date = self.release_date;
                package.built_date = self.built_date;
                package.valid_until_date = self.valid_until_date;
                Ok(package)
            }
            (spdx_id, download_location) => {
                let mut missing = Vec::new();
                if spdx_id.is_none() {
                    missing.push("SPDXID");
                }
                if download_location.is_none() {
                    missing.push("PackageDownloadLocation");
                }
                Err(missing_tags("Package", &missing))
            }
        }
    }
}

#[derive(Default)]
struct PartialFile {
    opened_at: usize,
    name: String,
    spdx_id: Option<String>,
    file_types: Vec<FileType>,
    checksums: Vec<Checksum>,
    license_concluded: Option<SpdxValue<LicenseExpression>>,
    license_info_in_file: Vec<SpdxValue<LicenseExpression>>,
    license_comment: Option<String>,
    copyright_text: Option<SpdxValue<String>>,
    comment: Option<String>,
    notice: Option<String>,
    contributors: Vec<String>,
    attribution_texts: Vec<String>,
}

impl PartialFile {
    fn finish(self) -> Result<File, SpdxError> {
        let Some(spdx_id) = self.spdx_id else {
            return Err(missing_tags("File", &["SPDXID"]));
        };
        let mut file = File::new(spdx_id, self.name, self.checksums);
        file.file_types = self.file_types;
        file.license_concluded = self.license_concluded;
        file.license_info_in_file = self.license_info_in_file;
        file.license_comment = self.license_comment;
        file.copyright_text = self.copyright_text;
        file.comment = self.comment;
        file.notice = self.notice;
        file.contributors = self.contributors;
        file.attribution_texts = self.attribution_texts;
        Ok(file)
    }
}

#[derive(Default)]
struct PartialSnippet {
    opened_at: usize,
    spdx_id: String,
    file_spdx_id: Option<String>,
    byte_range: Option<(u64, u64)>,
    line_range: Option<(u64, u64)>,
    license_concluded: Option<SpdxValue<LicenseExpression>>,
    license_info_in_snippet: Vec<SpdxValue<LicenseExpression>>,
    license_comment: Option<String>,
    copyright_text: Option<SpdxValue<String>>,
    name: Option<String>,
    comment: Option<String>,
    attribution_texts: Vec<String>,
}

impl PartialSnippet {
    fn finish(self) -> Result<Snippet, SpdxError> {
        match (self.file_spdx_id, self.byte_range) {
            (Some(file_spdx_id), Some(byte_range)) => {
                let mut snippet = Snippet::new(self.spdx_id, file_spdx_id, byte_range);
                snippet.line_range = self.line_range;
                snippet.license_concluded = self.license_concluded;
                snippet.license_info_in_snippet = self.license_info_in_snippet;
                snippet.license_comment = self.license_comment;
                snippet.copyright_text = self.copyright_text;
                snippet.name = self.name;
                snippet.comment = self.comment;
                snippet.attribution_texts = self.attribution_texts;
                Ok(snippet)
            }
            (file_spdx_id, byte_range) => {
                let mut missing = Vec::new();
                if file_spdx_id.is_none() {
                    missing.push("SnippetFromFileSPDXID");
                }
                if byte_range.is_none() {
                    missing.push("SnippetByteRange");
                }
                Err(missing_tags("Snippet", &missing))
            }
        }
    }
}

#[derive(Default)]
struct PartialAnnotation {
    opened_at: usize,
    annotator: Option<Actor>,
    date: Option<DateTime<Utc>>,
    annotation_type: Option<AnnotationType>,
    subject: Option<String>,
    default_subject: Option<String>,
    comment: Option<String>,
}

impl PartialAnnotation {
    fn finish(self) -> Result<Annotation, SpdxError> {
        let subject = self.subject.or(self.default_subject);
        let mut missing = Vec::new();
        if self.annotator.is_none() {
            missing.push("Annotator");
        }
        if self.date.is_none() {
            missing.push("AnnotationDate");
        }
        if self.annotation_type.is_none() {
            missing.push("AnnotationType");
        }
        if subject.is_none() {
            missing.push("SPDXREF");
        }
        if self.comment.is_none() {
            missing.push("AnnotationComment");
        }
        match (self.annotator, self.date, self.annotation_type, subject, self.comment) {
            (Some(annotator), Some(date), Some(annotation_type), Some(subject), Some(comment)) => {
                Ok(Annotation::new(subject, annotation_type, annotator, date, comment))
            }
            _ => Err(missing_tags("Annotation", &missing)),
        }
    }
}

#[derive(Default)]
struct PartialExtracted {
    opened_at: usize,
    license_id: String,
    extracted_text: Option<String>,
    license_name: Option<OrNoAssertion<String>>,
    cross_references: Vec<String>,
    comment: Option<String>,
}

impl PartialExtracted {
    fn finish(self) -> Result<ExtractedLicensingInfo, SpdxError> {
        let Some(extracted_text) = self.extracted_text else {
            return Err(missing_tags("ExtractedLicensingInfo", &["ExtractedText"]));
        };
        let mut info = ExtractedLicensingInfo::new(self.license_id, extracted_text);
        info.license_name = self.license_name;
        info.cross_references = self.cross_references;
        info.comment = self.comment;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "\
SPDXVersion: SPDX-2.3
DataLicense: CC0-1.0
SPDXID: SPDXRef-DOCUMENT
DocumentName: demo
DocumentNamespace: https://example.com/demo
Creator: Tool: demo-tool
Created: 2023-01-02T03:04:05Z
";

    fn parse_str(input: &str) -> Result<Document, SpdxError> {
        parse(Cursor::new(input))
    }

    #[test]
    fn header_alone_is_a_document() {
        let document = parse_str(HEADER).unwrap();
        assert_eq!(document.name, "demo");
        assert_eq!(document.spdx_id, "SPDXRef-DOCUMENT");
        assert_eq!(document.creation_info.creators.len(), 1);
    }

    #[test]
    fn an_opener_closes_the_previous_element() {
        let input = format!(
            "{HEADER}\
PackageName: first
SPDXID: SPDXRef-P1
PackageDownloadLocation: NOASSERTION
PackageName: second
SPDXID: SPDXRef-P2
PackageDownloadLocation: NONE
"
        );
        let document = parse_str(&input).unwrap();
        assert_eq!(document.packages.len(), 2);
        assert_eq!(document.packages[0].name, "first");
        assert_eq!(document.packages[1].download_location, SpdxValue::None);
    }

    #[test]
    fn the_first_value_wins_and_the_duplicate_is_reported() {
        let input = format!(
            "{HEADER}\
PackageName: pkg
SPDXID: SPDXRef-P
PackageDownloadLocation: NOASSERTION
PackageVersion: 1.0
PackageVersion: 2.0
"
        );
        let error = parse_str(&input).unwrap_err();
        let SpdxError::Parse(messages) = error else {
            panic!("expected a parse error");
        };
        assert_eq!(messages.len(), 1);
        assert!(messages[0].detail.contains("duplicate tag `PackageVersion`"));
        assert_eq!(messages[0].location, "line 12");
    }

    #[test]
    fn unknown_tags_are_reported_but_not_fatal() {
        let input = format!(
            "{HEADER}\
PackageName: pkg
SPDXID: SPDXRef-P
PackageDownloadLocation: NOASSERTION
PackageColor: blue
"
        );
        let mut notes = NoteList::new();
        let document = parse_with_sink(Cursor::new(input), &mut notes).unwrap();
        assert_eq!(document.packages.len(), 1);
        assert_eq!(notes.len(), 1);
        assert!(notes.notes[0].message.contains("unknown tag `PackageColor`"));
    }

    #[test]
    fn an_annotation_inherits_the_enclosing_element() {
        let input = format!(
            "{HEADER}\
PackageName: pkg
SPDXID: SPDXRef-P
PackageDownloadLocation: NOASSERTION
Annotator: Person: Reviewer
AnnotationDate: 2023-05-06T07:08:09Z
AnnotationType: REVIEW
AnnotationComment: looks fine
"
        );
        let document = parse_str(&input).unwrap();
        assert_eq!(document.annotations.len(), 1);
        assert_eq!(document.annotations[0].spdx_id, "SPDXRef-P");
    }

    #[test]
    fn a_document_level_annotation_requires_spdxref() {
        let input = format!(
            "{HEADER}\
Annotator: Person: Reviewer
AnnotationDate: 2023-05-06T07:08:09Z
AnnotationType: REVIEW
AnnotationComment: looks fine
"
        );
        let error = parse_str(&input).unwrap_err();
        assert!(error.to_string().contains("SPDXREF"));
        let explicit = format!(
            "{HEADER}\
Annotator: Person: Reviewer
AnnotationDate: 2023-05-06T07:08:09Z
AnnotationType: REVIEW
SPDXREF: SPDXRef-DOCUMENT
AnnotationComment: looks fine
"
        );
        let document = parse_str(&explicit).unwrap();
        assert_eq!(document.annotations[0].spdx_id, "SPDXRef-DOCUMENT");
    }

    #[test]
    fn text_blocks_span_lines() {
        let input = format!(
            "{HEADER}\
DocumentComment: <text>first line
second line</text>
"
        );
        let document = parse_str(&input).unwrap();
        assert_eq!(document.comment.as_deref(), Some("first line\nsecond line"));
    }

    #[test]
    fn an_unterminated_text_block_is_an_error() {
        let input = format!("{HEADER}DocumentComment: <text>never closed\n");
        let error = parse_str(&input).unwrap_err();
        assert!(error.to_string().contains("unterminated <text> block"));
    }

    #[test]
    fn missing_required_package_tags_name_the_tags() {
        let input = format!("{HEADER}PackageName: pkg\n");
        let error = parse_str(&input).unwrap_err();
        let rendered = error.to_string();
        assert!(rendered.contains("Invalid Package"));
        assert!(rendered.contains("missing tag `SPDXID`"));
        assert!(rendered.contains("missing tag `PackageDownloadLocation`"));
    }

    #[test]
    fn relationships_and_their_comments() {
        let input = format!(
            "{HEADER}\
Relationship: SPDXRef-DOCUMENT DESCRIBES SPDXRef-P
RelationshipComment: the root package
Relationship: SPDXRef-P CONTAINS NOASSERTION
"
        );
        let document = parse_str(&input).unwrap();
        assert_eq!(document.relationships.len(), 2);
        assert_eq!(
            document.relationships[0].comment.as_deref(),
            Some("the root package")
        );
        assert_eq!(
            document.relationships[1].related_spdx_element_id,
            SpdxValue::NoAssertion
        );
    }

    #[test]
    fn writer_output_parses_back() {
        use crate::formats::tag_value::write;

        let creation_info = CreationInfo::new(
            vec![Actor::tool("demo-tool")],
            parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
        );
        let mut document = Document::new("demo", "https://example.com/demo", creation_info);
        let mut package = Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion);
        package.checksums.push(Checksum::new(
            ChecksumAlgorithm::Blake2b256,
            "11b6d3ee554eedf79299905a98f9b9a04e498210b59f15094c916c91d150efcd",
        ));
        package.license_concluded = Some(parse_license_field("MIT").unwrap());
        package.copyright_text = Some(SpdxValue::None);
        document.packages.push(package);
        let mut file = File::new(
            "SPDXRef-F",
            "src/lib.rs",
            vec![Checksum::new(
                ChecksumAlgorithm::Sha1,
                "d6a770ba38583ed4bb4525bd96e50461655d2759",
            )],
        );
        file.notice = Some("multi\nline\nnotice".to_string());
        document.files.push(file);
        let mut snippet = Snippet::new("SPDXRef-S", "SPDXRef-F", (310, 420));
        snippet.line_range = Some((5, 23));
        document.snippets.push(snippet);
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
            "looks fine",
        ));
        let mut extracted = ExtractedLicensingInfo::new("LicenseRef-custom", "The custom terms.");
        extracted.license_name = Some(OrNoAssertion::NoAssertion);
        document.extracted_licensing_info.push(extracted);

        let mut buffer = Vec::new();
        write(&mut buffer, &document).unwrap();
        let reparsed = parse(Cursor::new(buffer)).unwrap();
        assert_eq!(reparsed, document);
    }
}
