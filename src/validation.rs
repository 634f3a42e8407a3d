//! Validation of SPDX 2.x documents.
//!
//! `validate_document` walks the whole document in one pass and returns every
//! problem it finds as a flat list; it never stops at the first. Decoding and
//! validation are separate steps, so an invalid document can still be loaded,
//! inspected, and repaired.

use crate::license::LicenseExpression;
use crate::models_v2::enums::ChecksumAlgorithm;
use crate::models_v2::values::{Actor, ActorType, SpdxValue, Version};
use crate::models_v2::{
    is_valid_document_ref_id, is_valid_spdx_id, split_external_spdx_id, Annotation, Checksum,
    Document, ExternalDocumentRef, ExtractedLicensingInfo, File, Package,
    PackageVerificationCode, Relationship, Snippet,
};
use colored::*;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Which kind of element a validation message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Document,
    CreationInfo,
    Actor,
    Checksum,
    PackageVerificationCode,
    ExternalDocumentRef,
    Package,
    File,
    Snippet,
    Relationship,
    Annotation,
    ExtractedLicensingInfo,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::Document => "DOCUMENT",
            ElementType::CreationInfo => "CREATION_INFO",
            ElementType::Actor => "ACTOR",
            ElementType::Checksum => "CHECKSUM",
            ElementType::PackageVerificationCode => "PACKAGE_VERIFICATION_CODE",
            ElementType::ExternalDocumentRef => "EXTERNAL_DOCUMENT_REF",
            ElementType::Package => "PACKAGE",
            ElementType::File => "FILE",
            ElementType::Snippet => "SNIPPET",
            ElementType::Relationship => "RELATIONSHIP",
            ElementType::Annotation => "ANNOTATION",
            ElementType::ExtractedLicensingInfo => "EXTRACTED_LICENSING_INFO",
        };
        f.write_str(name)
    }
}

/// Where a validation problem sits in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    pub element_type: ElementType,
    /// SPDXID of the offending element, when it has one.
    pub spdx_id: Option<String>,
    /// SPDXID of the enclosing element, for nested values.
    pub parent_id: Option<String>,
    /// Short rendering of the offending element.
    pub element: Option<String>,
}

impl ValidationContext {
    fn location(&self) -> String {
        let mut out = self.element_type.to_string();
        if let Some(spdx_id) = &self.spdx_id {
            out.push(' ');
            out.push_str(spdx_id);
        }
        if let Some(parent_id) = &self.parent_id {
            out.push_str(&format!(" (in {parent_id})"));
        }
        out
    }
}

/// A single validation problem with its context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    pub message: String,
    pub context: ValidationContext,
}

impl ValidationMessage {
    pub fn new(element_type: ElementType, message: impl Into<String>) -> Self {
        ValidationMessage {
            message: message.into(),
            context: ValidationContext {
                element_type,
                spdx_id: None,
                parent_id: None,
                element: None,
            },
        }
    }

    pub fn with_spdx_id(mut self, spdx_id: impl Into<String>) -> Self {
        self.context.spdx_id = Some(spdx_id.into());
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.context.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.context.element = Some(element.into());
        self
    }

    /// Format the message with colors for terminal output.
    pub fn format_colored(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{} ", "✗".red().bold()));
        output.push_str(&format!("[{}] ", self.context.location().bright_blue()));
        output.push_str(&self.message);
        if let Some(element) = &self.context.element {
            output.push_str(&format!("\n  {} {}", "→".bright_black(), element));
        }
        output.push('\n');
        output
    }

    /// Format without colors for logs or non-terminal output.
    pub fn format_plain(&self) -> String {
        let mut output = format!("[{}] {}", self.context.location(), self.message);
        if let Some(element) = &self.context.element {
            output.push_str(&format!("\n  in: {element}"));
        }
        output.push('\n');
        output
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.context.location(), self.message)
    }
}

/// Validate a document against the version it declares.
pub fn validate_document(document: &Document) -> Vec<ValidationMessage> {
    validate_document_with_version(document, None)
}

/// Validate a document, optionally against a caller-provided version string
/// such as `SPDX-2.3`. A mismatch with the declared version is itself a
/// validation problem.
pub fn validate_document_with_version(
    document: &Document,
    expected_version: Option<&str>,
) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();
    let index = DocumentIndex::new(document);

    validate_document_fields(document, expected_version, &mut messages);
    validate_declared_id_shapes(document, &mut messages);
    validate_unique_ids(document, &mut messages);

    for external_ref in &document.external_document_refs {
        validate_external_document_ref(external_ref, &mut messages);
    }
    for package in &document.packages {
        validate_package(package, &index, &mut messages);
    }
    for file in &document.files {
        validate_file(file, &index, &mut messages);
    }
    for snippet in &document.snippets {
        validate_snippet(snippet, &index, &mut messages);
    }
    for relationship in &document.relationships {
        validate_relationship(relationship, &index, &mut messages);
    }
    for annotation in &document.annotations {
        validate_annotation(annotation, &index, &mut messages);
    }
    for info in &document.extracted_licensing_info {
        validate_extracted_licensing_info(info, &mut messages);
    }

    messages
}

/// Resolution tables built once up front, so reference checks stay O(1).
struct DocumentIndex<'a> {
    document_id: &'a str,
    element_ids: HashSet<&'a str>,
    file_ids: HashSet<&'a str>,
    document_refs: HashSet<&'a str>,
    license_refs: HashSet<&'a str>,
}

impl<'a> DocumentIndex<'a> {
    fn new(document: &'a Document) -> Self {
        DocumentIndex {
            document_id: &document.spdx_id,
            element_ids: document.declared_ids().collect(),
            file_ids: document.files.iter().map(|f| f.spdx_id.as_str()).collect(),
            document_refs: document
                .external_document_refs
                .iter()
                .map(|r| r.document_ref_id.as_str())
                .collect(),
            license_refs: document
                .extracted_licensing_info
                .iter()
                .map(|i| i.license_id.as_str())
                .collect(),
        }
    }

    /// Check that `raw` names the document, a declared element, or an external
    /// SPDXID whose `DocumentRef-` prefix is declared.
    fn check_reference(
        &self,
        raw: &str,
        element_type: ElementType,
        element: &str,
        messages: &mut Vec<ValidationMessage>,
    ) {
        if raw == self.document_id || self.element_ids.contains(raw) {
            return;
        }
        if let Some((document_ref, _)) = split_external_spdx_id(raw) {
            if !self.document_refs.contains(document_ref) {
                messages.push(
                    ValidationMessage::new(
                        element_type,
                        format!(
                            "did not find the referenced external document `{document_ref}` \
                             in external_document_refs (while resolving `{raw}`)"
                        ),
                    )
                    .with_element(element),
                );
            }
            return;
        }
        messages.push(
            ValidationMessage::new(
                element_type,
                format!("did not find the referenced spdx_id `{raw}` in the SPDX document"),
            )
            .with_element(element),
        );
    }
}

fn looks_like_uri(raw: &str) -> bool {
    raw.contains("://") || raw.starts_with("urn:")
}

fn is_lowercase_hex(raw: &str) -> bool {
    raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

fn validate_document_fields(
    document: &Document,
    expected_version: Option<&str>,
    messages: &mut Vec<ValidationMessage>,
) {
    let version_ok = document
        .spdx_version
        .strip_prefix("SPDX-")
        .is_some_and(|rest| rest.parse::<Version>().is_ok());
    if !version_ok {
        messages.push(
            ValidationMessage::new(
                ElementType::Document,
                format!(
                    "spdx_version must be of the form SPDX-<major>.<minor>, but is: {}",
                    document.spdx_version
                ),
            )
            .with_spdx_id(&document.spdx_id),
        );
    }
    if let Some(expected) = expected_version {
        if expected != document.spdx_version {
            messages.push(
                ValidationMessage::new(
                    ElementType::Document,
                    format!(
                        "provided SPDX version {expected} does not match the document-declared \
                         SPDX version {}",
                        document.spdx_version
                    ),
                )
                .with_spdx_id(&document.spdx_id),
            );
        }
    }
    if document.data_license != "CC0-1.0" {
        messages.push(
            ValidationMessage::new(
                ElementType::Document,
                format!(
                    "data_license must be \"CC0-1.0\", but is: {}",
                    document.data_license
                ),
            )
            .with_spdx_id(&document.spdx_id),
        );
    }
    if !looks_like_uri(&document.document_namespace) {
        messages.push(
            ValidationMessage::new(
                ElementType::Document,
                format!(
                    "document_namespace must be a URI with a scheme, but is: {}",
                    document.document_namespace
                ),
            )
            .with_spdx_id(&document.spdx_id),
        );
    }
    if document.creation_info.creators.is_empty() {
        messages.push(
            ValidationMessage::new(
                ElementType::CreationInfo,
                "creators must contain at least one Actor",
            )
            .with_parent(&document.spdx_id),
        );
    }
    for creator in &document.creation_info.creators {
        validate_actor(creator, &document.spdx_id, messages);
    }
}

fn validate_declared_id_shapes(document: &Document, messages: &mut Vec<ValidationMessage>) {
    let declared = std::iter::once((ElementType::Document, document.spdx_id.as_str()))
        .chain(
            document
                .packages
                .iter()
                .map(|p| (ElementType::Package, p.spdx_id.as_str())),
        )
        .chain(
            document
                .files
                .iter()
                .map(|f| (ElementType::File, f.spdx_id.as_str())),
        )
        .chain(
            document
                .snippets
                .iter()
                .map(|s| (ElementType::Snippet, s.spdx_id.as_str())),
        );
    for (element_type, spdx_id) in declared {
        if !is_valid_spdx_id(spdx_id) {
            messages.push(
                ValidationMessage::new(
                    element_type,
                    format!(
                        "spdx_id must only contain letters, numbers, \".\", \"+\" and \"-\" \
                         and must begin with \"SPDXRef-\", but is: {spdx_id}"
                    ),
                )
                .with_spdx_id(spdx_id),
            );
        }
    }
}

fn validate_unique_ids(document: &Document, messages: &mut Vec<ValidationMessage>) {
    let mut locations: HashMap<&str, Vec<String>> = HashMap::new();
    locations
        .entry(&document.spdx_id)
        .or_default()
        .push("document".to_string());
    for (index, package) in document.packages.iter().enumerate() {
        locations
            .entry(&package.spdx_id)
            .or_default()
            .push(format!("packages[{index}]"));
    }
    for (index, file) in document.files.iter().enumerate() {
        locations
            .entry(&file.spdx_id)
            .or_default()
            .push(format!("files[{index}]"));
    }
    for (index, snippet) in document.snippets.iter().enumerate() {
        locations
            .entry(&snippet.spdx_id)
            .or_default()
            .push(format!("snippets[{index}]"));
    }
    let mut duplicated: Vec<(&str, Vec<String>)> = locations
        .into_iter()
        .filter(|(_, places)| places.len() > 1)
        .collect();
    duplicated.sort_by_key(|(spdx_id, _)| *spdx_id);
    for (spdx_id, places) in duplicated {
        messages.push(
            ValidationMessage::new(
                ElementType::Document,
                format!(
                    "every spdx_id must be unique within the document, but `{spdx_id}` is \
                     declared by: {}",
                    places.join(", ")
                ),
            )
            .with_spdx_id(spdx_id),
        );
    }
}

fn validate_actor(actor: &Actor, parent_id: &str, messages: &mut Vec<ValidationMessage>) {
    if actor.name.is_empty() {
        messages.push(
            ValidationMessage::new(ElementType::Actor, "name must not be empty")
                .with_parent(parent_id)
                .with_element(actor.to_string()),
        );
    }
    if actor.actor_type == ActorType::Tool {
        if let Some(email) = &actor.email {
            messages.push(
                ValidationMessage::new(
                    ElementType::Actor,
                    format!("email must be None if actor_type is TOOL, but is: {email}"),
                )
                .with_parent(parent_id)
                .with_element(actor.to_string()),
            );
        }
    }
}

fn validate_checksum(checksum: &Checksum, parent_id: &str, messages: &mut Vec<ValidationMessage>) {
    let value = &checksum.value;
    let actual = value.len();
    let problem = match checksum.algorithm.hex_length() {
        Some(expected) => {
            if actual != expected || !is_lowercase_hex(value) {
                Some(format!(
                    "value of {} must consist of {expected} lowercase hexadecimal digits, \
                     but is: {value} (length: {actual})",
                    checksum.algorithm
                ))
            } else {
                None
            }
        }
        None if checksum.algorithm == ChecksumAlgorithm::Blake3 => {
            if actual < 64 || !is_lowercase_hex(value) {
                Some(format!(
                    "value of BLAKE3 must consist of at least 64 lowercase hexadecimal \
                     digits, but is: {value} (length: {actual})"
                ))
            } else {
                None
            }
        }
        None => {
            // MD6 digests are 0 to 512 bits, so any even hex length up to 128.
            if actual > 128 || actual % 2 != 0 || !is_lowercase_hex(value) {
                Some(format!(
                    "value of MD6 must consist of an even number of lowercase hexadecimal \
                     digits, at most 128, but is: {value} (length: {actual})"
                ))
            } else {
                None
            }
        }
    };
    if let Some(message) = problem {
        messages.push(
            ValidationMessage::new(ElementType::Checksum, message).with_parent(parent_id),
        );
    }
}

fn validate_verification_code(
    code: &PackageVerificationCode,
    parent_id: &str,
    messages: &mut Vec<ValidationMessage>,
) {
    let actual = code.value.len();
    if actual != 40 || !is_lowercase_hex(&code.value) {
        messages.push(
            ValidationMessage::new(
                ElementType::PackageVerificationCode,
                format!(
                    "value of verification_code must consist of 40 lowercase hexadecimal \
                     digits, but is: {} (length: {actual})",
                    code.value
                ),
            )
            .with_parent(parent_id),
        );
    }
    for excluded in &code.excluded_files {
        if excluded.starts_with('/') {
            messages.push(
                ValidationMessage::new(
                    ElementType::PackageVerificationCode,
                    format!(
                        "excluded file must not be an absolute path starting with \"/\", \
                         but is: {excluded}"
                    ),
                )
                .with_parent(parent_id),
            );
        }
    }
}

fn validate_license_expression(
    expression: &LicenseExpression,
    index: &DocumentIndex<'_>,
    element_type: ElementType,
    owner_id: &str,
    messages: &mut Vec<ValidationMessage>,
) {
    for mention in expression.license_refs() {
        match &mention.document_ref {
            Some(document_ref) => {
                if !index.document_refs.contains(document_ref.as_str()) {
                    messages.push(
                        ValidationMessage::new(
                            element_type,
                            format!(
                                "did not find the referenced external document \
                                 `{document_ref}` for license reference `{document_ref}:{}`",
                                mention.license_ref
                            ),
                        )
                        .with_spdx_id(owner_id)
                        .with_element(expression.as_str()),
                    );
                }
            }
            None => {
                if !index.license_refs.contains(mention.license_ref.as_str()) {
                    messages.push(
                        ValidationMessage::new(
                            element_type,
                            format!(
                                "license reference `{}` is not defined in the document's \
                                 extracted licensing info",
                                mention.license_ref
                            ),
                        )
                        .with_spdx_id(owner_id)
                        .with_element(expression.as_str()),
                    );
                }
            }
        }
    }
}

fn validate_license_sum(
    field: &SpdxValue<LicenseExpression>,
    index: &DocumentIndex<'_>,
    element_type: ElementType,
    owner_id: &str,
    messages: &mut Vec<ValidationMessage>,
) {
    if let SpdxValue::Value(expression) = field {
        validate_license_expression(expression, index, element_type, owner_id, messages);
    }
}

fn validate_package(
    package: &Package,
    index: &DocumentIndex<'_>,
    messages: &mut Vec<ValidationMessage>,
) {
    let spdx_id = &package.spdx_id;
    if package.name.is_empty() {
        messages.push(
            ValidationMessage::new(ElementType::Package, "name must not be empty")
                .with_spdx_id(spdx_id),
        );
    }
    if let SpdxValue::Value(location) = &package.download_location {
        if location.is_empty() {
            messages.push(
                ValidationMessage::new(
                    ElementType::Package,
                    "download_location must not be empty",
                )
                .with_spdx_id(spdx_id),
            );
        }
    }
    if !package.files_analyzed {
        if let Some(code) = &package.verification_code {
            messages.push(
                ValidationMessage::new(
                    ElementType::Package,
                    format!(
                        "verification_code must be None if files_analyzed is False, but is: {}",
                        code.value
                    ),
                )
                .with_spdx_id(spdx_id),
            );
        }
        if !package.license_info_from_files.is_empty() {
            messages.push(
                ValidationMessage::new(
                    ElementType::Package,
                    "license_info_from_files must be empty if files_analyzed is False",
                )
                .with_spdx_id(spdx_id),
            );
        }
    }
    if let Some(code) = &package.verification_code {
        validate_verification_code(code, spdx_id, messages);
    }
    for checksum in &package.checksums {
        validate_checksum(checksum, spdx_id, messages);
    }
    if let Some(supplier) = package.supplier.as_ref().and_then(|s| s.as_value()) {
        validate_actor(supplier, spdx_id, messages);
    }
    if let Some(originator) = package.originator.as_ref().and_then(|o| o.as_value()) {
        validate_actor(originator, spdx_id, messages);
    }
    if let Some(concluded) = &package.license_concluded {
        validate_license_sum(concluded, index, ElementType::Package, spdx_id, messages);
    }
    if let Some(declared) = &package.license_declared {
        validate_license_sum(declared, index, ElementType::Package, spdx_id, messages);
    }
    for info in &package.license_info_from_files {
        validate_license_sum(info, index, ElementType::Package, spdx_id, messages);
    }
}

fn validate_file(file: &File, index: &DocumentIndex<'_>, messages: &mut Vec<ValidationMessage>) {
    let spdx_id = &file.spdx_id;
    if file.name.is_empty() {
        messages.push(
            ValidationMessage::new(ElementType::File, "name must not be empty")
                .with_spdx_id(spdx_id),
        );
    }
    if !file
        .checksums
        .iter()
        .any(|c| c.algorithm == ChecksumAlgorithm::Sha1)
    {
        let present: Vec<&str> = file
            .checksums
            .iter()
            .map(|c| c.algorithm.canonical())
            .collect();
        messages.push(
            ValidationMessage::new(
                ElementType::File,
                format!(
                    "checksums must contain a SHA1 checksum, but only contains: [{}]",
                    present.join(", ")
                ),
            )
            .with_spdx_id(spdx_id),
        );
    }
    for checksum in &file.checksums {
        validate_checksum(checksum, spdx_id, messages);
    }
    if let Some(concluded) = &file.license_concluded {
        validate_license_sum(concluded, index, ElementType::File, spdx_id, messages);
    }
    for info in &file.license_info_in_file {
        validate_license_sum(info, index, ElementType::File, spdx_id, messages);
    }
}

fn validate_snippet(
    snippet: &Snippet,
    index: &DocumentIndex<'_>,
    messages: &mut Vec<ValidationMessage>,
) {
    let spdx_id = &snippet.spdx_id;
    if !index.file_ids.contains(snippet.file_spdx_id.as_str()) {
        messages.push(
            ValidationMessage::new(
                ElementType::Snippet,
                format!(
                    "file_spdx_id must reference a file in the document, but is: {}",
                    snippet.file_spdx_id
                ),
            )
            .with_spdx_id(spdx_id),
        );
    }
    let (begin, end) = snippet.byte_range;
    if begin > end {
        messages.push(
            ValidationMessage::new(
                ElementType::Snippet,
                format!(
                    "the first value of byte_range must be less than or equal to the \
                     second, but is: ({begin}, {end})"
                ),
            )
            .with_spdx_id(spdx_id),
        );
    }
    if let Some((begin, end)) = snippet.line_range {
        if begin > end {
            messages.push(
                ValidationMessage::new(
                    ElementType::Snippet,
                    format!(
                        "the first value of line_range must be less than or equal to the \
                         second, but is: ({begin}, {end})"
                    ),
                )
                .with_spdx_id(spdx_id),
            );
        }
    }
    if let Some(concluded) = &snippet.license_concluded {
        validate_license_sum(concluded, index, ElementType::Snippet, spdx_id, messages);
    }
    for info in &snippet.license_info_in_snippet {
        validate_license_sum(info, index, ElementType::Snippet, spdx_id, messages);
    }
}

fn validate_relationship(
    relationship: &Relationship,
    index: &DocumentIndex<'_>,
    messages: &mut Vec<ValidationMessage>,
) {
    let element = format!(
        "{} {} {}",
        relationship.spdx_element_id,
        relationship.relationship_type,
        relationship.related_spdx_element_id
    );
    index.check_reference(
        &relationship.spdx_element_id,
        ElementType::Relationship,
        &element,
        messages,
    );
    if let SpdxValue::Value(related) = &relationship.related_spdx_element_id {
        index.check_reference(related, ElementType::Relationship, &element, messages);
    }
}

fn validate_annotation(
    annotation: &Annotation,
    index: &DocumentIndex<'_>,
    messages: &mut Vec<ValidationMessage>,
) {
    index.check_reference(
        &annotation.spdx_id,
        ElementType::Annotation,
        &format!("annotation by {}", annotation.annotator),
        messages,
    );
    validate_actor(&annotation.annotator, &annotation.spdx_id, messages);
}

fn validate_external_document_ref(
    external_ref: &ExternalDocumentRef,
    messages: &mut Vec<ValidationMessage>,
) {
    let ref_id = &external_ref.document_ref_id;
    if !is_valid_document_ref_id(ref_id) {
        messages.push(
            ValidationMessage::new(
                ElementType::ExternalDocumentRef,
                format!(
                    "document_ref_id must only contain letters, numbers, \".\", \"+\" and \
                     \"-\" and must begin with \"DocumentRef-\", but is: {ref_id}"
                ),
            )
            .with_spdx_id(ref_id),
        );
    }
    if !looks_like_uri(&external_ref.document_uri) {
        messages.push(
            ValidationMessage::new(
                ElementType::ExternalDocumentRef,
                format!(
                    "document_uri must be a URI with a scheme, but is: {}",
                    external_ref.document_uri
                ),
            )
            .with_spdx_id(ref_id),
        );
    }
    validate_checksum(&external_ref.checksum, ref_id, messages);
}

fn validate_extracted_licensing_info(
    info: &ExtractedLicensingInfo,
    messages: &mut Vec<ValidationMessage>,
) {
    let id_ok = info
        .license_id
        .strip_prefix("LicenseRef-")
        .is_some_and(|rest| {
            !rest.is_empty()
                && rest
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
        });
    if !id_ok {
        messages.push(
            ValidationMessage::new(
                ElementType::ExtractedLicensingInfo,
                format!(
                    "license_id must only contain letters, numbers, \".\" and \"-\" and \
                     must begin with \"LicenseRef-\", but is: {}",
                    info.license_id
                ),
            )
            .with_spdx_id(&info.license_id),
        );
    }
    for reference in &info.cross_references {
        if !looks_like_uri(reference) {
            messages.push(
                ValidationMessage::new(
                    ElementType::ExtractedLicensingInfo,
                    format!("cross_reference must be a URI with a scheme, but is: {reference}"),
                )
                .with_spdx_id(&info.license_id),
            );
        }
    }
}
