//! The SPDX 2.x document model.
//!
//! One struct per SPDX entity, independent of any encoding. Decoders build
//! these, the validator walks them, encoders render them. Fields that the
//! SPDX specification types as "value or NOASSERTION or NONE" use the
//! [`SpdxValue`]/[`OrNoAssertion`] sums from [`values`] instead of magic
//! strings.

pub mod enums;
pub mod values;

use crate::license::LicenseExpression;
use chrono::{DateTime, Utc};
use enums::{
    AnnotationType, ChecksumAlgorithm, ExternalRefCategory, FileType, PackagePurpose,
    RelationshipType,
};
use values::{Actor, OrNoAssertion, SpdxValue, Version};

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')
}

/// True when `raw` matches `SPDXRef-[A-Za-z0-9.+-]+`.
pub fn is_valid_spdx_id(raw: &str) -> bool {
    raw.strip_prefix("SPDXRef-")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_id_char))
}

/// True when `raw` matches `DocumentRef-[A-Za-z0-9.+-]+`.
pub fn is_valid_document_ref_id(raw: &str) -> bool {
    raw.strip_prefix("DocumentRef-")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(is_id_char))
}

/// Split `DocumentRef-<x>:SPDXRef-<y>` into its two halves, if `raw` has
/// that exact shape.
pub fn split_external_spdx_id(raw: &str) -> Option<(&str, &str)> {
    let (document_ref, local) = raw.split_once(':')?;
    (is_valid_document_ref_id(document_ref) && is_valid_spdx_id(local))
        .then_some((document_ref, local))
}

/// A complete SPDX 2.x document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub spdx_version: String, // e.g. "SPDX-2.3"
    pub data_license: String, // always "CC0-1.0"
    pub spdx_id: String,
    pub name: String,
    pub document_namespace: String,
    pub comment: Option<String>,
    pub creation_info: CreationInfo,
    pub external_document_refs: Vec<ExternalDocumentRef>,
    pub packages: Vec<Package>,
    pub files: Vec<File>,
    pub snippets: Vec<Snippet>,
    pub relationships: Vec<Relationship>,
    pub annotations: Vec<Annotation>,
    pub extracted_licensing_info: Vec<ExtractedLicensingInfo>,
}

impl Document {
    /// A document with the conventional identifier and data license, and no
    /// elements yet.
    pub fn new(
        name: impl Into<String>,
        document_namespace: impl Into<String>,
        creation_info: CreationInfo,
    ) -> Self {
        Document {
            spdx_version: "SPDX-2.3".to_string(),
            data_license: "CC0-1.0".to_string(),
            spdx_id: "SPDXRef-DOCUMENT".to_string(),
            name: name.into(),
            document_namespace: document_namespace.into(),
            comment: None,
            creation_info,
            external_document_refs: Vec::new(),
            packages: Vec::new(),
            files: Vec::new(),
            snippets: Vec::new(),
            relationships: Vec::new(),
            annotations: Vec::new(),
            extracted_licensing_info: Vec::new(),
        }
    }

    /// SPDXIDs of the document itself and every declared element, in
    /// declaration order.
    pub fn declared_ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.spdx_id.as_str())
            .chain(self.packages.iter().map(|p| p.spdx_id.as_str()))
            .chain(self.files.iter().map(|f| f.spdx_id.as_str()))
            .chain(self.snippets.iter().map(|s| s.spdx_id.as_str()))
    }
}

/// Who created the document, when, and against which license list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationInfo {
    pub creators: Vec<Actor>,
    pub created: DateTime<Utc>,
    pub creator_comment: Option<String>,
    pub license_list_version: Option<Version>,
}

impl CreationInfo {
    pub fn new(creators: Vec<Actor>, created: DateTime<Utc>) -> Self {
        CreationInfo {
            creators,
            created,
            creator_comment: None,
            license_list_version: None,
        }
    }
}

/// An algorithm plus its lowercase hex digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    pub algorithm: ChecksumAlgorithm,
    pub value: String,
}

impl Checksum {
    pub fn new(algorithm: ChecksumAlgorithm, value: impl Into<String>) -> Self {
        Checksum {
            algorithm,
            value: value.into(),
        }
    }
}

/// Declares a short `DocumentRef-` prefix for another document, so SPDXIDs
/// in that document can be referenced from this one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDocumentRef {
    pub document_ref_id: String, // "DocumentRef-..."
    pub document_uri: String,
    pub checksum: Checksum,
}

impl ExternalDocumentRef {
    pub fn new(
        document_ref_id: impl Into<String>,
        document_uri: impl Into<String>,
        checksum: Checksum,
    ) -> Self {
        ExternalDocumentRef {
            document_ref_id: document_ref_id.into(),
            document_uri: document_uri.into(),
            checksum,
        }
    }
}

/// The package verification code: a SHA1 over the package's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVerificationCode {
    pub value: String, // 40 lowercase hex digits
    pub excluded_files: Vec<String>,
}

impl PackageVerificationCode {
    pub fn new(value: impl Into<String>) -> Self {
        PackageVerificationCode {
            value: value.into(),
            excluded_files: Vec::new(),
        }
    }
}

/// A pointer out of the SPDX document, e.g. a purl or a CPE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalPackageRef {
    pub category: ExternalRefCategory,
    pub reference_type: String, // e.g. "purl", "cpe23Type"
    pub locator: String,
    pub comment: Option<String>,
}

impl ExternalPackageRef {
    pub fn new(
        category: ExternalRefCategory,
        reference_type: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        ExternalPackageRef {
            category,
            reference_type: reference_type.into(),
            locator: locator.into(),
            comment: None,
        }
    }
}

/// An SPDX 2.x package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub spdx_id: String,
    pub name: String,
    pub download_location: SpdxValue<String>,
    pub version: Option<String>,
    pub file_name: Option<String>,
    pub supplier: Option<OrNoAssertion<Actor>>,
    pub originator: Option<OrNoAssertion<Actor>>,
    pub files_analyzed: bool,
    pub verification_code: Option<PackageVerificationCode>,
    pub checksums: Vec<Checksum>,
    pub homepage: Option<String>,
    pub source_info: Option<String>,
    pub license_concluded: Option<SpdxValue<LicenseExpression>>,
    pub license_info_from_files: Vec<SpdxValue<LicenseExpression>>,
    pub license_declared: Option<SpdxValue<LicenseExpression>>,
    pub license_comment: Option<String>,
    pub copyright_text: Option<SpdxValue<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub external_refs: Vec<ExternalPackageRef>,
    pub attribution_texts: Vec<String>,
    pub primary_package_purpose: Option<PackagePurpose>,
    pub release_date: Option<DateTime<Utc>>,
    pub built_date: Option<DateTime<Utc>>,
    pub valid_until_date: Option<DateTime<Utc>>,
}

impl Package {
    pub fn new(
        spdx_id: impl Into<String>,
        name: impl Into<String>,
        download_location: SpdxValue<String>,
    ) -> Self {
        Package {
            spdx_id: spdx_id.into(),
            name: name.into(),
            download_location,
            version: None,
            file_name: None,
            supplier: None,
            originator: None,
            files_analyzed: true,
            verification_code: None,
            checksums: Vec::new(),
            homepage: None,
            source_info: None,
            license_concluded: None,
            license_info_from_files: Vec::new(),
            license_declared: None,
            license_comment: None,
            copyright_text: None,
            summary: None,
            description: None,
            comment: None,
            external_refs: Vec::new(),
            attribution_texts: Vec::new(),
            primary_package_purpose: None,
            release_date: None,
            built_date: None,
            valid_until_date: None,
        }
    }
}

/// An SPDX 2.x file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub spdx_id: String,
    pub name: String,
    pub checksums: Vec<Checksum>, // at least one SHA1 for a valid file
    pub file_types: Vec<FileType>,
    pub license_concluded: Option<SpdxValue<LicenseExpression>>,
    pub license_info_in_file: Vec<SpdxValue<LicenseExpression>>,
    pub license_comment: Option<String>,
    pub copyright_text: Option<SpdxValue<String>>,
    pub comment: Option<String>,
    pub notice: Option<String>,
    pub contributors: Vec<String>,
    pub attribution_texts: Vec<String>,
}

impl File {
    pub fn new(
        spdx_id: impl Into<String>,
        name: impl Into<String>,
        checksums: Vec<Checksum>,
    ) -> Self {
        File {
            spdx_id: spdx_id.into(),
            name: name.into(),
            checksums,
            file_types: Vec::new(),
            license_concluded: None,
            license_info_in_file: Vec::new(),
            license_comment: None,
            copyright_text: None,
            comment: None,
            notice: None,
            contributors: Vec::new(),
            attribution_texts: Vec::new(),
        }
    }
}

/// A region of a file. Byte and line ranges are stored exactly as decoded;
/// inclusivity follows the SPDX convention and is not normalized here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub spdx_id: String,
    pub file_spdx_id: String,
    pub byte_range: (u64, u64),
    pub line_range: Option<(u64, u64)>,
    pub license_concluded: Option<SpdxValue<LicenseExpression>>,
    pub license_info_in_snippet: Vec<SpdxValue<LicenseExpression>>,
    pub license_comment: Option<String>,
    pub copyright_text: Option<SpdxValue<String>>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub attribution_texts: Vec<String>,
}

impl Snippet {
    pub fn new(
        spdx_id: impl Into<String>,
        file_spdx_id: impl Into<String>,
        byte_range: (u64, u64),
    ) -> Self {
        Snippet {
            spdx_id: spdx_id.into(),
            file_spdx_id: file_spdx_id.into(),
            byte_range,
            line_range: None,
            license_concluded: None,
            license_info_in_snippet: Vec::new(),
            license_comment: None,
            copyright_text: None,
            name: None,
            comment: None,
            attribution_texts: Vec::new(),
        }
    }
}

/// A typed edge between two SPDX elements. The target may also be a marker:
/// NOASSERTION when the related element is unknown, NONE when there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub spdx_element_id: String,
    pub relationship_type: RelationshipType,
    pub related_spdx_element_id: SpdxValue<String>,
    pub comment: Option<String>,
}

impl Relationship {
    pub fn new(
        spdx_element_id: impl Into<String>,
        relationship_type: RelationshipType,
        related_spdx_element_id: SpdxValue<String>,
    ) -> Self {
        Relationship {
            spdx_element_id: spdx_element_id.into(),
            relationship_type,
            related_spdx_element_id,
            comment: None,
        }
    }
}

/// A review-style note on an element, keyed by the subject's SPDXID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub spdx_id: String, // the annotated element
    pub annotation_type: AnnotationType,
    pub annotator: Actor,
    pub annotation_date: DateTime<Utc>,
    pub annotation_comment: String,
}

impl Annotation {
    pub fn new(
        spdx_id: impl Into<String>,
        annotation_type: AnnotationType,
        annotator: Actor,
        annotation_date: DateTime<Utc>,
        annotation_comment: impl Into<String>,
    ) -> Self {
        Annotation {
            spdx_id: spdx_id.into(),
            annotation_type,
            annotator,
            annotation_date,
            annotation_comment: annotation_comment.into(),
        }
    }
}

/// Text of a license that is not on the SPDX license list, declared under a
/// `LicenseRef-` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLicensingInfo {
    pub license_id: String, // "LicenseRef-..."
    pub extracted_text: String,
    pub license_name: Option<OrNoAssertion<String>>,
    pub cross_references: Vec<String>,
    pub comment: Option<String>,
}

impl ExtractedLicensingInfo {
    pub fn new(license_id: impl Into<String>, extracted_text: impl Into<String>) -> Self {
        ExtractedLicensingInfo {
            license_id: license_id.into(),
            extracted_text: extracted_text.into(),
            license_name: None,
            cross_references: Vec::new(),
            comment: None,
        }
    }
}
