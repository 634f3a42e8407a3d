//! The SPDX 3.x element-graph model.
//!
//! 3.x drops the flat document in favor of globally-identified Elements tied
//! together by Relationship elements. The upstream class hierarchy (Element,
//! Artifact, Agent, SpdxCollection, IntegrityMethod) is collapsed here into
//! the [`Element`] sum plus shared field structs, with one struct per
//! concrete class.

pub mod payload;

use crate::models_v2::enums::{AnnotationType, ChecksumAlgorithm, PackagePurpose, RelationshipType};
use crate::models_v2::values::SpdxValue;
use chrono::{DateTime, Utc};
use std::fmt;

/// 3.x creation information, shared (cloned) across every bumped element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationInfo {
    pub spec_version: String, // e.g. "3.0.0"
    pub created: DateTime<Utc>,
    pub created_by: Vec<String>,    // Agent IRIs
    pub created_using: Vec<String>, // Tool IRIs
    pub comment: Option<String>,
}

impl CreationInfo {
    pub fn new(created: DateTime<Utc>) -> Self {
        CreationInfo {
            spec_version: "3.0.0".to_string(),
            created,
            created_by: Vec::new(),
            created_using: Vec::new(),
            comment: None,
        }
    }
}

/// Hash algorithms of the 3.x vocabulary. The spellings differ from the 2.x
/// checksum algorithms (`BLAKE2B256`, not `BLAKE2B_256`), and 2.x algorithms
/// without a 3.x home map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Sha3_256,
    Sha3_384,
    Sha3_512,
    Blake2b256,
    Blake2b384,
    Blake2b512,
    Blake3,
    Md2,
    Md4,
    Md5,
    Md6,
    Other,
}

impl From<ChecksumAlgorithm> for HashAlgorithm {
    fn from(algorithm: ChecksumAlgorithm) -> Self {
        match algorithm {
            ChecksumAlgorithm::Sha1 => HashAlgorithm::Sha1,
            ChecksumAlgorithm::Sha224 => HashAlgorithm::Sha224,
            ChecksumAlgorithm::Sha256 => HashAlgorithm::Sha256,
            ChecksumAlgorithm::Sha384 => HashAlgorithm::Sha384,
            ChecksumAlgorithm::Sha512 => HashAlgorithm::Sha512,
            ChecksumAlgorithm::Sha3_256 => HashAlgorithm::Sha3_256,
            ChecksumAlgorithm::Sha3_384 => HashAlgorithm::Sha3_384,
            ChecksumAlgorithm::Sha3_512 => HashAlgorithm::Sha3_512,
            ChecksumAlgorithm::Blake2b256 => HashAlgorithm::Blake2b256,
            ChecksumAlgorithm::Blake2b384 => HashAlgorithm::Blake2b384,
            ChecksumAlgorithm::Blake2b512 => HashAlgorithm::Blake2b512,
            ChecksumAlgorithm::Blake3 => HashAlgorithm::Blake3,
            ChecksumAlgorithm::Md2 => HashAlgorithm::Md2,
            ChecksumAlgorithm::Md4 => HashAlgorithm::Md4,
            ChecksumAlgorithm::Md5 => HashAlgorithm::Md5,
            ChecksumAlgorithm::Md6 => HashAlgorithm::Md6,
            ChecksumAlgorithm::Adler32 => HashAlgorithm::Other,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha224 => "SHA224",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
            HashAlgorithm::Sha3_256 => "SHA3_256",
            HashAlgorithm::Sha3_384 => "SHA3_384",
            HashAlgorithm::Sha3_512 => "SHA3_512",
            HashAlgorithm::Blake2b256 => "BLAKE2B256",
            HashAlgorithm::Blake2b384 => "BLAKE2B384",
            HashAlgorithm::Blake2b512 => "BLAKE2B512",
            HashAlgorithm::Blake3 => "BLAKE3",
            HashAlgorithm::Md2 => "MD2",
            HashAlgorithm::Md4 => "MD4",
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Md6 => "MD6",
            HashAlgorithm::Other => "OTHER",
        };
        f.write_str(name)
    }
}

/// A hash over some artifact's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hash {
    pub algorithm: HashAlgorithm,
    pub hash_value: String,
    pub comment: Option<String>,
}

impl Hash {
    pub fn new(algorithm: HashAlgorithm, hash_value: impl Into<String>) -> Self {
        Hash {
            algorithm,
            hash_value: hash_value.into(),
            comment: None,
        }
    }
}

/// How an element's integrity can be checked. Hashes are the only concrete
/// form used here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityMethod {
    Hash(Hash),
}

/// Typed identifier pointing out of the SPDX data, e.g. a purl or a CPE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalIdentifierType {
    Cpe22,
    Cpe23,
    PackageUrl,
    Email,
    Gitoid,
    Swhid,
    Other,
}

impl fmt::Display for ExternalIdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExternalIdentifierType::Cpe22 => "CPE22",
            ExternalIdentifierType::Cpe23 => "CPE23",
            ExternalIdentifierType::PackageUrl => "PACKAGE_URL",
            ExternalIdentifierType::Email => "EMAIL",
            ExternalIdentifierType::Gitoid => "GITOID",
            ExternalIdentifierType::Swhid => "SWHID",
            ExternalIdentifierType::Other => "OTHER",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentifier {
    pub identifier_type: ExternalIdentifierType,
    pub identifier: String,
    pub comment: Option<String>,
}

impl ExternalIdentifier {
    pub fn new(identifier_type: ExternalIdentifierType, identifier: impl Into<String>) -> Self {
        ExternalIdentifier {
            identifier_type,
            identifier: identifier.into(),
            comment: None,
        }
    }
}

/// Untyped link out of the SPDX data; `reference_type` keeps the 2.x
/// reference type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    pub reference_type: String,
    pub locator: String,
    pub comment: Option<String>,
}

/// Fields every 3.x Element carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub spdx_id: String, // an IRI
    pub creation_info: CreationInfo,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub comment: Option<String>,
    pub verified_using: Vec<IntegrityMethod>,
    pub external_references: Vec<ExternalReference>,
    pub external_identifiers: Vec<ExternalIdentifier>,
}

impl ElementInfo {
    pub fn new(spdx_id: impl Into<String>, creation_info: CreationInfo) -> Self {
        ElementInfo {
            spdx_id: spdx_id.into(),
            creation_info,
            name: None,
            summary: None,
            description: None,
            comment: None,
            verified_using: Vec::new(),
            external_references: Vec::new(),
            external_identifiers: Vec::new(),
        }
    }
}

/// Fields shared by the artifact elements (Package, File, Snippet).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtifactInfo {
    pub originated_by: Vec<String>, // Agent IRIs
    pub supplied_by: Option<String>,
    pub built_time: Option<DateTime<Utc>>,
    pub release_time: Option<DateTime<Utc>>,
    pub valid_until_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentType {
    Person,
    Organization,
    SoftwareAgent,
}

/// A person, organization, or software agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub info: ElementInfo,
    pub agent_type: AgentType,
}

/// A tool, as distinct from an agent: tools cannot take responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    pub info: ElementInfo,
}

/// A 3.x software package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub info: ElementInfo,
    pub artifact: ArtifactInfo,
    pub package_version: Option<String>,
    pub download_location: Option<SpdxValue<String>>,
    pub package_url: Option<String>,
    pub homepage: Option<String>,
    pub source_info: Option<String>,
    pub copyright_text: Option<SpdxValue<String>>,
    pub attribution_text: Option<String>,
    pub primary_purpose: Option<PackagePurpose>,
}

impl Package {
    pub fn new(info: ElementInfo) -> Self {
        Package {
            info,
            artifact: ArtifactInfo::default(),
            package_version: None,
            download_location: None,
            package_url: None,
            homepage: None,
            source_info: None,
            copyright_text: None,
            attribution_text: None,
            primary_purpose: None,
        }
    }
}

/// A 3.x file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub info: ElementInfo,
    pub artifact: ArtifactInfo,
    pub content_type: Option<String>,
    pub copyright_text: Option<SpdxValue<String>>,
    pub attribution_text: Option<String>,
}

impl File {
    pub fn new(info: ElementInfo) -> Self {
        File {
            info,
            artifact: ArtifactInfo::default(),
            content_type: None,
            copyright_text: None,
            attribution_text: None,
        }
    }
}

/// A 3.x snippet of a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub info: ElementInfo,
    pub artifact: ArtifactInfo,
    pub snippet_from_file: Option<String>, // File IRI
    pub byte_range: Option<(u64, u64)>,
    pub line_range: Option<(u64, u64)>,
    pub copyright_text: Option<SpdxValue<String>>,
    pub attribution_text: Option<String>,
}

impl Snippet {
    pub fn new(info: ElementInfo) -> Self {
        Snippet {
            info,
            artifact: ArtifactInfo::default(),
            snippet_from_file: None,
            byte_range: None,
            line_range: None,
            copyright_text: None,
            attribution_text: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipCompleteness {
    Complete,
    Incomplete,
    NoAssertion,
}

/// A 3.x relationship: one `from` element, many `to` elements.
///
/// The relationship vocabulary is shared with 2.x; every type preserved by
/// the version bump keeps its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub info: ElementInfo,
    pub from_element: String,
    pub to: Vec<String>,
    pub relationship_type: RelationshipType,
    pub completeness: Option<RelationshipCompleteness>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleScope {
    Build,
    Design,
    Development,
    Runtime,
    Test,
    Other,
}

/// A relationship that only holds within a lifecycle scope, e.g. a build-time
/// dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleScopedRelationship {
    pub relationship: Relationship,
    pub scope: Option<LifecycleScope>,
}

/// A 3.x annotation of a single subject element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub info: ElementInfo,
    pub annotation_type: AnnotationType,
    pub subject: String, // Element IRI
    pub statement: Option<String>,
    pub content_type: Option<String>,
}

/// An entry in a collection's `imports`: an element defined in another
/// document, locatable through `location_hint`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalMap {
    pub external_spdx_id: String,
    pub verified_using: Vec<IntegrityMethod>,
    pub location_hint: Option<String>,
}

/// A short prefix for IRIs within a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceMap {
    pub prefix: String,
    pub namespace: String,
}

/// Fields shared by element collections (Bundle, Bom, SpdxDocument).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionInfo {
    pub elements: Vec<String>,      // member IRIs
    pub root_elements: Vec<String>, // entry points into the collection
    pub namespaces: Vec<NamespaceMap>,
    pub imports: Vec<ExternalMap>,
}

/// A bundle of elements. `Bom` and `SpdxDocument` share this shape and are
/// distinguished by their [`Element`] variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub info: ElementInfo,
    pub collection: CollectionInfo,
    pub context: Option<String>,
}

impl Bundle {
    pub fn new(info: ElementInfo) -> Self {
        Bundle {
            info,
            collection: CollectionInfo::default(),
            context: None,
        }
    }
}

/// Any concrete 3.x element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Agent(Agent),
    Tool(Tool),
    Package(Package),
    File(File),
    Snippet(Snippet),
    Relationship(Relationship),
    LifecycleScopedRelationship(LifecycleScopedRelationship),
    Annotation(Annotation),
    Bundle(Bundle),
    Bom(Bundle),
    SpdxDocument(Bundle),
}

impl Element {
    /// The shared element fields, whatever the concrete type.
    pub fn info(&self) -> &ElementInfo {
        match self {
            Element::Agent(a) => &a.info,
            Element::Tool(t) => &t.info,
            Element::Package(p) => &p.info,
            Element::File(f) => &f.info,
            Element::Snippet(s) => &s.info,
            Element::Relationship(r) => &r.info,
            Element::LifecycleScopedRelationship(r) => &r.relationship.info,
            Element::Annotation(a) => &a.info,
            Element::Bundle(b) | Element::Bom(b) | Element::SpdxDocument(b) => &b.info,
        }
    }

    pub fn spdx_id(&self) -> &str {
        &self.info().spdx_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models_v2::values::parse_timestamp;

    fn creation_info() -> CreationInfo {
        CreationInfo::new(parse_timestamp("2023-01-02T03:04:05Z").unwrap())
    }

    #[test]
    fn info_accessor_reaches_into_every_variant() {
        let info = ElementInfo::new("https://ex/doc#SPDXRef-X", creation_info());
        let elements = vec![
            Element::Tool(Tool { info: info.clone() }),
            Element::Package(Package::new(info.clone())),
            Element::SpdxDocument(Bundle::new(info.clone())),
            Element::Annotation(Annotation {
                info: info.clone(),
                annotation_type: AnnotationType::Review,
                subject: "https://ex/doc#SPDXRef-P".to_string(),
                statement: None,
                content_type: None,
            }),
        ];
        for element in &elements {
            assert_eq!(element.spdx_id(), "https://ex/doc#SPDXRef-X");
        }
    }

    #[test]
    fn adler32_has_no_hash_algorithm_home() {
        assert_eq!(
            HashAlgorithm::from(ChecksumAlgorithm::Adler32),
            HashAlgorithm::Other
        );
        assert_eq!(
            HashAlgorithm::from(ChecksumAlgorithm::Blake2b256),
            HashAlgorithm::Blake2b256
        );
        assert_eq!(HashAlgorithm::Blake2b256.to_string(), "BLAKE2B256");
    }
}
