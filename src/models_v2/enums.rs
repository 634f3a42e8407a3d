//! Enumerated vocabulary shared by every encoding.
//!
//! Each enumeration carries three names: the canonical name (uppercase with
//! underscores, used in error output), the spelling shared by tag/value and
//! the dict encodings (JSON, YAML, XML), and the RDF vocabulary short form.
//! Decoding normalizes case and hyphens the way the reference tooling does,
//! so `BLAKE2b-256`, `BLAKE2B_256`, and `blake2b-256` all name the same
//! algorithm; anything else is an `InvalidEnum` error.

use crate::errors::SpdxError;
use std::fmt;

macro_rules! vocabulary {
    ($(#[$doc:meta])* $name:ident, $field:literal {
        $($variant:ident => $canonical:literal, $spelling:literal, $rdf:literal;)+
    }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical name, e.g. `BLAKE2B_256`.
            pub fn canonical(self) -> &'static str {
                match self { $($name::$variant => $canonical,)+ }
            }

            /// Spelling used by tag/value, JSON, YAML, and XML.
            pub fn spelling(self) -> &'static str {
                match self { $($name::$variant => $spelling,)+ }
            }

            /// RDF vocabulary short form, e.g. `checksumAlgorithm_blake2b256`.
            pub fn rdf_term(self) -> &'static str {
                match self { $($name::$variant => $rdf,)+ }
            }

            /// Decode a tag/value or dict spelling.
            pub fn from_spelling(raw: &str) -> Result<Self, SpdxError> {
                let normalized = raw.to_ascii_uppercase().replace('-', "_");
                match normalized.as_str() {
                    $($canonical => Ok($name::$variant),)+
                    _ => Err(SpdxError::invalid_enum($field, raw)),
                }
            }

            /// Decode an RDF vocabulary short form.
            pub fn from_rdf_term(raw: &str) -> Result<Self, SpdxError> {
                match raw {
                    $($rdf => Ok($name::$variant),)+
                    _ => Err(SpdxError::invalid_enum($field, raw)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.canonical())
            }
        }
    };
}

vocabulary! {
    /// Hash algorithms accepted in `Checksum` entries (SPDX 2.3 set).
    ChecksumAlgorithm, "checksum algorithm" {
        Sha1 => "SHA1", "SHA1", "checksumAlgorithm_sha1";
        Sha224 => "SHA224", "SHA224", "checksumAlgorithm_sha224";
        Sha256 => "SHA256", "SHA256", "checksumAlgorithm_sha256";
        Sha384 => "SHA384", "SHA384", "checksumAlgorithm_sha384";
        Sha512 => "SHA512", "SHA512", "checksumAlgorithm_sha512";
        Sha3_256 => "SHA3_256", "SHA3-256", "checksumAlgorithm_sha3_256";
        Sha3_384 => "SHA3_384", "SHA3-384", "checksumAlgorithm_sha3_384";
        Sha3_512 => "SHA3_512", "SHA3-512", "checksumAlgorithm_sha3_512";
        Blake2b256 => "BLAKE2B_256", "BLAKE2b-256", "checksumAlgorithm_blake2b256";
        Blake2b384 => "BLAKE2B_384", "BLAKE2b-384", "checksumAlgorithm_blake2b384";
        Blake2b512 => "BLAKE2B_512", "BLAKE2b-512", "checksumAlgorithm_blake2b512";
        Blake3 => "BLAKE3", "BLAKE3", "checksumAlgorithm_blake3";
        Md2 => "MD2", "MD2", "checksumAlgorithm_md2";
        Md4 => "MD4", "MD4", "checksumAlgorithm_md4";
        Md5 => "MD5", "MD5", "checksumAlgorithm_md5";
        Md6 => "MD6", "MD6", "checksumAlgorithm_md6";
        Adler32 => "ADLER32", "ADLER32", "checksumAlgorithm_adler32";
    }
}

impl ChecksumAlgorithm {
    /// Exact hex-digit count this algorithm mandates, or `None` for the
    /// variable-length algorithms (BLAKE3 and MD6).
    pub fn hex_length(self) -> Option<usize> {
        match self {
            ChecksumAlgorithm::Sha1 => Some(40),
            ChecksumAlgorithm::Sha224 => Some(56),
            ChecksumAlgorithm::Sha256 | ChecksumAlgorithm::Sha3_256 | ChecksumAlgorithm::Blake2b256 => Some(64),
            ChecksumAlgorithm::Sha384 | ChecksumAlgorithm::Sha3_384 | ChecksumAlgorithm::Blake2b384 => Some(96),
            ChecksumAlgorithm::Sha512 | ChecksumAlgorithm::Sha3_512 | ChecksumAlgorithm::Blake2b512 => Some(128),
            ChecksumAlgorithm::Md2 | ChecksumAlgorithm::Md4 | ChecksumAlgorithm::Md5 => Some(32),
            ChecksumAlgorithm::Adler32 => Some(8),
            ChecksumAlgorithm::Blake3 | ChecksumAlgorithm::Md6 => None,
        }
    }
}

vocabulary! {
    /// Content classification for `File.file_types`.
    FileType, "file type" {
        Source => "SOURCE", "SOURCE", "fileType_source";
        Binary => "BINARY", "BINARY", "fileType_binary";
        Archive => "ARCHIVE", "ARCHIVE", "fileType_archive";
        Application => "APPLICATION", "APPLICATION", "fileType_application";
        Audio => "AUDIO", "AUDIO", "fileType_audio";
        Image => "IMAGE", "IMAGE", "fileType_image";
        Text => "TEXT", "TEXT", "fileType_text";
        Video => "VIDEO", "VIDEO", "fileType_video";
        Documentation => "DOCUMENTATION", "DOCUMENTATION", "fileType_documentation";
        Spdx => "SPDX", "SPDX", "fileType_spdx";
        Other => "OTHER", "OTHER", "fileType_other";
    }
}

vocabulary! {
    /// `Package.primary_package_purpose` values.
    PackagePurpose, "package purpose" {
        Application => "APPLICATION", "APPLICATION", "packagePurpose_application";
        Framework => "FRAMEWORK", "FRAMEWORK", "packagePurpose_framework";
        Library => "LIBRARY", "LIBRARY", "packagePurpose_library";
        Container => "CONTAINER", "CONTAINER", "packagePurpose_container";
        OperatingSystem => "OPERATING_SYSTEM", "OPERATING-SYSTEM", "packagePurpose_operatingSystem";
        Device => "DEVICE", "DEVICE", "packagePurpose_device";
        Firmware => "FIRMWARE", "FIRMWARE", "packagePurpose_firmware";
        Source => "SOURCE", "SOURCE", "packagePurpose_source";
        Archive => "ARCHIVE", "ARCHIVE", "packagePurpose_archive";
        File => "FILE", "FILE", "packagePurpose_file";
        Install => "INSTALL", "INSTALL", "packagePurpose_install";
        Other => "OTHER", "OTHER", "packagePurpose_other";
    }
}

vocabulary! {
    /// Category of an `ExternalPackageRef`.
    ExternalRefCategory, "external reference category" {
        Security => "SECURITY", "SECURITY", "referenceCategory_security";
        PackageManager => "PACKAGE_MANAGER", "PACKAGE-MANAGER", "referenceCategory_packageManager";
        PersistentId => "PERSISTENT_ID", "PERSISTENT-ID", "referenceCategory_persistentId";
        Other => "OTHER", "OTHER", "referenceCategory_other";
    }
}

vocabulary! {
    /// `Annotation.annotation_type` values.
    AnnotationType, "annotation type" {
        Review => "REVIEW", "REVIEW", "annotationType_review";
        Other => "OTHER", "OTHER", "annotationType_other";
    }
}

vocabulary! {
    /// The SPDX 2.3 relationship vocabulary.
    RelationshipType, "relationship type" {
        Amends => "AMENDS", "AMENDS", "relationshipType_amends";
        AncestorOf => "ANCESTOR_OF", "ANCESTOR_OF", "relationshipType_ancestorOf";
        BuildDependencyOf => "BUILD_DEPENDENCY_OF", "BUILD_DEPENDENCY_OF", "relationshipType_buildDependencyOf";
        BuildToolOf => "BUILD_TOOL_OF", "BUILD_TOOL_OF", "relationshipType_buildToolOf";
        ContainedBy => "CONTAINED_BY", "CONTAINED_BY", "relationshipType_containedBy";
        Contains => "CONTAINS", "CONTAINS", "relationshipType_contains";
        CopyOf => "COPY_OF", "COPY_OF", "relationshipType_copyOf";
        DataFileOf => "DATA_FILE_OF", "DATA_FILE_OF", "relationshipType_dataFileOf";
        DependencyManifestOf => "DEPENDENCY_MANIFEST_OF", "DEPENDENCY_MANIFEST_OF", "relationshipType_dependencyManifestOf";
        DependencyOf => "DEPENDENCY_OF", "DEPENDENCY_OF", "relationshipType_dependencyOf";
        DependsOn => "DEPENDS_ON", "DEPENDS_ON", "relationshipType_dependsOn";
        DescendantOf => "DESCENDANT_OF", "DESCENDANT_OF", "relationshipType_descendantOf";
        DescribedBy => "DESCRIBED_BY", "DESCRIBED_BY", "relationshipType_describedBy";
        Describes => "DESCRIBES", "DESCRIBES", "relationshipType_describes";
        DevDependencyOf => "DEV_DEPENDENCY_OF", "DEV_DEPENDENCY_OF", "relationshipType_devDependencyOf";
        DevToolOf => "DEV_TOOL_OF", "DEV_TOOL_OF", "relationshipType_devToolOf";
        DistributionArtifact => "DISTRIBUTION_ARTIFACT", "DISTRIBUTION_ARTIFACT", "relationshipType_distributionArtifact";
        DocumentationOf => "DOCUMENTATION_OF", "DOCUMENTATION_OF", "relationshipType_documentationOf";
        DynamicLink => "DYNAMIC_LINK", "DYNAMIC_LINK", "relationshipType_dynamicLink";
        ExampleOf => "EXAMPLE_OF", "EXAMPLE_OF", "relationshipType_exampleOf";
        ExpandedFromArchive => "EXPANDED_FROM_ARCHIVE", "EXPANDED_FROM_ARCHIVE", "relationshipType_expandedFromArchive";
        FileAdded => "FILE_ADDED", "FILE_ADDED", "relationshipType_fileAdded";
        FileDeleted => "FILE_DELETED", "FILE_DELETED", "relationshipType_fileDeleted";
        FileModified => "FILE_MODIFIED", "FILE_MODIFIED", "relationshipType_fileModified";
        GeneratedFrom => "GENERATED_FROM", "GENERATED_FROM", "relationshipType_generatedFrom";
        Generates => "GENERATES", "GENERATES", "relationshipType_generates";
        HasPrerequisite => "HAS_PREREQUISITE", "HAS_PREREQUISITE", "relationshipType_hasPrerequisite";
        MetafileOf => "METAFILE_OF", "METAFILE_OF", "relationshipType_metafileOf";
        OptionalComponentOf => "OPTIONAL_COMPONENT_OF", "OPTIONAL_COMPONENT_OF", "relationshipType_optionalComponentOf";
        OptionalDependencyOf => "OPTIONAL_DEPENDENCY_OF", "OPTIONAL_DEPENDENCY_OF", "relationshipType_optionalDependencyOf";
        Other => "OTHER", "OTHER", "relationshipType_other";
        PackageOf => "PACKAGE_OF", "PACKAGE_OF", "relationshipType_packageOf";
        PatchApplied => "PATCH_APPLIED", "PATCH_APPLIED", "relationshipType_patchApplied";
        PatchFor => "PATCH_FOR", "PATCH_FOR", "relationshipType_patchFor";
        PrerequisiteFor => "PREREQUISITE_FOR", "PREREQUISITE_FOR", "relationshipType_prerequisiteFor";
        ProvidedDependencyOf => "PROVIDED_DEPENDENCY_OF", "PROVIDED_DEPENDENCY_OF", "relationshipType_providedDependencyOf";
        RequirementDescriptionOf => "REQUIREMENT_DESCRIPTION_OF", "REQUIREMENT_DESCRIPTION_OF", "relationshipType_requirementDescriptionOf";
        RuntimeDependencyOf => "RUNTIME_DEPENDENCY_OF", "RUNTIME_DEPENDENCY_OF", "relationshipType_runtimeDependencyOf";
        SpecificationFor => "SPECIFICATION_FOR", "SPECIFICATION_FOR", "relationshipType_specificationFor";
        StaticLink => "STATIC_LINK", "STATIC_LINK", "relationshipType_staticLink";
        TestCaseOf => "TEST_CASE_OF", "TEST_CASE_OF", "relationshipType_testCaseOf";
        TestDependencyOf => "TEST_DEPENDENCY_OF", "TEST_DEPENDENCY_OF", "relationshipType_testDependencyOf";
        TestOf => "TEST_OF", "TEST_OF", "relationshipType_testOf";
        TestToolOf => "TEST_TOOL_OF", "TEST_TOOL_OF", "relationshipType_testToolOf";
        VariantOf => "VARIANT_OF", "VARIANT_OF", "relationshipType_variantOf";
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_spellings_round_trip() {
        for algorithm in ChecksumAlgorithm::ALL {
            assert_eq!(
                ChecksumAlgorithm::from_spelling(algorithm.spelling()).unwrap(),
                *algorithm
            );
            assert_eq!(
                ChecksumAlgorithm::from_rdf_term(algorithm.rdf_term()).unwrap(),
                *algorithm
            );
        }
    }

    #[test]
    fn blake2b_spellings() {
        let algorithm = ChecksumAlgorithm::Blake2b256;
        assert_eq!(algorithm.spelling(), "BLAKE2b-256");
        assert_eq!(algorithm.rdf_term(), "checksumAlgorithm_blake2b256");
        assert_eq!(algorithm.canonical(), "BLAKE2B_256");
        assert_eq!(
            ChecksumAlgorithm::from_spelling("BLAKE2b-256").unwrap(),
            algorithm
        );
        // Underscore/canonical alias also decodes.
        assert_eq!(
            ChecksumAlgorithm::from_spelling("BLAKE2B_256").unwrap(),
            algorithm
        );
    }

    #[test]
    fn sha3_keeps_underscore_in_rdf() {
        assert_eq!(
            ChecksumAlgorithm::Sha3_256.rdf_term(),
            "checksumAlgorithm_sha3_256"
        );
        assert_eq!(ChecksumAlgorithm::Sha3_256.spelling(), "SHA3-256");
    }

    #[test]
    fn unknown_spelling_is_invalid_enum() {
        let err = ChecksumAlgorithm::from_spelling("SHA-1").unwrap_err();
        assert!(err.to_string().contains("checksum algorithm"));
        assert!(RelationshipType::from_spelling("KNOWS_ABOUT").is_err());
        assert!(FileType::from_rdf_term("fileType_unknown").is_err());
    }

    #[test]
    fn relationship_vocabulary_is_complete() {
        assert_eq!(RelationshipType::ALL.len(), 45);
        assert_eq!(
            RelationshipType::from_spelling("DEPENDS_ON").unwrap(),
            RelationshipType::DependsOn
        );
        assert_eq!(
            RelationshipType::DependsOn.rdf_term(),
            "relationshipType_dependsOn"
        );
    }

    #[test]
    fn purpose_spelling_uses_hyphen() {
        assert_eq!(PackagePurpose::OperatingSystem.spelling(), "OPERATING-SYSTEM");
        assert_eq!(
            PackagePurpose::from_spelling("OPERATING-SYSTEM").unwrap(),
            PackagePurpose::OperatingSystem
        );
    }

    #[test]
    fn reference_category_accepts_both_separators() {
        for raw in ["PACKAGE-MANAGER", "PACKAGE_MANAGER"] {
            assert_eq!(
                ExternalRefCategory::from_spelling(raw).unwrap(),
                ExternalRefCategory::PackageManager
            );
        }
    }

    #[test]
    fn checksum_hex_lengths() {
        assert_eq!(ChecksumAlgorithm::Sha1.hex_length(), Some(40));
        assert_eq!(ChecksumAlgorithm::Sha256.hex_length(), Some(64));
        assert_eq!(ChecksumAlgorithm::Adler32.hex_length(), Some(8));
        assert_eq!(ChecksumAlgorithm::Blake3.hex_length(), None);
    }
}
