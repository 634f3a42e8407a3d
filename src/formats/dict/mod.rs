//! The dict codec: SPDX 2.x documents to and from a generic ordered tree.
//!
//! The tree is a `serde_json::Value` (with `preserve_order`, so maps keep
//! insertion order) and is the shared pivot for the JSON, YAML, and XML
//! encodings. Field names are camelCase; enum values use their dict
//! spellings; license fields and markers are plain strings.

pub mod reader;
pub mod writer;

pub use reader::document_from_dict;
pub use writer::document_to_dict;

/// Keys whose values are arrays in the dict tree.
///
/// XML cannot tell a single-element array from a scalar, so its reader
/// re-materializes these as arrays after parsing.
pub(crate) const ARRAY_KEYS: &[&str] = &[
    "annotations",
    "attributionTexts",
    "checksums",
    "creators",
    "documentDescribes",
    "externalDocumentRefs",
    "externalRefs",
    "fileContributors",
    "fileTypes",
    "files",
    "hasExtractedLicensingInfos",
    "hasFiles",
    "licenseInfoFromFiles",
    "licenseInfoInFiles",
    "licenseInfoInSnippets",
    "packageVerificationCodeExcludedFiles",
    "packages",
    "ranges",
    "relationships",
    "seeAlsos",
    "snippets",
];
