//! License expression handling.
//!
//! Expressions are parsed with the `spdx` crate at decode time, so an invalid
//! expression fails the read rather than surfacing later. The original text
//! is kept verbatim for re-encoding; equality and hashing go by that text.

use crate::errors::SpdxError;
use crate::models_v2::values::SpdxValue;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A validated SPDX license expression.
#[derive(Debug, Clone)]
pub struct LicenseExpression {
    raw: String,
    parsed: spdx::Expression,
}

impl LicenseExpression {
    /// Parse an expression such as `MIT OR Apache-2.0`. The error names the
    /// offending text.
    pub fn parse(raw: &str) -> Result<Self, SpdxError> {
        let parsed = spdx::Expression::parse(raw).map_err(|err| {
            SpdxError::parse("license expression", format!("`{raw}`: {err}"))
        })?;
        Ok(LicenseExpression {
            raw: raw.to_string(),
            parsed,
        })
    }

    /// The expression exactly as it was written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All `LicenseRef-` identifiers the expression mentions, each with its
    /// `DocumentRef-` qualifier when one is present.
    pub fn license_refs(&self) -> Vec<LicenseRefId> {
        self.parsed
            .requirements()
            .filter_map(|req| match &req.req.license {
                spdx::LicenseItem::Other { doc_ref, lic_ref } => Some(LicenseRefId {
                    document_ref: doc_ref.as_ref().map(|d| format!("DocumentRef-{d}")),
                    license_ref: format!("LicenseRef-{lic_ref}"),
                }),
                spdx::LicenseItem::Spdx { .. } => None,
            })
            .collect()
    }
}

impl PartialEq for LicenseExpression {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for LicenseExpression {}

impl Hash for LicenseExpression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for LicenseExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A `LicenseRef-` mention inside an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseRefId {
    /// Full `DocumentRef-` qualifier, if the mention is cross-document.
    pub document_ref: Option<String>,
    /// Full `LicenseRef-` identifier.
    pub license_ref: String,
}

/// Decode a license-valued field: the markers first, anything else through
/// the expression parser.
pub fn parse_license_field(raw: &str) -> Result<SpdxValue<LicenseExpression>, SpdxError> {
    SpdxValue::parse_with(raw, LicenseExpression::parse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_expression_keeps_original_text() {
        let expression = LicenseExpression::parse("MIT OR Apache-2.0").unwrap();
        assert_eq!(expression.as_str(), "MIT OR Apache-2.0");
        assert_eq!(expression.to_string(), "MIT OR Apache-2.0");
        assert!(expression.license_refs().is_empty());
    }

    #[test]
    fn invalid_expression_names_the_text() {
        let err = LicenseExpression::parse("MIT AND").unwrap_err();
        assert!(err.to_string().contains("MIT AND"), "got: {err}");
    }

    #[test]
    fn license_refs_are_reported_with_prefixes() {
        let expression =
            LicenseExpression::parse("LicenseRef-Proprietary AND MIT").unwrap();
        let refs = expression.license_refs();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].license_ref, "LicenseRef-Proprietary");
        assert_eq!(refs[0].document_ref, None);
    }

    #[test]
    fn document_qualified_refs_keep_the_qualifier() {
        let expression =
            LicenseExpression::parse("DocumentRef-external:LicenseRef-thing").unwrap();
        let refs = expression.license_refs();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].license_ref, "LicenseRef-thing");
        assert_eq!(refs[0].document_ref.as_deref(), Some("DocumentRef-external"));
    }

    #[test]
    fn license_field_markers_bypass_the_parser() {
        assert_eq!(
            parse_license_field("NOASSERTION").unwrap(),
            SpdxValue::NoAssertion
        );
        assert_eq!(parse_license_field("NONE").unwrap(), SpdxValue::None);
        assert!(parse_license_field("not a license (").is_err());
    }

    #[test]
    fn equality_goes_by_text() {
        let a = LicenseExpression::parse("MIT OR Apache-2.0").unwrap();
        let b = LicenseExpression::parse("Apache-2.0 OR MIT").unwrap();
        assert_ne!(a, b);
        assert_eq!(a, LicenseExpression::parse("MIT OR Apache-2.0").unwrap());
    }
}
