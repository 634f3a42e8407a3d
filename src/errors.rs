//! Defines the custom error types for the library.
//!
//! This uses `thiserror` as specified in `Cargo.toml` for clean,
//! boilerplate-free error handling.
//!
//! Codec failures are accumulated: a decoder collects one [`ParseMessage`]
//! per problem and raises a single [`SpdxError::Parse`] per document, so a
//! damaged file reports everything wrong with it in one pass.

use crate::validation::ValidationMessage;
use std::fmt;
use thiserror::Error;

/// A single decoder complaint, locating the problem inside the input.
///
/// `location` names the tag and line for tag/value input, the JSON path for
/// the dict encodings, or the subject IRI for RDF input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMessage {
    pub location: String,
    pub detail: String,
}

impl ParseMessage {
    pub fn new(location: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ParseMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.detail)
    }
}

#[derive(Error, Debug)]
pub enum SpdxError {
    #[error("I/O Error: {1} - {0}")]
    Io(#[source] std::io::Error, String),

    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),

    #[error("Parse Error: {}", format_messages(.0))]
    Parse(Vec<ParseMessage>),

    #[error("Invalid Enum: `{raw}` is not a recognized value for {field}")]
    InvalidEnum { field: String, raw: String },

    #[error("Invalid Reference: `{spdx_id}` (referenced by {referrer}) does not resolve")]
    InvalidReference { spdx_id: String, referrer: String },

    #[error("Duplicate Id: `{spdx_id}` declared at {}", .locations.join(", "))]
    DuplicateId {
        spdx_id: String,
        locations: Vec<String>,
    },

    #[error("Invalid {type_name}: {}", .messages.join("; "))]
    Constructor {
        type_name: &'static str,
        messages: Vec<String>,
    },

    #[error("Validation Error: document has {} problem(s)", .0.len())]
    Validation(Vec<ValidationMessage>),

    #[error("Serialization Error: {0}")]
    Serialization(String),
}

fn format_messages(messages: &[ParseMessage]) -> String {
    match messages.len() {
        0 => "unparseable input".to_string(),
        1 => messages[0].to_string(),
        n => format!(
            "{} problems, first: {}",
            n,
            messages.first().map(ToString::to_string).unwrap_or_default()
        ),
    }
}

impl SpdxError {
    /// Shorthand for a parse failure with a single message.
    pub fn parse(location: impl Into<String>, detail: impl Into<String>) -> Self {
        SpdxError::Parse(vec![ParseMessage::new(location, detail)])
    }

    pub fn invalid_enum(field: impl Into<String>, raw: impl Into<String>) -> Self {
        SpdxError::InvalidEnum {
            field: field.into(),
            raw: raw.into(),
        }
    }

    /// Re-anchor this error at `location`, for decoders that accumulate the
    /// failures of value-level parsers into their own message list.
    pub(crate) fn into_messages(self, location: &str) -> Vec<ParseMessage> {
        match self {
            SpdxError::Parse(inner) => inner
                .into_iter()
                .map(|message| ParseMessage::new(location, message.detail))
                .collect(),
            SpdxError::InvalidEnum { field, raw } => vec![ParseMessage::new(
                location,
                format!("`{raw}` is not a recognized value for {field}"),
            )],
            other => vec![ParseMessage::new(location, other.to_string())],
        }
    }
}

// Implement From<io::Error> for easier error handling
impl From<std::io::Error> for SpdxError {
    fn from(err: std::io::Error) -> Self {
        SpdxError::Io(err, "IO operation failed".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_lists_count_and_first_message() {
        let err = SpdxError::Parse(vec![
            ParseMessage::new("line 3, tag Created", "bad timestamp"),
            ParseMessage::new("line 9, tag Creator", "bad actor"),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("2 problems"));
        assert!(rendered.contains("line 3, tag Created: bad timestamp"));
    }

    #[test]
    fn invalid_enum_names_field_and_value() {
        let err = SpdxError::invalid_enum("checksum algorithm", "SHA-1");
        assert_eq!(
            err.to_string(),
            "Invalid Enum: `SHA-1` is not a recognized value for checksum algorithm"
        );
    }

    #[test]
    fn duplicate_id_lists_locations() {
        let err = SpdxError::DuplicateId {
            spdx_id: "SPDXRef-P".to_string(),
            locations: vec!["packages[0]".to_string(), "files[2]".to_string()],
        };
        assert!(err.to_string().contains("packages[0], files[2]"));
    }
}
