//! Small value types shared by the SPDX 2.x entities.
//!
//! The `SpdxValue` and `OrNoAssertion` sums keep the NOASSERTION and NONE
//! markers out of the string space: a field holding the literal string
//! `"NOASSERTION"` would otherwise be indistinguishable from the marker.
//! Marker recognition ignores case on decode; writing always produces the
//! uppercase form.

use crate::errors::SpdxError;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The exact marker string for "no assertion is made".
pub const NOASSERTION: &str = "NOASSERTION";
/// The exact marker string for "known to be empty".
pub const NONE: &str = "NONE";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

fn is_noassertion(raw: &str) -> bool {
    raw.eq_ignore_ascii_case(NOASSERTION)
}

fn is_none(raw: &str) -> bool {
    raw.eq_ignore_ascii_case(NONE)
}

/// A field value that may also be NOASSERTION or NONE.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpdxValue<T> {
    Value(T),
    NoAssertion,
    None,
}

impl<T> SpdxValue<T> {
    /// Decode a raw string, recognizing the markers before handing anything
    /// else to `parse`.
    pub fn parse_with<E>(
        raw: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Self, E> {
        if is_noassertion(raw) {
            Ok(SpdxValue::NoAssertion)
        } else if is_none(raw) {
            Ok(SpdxValue::None)
        } else {
            parse(raw).map(SpdxValue::Value)
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            SpdxValue::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl SpdxValue<String> {
    /// Decode a plain string field. Never fails: unrecognized input is data.
    pub fn from_plain(raw: &str) -> Self {
        if is_noassertion(raw) {
            SpdxValue::NoAssertion
        } else if is_none(raw) {
            SpdxValue::None
        } else {
            SpdxValue::Value(raw.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for SpdxValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpdxValue::Value(value) => value.fmt(f),
            SpdxValue::NoAssertion => f.write_str(NOASSERTION),
            SpdxValue::None => f.write_str(NONE),
        }
    }
}

/// A field value that may also be NOASSERTION, but never NONE.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrNoAssertion<T> {
    Value(T),
    NoAssertion,
}

impl<T> OrNoAssertion<T> {
    pub fn parse_with<E>(
        raw: &str,
        parse: impl FnOnce(&str) -> Result<T, E>,
    ) -> Result<Self, E> {
        if is_noassertion(raw) {
            Ok(OrNoAssertion::NoAssertion)
        } else {
            parse(raw).map(OrNoAssertion::Value)
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            OrNoAssertion::Value(value) => Some(value),
            OrNoAssertion::NoAssertion => None,
        }
    }
}

impl OrNoAssertion<String> {
    /// Decode a plain string field. Never fails: unrecognized input is data.
    pub fn from_plain(raw: &str) -> Self {
        if is_noassertion(raw) {
            OrNoAssertion::NoAssertion
        } else {
            OrNoAssertion::Value(raw.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for OrNoAssertion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrNoAssertion::Value(value) => value.fmt(f),
            OrNoAssertion::NoAssertion => f.write_str(NOASSERTION),
        }
    }
}

/// Who performed an action: a person, an organization, or a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorType {
    Person,
    Organization,
    Tool,
}

impl ActorType {
    fn prefix(self) -> &'static str {
        match self {
            ActorType::Person => "Person",
            ActorType::Organization => "Organization",
            ActorType::Tool => "Tool",
        }
    }
}

/// An actor in `Person: name (email)` notation.
///
/// Parsing splits a trailing `(email)` off for tools as well, so that the
/// validator can flag it; the SPDX specification forbids tool emails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Actor {
    pub actor_type: ActorType,
    pub name: String,
    pub email: Option<String>,
}

impl Actor {
    pub fn new(actor_type: ActorType, name: impl Into<String>, email: Option<String>) -> Self {
        Actor {
            actor_type,
            name: name.into(),
            email,
        }
    }

    pub fn person(name: impl Into<String>, email: Option<String>) -> Self {
        Actor::new(ActorType::Person, name, email)
    }

    pub fn organization(name: impl Into<String>, email: Option<String>) -> Self {
        Actor::new(ActorType::Organization, name, email)
    }

    pub fn tool(name: impl Into<String>) -> Self {
        Actor::new(ActorType::Tool, name, None)
    }

    /// Parse `Person: name (email)`, `Organization: name (email)`, or
    /// `Tool: name`. Empty parentheses mean no email.
    pub fn parse(raw: &str) -> Result<Self, SpdxError> {
        let (actor_type, rest) = if let Some(rest) = raw.strip_prefix("Person:") {
            (ActorType::Person, rest)
        } else if let Some(rest) = raw.strip_prefix("Organization:") {
            (ActorType::Organization, rest)
        } else if let Some(rest) = raw.strip_prefix("Tool:") {
            (ActorType::Tool, rest)
        } else {
            return Err(SpdxError::parse(
                "actor",
                format!("`{raw}` does not start with Person:, Organization:, or Tool:"),
            ));
        };
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(SpdxError::parse(
                "actor",
                format!("`{raw}` has no name"),
            ));
        }
        let (name, email) = match rest.strip_suffix(')').and_then(|s| s.rsplit_once('(')) {
            Some((name, email)) => {
                let email = email.trim();
                let email = (!email.is_empty()).then(|| email.to_string());
                (name.trim_end(), email)
            }
            None => (rest, None),
        };
        if name.is_empty() {
            return Err(SpdxError::parse(
                "actor",
                format!("`{raw}` has no name"),
            ));
        }
        Ok(Actor::new(actor_type, name, email))
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.email {
            Some(email) => write!(f, "{}: {} ({})", self.actor_type.prefix(), self.name, email),
            None => write!(f, "{}: {}", self.actor_type.prefix(), self.name),
        }
    }
}

/// A `<major>.<minor>` version literal, as used by the license list version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Version { major, minor }
    }
}

impl FromStr for Version {
    type Err = SpdxError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            SpdxError::parse("version", format!("`{raw}` is not of the form <major>.<minor>"))
        };
        let (major, minor) = raw.split_once('.').ok_or_else(invalid)?;
        if major.is_empty() || minor.is_empty() || minor.contains('.') {
            return Err(invalid());
        }
        Ok(Version {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Parse a `YYYY-MM-DDThh:mm:ssZ` timestamp. No other shape is accepted.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, SpdxError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            SpdxError::parse(
                "timestamp",
                format!("`{raw}` is not of the form YYYY-MM-DDThh:mm:ssZ"),
            )
        })
}

/// Render a timestamp in the one accepted shape, always UTC.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_decode_case_insensitively() {
        assert_eq!(SpdxValue::from_plain("NOASSERTION"), SpdxValue::NoAssertion);
        assert_eq!(SpdxValue::from_plain("noassertion"), SpdxValue::NoAssertion);
        assert_eq!(SpdxValue::from_plain("NONE"), SpdxValue::None);
        assert_eq!(SpdxValue::from_plain("None"), SpdxValue::None);
        assert_eq!(
            SpdxValue::from_plain("NOASSERTION "),
            SpdxValue::Value("NOASSERTION ".to_string())
        );
    }

    #[test]
    fn or_noassertion_keeps_none_as_data() {
        let parsed: Result<OrNoAssertion<String>, SpdxError> =
            OrNoAssertion::parse_with("NONE", |s| Ok::<_, SpdxError>(s.to_string()));
        assert_eq!(parsed.unwrap(), OrNoAssertion::Value("NONE".to_string()));
    }

    #[test]
    fn person_with_email_round_trips() {
        let actor = Actor::parse("Person: Jane Doe (jane.doe@example.com)").unwrap();
        assert_eq!(actor.actor_type, ActorType::Person);
        assert_eq!(actor.name, "Jane Doe");
        assert_eq!(actor.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(actor.to_string(), "Person: Jane Doe (jane.doe@example.com)");
    }

    #[test]
    fn empty_parentheses_mean_no_email() {
        let actor = Actor::parse("Organization: ExampleCodeInspect ()").unwrap();
        assert_eq!(actor.actor_type, ActorType::Organization);
        assert_eq!(actor.name, "ExampleCodeInspect");
        assert_eq!(actor.email, None);
        assert_eq!(actor.to_string(), "Organization: ExampleCodeInspect");
    }

    #[test]
    fn tool_without_email() {
        let actor = Actor::parse("Tool: LicenseFind-1.0").unwrap();
        assert_eq!(actor.actor_type, ActorType::Tool);
        assert_eq!(actor.name, "LicenseFind-1.0");
        assert_eq!(actor.email, None);
    }

    #[test]
    fn tool_with_email_still_decodes() {
        // Forbidden by the SPDX specification, but that is the validator's
        // call, not the parser's.
        let actor = Actor::parse("Tool: t (t@e)").unwrap();
        assert_eq!(actor.actor_type, ActorType::Tool);
        assert_eq!(actor.name, "t");
        assert_eq!(actor.email.as_deref(), Some("t@e"));
    }

    #[test]
    fn unknown_prefix_is_a_parse_error() {
        let err = Actor::parse("Committee: The Board").unwrap_err();
        assert!(err.to_string().contains("Committee: The Board"));
        assert!(Actor::parse("Person:").is_err());
    }

    #[test]
    fn version_literal_round_trips() {
        let version: Version = "3.17".parse().unwrap();
        assert_eq!(version, Version::new(3, 17));
        assert_eq!(version.to_string(), "3.17");
        assert!("3".parse::<Version>().is_err());
        assert!("3.17.1".parse::<Version>().is_err());
        assert!("a.b".parse::<Version>().is_err());
    }

    #[test]
    fn timestamp_shape_is_strict() {
        let parsed = parse_timestamp("2010-01-29T18:30:22Z").unwrap();
        assert_eq!(format_timestamp(&parsed), "2010-01-29T18:30:22Z");
        assert!(parse_timestamp("2010-01-29 18:30:22").is_err());
        assert!(parse_timestamp("2010-01-29T18:30:22+00:00").is_err());
        assert!(parse_timestamp("2010-01-29T18:30:22.000Z").is_err());
    }
}
