//! The payload: every 3.x element of a processed document, indexed by SPDXID.

use super::Element;
use crate::errors::SpdxError;
use std::collections::HashMap;

/// An insertion-ordered map from SPDXID (IRI) to Element.
///
/// In strict mode, adding a different element under an already-used ID is a
/// [`SpdxError::DuplicateId`]; re-adding an equal element is a no-op. In
/// permissive mode the newer element replaces the older one in place.
#[derive(Debug, Clone, Default)]
pub struct Payload {
    elements: Vec<Element>,
    index: HashMap<String, usize>,
    strict: bool,
}

impl Payload {
    pub fn new() -> Self {
        Payload {
            elements: Vec::new(),
            index: HashMap::new(),
            strict: true,
        }
    }

    pub fn permissive() -> Self {
        Payload {
            strict: false,
            ..Payload::new()
        }
    }

    pub fn add(&mut self, element: Element) -> Result<(), SpdxError> {
        let spdx_id = element.spdx_id().to_string();
        match self.index.get(&spdx_id) {
            Some(&slot) => {
                if self.strict && self.elements[slot] != element {
                    return Err(SpdxError::DuplicateId {
                        spdx_id,
                        locations: vec![format!("elements[{slot}]"), format!("elements[{}]", self.elements.len())],
                    });
                }
                self.elements[slot] = element;
            }
            None => {
                self.index.insert(spdx_id, self.elements.len());
                self.elements.push(element);
            }
        }
        Ok(())
    }

    pub fn get(&self, spdx_id: &str) -> Result<&Element, SpdxError> {
        self.index
            .get(spdx_id)
            .map(|&slot| &self.elements[slot])
            .ok_or_else(|| SpdxError::InvalidReference {
                spdx_id: spdx_id.to_string(),
                referrer: "payload".to_string(),
            })
    }

    pub fn contains(&self, spdx_id: &str) -> bool {
        self.index.contains_key(spdx_id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models_v3::{CreationInfo, ElementInfo, Tool};
    use crate::models_v2::values::parse_timestamp;

    fn tool(spdx_id: &str, name: &str) -> Element {
        let creation_info = CreationInfo::new(parse_timestamp("2023-01-02T03:04:05Z").unwrap());
        let mut info = ElementInfo::new(spdx_id, creation_info);
        info.name = Some(name.to_string());
        Element::Tool(Tool { info })
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut payload = Payload::new();
        payload.add(tool("https://ex#SPDXRef-B", "b")).unwrap();
        payload.add(tool("https://ex#SPDXRef-A", "a")).unwrap();
        let ids: Vec<&str> = payload.iter().map(Element::spdx_id).collect();
        assert_eq!(ids, vec!["https://ex#SPDXRef-B", "https://ex#SPDXRef-A"]);
    }

    #[test]
    fn strict_mode_rejects_conflicting_reinsertion() {
        let mut payload = Payload::new();
        payload.add(tool("https://ex#SPDXRef-T", "one")).unwrap();
        // Equal element: fine.
        payload.add(tool("https://ex#SPDXRef-T", "one")).unwrap();
        let err = payload
            .add(tool("https://ex#SPDXRef-T", "two"))
            .unwrap_err();
        assert!(matches!(err, SpdxError::DuplicateId { .. }));
        assert_eq!(payload.len(), 1);
    }

    #[test]
    fn permissive_mode_replaces_in_place() {
        let mut payload = Payload::permissive();
        payload.add(tool("https://ex#SPDXRef-T", "one")).unwrap();
        payload.add(tool("https://ex#SPDXRef-T", "two")).unwrap();
        assert_eq!(payload.len(), 1);
        let element = payload.get("https://ex#SPDXRef-T").unwrap();
        assert_eq!(element.info().name.as_deref(), Some("two"));
    }

    #[test]
    fn get_missing_is_an_invalid_reference() {
        let payload = Payload::new();
        let err = payload.get("https://ex#SPDXRef-Absent").unwrap_err();
        assert!(matches!(err, SpdxError::InvalidReference { .. }));
        assert!(err.to_string().contains("SPDXRef-Absent"));
    }
}
