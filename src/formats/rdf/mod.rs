//! RDF/XML support.
//!
//! Documents are mapped onto the SPDX RDF vocabulary: typed resource nodes
//! for the document and its elements, reified `spdx:Relationship` nodes
//! nested under their source, and W3C pointer ranges for snippets. Element
//! identifiers become IRIs under the document namespace; references into
//! other documents use the namespace declared by the matching
//! `ExternalDocumentRef`.

mod reader;
mod writer;

pub use reader::parse;
pub use writer::write;

use crate::errors::SpdxError;
use crate::models_v2::Document;

pub(crate) const SPDX_TERMS: &str = "http://spdx.org/rdf/terms#";
pub(crate) const RDF_SYNTAX: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub(crate) const RDF_SCHEMA: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub(crate) const POINTERS: &str = "http://www.w3.org/2009/pointers#";
pub(crate) const DOAP: &str = "http://usefulinc.com/ns/doap#";
pub(crate) const LICENSE_LIST: &str = "http://spdx.org/licenses/";
pub(crate) const REFERENCE_TYPES: &str = "http://spdx.org/rdf/references/";

/// Render an element reference as an IRI. Local identifiers live under the
/// document namespace; `DocumentRef-x:SPDXRef-y` references live under the
/// namespace of the declared external document.
pub(crate) fn element_iri(document: &Document, reference: &str) -> Result<String, SpdxError> {
    if let Some((prefix, local)) = reference.split_once(':') {
        let external = document
            .external_document_refs
            .iter()
            .find(|external| external.document_ref_id == prefix)
            .ok_or_else(|| {
                SpdxError::parse("rdf", format!("unknown document reference `{prefix}`"))
            })?;
        return Ok(format!("{}#{}", external.document_uri, local));
    }
    Ok(format!("{}#{}", document.document_namespace, reference))
}
