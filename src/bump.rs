//! The 2.x to 3.x version bump.
//!
//! A flat 2.x document becomes a graph of globally-identified elements. The
//! document itself turns into an `SpdxDocument` collection, creators and
//! suppliers become `Agent`/`Tool` elements under generated ids, and the
//! relationship table turns into `Relationship` elements. Every local SPDXID
//! is qualified with the document namespace to form an IRI. Fields the 3.x
//! model has no home for are elided, and each elision is reported through
//! the caller's [`MessageSink`].

use crate::errors::SpdxError;
use crate::models_v2::enums::RelationshipType;
use crate::models_v2::values::{Actor, ActorType, OrNoAssertion, SpdxValue};
use crate::models_v2::{self, Document};
use crate::models_v3::payload::Payload;
use crate::models_v3::{
    Agent, AgentType, Annotation, Bundle, CreationInfo, Element, ElementInfo, ExternalIdentifier,
    ExternalIdentifierType, ExternalMap, ExternalReference, File, Hash, HashAlgorithm,
    IntegrityMethod, Package, Relationship, RelationshipCompleteness, Snippet, Tool,
};
use crate::notes::{MessageSink, Note, NoteList};

const LICENSE_PROFILE: &str = "missing definitions for license profile";
const NO_EQUIVALENT: &str = "no equivalent field in the 3.x model";

/// Bump `document` to a 3.x payload, logging every elided field through
/// [`log::warn`].
pub fn bump_document(document: &Document) -> Result<Payload, SpdxError> {
    let mut notes = NoteList::new();
    let payload = bump_document_with_sink(document, &mut notes)?;
    for note in notes.iter() {
        log::warn!("{note}");
    }
    Ok(payload)
}

/// Bump `document` to a 3.x payload, reporting elided fields to `sink`.
///
/// The payload starts with the `SpdxDocument` element; its `root_elements`
/// are the targets the 2.x document describes, and its `elements` list every
/// other element. Fails only on references to undeclared `DocumentRef-`
/// prefixes and on SPDXIDs that collide after qualification.
pub fn bump_document_with_sink(
    document: &Document,
    sink: &mut dyn MessageSink,
) -> Result<Payload, SpdxError> {
    Bumper::new(document, sink).run()
}

struct Bumper<'a> {
    document: &'a Document,
    sink: &'a mut dyn MessageSink,
    /// Shared 3.x creation info, cloned into every element.
    creation_info: CreationInfo,
    /// Actors already synthesized, with their generated IRIs.
    actors: Vec<(Actor, String)>,
    elements: Vec<Element>,
    next_actor: usize,
    next_relationship: usize,
    next_annotation: usize,
}

impl<'a> Bumper<'a> {
    fn new(document: &'a Document, sink: &'a mut dyn MessageSink) -> Self {
        Bumper {
            document,
            sink,
            creation_info: CreationInfo::new(document.creation_info.created),
            actors: Vec::new(),
            elements: Vec::new(),
            next_actor: 0,
            next_relationship: 0,
            next_annotation: 0,
        }
    }

    fn run(mut self) -> Result<Payload, SpdxError> {
        let document = self.document;
        self.bump_creators();
        for package in &document.packages {
            self.bump_package(package)?;
        }
        for file in &document.files {
            self.bump_file(file);
        }
        for snippet in &document.snippets {
            self.bump_snippet(snippet)?;
        }
        for relationship in &document.relationships {
            self.bump_relationship(relationship)?;
        }
        for annotation in &document.annotations {
            self.bump_annotation(annotation)?;
        }
        for info in &document.extracted_licensing_info {
            self.sink.note(Note::missing_conversion(
                format!("extracted_licensing_info.{}", info.license_id),
                LICENSE_PROFILE,
            ));
        }
        let root = self.document_element()?;
        let mut payload = Payload::new();
        payload.add(root)?;
        for element in std::mem::take(&mut self.elements) {
            payload.add(element)?;
        }
        Ok(payload)
    }

    fn iri(&self, local: &str) -> String {
        format!("{}#{}", self.document.document_namespace, local)
    }

    /// Resolve a 2.x reference to an IRI. A `DocumentRef-x:SPDXRef-y` form
    /// resolves against the declared external document's URI; anything else
    /// is local and qualifies with the document namespace.
    fn element_iri(&self, reference: &str, referrer: &str) -> Result<String, SpdxError> {
        if let Some((prefix, local)) = reference.split_once(':') {
            let external = self
                .document
                .external_document_refs
                .iter()
                .find(|declared| declared.document_ref_id == prefix)
                .ok_or_else(|| SpdxError::InvalidReference {
                    spdx_id: reference.to_string(),
                    referrer: referrer.to_string(),
                })?;
            return Ok(format!("{}#{}", external.document_uri, local));
        }
        Ok(self.iri(reference))
    }

    /// The IRI for `actor`, assigning the next generated id when the actor
    /// has not been seen before. Does not synthesize the element.
    fn reserve_actor(&mut self, actor: &Actor) -> (String, bool) {
        if let Some((_, iri)) = self.actors.iter().find(|(known, _)| known == actor) {
            return (iri.clone(), false);
        }
        let iri = self.iri(&format!("SPDXRef-Actor-{}", self.next_actor));
        self.next_actor += 1;
        self.actors.push((actor.clone(), iri.clone()));
        (iri, true)
    }

    /// The IRI for `actor`, synthesizing its Agent or Tool element on first
    /// sight.
    fn agent_iri(&mut self, actor: &Actor) -> String {
        let (iri, fresh) = self.reserve_actor(actor);
        if fresh {
            let element = self.agent_element(actor, &iri);
            self.elements.push(element);
        }
        iri
    }

    fn agent_element(&self, actor: &Actor, iri: &str) -> Element {
        let mut info = ElementInfo::new(iri, self.creation_info.clone());
        info.name = Some(actor.name.clone());
        if let Some(email) = &actor.email {
            info.external_identifiers
                .push(ExternalIdentifier::new(ExternalIdentifierType::Email, email));
        }
        match actor.actor_type {
            ActorType::Person => Element::Agent(Agent {
                info,
                agent_type: AgentType::Person,
            }),
            ActorType::Organization => Element::Agent(Agent {
                info,
                agent_type: AgentType::Organization,
            }),
            ActorType::Tool => Element::Tool(Tool { info }),
        }
    }

    /// Split the 2.x creators into `created_by` agents and `created_using`
    /// tools, then synthesize their elements. The shared creation info lists
    /// the creator IRIs, so the creator elements name themselves.
    fn bump_creators(&mut self) {
        let document = self.document;
        let creation = &document.creation_info;
        let mut created_by = Vec::new();
        let mut created_using = Vec::new();
        for creator in &creation.creators {
            let (iri, _) = self.reserve_actor(creator);
            let slot = match creator.actor_type {
                ActorType::Tool => &mut created_using,
                _ => &mut created_by,
            };
            if !slot.contains(&iri) {
                slot.push(iri);
            }
        }
        self.creation_info.created_by = created_by;
        self.creation_info.created_using = created_using;
        self.creation_info.comment = creation.creator_comment.clone();
        if creation.license_list_version.is_some() {
            self.sink.note(Note::missing_conversion(
                "creation_info.license_list_version",
                LICENSE_PROFILE,
            ));
        }
        let reserved = self.actors.clone();
        for (actor, iri) in &reserved {
            let element = self.agent_element(actor, iri);
            self.elements.push(element);
        }
    }

    fn bump_package(&mut self, package: &models_v2::Package) -> Result<(), SpdxError> {
        let mut info = ElementInfo::new(self.iri(&package.spdx_id), self.creation_info.clone());
        info.name = Some(package.name.clone());
        info.summary = package.summary.clone();
        info.description = package.description.clone();
        info.comment = package.comment.clone();
        info.verified_using = hashes(&package.checksums);
        let mut bumped = Package::new(info);
        bumped.package_version = package.version.clone();
        bumped.download_location = Some(package.download_location.clone());
        bumped.homepage = package.homepage.clone();
        bumped.source_info = package.source_info.clone();
        bumped.copyright_text = package.copyright_text.clone();
        bumped.attribution_text = join_attributions(&package.attribution_texts);
        bumped.primary_purpose = package.primary_package_purpose;
        bumped.artifact.built_time = package.built_date;
        bumped.artifact.release_time = package.release_date;
        bumped.artifact.valid_until_time = package.valid_until_date;
        match &package.supplier {
            Some(OrNoAssertion::Value(actor)) => {
                bumped.artifact.supplied_by = Some(self.agent_iri(actor));
            }
            Some(OrNoAssertion::NoAssertion) => {
                self.elide(&package.spdx_id, "supplier", "the 3.x field cannot carry a marker");
            }
            None => {}
        }
        match &package.originator {
            Some(OrNoAssertion::Value(actor)) => {
                let iri = self.agent_iri(actor);
                bumped.artifact.originated_by.push(iri);
            }
            Some(OrNoAssertion::NoAssertion) => {
                self.elide(&package.spdx_id, "originator", "the 3.x field cannot carry a marker");
            }
            None => {}
        }
        for reference in &package.external_refs {
            let identifier_type = match reference.reference_type.as_str() {
                "purl" => Some(ExternalIdentifierType::PackageUrl),
                "cpe22Type" => Some(ExternalIdentifierType::Cpe22),
                "cpe23Type" => Some(ExternalIdentifierType::Cpe23),
                _ => None,
            };
            match identifier_type {
                Some(identifier_type) => {
                    let mut identifier =
                        ExternalIdentifier::new(identifier_type, reference.locator.clone());
                    identifier.comment = reference.comment.clone();
                    bumped.info.external_identifiers.push(identifier);
                }
                None => bumped.info.external_references.push(ExternalReference {
                    reference_type: reference.reference_type.clone(),
                    locator: reference.locator.clone(),
                    comment: reference.comment.clone(),
                }),
            }
        }
        if package.file_name.is_some() {
            self.elide(&package.spdx_id, "file_name", NO_EQUIVALENT);
        }
        if !package.files_analyzed {
            self.elide(&package.spdx_id, "files_analyzed", NO_EQUIVALENT);
        }
        if package.verification_code.is_some() {
            self.elide(&package.spdx_id, "verification_code", NO_EQUIVALENT);
        }
        if package.license_concluded.is_some() {
            self.elide(&package.spdx_id, "license_concluded", LICENSE_PROFILE);
        }
        if !package.license_info_from_files.is_empty() {
            self.elide(&package.spdx_id, "license_info_from_files", LICENSE_PROFILE);
        }
        if package.license_declared.is_some() {
            self.elide(&package.spdx_id, "license_declared", LICENSE_PROFILE);
        }
        if package.license_comment.is_some() {
            self.elide(&package.spdx_id, "license_comment", LICENSE_PROFILE);
        }
        self.elements.push(Element::Package(bumped));
        Ok(())
    }

    fn bump_file(&mut self, file: &models_v2::File) {
        let mut info = ElementInfo::new(self.iri(&file.spdx_id), self.creation_info.clone());
        info.name = Some(file.name.clone());
        info.comment = file.comment.clone();
        info.verified_using = hashes(&file.checksums);
        let mut bumped = File::new(info);
        bumped.copyright_text = file.copyright_text.clone();
        bumped.attribution_text = join_attributions(&file.attribution_texts);
        if !file.file_types.is_empty() {
            self.elide(&file.spdx_id, "file_types", NO_EQUIVALENT);
        }
        if file.notice.is_some() {
            self.elide(&file.spdx_id, "notice", NO_EQUIVALENT);
        }
        if !file.contributors.is_empty() {
            self.elide(&file.spdx_id, "contributors", NO_EQUIVALENT);
        }
        if file.license_concluded.is_some() {
            self.elide(&file.spdx_id, "license_concluded", LICENSE_PROFILE);
        }
        if !file.license_info_in_file.is_empty() {
            self.elide(&file.spdx_id, "license_info_in_file", LICENSE_PROFILE);
        }
        if file.license_comment.is_some() {
            self.elide(&file.spdx_id, "license_comment", LICENSE_PROFILE);
        }
        self.elements.push(Element::File(bumped));
    }

    fn bump_snippet(&mut self, snippet: &models_v2::Snippet) -> Result<(), SpdxError> {
        let mut info = ElementInfo::new(self.iri(&snippet.spdx_id), self.creation_info.clone());
        info.name = snippet.name.clone();
        info.comment = snippet.comment.clone();
        let mut bumped = Snippet::new(info);
        bumped.snippet_from_file =
            Some(self.element_iri(&snippet.file_spdx_id, &snippet.spdx_id)?);
        bumped.byte_range = Some(snippet.byte_range);
        bumped.line_range = snippet.line_range;
        bumped.copyright_text = snippet.copyright_text.clone();
        bumped.attribution_text = join_attributions(&snippet.attribution_texts);
        if snippet.license_concluded.is_some() {
            self.elide(&snippet.spdx_id, "license_concluded", LICENSE_PROFILE);
        }
        if !snippet.license_info_in_snippet.is_empty() {
            self.elide(&snippet.spdx_id, "license_info_in_snippet", LICENSE_PROFILE);
        }
        if snippet.license_comment.is_some() {
            self.elide(&snippet.spdx_id, "license_comment", LICENSE_PROFILE);
        }
        self.elements.push(Element::Snippet(bumped));
        Ok(())
    }

    /// A 2.x relationship with a marker target becomes a 3.x relationship
    /// with an empty `to` list: NOASSERTION maps to completeness
    /// `NoAssertion`, NONE to `Complete` (there is provably nothing there).
    fn bump_relationship(
        &mut self,
        relationship: &models_v2::Relationship,
    ) -> Result<(), SpdxError> {
        let id = self.iri(&format!("SPDXRef-Relationship-{}", self.next_relationship));
        self.next_relationship += 1;
        let mut info = ElementInfo::new(id, self.creation_info.clone());
        info.comment = relationship.comment.clone();
        let from_element = self.element_iri(&relationship.spdx_element_id, "relationships")?;
        let (to, completeness) = match &relationship.related_spdx_element_id {
            SpdxValue::Value(target) => (
                vec![self.element_iri(target, &relationship.spdx_element_id)?],
                None,
            ),
            SpdxValue::NoAssertion => (Vec::new(), Some(RelationshipCompleteness::NoAssertion)),
            SpdxValue::None => (Vec::new(), Some(RelationshipCompleteness::Complete)),
        };
        self.elements.push(Element::Relationship(Relationship {
            info,
            from_element,
            to,
            relationship_type: relationship.relationship_type,
            completeness,
        }));
        Ok(())
    }

    /// The annotation element's creation info records the annotation event:
    /// `created` is the annotation date and the annotator is its only agent.
    fn bump_annotation(
        &mut self,
        annotation: &models_v2::Annotation,
    ) -> Result<(), SpdxError> {
        let annotator = self.agent_iri(&annotation.annotator);
        let id = self.iri(&format!("SPDXRef-Annotation-{}", self.next_annotation));
        self.next_annotation += 1;
        let mut creation_info = CreationInfo::new(annotation.annotation_date);
        match annotation.annotator.actor_type {
            ActorType::Tool => creation_info.created_using.push(annotator),
            _ => creation_info.created_by.push(annotator),
        }
        let info = ElementInfo::new(id, creation_info);
        let subject = self.element_iri(&annotation.spdx_id, "annotations")?;
        self.elements.push(Element::Annotation(Annotation {
            info,
            annotation_type: annotation.annotation_type,
            subject,
            statement: Some(annotation.annotation_comment.clone()),
            content_type: None,
        }));
        Ok(())
    }

    fn document_element(&self) -> Result<Element, SpdxError> {
        let document = self.document;
        let mut info = ElementInfo::new(self.iri(&document.spdx_id), self.creation_info.clone());
        info.name = Some(document.name.clone());
        info.comment = document.comment.clone();
        let mut bundle = Bundle::new(info);
        bundle.collection.elements = self
            .elements
            .iter()
            .map(|element| element.spdx_id().to_string())
            .collect();
        let mut roots = Vec::new();
        for relationship in &document.relationships {
            let target = match &relationship.related_spdx_element_id {
                SpdxValue::Value(target) => target,
                _ => continue,
            };
            let root = match relationship.relationship_type {
                RelationshipType::Describes
                    if relationship.spdx_element_id == document.spdx_id =>
                {
                    self.element_iri(target, &document.spdx_id)?
                }
                RelationshipType::DescribedBy if *target == document.spdx_id => {
                    self.element_iri(&relationship.spdx_element_id, &document.spdx_id)?
                }
                _ => continue,
            };
            if !roots.contains(&root) {
                roots.push(root);
            }
        }
        bundle.collection.root_elements = roots;
        for reference in &document.external_document_refs {
            bundle.collection.imports.push(ExternalMap {
                external_spdx_id: reference.document_ref_id.clone(),
                verified_using: vec![IntegrityMethod::Hash(hash_of(&reference.checksum))],
                location_hint: Some(reference.document_uri.clone()),
            });
        }
        Ok(Element::SpdxDocument(bundle))
    }

    fn elide(&mut self, spdx_id: &str, field: &str, reason: &str) {
        self.sink
            .note(Note::missing_conversion(format!("{spdx_id}.{field}"), reason));
    }
}

fn hash_of(checksum: &models_v2::Checksum) -> Hash {
    Hash::new(HashAlgorithm::from(checksum.algorithm), checksum.value.clone())
}

fn hashes(checksums: &[models_v2::Checksum]) -> Vec<IntegrityMethod> {
    checksums
        .iter()
        .map(|checksum| IntegrityMethod::Hash(hash_of(checksum)))
        .collect()
}

fn join_attributions(texts: &[String]) -> Option<String> {
    if texts.is_empty() {
        None
    } else {
        Some(texts.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models_v2::enums::{AnnotationType, ChecksumAlgorithm};
    use crate::models_v2::values::parse_timestamp;
    use crate::models_v2::{Checksum, CreationInfo as CreationInfo2, ExternalDocumentRef};

    const NS: &str = "https://example.com/demo";

    fn sha1() -> Checksum {
        Checksum::new(ChecksumAlgorithm::Sha1, "d6a770ba38583ed4bb4525bd96e50461655d2758")
    }

    fn demo_document() -> Document {
        let creation_info = CreationInfo2::new(
            vec![Actor::tool("demo-tool")],
            parse_timestamp("2023-01-02T03:04:05Z").unwrap(),
        );
        let mut document = Document::new("demo", NS, creation_info);
        let mut package = models_v2::Package::new("SPDXRef-P", "pkg", SpdxValue::NoAssertion);
        package.checksums.push(sha1());
        document.packages.push(package);
        document.relationships.push(models_v2::Relationship::new(
            "SPDXRef-DOCUMENT",
            RelationshipType::Describes,
            SpdxValue::Value("SPDXRef-P".to_string()),
        ));
        document
    }

    fn find_document(payload: &Payload) -> &Bundle {
        payload
            .iter()
            .find_map(|element| match element {
                Element::SpdxDocument(bundle) => Some(bundle),
                _ => None,
            })
            .expect("payload has an SpdxDocument")
    }

    #[test]
    fn describes_targets_become_document_roots() {
        let payload = bump_document(&demo_document()).unwrap();
        let bundle = find_document(&payload);
        assert_eq!(bundle.collection.root_elements, vec![format!("{NS}#SPDXRef-P")]);
        assert!(bundle
            .collection
            .elements
            .contains(&format!("{NS}#SPDXRef-Relationship-0")));

        let package = payload.get(&format!("{NS}#SPDXRef-P")).unwrap();
        let Element::Package(package) = package else {
            panic!("expected a package element");
        };
        assert_eq!(
            package.info.verified_using,
            vec![IntegrityMethod::Hash(Hash::new(
                HashAlgorithm::Sha1,
                "d6a770ba38583ed4bb4525bd96e50461655d2758"
            ))]
        );

        let relationship = payload.get(&format!("{NS}#SPDXRef-Relationship-0")).unwrap();
        let Element::Relationship(relationship) = relationship else {
            panic!("expected a relationship element");
        };
        assert_eq!(relationship.relationship_type, RelationshipType::Describes);
        assert_eq!(relationship.from_element, format!("{NS}#SPDXRef-DOCUMENT"));
        assert_eq!(relationship.to, vec![format!("{NS}#SPDXRef-P")]);
    }

    #[test]
    fn identical_creators_are_synthesized_once() {
        let mut document = demo_document();
        document.creation_info.creators = vec![
            Actor::tool("demo-tool"),
            Actor::tool("demo-tool"),
            Actor::person("Jane", None),
        ];
        let payload = bump_document(&document).unwrap();
        let tool = payload.get(&format!("{NS}#SPDXRef-Actor-0")).unwrap();
        assert!(matches!(tool, Element::Tool(_)));
        let person = payload.get(&format!("{NS}#SPDXRef-Actor-1")).unwrap();
        assert!(matches!(person, Element::Agent(_)));
        assert!(!payload.contains(&format!("{NS}#SPDXRef-Actor-2")));

        let bundle = find_document(&payload);
        assert_eq!(
            bundle.info.creation_info.created_using,
            vec![format!("{NS}#SPDXRef-Actor-0")]
        );
        assert_eq!(
            bundle.info.creation_info.created_by,
            vec![format!("{NS}#SPDXRef-Actor-1")]
        );
    }

    #[test]
    fn suppliers_become_agents() {
        let mut document = demo_document();
        document.packages[0].supplier = Some(OrNoAssertion::Value(Actor::organization(
            "ACME",
            Some("sbom@acme.example".to_string()),
        )));
        let payload = bump_document(&document).unwrap();
        let Element::Package(package) = payload.get(&format!("{NS}#SPDXRef-P")).unwrap() else {
            panic!("expected a package element");
        };
        let supplier = package.artifact.supplied_by.as_deref().unwrap();
        assert_eq!(supplier, format!("{NS}#SPDXRef-Actor-1"));
        let Element::Agent(agent) = payload.get(supplier).unwrap() else {
            panic!("expected an agent element");
        };
        assert_eq!(agent.agent_type, AgentType::Organization);
        assert_eq!(agent.info.name.as_deref(), Some("ACME"));
        assert_eq!(
            agent.info.external_identifiers[0].identifier_type,
            ExternalIdentifierType::Email
        );
    }

    #[test]
    fn license_fields_are_elided_with_notes() {
        let mut document = demo_document();
        document.packages[0].license_concluded =
            Some(crate::license::parse_license_field("MIT").unwrap());
        document
            .extracted_licensing_info
            .push(models_v2::ExtractedLicensingInfo::new(
                "LicenseRef-custom",
                "text",
            ));
        let mut notes = NoteList::new();
        bump_document_with_sink(&document, &mut notes).unwrap();
        let contexts: Vec<&str> = notes.iter().map(|note| note.context.as_str()).collect();
        assert!(contexts.contains(&"SPDXRef-P.license_concluded"));
        assert!(contexts.contains(&"extracted_licensing_info.LicenseRef-custom"));
        for note in notes.iter() {
            assert!(note.message.contains("missing definitions for license profile"));
        }
    }

    #[test]
    fn marker_targets_collapse_to_completeness() {
        let mut document = demo_document();
        document.relationships.push(models_v2::Relationship::new(
            "SPDXRef-P",
            RelationshipType::Contains,
            SpdxValue::NoAssertion,
        ));
        document.relationships.push(models_v2::Relationship::new(
            "SPDXRef-P",
            RelationshipType::DependsOn,
            SpdxValue::None,
        ));
        let payload = bump_document(&document).unwrap();
        let Element::Relationship(contains) =
            payload.get(&format!("{NS}#SPDXRef-Relationship-1")).unwrap()
        else {
            panic!("expected a relationship element");
        };
        assert!(contains.to.is_empty());
        assert_eq!(contains.completeness, Some(RelationshipCompleteness::NoAssertion));
        let Element::Relationship(depends) =
            payload.get(&format!("{NS}#SPDXRef-Relationship-2")).unwrap()
        else {
            panic!("expected a relationship element");
        };
        assert!(depends.to.is_empty());
        assert_eq!(depends.completeness, Some(RelationshipCompleteness::Complete));
    }

    #[test]
    fn external_document_refs_become_imports() {
        let mut document = demo_document();
        document.external_document_refs.push(ExternalDocumentRef::new(
            "DocumentRef-other",
            "https://example.com/other",
            sha1(),
        ));
        document.relationships.push(models_v2::Relationship::new(
            "SPDXRef-P",
            RelationshipType::CopyOf,
            SpdxValue::Value("DocumentRef-other:SPDXRef-X".to_string()),
        ));
        let payload = bump_document(&document).unwrap();
        let bundle = find_document(&payload);
        assert_eq!(bundle.collection.imports.len(), 1);
        let import = &bundle.collection.imports[0];
        assert_eq!(import.external_spdx_id, "DocumentRef-other");
        assert_eq!(import.location_hint.as_deref(), Some("https://example.com/other"));

        let Element::Relationship(copy_of) =
            payload.get(&format!("{NS}#SPDXRef-Relationship-1")).unwrap()
        else {
            panic!("expected a relationship element");
        };
        assert_eq!(copy_of.to, vec!["https://example.com/other#SPDXRef-X".to_string()]);
    }

    #[test]
    fn an_undeclared_document_ref_fails() {
        let mut document = demo_document();
        document.relationships.push(models_v2::Relationship::new(
            "SPDXRef-P",
            RelationshipType::CopyOf,
            SpdxValue::Value("DocumentRef-missing:SPDXRef-X".to_string()),
        ));
        let error = bump_document(&document).unwrap_err();
        assert!(matches!(error, SpdxError::InvalidReference { .. }));
        assert!(error.to_string().contains("DocumentRef-missing"));
    }

    #[test]
    fn annotations_record_the_annotation_event() {
        let mut document = demo_document();
        let date = parse_timestamp("2024-05-06T07:08:09Z").unwrap();
        document.annotations.push(models_v2::Annotation::new(
            "SPDXRef-P",
            AnnotationType::Review,
            Actor::person("Reviewer", None),
            date,
            "looks fine",
        ));
        let payload = bump_document(&document).unwrap();
        let Element::Annotation(annotation) =
            payload.get(&format!("{NS}#SPDXRef-Annotation-0")).unwrap()
        else {
            panic!("expected an annotation element");
        };
        assert_eq!(annotation.subject, format!("{NS}#SPDXRef-P"));
        assert_eq!(annotation.statement.as_deref(), Some("looks fine"));
        assert_eq!(annotation.info.creation_info.created, date);
        assert_eq!(
            annotation.info.creation_info.created_by,
            vec![format!("{NS}#SPDXRef-Actor-1")]
        );
        assert!(payload.contains(&format!("{NS}#SPDXRef-Actor-1")));
    }
}
