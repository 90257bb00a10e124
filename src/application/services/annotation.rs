//! Annotation emission service
//!
//! Attaches CV terms, curation history, SBO terms and notes to the nodes of
//! a document, and drives a whole bundle into an [`InMemoryDocument`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::{debug, info, instrument, warn};

use super::bundle::LoadedBundle;
use super::notes::NotesService;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::provenance::provenance_fragment;
use crate::domain::{CvTerm, EntityKind, Event, History, PhysicalEntity, Qualifier};
use crate::infrastructure::document::InMemoryDocument;
use crate::infrastructure::traits::DocumentBuilder;

/// Node receiving model-level notes and provenance.
pub const MODEL_NODE: &str = "model";

/// Largest valid SBO term number.
pub const SBO_TERM_MAX: i64 = 9_999_999;

/// SBO:0000176, biochemical reaction
pub const SBO_BIOCHEMICAL_REACTION: i64 = 176;

/// SBO:0000019, modifier
pub const SBO_MODIFIER: i64 = 19;

/// Node id built from a prefix and a stable id; SBML ids allow only
/// letters, digits and underscores.
pub fn node_id(prefix: &str, st_id: &str) -> String {
    let suffix: String = st_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}", prefix, suffix)
}

/// Node ids handed out during one annotation run.
///
/// Distinct stable ids can map to the same node id (`R-HSA-1` and
/// `R_HSA_1`); such a collision is logged and counted, and the node is
/// shared.
#[derive(Debug, Default)]
pub struct NodeIds {
    owners: HashMap<String, String>,
    collisions: usize,
}

impl NodeIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Node id for `st_id` under `prefix`, remembering who claimed it first.
    pub fn claim(&mut self, prefix: &str, st_id: &str) -> String {
        let id = node_id(prefix, st_id);
        match self.owners.get(&id) {
            Some(owner) if owner != st_id => {
                warn!("node id {} used for both {} and {}", id, owner, st_id);
                self.collisions += 1;
            }
            Some(_) => {}
            None => {
                self.owners.insert(id.clone(), st_id.to_string());
            }
        }
        id
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }
}

/// Service attaching annotations to document nodes.
pub struct AnnotationService {
    settings: Arc<Settings>,
    notes: NotesService,
}

impl AnnotationService {
    pub fn new(settings: Arc<Settings>) -> Self {
        let notes = NotesService::new(Arc::clone(&settings));
        Self { settings, notes }
    }

    pub fn notes(&self) -> &NotesService {
        &self.notes
    }

    fn add_term(
        doc: &mut dyn DocumentBuilder,
        node: &str,
        qualifier: Qualifier,
        uris: Vec<String>,
    ) {
        if let Some(term) = CvTerm::new(qualifier, uris) {
            doc.add_cv_term(node, term);
        }
    }

    fn reactome_urls<'a, I>(&self, st_ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        st_ids
            .into_iter()
            .map(|st_id| self.settings.reactome_url(st_id))
            .collect()
    }

    /// CV terms of a species node.
    ///
    /// `participant_urls` are the external references collected for the
    /// participant; aggregates list them as parts, everything else as
    /// identities next to the Reactome entry.
    pub fn species_cv_terms(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        entity: &PhysicalEntity,
        participant_urls: &[String],
    ) {
        Self::add_term(doc, node, Qualifier::BqbIsDescribedBy, entity.literature_urls());

        let own = self.settings.reactome_url(&entity.st_id);
        if entity.kind.is_aggregate() {
            Self::add_term(doc, node, Qualifier::BqbIs, vec![own]);
            Self::add_term(doc, node, Qualifier::BqbHasPart, participant_urls.to_vec());
        } else {
            let mut identities = participant_urls.to_vec();
            identities.push(own);
            Self::add_term(doc, node, Qualifier::BqbIs, identities);

            if entity.kind == EntityKind::EntityWithAccessionedSequence {
                let psi_mods = entity
                    .modified_residues
                    .iter()
                    .filter_map(|residue| residue.psi_mod_url.clone())
                    .collect();
                Self::add_term(doc, node, Qualifier::BqbHasVersion, psi_mods);
            }
        }

        let homologs = self.reactome_urls(entity.inferred_to.iter().chain(&entity.inferred_from));
        Self::add_term(doc, node, Qualifier::BqbIsHomologTo, homologs);
    }

    /// CV terms of a reaction node.
    pub fn reaction_cv_terms(&self, doc: &mut dyn DocumentBuilder, node: &str, event: &Event) {
        let own = self.settings.reactome_url(&event.st_id);
        Self::add_term(doc, node, Qualifier::BqbIs, vec![own]);
        Self::add_term(doc, node, Qualifier::BqbIs, event.go_terms.clone());
        Self::add_term(doc, node, Qualifier::BqbIs, event.ec_numbers.clone());
        Self::add_term(doc, node, Qualifier::BqbIsDescribedBy, event.literature_urls());
        Self::add_term(doc, node, Qualifier::BqbOccursIn, event.diseases.clone());
        Self::add_term(doc, node, Qualifier::BqmHasInstance, event.cross_references.clone());
    }

    /// History, summation notes and identity terms of an event.
    ///
    /// Orphan reactions have no event; nothing is attached then.
    pub fn event_annotations(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        event: Option<&Event>,
    ) {
        let Some(event) = event else {
            return;
        };

        let mut history = History::new();
        if let Some(created) = &event.created {
            history.record_created(created);
        }
        if let Some(modified) = &event.modified {
            history.record_modified(modified);
        }
        for edit in event.authored.iter().chain(event.revised.iter()) {
            history.record_modified(edit);
        }
        if !history.is_empty() {
            doc.set_history(node, history);
        }

        self.notes.pathway_notes(doc, node, event);

        let mut identities = vec![self.settings.reactome_url(&event.st_id)];
        identities.extend(event.go_biological_process.clone());
        Self::add_term(doc, node, Qualifier::BqbIs, identities);
        Self::add_term(doc, node, Qualifier::BqbIsDescribedBy, event.literature_urls());
    }

    /// Set the SBO term when it is a valid term number; returns whether it was set.
    pub fn sbo_term(&self, doc: &mut dyn DocumentBuilder, node: &str, term: i64) -> bool {
        match u32::try_from(term) {
            Ok(valid) if term <= SBO_TERM_MAX => {
                doc.set_sbo_term(node, valid);
                true
            }
            _ => {
                debug!("ignoring out of range SBO term {} for {}", term, node);
                false
            }
        }
    }

    /// Attach the provenance block to `node`.
    ///
    /// Template inputs are controlled by the converter; a parse failure is
    /// still only logged.
    pub fn provenance(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        db_version: u32,
        generated_on: NaiveDateTime,
    ) -> bool {
        match provenance_fragment(db_version, generated_on, &self.settings.jsbml_version) {
            Ok(fragment) => {
                doc.append_notes(node, fragment);
                true
            }
            Err(err) => {
                warn!("skipping provenance for {}: {}", node, err);
                false
            }
        }
    }

    /// Annotate every node reachable from the bundle.
    ///
    /// Per-entity problems (unknown participants, malformed notes) are
    /// logged and skipped; the document is always produced.
    #[instrument(level = "debug", skip_all)]
    pub fn annotate_bundle(
        &self,
        loaded: &LoadedBundle,
        generated_on: NaiveDateTime,
    ) -> ApplicationResult<InMemoryDocument> {
        let bundle = &loaded.bundle;
        let graph = &loaded.graph;
        let mut doc = InMemoryDocument::new();

        self.provenance(&mut doc, MODEL_NODE, bundle.db_version, generated_on);
        match &bundle.pathway {
            Some(pathway) => self.event_annotations(&mut doc, MODEL_NODE, Some(pathway)),
            None => {
                self.notes.event_list_notes(&mut doc, MODEL_NODE, &bundle.events);
            }
        }

        let mut node_ids = NodeIds::new();
        let mut species_done: HashSet<&str> = HashSet::new();
        for event in &bundle.events {
            let reaction = node_ids.claim("reaction", &event.st_id);
            self.sbo_term(&mut doc, &reaction, SBO_BIOCHEMICAL_REACTION);
            self.reaction_cv_terms(&mut doc, &reaction, event);
            self.event_annotations(&mut doc, &reaction, Some(event));

            let mut references: IndexMap<String, u32> = IndexMap::new();
            for participant in &event.participants {
                let Some(idx) = graph.lookup(&participant.entity) else {
                    warn!(
                        "event {} references unknown entity {}; skipped",
                        event.st_id, participant.entity
                    );
                    continue;
                };
                let Some(entity) = graph.get(idx) else {
                    continue;
                };
                let species = node_ids.claim("species", &entity.st_id);
                let reference = format!("{}_{}", node_id("participant", &event.st_id), species);
                *references.entry(reference).or_insert(0) += participant.stoichiometry;

                if !species_done.insert(entity.st_id.as_str()) {
                    continue;
                }
                self.notes.species_notes(
                    &mut doc,
                    &species,
                    graph,
                    idx,
                    participant.explanation.as_deref(),
                );
                self.species_cv_terms(&mut doc, &species, entity, &participant.urls);
            }
            for (reference, stoichiometry) in &references {
                doc.set_stoichiometry(reference, *stoichiometry);
            }

            for regulation in &event.regulations {
                let modifier = format!(
                    "{}_{}",
                    node_id("modifier", &event.st_id),
                    node_id("species", &regulation.regulator)
                );
                self.sbo_term(&mut doc, &modifier, SBO_MODIFIER);
                self.notes.species_reference_notes(&mut doc, &modifier, regulation);
            }
        }

        if node_ids.collisions() > 0 {
            warn!(
                "{} node id collision(s); colliding entities share a node",
                node_ids.collisions()
            );
        }
        info!(
            "annotated {} node(s) from {} event(s)",
            doc.len(),
            bundle.events.len()
        );
        Ok(doc)
    }
}
