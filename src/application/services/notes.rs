//! Notes emission service
//!
//! Decides which texts go into the notes of a model, species or species
//! reference node, and in which order.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::notes::{NotesBuilder, NotesOutcome};
use crate::config::Settings;
use crate::domain::{describe_entity, Coverage, EntityGraph, EntityIdx, Event, Regulation};
use crate::infrastructure::traits::DocumentBuilder;

/// Opening sentence of the model notes when there is no parent pathway.
pub const EVENT_LIST_INTRO: &str = "This model was created from a list of events NOT a pathway. An appropriate parent pathway could not be detected. Events include:";

/// Service composing notes for document nodes.
pub struct NotesService {
    settings: Arc<Settings>,
}

impl NotesService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Fresh builder configured from settings.
    pub fn builder(&self) -> NotesBuilder {
        NotesBuilder::new(self.settings.sanitizer(), self.settings.separator.as_str())
    }

    /// Summations of a pathway or reaction-like event.
    pub fn pathway_notes(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        event: &Event,
    ) -> NotesOutcome {
        let mut notes = self.builder();
        notes.extend(event.summation_texts());
        notes.finalize(doc, node)
    }

    /// Model notes for a document built from loose events.
    pub fn event_list_notes(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        events: &[Event],
    ) -> NotesOutcome {
        let mut notes = self.builder();
        notes.append(EVENT_LIST_INTRO);
        for event in events {
            notes.extend(event.summation_texts());
        }
        notes.finalize(doc, node)
    }

    /// Kind description, participant explanation, then entity summations.
    pub fn species_notes(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        graph: &EntityGraph,
        idx: EntityIdx,
        explanation: Option<&str>,
    ) -> NotesOutcome {
        let Some(entity) = graph.get(idx) else {
            warn!("no entity behind species node {}", node);
            return NotesOutcome::Empty;
        };

        let description = describe_entity(graph, idx, self.settings.sbml_target());
        if description.coverage == Coverage::Unmapped {
            debug!("{} has no kind description", entity.st_id);
        }

        let mut notes = self.builder();
        for sentence in &description.sentences {
            notes.append(sentence);
        }
        if let Some(explanation) = explanation {
            notes.append(explanation);
        }
        notes.extend(entity.summation_texts());
        notes.finalize(doc, node)
    }

    pub fn species_reference_notes(
        &self,
        doc: &mut dyn DocumentBuilder,
        node: &str,
        regulation: &Regulation,
    ) -> NotesOutcome {
        let mut notes = self.builder();
        if let Some(explanation) = &regulation.explanation {
            notes.append(explanation);
        }
        notes.finalize(doc, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EntityKind, EntityRecord, ReferenceEntity, Summation};
    use crate::infrastructure::document::InMemoryDocument;

    fn service() -> NotesService {
        NotesService::new(Arc::new(Settings::default()))
    }

    fn summation(text: &str) -> Summation {
        Summation {
            text: Some(text.to_string()),
        }
    }

    #[test]
    fn given_event_without_summations_when_emitting_then_nothing_attached() {
        let mut doc = InMemoryDocument::new();
        let outcome = service().pathway_notes(&mut doc, "model", &Event::default());
        assert_eq!(outcome, NotesOutcome::Empty);
        assert!(doc.is_empty());
    }

    #[test]
    fn given_loose_events_when_emitting_then_intro_comes_first() {
        let mut doc = InMemoryDocument::new();
        let events = vec![Event {
            st_id: "R-HSA-1".to_string(),
            summations: vec![summation("Glucose & ATP")],
            ..Event::default()
        }];

        let outcome = service().event_list_notes(&mut doc, "model", &events);

        assert!(outcome.is_attached());
        let text = doc.node("model").unwrap().notes[0].text_content();
        assert!(text.starts_with(EVENT_LIST_INTRO));
        assert!(text.ends_with("Glucose  and  ATP"));
    }

    #[test]
    fn given_small_compound_when_emitting_species_notes_then_description_precedes_explanation() {
        let mut doc = InMemoryDocument::new();
        let graph = EntityGraph::from_records(&[EntityRecord {
            st_id: "R-ALL-29358".to_string(),
            display_name: "ATP".to_string(),
            schema_class: EntityKind::SimpleEntity,
            reference: Some(ReferenceEntity {
                identifier: "CHEBI:30616".to_string(),
                url: None,
            }),
            components: None,
            summations: vec![summation("Energy currency")],
            literature: vec![],
            inferred_to: vec![],
            inferred_from: vec![],
            modified_residues: vec![],
        }])
        .unwrap();
        let idx = graph.lookup("R-ALL-29358").unwrap();

        service().species_notes(&mut doc, "s1", &graph, idx, Some("consumed"));

        let text = doc.node("s1").unwrap().notes[0].text_content();
        assert_eq!(
            text,
            "Derived from a Reactome SimpleEntity.\nThis is a small compound.\nconsumed\nEnergy currency"
        );
    }

    #[test]
    fn given_regulation_without_explanation_when_emitting_then_empty() {
        let mut doc = InMemoryDocument::new();
        let regulation = Regulation {
            regulator: "R-HSA-2".to_string(),
            explanation: None,
        };
        let outcome = service().species_reference_notes(&mut doc, "m1", &regulation);
        assert_eq!(outcome, NotesOutcome::Empty);
    }
}
