//! Descriptive sentences per entity kind.

use tracing::warn;

use crate::domain::entities::EntityKind;
use crate::domain::flatten::flatten;
use crate::domain::graph::{EntityGraph, EntityIdx};

/// SBML level and version the document targets; quoted in the fallback
/// statement for complexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SbmlTarget {
    pub level: u32,
    pub version: u32,
}

impl Default for SbmlTarget {
    fn default() -> Self {
        Self { level: 3, version: 1 }
    }
}

/// Whether the entity kind has descriptive text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Mapped,
    Unmapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesDescription {
    pub sentences: Vec<String>,
    pub coverage: Coverage,
}

impl SpeciesDescription {
    fn unmapped() -> Self {
        Self {
            sentences: Vec::new(),
            coverage: Coverage::Unmapped,
        }
    }
}

/// Describe the entity at `idx`.
///
/// Kinds without a mapping produce no sentences and a warning; they never
/// fail the surrounding conversion.
pub fn describe_entity(
    graph: &EntityGraph,
    idx: EntityIdx,
    target: SbmlTarget,
) -> SpeciesDescription {
    let Some(entity) = graph.get(idx) else {
        warn!("cannot describe entity {:?}: not in the entity graph", idx);
        return SpeciesDescription::unmapped();
    };

    let detail = match &entity.kind {
        EntityKind::SimpleEntity => Some("This is a small compound.".to_string()),
        EntityKind::EntityWithAccessionedSequence => Some("This is a protein.".to_string()),
        EntityKind::Complex => {
            let structure = flatten(graph, idx).and_then(|counter| counter.render());
            Some(structure_statement(structure.as_deref(), target))
        }
        EntityKind::CandidateSet => Some(
            "A list of entities, one or more of which might perform the given function."
                .to_string(),
        ),
        EntityKind::DefinedSet => Some(
            "This is a list of alternative entities, any of which can perform the given function."
                .to_string(),
        ),
        EntityKind::OpenSet => Some(
            "A set of examples characterizing a very large but not explicitly enumerated set, e.g. mRNAs."
                .to_string(),
        ),
        EntityKind::OtherEntity
        | EntityKind::GenomeEncodedEntity
        | EntityKind::Polymer
        | EntityKind::ChemicalDrug
        | EntityKind::ProteinDrug
        | EntityKind::RnaDrug => None,
        EntityKind::Unknown(tag) => {
            warn!(
                "encountered unknown physical entity type {} for {}",
                tag, entity.st_id
            );
            return SpeciesDescription::unmapped();
        }
    };

    let mut sentences = vec![derived_from_statement(&entity.kind)];
    sentences.extend(detail);
    SpeciesDescription {
        sentences,
        coverage: Coverage::Mapped,
    }
}

pub fn derived_from_statement(kind: &EntityKind) -> String {
    format!("Derived from a Reactome {}.", kind.schema_class())
}

/// Statement about a complex's nested structure, falling back to a generic
/// sentence when no structure string is available.
pub fn structure_statement(structure: Option<&str>, target: SbmlTarget) -> String {
    match structure {
        Some(structure) => format!(
            "Here is Reactomes nested structure for this complex: {}",
            structure
        ),
        None => format!(
            "Reactome uses a nested structure for complexes, which cannot be fully represented in SBML Level {} Version {} core.",
            target.level, target.version
        ),
    }
}
