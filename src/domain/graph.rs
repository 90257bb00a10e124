//! Arena-backed entity graph.
//!
//! Complexes reference their components by arena handle, so the same
//! component can hang below several composites without being copied.

use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{
    literature_urls, summation_texts, EntityKind, EntityRecord, LiteratureReference,
    ModifiedResidue, ReferenceEntity, Summation,
};
use crate::domain::error::{DomainError, DomainResult};

/// Handle of an entity inside an [`EntityGraph`].
pub type EntityIdx = Index;

/// Physical entity with resolved component handles.
#[derive(Debug, Clone)]
pub struct PhysicalEntity {
    pub st_id: String,
    pub display_name: String,
    pub kind: EntityKind,
    pub reference: Option<ReferenceEntity>,
    /// Ordered, possibly repeated; empty for non-composites
    pub components: Vec<EntityIdx>,
    pub summations: Vec<Summation>,
    pub literature: Vec<LiteratureReference>,
    pub inferred_to: Vec<String>,
    pub inferred_from: Vec<String>,
    pub modified_residues: Vec<ModifiedResidue>,
}

impl PhysicalEntity {
    pub fn summation_texts(&self) -> impl Iterator<Item = &str> {
        summation_texts(&self.summations)
    }

    pub fn literature_urls(&self) -> Vec<String> {
        literature_urls(&self.literature)
    }
}

impl fmt::Display for PhysicalEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{} [{}]", self.st_id, self.kind)
        } else {
            write!(f, "{} {} [{}]", self.st_id, self.display_name, self.kind)
        }
    }
}

/// Read-only graph of physical entities.
#[derive(Debug, Default)]
pub struct EntityGraph {
    arena: Arena<PhysicalEntity>,
    by_st_id: HashMap<String, EntityIdx>,
}

impl EntityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph from bundle records.
    ///
    /// Records are inserted first and components resolved afterwards, so a
    /// complex may list components that appear later in the input.
    #[instrument(level = "debug", skip(records), fields(count = records.len()))]
    pub fn from_records(records: &[EntityRecord]) -> DomainResult<Self> {
        let mut graph = Self::new();

        for record in records {
            if graph.by_st_id.contains_key(&record.st_id) {
                return Err(DomainError::DuplicateEntity(record.st_id.clone()));
            }
            let entity = PhysicalEntity {
                st_id: record.st_id.clone(),
                display_name: record.display_name.clone(),
                kind: record.schema_class.clone(),
                reference: record.reference.clone(),
                components: Vec::new(),
                summations: record.summations.clone(),
                literature: record.literature.clone(),
                inferred_to: record.inferred_to.clone(),
                inferred_from: record.inferred_from.clone(),
                modified_residues: record.modified_residues.clone(),
            };
            let idx = graph.arena.insert(entity);
            graph.by_st_id.insert(record.st_id.clone(), idx);
        }

        for record in records {
            let Some(component_ids) = &record.components else {
                continue;
            };
            let mut components = Vec::with_capacity(component_ids.len());
            for component in component_ids {
                let idx = graph.lookup(component).ok_or_else(|| DomainError::UnknownComponent {
                    parent: record.st_id.clone(),
                    component: component.clone(),
                })?;
                components.push(idx);
            }
            let parent_idx = graph.by_st_id[&record.st_id];
            if let Some(parent) = graph.arena.get_mut(parent_idx) {
                parent.components = components;
            }
        }

        Ok(graph)
    }

    pub fn get(&self, idx: EntityIdx) -> Option<&PhysicalEntity> {
        self.arena.get(idx)
    }

    pub fn lookup(&self, st_id: &str) -> Option<EntityIdx> {
        self.by_st_id.get(st_id).copied()
    }

    pub fn get_by_st_id(&self, st_id: &str) -> Option<&PhysicalEntity> {
        self.lookup(st_id).and_then(|idx| self.get(idx))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Render the composition below `root` for display.
    ///
    /// A composite met again on its own path is shown once with a marker
    /// instead of being expanded.
    pub fn to_tree(&self, root: EntityIdx) -> Tree<String> {
        let mut path = HashSet::new();
        self.build_tree(root, &mut path)
    }

    fn build_tree(&self, idx: EntityIdx, path: &mut HashSet<EntityIdx>) -> Tree<String> {
        let Some(entity) = self.get(idx) else {
            return Tree::new("<missing>".to_string());
        };
        if !path.insert(idx) {
            return Tree::new(format!("{} (cycle)", entity));
        }
        let label = match resolve_identifier(entity) {
            Some(id) => format!("{} -> {}", entity, id),
            None => entity.to_string(),
        };
        let leaves: Vec<_> = entity
            .components
            .iter()
            .map(|&child| self.build_tree(child, path))
            .collect();
        path.remove(&idx);
        Tree::new(label).with_leaves(leaves)
    }
}

/// Canonical identifier of a non-composite entity.
///
/// Only small molecules and sequence entities carry a reference that
/// identifies them; every other kind is unresolved.
pub fn resolve_identifier(entity: &PhysicalEntity) -> Option<&str> {
    match entity.kind {
        EntityKind::SimpleEntity | EntityKind::EntityWithAccessionedSequence => entity
            .reference
            .as_ref()
            .map(|reference| reference.identifier.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(st_id: &str, class: &str, components: Option<Vec<&str>>) -> EntityRecord {
        EntityRecord {
            st_id: st_id.to_string(),
            display_name: String::new(),
            schema_class: EntityKind::from(class),
            reference: None,
            components: components.map(|c| c.into_iter().map(String::from).collect()),
            summations: vec![],
            literature: vec![],
            inferred_to: vec![],
            inferred_from: vec![],
            modified_residues: vec![],
        }
    }

    #[test]
    fn given_forward_reference_when_building_then_resolves_component() {
        let records = vec![
            record("C1", "Complex", Some(vec!["L1", "L1"])),
            record("L1", "SimpleEntity", None),
        ];
        let graph = EntityGraph::from_records(&records).unwrap();

        let complex = graph.get_by_st_id("C1").unwrap();
        assert_eq!(complex.components.len(), 2);
        assert_eq!(complex.components[0], graph.lookup("L1").unwrap());
    }

    #[test]
    fn given_missing_component_when_building_then_errors() {
        let records = vec![record("C1", "Complex", Some(vec!["nope"]))];
        let result = EntityGraph::from_records(&records);
        assert_eq!(
            result.unwrap_err(),
            DomainError::UnknownComponent {
                parent: "C1".to_string(),
                component: "nope".to_string()
            }
        );
    }

    #[test]
    fn given_duplicate_st_id_when_building_then_errors() {
        let records = vec![
            record("L1", "SimpleEntity", None),
            record("L1", "Polymer", None),
        ];
        assert!(matches!(
            EntityGraph::from_records(&records),
            Err(DomainError::DuplicateEntity(id)) if id == "L1"
        ));
    }

    #[test]
    fn given_self_containing_complex_when_rendering_tree_then_marks_cycle() {
        let records = vec![record("C1", "Complex", Some(vec!["C1"]))];
        let graph = EntityGraph::from_records(&records).unwrap();
        let tree = graph.to_tree(graph.lookup("C1").unwrap());
        assert!(tree.to_string().contains("(cycle)"));
    }

    #[test]
    fn given_drug_with_reference_when_resolving_then_unresolved() {
        let mut drug = record("D1", "ChemicalDrug", None);
        drug.reference = Some(ReferenceEntity {
            identifier: "CHEBI:1".to_string(),
            url: None,
        });
        let graph = EntityGraph::from_records(&[drug]).unwrap();
        assert_eq!(resolve_identifier(graph.get_by_st_id("D1").unwrap()), None);
    }
}
