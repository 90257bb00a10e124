//! Complex flattening: nested composition to a counted member list.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::domain::counter::OccurrenceCounter;
use crate::domain::graph::{resolve_identifier, EntityGraph, EntityIdx};

/// Flatten the composition below `root` into identifier counts.
///
/// Every non-composite descendant is visited, depth first in component
/// order; composites only contribute their members. Returns `None` when
/// any member cannot be resolved to a canonical identifier, since a
/// partial structure would misrepresent the complex.
///
/// All traversal state lives in this call.
#[instrument(level = "debug", skip(graph))]
pub fn flatten(graph: &EntityGraph, root: EntityIdx) -> Option<OccurrenceCounter> {
    let mut flattener = ComplexFlattener::new(graph);
    let expansion = flattener.expand(root);
    if expansion.complete {
        Some(expansion.counter)
    } else {
        debug!("complex has unresolved members, no structure available");
        None
    }
}

/// Members of one composite and whether all of them resolved.
#[derive(Debug, Clone)]
struct Expansion {
    counter: OccurrenceCounter,
    complete: bool,
}

impl Expansion {
    fn new() -> Self {
        Self {
            counter: OccurrenceCounter::new(),
            complete: true,
        }
    }

    fn incomplete() -> Self {
        Self {
            counter: OccurrenceCounter::new(),
            complete: false,
        }
    }

    fn absorb(&mut self, other: &Expansion) {
        self.counter.merge(&other.counter);
        self.complete &= other.complete;
    }
}

struct ComplexFlattener<'g> {
    graph: &'g EntityGraph,
    /// Composites already expanded in this call
    expanded: HashMap<EntityIdx, Expansion>,
    /// Composites on the current path
    in_progress: HashSet<EntityIdx>,
}

impl<'g> ComplexFlattener<'g> {
    fn new(graph: &'g EntityGraph) -> Self {
        Self {
            graph,
            expanded: HashMap::new(),
            in_progress: HashSet::new(),
        }
    }

    fn expand(&mut self, composite: EntityIdx) -> Expansion {
        if let Some(done) = self.expanded.get(&composite) {
            return done.clone();
        }
        let graph = self.graph;
        let Some(entity) = graph.get(composite) else {
            warn!("complex member {:?} is not in the entity graph", composite);
            return Expansion::incomplete();
        };
        if !self.in_progress.insert(composite) {
            warn!("complex {} contains itself", entity.st_id);
            return Expansion::incomplete();
        }

        let mut expansion = Expansion::new();
        for &child in &entity.components {
            let Some(member) = graph.get(child) else {
                warn!(
                    "component {:?} of {} is not in the entity graph",
                    child, entity.st_id
                );
                expansion.complete = false;
                continue;
            };
            if member.kind.is_complex() {
                let nested = self.expand(child);
                expansion.absorb(&nested);
            } else {
                match resolve_identifier(member) {
                    Some(identifier) => expansion.counter.record(identifier),
                    None => {
                        debug!(
                            "member {} ({}) has no canonical identifier",
                            member.st_id, member.kind
                        );
                        expansion.complete = false;
                    }
                }
            }
        }

        self.in_progress.remove(&composite);
        self.expanded.insert(composite, expansion.clone());
        expansion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntityKind, EntityRecord, ReferenceEntity};

    fn leaf(st_id: &str, class: &str, identifier: Option<&str>) -> EntityRecord {
        EntityRecord {
            st_id: st_id.to_string(),
            display_name: String::new(),
            schema_class: EntityKind::from(class),
            reference: identifier.map(|id| ReferenceEntity {
                identifier: id.to_string(),
                url: None,
            }),
            components: None,
            summations: vec![],
            literature: vec![],
            inferred_to: vec![],
            inferred_from: vec![],
            modified_residues: vec![],
        }
    }

    fn complex(st_id: &str, components: &[&str]) -> EntityRecord {
        let mut record = leaf(st_id, "Complex", None);
        record.components = Some(components.iter().map(|c| c.to_string()).collect());
        record
    }

    fn flatten_st_id(records: Vec<EntityRecord>, root: &str) -> Option<OccurrenceCounter> {
        let graph = EntityGraph::from_records(&records).expect("graph");
        flatten(&graph, graph.lookup(root).expect("root"))
    }

    #[test]
    fn given_shared_leaf_in_two_branches_when_flattening_then_counts_twice() {
        let records = vec![
            complex("ROOT", &["A", "B"]),
            complex("A", &["P1", "P2"]),
            complex("B", &["P1"]),
            leaf("P1", "EntityWithAccessionedSequence", Some("P1")),
            leaf("P2", "EntityWithAccessionedSequence", Some("P2")),
        ];

        let counter = flatten_st_id(records, "ROOT").expect("complete");

        assert_eq!(counter.render().as_deref(), Some("(2xP1, P2)"));
        assert_eq!(counter.total(), 3);
    }

    #[test]
    fn given_repeated_subcomplex_when_flattening_then_counts_each_occurrence() {
        let records = vec![
            complex("ROOT", &["SUB", "ATP", "SUB"]),
            complex("SUB", &["P1", "P2"]),
            leaf("P1", "EntityWithAccessionedSequence", Some("P1")),
            leaf("P2", "EntityWithAccessionedSequence", Some("P2")),
            leaf("ATP", "SimpleEntity", Some("CHEBI:30616")),
        ];

        let counter = flatten_st_id(records, "ROOT").expect("complete");

        assert_eq!(
            counter.iter().collect::<Vec<_>>(),
            vec![("P1", 2), ("P2", 2), ("CHEBI:30616", 1)]
        );
    }

    #[test]
    fn given_one_unresolved_leaf_when_flattening_then_none() {
        let records = vec![
            complex("ROOT", &["P1", "X", "P2"]),
            leaf("P1", "EntityWithAccessionedSequence", Some("P1")),
            leaf("X", "OtherEntity", None),
            leaf("P2", "SimpleEntity", Some("P2")),
        ];
        assert_eq!(flatten_st_id(records, "ROOT"), None);
    }

    #[test]
    fn given_resolvable_kind_without_reference_when_flattening_then_none() {
        let records = vec![
            complex("ROOT", &["P1"]),
            leaf("P1", "SimpleEntity", None),
        ];
        assert_eq!(flatten_st_id(records, "ROOT"), None);
    }

    #[test]
    fn given_empty_or_absent_components_when_flattening_then_empty_counter() {
        let records = vec![complex("EMPTY", &[]), leaf("NONE", "Complex", None)];
        let graph = EntityGraph::from_records(&records).unwrap();

        let empty = flatten(&graph, graph.lookup("EMPTY").unwrap()).unwrap();
        let absent = flatten(&graph, graph.lookup("NONE").unwrap()).unwrap();

        assert!(empty.is_empty());
        assert!(absent.is_empty());
        assert_eq!(empty.render(), None);
    }

    #[test]
    fn given_cyclic_complex_when_flattening_then_terminates_incomplete() {
        let records = vec![
            complex("A", &["P1", "B"]),
            complex("B", &["A"]),
            leaf("P1", "SimpleEntity", Some("P1")),
        ];
        assert_eq!(flatten_st_id(records, "A"), None);
    }

    #[test]
    fn given_repeated_calls_when_flattening_then_no_state_leaks() {
        let records = vec![
            complex("ROOT", &["P1", "P1"]),
            leaf("P1", "SimpleEntity", Some("P1")),
        ];
        let graph = EntityGraph::from_records(&records).unwrap();
        let root = graph.lookup("ROOT").unwrap();

        let first = flatten(&graph, root).unwrap();
        let second = flatten(&graph, root).unwrap();

        assert_eq!(first, second);
        assert_eq!(second.count("P1"), 2);
    }
}
