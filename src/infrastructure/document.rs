//! In-memory annotated document.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::{CvTerm, History, MarkupFragment};
use crate::infrastructure::traits::DocumentBuilder;

/// Annotations collected for one document node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnnotatedNode {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<MarkupFragment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cv_terms: Vec<CvTerm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<History>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sbo_term: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoichiometry: Option<u32>,
}

/// Document whose nodes are kept in creation order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InMemoryDocument {
    nodes: IndexMap<String, AnnotatedNode>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&AnnotatedNode> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (&str, &AnnotatedNode)> {
        self.nodes.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_mut(&mut self, id: &str) -> &mut AnnotatedNode {
        self.nodes.entry(id.to_string()).or_default()
    }
}

impl DocumentBuilder for InMemoryDocument {
    fn append_notes(&mut self, node: &str, notes: MarkupFragment) {
        self.node_mut(node).notes.push(notes);
    }

    fn add_cv_term(&mut self, node: &str, term: CvTerm) {
        self.node_mut(node).cv_terms.push(term);
    }

    fn set_history(&mut self, node: &str, history: History) {
        self.node_mut(node).history = Some(history);
    }

    fn set_sbo_term(&mut self, node: &str, term: u32) {
        self.node_mut(node).sbo_term = Some(term);
    }

    fn set_stoichiometry(&mut self, node: &str, stoichiometry: u32) {
        self.node_mut(node).stoichiometry = Some(stoichiometry);
    }
}
