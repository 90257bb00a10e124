//! Ordered occurrence counter for complex members.

use indexmap::IndexMap;
use itertools::Itertools;

/// Multiset of identifiers keeping first-encounter order.
///
/// Each identifier appears once; recording it again bumps its count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceCounter {
    counts: IndexMap<String, usize>,
}

impl OccurrenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `identifier`.
    pub fn record(&mut self, identifier: &str) {
        self.add(identifier, 1);
    }

    /// Record `count` occurrences of `identifier`.
    pub fn add(&mut self, identifier: &str, count: usize) {
        if count == 0 {
            return;
        }
        match self.counts.get_mut(identifier) {
            Some(existing) => *existing += count,
            None => {
                self.counts.insert(identifier.to_string(), count);
            }
        }
    }

    /// Fold another counter into this one, preserving this counter's order
    /// for identifiers already seen and appending new ones in `other`'s order.
    pub fn merge(&mut self, other: &OccurrenceCounter) {
        for (identifier, &count) in &other.counts {
            self.add(identifier, count);
        }
    }

    pub fn count(&self, identifier: &str) -> usize {
        self.counts.get(identifier).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(id, &count)| (id.as_str(), count))
    }

    /// Render as `(2xP1, P2)`; `None` when nothing was counted.
    pub fn render(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let body = self
            .iter()
            .map(|(id, count)| {
                if count > 1 {
                    format!("{}x{}", count, id)
                } else {
                    id.to_string()
                }
            })
            .join(", ");
        Some(format!("({})", body))
    }
}
