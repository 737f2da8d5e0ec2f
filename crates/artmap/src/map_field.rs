//! The map field: a partial mapping from input-module category indices to
//! labels.
//!
//! Entries are written once when a category commits. A conflicting label
//! never overwrites an entry; conflicts are resolved by match tracking on
//! the input module, which ends in a fresh category with its own entry.

use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct MapField {
    entries: HashMap<usize, usize>,
}

impl MapField {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn label_of(&self, category: usize) -> Option<usize> {
        self.entries.get(&category).copied()
    }

    /// Install the association for a fresh category.
    pub fn install(&mut self, category: usize, label: usize) {
        debug_assert!(
            !self.entries.contains_key(&category),
            "map-field entries are write-once"
        );
        self.entries.insert(category, label);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Distinct labels currently mapped.
    pub fn labels(&self) -> Vec<usize> {
        let mut labels: Vec<usize> = self.entries.values().copied().collect();
        labels.sort_unstable();
        labels.dedup();
        labels
    }
}
