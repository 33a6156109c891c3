//! Identity registries
//!
//! One registry per name category (product, user, host). Names are numbered
//! in first-seen order and the mapping is stable for the lifetime of the run;
//! the concurrency and duration passes use the indices to address their dense
//! count matrices.

use std::collections::HashMap;

use crate::error::{AnalyzerError, Result};

#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name, returning its index. Registering a name twice
    /// returns the index assigned on first appearance.
    pub fn register(&mut self, name: &str) -> usize {
        if let Some(&existing) = self.index.get(name) {
            return existing;
        }
        let assigned = self.names.len();
        self.names.push(name.to_owned());
        self.index.insert(name.to_owned(), assigned);
        assigned
    }

    /// Look up a previously registered name. A miss means the caller is
    /// using a name that extraction never saw, which is a defect in the
    /// pipeline rather than bad input.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| AnalyzerError::InvalidIndex {
                name: name.to_owned(),
            })
    }

    /// All names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
