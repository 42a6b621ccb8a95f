//! In-memory continuity store
//!
//! Implements the `ContinuityStore` port with a hash map behind a
//! `parking_lot::RwLock`. Contents are lost when the process exits.

use std::collections::HashMap;

use application::{ApplicationError, ContinuityStore};
use domain::{ChildAlias, ChildMemory};
use parking_lot::RwLock;
use tracing::{debug, instrument};

/// Continuity memory held in process
#[derive(Debug, Default)]
pub struct InMemoryContinuityStore {
    memories: RwLock<HashMap<ChildAlias, ChildMemory>>,
}

impl InMemoryContinuityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children with a remembered story
    pub fn len(&self) -> usize {
        self.memories.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.memories.read().is_empty()
    }
}

impl ContinuityStore for InMemoryContinuityStore {
    #[instrument(skip(self), fields(alias = %alias))]
    fn load(&self, alias: &ChildAlias) -> Result<Option<ChildMemory>, ApplicationError> {
        let memory = self.memories.read().get(alias).cloned();
        debug!(found = memory.is_some(), "Loaded child memory");
        Ok(memory)
    }

    #[instrument(skip(self, memory), fields(alias = %memory.alias))]
    fn save(&self, memory: &ChildMemory) -> Result<(), ApplicationError> {
        self.memories
            .write()
            .insert(memory.alias.clone(), memory.clone());
        debug!(characters = memory.characters.len(), "Saved child memory");
        Ok(())
    }
}
