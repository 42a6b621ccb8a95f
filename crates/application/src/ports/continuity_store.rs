//! Continuity storage port
//!
//! Defines how the pipeline reads and writes the per-child memory that links
//! one story to the next. Records are keyed by [`ChildAlias`], never by name.

use domain::{ChildAlias, ChildMemory};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for per-child memory persistence
#[cfg_attr(test, automock)]
pub trait ContinuityStore: Send + Sync {
    /// Get the memory for a child, if any story was told before
    fn load(&self, alias: &ChildAlias) -> Result<Option<ChildMemory>, ApplicationError>;

    /// Insert or replace the memory for `memory.alias`
    fn save(&self, memory: &ChildMemory) -> Result<(), ApplicationError>;
}
