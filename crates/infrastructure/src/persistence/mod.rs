//! Persistence module
//!
//! Process-local storage for per-child continuity memory.

pub mod continuity_store;

pub use continuity_store::InMemoryContinuityStore;
