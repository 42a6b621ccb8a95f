//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.
//! Text generation and speech ports live with their adapters in `ai_core` and
//! `ai_speech`.

mod continuity_store;

pub use continuity_store::ContinuityStore;
#[cfg(test)]
pub use continuity_store::MockContinuityStore;
