//! Domain layer for Storia
//!
//! Contains the story model, continuity records, value objects and domain
//! errors. Nothing here performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
