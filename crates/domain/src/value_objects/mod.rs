//! Value Objects - Immutable, identity-less domain primitives

mod child_alias;
mod language;
mod voice_id;

pub use child_alias::ChildAlias;
pub use language::{DEFAULT_ALLOWED_LANGUAGES, Language};
pub use voice_id::{MAX_VOICE_ID_CHARS, VoiceId};
