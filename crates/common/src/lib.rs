//! Shared types: entity ids, transforms, and the injected randomness capability.

mod random;
mod types;

pub use random::{RandomSource, ScriptedRandom, ThreadRandom};
pub use types::{EntityId, Transform};
