//! # Entity Identity
//!
//! - Entity IDs are simple indices with generation counters
//! - Registries recycle slots and bump the generation on every reuse
//! - Player identity is a UUID, independent of the slot the player occupies

mod entity;
mod registry;

pub use entity::{EntityId, PlayerId};
pub use registry::EntityRegistry;
