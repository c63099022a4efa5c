//! # Spirit Core
//!
//! Identity primitives shared by every other crate in the workspace:
//! - `EntityId`: index + generation, so a cached handle to a removed entity
//!   is detected instead of silently pointing at whatever reused the slot
//! - `PlayerId`: durable identity that survives save/reload and reconnects
//! - `EntityRegistry<T>`: slot storage handing out generational IDs
//!
//! ## Example
//!
//! ```rust
//! use spirit_core::EntityRegistry;
//!
//! let mut registry = EntityRegistry::new();
//! let id = registry.spawn("owner");
//! assert!(registry.is_alive(id));
//!
//! registry.despawn(id);
//! let reused = registry.spawn("someone else");
//! assert_eq!(reused.index(), id.index());
//! assert!(!registry.is_alive(id));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod ecs;

pub use ecs::{EntityId, EntityRegistry, PlayerId};
