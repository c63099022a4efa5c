//! # Tuning Constants
//!
//! Defaults for the agent lifecycle. `SpiritConfig` starts from these and may
//! override them from TOML; nothing else should hardcode the numbers.

/// World ticks per second.
pub const TICK_RATE: u32 = 20;

/// Distance (blocks) at which the owner is considered out of range.
///
/// Compared squared, and exactly this distance already fails.
pub const SUMMON_RANGE: f32 = 20.0;

/// Age (ticks) at which an agent is forced to return.
pub const DESPAWN_AGE: u32 = 200;

/// Radius (blocks) of the flood-fill around the summon seed.
pub const SEARCH_RADIUS: f32 = 5.0;

/// Consecutive failing range checks tolerated before a forced return.
pub const OUT_OF_RANGE_GRACE_TICKS: u32 = 20;

/// Agent hitbox height (blocks).
pub const AGENT_HEIGHT: f32 = 0.75;

/// Agent eye height above its feet (blocks).
pub const AGENT_EYE_HEIGHT: f32 = AGENT_HEIGHT * 0.85;

/// Default maximum size of an item stack.
pub const MAX_STACK_SIZE: u32 = 64;
