//! # Spirit Shared
//!
//! Common types used by the world, economy and agent crates.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on other workspace crates. Everything here is
//! plain data: coordinates, orientation math, constants, packets.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod math;
pub mod protocol;

pub use constants::{
    AGENT_EYE_HEIGHT, DESPAWN_AGE, MAX_STACK_SIZE, OUT_OF_RANGE_GRACE_TICKS, SEARCH_RADIUS,
    SUMMON_RANGE, TICK_RATE,
};
pub use math::{BlockPos, Face, Rotation, Vec3};
pub use protocol::{BreakStageUpdate, BREAK_STAGE_NONE};
