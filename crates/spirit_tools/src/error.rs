//! # Spirit Error Types
//!
//! Errors at the fallible boundaries: configuration, record decoding,
//! summoning, and material assignment. The per-tick controller itself has no
//! error path; everything it detects resolves to an idle tick or a return.

use spirit_economy::EconomyError;
use spirit_world::{MaterialId, WorldError};
use thiserror::Error;

/// Why a summon attempt was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummonRejection {
    /// The summoning player is not loaded.
    #[error("summoning player is not present")]
    OwnerUnresolved,

    /// The player does not carry the token they summon with.
    #[error("summon token is not in the player's inventory")]
    TokenNotHeld,

    /// An agent for this token is already working on another material.
    #[error("an agent for this token is already deployed")]
    AlreadyDeployed,

    /// The clicked block does not suit the tool kind or tier.
    #[error("tool cannot mine {material}")]
    UnsuitableBlock {
        /// Material of the clicked block.
        material: MaterialId,
    },
}

/// Errors that can occur in the spirit tools crate.
#[derive(Error, Debug)]
pub enum SpiritError {
    /// Summon refused.
    #[error("summon rejected: {0}")]
    Summon(#[from] SummonRejection),

    /// An agent was asked to mine a second material.
    #[error("material mismatch: agent mines {assigned}, asked to mine {requested}")]
    MaterialMismatch {
        /// Material already assigned.
        assigned: MaterialId,
        /// Material requested.
        requested: MaterialId,
    },

    /// Configuration values out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Malformed TOML configuration.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Malformed agent record.
    #[error("record codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// File access failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// World data error.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Economy data error.
    #[error(transparent)]
    Economy(#[from] EconomyError),
}

/// Result type for spirit tools operations.
pub type SpiritResult<T> = Result<T, SpiritError>;
