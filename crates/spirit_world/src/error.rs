//! # World Error Types
//!
//! Errors raised while loading or editing world data.

use thiserror::Error;

/// Errors that can occur in the world crate.
#[derive(Error, Debug)]
pub enum WorldError {
    /// A material ID or name was registered twice.
    #[error("duplicate material: id {id} ({name})")]
    DuplicateMaterial {
        /// The conflicting ID.
        id: u16,
        /// The conflicting name.
        name: String,
    },

    /// A material definition carries unusable values.
    #[error("invalid material {name}: {reason}")]
    InvalidMaterial {
        /// The offending material name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A material name was not found in the table.
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    /// Malformed TOML table.
    #[error("invalid material table: {0}")]
    Config(#[from] toml::de::Error),

    /// Failed to read a table file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for world operations.
pub type WorldResult<T> = Result<T, WorldError>;
