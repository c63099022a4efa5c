//! # Economy Error Types
//!
//! All errors that can occur in the economy system.

use thiserror::Error;

use crate::item::ItemId;

/// Errors that can occur in the economy system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// Inventory is full, cannot add more items.
    #[error("inventory full: {free} free slots, tried to add {amount} of item {item_id}")]
    InventoryFull {
        /// Item that did not fit.
        item_id: ItemId,
        /// Free slots at the time of the attempt.
        free: u32,
        /// Amount tried to add.
        amount: u32,
    },

    /// Slot index outside the inventory section.
    #[error("slot {slot} out of range (section has {len} slots)")]
    SlotOutOfRange {
        /// Requested slot.
        slot: usize,
        /// Section length.
        len: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;
