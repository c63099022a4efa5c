//! # Player Inventory
//!
//! Pre-allocated inventory sections:
//! - 36 main slots (hotbar included)
//! - 1 off-hand slot
//! - 4 armor slots
//!
//! Items only ever enter the main section through `offer`/`add`. Possession
//! checks look at the main section and the off-hand; armor is never scanned.

use serde::{Deserialize, Serialize};

use crate::error::{EconomyError, EconomyResult};
use crate::item::{ItemId, ItemStack, SummonToken};

/// Main inventory slots (hotbar included).
pub const MAIN_SLOTS: usize = 36;

/// Armor slots.
pub const ARMOR_SLOTS: usize = 4;

/// Contents of one inventory slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventorySlot {
    /// Nothing.
    #[default]
    Empty,
    /// A stack of plain items.
    Items(ItemStack),
    /// A single summon token.
    Token(SummonToken),
}

impl InventorySlot {
    /// Returns true if this slot holds nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Items(stack) => stack.is_empty(),
            Self::Token(_) => false,
        }
    }

    /// Returns true if this slot holds exactly this token.
    #[inline]
    #[must_use]
    pub fn holds_token(&self, token: &SummonToken) -> bool {
        matches!(self, Self::Token(held) if held == token)
    }

    /// Item count of `item_id` in this slot.
    #[inline]
    #[must_use]
    pub const fn count_of(&self, item_id: ItemId) -> u32 {
        match self {
            Self::Items(stack) if stack.item_id == item_id => stack.count,
            Self::Token(token) if token.item_id == item_id => 1,
            _ => 0,
        }
    }
}

/// A player's inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerInventory {
    main: [InventorySlot; MAIN_SLOTS],
    off_hand: InventorySlot,
    armor: [InventorySlot; ARMOR_SLOTS],
}

impl PlayerInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            main: [InventorySlot::Empty; MAIN_SLOTS],
            off_hand: InventorySlot::Empty,
            armor: [InventorySlot::Empty; ARMOR_SLOTS],
        }
    }

    /// Gets a main slot.
    #[inline]
    #[must_use]
    pub fn main(&self, slot: usize) -> Option<&InventorySlot> {
        self.main.get(slot)
    }

    /// The off-hand slot.
    #[inline]
    #[must_use]
    pub const fn off_hand(&self) -> &InventorySlot {
        &self.off_hand
    }

    /// Gets an armor slot.
    #[inline]
    #[must_use]
    pub fn armor(&self, slot: usize) -> Option<&InventorySlot> {
        self.armor.get(slot)
    }

    /// Replaces a main slot, returning what was there.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::SlotOutOfRange` for an invalid index.
    pub fn set_main(&mut self, slot: usize, content: InventorySlot) -> EconomyResult<InventorySlot> {
        let target = self.main.get_mut(slot).ok_or(EconomyError::SlotOutOfRange {
            slot,
            len: MAIN_SLOTS,
        })?;
        Ok(std::mem::replace(target, content))
    }

    /// Replaces the off-hand slot, returning what was there.
    pub fn set_off_hand(&mut self, content: InventorySlot) -> InventorySlot {
        std::mem::replace(&mut self.off_hand, content)
    }

    /// Replaces an armor slot, returning what was there.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::SlotOutOfRange` for an invalid index.
    pub fn set_armor(&mut self, slot: usize, content: InventorySlot) -> EconomyResult<InventorySlot> {
        let target = self.armor.get_mut(slot).ok_or(EconomyError::SlotOutOfRange {
            slot,
            len: ARMOR_SLOTS,
        })?;
        Ok(std::mem::replace(target, content))
    }

    /// Puts a token into the first empty main slot.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InventoryFull` if no main slot is free.
    pub fn give_token(&mut self, token: SummonToken) -> EconomyResult<usize> {
        let slot = self
            .main
            .iter()
            .position(InventorySlot::is_empty)
            .ok_or(EconomyError::InventoryFull {
                item_id: token.item_id,
                free: 0,
                amount: 1,
            })?;
        self.main[slot] = InventorySlot::Token(token);
        Ok(slot)
    }

    /// Removes a token (by identity) from the main section or off-hand.
    pub fn take_token(&mut self, token: &SummonToken) -> Option<SummonToken> {
        self.main
            .iter_mut()
            .chain(std::iter::once(&mut self.off_hand))
            .find(|slot| slot.holds_token(token))
            .map(|slot| {
                *slot = InventorySlot::Empty;
                *token
            })
    }

    /// Whether the player carries this exact token in the main section or
    /// the off-hand.
    #[must_use]
    pub fn holds_token(&self, token: &SummonToken) -> bool {
        self.main.iter().any(|slot| slot.holds_token(token)) || self.off_hand.holds_token(token)
    }

    /// Counts an item type across the main section and off-hand.
    #[must_use]
    pub fn count_item(&self, item_id: ItemId) -> u32 {
        self.main
            .iter()
            .chain(std::iter::once(&self.off_hand))
            .map(|slot| slot.count_of(item_id))
            .sum()
    }

    /// Number of empty main slots.
    #[must_use]
    pub fn free_slots(&self) -> u32 {
        self.main.iter().filter(|slot| slot.is_empty()).count() as u32
    }

    /// How many of `item_id` the main section can still take.
    #[must_use]
    pub fn room_for(&self, item_id: ItemId, max_stack: u32) -> u32 {
        self.main
            .iter()
            .map(|slot| match slot {
                InventorySlot::Items(stack) if stack.item_id == item_id => {
                    max_stack.saturating_sub(stack.count)
                }
                slot if slot.is_empty() => max_stack,
                _ => 0,
            })
            .fold(0u32, u32::saturating_add)
    }

    /// Inserts as much of `stack` as fits and returns the leftover.
    ///
    /// First tops up existing stacks of the same item, then fills empty
    /// main slots. The leftover is empty when everything fit.
    ///
    /// # Arguments
    ///
    /// * `stack` - Items to insert
    /// * `max_stack` - Maximum stack size for this item type
    pub fn offer(&mut self, stack: ItemStack, max_stack: u32) -> ItemStack {
        if stack.is_empty() || max_stack == 0 {
            return stack;
        }
        let mut remaining = stack.count;

        for slot in &mut self.main {
            if remaining == 0 {
                break;
            }
            if let InventorySlot::Items(held) = slot {
                if held.item_id == stack.item_id && held.count < max_stack {
                    let moved = (max_stack - held.count).min(remaining);
                    held.count += moved;
                    remaining -= moved;
                }
            }
        }

        for slot in &mut self.main {
            if remaining == 0 {
                break;
            }
            if slot.is_empty() {
                let moved = remaining.min(max_stack);
                *slot = InventorySlot::Items(stack.with_count(moved));
                remaining -= moved;
            }
        }

        stack.with_count(remaining)
    }

    /// Inserts the whole stack or nothing.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InventoryFull` if the stack does not fit; the
    /// inventory is left unchanged.
    pub fn add(&mut self, stack: ItemStack, max_stack: u32) -> EconomyResult<()> {
        if self.room_for(stack.item_id, max_stack) < stack.count {
            return Err(EconomyError::InventoryFull {
                item_id: stack.item_id,
                free: self.free_slots(),
                amount: stack.count,
            });
        }
        let leftover = self.offer(stack, max_stack);
        debug_assert!(leftover.is_empty());
        Ok(())
    }
}

impl Default for PlayerInventory {
    fn default() -> Self {
        Self::new()
    }
}
