//! # Spirit Economy
//!
//! Items, summon tokens and where they end up.
//!
//! ## Design Principles
//!
//! 1. **Nothing is lost** - `offer` hands back whatever did not fit
//! 2. **Tokens are unique** - equality includes the token's own identity
//! 3. **External configuration** - drop rules live in TOML files
//!
//! ## Example
//!
//! ```rust
//! use spirit_economy::{items, DropTable, ItemStack, PlayerInventory, SummonToken, ToolKind, ToolTier};
//! use spirit_world::MaterialId;
//!
//! let drops = DropTable::default();
//! let pick = SummonToken::new(ToolKind::Pickaxe, ToolTier::Iron);
//!
//! let mut inventory = PlayerInventory::new();
//! for stack in drops.resolve(MaterialId::STONE, Some(&pick)) {
//!     let leftover = inventory.offer(stack, 64);
//!     assert!(leftover.is_empty());
//! }
//! assert_eq!(inventory.count_item(items::COBBLESTONE), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod drops;
pub mod error;
pub mod inventory;
pub mod item;

pub use drops::{DropRule, DropTable};
pub use error::{EconomyError, EconomyResult};
pub use inventory::{InventorySlot, PlayerInventory, ARMOR_SLOTS, MAIN_SLOTS};
pub use item::{items, total_of, ItemId, ItemStack, SummonToken, ToolKind, ToolTier};
