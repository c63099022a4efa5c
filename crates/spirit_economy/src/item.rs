//! # Items and Summon Tokens
//!
//! Plain items are counted stacks. A summon token is a single, unique tool
//! item: two tokens of the same kind and tier are still different tokens,
//! because each carries its own `token_id`.

use serde::{Deserialize, Serialize};
use spirit_world::MaterialTag;
use uuid::Uuid;

/// Unique identifier for an item type. `0` is "no item".
pub type ItemId = u32;

/// Well-known item IDs used by the built-in drop table.
pub mod items {
    use super::ItemId;

    /// Dirt.
    pub const DIRT: ItemId = 3;
    /// Cobblestone (dropped by stone).
    pub const COBBLESTONE: ItemId = 4;
    /// Sand.
    pub const SAND: ItemId = 12;
    /// Oak log.
    pub const OAK_LOG: ItemId = 17;
    /// Obsidian.
    pub const OBSIDIAN: ItemId = 49;
    /// Coal.
    pub const COAL: ItemId = 263;
    /// Diamond.
    pub const DIAMOND: ItemId = 264;
    /// Raw iron.
    pub const RAW_IRON: ItemId = 265;
    /// Spirit pickaxe token.
    pub const SPIRIT_PICKAXE: ItemId = 2001;
    /// Spirit axe token.
    pub const SPIRIT_AXE: ItemId = 2002;
    /// Spirit shovel token.
    pub const SPIRIT_SHOVEL: ItemId = 2003;
    /// Spirit hoe token.
    pub const SPIRIT_HOE: ItemId = 2004;
}

/// A stack of items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// The item type ID, or 0 for nothing.
    pub item_id: ItemId,
    /// Number of items in this stack.
    pub count: u32,
}

impl ItemStack {
    /// Creates an empty item stack.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            item_id: 0,
            count: 0,
        }
    }

    /// Creates a new item stack.
    #[inline]
    #[must_use]
    pub const fn new(item_id: ItemId, count: u32) -> Self {
        Self { item_id, count }
    }

    /// Returns true if this stack holds nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0 || self.item_id == 0
    }

    /// Same stack with a different count.
    #[inline]
    #[must_use]
    pub const fn with_count(self, count: u32) -> Self {
        Self {
            item_id: self.item_id,
            count,
        }
    }
}

/// Total item count across stacks of one item type.
#[must_use]
pub fn total_of(stacks: &[ItemStack], item_id: ItemId) -> u32 {
    stacks
        .iter()
        .filter(|s| s.item_id == item_id)
        .map(|s| s.count)
        .sum()
}

/// Tool family of a summon token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Stone, ores.
    Pickaxe,
    /// Logs, planks.
    Axe,
    /// Dirt, sand, grass.
    Shovel,
    /// Leaves, crops.
    Hoe,
}

impl ToolKind {
    /// Material tag this tool is effective on.
    #[inline]
    #[must_use]
    pub const fn effective_tag(self) -> MaterialTag {
        match self {
            Self::Pickaxe => MaterialTag::MineablePickaxe,
            Self::Axe => MaterialTag::MineableAxe,
            Self::Shovel => MaterialTag::MineableShovel,
            Self::Hoe => MaterialTag::MineableHoe,
        }
    }

    /// Item ID of this kind's summon token.
    #[inline]
    #[must_use]
    pub const fn token_item(self) -> ItemId {
        match self {
            Self::Pickaxe => items::SPIRIT_PICKAXE,
            Self::Axe => items::SPIRIT_AXE,
            Self::Shovel => items::SPIRIT_SHOVEL,
            Self::Hoe => items::SPIRIT_HOE,
        }
    }
}

/// Material tier of a summon token. Speeds and mining levels per tier are
/// configuration, not code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolTier {
    /// Wooden.
    Wood,
    /// Stone.
    Stone,
    /// Iron.
    Iron,
    /// Diamond.
    Diamond,
    /// Netherite.
    Netherite,
}

impl ToolTier {
    /// All tiers, weakest first.
    pub const ALL: [Self; 5] = [
        Self::Wood,
        Self::Stone,
        Self::Iron,
        Self::Diamond,
        Self::Netherite,
    ];
}

/// The item a player uses to summon a spirit tool.
///
/// Equality covers every field, including the unique `token_id`: an agent
/// only counts its owner as "holding the token" when this exact token is in
/// their inventory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummonToken {
    /// Item type of the token.
    pub item_id: ItemId,
    /// Unique identity of this token.
    pub token_id: Uuid,
    /// Tool family.
    pub kind: ToolKind,
    /// Tool tier.
    pub tier: ToolTier,
    /// Efficiency enchantment level (0 = none).
    #[serde(default)]
    pub efficiency: u8,
}

impl SummonToken {
    /// Creates a fresh token with a random identity.
    #[must_use]
    pub fn new(kind: ToolKind, tier: ToolTier) -> Self {
        Self::with_id(Uuid::new_v4(), kind, tier)
    }

    /// Creates a token with a known identity.
    #[must_use]
    pub const fn with_id(token_id: Uuid, kind: ToolKind, tier: ToolTier) -> Self {
        Self {
            item_id: kind.token_item(),
            token_id,
            kind,
            tier,
            efficiency: 0,
        }
    }

    /// Builder: sets the efficiency level.
    #[must_use]
    pub const fn with_efficiency(mut self, level: u8) -> Self {
        self.efficiency = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_empty() {
        assert!(ItemStack::empty().is_empty());
        assert!(ItemStack::new(items::COAL, 0).is_empty());
        assert!(!ItemStack::new(items::COAL, 1).is_empty());
    }

    #[test]
    fn test_total_of() {
        let stacks = [
            ItemStack::new(items::COAL, 10),
            ItemStack::new(items::DIAMOND, 1),
            ItemStack::new(items::COAL, 5),
        ];
        assert_eq!(total_of(&stacks, items::COAL), 15);
        assert_eq!(total_of(&stacks, items::DIRT), 0);
    }

    #[test]
    fn test_token_identity() {
        let a = SummonToken::new(ToolKind::Pickaxe, ToolTier::Iron);
        let b = SummonToken::new(ToolKind::Pickaxe, ToolTier::Iron);
        assert_ne!(a, b);
        let copy = a;
        assert_eq!(a, copy);
        assert_ne!(a, a.with_efficiency(3));
        assert_eq!(a.item_id, items::SPIRIT_PICKAXE);
    }

    #[test]
    fn test_effective_tags() {
        assert_eq!(ToolKind::Pickaxe.effective_tag(), MaterialTag::MineablePickaxe);
        assert_eq!(ToolKind::Shovel.effective_tag(), MaterialTag::MineableShovel);
    }

    #[test]
    fn test_token_serde() {
        let token = SummonToken::new(ToolKind::Axe, ToolTier::Diamond).with_efficiency(2);
        let json = serde_json::to_string(&token).unwrap();
        let back: SummonToken = serde_json::from_str(&json).unwrap();
        assert_eq!(token, back);
        assert!(json.contains("\"diamond\""));
    }
}
