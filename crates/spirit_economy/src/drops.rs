//! # Drop Tables
//!
//! What a broken block yields: item stacks plus experience. Rules can require
//! a tool kind and a minimum tier; a block broken without them drops nothing.
//!
//! ## Table Format
//!
//! ```toml
//! [[drop]]
//! material = 56
//! tool = "pickaxe"
//! min_tier = "iron"
//! experience = 5
//! items = [{ item_id = 264, count = 1 }]
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spirit_world::MaterialId;
use tracing::info;

use crate::error::{EconomyError, EconomyResult};
use crate::item::{items, ItemStack, SummonToken, ToolKind, ToolTier};

/// Drop rule for one material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRule {
    /// Material this rule applies to.
    pub material: MaterialId,
    /// Items dropped.
    #[serde(default)]
    pub items: Vec<ItemStack>,
    /// Experience released.
    #[serde(default)]
    pub experience: u32,
    /// Tool kind required for any drop.
    #[serde(default)]
    pub tool: Option<ToolKind>,
    /// Minimum tool tier required for any drop.
    #[serde(default)]
    pub min_tier: Option<ToolTier>,
}

impl DropRule {
    /// Creates a rule dropping a single stack.
    #[must_use]
    pub fn single(material: MaterialId, item: ItemStack) -> Self {
        Self {
            material,
            items: vec![item],
            experience: 0,
            tool: None,
            min_tier: None,
        }
    }

    /// Builder: sets released experience.
    #[must_use]
    pub fn with_experience(mut self, experience: u32) -> Self {
        self.experience = experience;
        self
    }

    /// Builder: requires a tool kind and minimum tier.
    #[must_use]
    pub fn requires(mut self, tool: ToolKind, min_tier: ToolTier) -> Self {
        self.tool = Some(tool);
        self.min_tier = Some(min_tier);
        self
    }

    /// Whether breaking with `token` (or bare-handed) satisfies this rule.
    #[must_use]
    pub fn satisfied_by(&self, token: Option<&SummonToken>) -> bool {
        let kind_ok = self
            .tool
            .map_or(true, |kind| token.is_some_and(|t| t.kind == kind));
        let tier_ok = self
            .min_tier
            .map_or(true, |tier| token.is_some_and(|t| t.tier >= tier));
        kind_ok && tier_ok
    }
}

#[derive(Deserialize)]
struct DropFile {
    #[serde(default)]
    drop: Vec<DropRule>,
}

/// Registry of drop rules keyed by material.
///
/// Materials without a rule drop nothing and release no experience.
#[derive(Clone, Debug)]
pub struct DropTable {
    rules: HashMap<MaterialId, DropRule>,
}

impl DropTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Adds or replaces a rule.
    pub fn insert(&mut self, rule: DropRule) -> Option<DropRule> {
        self.rules.insert(rule.material, rule)
    }

    /// Parses a table from TOML.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InvalidConfig` if the TOML is malformed or a
    /// material has two rules.
    pub fn from_toml_str(source: &str) -> EconomyResult<Self> {
        let file: DropFile = toml::from_str(source)
            .map_err(|e| EconomyError::InvalidConfig(format!("drop table: {e}")))?;

        let mut table = Self::empty();
        for rule in file.drop {
            let material = rule.material;
            if table.insert(rule).is_some() {
                return Err(EconomyError::InvalidConfig(format!(
                    "drop table: material {material} has more than one rule"
                )));
            }
        }
        Ok(table)
    }

    /// Loads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `EconomyError::InvalidConfig` if the file cannot be read or
    /// parsed.
    pub fn load(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            EconomyError::InvalidConfig(format!("failed to read {}: {e}", path.display()))
        })?;
        let table = Self::from_toml_str(&source)?;
        info!(path = %path.display(), rules = table.len(), "Drop table loaded");
        Ok(table)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the table has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up the rule for a material.
    #[must_use]
    pub fn rule(&self, material: MaterialId) -> Option<&DropRule> {
        self.rules.get(&material)
    }

    /// Items dropped when `material` is broken with `token`.
    #[must_use]
    pub fn resolve(&self, material: MaterialId, token: Option<&SummonToken>) -> Vec<ItemStack> {
        self.rule(material)
            .filter(|rule| rule.satisfied_by(token))
            .map(|rule| rule.items.iter().copied().filter(|s| !s.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Experience released when `material` is broken with `token`.
    #[must_use]
    pub fn experience(&self, material: MaterialId, token: Option<&SummonToken>) -> u32 {
        self.rule(material)
            .filter(|rule| rule.satisfied_by(token))
            .map_or(0, |rule| rule.experience)
    }
}

impl Default for DropTable {
    /// The built-in table for the default materials.
    fn default() -> Self {
        let rules = [
            DropRule::single(MaterialId::STONE, ItemStack::new(items::COBBLESTONE, 1))
                .requires(ToolKind::Pickaxe, ToolTier::Wood),
            DropRule::single(MaterialId::GRASS, ItemStack::new(items::DIRT, 1)),
            DropRule::single(MaterialId::DIRT, ItemStack::new(items::DIRT, 1)),
            DropRule::single(MaterialId::SAND, ItemStack::new(items::SAND, 1)),
            DropRule::single(MaterialId::OAK_LOG, ItemStack::new(items::OAK_LOG, 1)),
            DropRule::single(MaterialId::COAL_ORE, ItemStack::new(items::COAL, 1))
                .requires(ToolKind::Pickaxe, ToolTier::Wood)
                .with_experience(1),
            DropRule::single(MaterialId::IRON_ORE, ItemStack::new(items::RAW_IRON, 1))
                .requires(ToolKind::Pickaxe, ToolTier::Stone),
            DropRule::single(MaterialId::DIAMOND_ORE, ItemStack::new(items::DIAMOND, 1))
                .requires(ToolKind::Pickaxe, ToolTier::Iron)
                .with_experience(5),
            DropRule::single(MaterialId::OBSIDIAN, ItemStack::new(items::OBSIDIAN, 1))
                .requires(ToolKind::Pickaxe, ToolTier::Diamond),
        ];

        let mut table = Self::empty();
        for rule in rules {
            table.insert(rule);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stone() {
        let table = DropTable::default();
        let pick = SummonToken::new(ToolKind::Pickaxe, ToolTier::Wood);

        assert_eq!(
            table.resolve(MaterialId::STONE, Some(&pick)),
            vec![ItemStack::new(items::COBBLESTONE, 1)]
        );
        assert!(table.resolve(MaterialId::STONE, None).is_empty());
    }

    #[test]
    fn test_tier_requirement() {
        let table = DropTable::default();
        let stone_pick = SummonToken::new(ToolKind::Pickaxe, ToolTier::Stone);
        let iron_pick = SummonToken::new(ToolKind::Pickaxe, ToolTier::Iron);

        assert!(table.resolve(MaterialId::DIAMOND_ORE, Some(&stone_pick)).is_empty());
        assert_eq!(table.experience(MaterialId::DIAMOND_ORE, Some(&stone_pick)), 0);
        assert_eq!(table.resolve(MaterialId::DIAMOND_ORE, Some(&iron_pick)).len(), 1);
        assert_eq!(table.experience(MaterialId::DIAMOND_ORE, Some(&iron_pick)), 5);
    }

    #[test]
    fn test_wrong_tool_kind() {
        let table = DropTable::default();
        let shovel = SummonToken::new(ToolKind::Shovel, ToolTier::Netherite);
        assert!(table.resolve(MaterialId::COAL_ORE, Some(&shovel)).is_empty());
        assert_eq!(table.resolve(MaterialId::DIRT, Some(&shovel)).len(), 1);
    }

    #[test]
    fn test_unknown_material_drops_nothing() {
        let table = DropTable::default();
        assert!(table.resolve(MaterialId::BEDROCK, None).is_empty());
        assert_eq!(table.experience(MaterialId::new(999), None), 0);
    }

    #[test]
    fn test_from_toml() {
        let table = DropTable::from_toml_str(
            r#"
            [[drop]]
            material = 56
            tool = "pickaxe"
            min_tier = "iron"
            experience = 5
            items = [{ item_id = 264, count = 2 }]

            [[drop]]
            material = 3
            items = [{ item_id = 3, count = 1 }]
            "#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let pick = SummonToken::new(ToolKind::Pickaxe, ToolTier::Diamond);
        assert_eq!(
            table.resolve(MaterialId::DIAMOND_ORE, Some(&pick)),
            vec![ItemStack::new(items::DIAMOND, 2)]
        );
        assert_eq!(table.rule(MaterialId::DIRT).map(|r| r.experience), Some(0));
    }

    #[test]
    fn test_duplicate_rule_rejected() {
        let result = DropTable::from_toml_str(
            r#"
            [[drop]]
            material = 3

            [[drop]]
            material = 3
            "#,
        );
        assert!(matches!(result, Err(EconomyError::InvalidConfig(_))));
    }
}
