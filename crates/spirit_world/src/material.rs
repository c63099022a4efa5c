//! # Materials
//!
//! Every block cell holds a `MaterialId`. What a material *means* (how hard
//! it is, which tools are effective, whether it has a collision shape) lives
//! in a `MaterialTable`, an injected read-only registry.
//!
//! ## Table Format
//!
//! ```toml
//! [[material]]
//! id = 2
//! name = "stone"
//! hardness = 1.5
//! tags = ["mineable_pickaxe"]
//!
//! [[material]]
//! id = 7
//! name = "bedrock"
//! hardness = -1.0
//! ```
//!
//! A negative hardness means the material can never be broken.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{WorldError, WorldResult};

/// Identifies a material kind (stone, ore, air...).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub u16);

impl MaterialId {
    /// Empty space.
    pub const AIR: Self = Self(0);
    /// Grass block.
    pub const GRASS: Self = Self(1);
    /// Stone.
    pub const STONE: Self = Self(2);
    /// Dirt.
    pub const DIRT: Self = Self(3);
    /// Oak log.
    pub const OAK_LOG: Self = Self(4);
    /// Leaves.
    pub const LEAVES: Self = Self(5);
    /// Bedrock (unbreakable).
    pub const BEDROCK: Self = Self(7);
    /// Water.
    pub const WATER: Self = Self(10);
    /// Sand.
    pub const SAND: Self = Self(11);
    /// Lava.
    pub const LAVA: Self = Self(12);
    /// Iron ore.
    pub const IRON_ORE: Self = Self(15);
    /// Coal ore.
    pub const COAL_ORE: Self = Self(16);
    /// Obsidian.
    pub const OBSIDIAN: Self = Self(49);
    /// Diamond ore.
    pub const DIAMOND_ORE: Self = Self(56);

    /// Creates a material ID.
    #[inline]
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Raw numeric ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns true for empty space.
    #[inline]
    #[must_use]
    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How hard a material is to break.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub enum Hardness {
    /// Can never be broken.
    Unbreakable,
    /// Breaks after enough work; `0.0` breaks instantly.
    Finite(f32),
}

impl Hardness {
    /// Returns true if this material can never be broken.
    #[inline]
    #[must_use]
    pub const fn is_unbreakable(self) -> bool {
        matches!(self, Self::Unbreakable)
    }

    /// Returns true if the value can drive break progress: unbreakable, or
    /// finite and non-negative.
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        match self {
            Self::Unbreakable => true,
            Self::Finite(h) => h.is_finite() && h >= 0.0,
        }
    }
}

impl Default for Hardness {
    fn default() -> Self {
        Self::Finite(0.0)
    }
}

impl From<f32> for Hardness {
    /// Negative and non-finite values (NaN, infinity) are unbreakable.
    fn from(value: f32) -> Self {
        if value.is_finite() && value >= 0.0 {
            Self::Finite(value)
        } else {
            Self::Unbreakable
        }
    }
}

impl From<Hardness> for f32 {
    fn from(value: Hardness) -> Self {
        match value {
            Hardness::Unbreakable => -1.0,
            Hardness::Finite(h) => h,
        }
    }
}

/// Material classification tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MaterialTag {
    /// Pickaxes are effective.
    MineablePickaxe = 0,
    /// Axes are effective.
    MineableAxe = 1,
    /// Shovels are effective.
    MineableShovel = 2,
    /// Hoes are effective.
    MineableHoe = 3,
    /// Requires at least a stone-tier tool.
    NeedsStoneTool = 4,
    /// Requires at least an iron-tier tool.
    NeedsIronTool = 5,
    /// Requires at least a diamond-tier tool.
    NeedsDiamondTool = 6,
    /// Water; slows anything submerged in it.
    Water = 7,
    /// Lava.
    Lava = 8,
}

impl MaterialTag {
    #[inline]
    const fn bit(self) -> u32 {
        1 << self as u8
    }
}

/// Bit set of `MaterialTag`s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<MaterialTag>", into = "Vec<MaterialTag>")]
pub struct TagSet(u32);

impl TagSet {
    /// No tags.
    pub const EMPTY: Self = Self(0);

    const ALL_TAGS: [MaterialTag; 9] = [
        MaterialTag::MineablePickaxe,
        MaterialTag::MineableAxe,
        MaterialTag::MineableShovel,
        MaterialTag::MineableHoe,
        MaterialTag::NeedsStoneTool,
        MaterialTag::NeedsIronTool,
        MaterialTag::NeedsDiamondTool,
        MaterialTag::Water,
        MaterialTag::Lava,
    ];

    /// Checks if a tag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, tag: MaterialTag) -> bool {
        self.0 & tag.bit() != 0
    }

    /// Returns a copy with the tag set.
    #[inline]
    #[must_use]
    pub const fn with(self, tag: MaterialTag) -> Self {
        Self(self.0 | tag.bit())
    }

    /// Iterates the tags in the set.
    pub fn iter(self) -> impl Iterator<Item = MaterialTag> {
        Self::ALL_TAGS.into_iter().filter(move |tag| self.has(*tag))
    }
}

impl From<Vec<MaterialTag>> for TagSet {
    fn from(tags: Vec<MaterialTag>) -> Self {
        tags.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl From<TagSet> for Vec<MaterialTag> {
    fn from(set: TagSet) -> Self {
        set.iter().collect()
    }
}

impl<const N: usize> From<[MaterialTag; N]> for TagSet {
    fn from(tags: [MaterialTag; N]) -> Self {
        tags.into_iter().fold(Self::EMPTY, Self::with)
    }
}

fn default_collision() -> bool {
    true
}

/// Definition of one material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Material ID stored in block cells.
    pub id: MaterialId,
    /// Registry name.
    pub name: String,
    /// Breaking hardness.
    #[serde(default)]
    pub hardness: Hardness,
    /// Classification tags.
    #[serde(default)]
    pub tags: TagSet,
    /// Whether the block has a collision shape.
    #[serde(default = "default_collision")]
    pub collision: bool,
}

impl MaterialDef {
    /// Creates a solid material without tags.
    #[must_use]
    pub fn new(id: MaterialId, name: impl Into<String>, hardness: Hardness) -> Self {
        Self {
            id,
            name: name.into(),
            hardness,
            tags: TagSet::EMPTY,
            collision: true,
        }
    }

    /// Builder: sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<TagSet>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Builder: marks the material as having no collision shape.
    #[must_use]
    pub fn passable(mut self) -> Self {
        self.collision = false;
        self
    }
}

#[derive(Deserialize)]
struct MaterialFile {
    #[serde(default)]
    material: Vec<MaterialDef>,
}

/// Registry of material definitions.
///
/// Unknown IDs behave like air: zero hardness, no tags, no collision.
#[derive(Clone, Debug)]
pub struct MaterialTable {
    materials: HashMap<MaterialId, MaterialDef>,
    by_name: HashMap<String, MaterialId>,
}

impl MaterialTable {
    /// Creates an empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            materials: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registers a material.
    ///
    /// # Errors
    ///
    /// Returns `WorldError::DuplicateMaterial` if the ID or name is taken,
    /// or `WorldError::InvalidMaterial` if the hardness is negative or not
    /// finite.
    pub fn register(&mut self, def: MaterialDef) -> WorldResult<()> {
        if !def.hardness.is_valid() {
            return Err(WorldError::InvalidMaterial {
                name: def.name,
                reason: format!("hardness {:?} is not a finite non-negative value", def.hardness),
            });
        }
        if self.materials.contains_key(&def.id) || self.by_name.contains_key(&def.name) {
            return Err(WorldError::DuplicateMaterial {
                id: def.id.raw(),
                name: def.name,
            });
        }
        self.by_name.insert(def.name.clone(), def.id);
        self.materials.insert(def.id, def);
        Ok(())
    }

    /// Parses a table from TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or a material is duplicated.
    pub fn from_toml_str(source: &str) -> WorldResult<Self> {
        let file: MaterialFile = toml::from_str(source)?;
        let mut table = Self::empty();
        for def in file.material {
            table.register(def)?;
        }
        Ok(table)
    }

    /// Loads a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> WorldResult<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let table = Self::from_toml_str(&source)?;
        info!(path = %path.display(), materials = table.len(), "Material table loaded");
        Ok(table)
    }

    /// Number of registered materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns true if no materials are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Looks up a definition.
    #[must_use]
    pub fn get(&self, id: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(&id)
    }

    /// Looks up a material ID by registry name.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<MaterialId> {
        self.by_name.get(name).copied()
    }

    /// Hardness of a material.
    #[must_use]
    pub fn hardness(&self, id: MaterialId) -> Hardness {
        self.get(id).map_or_else(Hardness::default, |def| def.hardness)
    }

    /// Tags of a material.
    #[must_use]
    pub fn tags(&self, id: MaterialId) -> TagSet {
        self.get(id).map_or(TagSet::EMPTY, |def| def.tags)
    }

    /// Checks a single tag.
    #[must_use]
    pub fn has_tag(&self, id: MaterialId, tag: MaterialTag) -> bool {
        self.tags(id).has(tag)
    }

    /// Whether blocks of this material have a collision shape.
    #[must_use]
    pub fn has_collision(&self, id: MaterialId) -> bool {
        self.get(id).is_some_and(|def| def.collision)
    }
}

impl Default for MaterialTable {
    /// The built-in table covering every `MaterialId` constant.
    fn default() -> Self {
        use MaterialTag::{
            Lava, MineableAxe, MineableHoe, MineablePickaxe, MineableShovel, NeedsDiamondTool,
            NeedsIronTool, NeedsStoneTool, Water,
        };

        let defs = [
            MaterialDef::new(MaterialId::AIR, "air", Hardness::Finite(0.0)).passable(),
            MaterialDef::new(MaterialId::GRASS, "grass_block", Hardness::Finite(0.6))
                .with_tags([MineableShovel]),
            MaterialDef::new(MaterialId::STONE, "stone", Hardness::Finite(1.5))
                .with_tags([MineablePickaxe]),
            MaterialDef::new(MaterialId::DIRT, "dirt", Hardness::Finite(0.5))
                .with_tags([MineableShovel]),
            MaterialDef::new(MaterialId::OAK_LOG, "oak_log", Hardness::Finite(2.0))
                .with_tags([MineableAxe]),
            MaterialDef::new(MaterialId::LEAVES, "leaves", Hardness::Finite(0.2))
                .with_tags([MineableHoe]),
            MaterialDef::new(MaterialId::BEDROCK, "bedrock", Hardness::Unbreakable),
            MaterialDef::new(MaterialId::WATER, "water", Hardness::Finite(100.0))
                .with_tags([Water])
                .passable(),
            MaterialDef::new(MaterialId::SAND, "sand", Hardness::Finite(0.5))
                .with_tags([MineableShovel]),
            MaterialDef::new(MaterialId::LAVA, "lava", Hardness::Finite(100.0))
                .with_tags([Lava])
                .passable(),
            MaterialDef::new(MaterialId::IRON_ORE, "iron_ore", Hardness::Finite(3.0))
                .with_tags([MineablePickaxe, NeedsStoneTool]),
            MaterialDef::new(MaterialId::COAL_ORE, "coal_ore", Hardness::Finite(3.0))
                .with_tags([MineablePickaxe]),
            MaterialDef::new(MaterialId::OBSIDIAN, "obsidian", Hardness::Finite(50.0))
                .with_tags([MineablePickaxe, NeedsDiamondTool]),
            MaterialDef::new(MaterialId::DIAMOND_ORE, "diamond_ore", Hardness::Finite(3.0))
                .with_tags([MineablePickaxe, NeedsIronTool]),
        ];

        let mut table = Self::empty();
        for def in defs {
            table.by_name.insert(def.name.clone(), def.id);
            table.materials.insert(def.id, def);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardness_from_negative_is_unbreakable() {
        assert_eq!(Hardness::from(-1.0), Hardness::Unbreakable);
        assert_eq!(Hardness::from(1.5), Hardness::Finite(1.5));
        assert_eq!(f32::from(Hardness::Unbreakable), -1.0);
    }

    #[test]
    fn test_hardness_from_non_finite_is_unbreakable() {
        assert_eq!(Hardness::from(f32::NAN), Hardness::Unbreakable);
        assert_eq!(Hardness::from(f32::INFINITY), Hardness::Unbreakable);
        assert_eq!(Hardness::from(0.0), Hardness::Finite(0.0));
    }

    #[test]
    fn test_non_finite_hardness_in_toml_loads_unbreakable() {
        let table = MaterialTable::from_toml_str(
            r#"
            [[material]]
            id = 2
            name = "stone"
            hardness = nan
            tags = ["mineable_pickaxe"]

            [[material]]
            id = 3
            name = "dirt"
            hardness = inf
            "#,
        )
        .unwrap();

        assert!(table.hardness(MaterialId::STONE).is_unbreakable());
        assert!(table.hardness(MaterialId::DIRT).is_unbreakable());
    }

    #[test]
    fn test_register_rejects_invalid_hardness() {
        let mut table = MaterialTable::empty();
        for (id, hardness) in [(1, f32::NAN), (2, f32::INFINITY), (3, -0.5)] {
            let def = MaterialDef::new(MaterialId::new(id), format!("odd_{id}"), Hardness::Finite(hardness));
            assert!(matches!(table.register(def), Err(WorldError::InvalidMaterial { .. })));
        }
        assert!(table.is_empty());

        let ok = MaterialDef::new(MaterialId::STONE, "stone", Hardness::Finite(1.5));
        assert!(table.register(ok).is_ok());
    }

    #[test]
    fn test_tag_set() {
        let tags = TagSet::from([MaterialTag::MineablePickaxe, MaterialTag::NeedsIronTool]);
        assert!(tags.has(MaterialTag::MineablePickaxe));
        assert!(tags.has(MaterialTag::NeedsIronTool));
        assert!(!tags.has(MaterialTag::Water));
        assert_eq!(tags.iter().count(), 2);
    }

    #[test]
    fn test_default_table() {
        let table = MaterialTable::default();
        assert_eq!(table.hardness(MaterialId::STONE), Hardness::Finite(1.5));
        assert!(table.hardness(MaterialId::BEDROCK).is_unbreakable());
        assert!(table.has_tag(MaterialId::WATER, MaterialTag::Water));
        assert!(!table.has_collision(MaterialId::AIR));
        assert!(table.has_collision(MaterialId::STONE));
        assert_eq!(table.id_of("diamond_ore"), Some(MaterialId::DIAMOND_ORE));
    }

    #[test]
    fn test_unknown_material_behaves_like_air() {
        let table = MaterialTable::default();
        let unknown = MaterialId::new(999);
        assert_eq!(table.hardness(unknown), Hardness::Finite(0.0));
        assert!(!table.has_collision(unknown));
        assert_eq!(table.tags(unknown), TagSet::EMPTY);
    }

    #[test]
    fn test_from_toml() {
        let table = MaterialTable::from_toml_str(
            r#"
            [[material]]
            id = 2
            name = "stone"
            hardness = 1.5
            tags = ["mineable_pickaxe"]

            [[material]]
            id = 7
            name = "bedrock"
            hardness = -1.0

            [[material]]
            id = 10
            name = "water"
            hardness = 100.0
            tags = ["water"]
            collision = false
            "#,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.has_tag(MaterialId::STONE, MaterialTag::MineablePickaxe));
        assert!(table.hardness(MaterialId::BEDROCK).is_unbreakable());
        assert!(table.has_collision(MaterialId::BEDROCK));
        assert!(!table.has_collision(MaterialId::WATER));
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let result = MaterialTable::from_toml_str(
            r#"
            [[material]]
            id = 2
            name = "stone"

            [[material]]
            id = 2
            name = "granite"
            "#,
        );
        assert!(matches!(result, Err(WorldError::DuplicateMaterial { id: 2, .. })));
    }

    #[test]
    fn test_malformed_toml() {
        let result = MaterialTable::from_toml_str("[[material]\nid = ");
        assert!(matches!(result, Err(WorldError::Config(_))));
    }
}
