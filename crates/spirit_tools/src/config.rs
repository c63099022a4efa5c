//! # Agent Configuration
//!
//! Every tunable of the agent lifecycle, loadable from TOML. Missing keys
//! fall back to the defaults in `spirit_shared::constants`.
//!
//! ```toml
//! summon_range = 20.0
//! despawn_age = 200
//! search_radius = 5.0
//!
//! [range_policy]
//! kind = "grace_window"
//! ticks = 20
//!
//! [tiers.iron]
//! speed = 6.0
//! mining_level = 2
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use spirit_economy::ToolTier;
use spirit_shared::{DESPAWN_AGE, OUT_OF_RANGE_GRACE_TICKS, SEARCH_RADIUS, SUMMON_RANGE};

use crate::error::{SpiritError, SpiritResult};

/// What happens when the owner fails the range/possession check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RangePolicy {
    /// Return on the first failing tick.
    HardCutoff,
    /// Idle through up to `ticks` consecutive failing ticks, return after.
    GraceWindow {
        /// Failing ticks tolerated.
        ticks: u32,
    },
}

impl Default for RangePolicy {
    fn default() -> Self {
        Self::GraceWindow {
            ticks: OUT_OF_RANGE_GRACE_TICKS,
        }
    }
}

/// Speed and mining level of one tool tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TierStats {
    /// Base breaking speed.
    pub speed: f32,
    /// Mining level: 1 = stone, 2 = iron, 3 = diamond requirements met.
    pub mining_level: u8,
}

impl TierStats {
    /// Creates tier stats.
    #[must_use]
    pub const fn new(speed: f32, mining_level: u8) -> Self {
        Self {
            speed,
            mining_level,
        }
    }
}

/// Stats for every tool tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierTable {
    /// Wooden tools.
    pub wood: TierStats,
    /// Stone tools.
    pub stone: TierStats,
    /// Iron tools.
    pub iron: TierStats,
    /// Diamond tools.
    pub diamond: TierStats,
    /// Netherite tools.
    pub netherite: TierStats,
}

impl TierTable {
    /// Stats for a tier.
    #[must_use]
    pub const fn stats(&self, tier: ToolTier) -> TierStats {
        match tier {
            ToolTier::Wood => self.wood,
            ToolTier::Stone => self.stone,
            ToolTier::Iron => self.iron,
            ToolTier::Diamond => self.diamond,
            ToolTier::Netherite => self.netherite,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            wood: TierStats::new(2.0, 0),
            stone: TierStats::new(4.0, 1),
            iron: TierStats::new(6.0, 2),
            diamond: TierStats::new(8.0, 3),
            netherite: TierStats::new(9.0, 4),
        }
    }
}

/// Agent lifecycle configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiritConfig {
    /// Owner distance (blocks) at which the range check fails.
    pub summon_range: f32,
    /// Age (ticks) at which an agent is forced to return.
    pub despawn_age: u32,
    /// Flood-fill radius (blocks) around the clicked block.
    pub search_radius: f32,
    /// Reaction to a failing range/possession check.
    pub range_policy: RangePolicy,
    /// Tool tier stats.
    pub tiers: TierTable,
}

impl Default for SpiritConfig {
    fn default() -> Self {
        Self {
            summon_range: SUMMON_RANGE,
            despawn_age: DESPAWN_AGE,
            search_radius: SEARCH_RADIUS,
            range_policy: RangePolicy::default(),
            tiers: TierTable::default(),
        }
    }
}

impl SpiritConfig {
    /// Parses and validates a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::ConfigParse` for malformed TOML and
    /// `SpiritError::InvalidConfig` for out-of-range values.
    pub fn from_toml_str(source: &str) -> SpiritResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> SpiritResult<Self> {
        let path = path.as_ref();
        let config = Self::from_toml_str(&fs::read_to_string(path)?)?;
        tracing::info!(
            path = %path.display(),
            summon_range = config.summon_range,
            despawn_age = config.despawn_age,
            search_radius = config.search_radius,
            "Spirit config loaded"
        );
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> SpiritResult<()> {
        if !(self.summon_range.is_finite() && self.summon_range > 0.0) {
            return Err(SpiritError::InvalidConfig(format!(
                "summon_range must be positive, got {}",
                self.summon_range
            )));
        }
        if !(self.search_radius.is_finite() && self.search_radius >= 0.0) {
            return Err(SpiritError::InvalidConfig(format!(
                "search_radius must not be negative, got {}",
                self.search_radius
            )));
        }
        for tier in ToolTier::ALL {
            let speed = self.tiers.stats(tier).speed;
            if !(speed.is_finite() && speed > 0.0) {
                return Err(SpiritError::InvalidConfig(format!(
                    "tier {tier:?} speed must be positive, got {speed}"
                )));
            }
        }
        Ok(())
    }

    /// Squared summon range.
    #[inline]
    #[must_use]
    pub fn summon_range_sq(&self) -> f32 {
        self.summon_range * self.summon_range
    }
}
