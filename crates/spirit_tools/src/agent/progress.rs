//! # Break Progress
//!
//! Breaking is simulated as a per-tick delta:
//!
//! ```text
//! speed = tier_speed + (e² + 1 if e > 0)     e = efficiency level
//! speed = speed / 5                          if submerged in water
//! delta = speed / hardness / 30              0 if unbreakable
//! ```
//!
//! After `n` accumulation ticks the progress is `delta * n`; the block
//! breaks once it reaches 1. The visible stage is `floor(progress * 10)`.

use spirit_economy::SummonToken;
use spirit_world::Hardness;

use crate::config::TierTable;

/// Speed of a bare hand (no token).
pub const HAND_SPEED: f32 = 1.0;

/// Divisor applied when the agent is under water.
pub const SUBMERGED_PENALTY: f32 = 5.0;

/// Hardness-to-ticks scale.
const HARDNESS_SCALE: f32 = 30.0;

/// Inputs to the breaking speed of a tool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolSpeed {
    /// Base speed of the tool tier.
    pub base: f32,
    /// Efficiency enchantment level.
    pub efficiency: u8,
    /// Whether the tool is under water.
    pub submerged: bool,
}

impl ToolSpeed {
    /// Speed of a token, dry.
    #[must_use]
    pub const fn for_token(token: &SummonToken, tiers: &TierTable) -> Self {
        Self {
            base: tiers.stats(token.tier).speed,
            efficiency: token.efficiency,
            submerged: false,
        }
    }

    /// Speed without any tool.
    #[must_use]
    pub const fn hand() -> Self {
        Self {
            base: HAND_SPEED,
            efficiency: 0,
            submerged: false,
        }
    }

    /// Builder: sets whether the tool is under water.
    #[must_use]
    pub const fn submerged(mut self, submerged: bool) -> Self {
        self.submerged = submerged;
        self
    }

    /// Speed after enchantment and submersion.
    #[must_use]
    pub fn effective(self) -> f32 {
        let mut speed = self.base;
        if self.efficiency > 0 {
            let e = f32::from(self.efficiency);
            speed += e * e + 1.0;
        }
        if self.submerged {
            speed /= SUBMERGED_PENALTY;
        }
        speed
    }
}

/// Progress gained per accumulation tick.
#[must_use]
pub fn breaking_speed(hardness: Hardness, tool: ToolSpeed) -> f32 {
    match hardness {
        Hardness::Unbreakable => 0.0,
        // Zero hardness breaks on the first accumulation tick.
        Hardness::Finite(h) if h <= 0.0 => f32::INFINITY,
        Hardness::Finite(h) => tool.effective() / h / HARDNESS_SCALE,
    }
}

/// Visible stage for a progress value, `0..=9`.
#[must_use]
pub fn stage(progress: f32) -> u8 {
    (progress * 10.0).floor().clamp(0.0, 9.0) as u8
}

/// Accumulation ticks needed to break with `delta`; 0 if it never breaks.
#[must_use]
pub fn ticks_to_break(delta: f32) -> u32 {
    if delta <= 0.0 {
        return 0;
    }
    (1.0 / delta).ceil().max(1.0) as u32
}

/// Accumulated work on the active block plus the stage last shown for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BreakProgress {
    ticks: u32,
    shown: Option<u8>,
}

impl BreakProgress {
    /// Progress restored from a record; nothing shown yet.
    #[must_use]
    pub const fn resumed(ticks: u32) -> Self {
        Self { ticks, shown: None }
    }

    /// Accumulation ticks so far.
    #[inline]
    #[must_use]
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Stage currently shown, `None` for no indicator.
    #[inline]
    #[must_use]
    pub const fn shown_stage(&self) -> Option<u8> {
        self.shown
    }

    /// Counts one more tick of work.
    pub fn accumulate(&mut self) -> u32 {
        self.ticks = self.ticks.saturating_add(1);
        self.ticks
    }

    /// Whether the accumulated work breaks the block.
    #[must_use]
    pub fn is_complete(&self, delta: f32) -> bool {
        delta * self.ticks as f32 >= 1.0
    }

    /// Records the stage for the current progress; returns it only if it
    /// differs from what is shown.
    pub fn stage_change(&mut self, delta: f32) -> Option<u8> {
        let current = stage(delta * self.ticks as f32);
        if self.shown == Some(current) {
            return None;
        }
        self.shown = Some(current);
        Some(current)
    }

    /// Resets for a new target.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spirit_economy::{ToolKind, ToolTier};

    fn tool(base: f32) -> ToolSpeed {
        ToolSpeed {
            base,
            efficiency: 0,
            submerged: false,
        }
    }

    #[test]
    fn test_breaking_speed_formula() {
        let delta = breaking_speed(Hardness::Finite(1.5), tool(8.0));
        assert!((delta - 8.0 / 1.5 / 30.0).abs() < 1e-6);
        assert_eq!(ticks_to_break(delta), 6);
    }

    #[test]
    fn test_unbreakable() {
        assert_eq!(breaking_speed(Hardness::Unbreakable, tool(9.0)), 0.0);
        assert_eq!(ticks_to_break(0.0), 0);
    }

    #[test]
    fn test_zero_hardness_is_instant() {
        let delta = breaking_speed(Hardness::Finite(0.0), tool(2.0));
        assert_eq!(ticks_to_break(delta), 1);
    }

    #[test]
    fn test_efficiency_bonus() {
        let speed = ToolSpeed {
            base: 6.0,
            efficiency: 3,
            submerged: false,
        };
        assert_eq!(speed.effective(), 16.0);
    }

    #[test]
    fn test_submerged_penalty() {
        assert_eq!(tool(10.0).submerged(true).effective(), 2.0);
    }

    #[test]
    fn test_for_token_uses_tier() {
        let token = SummonToken::new(ToolKind::Pickaxe, ToolTier::Diamond).with_efficiency(1);
        let speed = ToolSpeed::for_token(&token, &TierTable::default());
        assert_eq!(speed.base, 8.0);
        assert_eq!(speed.effective(), 10.0);
    }

    #[test]
    fn test_stage_bounds() {
        assert_eq!(stage(0.0), 0);
        assert_eq!(stage(0.19), 1);
        assert_eq!(stage(0.95), 9);
        assert_eq!(stage(1.7), 9);
    }

    #[test]
    fn test_progress_completes_on_sixth_tick() {
        let delta = breaking_speed(Hardness::Finite(1.5), tool(8.0));
        let mut progress = BreakProgress::default();
        for _ in 0..5 {
            progress.accumulate();
            assert!(!progress.is_complete(delta));
        }
        progress.accumulate();
        assert!(progress.is_complete(delta));
    }

    #[test]
    fn test_stage_change_only_on_change() {
        // 0.045 per tick: stage moves every other tick
        let delta = 0.045;
        let mut progress = BreakProgress::default();
        let mut shown = Vec::new();
        for _ in 0..6 {
            progress.accumulate();
            if let Some(stage) = progress.stage_change(delta) {
                shown.push(stage);
            }
        }
        assert_eq!(shown, vec![0, 1, 2]);
        progress.reset();
        assert_eq!(progress.shown_stage(), None);
        assert_eq!(progress.ticks(), 0);
    }
}
