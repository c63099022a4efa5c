//! # Owner Monitor
//!
//! An agent keeps working only while its owner is nearby and still carries
//! the summoning token.
//!
//! The owner is held weakly: a durable `PlayerId` plus a cached live
//! `EntityId`. The cache is trusted while the world reports it alive and is
//! re-resolved by `PlayerId` otherwise, so logouts, respawns and reloads
//! never leave a dangling reference.

use spirit_core::{EntityId, PlayerId};
use spirit_economy::SummonToken;
use spirit_shared::Vec3;

use crate::config::RangePolicy;
use crate::world::World;

/// Weak link to the owning player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OwnerLink {
    id: Option<PlayerId>,
    cached: Option<EntityId>,
}

impl OwnerLink {
    /// Link with a known live entity.
    #[must_use]
    pub const fn new(id: PlayerId, entity: EntityId) -> Self {
        Self {
            id: Some(id),
            cached: Some(entity),
        }
    }

    /// Link that resolves on first use.
    #[must_use]
    pub const fn unresolved(id: Option<PlayerId>) -> Self {
        Self { id, cached: None }
    }

    /// Durable owner identity.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> Option<PlayerId> {
        self.id
    }

    /// Live owner entity, re-resolving if the cached one is gone.
    pub fn resolve<W: World + ?Sized>(&mut self, world: &W) -> Option<EntityId> {
        let id = self.id?;
        if let Some(cached) = self.cached {
            if world.is_player_alive(cached) {
                return Some(cached);
            }
        }

        self.cached = world.resolve_player(id);
        if self.cached.is_none() {
            tracing::debug!(owner = %id, "Owner unresolved");
        }
        self.cached
    }
}

/// Whether the owner resolves, is strictly closer than the summon range,
/// and carries `token` in the main inventory or off-hand.
pub fn in_range_and_possessed<W: World + ?Sized>(
    owner: &mut OwnerLink,
    agent_position: Vec3,
    token: Option<&SummonToken>,
    world: &W,
    range_sq: f32,
) -> bool {
    let Some(player) = owner.resolve(world) else {
        return false;
    };
    let Some(player_position) = world.player_position(player) else {
        return false;
    };
    if agent_position.distance_squared(player_position) >= range_sq {
        return false;
    }
    token.is_some_and(|token| world.player_holds(player, token))
}

/// What the controller should do after a range check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Check passed; carry on.
    Continue,
    /// Check failed inside the grace window; skip the rest of this tick.
    Idle,
    /// Check failed for good; return to the owner.
    Return,
}

/// Counts consecutive failing range checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RangeGuard {
    outside_ticks: u32,
}

impl RangeGuard {
    /// Guard restored with a failing streak.
    #[must_use]
    pub const fn resumed(outside_ticks: u32) -> Self {
        Self { outside_ticks }
    }

    /// Current failing streak.
    #[inline]
    #[must_use]
    pub const fn outside_ticks(&self) -> u32 {
        self.outside_ticks
    }

    /// Feeds one check result through the policy.
    pub fn observe(&mut self, passed: bool, policy: RangePolicy) -> Verdict {
        if passed {
            if self.outside_ticks > 0 {
                tracing::debug!(after = self.outside_ticks, "Owner back in range");
            }
            self.outside_ticks = 0;
            return Verdict::Continue;
        }

        match policy {
            RangePolicy::HardCutoff => Verdict::Return,
            RangePolicy::GraceWindow { ticks } => {
                self.outside_ticks = self.outside_ticks.saturating_add(1);
                tracing::debug!(outside_ticks = self.outside_ticks, window = ticks, "Owner check failed");
                if self.outside_ticks > ticks {
                    Verdict::Return
                } else {
                    Verdict::Idle
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_cutoff() {
        let mut guard = RangeGuard::default();
        assert_eq!(guard.observe(true, RangePolicy::HardCutoff), Verdict::Continue);
        assert_eq!(guard.observe(false, RangePolicy::HardCutoff), Verdict::Return);
    }

    #[test]
    fn test_grace_window_counts_then_returns() {
        let policy = RangePolicy::GraceWindow { ticks: 3 };
        let mut guard = RangeGuard::default();

        for expected in 1..=3 {
            assert_eq!(guard.observe(false, policy), Verdict::Idle);
            assert_eq!(guard.outside_ticks(), expected);
        }
        assert_eq!(guard.observe(false, policy), Verdict::Return);
    }

    #[test]
    fn test_grace_window_resets_on_pass() {
        let policy = RangePolicy::GraceWindow { ticks: 2 };
        let mut guard = RangeGuard::default();

        guard.observe(false, policy);
        guard.observe(false, policy);
        assert_eq!(guard.observe(true, policy), Verdict::Continue);
        assert_eq!(guard.outside_ticks(), 0);
        assert_eq!(guard.observe(false, policy), Verdict::Idle);
    }

    #[test]
    fn test_zero_window_behaves_like_cutoff() {
        let mut guard = RangeGuard::default();
        assert_eq!(
            guard.observe(false, RangePolicy::GraceWindow { ticks: 0 }),
            Verdict::Return
        );
    }
}
