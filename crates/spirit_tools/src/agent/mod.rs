//! # Spirit Agent
//!
//! One summoned mining agent. The agent is plain state; its behavior lives
//! in the submodules:
//!
//! - `queue`: candidate positions and nearest-match selection
//! - `progress`: breaking speed and stage math
//! - `monitor`: owner link, range and possession, grace policy
//! - `controller`: the per-tick state machine and the return hand-off
//! - `record`: the durable JSON record

pub mod controller;
pub mod monitor;
pub mod progress;
pub mod queue;
pub mod record;

use std::collections::HashSet;

use spirit_core::{EntityId, PlayerId};
use spirit_economy::{ItemStack, SummonToken};
use spirit_shared::{BlockPos, Rotation, Vec3};
use spirit_world::MaterialId;

use crate::config::SpiritConfig;
use crate::error::SpiritResult;

pub use controller::{ReturnReason, ReturnReport, TickOutcome};
pub use monitor::{OwnerLink, RangeGuard, Verdict};
pub use progress::{BreakProgress, ToolSpeed};
pub use queue::MiningQueue;
pub use record::AgentRecord;

/// Coarse lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentPhase {
    /// No active target; the next tick selects one.
    Seeking,
    /// Breaking the active target.
    Mining,
    /// Loot handed off; the agent is gone.
    Returning,
}

/// A summoned mining agent.
#[derive(Clone, Debug)]
pub struct SpiritAgent {
    /// Own entity handle (used to key break indicators).
    id: EntityId,
    /// Ticks since spawn.
    age: u32,
    /// Weak owner reference.
    owner: OwnerLink,
    /// Token this agent was summoned with.
    token: Option<SummonToken>,
    /// Target material and candidates.
    queue: MiningQueue,
    /// Position being mined.
    active: Option<BlockPos>,
    /// Work on the active position.
    progress: BreakProgress,
    /// Harvested items.
    held_items: Vec<ItemStack>,
    /// Harvested experience.
    held_experience: u32,
    /// Consecutive failing owner checks.
    range_guard: RangeGuard,
    /// Placement.
    position: Vec3,
    /// Orientation.
    rotation: Rotation,
    /// Set once the return hand-off has run.
    discarded: bool,
}

impl SpiritAgent {
    /// Creates an idle agent with no owner, token or target.
    #[must_use]
    pub fn new(id: EntityId, position: Vec3) -> Self {
        Self {
            id,
            age: 0,
            owner: OwnerLink::default(),
            token: None,
            queue: MiningQueue::new(),
            active: None,
            progress: BreakProgress::default(),
            held_items: Vec::new(),
            held_experience: 0,
            range_guard: RangeGuard::default(),
            position,
            rotation: Rotation::default(),
            discarded: false,
        }
    }

    /// Sets the owner and its current live entity.
    pub fn set_owner(&mut self, owner: PlayerId, entity: EntityId) {
        self.owner = OwnerLink::new(owner, entity);
    }

    /// Sets the summoning token.
    pub fn set_token(&mut self, token: SummonToken) {
        self.token = Some(token);
    }

    /// Assigns the target material and merges candidate positions.
    ///
    /// Returns the positions that were not queued before.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::MaterialMismatch` if a different material is
    /// already assigned; nothing changes in that case.
    pub fn assign(
        &mut self,
        material: MaterialId,
        positions: impl IntoIterator<Item = BlockPos>,
    ) -> SpiritResult<HashSet<BlockPos>> {
        self.queue.assign(material, positions).inspect_err(|err| {
            tracing::warn!(agent = %self.id, %err, "Rejected material reassignment");
        })
    }

    /// Own entity handle.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Ticks since spawn.
    #[inline]
    #[must_use]
    pub const fn age(&self) -> u32 {
        self.age
    }

    /// Ticks left before a forced return.
    #[inline]
    #[must_use]
    pub const fn ticks_until_despawn(&self, config: &SpiritConfig) -> u32 {
        config.despawn_age.saturating_sub(self.age)
    }

    /// Durable owner identity.
    #[inline]
    #[must_use]
    pub const fn owner_id(&self) -> Option<PlayerId> {
        self.owner.id()
    }

    /// Summoning token.
    #[inline]
    #[must_use]
    pub const fn token(&self) -> Option<&SummonToken> {
        self.token.as_ref()
    }

    /// Target material, once assigned.
    #[inline]
    #[must_use]
    pub const fn target_material(&self) -> Option<MaterialId> {
        self.queue.material()
    }

    /// The work queue.
    #[inline]
    #[must_use]
    pub const fn queue(&self) -> &MiningQueue {
        &self.queue
    }

    /// Position being mined.
    #[inline]
    #[must_use]
    pub const fn active_position(&self) -> Option<BlockPos> {
        self.active
    }

    /// Accumulation ticks on the active position.
    #[inline]
    #[must_use]
    pub const fn progress_ticks(&self) -> u32 {
        self.progress.ticks()
    }

    /// Break stage currently shown, if any.
    #[inline]
    #[must_use]
    pub const fn progress_stage(&self) -> Option<u8> {
        self.progress.shown_stage()
    }

    /// Harvested items.
    #[inline]
    #[must_use]
    pub fn held_items(&self) -> &[ItemStack] {
        &self.held_items
    }

    /// Harvested experience.
    #[inline]
    #[must_use]
    pub const fn held_experience(&self) -> u32 {
        self.held_experience
    }

    /// Consecutive failing owner checks.
    #[inline]
    #[must_use]
    pub const fn outside_range_ticks(&self) -> u32 {
        self.range_guard.outside_ticks()
    }

    /// Placement.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Orientation.
    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Whether the return hand-off has run.
    #[inline]
    #[must_use]
    pub const fn is_discarded(&self) -> bool {
        self.discarded
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> AgentPhase {
        if self.discarded {
            AgentPhase::Returning
        } else if self.active.is_some() {
            AgentPhase::Mining
        } else {
            AgentPhase::Seeking
        }
    }

    /// Adds harvested stacks, merging with held stacks of the same item.
    fn absorb_items(&mut self, stacks: &[ItemStack]) {
        for stack in stacks.iter().filter(|s| !s.is_empty()) {
            match self.held_items.iter_mut().find(|held| held.item_id == stack.item_id) {
                Some(held) => held.count = held.count.saturating_add(stack.count),
                None => self.held_items.push(*stack),
            }
        }
    }
}
