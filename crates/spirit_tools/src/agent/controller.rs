//! # Lifecycle Controller
//!
//! One synchronous step per agent per world tick, in strict order:
//!
//! ```text
//! age += 1 ──(age >= despawn_age)──────────────────────────> return
//!    │
//! owner id? ──(none)─────────────────────────────────────> idle
//!    │
//! owner in range and holding the token? ──(policy)──> idle | return
//!    │
//! material assigned? ──(no)──────────────────────────────> idle
//!    │
//! no active target: pick nearest match ──(none)──────────> return
//!    │                 └─> orient, end tick
//! active target: accumulate ──> lost | unbreakable | mined | stage
//! ```
//!
//! Every failure resolves within the tick it is detected. Returning hands
//! loot to the owner, or drops it at the agent when the owner is gone;
//! nothing held is ever lost.

use spirit_economy::ItemStack;
use spirit_shared::{BlockPos, Rotation, AGENT_EYE_HEIGHT};
use spirit_world::MaterialId;

use super::monitor::{in_range_and_possessed, Verdict};
use super::progress::{breaking_speed, ToolSpeed};
use super::SpiritAgent;
use crate::config::SpiritConfig;
use crate::world::World;

/// Why an agent returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnReason {
    /// Reached the despawn age.
    Expired,
    /// Owner out of range, gone, or no longer holding the token.
    OwnerOutOfRange,
    /// No queued position still matches.
    Exhausted,
    /// Recalled on demand.
    Recalled,
}

/// What a return handed off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReturnReport {
    /// Why the agent returned.
    pub reason: ReturnReason,
    /// True if the owner received the loot, false if it was dropped at
    /// the agent's position.
    pub delivered_to_owner: bool,
    /// Stacks handed off.
    pub items: Vec<ItemStack>,
    /// Experience handed off.
    pub experience: u32,
}

/// Result of one controller step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing happened (no owner, grace window, no material).
    Idle,
    /// A target was selected; mining starts next tick.
    TargetAcquired(BlockPos),
    /// Work accumulated on the active target.
    Progressed {
        /// Target.
        pos: BlockPos,
        /// Accumulation ticks so far.
        ticks: u32,
        /// Stage shown.
        stage: Option<u8>,
    },
    /// The active target was abandoned (changed or unbreakable).
    TargetLost(BlockPos),
    /// The active target broke.
    BlockMined {
        /// Position of the broken block.
        pos: BlockPos,
        /// Material it held.
        material: MaterialId,
        /// Stacks harvested from it.
        items: Vec<ItemStack>,
        /// Experience harvested from it.
        experience: u32,
    },
    /// The agent handed off its loot and is gone.
    Returned(ReturnReport),
}

impl SpiritAgent {
    /// Advances the agent by one world tick.
    ///
    /// A discarded agent stays idle.
    pub fn tick<W: World + ?Sized>(&mut self, world: &mut W, config: &SpiritConfig) -> TickOutcome {
        if self.discarded {
            return TickOutcome::Idle;
        }

        self.age = self.age.saturating_add(1);
        if self.age >= config.despawn_age {
            return TickOutcome::Returned(self.return_to_owner(world, ReturnReason::Expired));
        }

        if self.owner.id().is_none() {
            return TickOutcome::Idle;
        }

        let passed = in_range_and_possessed(
            &mut self.owner,
            self.position,
            self.token.as_ref(),
            &*world,
            config.summon_range_sq(),
        );
        match self.range_guard.observe(passed, config.range_policy) {
            Verdict::Continue => {}
            Verdict::Idle => return TickOutcome::Idle,
            Verdict::Return => {
                return TickOutcome::Returned(self.return_to_owner(world, ReturnReason::OwnerOutOfRange));
            }
        }

        let Some(material) = self.queue.material() else {
            return TickOutcome::Idle;
        };

        match self.active {
            None => self.seek(world),
            Some(pos) => self.mine(world, config, pos, material),
        }
    }

    /// Forces a return on demand.
    ///
    /// Returns `None` if the agent already returned.
    pub fn recall<W: World + ?Sized>(&mut self, world: &mut W) -> Option<ReturnReport> {
        if self.discarded {
            return None;
        }
        tracing::info!(agent = %self.id, "Spirit recalled");
        Some(self.return_to_owner(world, ReturnReason::Recalled))
    }

    /// Selects the nearest matching position and turns toward it.
    fn seek<W: World + ?Sized>(&mut self, world: &mut W) -> TickOutcome {
        let Some(pos) = self.queue.next(&*world, self.position) else {
            return TickOutcome::Returned(self.return_to_owner(world, ReturnReason::Exhausted));
        };

        self.active = Some(pos);
        self.progress.reset();
        self.rotation = Rotation::looking_at(self.position.raised(AGENT_EYE_HEIGHT), pos.center());
        tracing::debug!(agent = %self.id, %pos, "Target acquired");
        TickOutcome::TargetAcquired(pos)
    }

    /// One tick of work on the active target.
    fn mine<W: World + ?Sized>(
        &mut self,
        world: &mut W,
        config: &SpiritConfig,
        pos: BlockPos,
        material: MaterialId,
    ) -> TickOutcome {
        let ticks = self.progress.accumulate();

        if world.material_at(pos) != material {
            tracing::debug!(agent = %self.id, %pos, "Target no longer matches");
            self.abandon(world, pos);
            return TickOutcome::TargetLost(pos);
        }

        let hardness = world.hardness_at(pos);
        let delta = breaking_speed(hardness, self.tool_speed(&*world, config));
        if hardness.is_unbreakable() || delta.is_nan() || delta <= 0.0 {
            tracing::debug!(agent = %self.id, %pos, "Target unbreakable, discarded");
            self.queue.discard(pos);
            self.abandon(world, pos);
            return TickOutcome::TargetLost(pos);
        }

        if self.progress.is_complete(delta) {
            return self.harvest(world, pos, material);
        }

        if let Some(stage) = self.progress.stage_change(delta) {
            tracing::trace!(agent = %self.id, %pos, stage, "Break stage");
            world.set_break_stage(self.id, pos, Some(stage));
        }
        TickOutcome::Progressed {
            pos,
            ticks,
            stage: self.progress.shown_stage(),
        }
    }

    /// Breaks the active target and keeps what it yields.
    fn harvest<W: World + ?Sized>(&mut self, world: &mut W, pos: BlockPos, material: MaterialId) -> TickOutcome {
        let items = world.drops_for(pos, material, self.token.as_ref());
        self.absorb_items(&items);

        world.release_experience(pos, material, self.token.as_ref());
        let experience = world.collect_fresh_experience(pos);
        self.held_experience = self.held_experience.saturating_add(experience);

        world.set_break_stage(self.id, pos, None);
        world.break_block(pos);
        self.active = None;
        self.progress.reset();

        tracing::debug!(agent = %self.id, %pos, %material, experience, "Block mined");
        TickOutcome::BlockMined {
            pos,
            material,
            items,
            experience,
        }
    }

    /// Drops the active target and clears its indicator.
    fn abandon<W: World + ?Sized>(&mut self, world: &mut W, pos: BlockPos) {
        world.set_break_stage(self.id, pos, None);
        self.active = None;
        self.progress.reset();
    }

    /// Tool speed at the agent's position.
    fn tool_speed<W: World + ?Sized>(&self, world: &W, config: &SpiritConfig) -> ToolSpeed {
        let speed = self
            .token
            .as_ref()
            .map_or_else(ToolSpeed::hand, |token| ToolSpeed::for_token(token, &config.tiers));
        speed.submerged(world.is_submerged(self.position.raised(AGENT_EYE_HEIGHT)))
    }

    /// Hands off all loot and marks the agent discarded.
    pub(crate) fn return_to_owner<W: World + ?Sized>(
        &mut self,
        world: &mut W,
        reason: ReturnReason,
    ) -> ReturnReport {
        if let Some(pos) = self.active.take() {
            world.set_break_stage(self.id, pos, None);
        }
        self.progress.reset();

        let items = std::mem::take(&mut self.held_items);
        let experience = std::mem::take(&mut self.held_experience);

        let owner = self.owner.resolve(&*world);
        match owner {
            Some(player) => {
                for stack in &items {
                    world.offer_or_drop(player, *stack);
                }
                if experience > 0 {
                    world.add_experience(player, experience);
                }
            }
            None => {
                for stack in &items {
                    world.spawn_item(self.position, *stack);
                }
                if experience > 0 {
                    world.spawn_experience(self.position, experience);
                }
            }
        }
        self.discarded = true;

        tracing::info!(
            agent = %self.id,
            ?reason,
            stacks = items.len(),
            experience,
            delivered = owner.is_some(),
            "Spirit returned"
        );
        ReturnReport {
            reason,
            delivered_to_owner: owner.is_some(),
            items,
            experience,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spirit_core::{EntityId, PlayerId};
    use spirit_economy::{DropTable, SummonToken, ToolKind, ToolTier};
    use spirit_shared::Vec3;
    use spirit_world::{BlockAccess, MaterialTable};

    use crate::config::RangePolicy;
    use crate::sandbox::SandboxWorld;

    fn setup(stone: &[BlockPos]) -> (SandboxWorld, SpiritAgent, SummonToken) {
        setup_in(SandboxWorld::new(), stone)
    }

    fn setup_in(mut world: SandboxWorld, stone: &[BlockPos]) -> (SandboxWorld, SpiritAgent, SummonToken) {
        for pos in stone {
            world.set_block(*pos, MaterialId::STONE);
        }
        let token = SummonToken::new(ToolKind::Pickaxe, ToolTier::Diamond);
        let owner = PlayerId::random();
        let player = world.add_player(owner, Vec3::new(0.5, 1.0, 0.5));
        world.give_token(player, token).unwrap();

        let mut agent = SpiritAgent::new(EntityId::new(7, 0), Vec3::new(0.0, 1.0, 0.0));
        agent.set_owner(owner, player);
        agent.set_token(token);
        agent.assign(MaterialId::STONE, stone.iter().copied()).unwrap();
        (world, agent, token)
    }

    #[test]
    fn test_acquire_then_mine() {
        let target = BlockPos::new(1, 0, 0);
        let (mut world, mut agent, _) = setup(&[target]);
        let config = SpiritConfig::default();

        assert_eq!(agent.tick(&mut world, &config), TickOutcome::TargetAcquired(target));
        assert_eq!(agent.phase(), crate::agent::AgentPhase::Mining);

        // Diamond pickaxe on stone: 8 / 1.5 / 30 per tick, six ticks
        for expected in 1..=5 {
            match agent.tick(&mut world, &config) {
                TickOutcome::Progressed { ticks, .. } => assert_eq!(ticks, expected),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(matches!(
            agent.tick(&mut world, &config),
            TickOutcome::BlockMined { pos, .. } if pos == target
        ));
        assert_eq!(world.material_at(target), MaterialId::AIR);
        assert_eq!(agent.progress_ticks(), 0);
        assert_eq!(agent.progress_stage(), None);
        assert_eq!(world.break_stage(agent.id(), target), None);
    }

    #[test]
    fn test_no_owner_idles() {
        let mut world = SandboxWorld::new();
        let mut agent = SpiritAgent::new(EntityId::new(1, 0), Vec3::ZERO);
        let config = SpiritConfig::default();

        assert_eq!(agent.tick(&mut world, &config), TickOutcome::Idle);
        assert_eq!(agent.age(), 1);
        assert!(!agent.is_discarded());
    }

    #[test]
    fn test_exhausted_queue_returns() {
        let (mut world, mut agent, _) = setup(&[]);
        let config = SpiritConfig::default();

        let outcome = agent.tick(&mut world, &config);
        assert!(matches!(
            outcome,
            TickOutcome::Returned(ReturnReport {
                reason: ReturnReason::Exhausted,
                delivered_to_owner: true,
                ..
            })
        ));
        assert!(agent.is_discarded());
        assert_eq!(agent.tick(&mut world, &config), TickOutcome::Idle);
    }

    #[test]
    fn test_hard_cutoff_returns_on_missing_token() {
        let target = BlockPos::new(1, 0, 0);
        let (mut world, mut agent, token) = setup(&[target]);
        let config = SpiritConfig {
            range_policy: RangePolicy::HardCutoff,
            ..SpiritConfig::default()
        };
        let player = world.players().next().map(|(id, _)| id).unwrap();
        world.take_token(player, &token);

        assert!(matches!(
            agent.tick(&mut world, &config),
            TickOutcome::Returned(ReturnReport {
                reason: ReturnReason::OwnerOutOfRange,
                ..
            })
        ));
    }

    #[test]
    fn test_recall_only_once() {
        let (mut world, mut agent, _) = setup(&[BlockPos::new(1, 0, 0)]);
        assert!(agent.recall(&mut world).is_some());
        assert!(agent.recall(&mut world).is_none());
    }

    #[test]
    fn test_nan_hardness_target_is_discarded() {
        let materials = MaterialTable::from_toml_str(
            r#"
            [[material]]
            id = 2
            name = "stone"
            hardness = nan
            tags = ["mineable_pickaxe"]
            "#,
        )
        .unwrap();
        let target = BlockPos::new(1, 0, 0);
        let (mut world, mut agent, _) = setup_in(SandboxWorld::with_tables(materials, DropTable::default()), &[target]);
        let config = SpiritConfig::default();

        assert_eq!(agent.tick(&mut world, &config), TickOutcome::TargetAcquired(target));
        assert_eq!(agent.tick(&mut world, &config), TickOutcome::TargetLost(target));
        assert!(!agent.queue().contains(target));
        assert_eq!(world.break_stage(agent.id(), target), None);
        assert_eq!(world.material_at(target), MaterialId::STONE);

        // Nothing left to mine
        assert!(matches!(
            agent.tick(&mut world, &config),
            TickOutcome::Returned(ReturnReport {
                reason: ReturnReason::Exhausted,
                ..
            })
        ));
    }
}
