//! Shared fixture: a sandbox world with one player holding one spirit tool.

#![allow(dead_code)]

use spirit_core::{EntityId, PlayerId};
use spirit_economy::{SummonToken, ToolKind, ToolTier};
use spirit_shared::{BlockPos, Face, Vec3};
use spirit_tools::{AgentManager, SandboxWorld, SpiritConfig, SpiritToolItem, SummonOutcome, TickOutcome};

/// Where the owner stands unless a test moves them.
pub const OWNER_SPOT: Vec3 = Vec3::new(0.5, 1.0, 4.5);

pub struct Fixture {
    pub world: SandboxWorld,
    pub manager: AgentManager,
    pub owner: PlayerId,
    pub player: EntityId,
    pub tool: SpiritToolItem,
}

impl Fixture {
    pub fn new(config: SpiritConfig, kind: ToolKind, tier: ToolTier) -> Self {
        Self::with_world(SandboxWorld::new(), config, SummonToken::new(kind, tier))
    }

    pub fn with_world(mut world: SandboxWorld, config: SpiritConfig, token: SummonToken) -> Self {
        let owner = PlayerId::random();
        let player = world.add_player(owner, OWNER_SPOT);
        world.give_token(player, token).expect("fresh inventory has room");
        Self {
            world,
            manager: AgentManager::new(config),
            owner,
            player,
            tool: SpiritToolItem::new(token),
        }
    }

    /// Uses the tool on the top face of `pos`.
    pub fn summon(&mut self, pos: BlockPos) -> SummonOutcome {
        self.tool
            .use_on_block(&mut self.world, &mut self.manager, self.owner, pos, Face::Up)
            .expect("summon succeeds")
    }

    /// One world tick.
    pub fn step(&mut self) -> Vec<(EntityId, TickOutcome)> {
        let outcomes = self.manager.tick(&mut self.world);
        self.world.end_tick();
        outcomes
    }

    /// One world tick with exactly one agent alive.
    pub fn step_one(&mut self) -> TickOutcome {
        let mut outcomes = self.step();
        assert_eq!(outcomes.len(), 1, "expected exactly one agent");
        outcomes.remove(0).1
    }

    /// Ticks until no agent is left, returning every outcome of the only
    /// agent.
    pub fn run_to_end(&mut self, limit: u32) -> Vec<TickOutcome> {
        let mut history = Vec::new();
        for _ in 0..limit {
            if self.manager.is_empty() {
                return history;
            }
            history.push(self.step_one());
        }
        panic!("agent still alive after {limit} ticks");
    }

    /// Re-gives the token after the player relogged under a new entity.
    pub fn relog(&mut self) -> EntityId {
        let position = self.world.player(self.player).map_or(OWNER_SPOT, |p| p.position);
        self.world.remove_player(self.player);
        self.player = self.world.add_player(self.owner, position);
        self.world
            .give_token(self.player, *self.tool.token())
            .expect("fresh inventory has room");
        self.player
    }
}

/// Number of accumulation ticks in an outcome history.
pub fn accumulation_ticks(history: &[TickOutcome]) -> usize {
    history
        .iter()
        .filter(|o| matches!(o, TickOutcome::Progressed { .. } | TickOutcome::BlockMined { .. }))
        .count()
}
