//! # Summon Walkthrough
//!
//! Scripted run against the sandbox world:
//!
//! Summon on a coal vein → agent mines it block by block → owner walks
//! away → agent returns what it has.
//!
//! Usage: `summon_walkthrough [config.toml]`. Log level via `RUST_LOG`
//! (default `info`).

use spirit_core::PlayerId;
use spirit_economy::{items, SummonToken, ToolKind, ToolTier};
use spirit_shared::{BlockPos, Face, Vec3, TICK_RATE};
use spirit_tools::{
    AgentEvent, AgentManager, EventBus, SandboxWorld, SpiritConfig, SpiritResult, SpiritToolItem, TickOutcome,
};
use spirit_world::MaterialId;

/// Hard stop for the scripted run.
const MAX_TICKS: u32 = 2_000;

/// Tick at which the owner walks out of range.
const WALK_AWAY_AT: u32 = 60;

fn main() -> SpiritResult<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => SpiritConfig::load(path)?,
        None => SpiritConfig::default(),
    };

    // =========================================================================
    // Terrain: a stone floor with a coal seam and a bedrock base
    // =========================================================================
    let mut world = SandboxWorld::new();
    world.fill(BlockPos::new(-8, -4, -8), BlockPos::new(8, -4, 8), MaterialId::BEDROCK);
    world.fill(BlockPos::new(-8, -3, -8), BlockPos::new(8, 0, 8), MaterialId::STONE);
    world.fill(BlockPos::new(0, -2, 0), BlockPos::new(3, -1, 1), MaterialId::COAL_ORE);

    let owner = PlayerId::random();
    let player = world.add_player(owner, Vec3::new(0.5, 1.0, -2.5));
    let token = SummonToken::new(ToolKind::Pickaxe, ToolTier::Iron).with_efficiency(2);
    if world.give_token(player, token).is_none() {
        tracing::error!("Could not hand the token to the player");
        return Ok(());
    }

    let bus = EventBus::new(1024);
    let events = bus.receiver();
    let mut manager = AgentManager::new(config).with_events(bus.sender());
    let tool = SpiritToolItem::new(token);

    // =========================================================================
    // Summon
    // =========================================================================
    let seam = BlockPos::new(0, -1, 0);
    world.set_block(BlockPos::new(0, 0, 0), MaterialId::AIR);
    let outcome = tool.use_on_block(&mut world, &mut manager, owner, seam, Face::Up)?;
    tracing::info!(
        ticks_per_block = tool.ticks_to_break(&world, seam, &manager.config().tiers),
        queued = outcome.newly_queued(),
        "Summoned"
    );

    // =========================================================================
    // Tick until the agent is gone
    // =========================================================================
    let mut tick = 0;
    while !manager.is_empty() && tick < MAX_TICKS {
        tick += 1;
        if tick == WALK_AWAY_AT {
            world.move_player(player, Vec3::new(40.5, 1.0, 40.5));
            tracing::info!(tick, "Owner walks away");
        }

        for (_, outcome) in manager.tick(&mut world) {
            if let TickOutcome::Returned(report) = outcome {
                tracing::info!(
                    tick,
                    seconds = f64::from(tick) / f64::from(TICK_RATE),
                    reason = ?report.reason,
                    delivered = report.delivered_to_owner,
                    "Agent gone"
                );
            }
        }
        world.end_tick();
    }

    let mined = events
        .drain()
        .iter()
        .filter(|event| matches!(event, AgentEvent::BlockMined { .. }))
        .count();
    let (coal, experience) = world
        .player(player)
        .map_or((0, 0), |p| (p.inventory.count_item(items::COAL), p.experience));

    tracing::info!(
        mined,
        coal_in_inventory = coal,
        coal_on_ground = world.ground_count(items::COAL),
        experience,
        "Walkthrough finished"
    );
    Ok(())
}
