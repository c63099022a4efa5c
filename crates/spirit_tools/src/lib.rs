//! # Spirit Tools
//!
//! Summoned mining agents. A player uses a spirit tool on a block; an agent
//! appears, mines the connected vein of that material block by block, and
//! returns the loot to its owner.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  use_on_block   ┌──────────────┐   tick    ┌──────────────┐
//! │ SpiritTool   │────────────────>│ AgentManager │──────────>│ SpiritAgent  │
//! │ Item         │  discover vein  │  (registry)  │           │  controller  │
//! └──────────────┘                 └──────┬───────┘           └──────┬───────┘
//!                                         │ AgentEvent               │ World trait
//!                                         v                          v
//!                                  ┌──────────────┐           ┌──────────────┐
//!                                  │  EventBus    │           │ host world / │
//!                                  │ (crossbeam)  │           │ SandboxWorld │
//!                                  └──────────────┘           └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - `agent`: the agent, its queue, break progress, owner monitor, controller
//!   and durable record
//! - `config`: lifecycle tunables (TOML)
//! - `events`: outcome channel
//! - `manager`: registry and per-tick driver
//! - `summon`: the tool item and its suitability rules
//! - `world`: the `World` seam
//! - `sandbox`: an in-memory `World`
//!
//! ## Example
//!
//! ```rust
//! use spirit_core::PlayerId;
//! use spirit_economy::{SummonToken, ToolKind, ToolTier};
//! use spirit_shared::{BlockPos, Face, Vec3};
//! use spirit_tools::{AgentManager, SandboxWorld, SpiritConfig, SpiritToolItem};
//! use spirit_world::MaterialId;
//!
//! let mut world = SandboxWorld::new();
//! world.fill(BlockPos::new(0, 0, 0), BlockPos::new(1, 0, 0), MaterialId::STONE);
//!
//! let owner = PlayerId::random();
//! let player = world.add_player(owner, Vec3::new(0.5, 1.0, 3.0));
//! let token = SummonToken::new(ToolKind::Pickaxe, ToolTier::Diamond);
//! world.give_token(player, token);
//!
//! let mut manager = AgentManager::new(SpiritConfig::default());
//! let outcome = SpiritToolItem::new(token)
//!     .use_on_block(&mut world, &mut manager, owner, BlockPos::ORIGIN, Face::Up)
//!     .unwrap();
//! assert_eq!(outcome.newly_queued(), 2);
//!
//! while !manager.is_empty() {
//!     manager.tick(&mut world);
//!     world.end_tick();
//! }
//! let cobble = world.player(player).unwrap().inventory.count_item(spirit_economy::items::COBBLESTONE);
//! assert_eq!(cobble, 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod agent;
pub mod config;
pub mod error;
pub mod events;
pub mod manager;
pub mod sandbox;
pub mod summon;
pub mod world;

pub use agent::{
    AgentPhase, AgentRecord, BreakProgress, MiningQueue, OwnerLink, RangeGuard, ReturnReason, ReturnReport,
    SpiritAgent, TickOutcome, ToolSpeed, Verdict,
};
pub use config::{RangePolicy, SpiritConfig, TierStats, TierTable};
pub use error::{SpiritError, SpiritResult, SummonRejection};
pub use events::{AgentEvent, EventBus, EventReceiver, EventSender};
pub use manager::AgentManager;
pub use sandbox::{ExperienceOrb, GroundItem, SandboxPlayer, SandboxWorld};
pub use summon::{SpiritToolItem, SummonOutcome};
pub use world::{SpawnAnnouncement, World};
