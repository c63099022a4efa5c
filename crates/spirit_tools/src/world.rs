//! # World Seam
//!
//! Everything an agent does to the world outside itself goes through the
//! `World` trait: reading blocks, finding its owner, breaking blocks,
//! spawning drops, painting break indicators.
//!
//! Players are addressed by live `EntityId`. An id that no longer resolves
//! (player logged out, respawned, slot reused) must simply report "not
//! there"; the agent re-resolves its owner by `PlayerId` on its own.

use serde::{Deserialize, Serialize};
use spirit_core::{EntityId, PlayerId};
use spirit_economy::{ItemStack, SummonToken};
use spirit_shared::{BlockPos, Rotation, Vec3};
use spirit_world::{BlockAccess, MaterialId};

/// Broadcast once when an agent comes into existence, so observers can
/// create it on their side.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnAnnouncement {
    /// The new agent.
    pub agent: EntityId,
    /// Its owner.
    pub owner: PlayerId,
    /// Snapshot of the summoning token.
    pub token: SummonToken,
    /// Spawn position.
    pub position: Vec3,
    /// Initial orientation.
    pub rotation: Rotation,
}

/// The world as seen by agents.
pub trait World: BlockAccess {
    // =========================================================================
    // Players
    // =========================================================================

    /// Live entity of a player, if loaded.
    fn resolve_player(&self, id: PlayerId) -> Option<EntityId>;

    /// Whether a player entity is still alive.
    fn is_player_alive(&self, player: EntityId) -> bool;

    /// Position of a live player.
    fn player_position(&self, player: EntityId) -> Option<Vec3>;

    /// Whether a player carries this exact token in the main inventory or
    /// off-hand.
    fn player_holds(&self, player: EntityId, token: &SummonToken) -> bool;

    /// Inserts a stack into a player's inventory; whatever does not fit is
    /// dropped at the player's feet.
    fn offer_or_drop(&mut self, player: EntityId, stack: ItemStack);

    /// Grants experience to a player.
    fn add_experience(&mut self, player: EntityId, amount: u32);

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Items a block yields when broken with `token`.
    fn drops_for(&self, pos: BlockPos, material: MaterialId, token: Option<&SummonToken>) -> Vec<ItemStack>;

    /// Spawns the experience a block releases when broken with `token`.
    /// Freshly spawned orbs are collectable this tick.
    fn release_experience(&mut self, pos: BlockPos, material: MaterialId, token: Option<&SummonToken>);

    /// Removes and sums experience orbs spawned this tick inside the block.
    fn collect_fresh_experience(&mut self, pos: BlockPos) -> u32;

    /// Removes a block without drops, returning what was there.
    fn break_block(&mut self, pos: BlockPos) -> MaterialId;

    /// Sets (`Some(0..=9)`) or clears (`None`) an agent's break indicator.
    fn set_break_stage(&mut self, agent: EntityId, pos: BlockPos, stage: Option<u8>);

    // =========================================================================
    // Entities
    // =========================================================================

    /// Drops an item stack into the world.
    fn spawn_item(&mut self, at: Vec3, stack: ItemStack);

    /// Spawns an experience orb.
    fn spawn_experience(&mut self, at: Vec3, amount: u32);

    /// Broadcasts a newly created agent.
    fn announce_spawn(&mut self, announcement: &SpawnAnnouncement);
}
