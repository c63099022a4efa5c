//! # Sandbox World
//!
//! A complete in-memory `World`: a voxel grid, a drop table, players with
//! inventories, loose item stacks and experience orbs on the ground, and a
//! log of every break-stage packet and spawn announcement.
//!
//! Used by the tests and the walkthrough binary; a host game implements
//! `World` over its own storage instead.

use std::collections::HashMap;

use spirit_core::{EntityId, EntityRegistry, PlayerId};
use spirit_economy::{DropTable, ItemId, ItemStack, PlayerInventory, SummonToken};
use spirit_shared::{BlockPos, BreakStageUpdate, Vec3, MAX_STACK_SIZE};
use spirit_world::{BlockAccess, MaterialId, MaterialTable, VoxelGrid};

use crate::world::{SpawnAnnouncement, World};

/// A connected player.
#[derive(Clone, Debug)]
pub struct SandboxPlayer {
    /// Durable identity.
    pub id: PlayerId,
    /// Feet position.
    pub position: Vec3,
    /// Carried items.
    pub inventory: PlayerInventory,
    /// Experience points.
    pub experience: u32,
}

/// An item stack lying in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundItem {
    /// Where it lies.
    pub position: Vec3,
    /// What it is.
    pub stack: ItemStack,
}

/// An experience orb lying in the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExperienceOrb {
    /// Where it lies.
    pub position: Vec3,
    /// Experience it carries.
    pub amount: u32,
    /// Ticks since it spawned.
    pub age: u32,
}

/// In-memory world.
pub struct SandboxWorld {
    grid: VoxelGrid,
    drops: DropTable,
    players: EntityRegistry<SandboxPlayer>,
    ground_items: Vec<GroundItem>,
    orbs: Vec<ExperienceOrb>,
    /// Indicator shown per agent.
    indicators: HashMap<EntityId, (BlockPos, u8)>,
    /// Every break-stage packet sent, in order.
    stage_updates: Vec<BreakStageUpdate>,
    announcements: Vec<SpawnAnnouncement>,
}

impl SandboxWorld {
    /// Empty world with the built-in material and drop tables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tables(MaterialTable::default(), DropTable::default())
    }

    /// Empty world with custom tables.
    #[must_use]
    pub fn with_tables(materials: MaterialTable, drops: DropTable) -> Self {
        Self {
            grid: VoxelGrid::new(materials),
            drops,
            players: EntityRegistry::new(),
            ground_items: Vec::new(),
            orbs: Vec::new(),
            indicators: HashMap::new(),
            stage_updates: Vec::new(),
            announcements: Vec::new(),
        }
    }

    // =========================================================================
    // Blocks
    // =========================================================================

    /// Block storage.
    #[must_use]
    pub const fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    /// Places a block, returning what was there.
    pub fn set_block(&mut self, pos: BlockPos, material: MaterialId) -> MaterialId {
        self.grid.set(pos, material)
    }

    /// Fills an inclusive box with one material.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, material: MaterialId) {
        self.grid.fill(min, max, material);
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Logs a player in, returning their live entity.
    pub fn add_player(&mut self, id: PlayerId, position: Vec3) -> EntityId {
        self.players.spawn(SandboxPlayer {
            id,
            position,
            inventory: PlayerInventory::new(),
            experience: 0,
        })
    }

    /// Logs a player out. Their entity handle stops resolving.
    pub fn remove_player(&mut self, player: EntityId) -> Option<SandboxPlayer> {
        self.players.despawn(player)
    }

    /// A live player.
    #[must_use]
    pub fn player(&self, player: EntityId) -> Option<&SandboxPlayer> {
        self.players.get(player)
    }

    /// A live player, mutably.
    pub fn player_mut(&mut self, player: EntityId) -> Option<&mut SandboxPlayer> {
        self.players.get_mut(player)
    }

    /// Iterates live players.
    pub fn players(&self) -> impl Iterator<Item = (EntityId, &SandboxPlayer)> {
        self.players.iter()
    }

    /// Moves a player.
    pub fn move_player(&mut self, player: EntityId, position: Vec3) {
        if let Some(p) = self.players.get_mut(player) {
            p.position = position;
        }
    }

    /// Puts a token in a player's main inventory; returns the slot, or
    /// `None` if the player is gone or has no free slot.
    pub fn give_token(&mut self, player: EntityId, token: SummonToken) -> Option<usize> {
        self.players.get_mut(player)?.inventory.give_token(token).ok()
    }

    /// Takes a token out of a player's main inventory or off-hand.
    pub fn take_token(&mut self, player: EntityId, token: &SummonToken) -> Option<SummonToken> {
        self.players.get_mut(player)?.inventory.take_token(token)
    }

    // =========================================================================
    // Ground
    // =========================================================================

    /// Loose stacks in the world.
    #[must_use]
    pub fn ground_items(&self) -> &[GroundItem] {
        &self.ground_items
    }

    /// Loose experience orbs in the world.
    #[must_use]
    pub fn orbs(&self) -> &[ExperienceOrb] {
        &self.orbs
    }

    /// Count of an item lying on the ground.
    #[must_use]
    pub fn ground_count(&self, item_id: ItemId) -> u32 {
        self.ground_items
            .iter()
            .filter(|g| g.stack.item_id == item_id)
            .map(|g| g.stack.count)
            .sum()
    }

    /// Ages everything that ages. Call once after all agents ticked.
    pub fn end_tick(&mut self) {
        for orb in &mut self.orbs {
            orb.age = orb.age.saturating_add(1);
        }
    }

    // =========================================================================
    // Observers
    // =========================================================================

    /// Stage an agent currently shows at `pos`.
    #[must_use]
    pub fn break_stage(&self, agent: EntityId, pos: BlockPos) -> Option<u8> {
        match self.indicators.get(&agent) {
            Some((shown_at, stage)) if *shown_at == pos => Some(*stage),
            _ => None,
        }
    }

    /// Whether any agent shows an indicator.
    #[must_use]
    pub fn has_indicators(&self) -> bool {
        !self.indicators.is_empty()
    }

    /// Every break-stage packet sent so far.
    #[must_use]
    pub fn stage_updates(&self) -> &[BreakStageUpdate] {
        &self.stage_updates
    }

    /// Every spawn announcement sent so far.
    #[must_use]
    pub fn announcements(&self) -> &[SpawnAnnouncement] {
        &self.announcements
    }
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockAccess for SandboxWorld {
    fn material_at(&self, pos: BlockPos) -> MaterialId {
        self.grid.material_at(pos)
    }

    fn materials(&self) -> &MaterialTable {
        self.grid.materials()
    }
}

impl World for SandboxWorld {
    fn resolve_player(&self, id: PlayerId) -> Option<EntityId> {
        self.players.iter().find(|(_, p)| p.id == id).map(|(entity, _)| entity)
    }

    fn is_player_alive(&self, player: EntityId) -> bool {
        self.players.is_alive(player)
    }

    fn player_position(&self, player: EntityId) -> Option<Vec3> {
        self.players.get(player).map(|p| p.position)
    }

    fn player_holds(&self, player: EntityId, token: &SummonToken) -> bool {
        self.players
            .get(player)
            .is_some_and(|p| p.inventory.holds_token(token))
    }

    fn offer_or_drop(&mut self, player: EntityId, stack: ItemStack) {
        let Some(p) = self.players.get_mut(player) else {
            tracing::warn!(%player, item = stack.item_id, count = stack.count, "Offer to missing player, dropped at origin");
            self.ground_items.push(GroundItem {
                position: Vec3::ZERO,
                stack,
            });
            return;
        };

        let leftover = p.inventory.offer(stack, MAX_STACK_SIZE);
        if !leftover.is_empty() {
            self.ground_items.push(GroundItem {
                position: p.position,
                stack: leftover,
            });
        }
    }

    fn add_experience(&mut self, player: EntityId, amount: u32) {
        if let Some(p) = self.players.get_mut(player) {
            p.experience = p.experience.saturating_add(amount);
        }
    }

    fn drops_for(&self, _pos: BlockPos, material: MaterialId, token: Option<&SummonToken>) -> Vec<ItemStack> {
        self.drops.resolve(material, token)
    }

    fn release_experience(&mut self, pos: BlockPos, material: MaterialId, token: Option<&SummonToken>) {
        let amount = self.drops.experience(material, token);
        if amount > 0 {
            self.spawn_experience(pos.center(), amount);
        }
    }

    fn collect_fresh_experience(&mut self, pos: BlockPos) -> u32 {
        let mut collected = 0_u32;
        self.orbs.retain(|orb| {
            let fresh = orb.age == 0 && pos.contains(orb.position);
            if fresh {
                collected = collected.saturating_add(orb.amount);
            }
            !fresh
        });
        collected
    }

    fn break_block(&mut self, pos: BlockPos) -> MaterialId {
        self.grid.remove(pos)
    }

    fn set_break_stage(&mut self, agent: EntityId, pos: BlockPos, stage: Option<u8>) {
        match stage {
            Some(stage) => {
                self.indicators.insert(agent, (pos, stage));
            }
            None => {
                self.indicators.remove(&agent);
            }
        }
        self.stage_updates
            .push(BreakStageUpdate::new(agent.to_bits(), pos, stage));
    }

    fn spawn_item(&mut self, at: Vec3, stack: ItemStack) {
        self.ground_items.push(GroundItem { position: at, stack });
    }

    fn spawn_experience(&mut self, at: Vec3, amount: u32) {
        self.orbs.push(ExperienceOrb {
            position: at,
            amount,
            age: 0,
        });
    }

    fn announce_spawn(&mut self, announcement: &SpawnAnnouncement) {
        self.announcements.push(*announcement);
    }
}
