//! # Summoning
//!
//! Using a spirit tool on a block deploys an agent for the connected vein
//! around it, or enlarges the vein of the agent already deployed for that
//! tool.
//!
//! Suitability is plain data: the block's tags must carry the tool kind's
//! mineable tag, and the tier's mining level must cover any
//! `needs_*_tool` tag.

use spirit_core::{EntityId, PlayerId};
use spirit_economy::SummonToken;
use spirit_shared::{BlockPos, Face, Rotation};
use spirit_world::{discover, BlockAccess, MaterialId, MaterialTable, MaterialTag, TagSet};

use crate::agent::progress::{breaking_speed, ticks_to_break, ToolSpeed};
use crate::agent::SpiritAgent;
use crate::config::TierTable;
use crate::error::{SpiritResult, SummonRejection};
use crate::events::AgentEvent;
use crate::manager::AgentManager;
use crate::world::{SpawnAnnouncement, World};

/// What a successful use did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummonOutcome {
    /// A new agent was deployed.
    Spawned {
        /// The new agent.
        agent: EntityId,
        /// Positions it queued.
        queued: usize,
    },
    /// The deployed agent's queue was enlarged.
    Extended {
        /// The existing agent.
        agent: EntityId,
        /// Positions newly queued; 0 when the vein was already known.
        added: usize,
    },
}

impl SummonOutcome {
    /// The agent concerned.
    #[must_use]
    pub const fn agent(&self) -> EntityId {
        match self {
            Self::Spawned { agent, .. } | Self::Extended { agent, .. } => *agent,
        }
    }

    /// Positions added by this use.
    #[must_use]
    pub const fn newly_queued(&self) -> usize {
        match self {
            Self::Spawned { queued, .. } => *queued,
            Self::Extended { added, .. } => *added,
        }
    }
}

/// Mining level a material requires.
fn required_level(tags: TagSet) -> u8 {
    if tags.has(MaterialTag::NeedsDiamondTool) {
        3
    } else if tags.has(MaterialTag::NeedsIronTool) {
        2
    } else if tags.has(MaterialTag::NeedsStoneTool) {
        1
    } else {
        0
    }
}

/// A spirit tool in a player's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpiritToolItem {
    token: SummonToken,
}

impl SpiritToolItem {
    /// Wraps a token.
    #[must_use]
    pub const fn new(token: SummonToken) -> Self {
        Self { token }
    }

    /// The wrapped token.
    #[inline]
    #[must_use]
    pub const fn token(&self) -> &SummonToken {
        &self.token
    }

    /// Whether this tool can mine `material`.
    #[must_use]
    pub fn suitable_for(&self, material: MaterialId, materials: &MaterialTable, tiers: &TierTable) -> bool {
        let tags = materials.tags(material);
        tags.has(self.token.kind.effective_tag())
            && tiers.stats(self.token.tier).mining_level >= required_level(tags)
    }

    /// Whether an agent is deployed for this tool.
    #[must_use]
    pub fn is_summoned(&self, manager: &AgentManager) -> bool {
        manager.find_by_token(&self.token).is_some()
    }

    /// Accumulation ticks this tool needs for the block at `pos`, dry;
    /// 0 if it never breaks.
    #[must_use]
    pub fn ticks_to_break<A: BlockAccess + ?Sized>(&self, view: &A, pos: BlockPos, tiers: &TierTable) -> u32 {
        let speed = ToolSpeed::for_token(&self.token, tiers);
        ticks_to_break(breaking_speed(view.hardness_at(pos), speed))
    }

    /// Uses the tool on the block at `pos`, clicked on `face`.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::Summon` when the player is not present or does
    /// not hold the token, when an agent for this token already mines
    /// another material, or when the block does not suit the tool.
    pub fn use_on_block<W: World + ?Sized>(
        &self,
        world: &mut W,
        manager: &mut AgentManager,
        player: PlayerId,
        pos: BlockPos,
        face: Face,
    ) -> SpiritResult<SummonOutcome> {
        let entity = world
            .resolve_player(player)
            .ok_or(SummonRejection::OwnerUnresolved)?;
        if !world.player_holds(entity, &self.token) {
            return Err(SummonRejection::TokenNotHeld.into());
        }

        let material = world.material_at(pos);
        let radius = manager.config().search_radius;

        if let Some(agent_id) = manager.find_by_token(&self.token) {
            return self.extend(&*world, manager, agent_id, pos, material, radius);
        }

        if !self.suitable_for(material, world.materials(), &manager.config().tiers) {
            return Err(SummonRejection::UnsuitableBlock { material }.into());
        }

        let positions = discover(&*world, pos, material, radius);
        let spawn_at = if world.has_collision(pos) {
            pos.offset(face).corner()
        } else {
            pos.corner()
        };

        let token = self.token;
        let id = manager.spawn_agent(|id| {
            let mut agent = SpiritAgent::new(id, spawn_at);
            agent.set_owner(player, entity);
            agent.set_token(token);
            agent
        });
        let queued = match manager.get_mut(id) {
            Some(agent) => agent.assign(material, positions)?.len(),
            None => 0,
        };

        world.announce_spawn(&SpawnAnnouncement {
            agent: id,
            owner: player,
            token,
            position: spawn_at,
            rotation: Rotation::default(),
        });
        manager.publish(AgentEvent::Summoned {
            agent: id,
            owner: player,
            material,
            queued,
        });
        tracing::info!(agent = %id, owner = %player, %material, %pos, queued, "Spirit summoned");

        Ok(SummonOutcome::Spawned { agent: id, queued })
    }

    /// Merges a fresh discovery into the deployed agent's queue.
    fn extend<W: World + ?Sized>(
        &self,
        world: &W,
        manager: &mut AgentManager,
        agent_id: EntityId,
        pos: BlockPos,
        material: MaterialId,
        radius: f32,
    ) -> SpiritResult<SummonOutcome> {
        let Some(agent) = manager.get_mut(agent_id) else {
            return Err(SummonRejection::AlreadyDeployed.into());
        };
        if agent.target_material() != Some(material) {
            return Err(SummonRejection::AlreadyDeployed.into());
        }

        let added = agent.assign(material, discover(world, pos, material, radius))?.len();
        tracing::debug!(agent = %agent_id, %pos, added, "Spirit queue extended");
        Ok(SummonOutcome::Extended { agent: agent_id, added })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spirit_economy::{ToolKind, ToolTier};

    fn tool(kind: ToolKind, tier: ToolTier) -> SpiritToolItem {
        SpiritToolItem::new(SummonToken::new(kind, tier))
    }

    #[test]
    fn test_suitability_by_kind() {
        let materials = MaterialTable::default();
        let tiers = TierTable::default();
        let pick = tool(ToolKind::Pickaxe, ToolTier::Wood);
        let shovel = tool(ToolKind::Shovel, ToolTier::Wood);

        assert!(pick.suitable_for(MaterialId::STONE, &materials, &tiers));
        assert!(!pick.suitable_for(MaterialId::DIRT, &materials, &tiers));
        assert!(shovel.suitable_for(MaterialId::DIRT, &materials, &tiers));
        assert!(!shovel.suitable_for(MaterialId::BEDROCK, &materials, &tiers));
    }

    #[test]
    fn test_suitability_by_tier() {
        let materials = MaterialTable::default();
        let tiers = TierTable::default();

        assert!(!tool(ToolKind::Pickaxe, ToolTier::Wood).suitable_for(MaterialId::IRON_ORE, &materials, &tiers));
        assert!(tool(ToolKind::Pickaxe, ToolTier::Stone).suitable_for(MaterialId::IRON_ORE, &materials, &tiers));
        assert!(!tool(ToolKind::Pickaxe, ToolTier::Stone).suitable_for(MaterialId::DIAMOND_ORE, &materials, &tiers));
        assert!(tool(ToolKind::Pickaxe, ToolTier::Iron).suitable_for(MaterialId::DIAMOND_ORE, &materials, &tiers));
        assert!(!tool(ToolKind::Pickaxe, ToolTier::Iron).suitable_for(MaterialId::OBSIDIAN, &materials, &tiers));
        assert!(tool(ToolKind::Pickaxe, ToolTier::Netherite).suitable_for(MaterialId::OBSIDIAN, &materials, &tiers));
    }

    #[test]
    fn test_ticks_to_break_for_ui() {
        let mut grid = spirit_world::VoxelGrid::new(MaterialTable::default());
        grid.set(BlockPos::ORIGIN, MaterialId::STONE);
        let pick = tool(ToolKind::Pickaxe, ToolTier::Diamond);
        assert_eq!(pick.ticks_to_break(&grid, BlockPos::ORIGIN, &TierTable::default()), 6);
    }

    #[test]
    fn test_outcome_accessors() {
        let agent = EntityId::new(2, 0);
        assert_eq!(SummonOutcome::Spawned { agent, queued: 4 }.newly_queued(), 4);
        assert_eq!(SummonOutcome::Extended { agent, added: 0 }.agent(), agent);
    }
}
