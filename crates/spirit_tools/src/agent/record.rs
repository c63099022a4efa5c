//! # Agent Record
//!
//! Durable form of an agent, written on world save and read on load or
//! resync. Every field is optional on read: a record from an older build, or
//! one truncated to a few keys, still restores with zeros and empties where
//! keys are missing. Only malformed JSON is an error.
//!
//! The visible break stage is not stored. A restored agent shows no
//! indicator until its next accumulation tick re-broadcasts the stage.

use serde::{Deserialize, Serialize};
use spirit_core::{EntityId, PlayerId};
use spirit_economy::{ItemStack, SummonToken};
use spirit_shared::{BlockPos, Rotation, Vec3};
use spirit_world::MaterialId;

use super::monitor::{OwnerLink, RangeGuard};
use super::progress::BreakProgress;
use super::queue::MiningQueue;
use super::SpiritAgent;
use crate::error::SpiritResult;

/// Serialized agent state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentRecord {
    /// Owner identity.
    pub owner: Option<PlayerId>,
    /// Ticks since spawn.
    pub age: u32,
    /// Harvested stacks.
    pub held_items: Vec<ItemStack>,
    /// Harvested experience.
    pub held_experience: u32,
    /// Queued positions, sorted for stable output.
    pub queued_positions: Vec<BlockPos>,
    /// Target material.
    pub target_material: Option<MaterialId>,
    /// Position being mined.
    pub active_position: Option<BlockPos>,
    /// Accumulation ticks on the active position.
    pub progress_ticks: u32,
    /// Summoning token.
    pub token: Option<SummonToken>,
    /// Placement.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Rotation,
    /// Consecutive failing owner checks.
    pub outside_range_ticks: u32,
}

impl AgentRecord {
    /// Encodes the record as JSON.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::Codec` if serialization fails.
    pub fn to_json(&self) -> SpiritResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a record from JSON.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::Codec` for malformed JSON or mistyped fields.
    pub fn from_json(source: &str) -> SpiritResult<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

impl SpiritAgent {
    /// Snapshot of the durable state.
    #[must_use]
    pub fn to_record(&self) -> AgentRecord {
        let mut queued_positions: Vec<BlockPos> = self.queue.iter().collect();
        queued_positions.sort_unstable();

        AgentRecord {
            owner: self.owner.id(),
            age: self.age,
            held_items: self.held_items.clone(),
            held_experience: self.held_experience,
            queued_positions,
            target_material: self.queue.material(),
            active_position: self.active,
            progress_ticks: self.progress.ticks(),
            token: self.token,
            position: self.position,
            rotation: self.rotation,
            outside_range_ticks: self.range_guard.outside_ticks(),
        }
    }

    /// Rebuilds an agent from a record under a fresh entity id.
    ///
    /// The owner link starts unresolved and resolves by identity on the
    /// first tick. An active position without a target material is dropped.
    #[must_use]
    pub fn from_record(id: EntityId, record: AgentRecord) -> Self {
        if record.owner.is_none() {
            tracing::warn!(agent = %id, "Restored agent has no owner; it will idle until it expires");
        }

        let active = record.active_position.filter(|_| record.target_material.is_some());
        let progress = if active.is_some() {
            BreakProgress::resumed(record.progress_ticks)
        } else {
            BreakProgress::default()
        };

        Self {
            id,
            age: record.age,
            owner: OwnerLink::unresolved(record.owner),
            token: record.token,
            queue: MiningQueue::from_parts(record.target_material, record.queued_positions),
            active,
            progress,
            held_items: record.held_items,
            held_experience: record.held_experience,
            range_guard: RangeGuard::resumed(record.outside_range_ticks),
            position: record.position,
            rotation: record.rotation,
            discarded: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spirit_economy::{items, ToolKind, ToolTier};

    #[test]
    fn test_empty_object_is_default() {
        let record = AgentRecord::from_json("{}").unwrap();
        assert_eq!(record, AgentRecord::default());
    }

    #[test]
    fn test_partial_record() {
        let record = AgentRecord::from_json(r#"{"age": 42, "held_experience": 7}"#).unwrap();
        assert_eq!(record.age, 42);
        assert_eq!(record.held_experience, 7);
        assert!(record.queued_positions.is_empty());
        assert_eq!(record.target_material, None);
    }

    #[test]
    fn test_malformed_json_is_codec_error() {
        assert!(matches!(
            AgentRecord::from_json("{\"age\": "),
            Err(crate::error::SpiritError::Codec(_))
        ));
        assert!(AgentRecord::from_json(r#"{"age": "old"}"#).is_err());
    }

    #[test]
    fn test_agent_snapshot_restores() {
        let owner = PlayerId::random();
        let token = SummonToken::new(ToolKind::Shovel, ToolTier::Iron);
        let mut agent = SpiritAgent::new(EntityId::new(3, 1), Vec3::new(1.0, 2.0, 3.0));
        agent.set_owner(owner, EntityId::new(0, 0));
        agent.set_token(token);
        agent
            .assign(MaterialId::DIRT, [BlockPos::new(2, 0, 0), BlockPos::new(1, 0, 0)])
            .unwrap();
        agent.absorb_items(&[ItemStack::new(items::DIRT, 5)]);

        let json = agent.to_record().to_json().unwrap();
        let restored = SpiritAgent::from_record(EntityId::new(9, 0), AgentRecord::from_json(&json).unwrap());

        assert_eq!(restored.owner_id(), Some(owner));
        assert_eq!(restored.token(), Some(&token));
        assert_eq!(restored.target_material(), Some(MaterialId::DIRT));
        assert_eq!(restored.queue(), agent.queue());
        assert_eq!(restored.held_items(), agent.held_items());
        assert_eq!(restored.position(), agent.position());
        assert_eq!(restored.id(), EntityId::new(9, 0));
        assert_eq!(restored.to_record(), agent.to_record());
    }

    #[test]
    fn test_active_without_material_dropped() {
        let record = AgentRecord {
            active_position: Some(BlockPos::ORIGIN),
            progress_ticks: 4,
            ..AgentRecord::default()
        };
        let agent = SpiritAgent::from_record(EntityId::new(1, 0), record);
        assert_eq!(agent.active_position(), None);
        assert_eq!(agent.progress_ticks(), 0);
    }
}
