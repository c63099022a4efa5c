//! Packets that leave the agent controller.
//!
//! The spawn announcement itself is opaque to this crate (it carries an item
//! snapshot and is encoded by whoever implements the world). Break-stage
//! updates are hot and tiny, so they get a fixed-size POD layout.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::math::BlockPos;

/// Wire value meaning "no break indicator".
pub const BREAK_STAGE_NONE: i8 = -1;

/// Highest visible break stage.
pub const MAX_BREAK_STAGE: u8 = 9;

/// Break-stage update packet
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct BreakStageUpdate {
    /// Agent entity doing the breaking (packed `EntityId`)
    pub agent_id: u64,
    /// Block being broken
    pub position: [i32; 3],
    /// Stage 0-9, or `BREAK_STAGE_NONE` to clear
    pub stage: i8,
    /// Padding
    pub _pad: [u8; 3],
}

impl BreakStageUpdate {
    /// Size of the encoded packet in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Creates an update; `None` clears the indicator.
    #[must_use]
    pub fn new(agent_id: u64, position: BlockPos, stage: Option<u8>) -> Self {
        Self {
            agent_id,
            position: position.into(),
            stage: stage.map_or(BREAK_STAGE_NONE, |s| s.min(MAX_BREAK_STAGE) as i8),
            _pad: [0; 3],
        }
    }

    /// Block this update refers to.
    #[must_use]
    pub fn block(&self) -> BlockPos {
        BlockPos::from(self.position)
    }

    /// Decoded stage; `None` means cleared.
    #[must_use]
    pub fn stage(&self) -> Option<u8> {
        u8::try_from(self.stage).ok()
    }

    /// Encodes to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        bytemuck::bytes_of(self).to_vec()
    }

    /// Decodes from bytes; `None` on wrong length.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytemuck::try_pod_read_unaligned(bytes).ok()
    }
}
