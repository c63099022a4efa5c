//! # Mining Queue
//!
//! Candidate positions for one agent, all of a single target material.
//!
//! Entries are never revalidated eagerly. A queued block that was broken,
//! replaced or mined by someone else simply stops matching and is skipped by
//! `next`; only blocks that can never be mined are removed (`discard`).

use std::collections::HashSet;

use spirit_shared::{BlockPos, Vec3};
use spirit_world::{BlockAccess, MaterialId};

use crate::error::{SpiritError, SpiritResult};

/// Work queue of an agent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MiningQueue {
    /// Target material, set by the first assignment.
    material: Option<MaterialId>,
    /// Candidate positions.
    positions: HashSet<BlockPos>,
}

impl MiningQueue {
    /// Creates an empty queue with no material.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a queue from persisted parts.
    #[must_use]
    pub fn from_parts(material: Option<MaterialId>, positions: impl IntoIterator<Item = BlockPos>) -> Self {
        Self {
            material,
            positions: positions.into_iter().collect(),
        }
    }

    /// The target material, once assigned.
    #[inline]
    #[must_use]
    pub const fn material(&self) -> Option<MaterialId> {
        self.material
    }

    /// Number of queued positions (including stale ones).
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if nothing is queued.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether a position is queued.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.positions.contains(&pos)
    }

    /// Iterates queued positions in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.positions.iter().copied()
    }

    /// Sets the target material (first call) and merges positions.
    ///
    /// Returns the positions that were not queued before.
    ///
    /// # Errors
    ///
    /// Returns `SpiritError::MaterialMismatch` if a different material is
    /// already assigned; the queue is left unchanged.
    pub fn assign(
        &mut self,
        material: MaterialId,
        positions: impl IntoIterator<Item = BlockPos>,
    ) -> SpiritResult<HashSet<BlockPos>> {
        if let Some(assigned) = self.material {
            if assigned != material {
                return Err(SpiritError::MaterialMismatch {
                    assigned,
                    requested: material,
                });
            }
        }
        self.material = Some(material);

        let added = positions
            .into_iter()
            .filter(|pos| self.positions.insert(*pos))
            .collect();
        Ok(added)
    }

    /// The nearest queued position that still holds the target material.
    ///
    /// Distance is measured from `from` to each block's minimum corner. The
    /// selected position stays queued.
    #[must_use]
    pub fn next<A>(&self, view: &A, from: Vec3) -> Option<BlockPos>
    where
        A: BlockAccess + ?Sized,
    {
        let material = self.material?;
        self.positions
            .iter()
            .filter(|pos| view.material_at(**pos) == material)
            .map(|pos| (pos.corner_distance_squared(from), *pos))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, pos)| pos)
    }

    /// Removes a position that can never be mined.
    pub fn discard(&mut self, pos: BlockPos) -> bool {
        self.positions.remove(&pos)
    }
}
