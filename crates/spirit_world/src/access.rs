//! Read-only block view.
//!
//! Everything that inspects the world (discovery, the mining queue, the break
//! simulator) takes a `BlockAccess` instead of a concrete storage type, so the
//! same code runs against the in-memory grid, a test fixture, or a host game.

use spirit_shared::{BlockPos, Vec3};

use crate::material::{Hardness, MaterialId, MaterialTable, MaterialTag};

/// Read-only access to block materials.
pub trait BlockAccess {
    /// Material at a block position. Unloaded space reads as air.
    fn material_at(&self, pos: BlockPos) -> MaterialId;

    /// The material registry backing this view.
    fn materials(&self) -> &MaterialTable;

    /// Hardness of the block at `pos`.
    fn hardness_at(&self, pos: BlockPos) -> Hardness {
        self.materials().hardness(self.material_at(pos))
    }

    /// Whether the block at `pos` has a collision shape.
    fn has_collision(&self, pos: BlockPos) -> bool {
        self.materials().has_collision(self.material_at(pos))
    }

    /// Whether a point is submerged in water.
    fn is_submerged(&self, point: Vec3) -> bool {
        self.materials()
            .has_tag(self.material_at(BlockPos::containing(point)), MaterialTag::Water)
    }
}

impl<T: BlockAccess + ?Sized> BlockAccess for &T {
    fn material_at(&self, pos: BlockPos) -> MaterialId {
        (**self).material_at(pos)
    }

    fn materials(&self) -> &MaterialTable {
        (**self).materials()
    }

    fn hardness_at(&self, pos: BlockPos) -> Hardness {
        (**self).hardness_at(pos)
    }

    fn has_collision(&self, pos: BlockPos) -> bool {
        (**self).has_collision(pos)
    }

    fn is_submerged(&self, point: Vec3) -> bool {
        (**self).is_submerged(point)
    }
}
