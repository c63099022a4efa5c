//! # Voxel Grid
//!
//! In-memory block storage organized into cubic chunks:
//! - Chunks are 16x16x16 cells, allocated on first write
//! - Each cell is a `MaterialId` (u16)
//! - Cells in unallocated chunks read as air
//!
//! The grid is the block store behind the sandbox world and the benchmarks.
//! A host game supplies its own `BlockAccess` instead.

use std::collections::HashMap;

use spirit_shared::BlockPos;

use crate::access::BlockAccess;
use crate::material::{MaterialId, MaterialTable};

/// Chunk edge length in blocks.
pub const CHUNK_SIZE: usize = 16;

/// Total cells per chunk.
pub const BLOCKS_PER_CHUNK: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Chunk coordinate (identifies a chunk in the grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Y coordinate (in chunks, not blocks).
    pub y: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chunk containing a block position.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(pos: BlockPos) -> Self {
        Self {
            x: pos.x.div_euclid(CHUNK_SIZE as i32),
            y: pos.y.div_euclid(CHUNK_SIZE as i32),
            z: pos.z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Minimum corner of the chunk in block coordinates.
    #[inline]
    #[must_use]
    pub const fn origin(self) -> BlockPos {
        BlockPos::new(
            self.x * CHUNK_SIZE as i32,
            self.y * CHUNK_SIZE as i32,
            self.z * CHUNK_SIZE as i32,
        )
    }
}

/// A chunk of block data.
#[derive(Clone)]
pub struct Chunk {
    /// Chunk coordinate.
    pub coord: ChunkCoord,
    /// Cells in XZY order (y outermost).
    cells: Box<[MaterialId]>,
    /// Non-air cell count.
    solid_count: usize,
}

impl Chunk {
    /// Creates an all-air chunk.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            cells: vec![MaterialId::AIR; BLOCKS_PER_CHUNK].into_boxed_slice(),
            solid_count: 0,
        }
    }

    #[inline]
    const fn index(x: usize, y: usize, z: usize) -> usize {
        y * CHUNK_SIZE * CHUNK_SIZE + z * CHUNK_SIZE + x
    }

    /// Gets the cell at local coordinates. Out-of-bounds reads as air.
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, z: usize) -> MaterialId {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE || z >= CHUNK_SIZE {
            return MaterialId::AIR;
        }
        self.cells[Self::index(x, y, z)]
    }

    /// Sets the cell at local coordinates, returning the previous material.
    /// Out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, material: MaterialId) -> MaterialId {
        if x >= CHUNK_SIZE || y >= CHUNK_SIZE || z >= CHUNK_SIZE {
            return MaterialId::AIR;
        }
        let cell = &mut self.cells[Self::index(x, y, z)];
        let previous = std::mem::replace(cell, material);
        match (previous.is_air(), material.is_air()) {
            (true, false) => self.solid_count += 1,
            (false, true) => self.solid_count -= 1,
            _ => {}
        }
        previous
    }

    /// Returns true if every cell is air.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.solid_count == 0
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("solid_count", &self.solid_count)
            .finish_non_exhaustive()
    }
}

/// Splits a block position into chunk coordinate + local offsets.
#[inline]
fn locate(pos: BlockPos) -> (ChunkCoord, usize, usize, usize) {
    let size = CHUNK_SIZE as i32;
    (
        ChunkCoord::from_block_pos(pos),
        pos.x.rem_euclid(size) as usize,
        pos.y.rem_euclid(size) as usize,
        pos.z.rem_euclid(size) as usize,
    )
}

/// Sparse chunked block storage with an attached material table.
#[derive(Debug)]
pub struct VoxelGrid {
    chunks: HashMap<ChunkCoord, Chunk>,
    materials: MaterialTable,
}

impl VoxelGrid {
    /// Creates an empty (all-air) grid.
    #[must_use]
    pub fn new(materials: MaterialTable) -> Self {
        Self {
            chunks: HashMap::new(),
            materials,
        }
    }

    /// Reads a cell.
    #[must_use]
    pub fn get(&self, pos: BlockPos) -> MaterialId {
        let (coord, x, y, z) = locate(pos);
        self.chunks
            .get(&coord)
            .map_or(MaterialId::AIR, |chunk| chunk.get(x, y, z))
    }

    /// Writes a cell, returning the previous material.
    pub fn set(&mut self, pos: BlockPos, material: MaterialId) -> MaterialId {
        let (coord, x, y, z) = locate(pos);
        if material.is_air() {
            let Some(chunk) = self.chunks.get_mut(&coord) else {
                return MaterialId::AIR;
            };
            let previous = chunk.set(x, y, z, material);
            if chunk.is_empty() {
                self.chunks.remove(&coord);
            }
            return previous;
        }
        self.chunks
            .entry(coord)
            .or_insert_with(|| Chunk::new(coord))
            .set(x, y, z, material)
    }

    /// Clears a cell to air, returning the previous material.
    pub fn remove(&mut self, pos: BlockPos) -> MaterialId {
        self.set(pos, MaterialId::AIR)
    }

    /// Fills the inclusive box `min..=max`.
    pub fn fill(&mut self, min: BlockPos, max: BlockPos, material: MaterialId) {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set(BlockPos::new(x, y, z), material);
                }
            }
        }
    }

    /// Counts cells of a material inside the inclusive box `min..=max`.
    #[must_use]
    pub fn count_in(&self, min: BlockPos, max: BlockPos, material: MaterialId) -> usize {
        let mut count = 0;
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    if self.get(BlockPos::new(x, y, z)) == material {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    /// Number of allocated chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

impl BlockAccess for VoxelGrid {
    fn material_at(&self, pos: BlockPos) -> MaterialId {
        self.get(pos)
    }

    fn materials(&self) -> &MaterialTable {
        &self.materials
    }
}
