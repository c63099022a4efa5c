//! # Spirit World
//!
//! The block world as the mining agents see it.
//!
//! ## Core Components
//!
//! - `MaterialTable`: hardness, tags and collision per material (TOML-loadable)
//! - `BlockAccess`: read-only view every consumer is written against
//! - `VoxelGrid`: sparse chunked in-memory block storage
//! - `discover`: bounded flood-fill of connected material
//!
//! ## Example
//!
//! ```rust
//! use spirit_shared::BlockPos;
//! use spirit_world::{discover, MaterialId, MaterialTable, VoxelGrid};
//!
//! let mut grid = VoxelGrid::new(MaterialTable::default());
//! grid.fill(BlockPos::new(0, 0, 0), BlockPos::new(2, 0, 0), MaterialId::STONE);
//!
//! let vein = discover(&grid, BlockPos::ORIGIN, MaterialId::STONE, 5.0);
//! assert_eq!(vein.len(), 3);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod error;
pub mod flood_fill;
pub mod grid;
pub mod material;

pub use access::BlockAccess;
pub use error::{WorldError, WorldResult};
pub use flood_fill::discover;
pub use grid::{Chunk, ChunkCoord, VoxelGrid, CHUNK_SIZE};
pub use material::{Hardness, MaterialDef, MaterialId, MaterialTable, MaterialTag, TagSet};
