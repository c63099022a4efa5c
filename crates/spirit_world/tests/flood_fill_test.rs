//! # Flood-Fill Integration Test
//!
//! Checks `discover` against an independent definition of its result on
//! irregular terrain: every position returned matches and lies inside the
//! ball, and no matching face-neighbor inside the ball is left out.

use std::collections::HashSet;

use spirit_shared::BlockPos;
use spirit_world::{discover, BlockAccess, MaterialId, MaterialTable, VoxelGrid};

const HALF: i32 = 9;

/// Stone with a deterministic scatter of dirt pockets.
fn patchy_terrain() -> VoxelGrid {
    let mut grid = VoxelGrid::new(MaterialTable::default());
    for y in -HALF..=HALF {
        for z in -HALF..=HALF {
            for x in -HALF..=HALF {
                let material = if (x * 7 + y * 13 + z * 31).rem_euclid(3) == 0 {
                    MaterialId::DIRT
                } else {
                    MaterialId::STONE
                };
                grid.set(BlockPos::new(x, y, z), material);
            }
        }
    }
    grid.set(BlockPos::ORIGIN, MaterialId::STONE);
    grid
}

fn within(pos: BlockPos, seed: BlockPos, radius: f32) -> bool {
    (pos.distance_squared(seed) as f64) < f64::from(radius) * f64::from(radius)
}

fn check_region(grid: &VoxelGrid, seed: BlockPos, radius: f32) -> HashSet<BlockPos> {
    let found = discover(grid, seed, MaterialId::STONE, radius);

    assert!(found.contains(&seed), "seed must be part of its own region");
    for pos in &found {
        assert_eq!(grid.material_at(*pos), MaterialId::STONE, "{pos} does not match");
        assert!(within(*pos, seed, radius), "{pos} lies outside the ball");

        for neighbor in pos.neighbors() {
            if within(neighbor, seed, radius) && grid.material_at(neighbor) == MaterialId::STONE {
                assert!(found.contains(&neighbor), "{neighbor} is connected but missing");
            }
        }
    }
    found
}

#[test]
fn test_region_closed_under_connectivity() {
    let grid = patchy_terrain();
    for radius in [1.0, 2.5, 5.0, 7.5] {
        check_region(&grid, BlockPos::ORIGIN, radius);
    }
}

#[test]
fn test_region_off_center_seed() {
    let grid = patchy_terrain();
    let seed = BlockPos::new(2, -1, 3);
    assert_eq!(grid.material_at(seed), MaterialId::STONE);
    check_region(&grid, seed, 5.0);
}

#[test]
fn test_region_grows_with_radius() {
    let grid = patchy_terrain();
    let small = check_region(&grid, BlockPos::ORIGIN, 3.0);
    let large = check_region(&grid, BlockPos::ORIGIN, 6.0);

    assert!(small.is_subset(&large));
    assert!(large.len() > small.len());
}

#[test]
fn test_fractional_radius_below_one_is_seed_only() {
    let grid = patchy_terrain();
    let found = discover(&grid, BlockPos::ORIGIN, MaterialId::STONE, 0.5);
    assert_eq!(found, HashSet::from([BlockPos::ORIGIN]));
}

#[test]
fn test_later_placement_needs_new_discovery() {
    let mut grid = VoxelGrid::new(MaterialTable::default());
    grid.set(BlockPos::ORIGIN, MaterialId::COAL_ORE);
    let first = discover(&grid, BlockPos::ORIGIN, MaterialId::COAL_ORE, 5.0);

    grid.set(BlockPos::new(0, 1, 0), MaterialId::COAL_ORE);
    assert_eq!(first.len(), 1);
    assert_eq!(discover(&grid, BlockPos::ORIGIN, MaterialId::COAL_ORE, 5.0).len(), 2);
}
