//! # Flood-Fill Discovery
//!
//! Finds every block of one material that is 6-connected to a seed block
//! and lies strictly within `radius` of the seed.
//!
//! The search keeps an explicit frontier and a visited set, so the deepest
//! vein costs heap, never stack. Positions are rejected as soon as they fall
//! outside the ball, which bounds the visited set to the ball's volume.

use std::collections::HashSet;

use spirit_shared::BlockPos;
use tracing::trace;

use crate::access::BlockAccess;
use crate::material::MaterialId;

/// Discovers the connected region of `material` around `seed`.
///
/// A position is included when it is reachable from the seed through
/// face-adjacent positions that all match, its squared distance to the seed
/// is `< radius²`, and its current material equals `material`.
///
/// Returns an empty set when the seed itself does not match.
///
/// # Arguments
///
/// * `view` - Block view to read materials from
/// * `seed` - Starting position
/// * `material` - Material to collect
/// * `radius` - Exclusive search radius measured from the seed
#[must_use]
pub fn discover<A>(view: &A, seed: BlockPos, material: MaterialId, radius: f32) -> HashSet<BlockPos>
where
    A: BlockAccess + ?Sized,
{
    let radius_sq = f64::from(radius) * f64::from(radius);
    let within = |pos: BlockPos| (pos.distance_squared(seed) as f64) < radius_sq;

    let mut found = HashSet::new();
    let mut visited = HashSet::new();
    let mut frontier = vec![seed];
    visited.insert(seed);

    while let Some(pos) = frontier.pop() {
        if !within(pos) || view.material_at(pos) != material {
            continue;
        }
        found.insert(pos);

        for neighbor in pos.neighbors() {
            if visited.insert(neighbor) {
                frontier.push(neighbor);
            }
        }
    }

    trace!(%seed, %material, radius, found = found.len(), visited = visited.len(), "Flood fill");
    found
}
