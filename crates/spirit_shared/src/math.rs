//! Coordinate and orientation types.
//!
//! `Vec3` is a free position (entities), `BlockPos` an integer cell (blocks).
//! A block occupies `[x, x+1) x [y, y+1) x [z, z+1)`; its minimum corner is
//! `BlockPos::corner` and its center `BlockPos::center`.

use serde::{Deserialize, Serialize};

/// Degrees per radian, as used for entity yaw/pitch.
const DEGREES_PER_RADIAN: f32 = 57.295_776;

/// 3D Vector - position, direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Distance squared (avoids sqrt)
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        (self - other).length_squared()
    }

    /// Returns this position raised by `dy`.
    #[must_use]
    pub fn raised(self, dy: f32) -> Self {
        Self::new(self.x, self.y + dy, self.z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Integer block coordinate.
///
/// Serialized as a plain `[x, y, z]` triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[i32; 3]", into = "[i32; 3]")]
pub struct BlockPos {
    /// X coordinate (east is positive)
    pub x: i32,
    /// Y coordinate (up is positive)
    pub y: i32,
    /// Z coordinate (south is positive)
    pub z: i32,
}

impl BlockPos {
    /// Creates a new block position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Origin block.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// The block containing a free position.
    #[must_use]
    pub fn containing(pos: Vec3) -> Self {
        Self::new(
            pos.x.floor() as i32,
            pos.y.floor() as i32,
            pos.z.floor() as i32,
        )
    }

    /// Neighbouring block across `face`.
    #[inline]
    #[must_use]
    pub const fn offset(self, face: Face) -> Self {
        let [dx, dy, dz] = face.delta();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six face-adjacent neighbours.
    #[must_use]
    pub fn neighbors(self) -> [Self; 6] {
        Face::ALL.map(|face| self.offset(face))
    }

    /// Squared straight-line distance between two blocks.
    #[inline]
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dy * dy + dz * dz
    }

    /// Minimum corner of the block as a free position.
    #[must_use]
    pub fn corner(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// Squared distance from `point` to this block's minimum corner.
    ///
    /// Computed in `f64`: past 2^24 neighbouring corners collapse to the same
    /// `f32`.
    #[must_use]
    pub fn corner_distance_squared(self, point: Vec3) -> f64 {
        let dx = f64::from(self.x) - f64::from(point.x);
        let dy = f64::from(self.y) - f64::from(point.y);
        let dz = f64::from(self.z) - f64::from(point.z);
        dx * dx + dy * dy + dz * dz
    }

    /// Center of the block as a free position.
    #[must_use]
    pub fn center(self) -> Vec3 {
        Vec3::new(
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        )
    }

    /// Returns true if `pos` lies inside this block's unit cube.
    #[must_use]
    pub fn contains(self, pos: Vec3) -> bool {
        Self::containing(pos) == self
    }
}

impl From<[i32; 3]> for BlockPos {
    fn from(arr: [i32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }
}

impl From<BlockPos> for [i32; 3] {
    fn from(pos: BlockPos) -> Self {
        [pos.x, pos.y, pos.z]
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// One of the six faces of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Face {
    /// +Y
    Up,
    /// -Y
    Down,
    /// -Z
    North,
    /// +Z
    South,
    /// +X
    East,
    /// -X
    West,
}

impl Face {
    /// All faces, in flood-fill visiting order.
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
    ];

    /// Unit offset towards this face.
    #[must_use]
    pub const fn delta(self) -> [i32; 3] {
        match self {
            Self::Up => [0, 1, 0],
            Self::Down => [0, -1, 0],
            Self::North => [0, 0, -1],
            Self::South => [0, 0, 1],
            Self::East => [1, 0, 0],
            Self::West => [-1, 0, 0],
        }
    }
}

/// Entity orientation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Horizontal angle; 0 faces +Z, 90 faces -X.
    pub yaw: f32,
    /// Vertical angle; positive looks down.
    pub pitch: f32,
}

impl Rotation {
    /// Creates a rotation from yaw and pitch.
    #[must_use]
    pub const fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Orientation of an eye at `eye` looking straight at `target`.
    #[must_use]
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let delta = target - eye;
        let horizontal = (delta.x * delta.x + delta.z * delta.z).sqrt();
        let yaw = delta.z.atan2(delta.x) * DEGREES_PER_RADIAN - 90.0;
        let pitch = -(delta.y.atan2(horizontal) * DEGREES_PER_RADIAN);
        Self { yaw, pitch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(a.distance_squared(b), 27.0);
    }

    #[test]
    fn test_block_pos_neighbors_are_adjacent() {
        let origin = BlockPos::new(3, -2, 7);
        for neighbor in origin.neighbors() {
            assert_eq!(origin.distance_squared(neighbor), 1);
        }
    }

    #[test]
    fn test_corner_distance_exact_far_from_origin() {
        // 2^24 + 2 is exact in f32; 2^24 + 3 is not
        let from = Vec3::new(16_777_218.0, 0.0, 0.0);
        assert_eq!(BlockPos::new(16_777_219, 0, 0).corner_distance_squared(from), 1.0);
        assert_eq!(BlockPos::new(16_777_217, 0, 0).corner_distance_squared(from), 1.0);
        assert_eq!(BlockPos::new(1, 2, 3).corner_distance_squared(Vec3::new(0.5, 0.0, 0.0)), 13.25);
    }

    #[test]
    fn test_block_pos_containing_negative() {
        assert_eq!(
            BlockPos::containing(Vec3::new(-0.5, 1.2, -3.0)),
            BlockPos::new(-1, 1, -3)
        );
    }

    #[test]
    fn test_block_pos_serializes_as_triple() {
        let json = serde_json::to_string(&BlockPos::new(1, -2, 3)).unwrap();
        assert_eq!(json, "[1,-2,3]");
        let back: BlockPos = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BlockPos::new(1, -2, 3));
    }

    #[test]
    fn test_looking_at_cardinal_directions() {
        let eye = Vec3::ZERO;

        let south = Rotation::looking_at(eye, Vec3::new(0.0, 0.0, 5.0));
        assert!(approx(south.yaw, 0.0));
        assert!(approx(south.pitch, 0.0));

        let east = Rotation::looking_at(eye, Vec3::new(5.0, 0.0, 0.0));
        assert!(approx(east.yaw, -90.0));

        let below = Rotation::looking_at(eye, Vec3::new(0.0, -5.0, 0.0));
        assert!(approx(below.pitch, 90.0));
    }
}
