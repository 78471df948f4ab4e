//! # Position Module
//!
//! Integer coordinate types for the three spaces the world is addressed in:
//!
//! - [`VoxelPosition`]: global voxel space, one unit per voxel, lower corner at the integer.
//! - [`ChunkPosition`]: chunk grid space, one unit per chunk.
//! - [`LocalPosition`]: a voxel's coordinate inside its chunk, always in `[0, CHUNK_SIZE)`.
//!
//! The global to (chunk, local) split uses floor division and floor modulo so that
//! negative coordinates land in negative chunks, and `chunk * CHUNK_SIZE + local`
//! always reconstructs the original position.

use std::{
    fmt,
    ops::{Add, Sub},
};

use cgmath::Point3;

use super::chunk::CHUNK_SIZE;
use super::voxel::voxel_face::VoxelFace;

/// A voxel coordinate in global voxel space.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelPosition {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

/// A chunk coordinate in the chunk grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPosition {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

/// A voxel coordinate relative to the lower corner of its chunk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LocalPosition {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl VoxelPosition {
    /// Creates a position from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        VoxelPosition { x, y, z }
    }

    /// Manhattan distance between two voxel positions.
    pub fn distance(self, other: VoxelPosition) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// World-space coordinate of the voxel's lower corner.
    pub fn to_world(self) -> Point3<f32> {
        Point3::new(self.x as f32, self.y as f32, self.z as f32)
    }

    /// World-space coordinate of the voxel's center.
    pub fn to_world_center(self) -> Point3<f32> {
        Point3::new(
            self.x as f32 + 0.5,
            self.y as f32 + 0.5,
            self.z as f32 + 0.5,
        )
    }

    /// The voxel containing a world-space point. Each component is floored.
    pub fn from_world(point: Point3<f32>) -> Self {
        VoxelPosition::new(
            point.x.floor() as i32,
            point.y.floor() as i32,
            point.z.floor() as i32,
        )
    }

    /// Splits the position into its chunk and the local coordinate inside it.
    pub fn split(self) -> (ChunkPosition, LocalPosition) {
        (ChunkPosition::from_voxel(self), LocalPosition::from_voxel(self))
    }
}

impl ChunkPosition {
    /// Creates a position from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        ChunkPosition { x, y, z }
    }

    /// The chunk that owns a global voxel position.
    pub fn from_voxel(position: VoxelPosition) -> Self {
        ChunkPosition::new(
            position.x.div_euclid(CHUNK_SIZE),
            position.y.div_euclid(CHUNK_SIZE),
            position.z.div_euclid(CHUNK_SIZE),
        )
    }

    /// Global voxel position of this chunk's local `(0, 0, 0)`.
    pub fn origin(self) -> VoxelPosition {
        VoxelPosition::new(
            self.x * CHUNK_SIZE,
            self.y * CHUNK_SIZE,
            self.z * CHUNK_SIZE,
        )
    }

    /// Reassembles a global voxel position from a local coordinate in this chunk.
    pub fn to_voxel(self, local: LocalPosition) -> VoxelPosition {
        self.origin() + VoxelPosition::new(local.x, local.y, local.z)
    }

    /// The chunk across the given face.
    pub fn neighbor(self, face: VoxelFace) -> Self {
        let offset = face.offset();
        ChunkPosition::new(self.x + offset.x, self.y + offset.y, self.z + offset.z)
    }

    /// Manhattan distance in chunk units.
    pub fn distance(self, other: ChunkPosition) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }
}

impl LocalPosition {
    /// Creates a position from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        LocalPosition { x, y, z }
    }

    /// Floor-modulo of a global position into `[0, CHUNK_SIZE)` on every axis.
    pub fn from_voxel(position: VoxelPosition) -> Self {
        LocalPosition::new(
            position.x.rem_euclid(CHUNK_SIZE),
            position.y.rem_euclid(CHUNK_SIZE),
            position.z.rem_euclid(CHUNK_SIZE),
        )
    }

    /// Whether every component lies in `[0, CHUNK_SIZE)`.
    pub fn is_in_bounds(self) -> bool {
        (0..CHUNK_SIZE).contains(&self.x)
            && (0..CHUNK_SIZE).contains(&self.y)
            && (0..CHUNK_SIZE).contains(&self.z)
    }

    /// Faces of the chunk this coordinate lies on. Interior coordinates touch none;
    /// a corner touches three.
    pub fn boundary_faces(self) -> Vec<VoxelFace> {
        let last = CHUNK_SIZE - 1;
        let mut faces = Vec::new();
        if self.y == last {
            faces.push(VoxelFace::TOP);
        }
        if self.y == 0 {
            faces.push(VoxelFace::BOTTOM);
        }
        if self.x == 0 {
            faces.push(VoxelFace::LEFT);
        }
        if self.x == last {
            faces.push(VoxelFace::RIGHT);
        }
        if self.z == last {
            faces.push(VoxelFace::FRONT);
        }
        if self.z == 0 {
            faces.push(VoxelFace::BACK);
        }
        faces
    }
}

impl Add for VoxelPosition {
    type Output = VoxelPosition;

    fn add(self, rhs: VoxelPosition) -> VoxelPosition {
        VoxelPosition::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for VoxelPosition {
    type Output = VoxelPosition;

    fn sub(self, rhs: VoxelPosition) -> VoxelPosition {
        VoxelPosition::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Add for ChunkPosition {
    type Output = ChunkPosition;

    fn add(self, rhs: ChunkPosition) -> ChunkPosition {
        ChunkPosition::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for ChunkPosition {
    type Output = ChunkPosition;

    fn sub(self, rhs: ChunkPosition) -> ChunkPosition {
        ChunkPosition::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for VoxelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for ChunkPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for LocalPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<Point3<i32>> for VoxelPosition {
    fn from(p: Point3<i32>) -> Self {
        VoxelPosition::new(p.x, p.y, p.z)
    }
}

impl From<VoxelPosition> for Point3<i32> {
    fn from(p: VoxelPosition) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

impl From<Point3<i32>> for ChunkPosition {
    fn from(p: Point3<i32>) -> Self {
        ChunkPosition::new(p.x, p.y, p.z)
    }
}

impl From<ChunkPosition> for Point3<i32> {
    fn from(p: ChunkPosition) -> Self {
        Point3::new(p.x, p.y, p.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_one_maps_to_last_local_of_negative_chunk() {
        let (chunk, local) = VoxelPosition::new(-1, -1, -1).split();
        assert_eq!(chunk, ChunkPosition::new(-1, -1, -1));
        assert_eq!(local, LocalPosition::new(31, 31, 31));
    }

    #[test]
    fn test_split_round_trips() {
        let samples = [-100, -65, -64, -33, -32, -31, -1, 0, 1, 31, 32, 33, 63, 64, 1000];
        for &x in &samples {
            for &y in &samples {
                for &z in &samples {
                    let position = VoxelPosition::new(x, y, z);
                    let (chunk, local) = position.split();
                    assert!(local.is_in_bounds(), "{position} -> {local}");
                    assert_eq!(chunk.to_voxel(local), position);
                }
            }
        }
    }

    #[test]
    fn test_arithmetic_and_distance() {
        let a = VoxelPosition::new(1, 2, 3);
        let b = VoxelPosition::new(-4, 6, 3);
        assert_eq!(a + b, VoxelPosition::new(-3, 8, 6));
        assert_eq!(a - b, VoxelPosition::new(5, -4, 0));
        assert_eq!(a.distance(b), 9);
        assert_eq!(b.distance(a), 9);
        assert_eq!(
            ChunkPosition::new(1, 1, 1) - ChunkPosition::new(0, 2, 1),
            ChunkPosition::new(1, -1, 0)
        );
    }

    #[test]
    fn test_world_conversions() {
        let p = VoxelPosition::new(-2, 0, 5);
        assert_eq!(p.to_world(), Point3::new(-2.0, 0.0, 5.0));
        assert_eq!(p.to_world_center(), Point3::new(-1.5, 0.5, 5.5));
        assert_eq!(VoxelPosition::from_world(Point3::new(-1.5, 0.5, 5.99)), p);
        assert_eq!(VoxelPosition::from_world(p.to_world_center()), p);
    }

    #[test]
    fn test_chunk_neighbor_and_origin() {
        let c = ChunkPosition::new(0, -1, 2);
        assert_eq!(c.neighbor(VoxelFace::TOP), ChunkPosition::new(0, 0, 2));
        assert_eq!(c.neighbor(VoxelFace::LEFT), ChunkPosition::new(-1, -1, 2));
        assert_eq!(c.neighbor(VoxelFace::BACK), ChunkPosition::new(0, -1, 1));
        assert_eq!(c.origin(), VoxelPosition::new(0, -32, 64));
        assert_eq!(c.to_string(), "(0, -1, 2)");
    }

    #[test]
    fn test_boundary_faces() {
        assert!(LocalPosition::new(5, 5, 5).boundary_faces().is_empty());
        assert_eq!(LocalPosition::new(0, 5, 5).boundary_faces(), vec![VoxelFace::LEFT]);
        assert_eq!(
            LocalPosition::new(31, 0, 31).boundary_faces(),
            vec![VoxelFace::BOTTOM, VoxelFace::RIGHT, VoxelFace::FRONT]
        );
    }
}
