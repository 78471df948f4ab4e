//! # Voxel Face Module
//!
//! This module defines the six faces of a voxel cell. The same enumeration indexes
//! a chunk's neighbor slots, so `Left` of a voxel and `Left` neighbor of a chunk both
//! point towards negative X.

use cgmath::Vector3;

/// One of the six axis-aligned faces of a unit voxel cell.
///
/// The order is: [TOP, BOTTOM, LEFT, RIGHT, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum VoxelFace {
    /// The top face (facing positive Y)
    TOP = 0,

    /// The bottom face (facing negative Y)
    BOTTOM = 1,

    /// The left face (facing negative X)
    LEFT = 2,

    /// The right face (facing positive X)
    RIGHT = 3,

    /// The front face (facing positive Z)
    FRONT = 4,

    /// The back face (facing negative Z)
    BACK = 5,
}

impl VoxelFace {
    /// Returns all six faces in slot order.
    pub fn all() -> [VoxelFace; 6] {
        [
            VoxelFace::TOP,
            VoxelFace::BOTTOM,
            VoxelFace::LEFT,
            VoxelFace::RIGHT,
            VoxelFace::FRONT,
            VoxelFace::BACK,
        ]
    }

    /// Slot index of this face, in `0..6`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The face on the other side of the shared boundary.
    pub fn opposite(self) -> VoxelFace {
        match self {
            VoxelFace::TOP => VoxelFace::BOTTOM,
            VoxelFace::BOTTOM => VoxelFace::TOP,
            VoxelFace::LEFT => VoxelFace::RIGHT,
            VoxelFace::RIGHT => VoxelFace::LEFT,
            VoxelFace::FRONT => VoxelFace::BACK,
            VoxelFace::BACK => VoxelFace::FRONT,
        }
    }

    /// Integer step from a cell to the cell across this face.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            VoxelFace::TOP => Vector3::new(0, 1, 0),
            VoxelFace::BOTTOM => Vector3::new(0, -1, 0),
            VoxelFace::LEFT => Vector3::new(-1, 0, 0),
            VoxelFace::RIGHT => Vector3::new(1, 0, 0),
            VoxelFace::FRONT => Vector3::new(0, 0, 1),
            VoxelFace::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// Outward unit normal of this face.
    pub fn normal(self) -> Vector3<f32> {
        let offset = self.offset();
        Vector3::new(offset.x as f32, offset.y as f32, offset.z as f32)
    }
}
