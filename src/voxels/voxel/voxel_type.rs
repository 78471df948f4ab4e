//! # Voxel Type Module
//!
//! This module defines the closed set of voxel materials, their fixed transparency
//! classification, and the lookup tables used for naming and flat coloring.

use std::{fmt, str::FromStr};

use num_derive::FromPrimitive;

use super::VoxelTypeSize;
use crate::error::VoxelError;

/// Enumerates every material a voxel can be made of.
///
/// `AIR` is the unique empty value and is deliberately the zero tag, so a zeroed
/// voxel buffer is an empty one.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum VoxelType {
    /// Empty space. Transparent and never meshed.
    AIR = 0,
    /// Plain stone.
    STONE,
    /// Dirt, usually found under grass.
    DIRT,
    /// Grass-topped soil.
    GRASS,
    /// Sand.
    SAND,
    /// Water. Transparent.
    WATER,
    /// Wood log.
    WOOD,
    /// Tree leaves.
    LEAVES,
    /// Glass. Transparent.
    GLASS,
    /// Brick.
    BRICK,
}

/// Flat color used for voxels whose type has no entry in the color table.
pub const DEFAULT_VOXEL_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Case-insensitive name lookup, generated at compile time.
static VOXEL_TYPES_BY_NAME: phf::Map<&'static str, VoxelType> = phf::phf_map! {
    "air" => VoxelType::AIR,
    "stone" => VoxelType::STONE,
    "dirt" => VoxelType::DIRT,
    "grass" => VoxelType::GRASS,
    "sand" => VoxelType::SAND,
    "water" => VoxelType::WATER,
    "wood" => VoxelType::WOOD,
    "leaves" => VoxelType::LEAVES,
    "glass" => VoxelType::GLASS,
    "brick" => VoxelType::BRICK,
};

impl VoxelType {
    /// Every voxel type, in tag order.
    pub const ALL: [VoxelType; 10] = [
        VoxelType::AIR,
        VoxelType::STONE,
        VoxelType::DIRT,
        VoxelType::GRASS,
        VoxelType::SAND,
        VoxelType::WATER,
        VoxelType::WOOD,
        VoxelType::LEAVES,
        VoxelType::GLASS,
        VoxelType::BRICK,
    ];

    /// Converts a raw tag back into a `VoxelType`.
    ///
    /// # Returns
    /// `None` if the tag does not correspond to any known type.
    pub fn from_tag(tag: VoxelTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(tag)
    }

    /// Returns the compact tag stored inside chunks.
    pub fn tag(self) -> VoxelTypeSize {
        self as VoxelTypeSize
    }

    /// Whether light and sight pass through this material.
    ///
    /// The classification is fixed: air, water and glass are transparent.
    pub fn is_transparent(self) -> bool {
        matches!(self, VoxelType::AIR | VoxelType::WATER | VoxelType::GLASS)
    }

    /// Human-readable name of the type.
    pub fn name(self) -> &'static str {
        match self {
            VoxelType::AIR => "Air",
            VoxelType::STONE => "Stone",
            VoxelType::DIRT => "Dirt",
            VoxelType::GRASS => "Grass",
            VoxelType::SAND => "Sand",
            VoxelType::WATER => "Water",
            VoxelType::WOOD => "Wood",
            VoxelType::LEAVES => "Leaves",
            VoxelType::GLASS => "Glass",
            VoxelType::BRICK => "Brick",
        }
    }

    /// Flat RGB color used by vertex-colored meshes.
    ///
    /// Air has no entry of its own and falls back to [`DEFAULT_VOXEL_COLOR`].
    pub fn color(self) -> [f32; 3] {
        match self {
            VoxelType::STONE => [0.5, 0.5, 0.5],
            VoxelType::DIRT => [0.55, 0.35, 0.2],
            VoxelType::GRASS => [0.2, 0.8, 0.2],
            VoxelType::SAND => [0.95, 0.9, 0.6],
            VoxelType::WATER => [0.2, 0.4, 0.9],
            VoxelType::WOOD => [0.6, 0.4, 0.2],
            VoxelType::LEAVES => [0.15, 0.6, 0.15],
            VoxelType::GLASS => [0.7, 0.9, 1.0],
            VoxelType::BRICK => [0.7, 0.3, 0.2],
            VoxelType::AIR => DEFAULT_VOXEL_COLOR,
        }
    }
}

impl fmt::Display for VoxelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VoxelType {
    type Err = VoxelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VOXEL_TYPES_BY_NAME
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| VoxelError::UnknownVoxelType(s.to_string()))
    }
}
