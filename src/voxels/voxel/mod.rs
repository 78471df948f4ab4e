//! # Voxel Module
//!
//! This module provides the smallest unit of the world: a single voxel carrying a
//! material tag, along with the material enumeration and the face enumeration used
//! for culling and neighbor addressing.

use voxel_type::VoxelType;

pub mod voxel_face;
pub mod voxel_type;

/// The underlying integer type used to store voxel types in memory.
pub type VoxelTypeSize = u8;

/// Name reported for tags that do not correspond to any [`VoxelType`].
pub const UNKNOWN_VOXEL_NAME: &str = "Unknown";

/// A single voxel in the world.
///
/// Chunks store voxels inline and by value, so this stays as small as possible: just
/// the compact type tag.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute together with `Pod`/`Zeroable` lets a chunk's voxel
/// array be viewed as raw bytes. The all-zero voxel is air.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Voxel {
    /// The type of this voxel, encoded as a `VoxelTypeSize`.
    pub id: VoxelTypeSize,
}

impl Voxel {
    /// The empty voxel.
    pub const AIR: Voxel = Voxel { id: 0 };

    /// Creates a voxel of the given type.
    pub const fn new(voxel_type: VoxelType) -> Self {
        Voxel {
            id: voxel_type as VoxelTypeSize,
        }
    }

    /// Creates a voxel from a raw tag. Tags outside the known set are kept as-is.
    pub const fn from_id(id: VoxelTypeSize) -> Self {
        Voxel { id }
    }

    /// The typed material of this voxel, or `None` for an unrecognized tag.
    pub fn voxel_type(self) -> Option<VoxelType> {
        VoxelType::from_tag(self.id)
    }

    /// Whether the voxel is air.
    pub fn is_air(self) -> bool {
        self.id == VoxelType::AIR as VoxelTypeSize
    }

    /// Whether the voxel occupies its cell (anything but air).
    pub fn is_solid(self) -> bool {
        !self.is_air()
    }

    /// Unrecognized tags count as opaque.
    pub fn is_transparent(self) -> bool {
        self.voxel_type().is_some_and(VoxelType::is_transparent)
    }

    /// Whether the voxel hides faces behind it.
    pub fn is_opaque(self) -> bool {
        !self.is_transparent()
    }

    /// Display name of the voxel's type, or `"Unknown"`.
    pub fn name(self) -> &'static str {
        self.voxel_type().map_or(UNKNOWN_VOXEL_NAME, VoxelType::name)
    }

    /// Flat color of the voxel's type. Unrecognized tags are white.
    pub fn color(self) -> [f32; 3] {
        self.voxel_type().map_or(voxel_type::DEFAULT_VOXEL_COLOR, VoxelType::color)
    }
}

impl From<VoxelType> for Voxel {
    fn from(voxel_type: VoxelType) -> Self {
        Voxel::new(voxel_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeroed_voxel_is_air() {
        let zeroed: Voxel = bytemuck::Zeroable::zeroed();
        assert_eq!(zeroed, Voxel::AIR);
        assert_eq!(Voxel::default(), Voxel::AIR);
        assert!(zeroed.is_air());
        assert!(!zeroed.is_solid());
    }

    #[test]
    fn test_classification_is_consistent() {
        for voxel_type in VoxelType::ALL {
            let voxel = Voxel::new(voxel_type);
            assert_eq!(voxel.is_air(), voxel_type == VoxelType::AIR);
            assert_eq!(voxel.is_solid(), !voxel.is_air());
            assert_eq!(voxel.is_opaque(), !voxel.is_transparent());
            assert_eq!(voxel.is_transparent(), voxel_type.is_transparent());
        }
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        let voxel = Voxel::from_id(200);
        assert_eq!(voxel.voxel_type(), None);
        assert_eq!(voxel.name(), "Unknown");
        assert_eq!(voxel.color(), [1.0, 1.0, 1.0]);
        assert!(voxel.is_solid());
        assert!(voxel.is_opaque());
    }

    #[test]
    fn test_known_tag_name_and_color() {
        let voxel = Voxel::new(VoxelType::WATER);
        assert_eq!(voxel.name(), "Water");
        assert_eq!(voxel.color(), [0.2, 0.4, 0.9]);
        assert_eq!(Voxel::from(VoxelType::DIRT).id, 2);
    }
}
