//! Vertex layouts for chunk meshes.
//!
//! Meshes are stored as interleaved `f32` streams. A [`VertexLayout`] names which
//! attributes a stream carries and publishes the per-attribute description a graphics
//! backend needs to bind it (shader location, component count and offset), the same
//! information a GPU vertex buffer layout carries.

use serde::{Deserialize, Serialize};

/// Size in bytes of one vertex component.
pub const COMPONENT_SIZE: usize = std::mem::size_of::<f32>();

/// Description of one interleaved vertex attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location the attribute binds to.
    pub shader_location: u32,
    /// Number of `f32` components.
    pub components: usize,
    /// Offset of the first component, in floats from the start of the vertex.
    pub offset: usize,
}

impl VertexAttribute {
    /// Offset of the attribute in bytes.
    pub fn byte_offset(&self) -> usize {
        self.offset * COMPONENT_SIZE
    }
}

/// The interleaved attribute layouts a mesh can be emitted in.
///
/// # Memory Layout
/// - `PositionNormalUv`: position (3) + normal (3) + uv (2) = 8 floats, 32 bytes
/// - `PositionNormalColor`: position (3) + normal (3) + color (3) = 9 floats, 36 bytes
/// - `PositionNormalUvColor`: position (3) + normal (3) + uv (2) + color (3) = 11 floats, 44 bytes
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexLayout {
    /// Position, normal and texture coordinate: 8 floats.
    PositionNormalUv,
    /// Position, normal and flat color: 9 floats.
    PositionNormalColor,
    /// Position, normal, texture coordinate and color: 11 floats.
    #[default]
    PositionNormalUvColor,
}

const POSITION: VertexAttribute = VertexAttribute {
    shader_location: 0,
    components: 3,
    offset: 0,
};

const NORMAL: VertexAttribute = VertexAttribute {
    shader_location: 1,
    components: 3,
    offset: 3,
};

const POSITION_NORMAL_UV: [VertexAttribute; 3] = [
    POSITION,
    NORMAL,
    VertexAttribute {
        shader_location: 2,
        components: 2,
        offset: 6,
    },
];

const POSITION_NORMAL_COLOR: [VertexAttribute; 3] = [
    POSITION,
    NORMAL,
    VertexAttribute {
        shader_location: 3,
        components: 3,
        offset: 6,
    },
];

const POSITION_NORMAL_UV_COLOR: [VertexAttribute; 4] = [
    POSITION,
    NORMAL,
    VertexAttribute {
        shader_location: 2,
        components: 2,
        offset: 6,
    },
    VertexAttribute {
        shader_location: 3,
        components: 3,
        offset: 8,
    },
];

impl VertexLayout {
    /// Number of `f32` values per vertex.
    pub fn floats_per_vertex(self) -> usize {
        match self {
            VertexLayout::PositionNormalUv => 8,
            VertexLayout::PositionNormalColor => 9,
            VertexLayout::PositionNormalUvColor => 11,
        }
    }

    /// Distance in bytes between consecutive vertices.
    pub fn stride(self) -> usize {
        self.floats_per_vertex() * COMPONENT_SIZE
    }

    /// Whether vertices carry a texture coordinate.
    pub fn has_uv(self) -> bool {
        !matches!(self, VertexLayout::PositionNormalColor)
    }

    /// Whether vertices carry a color.
    pub fn has_color(self) -> bool {
        !matches!(self, VertexLayout::PositionNormalUv)
    }

    /// Returns the attribute descriptions for this layout.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: normal (vec3<f32>)
    /// - `location = 2`: uv (vec2<f32>), when present
    /// - `location = 3`: color (vec3<f32>), when present
    pub fn attributes(self) -> &'static [VertexAttribute] {
        match self {
            VertexLayout::PositionNormalUv => &POSITION_NORMAL_UV,
            VertexLayout::PositionNormalColor => &POSITION_NORMAL_COLOR,
            VertexLayout::PositionNormalUvColor => &POSITION_NORMAL_UV_COLOR,
        }
    }
}
