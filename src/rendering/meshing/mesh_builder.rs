//! # Mesh Builder
//!
//! A free-standing mesher that culls against an explicit set of six neighbor voxels
//! instead of a live chunk graph. It is useful for synthetic neighborhoods, previews
//! and single-voxel geometry, and writes the vertex-colored
//! [`VertexLayout::PositionNormalColor`] layout.

use crate::rendering::vertex::VertexLayout;
use crate::voxels::position::VoxelPosition;
use crate::voxels::voxel::voxel_face::VoxelFace;
use crate::voxels::voxel::Voxel;

use super::chunk_mesh::ChunkMesh;
use super::face_emitter::emit_face;

/// Initial capacities for the builder's buffers.
const INITIAL_VERTEX_CAPACITY: usize = 4096;
const INITIAL_INDEX_CAPACITY: usize = 2048;

/// The six voxels sharing a face with the voxel being meshed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VoxelNeighbors {
    /// Voxel above.
    pub top: Voxel,
    /// Voxel below.
    pub bottom: Voxel,
    /// Voxel toward -X.
    pub left: Voxel,
    /// Voxel toward +X.
    pub right: Voxel,
    /// Voxel toward +Z.
    pub front: Voxel,
    /// Voxel toward -Z.
    pub back: Voxel,
}

impl VoxelNeighbors {
    /// Every neighbor set to the same voxel.
    pub fn uniform(voxel: Voxel) -> Self {
        VoxelNeighbors {
            top: voxel,
            bottom: voxel,
            left: voxel,
            right: voxel,
            front: voxel,
            back: voxel,
        }
    }

    /// The neighbor across the given face.
    pub fn get(&self, face: VoxelFace) -> Voxel {
        match face {
            VoxelFace::TOP => self.top,
            VoxelFace::BOTTOM => self.bottom,
            VoxelFace::LEFT => self.left,
            VoxelFace::RIGHT => self.right,
            VoxelFace::FRONT => self.front,
            VoxelFace::BACK => self.back,
        }
    }
}

/// Decides whether the face between `current` and `neighbor` is drawn.
///
/// A face renders iff `current` is not air and the neighbor is either air, or
/// transparent while `current` is opaque. Two transparent voxels hide the face between
/// them (glass against water shows no boundary).
pub fn should_render_face(current: Voxel, neighbor: Voxel) -> bool {
    if current.is_air() {
        return false;
    }
    neighbor.is_air() || (neighbor.is_transparent() && current.is_opaque())
}

/// Accumulates culled, vertex-colored voxel geometry.
pub struct MeshBuilder {
    vertices: Vec<f32>,
    indices: Vec<u32>,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    /// Layout of every vertex the builder emits.
    pub const LAYOUT: VertexLayout = VertexLayout::PositionNormalColor;

    /// Creates an empty builder.
    pub fn new() -> Self {
        MeshBuilder {
            vertices: Vec::with_capacity(INITIAL_VERTEX_CAPACITY),
            indices: Vec::with_capacity(INITIAL_INDEX_CAPACITY),
        }
    }

    /// Adds the visible faces of one voxel, colored from the voxel type table.
    ///
    /// # Arguments
    /// * `position` - Global voxel position of the voxel
    /// * `voxel` - The voxel being meshed
    /// * `neighbors` - The six face-adjacent voxels used for culling
    pub fn add_voxel_with_culling(
        &mut self,
        position: VoxelPosition,
        voxel: Voxel,
        neighbors: &VoxelNeighbors,
    ) {
        self.add_voxel_with_color(position, voxel, neighbors, voxel.color());
    }

    /// Adds the visible faces of one voxel with an explicit flat color.
    pub fn add_voxel_with_color(
        &mut self,
        position: VoxelPosition,
        voxel: Voxel,
        neighbors: &VoxelNeighbors,
        color: [f32; 3],
    ) {
        let origin = position.to_world();
        for face in VoxelFace::all() {
            if should_render_face(voxel, neighbors.get(face)) {
                emit_face(
                    &mut self.vertices,
                    &mut self.indices,
                    Self::LAYOUT,
                    origin,
                    face,
                    color,
                );
            }
        }
    }

    /// Clears accumulated geometry, keeping the allocations.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Vertex data emitted so far.
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Index data emitted so far.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices emitted so far.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / Self::LAYOUT.floats_per_vertex()
    }

    /// Number of triangles emitted so far.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Hands the accumulated geometry over as a [`ChunkMesh`].
    pub fn into_mesh(self) -> ChunkMesh {
        ChunkMesh {
            vertices: self.vertices,
            indices: self.indices,
            layout: Self::LAYOUT,
        }
    }
}
