//! Generated geometry for one chunk.

use crate::rendering::vertex::VertexLayout;

use super::face_emitter::{INDICES_PER_FACE, VERTICES_PER_FACE};

/// Interleaved vertex floats and triangle indices produced by meshing.
///
/// A mesh is a regenerable artifact: it is rebuilt wholesale whenever its chunk is
/// dirty and never patched in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Interleaved vertex stream, `layout.floats_per_vertex()` floats per vertex.
    pub vertices: Vec<f32>,
    /// Triangle list, six indices per emitted face.
    pub indices: Vec<u32>,
    /// Layout the vertex stream is written in.
    pub layout: VertexLayout,
}

impl ChunkMesh {
    /// Creates an empty mesh for the given layout.
    pub fn new(layout: VertexLayout) -> Self {
        ChunkMesh {
            vertices: Vec::new(),
            indices: Vec::new(),
            layout,
        }
    }

    /// Number of vertices, derived from the layout stride.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / self.layout.floats_per_vertex()
    }

    /// Number of indices.
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of quad faces in the mesh.
    pub fn face_count(&self) -> usize {
        debug_assert_eq!(
            self.indices.len() / INDICES_PER_FACE,
            self.vertex_count() / VERTICES_PER_FACE
        );
        self.indices.len() / INDICES_PER_FACE
    }

    /// A mesh with no indices draws nothing and is never kept in a cache.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Drops all geometry but keeps the allocations and layout.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// The vertex stream as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index list as raw bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;
    use crate::rendering::meshing::face_emitter::emit_face;
    use crate::voxels::voxel::voxel_face::VoxelFace;

    #[test]
    fn test_empty_mesh() {
        let mesh = ChunkMesh::new(VertexLayout::PositionNormalUv);
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.face_count(), 0);
        assert!(mesh.vertex_bytes().is_empty());
    }

    #[test]
    fn test_counts_and_byte_views() {
        let mut mesh = ChunkMesh::new(VertexLayout::PositionNormalUvColor);
        for face in VoxelFace::all() {
            emit_face(
                &mut mesh.vertices,
                &mut mesh.indices,
                mesh.layout,
                Point3::new(0.0, 0.0, 0.0),
                face,
                [1.0; 3],
            );
        }

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.vertex_bytes().len(), 24 * mesh.layout.stride());
        assert_eq!(mesh.index_bytes().len(), 36 * 4);

        mesh.clear();
        assert!(mesh.is_empty());
        assert_eq!(mesh.layout, VertexLayout::PositionNormalUvColor);
    }
}
