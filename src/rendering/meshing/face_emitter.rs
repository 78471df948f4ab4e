//! Quad emission shared by every meshing path.
//!
//! Each face of the unit cell is described by four corners and their texture
//! coordinates. Corners are listed counter-clockwise when the face is viewed from
//! outside the cell, and every quad is split into the triangles `(0, 1, 2)` and
//! `(2, 3, 0)`, so back-face culling keeps exactly the outward side.

use cgmath::Point3;

use crate::rendering::vertex::VertexLayout;
use crate::voxels::voxel::voxel_face::VoxelFace;

/// Vertices emitted per face.
pub const VERTICES_PER_FACE: usize = 4;
/// Indices emitted per face.
pub const INDICES_PER_FACE: usize = 6;

/// Triangle order applied to every quad's four corners.
pub const QUAD_TRIANGLES: [u32; INDICES_PER_FACE] = [0, 1, 2, 2, 3, 0];

/// One corner of a face quad.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FaceCorner {
    /// Offset inside the unit cell, each component 0 or 1.
    pub position: [f32; 3],
    /// Texture coordinate of the corner.
    pub uv: [f32; 2],
}

const fn corner(x: f32, y: f32, z: f32, u: f32, v: f32) -> FaceCorner {
    FaceCorner {
        position: [x, y, z],
        uv: [u, v],
    }
}

/// Corner table indexed by [`VoxelFace::index`].
pub const FACE_CORNERS: [[FaceCorner; VERTICES_PER_FACE]; 6] = [
    // TOP
    [
        corner(0.0, 1.0, 1.0, 0.0, 0.0),
        corner(1.0, 1.0, 1.0, 1.0, 0.0),
        corner(1.0, 1.0, 0.0, 1.0, 1.0),
        corner(0.0, 1.0, 0.0, 0.0, 1.0),
    ],
    // BOTTOM
    [
        corner(0.0, 0.0, 0.0, 0.0, 0.0),
        corner(1.0, 0.0, 0.0, 1.0, 0.0),
        corner(1.0, 0.0, 1.0, 1.0, 1.0),
        corner(0.0, 0.0, 1.0, 0.0, 1.0),
    ],
    // LEFT
    [
        corner(0.0, 0.0, 0.0, 0.0, 0.0),
        corner(0.0, 0.0, 1.0, 1.0, 0.0),
        corner(0.0, 1.0, 1.0, 1.0, 1.0),
        corner(0.0, 1.0, 0.0, 0.0, 1.0),
    ],
    // RIGHT
    [
        corner(1.0, 0.0, 1.0, 0.0, 0.0),
        corner(1.0, 0.0, 0.0, 1.0, 0.0),
        corner(1.0, 1.0, 0.0, 1.0, 1.0),
        corner(1.0, 1.0, 1.0, 0.0, 1.0),
    ],
    // FRONT
    [
        corner(0.0, 0.0, 1.0, 0.0, 0.0),
        corner(1.0, 0.0, 1.0, 1.0, 0.0),
        corner(1.0, 1.0, 1.0, 1.0, 1.0),
        corner(0.0, 1.0, 1.0, 0.0, 1.0),
    ],
    // BACK
    [
        corner(1.0, 0.0, 0.0, 0.0, 0.0),
        corner(0.0, 0.0, 0.0, 1.0, 0.0),
        corner(0.0, 1.0, 0.0, 1.0, 1.0),
        corner(1.0, 1.0, 0.0, 0.0, 1.0),
    ],
];

/// Appends one face quad to an interleaved vertex stream and its index list.
///
/// # Arguments
/// * `vertices` - Interleaved vertex stream laid out as `layout`
/// * `indices` - Triangle index list the quad's six indices are appended to
/// * `layout` - Attributes written per vertex
/// * `origin` - World position of the voxel's lower corner
/// * `face` - Which face of the voxel to emit
/// * `color` - Flat color, written only if the layout carries color
pub fn emit_face(
    vertices: &mut Vec<f32>,
    indices: &mut Vec<u32>,
    layout: VertexLayout,
    origin: Point3<f32>,
    face: VoxelFace,
    color: [f32; 3],
) {
    let floats = layout.floats_per_vertex();
    let base = (vertices.len() / floats) as u32;
    let normal = face.normal();

    vertices.reserve(VERTICES_PER_FACE * floats);
    for corner in &FACE_CORNERS[face.index()] {
        vertices.extend_from_slice(&[
            origin.x + corner.position[0],
            origin.y + corner.position[1],
            origin.z + corner.position[2],
            normal.x,
            normal.y,
            normal.z,
        ]);
        if layout.has_uv() {
            vertices.extend_from_slice(&corner.uv);
        }
        if layout.has_color() {
            vertices.extend_from_slice(&color);
        }
    }

    indices.extend(QUAD_TRIANGLES.iter().map(|i| base + i));
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    fn corner_vec(c: &FaceCorner) -> Vector3<f32> {
        Vector3::new(c.position[0], c.position[1], c.position[2])
    }

    #[test]
    fn test_every_face_winds_counter_clockwise_from_outside() {
        for face in VoxelFace::all() {
            let corners = &FACE_CORNERS[face.index()];
            for tri in QUAD_TRIANGLES.chunks(3) {
                let a = corner_vec(&corners[tri[0] as usize]);
                let b = corner_vec(&corners[tri[1] as usize]);
                let c = corner_vec(&corners[tri[2] as usize]);
                let n = (b - a).cross(c - a).normalize();
                assert_eq!(n, face.normal(), "{face:?}");
            }
        }
    }

    #[test]
    fn test_corners_lie_on_their_face() {
        for face in VoxelFace::all() {
            let normal = face.normal();
            let plane = if normal.x + normal.y + normal.z > 0.0 { 1.0 } else { 0.0 };
            for c in &FACE_CORNERS[face.index()] {
                assert_eq!(corner_vec(c).dot(normal).abs(), plane, "{face:?}");
            }
        }
    }

    #[test]
    fn test_emit_offsets_indices_by_existing_vertices() {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        let layout = VertexLayout::PositionNormalColor;
        let origin = Point3::new(10.0, 0.0, -3.0);

        emit_face(&mut vertices, &mut indices, layout, origin, VoxelFace::TOP, [0.5; 3]);
        emit_face(&mut vertices, &mut indices, layout, origin, VoxelFace::FRONT, [0.5; 3]);

        assert_eq!(vertices.len(), 2 * VERTICES_PER_FACE * 9);
        assert_eq!(indices, vec![0, 1, 2, 2, 3, 0, 4, 5, 6, 6, 7, 4]);
        // first top corner: position, normal, color
        assert_eq!(
            &vertices[0..9],
            &[10.0, 1.0, -2.0, 0.0, 1.0, 0.0, 0.5, 0.5, 0.5]
        );
    }

    #[test]
    fn test_uv_layout_skips_color() {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();
        emit_face(
            &mut vertices,
            &mut indices,
            VertexLayout::PositionNormalUv,
            Point3::new(0.0, 0.0, 0.0),
            VoxelFace::RIGHT,
            [0.1, 0.2, 0.3],
        );
        assert_eq!(vertices.len(), 4 * 8);
        assert_eq!(&vertices[8..16], &[1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
