//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed 32x32x32 block of voxels with
//! per-face neighbor links, dirty/modified/empty tracking, and face-culled mesh
//! generation.
//!
//! ## Storage
//!
//! Voxels are stored inline in a flat array indexed by `x + y * N + z * N²`. Since a
//! voxel is a single `u8` tag, a chunk's voxel data is exactly 32 KiB.
//!
//! Emptiness is tracked with a running count of non-air voxels, so `is_empty` stays
//! O(1) even when voxels are removed.
//!
//! ## Thread Safety
//!
//! All mutable state sits behind a single `parking_lot::RwLock`. Readers take shared
//! access and writers exclusive access. No method ever holds two chunk locks at once:
//! cross-chunk reads go through a [`Neighborhood`] one `get_voxel` call at a time.
//!
//! ## Meshing
//!
//! `generate_mesh` copies the chunk's own voxels out and clears the dirty flag under one
//! write lock, then walks the copy and queries neighbors only for faces on the chunk
//! boundary. The result is not an atomic snapshot of the neighborhood; any edit that
//! lands after the copy marks the chunk dirty again, so the next update pass corrects it.

use cgmath::Point3;
use parking_lot::RwLock;

use crate::rendering::meshing::chunk_mesh::ChunkMesh;
use crate::rendering::meshing::face_emitter::emit_face;
use crate::rendering::vertex::VertexLayout;
use crate::voxels::chunk_manager::chunk_arena::ChunkKey;
use crate::voxels::position::{ChunkPosition, LocalPosition, VoxelPosition};
use crate::voxels::voxel::voxel_face::VoxelFace;
use crate::voxels::voxel::voxel_type::VoxelType;
use crate::voxels::voxel::Voxel;

pub use neighborhood::Neighborhood;

pub mod chunk_generation;
pub mod neighborhood;

/// The edge length of a chunk in voxels.
pub const CHUNK_SIZE: i32 = 32;
/// The number of voxels in one 2D plane of a chunk (CHUNK_SIZE²).
pub const CHUNK_PLANE_SIZE: i32 = CHUNK_SIZE * CHUNK_SIZE;
/// The total number of voxels in a chunk (CHUNK_SIZE³).
pub const CHUNK_VOLUME: usize = (CHUNK_PLANE_SIZE * CHUNK_SIZE) as usize;

/// Lock-guarded state of a chunk.
#[derive(Debug)]
struct ChunkState {
    voxels: Vec<Voxel>,
    neighbors: [Option<ChunkKey>; 6],
    is_dirty: bool,
    is_modified: bool,
    non_air_count: usize,
}

/// A 32x32x32 block of voxels, the unit of loading, meshing and dirty tracking.
#[derive(Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates. Fixed for the chunk's lifetime.
    position: ChunkPosition,
    state: RwLock<ChunkState>,
}

/// Flat array index of an in-range local coordinate.
fn index_of(x: i32, y: i32, z: i32) -> Option<usize> {
    if LocalPosition::new(x, y, z).is_in_bounds() {
        Some((x + y * CHUNK_SIZE + z * CHUNK_PLANE_SIZE) as usize)
    } else {
        None
    }
}

impl Chunk {
    /// Creates a new chunk with every voxel set to air.
    ///
    /// # Returns
    /// An empty, dirty, unmodified chunk with no neighbors.
    pub fn new(position: ChunkPosition) -> Self {
        Self::from_voxels(position, vec![Voxel::AIR; CHUNK_VOLUME])
    }

    /// Wraps pre-generated voxel data. `voxels` must hold exactly `CHUNK_VOLUME` entries.
    pub(crate) fn from_voxels(position: ChunkPosition, voxels: Vec<Voxel>) -> Self {
        debug_assert_eq!(voxels.len(), CHUNK_VOLUME);
        let non_air_count = voxels.iter().filter(|v| v.is_solid()).count();
        Chunk {
            position,
            state: RwLock::new(ChunkState {
                voxels,
                neighbors: [None; 6],
                is_dirty: true,
                is_modified: false,
                non_air_count,
            }),
        }
    }

    /// The chunk's position in the chunk grid.
    pub fn position(&self) -> ChunkPosition {
        self.position
    }

    /// Global voxel position of this chunk's local `(0, 0, 0)`.
    pub fn world_origin(&self) -> VoxelPosition {
        self.position.origin()
    }

    /// Gets the voxel at local coordinates, or air if they are outside the chunk.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> Voxel {
        match index_of(x, y, z) {
            Some(i) => self.state.read().voxels[i],
            None => Voxel::AIR,
        }
    }

    /// [`Chunk::get_voxel`] taking a [`LocalPosition`].
    pub fn get_voxel_at(&self, local: LocalPosition) -> Voxel {
        self.get_voxel(local.x, local.y, local.z)
    }

    /// Sets the voxel at local coordinates. Out-of-range coordinates are ignored.
    ///
    /// Writing the type a voxel already has changes nothing. Any real change marks the
    /// chunk dirty and modified and keeps the emptiness count current.
    ///
    /// # Returns
    /// `true` if the stored voxel changed.
    pub fn set_voxel(&self, x: i32, y: i32, z: i32, voxel: Voxel) -> bool {
        let Some(i) = index_of(x, y, z) else {
            return false;
        };

        let mut state = self.state.write();
        let existing = state.voxels[i];
        if existing == voxel {
            return false;
        }

        state.voxels[i] = voxel;
        state.is_dirty = true;
        state.is_modified = true;
        match (existing.is_solid(), voxel.is_solid()) {
            (false, true) => state.non_air_count += 1,
            (true, false) => state.non_air_count -= 1,
            _ => {}
        }
        true
    }

    /// [`Chunk::set_voxel`] taking a [`LocalPosition`].
    pub fn set_voxel_at(&self, local: LocalPosition, voxel: Voxel) -> bool {
        self.set_voxel(local.x, local.y, local.z, voxel)
    }

    /// Overwrites every voxel with one type.
    pub fn fill(&self, voxel_type: VoxelType) {
        let voxel = Voxel::new(voxel_type);
        let mut state = self.state.write();
        state.voxels.fill(voxel);
        state.non_air_count = if voxel.is_air() { 0 } else { CHUNK_VOLUME };
        state.is_dirty = true;
        state.is_modified = true;
    }

    /// Like `get_voxel`, but a coordinate exactly one step outside the chunk along a
    /// single axis is read from the neighbor across that face, at the opposite edge.
    ///
    /// Missing neighbors and anything further out resolve to air.
    ///
    /// # Arguments
    /// * `x`, `y`, `z` - Local coordinates, each in `-1..=CHUNK_SIZE`
    /// * `neighbors` - The resolved neighbor chunks
    pub fn get_voxel_safe(&self, x: i32, y: i32, z: i32, neighbors: &Neighborhood) -> Voxel {
        match boundary_crossing(x, y, z) {
            Crossing::Inside => self.get_voxel(x, y, z),
            Crossing::Across(face, local) => neighbors
                .get(face)
                .map_or(Voxel::AIR, |chunk| chunk.get_voxel_at(local)),
            Crossing::Outside => Voxel::AIR,
        }
    }

    /// Links a neighbor across `face`. Changing a neighbor marks the chunk dirty since
    /// boundary faces may now be hidden or revealed.
    pub fn set_neighbor(&self, face: VoxelFace, neighbor: Option<ChunkKey>) {
        let mut state = self.state.write();
        state.neighbors[face.index()] = neighbor;
        state.is_dirty = true;
    }

    /// The neighbor linked across `face`.
    pub fn get_neighbor(&self, face: VoxelFace) -> Option<ChunkKey> {
        self.state.read().neighbors[face.index()]
    }

    /// All six neighbor links, indexed by [`VoxelFace::index`].
    pub fn neighbors(&self) -> [Option<ChunkKey>; 6] {
        self.state.read().neighbors
    }

    /// Whether the mesh needs regenerating.
    pub fn is_dirty(&self) -> bool {
        self.state.read().is_dirty
    }

    /// Overrides the dirty flag.
    pub fn set_dirty(&self, dirty: bool) {
        self.state.write().is_dirty = dirty;
    }

    /// Whether the chunk has been edited since it was created.
    pub fn is_modified(&self) -> bool {
        self.state.read().is_modified
    }

    /// Whether every voxel in the chunk is air.
    pub fn is_empty(&self) -> bool {
        self.state.read().non_air_count == 0
    }

    /// Number of voxels that are not air.
    pub fn non_air_count(&self) -> usize {
        self.state.read().non_air_count
    }

    /// Copies out the voxel array under a single read lock.
    pub fn snapshot(&self) -> Vec<Voxel> {
        self.state.read().voxels.clone()
    }

    /// Generates the chunk's mesh in the default layout.
    pub fn generate_mesh(&self, neighbors: &Neighborhood) -> ChunkMesh {
        self.generate_mesh_with_layout(neighbors, VertexLayout::default())
    }

    /// Generates a face-culled mesh of the chunk.
    ///
    /// A face of a solid voxel is emitted when the voxel across it is transparent
    /// (air included). Positions are in world space. Generation clears the dirty flag;
    /// an empty chunk returns an empty mesh right away and keeps its flag.
    ///
    /// # Arguments
    /// * `neighbors` - The resolved neighbor chunks used at the boundary
    /// * `layout` - Vertex layout to emit
    pub fn generate_mesh_with_layout(
        &self,
        neighbors: &Neighborhood,
        layout: VertexLayout,
    ) -> ChunkMesh {
        let mut mesh = ChunkMesh::new(layout);
        let Some(voxels) = self.take_for_meshing() else {
            return mesh;
        };
        let origin = self.world_origin();

        for x in 0..CHUNK_SIZE {
            for y in 0..CHUNK_SIZE {
                for z in 0..CHUNK_SIZE {
                    let voxel = voxels[(x + y * CHUNK_SIZE + z * CHUNK_PLANE_SIZE) as usize];
                    if voxel.is_air() {
                        continue;
                    }

                    let corner = Point3::new(
                        (origin.x + x) as f32,
                        (origin.y + y) as f32,
                        (origin.z + z) as f32,
                    );
                    for face in VoxelFace::all() {
                        let offset = face.offset();
                        let (nx, ny, nz) = (x + offset.x, y + offset.y, z + offset.z);
                        let across = match index_of(nx, ny, nz) {
                            Some(i) => voxels[i],
                            None => self.get_voxel_safe(nx, ny, nz, neighbors),
                        };
                        if across.is_transparent() {
                            emit_face(
                                &mut mesh.vertices,
                                &mut mesh.indices,
                                layout,
                                corner,
                                face,
                                voxel.color(),
                            );
                        }
                    }
                }
            }
        }

        mesh
    }

    /// Copies the voxels out and clears the dirty flag in one critical section, so an
    /// edit made while the copy is being meshed leaves the chunk dirty.
    ///
    /// # Returns
    /// `None` for an empty chunk, whose flag is left as it was.
    fn take_for_meshing(&self) -> Option<Vec<Voxel>> {
        let mut state = self.state.write();
        if state.non_air_count == 0 {
            return None;
        }
        state.is_dirty = false;
        Some(state.voxels.clone())
    }
}

/// Where a possibly out-of-range local coordinate falls.
enum Crossing {
    Inside,
    /// One step across a single face, with the coordinate inside that neighbor.
    Across(VoxelFace, LocalPosition),
    Outside,
}

fn boundary_crossing(x: i32, y: i32, z: i32) -> Crossing {
    let in_range = |c: i32| (0..CHUNK_SIZE).contains(&c);
    let last = CHUNK_SIZE - 1;
    match (in_range(x), in_range(y), in_range(z)) {
        (true, true, true) => Crossing::Inside,
        (false, true, true) if x == -1 => {
            Crossing::Across(VoxelFace::LEFT, LocalPosition::new(last, y, z))
        }
        (false, true, true) if x == CHUNK_SIZE => {
            Crossing::Across(VoxelFace::RIGHT, LocalPosition::new(0, y, z))
        }
        (true, false, true) if y == -1 => {
            Crossing::Across(VoxelFace::BOTTOM, LocalPosition::new(x, last, z))
        }
        (true, false, true) if y == CHUNK_SIZE => {
            Crossing::Across(VoxelFace::TOP, LocalPosition::new(x, 0, z))
        }
        (true, true, false) if z == -1 => {
            Crossing::Across(VoxelFace::BACK, LocalPosition::new(x, y, last))
        }
        (true, true, false) if z == CHUNK_SIZE => {
            Crossing::Across(VoxelFace::FRONT, LocalPosition::new(x, y, 0))
        }
        _ => Crossing::Outside,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chunk_generation::SolidChunkFactory;

    const STONE: Voxel = Voxel::new(VoxelType::STONE);
    const LAST: i32 = CHUNK_SIZE - 1;

    fn origin_chunk() -> Chunk {
        Chunk::new(ChunkPosition::new(0, 0, 0))
    }

    #[test]
    fn test_fresh_chunk_is_empty_dirty_air() {
        let chunk = origin_chunk();
        assert!(chunk.is_empty());
        assert!(chunk.is_dirty());
        assert!(!chunk.is_modified());
        assert!(chunk.snapshot().iter().all(|v| v.is_air()));
        assert_eq!(chunk.get_voxel(0, 0, 0), Voxel::AIR);
        assert_eq!(chunk.get_voxel(LAST, LAST, LAST), Voxel::AIR);
        assert!(chunk.neighbors().iter().all(Option::is_none));
    }

    #[test]
    fn test_out_of_range_access_is_a_no_op() {
        let chunk = origin_chunk();
        chunk.set_dirty(false);
        assert!(!chunk.set_voxel(-1, 0, 0, STONE));
        assert!(!chunk.set_voxel(0, CHUNK_SIZE, 0, STONE));
        assert!(chunk.is_empty());
        assert!(!chunk.is_dirty());
        assert_eq!(chunk.get_voxel(0, 0, -1), Voxel::AIR);
    }

    #[test]
    fn test_emptiness_follows_edits() {
        let chunk = origin_chunk();
        chunk.set_voxel(3, 4, 5, STONE);
        chunk.set_voxel(LAST, 0, 9, Voxel::new(VoxelType::GLASS));
        assert!(!chunk.is_empty());
        assert!(chunk.is_modified());
        assert_eq!(chunk.non_air_count(), 2);

        chunk.set_voxel(3, 4, 5, Voxel::AIR);
        assert!(!chunk.is_empty());
        chunk.set_voxel(LAST, 0, 9, Voxel::AIR);
        assert!(chunk.is_empty());
        // replacing one solid type with another does not change the count
        chunk.set_voxel(1, 1, 1, STONE);
        chunk.set_voxel(1, 1, 1, Voxel::new(VoxelType::DIRT));
        assert_eq!(chunk.non_air_count(), 1);
    }

    #[test]
    fn test_same_type_write_does_not_dirty() {
        let chunk = origin_chunk();
        chunk.set_voxel(2, 2, 2, STONE);
        chunk.set_dirty(false);
        assert!(!chunk.set_voxel(2, 2, 2, STONE));
        assert!(!chunk.is_dirty());
    }

    #[test]
    fn test_fill() {
        let chunk = origin_chunk();
        chunk.fill(VoxelType::SAND);
        assert_eq!(chunk.non_air_count(), CHUNK_VOLUME);
        assert_eq!(chunk.get_voxel(7, 8, 9), Voxel::new(VoxelType::SAND));
        assert!(chunk.is_modified());

        chunk.set_dirty(false);
        chunk.fill(VoxelType::AIR);
        assert!(chunk.is_empty());
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_get_voxel_safe_reads_across_faces() {
        let chunk = origin_chunk();
        let right = Arc::new(Chunk::new(ChunkPosition::new(1, 0, 0)));
        let bottom = Arc::new(Chunk::new(ChunkPosition::new(0, -1, 0)));
        right.set_voxel(0, 5, 6, STONE);
        bottom.set_voxel(7, LAST, 8, Voxel::new(VoxelType::BRICK));
        let hood = Neighborhood::default()
            .with(VoxelFace::RIGHT, right)
            .with(VoxelFace::BOTTOM, bottom);

        assert_eq!(chunk.get_voxel_safe(CHUNK_SIZE, 5, 6, &hood), STONE);
        assert_eq!(
            chunk.get_voxel_safe(7, -1, 8, &hood),
            Voxel::new(VoxelType::BRICK)
        );
        // no neighbor wired on the left
        assert_eq!(chunk.get_voxel_safe(-1, 5, 6, &hood), Voxel::AIR);
        // diagonal and far-away coordinates
        assert_eq!(chunk.get_voxel_safe(CHUNK_SIZE, -1, 6, &hood), Voxel::AIR);
        assert_eq!(chunk.get_voxel_safe(CHUNK_SIZE + 1, 5, 6, &hood), Voxel::AIR);
    }

    #[test]
    fn test_set_neighbor_marks_dirty() {
        let chunk = origin_chunk();
        chunk.set_dirty(false);
        chunk.set_neighbor(VoxelFace::TOP, None);
        assert!(chunk.is_dirty());
        assert_eq!(chunk.get_neighbor(VoxelFace::TOP), None);
    }

    #[test]
    fn test_single_voxel_mesh() {
        let chunk = Chunk::new(ChunkPosition::new(1, 0, -1));
        chunk.set_voxel(4, 5, 6, STONE);
        let mesh = chunk.generate_mesh(&Neighborhood::default());

        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(!chunk.is_dirty());

        // vertices are in world space: first emitted face is TOP at (36, 5, -26)
        assert_eq!(&mesh.vertices[0..3], &[36.0, 6.0, -25.0]);
    }

    #[test]
    fn test_empty_chunk_mesh_keeps_dirty_flag() {
        let chunk = origin_chunk();
        let mesh = chunk.generate_mesh(&Neighborhood::default());
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_adjacent_solid_chunks_hide_shared_boundary() {
        let factory = SolidChunkFactory { voxel: STONE };
        let left = Arc::new(Chunk::generate(ChunkPosition::new(0, 0, 0), &factory));
        let right = Arc::new(Chunk::generate(ChunkPosition::new(1, 0, 0), &factory));

        let alone = left.generate_mesh(&Neighborhood::default());
        // a lone solid chunk shows its six outer walls
        assert_eq!(alone.face_count(), 6 * CHUNK_PLANE_SIZE as usize);

        let hood = Neighborhood::default().with(VoxelFace::RIGHT, right.clone());
        let joined = left.generate_mesh(&hood);
        assert_eq!(joined.face_count(), 5 * CHUNK_PLANE_SIZE as usize);
        // no quad lies on the shared x = 32 plane
        let floats = joined.layout.floats_per_vertex();
        assert!(joined.vertices.chunks(floats).all(|v| v[0] < 32.0 || v[3] != 1.0));
    }

    #[test]
    fn test_fully_enclosed_solid_chunk_emits_nothing() {
        let factory = SolidChunkFactory { voxel: STONE };
        let center = Chunk::generate(ChunkPosition::new(0, 0, 0), &factory);
        let hood = VoxelFace::all().into_iter().fold(Neighborhood::default(), |hood, face| {
            let position = ChunkPosition::new(0, 0, 0).neighbor(face);
            hood.with(face, Arc::new(Chunk::generate(position, &factory)))
        });
        assert!(center.generate_mesh(&hood).is_empty());
    }

    #[test]
    fn test_faces_against_transparent_voxels_are_emitted() {
        let chunk = origin_chunk();
        chunk.set_voxel(1, 1, 1, STONE);
        chunk.set_voxel(2, 1, 1, Voxel::new(VoxelType::GLASS));
        chunk.set_voxel(3, 1, 1, Voxel::new(VoxelType::WATER));
        let hood = Neighborhood::default();
        let mesh = chunk.generate_mesh_with_layout(&hood, VertexLayout::PositionNormalUv);

        // only the glass face against the stone is hidden
        assert_eq!(mesh.face_count(), 17);
        assert_eq!(mesh.layout, VertexLayout::PositionNormalUv);
    }

    #[test]
    fn test_edit_during_generation_keeps_chunk_dirty() {
        use chunk_generation::CheckerboardChunkFactory;

        let factory = CheckerboardChunkFactory { voxel: STONE };
        let brick = Voxel::new(VoxelType::BRICK);
        for round in 0..20 {
            let chunk = Arc::new(Chunk::generate(ChunkPosition::new(0, 0, 0), &factory));
            let mesher = {
                let chunk = chunk.clone();
                std::thread::spawn(move || chunk.generate_mesh(&Neighborhood::default()))
            };
            std::thread::sleep(std::time::Duration::from_micros(50 * round));
            chunk.set_voxel(1, 0, 0, brick);
            let mesh = mesher.join().unwrap();

            // a mesh that missed the edit must leave the chunk scheduled
            if !chunk.is_dirty() {
                assert_eq!(mesh, chunk.generate_mesh(&Neighborhood::default()));
            }
        }
    }

    #[test]
    fn test_generation_clears_dirty_and_later_edit_sets_it() {
        let chunk = origin_chunk();
        chunk.set_voxel(4, 4, 4, STONE);
        chunk.generate_mesh(&Neighborhood::default());
        assert!(!chunk.is_dirty());
        chunk.set_voxel(5, 4, 4, STONE);
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_mesh_color_comes_from_voxel_type() {
        let chunk = origin_chunk();
        chunk.set_voxel(0, 0, 0, Voxel::new(VoxelType::GRASS));
        let mesh = chunk.generate_mesh(&Neighborhood::default());
        // position(3) normal(3) uv(2) then color
        assert_eq!(&mesh.vertices[8..11], &[0.2, 0.8, 0.2]);
    }
}
