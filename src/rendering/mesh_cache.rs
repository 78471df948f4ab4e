//! # Mesh Cache Module
//!
//! Keeps the uploaded mesh of every chunk that has visible geometry, keyed by chunk
//! position, and regenerates meshes for chunks the manager reports dirty.
//!
//! ## Architecture
//!
//! The cache owns a [`GeometryBackend`] and every handle it has uploaded. A handle is
//! released exactly once: when its entry is replaced, removed, evicted, or on
//! [`MeshCache::clear`]. Empty meshes are never uploaded or kept.
//!
//! Dropping the cache does not touch the backend; `clear` is the teardown path.
//!
//! ## Performance Considerations
//!
//! - Meshes are regenerated wholesale, only for chunks that are dirty and non-empty
//! - With parallel meshing enabled, generation runs on the rayon pool; each chunk's
//!   mesh depends only on its own voxels and read-only neighbor reads. Uploads always
//!   happen on the calling thread

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;
use web_time::Instant;

use super::geometry_backend::{GeometryBackend, GeometryUpload};
use super::meshing::chunk_mesh::ChunkMesh;
use super::vertex::VertexLayout;
use crate::config::EngineConfig;
use crate::voxels::chunk::Chunk;
use crate::voxels::chunk_manager::ChunkManager;
use crate::voxels::position::ChunkPosition;

/// Counters from the most recent [`MeshCache::render_all`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Chunks drawn.
    pub chunks: usize,
    /// Quad faces drawn.
    pub faces: usize,
    /// Triangles drawn.
    pub triangles: usize,
}

/// A mesh together with the backend handle of its uploaded copy.
pub struct CachedMesh<H> {
    /// The CPU-side copy of the uploaded geometry.
    pub mesh: ChunkMesh,
    handle: H,
}

impl<H> CachedMesh<H> {
    /// The backend handle of the upload.
    pub fn handle(&self) -> &H {
        &self.handle
    }
}

/// Chunk position to uploaded mesh store.
pub struct MeshCache<B: GeometryBackend> {
    backend: B,
    meshes: HashMap<ChunkPosition, CachedMesh<B::Handle>>,
    layout: VertexLayout,
    parallel_meshing: bool,
    stats: RenderStats,
}

impl<B: GeometryBackend> MeshCache<B> {
    /// Creates an empty cache that meshes sequentially in the default layout.
    pub fn new(backend: B) -> Self {
        MeshCache {
            backend,
            meshes: HashMap::new(),
            layout: VertexLayout::default(),
            parallel_meshing: false,
            stats: RenderStats::default(),
        }
    }

    /// Creates a cache using the configured layout and meshing mode.
    pub fn from_config(backend: B, config: &EngineConfig) -> Self {
        Self::new(backend)
            .with_layout(config.chunk_mesh_layout)
            .with_parallel_meshing(config.parallel_meshing)
    }

    /// Sets the vertex layout of generated meshes.
    pub fn with_layout(mut self, layout: VertexLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Generates dirty meshes on the rayon pool when `true`.
    pub fn with_parallel_meshing(mut self, parallel_meshing: bool) -> Self {
        self.parallel_meshing = parallel_meshing;
        self
    }

    /// The vertex layout meshes are generated in.
    pub fn layout(&self) -> VertexLayout {
        self.layout
    }

    /// The geometry backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the geometry backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Regenerates and re-uploads the mesh of one chunk.
    ///
    /// The previous upload for the chunk, if any, is released first. An empty result
    /// leaves the chunk without a cache entry. If the backend fails, the chunk is
    /// marked dirty again so a later pass retries it.
    pub fn update_chunk_mesh(
        &mut self,
        manager: &ChunkManager,
        chunk: &Chunk,
    ) -> Result<(), B::Error> {
        let neighbors = manager.neighborhood(chunk);
        let mesh = chunk.generate_mesh_with_layout(&neighbors, self.layout);
        self.store_mesh(chunk.position(), mesh).inspect_err(|_| chunk.set_dirty(true))
    }

    fn store_mesh(&mut self, position: ChunkPosition, mesh: ChunkMesh) -> Result<(), B::Error> {
        if let Some(previous) = self.meshes.remove(&position) {
            self.backend.release(previous.handle)?;
        }
        if mesh.is_empty() {
            return Ok(());
        }

        let handle = self.backend.upload(&GeometryUpload::from_mesh(&mesh))?;
        self.meshes.insert(position, CachedMesh { mesh, handle });
        Ok(())
    }

    /// Regenerates the mesh of every dirty, non-empty chunk.
    ///
    /// Entries for chunks that have since been unloaded or emptied are released as
    /// well, since those chunks are never reported dirty again.
    ///
    /// # Returns
    /// The number of dirty chunks processed.
    ///
    /// # Errors
    /// The first backend error. The chunk that failed and every chunk not yet stored
    /// are marked dirty again before it is returned.
    pub fn update_dirty_chunks(&mut self, manager: &ChunkManager) -> Result<usize, B::Error> {
        let start = Instant::now();
        let dirty = manager.dirty_chunks();
        let layout = self.layout;

        let generate = |chunk: &Arc<Chunk>| {
            let neighbors = manager.neighborhood(chunk);
            chunk.generate_mesh_with_layout(&neighbors, layout)
        };
        let meshes: Vec<ChunkMesh> = if self.parallel_meshing {
            dirty.par_iter().map(generate).collect()
        } else {
            dirty.iter().map(generate).collect()
        };

        let mut pending = dirty.iter().zip(meshes);
        while let Some((chunk, mesh)) = pending.next() {
            if let Err(err) = self.store_mesh(chunk.position(), mesh) {
                chunk.set_dirty(true);
                let mut requeued = 1;
                for (chunk, _) in pending {
                    chunk.set_dirty(true);
                    requeued += 1;
                }
                warn!(
                    "Mesh upload for chunk {} failed, {} chunks requeued",
                    chunk.position(),
                    requeued
                );
                return Err(err);
            }
        }

        let evicted = self.evict_stale(manager)?;

        if !dirty.is_empty() || evicted > 0 {
            info!(
                "Meshed {} dirty chunks ({} cached, {} evicted) in {:?}",
                dirty.len(),
                self.meshes.len(),
                evicted,
                start.elapsed()
            );
        }
        Ok(dirty.len())
    }

    /// Releases entries whose chunk is no longer loaded or is now empty.
    fn evict_stale(&mut self, manager: &ChunkManager) -> Result<usize, B::Error> {
        let stale: Vec<ChunkPosition> = self
            .meshes
            .keys()
            .filter(|position| {
                manager
                    .get_chunk_if_exists(**position)
                    .map_or(true, |chunk| chunk.is_empty())
            })
            .copied()
            .collect();

        for position in &stale {
            self.remove_chunk_mesh(*position)?;
        }
        Ok(stale.len())
    }

    /// Draws every cached mesh, resetting and accumulating the render counters.
    pub fn render_all(&mut self) -> Result<RenderStats, B::Error> {
        self.stats = RenderStats::default();
        for cached in self.meshes.values() {
            self.backend.draw(&cached.handle)?;
            self.stats.chunks += 1;
            self.stats.faces += cached.mesh.face_count();
            self.stats.triangles += cached.mesh.triangle_count();
        }
        Ok(self.stats)
    }

    /// Draws the mesh of a single chunk.
    ///
    /// # Returns
    /// `false` if the chunk has no cached mesh.
    pub fn render_chunk(&mut self, position: ChunkPosition) -> Result<bool, B::Error> {
        match self.meshes.get(&position) {
            Some(cached) => {
                self.backend.draw(&cached.handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Counters from the most recent `render_all`.
    pub fn render_stats(&self) -> RenderStats {
        self.stats
    }

    /// Number of cached meshes.
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Whether a mesh is cached for the chunk.
    pub fn contains(&self, position: ChunkPosition) -> bool {
        self.meshes.contains_key(&position)
    }

    /// The cached mesh of a chunk.
    pub fn mesh(&self, position: ChunkPosition) -> Option<&ChunkMesh> {
        self.meshes.get(&position).map(|cached| &cached.mesh)
    }

    /// Releases and forgets the mesh of one chunk.
    ///
    /// # Returns
    /// `true` if there was a mesh to remove.
    pub fn remove_chunk_mesh(&mut self, position: ChunkPosition) -> Result<bool, B::Error> {
        match self.meshes.remove(&position) {
            Some(cached) => {
                self.backend.release(cached.handle)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Releases every cached mesh and empties the cache.
    ///
    /// All entries are released even if some releases fail; the first failure is
    /// returned.
    pub fn clear(&mut self) -> Result<(), B::Error> {
        let count = self.meshes.len();
        let mut first_error = None;
        for (_, cached) in self.meshes.drain() {
            if let Err(err) = self.backend.release(cached.handle) {
                first_error.get_or_insert(err);
            }
        }
        self.stats = RenderStats::default();
        debug!("Cleared {} cached chunk meshes", count);
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::geometry_backend::{HeadlessBackend, HeadlessError};
    use crate::voxels::position::VoxelPosition;
    use crate::voxels::voxel::voxel_type::VoxelType;
    use crate::voxels::voxel::Voxel;

    const STONE: Voxel = Voxel::new(VoxelType::STONE);

    fn cache() -> MeshCache<HeadlessBackend> {
        MeshCache::new(HeadlessBackend::new())
    }

    #[test]
    fn test_update_replaces_and_releases_previous_mesh() {
        let manager = ChunkManager::new();
        let mut cache = cache();
        manager.set_voxel(VoxelPosition::new(1, 1, 1), STONE).unwrap();
        let chunk = manager.get_chunk(ChunkPosition::new(0, 0, 0)).unwrap();

        cache.update_chunk_mesh(&manager, &chunk).unwrap();
        assert_eq!(cache.mesh_count(), 1);
        assert_eq!(cache.mesh(chunk.position()).unwrap().face_count(), 6);

        manager.set_voxel(VoxelPosition::new(2, 1, 1), STONE).unwrap();
        cache.update_chunk_mesh(&manager, &chunk).unwrap();
        assert_eq!(cache.mesh(chunk.position()).unwrap().face_count(), 10);

        let totals = cache.backend().totals();
        assert_eq!(totals.uploads, 2);
        assert_eq!(totals.releases, 1);
        assert_eq!(cache.backend().live_handles(), 1);
    }

    #[test]
    fn test_empty_result_removes_entry() {
        let manager = ChunkManager::new();
        let mut cache = cache();
        manager.set_voxel(VoxelPosition::new(1, 1, 1), STONE).unwrap();
        let chunk = manager.get_chunk(ChunkPosition::new(0, 0, 0)).unwrap();
        cache.update_chunk_mesh(&manager, &chunk).unwrap();

        manager.set_voxel(VoxelPosition::new(1, 1, 1), Voxel::AIR).unwrap();
        cache.update_chunk_mesh(&manager, &chunk).unwrap();
        assert!(!cache.contains(chunk.position()));
        assert_eq!(cache.backend().live_handles(), 0);
    }

    #[test]
    fn test_update_dirty_chunks_counts_and_clears_dirty() {
        let manager = ChunkManager::new();
        let mut cache = cache();
        manager.set_voxel(VoxelPosition::new(0, 0, 0), STONE).unwrap();
        manager.set_voxel(VoxelPosition::new(100, 0, 0), STONE).unwrap();
        manager.create_chunk(ChunkPosition::new(9, 9, 9));

        assert_eq!(cache.update_dirty_chunks(&manager).unwrap(), 2);
        assert_eq!(cache.mesh_count(), 2);
        assert!(manager.dirty_chunks().is_empty());
        assert_eq!(cache.update_dirty_chunks(&manager).unwrap(), 0);
    }

    #[test]
    fn test_parallel_meshing_matches_sequential() {
        let manager = ChunkManager::new();
        for x in -40..40 {
            manager
                .set_voxel(VoxelPosition::new(x, (x * 7).rem_euclid(50), x / 3), STONE)
                .unwrap();
        }

        let mut sequential = cache();
        sequential.update_dirty_chunks(&manager).unwrap();
        for chunk in manager.loaded_chunks() {
            chunk.set_dirty(true);
        }
        let mut parallel = cache().with_parallel_meshing(true);
        parallel.update_dirty_chunks(&manager).unwrap();

        assert_eq!(sequential.mesh_count(), parallel.mesh_count());
        for chunk in manager.loaded_chunks() {
            assert_eq!(
                sequential.mesh(chunk.position()),
                parallel.mesh(chunk.position())
            );
        }
    }

    #[test]
    fn test_unloaded_and_emptied_chunks_are_evicted() {
        let manager = ChunkManager::new();
        let mut cache = cache();
        manager.set_voxel(VoxelPosition::new(5, 5, 5), STONE).unwrap();
        manager.set_voxel(VoxelPosition::new(40, 5, 5), STONE).unwrap();
        cache.update_dirty_chunks(&manager).unwrap();
        assert_eq!(cache.mesh_count(), 2);

        manager.unload_chunk(ChunkPosition::new(1, 0, 0));
        manager.set_voxel(VoxelPosition::new(5, 5, 5), Voxel::AIR).unwrap();
        cache.update_dirty_chunks(&manager).unwrap();

        assert_eq!(cache.mesh_count(), 0);
        assert_eq!(cache.backend().live_handles(), 0);
        assert_eq!(cache.backend().totals().releases, 2);
    }

    #[test]
    fn test_render_all_resets_counters() {
        let manager = ChunkManager::new();
        let mut cache = cache();
        manager.set_voxel(VoxelPosition::new(0, 0, 0), STONE).unwrap();
        manager.set_voxel(VoxelPosition::new(-1, 0, 0), STONE).unwrap();
        cache.update_dirty_chunks(&manager).unwrap();

        let stats = cache.render_all().unwrap();
        // two voxels across a chunk boundary hide the pair of faces between them
        assert_eq!(
            stats,
            RenderStats {
                chunks: 2,
                faces: 10,
                triangles: 20,
            }
        );
        assert_eq!(cache.render_all().unwrap(), stats);
        assert_eq!(cache.render_stats(), stats);
        assert_eq!(cache.backend().totals().draws, 4);

        assert!(cache.render_chunk(ChunkPosition::new(0, 0, 0)).unwrap());
        assert!(!cache.render_chunk(ChunkPosition::new(7, 0, 0)).unwrap());
    }

    #[test]
    fn test_clear_releases_everything_once() {
        let manager = ChunkManager::new();
        let mut cache = cache();
        for x in 0..3 {
            manager.set_voxel(VoxelPosition::new(x * 32, 0, 0), STONE).unwrap();
        }
        cache.update_dirty_chunks(&manager).unwrap();
        assert_eq!(cache.mesh_count(), 3);

        cache.clear().unwrap();
        assert_eq!(cache.mesh_count(), 0);
        assert_eq!(cache.backend().live_handles(), 0);
        assert_eq!(cache.backend().totals().releases, 3);
        assert!(!cache.remove_chunk_mesh(ChunkPosition::new(0, 0, 0)).unwrap());
    }

    #[test]
    fn test_upload_failure_propagates_unmodified() {
        let manager = ChunkManager::new();
        let mut cache = MeshCache::new(HeadlessBackend::new().with_memory_limit(16));
        manager.set_voxel(VoxelPosition::new(0, 0, 0), STONE).unwrap();

        let err = cache.update_dirty_chunks(&manager).unwrap_err();
        assert!(matches!(err, HeadlessError::OutOfMemory { available: 16, .. }));
        assert_eq!(cache.mesh_count(), 0);
        // the chunk stays scheduled for the next pass
        assert_eq!(manager.dirty_chunks().len(), 1);
    }

    #[test]
    fn test_failed_pass_requeues_every_unstored_chunk() {
        let manager = ChunkManager::new();
        let mut cache = MeshCache::new(HeadlessBackend::new().with_memory_limit(16));
        for x in 0..3 {
            manager.set_voxel(VoxelPosition::new(x * 32, 0, 0), STONE).unwrap();
        }

        assert!(cache.update_dirty_chunks(&manager).is_err());
        assert_eq!(manager.dirty_chunks().len(), 3);
    }

    #[test]
    fn test_failed_single_update_keeps_chunk_dirty() {
        let manager = ChunkManager::new();
        let mut cache = MeshCache::new(HeadlessBackend::new().with_memory_limit(16));
        manager.set_voxel(VoxelPosition::new(3, 3, 3), STONE).unwrap();
        let chunk = manager.get_chunk(ChunkPosition::new(0, 0, 0)).unwrap();

        assert!(cache.update_chunk_mesh(&manager, &chunk).is_err());
        assert!(chunk.is_dirty());
        assert!(!cache.contains(chunk.position()));
    }

    #[test]
    fn test_layout_follows_config() {
        let config = EngineConfig {
            chunk_mesh_layout: VertexLayout::PositionNormalUv,
            ..Default::default()
        };
        let manager = ChunkManager::new();
        let mut cache = MeshCache::from_config(HeadlessBackend::new(), &config);
        manager.set_voxel(VoxelPosition::new(0, 0, 0), STONE).unwrap();
        cache.update_dirty_chunks(&manager).unwrap();

        let mesh = cache.mesh(ChunkPosition::new(0, 0, 0)).unwrap();
        assert_eq!(mesh.layout, VertexLayout::PositionNormalUv);
        assert_eq!(mesh.vertices.len(), 24 * 8);
    }
}
