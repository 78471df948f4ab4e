//! # Chunk Manager Module
//!
//! This module provides the `ChunkManager`, the sole owner of every loaded chunk. It
//! creates chunks, wires them to their neighbors, routes global voxel reads and writes
//! to the owning chunk, unloads chunks, and reports which chunks need meshing.
//!
//! ## Architecture
//!
//! Chunks live in a generational [`ChunkArena`], with a position index on top for
//! lookup. Neighbor links are arena keys, so a link to an unloaded chunk can never
//! resolve to a different chunk that later reuses the slot.
//!
//! Storage is sparse: only chunks that have been touched exist. By default a read of
//! an unloaded chunk creates it (read-through-create), which lets callers address an
//! unbounded world without pre-populating it. This is configurable; with it switched
//! off, reads of missing chunks return air and writes fail.
//!
//! ## Locking
//!
//! The manager's own lock guards the arena, the index and the counters. It is always
//! taken before any chunk lock, and chunk locks are taken one at a time. Chunk
//! operations on the routed voxel path run after the manager lock is released.

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info, trace};
use parking_lot::RwLock;

use crate::config::EngineConfig;
use crate::error::{VoxelError, VoxelResult};
use crate::voxels::chunk::chunk_generation::{ChunkFactory, EmptyChunkFactory};
use crate::voxels::chunk::{Chunk, Neighborhood};
use crate::voxels::position::{ChunkPosition, LocalPosition, VoxelPosition};
use crate::voxels::voxel::voxel_face::VoxelFace;
use crate::voxels::voxel::Voxel;

use chunk_arena::{ChunkArena, ChunkKey};

pub mod chunk_arena;

/// Aggregate counts over the loaded chunks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkManagerStats {
    /// Chunks created over the manager's lifetime.
    pub total: usize,
    /// Chunks currently resident.
    pub loaded: usize,
    /// Resident chunks flagged dirty.
    pub dirty: usize,
    /// Resident chunks containing only air.
    pub empty: usize,
}

#[derive(Default)]
struct ManagerState {
    arena: ChunkArena,
    index: HashMap<ChunkPosition, ChunkKey>,
    total_chunks: usize,
}

impl ManagerState {
    fn chunk_at(&self, position: ChunkPosition) -> Option<&Arc<Chunk>> {
        self.index
            .get(&position)
            .and_then(|key| self.arena.get(*key))
    }
}

/// Owns and coordinates all loaded chunks.
pub struct ChunkManager {
    state: RwLock<ManagerState>,
    factory: Box<dyn ChunkFactory>,
    create_on_read: bool,
}

impl Default for ChunkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkManager {
    /// Creates a manager that generates empty chunks and creates chunks on read.
    pub fn new() -> Self {
        ChunkManager {
            state: RwLock::new(ManagerState::default()),
            factory: Box::new(EmptyChunkFactory),
            create_on_read: true,
        }
    }

    /// Creates a manager configured from an [`EngineConfig`].
    pub fn from_config(config: &EngineConfig) -> VoxelResult<Self> {
        Ok(Self::new()
            .with_factory(config.chunk_factory()?)
            .with_create_on_read(config.create_on_read))
    }

    /// Replaces the factory that fills newly created chunks.
    pub fn with_factory(mut self, factory: Box<dyn ChunkFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Toggles read-through-create.
    pub fn with_create_on_read(mut self, create_on_read: bool) -> Self {
        self.create_on_read = create_on_read;
        self
    }

    /// Whether reads of unloaded chunks create them.
    pub fn create_on_read(&self) -> bool {
        self.create_on_read
    }

    /// Returns the chunk at `position`, creating it if it does not exist yet.
    ///
    /// Creation is idempotent. A new chunk is generated by the factory, registered, and
    /// wired in both directions to every neighbor that is already loaded.
    pub fn create_chunk(&self, position: ChunkPosition) -> Arc<Chunk> {
        if let Some(chunk) = self.get_chunk_if_exists(position) {
            return chunk;
        }

        let generated = Arc::new(Chunk::generate(position, self.factory.as_ref()));

        let mut state = self.state.write();
        // another caller may have created it while we were generating
        if let Some(chunk) = state.chunk_at(position) {
            return chunk.clone();
        }

        let key = state.arena.insert(generated.clone());
        state.index.insert(position, key);
        state.total_chunks += 1;

        for face in VoxelFace::all() {
            let neighbor_position = position.neighbor(face);
            let Some(&neighbor_key) = state.index.get(&neighbor_position) else {
                continue;
            };
            if let Some(neighbor) = state.arena.get(neighbor_key) {
                generated.set_neighbor(face, Some(neighbor_key));
                neighbor.set_neighbor(face.opposite(), Some(key));
                trace!("Wired chunk {} {:?} of chunk {}", neighbor_position, face, position);
            }
        }

        debug!("Created chunk {} ({} loaded)", position, state.arena.len());
        generated
    }

    /// Returns the chunk at `position`.
    ///
    /// # Errors
    /// `ChunkNotLoaded` if the chunk does not exist and read-through-create is off.
    pub fn get_chunk(&self, position: ChunkPosition) -> VoxelResult<Arc<Chunk>> {
        if let Some(chunk) = self.get_chunk_if_exists(position) {
            return Ok(chunk);
        }
        if self.create_on_read {
            Ok(self.create_chunk(position))
        } else {
            Err(VoxelError::ChunkNotLoaded(position))
        }
    }

    /// Returns the chunk at `position` without ever creating it.
    pub fn get_chunk_if_exists(&self, position: ChunkPosition) -> Option<Arc<Chunk>> {
        self.state.read().chunk_at(position).cloned()
    }

    /// Whether a chunk is resident at `position`.
    pub fn is_loaded(&self, position: ChunkPosition) -> bool {
        self.state.read().index.contains_key(&position)
    }

    /// Reads the voxel at a global position.
    ///
    /// With read-through-create on, reading inside an unloaded chunk creates it. With it
    /// off, unloaded space reads as air.
    pub fn get_voxel(&self, position: VoxelPosition) -> Voxel {
        let (chunk_position, local) = position.split();
        let chunk = if self.create_on_read {
            Some(self.create_chunk(chunk_position))
        } else {
            self.get_chunk_if_exists(chunk_position)
        };
        chunk.map_or(Voxel::AIR, |chunk| chunk.get_voxel_at(local))
    }

    /// Writes the voxel at a global position.
    ///
    /// A write on a chunk boundary also marks the loaded chunk across that boundary
    /// dirty, since its faces against this voxel may change.
    ///
    /// # Errors
    /// `ChunkNotLoaded` if the chunk does not exist and read-through-create is off.
    pub fn set_voxel(&self, position: VoxelPosition, voxel: Voxel) -> VoxelResult<()> {
        let (chunk_position, local) = position.split();
        let chunk = self.get_chunk(chunk_position)?;
        chunk.set_voxel_at(local, voxel);
        self.mark_adjacent_chunks_dirty(chunk_position, local);
        Ok(())
    }

    fn mark_adjacent_chunks_dirty(&self, position: ChunkPosition, local: LocalPosition) {
        for face in local.boundary_faces() {
            if let Some(neighbor) = self.get_chunk_if_exists(position.neighbor(face)) {
                neighbor.set_dirty(true);
            }
        }
    }

    /// Removes the chunk at `position` and severs every neighbor link pointing at it.
    ///
    /// # Returns
    /// `true` if a chunk was unloaded.
    pub fn unload_chunk(&self, position: ChunkPosition) -> bool {
        let mut state = self.state.write();
        let Some(key) = state.index.remove(&position) else {
            return false;
        };
        let Some(chunk) = state.arena.remove(key) else {
            return false;
        };

        for face in VoxelFace::all() {
            if let Some(neighbor) = chunk.get_neighbor(face).and_then(|k| state.arena.get(k)) {
                neighbor.set_neighbor(face.opposite(), None);
            }
            chunk.set_neighbor(face, None);
        }

        debug!("Unloaded chunk {} ({} loaded)", position, state.arena.len());
        true
    }

    /// Resolves a chunk's neighbor links into shared references.
    pub fn neighborhood(&self, chunk: &Chunk) -> Neighborhood {
        let keys = chunk.neighbors();
        let state = self.state.read();
        Neighborhood::new(keys.map(|key| key.and_then(|k| state.arena.get(k).cloned())))
    }

    /// Loaded chunks that are dirty and not empty, i.e. those that need a new mesh.
    pub fn dirty_chunks(&self) -> Vec<Arc<Chunk>> {
        self.state
            .read()
            .arena
            .iter()
            .filter(|(_, chunk)| chunk.is_dirty() && !chunk.is_empty())
            .map(|(_, chunk)| chunk.clone())
            .collect()
    }

    /// Every loaded chunk, in no particular order.
    pub fn loaded_chunks(&self) -> Vec<Arc<Chunk>> {
        self.state
            .read()
            .arena
            .iter()
            .map(|(_, chunk)| chunk.clone())
            .collect()
    }

    /// Number of resident chunks.
    pub fn loaded_count(&self) -> usize {
        self.state.read().arena.len()
    }

    /// Counts over the resident chunks. Dirty and empty counts are a fresh scan.
    pub fn stats(&self) -> ChunkManagerStats {
        let state = self.state.read();
        let mut stats = ChunkManagerStats {
            total: state.total_chunks,
            loaded: state.arena.len(),
            ..Default::default()
        };
        for (_, chunk) in state.arena.iter() {
            if chunk.is_dirty() {
                stats.dirty += 1;
            }
            if chunk.is_empty() {
                stats.empty += 1;
            }
        }
        stats
    }

    /// Logs the current statistics at `info` level.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            "Chunks: {} total, {} loaded, {} dirty, {} empty",
            stats.total, stats.loaded, stats.dirty, stats.empty
        );
    }
}
