//! Resolved face neighbors of a chunk.
//!
//! A chunk stores its neighbors as arena keys; before a cross-chunk read those keys
//! are resolved by the manager into a [`Neighborhood`] of shared chunk references.
//! Holding a neighborhood keeps the neighbor chunks alive but takes no locks.

use std::sync::Arc;

use super::Chunk;
use crate::voxels::voxel::voxel_face::VoxelFace;

/// Up to six face-adjacent chunks, indexed by [`VoxelFace`].
#[derive(Clone, Default)]
pub struct Neighborhood {
    chunks: [Option<Arc<Chunk>>; 6],
}

impl Neighborhood {
    /// Wraps chunks indexed by [`VoxelFace::index`].
    pub fn new(chunks: [Option<Arc<Chunk>>; 6]) -> Self {
        Neighborhood { chunks }
    }

    /// Returns the neighborhood with `chunk` placed across `face`.
    pub fn with(mut self, face: VoxelFace, chunk: Arc<Chunk>) -> Self {
        self.chunks[face.index()] = Some(chunk);
        self
    }

    /// The chunk across `face`, if loaded.
    pub fn get(&self, face: VoxelFace) -> Option<&Arc<Chunk>> {
        self.chunks[face.index()].as_ref()
    }

    /// Number of faces with a resolved neighbor.
    pub fn len(&self) -> usize {
        self.chunks.iter().flatten().count()
    }

    /// Whether no neighbor is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
