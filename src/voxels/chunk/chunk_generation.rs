//! # Chunk Generation Module
//!
//! This module provides the [`ChunkFactory`] capability that supplies the initial
//! voxels of newly created chunks, along with the built-in generation strategies:
//!
//! - Empty chunks (all voxels air), the default
//! - Solid chunks (every voxel the same type)
//! - Checkerboard pattern, alternating solid and air in all three axes
//! - Seeded random scatter
//!
//! Factories only fill a freshly zeroed voxel buffer. The chunk built around the
//! buffer still starts dirty and unmodified, whatever the factory wrote.

use serde::{Deserialize, Serialize};

use super::{Chunk, CHUNK_PLANE_SIZE, CHUNK_SIZE};
use crate::voxels::position::ChunkPosition;
use crate::voxels::voxel::Voxel;

/// Supplies the initial contents of a chunk.
///
/// The buffer handed to [`ChunkFactory::populate`] is all air and indexed like the
/// chunk itself, `x + y * CHUNK_SIZE + z * CHUNK_SIZE²`.
pub trait ChunkFactory: Send + Sync {
    fn populate(&self, position: ChunkPosition, voxels: &mut [Voxel]);
}

/// The built-in generation strategies, selectable from configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkGenerationMethod {
    /// Every voxel is air.
    #[default]
    Empty,
    /// Every voxel is the generation voxel.
    Solid,
    /// Alternating voxels in all three axes.
    Checkerboard,
    /// Voxels scattered with a fixed density.
    Random,
}

/// Leaves every voxel as air.
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyChunkFactory;

impl ChunkFactory for EmptyChunkFactory {
    fn populate(&self, _position: ChunkPosition, _voxels: &mut [Voxel]) {}
}

/// Fills every voxel with one type.
#[derive(Copy, Clone, Debug)]
pub struct SolidChunkFactory {
    /// The fill voxel.
    pub voxel: Voxel,
}

impl ChunkFactory for SolidChunkFactory {
    fn populate(&self, _position: ChunkPosition, voxels: &mut [Voxel]) {
        voxels.fill(self.voxel);
    }
}

/// Alternates between `voxel` and air along every axis.
#[derive(Copy, Clone, Debug)]
pub struct CheckerboardChunkFactory {
    /// The voxel placed on even cells.
    pub voxel: Voxel,
}

impl ChunkFactory for CheckerboardChunkFactory {
    fn populate(&self, _position: ChunkPosition, voxels: &mut [Voxel]) {
        for (i, voxel) in voxels.iter_mut().enumerate() {
            let i = i as i32;
            let (x, y, z) = (i % CHUNK_SIZE, (i / CHUNK_SIZE) % CHUNK_SIZE, i / CHUNK_PLANE_SIZE);
            if (x + y + z) % 2 == 0 {
                *voxel = self.voxel;
            }
        }
    }
}

/// Scatters `voxel` through the chunk with the given density.
///
/// Each chunk seeds its own generator from `seed` and its position, so the result
/// does not depend on the order chunks are created in.
#[derive(Copy, Clone, Debug)]
pub struct RandomChunkFactory {
    /// The voxel scattered.
    pub voxel: Voxel,
    /// Probability in `[0, 1]` that a voxel is filled.
    pub density: f64,
    /// Base seed, mixed with the chunk position.
    pub seed: u64,
}

impl RandomChunkFactory {
    fn chunk_seed(&self, position: ChunkPosition) -> u64 {
        let mut h = self.seed ^ 0x9E37_79B9_7F4A_7C15;
        for c in [position.x, position.y, position.z] {
            h = (h ^ c as u32 as u64).wrapping_mul(0x0100_0000_01B3);
            h ^= h >> 29;
        }
        h
    }
}

impl ChunkFactory for RandomChunkFactory {
    fn populate(&self, position: ChunkPosition, voxels: &mut [Voxel]) {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(position));
        for voxel in voxels.iter_mut() {
            if rng.f64() < self.density {
                *voxel = self.voxel;
            }
        }
    }
}

/// Builds the factory for a configured generation method.
///
/// # Arguments
/// * `method` - The generation strategy
/// * `voxel` - Voxel used by the non-empty strategies
/// * `density` - Fill probability for the random strategy
/// * `seed` - Seed for the random strategy
pub fn factory_for(
    method: ChunkGenerationMethod,
    voxel: Voxel,
    density: f64,
    seed: u64,
) -> Box<dyn ChunkFactory> {
    match method {
        ChunkGenerationMethod::Empty => Box::new(EmptyChunkFactory),
        ChunkGenerationMethod::Solid => Box::new(SolidChunkFactory { voxel }),
        ChunkGenerationMethod::Checkerboard => Box::new(CheckerboardChunkFactory { voxel }),
        ChunkGenerationMethod::Random => Box::new(RandomChunkFactory {
            voxel,
            density,
            seed,
        }),
    }
}

impl Chunk {
    /// Creates a chunk whose voxels are supplied by `factory`.
    ///
    /// # Returns
    /// A dirty, unmodified chunk with its emptiness derived from the generated voxels.
    pub fn generate(position: ChunkPosition, factory: &dyn ChunkFactory) -> Self {
        let mut voxels = vec![Voxel::AIR; super::CHUNK_VOLUME];
        factory.populate(position, &mut voxels);
        Chunk::from_voxels(position, voxels)
    }
}
