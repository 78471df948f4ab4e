//! # Engine Configuration
//!
//! Runtime settings for the world and the meshing pipeline, read from JSON. Every
//! field has a default, so an empty document (`{}`) is a valid configuration.
//!
//! ```json
//! {
//!     "create_on_read": true,
//!     "chunk_generation": "checkerboard",
//!     "generation_voxel": "brick",
//!     "parallel_meshing": true,
//!     "chunk_mesh_layout": "position_normal_uv",
//!     "log_filter": "debug"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{VoxelError, VoxelResult};
use crate::rendering::vertex::VertexLayout;
use crate::voxels::chunk::chunk_generation::{factory_for, ChunkFactory, ChunkGenerationMethod};
use crate::voxels::voxel::voxel_type::VoxelType;
use crate::voxels::voxel::Voxel;

/// Environment variable naming a configuration file for [`crate::run`].
pub const CONFIG_PATH_ENV: &str = "VOXEL_WORLD_CONFIG";

/// Settings for the chunk manager, chunk generation and mesh cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Whether reading an unloaded chunk creates it.
    pub create_on_read: bool,
    /// Strategy used to fill newly created chunks.
    pub chunk_generation: ChunkGenerationMethod,
    /// Name of the voxel type used by the non-empty generation strategies.
    pub generation_voxel: String,
    /// Fill probability for random generation, in `[0, 1]`.
    pub random_density: f64,
    /// Base seed for random generation.
    pub random_seed: u64,
    /// Generate dirty chunk meshes on the rayon thread pool.
    pub parallel_meshing: bool,
    /// Vertex layout of cached chunk meshes.
    pub chunk_mesh_layout: VertexLayout,
    /// Default `env_logger` filter. `RUST_LOG` takes precedence when set.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            create_on_read: true,
            chunk_generation: ChunkGenerationMethod::Empty,
            generation_voxel: "stone".to_string(),
            random_density: 0.1,
            random_seed: 0,
            parallel_meshing: false,
            chunk_mesh_layout: VertexLayout::PositionNormalUvColor,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(json: &str) -> VoxelResult<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> VoxelResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks the values serde cannot check on its own.
    pub fn validate(&self) -> VoxelResult<()> {
        if !(0.0..=1.0).contains(&self.random_density) {
            return Err(VoxelError::InvalidConfig(format!(
                "random_density must be within [0, 1], got {}",
                self.random_density
            )));
        }
        if self.log_filter.trim().is_empty() {
            return Err(VoxelError::InvalidConfig(
                "log_filter must not be empty".to_string(),
            ));
        }
        self.generation_voxel_type()?;
        Ok(())
    }

    /// The parsed `generation_voxel`.
    pub fn generation_voxel_type(&self) -> VoxelResult<VoxelType> {
        self.generation_voxel.parse()
    }

    /// Builds the chunk factory described by this configuration.
    pub fn chunk_factory(&self) -> VoxelResult<Box<dyn ChunkFactory>> {
        let voxel = Voxel::new(self.generation_voxel_type()?);
        Ok(factory_for(
            self.chunk_generation,
            voxel,
            self.random_density,
            self.random_seed,
        ))
    }
}
