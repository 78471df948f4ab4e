//! # Error Types
//!
//! Voxel access on the hot path never fails: out-of-range coordinates and missing
//! neighbors resolve to air. The errors below only surface from the outer layers,
//! i.e. strict chunk addressing, name parsing and configuration loading.

use thiserror::Error;

use crate::voxels::position::ChunkPosition;

/// Errors produced by the voxel world outside of per-voxel access.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// The chunk is not resident and the manager is configured not to create it.
    #[error("chunk {0} is not loaded")]
    ChunkNotLoaded(ChunkPosition),

    /// A voxel type name did not match any known type.
    #[error("unknown voxel type `{0}`")]
    UnknownVoxelType(String),

    /// A configuration value was syntactically valid but semantically wrong.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used across the crate.
pub type VoxelResult<T> = Result<T, VoxelError>;
