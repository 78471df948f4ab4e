//! # Voxel World
//!
//! This module contains the voxel data model: voxels and their materials, the
//! coordinate spaces, chunks, and the manager that owns every loaded chunk.
//!
//! ## Architecture
//!
//! * **Voxel**: a single material tag with fixed air/solid/transparent/opaque classification
//! * **Position**: global voxel, chunk grid and chunk-local coordinates
//! * **Chunk**: a 32x32x32 voxel array with neighbor links and dirty tracking
//! * **ChunkManager**: creates, wires, routes to and unloads chunks
//!
//! ## Data Flow
//!
//! 1. `ChunkManager::set_voxel` splits the global position and writes into the owning chunk
//! 2. The chunk marks itself dirty; boundary writes also dirty the neighbor across the boundary
//! 3. An update pass asks the manager for dirty chunks and regenerates their meshes
//! 4. Mesh generation consumes the dirty flag
//!
//! ## Thread Safety
//!
//! Chunks and the manager are `Send + Sync`. Each chunk has its own reader/writer lock;
//! the manager's lock is always taken first and no two chunk locks are ever held together.

pub mod chunk;
pub mod chunk_manager;
pub mod position;
pub mod voxel;
