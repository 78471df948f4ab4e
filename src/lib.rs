#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! A minimal voxel-world engine: a chunked voxel store and a mesh pipeline that turns
//! occupied voxels into face-culled triangle geometry.
//!
//! ## Key Modules
//!
//! * `voxels` - Voxels, coordinates, chunks and the chunk manager
//! * `rendering` - Vertex layouts, mesh generation, the geometry backend and the mesh cache
//! * `config` - JSON engine configuration
//! * `error` - Error types for the fallible outer layers
//!
//! ## Architecture
//!
//! `ChunkManager::set_voxel` writes into the owning chunk, which marks itself (and on a
//! boundary, its neighbor) dirty. An update pass asks the manager for dirty chunks,
//! generates their meshes against their six neighbors, and replaces the entries in the
//! `MeshCache`, which uploads them through a `GeometryBackend`. Rendering issues one
//! draw per cached mesh.
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::rendering::geometry_backend::HeadlessBackend;
//! use voxel_world::rendering::mesh_cache::MeshCache;
//! use voxel_world::voxels::chunk_manager::ChunkManager;
//! use voxel_world::voxels::position::VoxelPosition;
//! use voxel_world::voxels::voxel::{voxel_type::VoxelType, Voxel};
//!
//! let manager = ChunkManager::new();
//! manager.set_voxel(VoxelPosition::new(0, 0, 0), Voxel::new(VoxelType::STONE)).unwrap();
//!
//! let mut cache = MeshCache::new(HeadlessBackend::new());
//! assert_eq!(cache.update_dirty_chunks(&manager).unwrap(), 1);
//! assert_eq!(cache.render_all().unwrap().faces, 6);
//! ```
//!
//! ## Performance Considerations
//!
//! * Chunk emptiness is an O(1) counter check, so empty chunks are skipped for free
//! * Meshing copies a chunk's voxels once and only locks neighbors at the boundary
//! * Dirty chunks can be meshed in parallel on the rayon pool

use std::error::Error;

use log::info;
use web_time::Instant;

use config::{EngineConfig, CONFIG_PATH_ENV};
use rendering::geometry_backend::HeadlessBackend;
use rendering::mesh_cache::MeshCache;
use voxels::chunk_manager::ChunkManager;
use voxels::position::ChunkPosition;

pub mod config;
pub mod demo;
pub mod error;
pub mod rendering;
pub mod voxels;

/// Loads the configuration named by `VOXEL_WORLD_CONFIG`, or the defaults.
pub fn load_config() -> error::VoxelResult<EngineConfig> {
    match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => EngineConfig::from_file(path),
        None => Ok(EngineConfig::default()),
    }
}

/// Initializes `env_logger` on stdout. `RUST_LOG` overrides the configured filter.
fn init_logging(config: &EngineConfig) {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_filters(&config.log_filter)
        .parse_env("RUST_LOG");
    // a logger may already be installed when embedded
    let _ = log_builder.try_init();
}

/// Runs the headless demo: builds the demo scene, meshes and renders it once, then
/// unloads a chunk, re-meshes, and tears the cache down.
pub fn run() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    init_logging(&config);
    info!("Logger initialized");

    let manager = ChunkManager::from_config(&config)?;
    let mut cache = MeshCache::from_config(HeadlessBackend::new(), &config);

    let start = Instant::now();
    let scene = demo::build_demo_scene(&manager)?;
    info!("Built demo scene of {} chunks in {:?}", scene.len(), start.elapsed());
    manager.log_stats();

    let updated = cache.update_dirty_chunks(&manager)?;
    let stats = cache.render_all()?;
    info!(
        "Updated {} chunks, rendered {} chunks with {} faces ({} triangles)",
        updated, stats.chunks, stats.faces, stats.triangles
    );
    manager.log_stats();

    let corner = ChunkPosition::new(1, 0, 1);
    if manager.unload_chunk(corner) {
        info!("Unloaded chunk {}", corner);
    }
    let updated = cache.update_dirty_chunks(&manager)?;
    let stats = cache.render_all()?;
    info!(
        "Re-meshed {} chunks, rendered {} chunks with {} faces",
        updated, stats.chunks, stats.faces
    );
    manager.log_stats();

    let totals = cache.backend().totals();
    cache.clear()?;
    info!(
        "Geometry backend: {} uploads, {} draws, {} releases",
        totals.uploads,
        totals.draws,
        cache.backend().totals().releases
    );
    Ok(())
}
