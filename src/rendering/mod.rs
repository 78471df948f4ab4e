//! # Rendering
//!
//! Everything between voxel data and a graphics device: vertex layouts, mesh
//! generation, the backend contract, and the per-chunk mesh cache.
//!
//! The crate never talks to a GPU API directly. A [`geometry_backend::GeometryBackend`]
//! implementation supplies upload, draw and release; the bundled headless backend
//! records the same bookkeeping without a device.

pub mod geometry_backend;
pub mod mesh_cache;
pub mod meshing;
pub mod vertex;
