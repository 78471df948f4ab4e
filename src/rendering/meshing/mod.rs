//! Mesh generation for voxel rendering.
//!
//! Both meshing paths, the chunk mesher in [`crate::voxels::chunk`] and the
//! free-standing [`mesh_builder::MeshBuilder`], emit quads through the single
//! [`face_emitter::emit_face`] routine and its corner table.
//!
//! # Architecture
//! - `face_emitter`: corner/UV table and layout-driven quad emission
//! - `chunk_mesh`: the generated vertex and index buffers of one chunk
//! - `mesh_builder`: culling against an explicit six-voxel neighborhood

pub mod chunk_mesh;
pub mod face_emitter;
pub mod mesh_builder;
