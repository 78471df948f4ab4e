//! # Geometry Backend Module
//!
//! The contract between the mesh cache and whatever owns GPU memory. A backend turns
//! an interleaved vertex buffer plus an index buffer into an opaque handle, draws a
//! handle as an indexed triangle list, and releases a handle's resources.
//!
//! ## Architecture
//!
//! [`GeometryBackend`] is the only seam to the graphics layer. Errors are the
//! backend's own type and pass through the cache unmodified.
//!
//! [`HeadlessBackend`] keeps the bookkeeping of a real backend without a device: per
//! handle buffer analytics (allocated bytes, index count, times drawn) plus running
//! totals. Releasing or drawing a handle it no longer knows is reported as an error,
//! which makes leaks and double frees visible in tests.

use std::collections::HashMap;

use thiserror::Error;

use super::meshing::chunk_mesh::ChunkMesh;
use super::vertex::VertexLayout;

/// Geometry handed to a backend for upload, borrowed from a mesh.
#[derive(Copy, Clone, Debug)]
pub struct GeometryUpload<'a> {
    /// Interleaved vertex data as raw bytes.
    pub vertices: &'a [u8],
    /// `u32` triangle indices as raw bytes.
    pub indices: &'a [u8],
    /// Number of `u32` indices.
    pub index_count: usize,
    /// Attribute layout of `vertices`.
    pub layout: VertexLayout,
}

impl<'a> GeometryUpload<'a> {
    /// Borrows the buffers of a mesh.
    pub fn from_mesh(mesh: &'a ChunkMesh) -> Self {
        GeometryUpload {
            vertices: mesh.vertex_bytes(),
            indices: mesh.index_bytes(),
            index_count: mesh.index_count(),
            layout: mesh.layout,
        }
    }

    /// Total size of the upload in bytes.
    pub fn byte_size(&self) -> usize {
        self.vertices.len() + self.indices.len()
    }
}

/// Upload, draw and release of indexed triangle geometry.
pub trait GeometryBackend {
    /// Opaque reference to uploaded geometry.
    type Handle;
    /// Failure reported by the graphics layer.
    type Error: std::error::Error;

    /// Copies geometry into backend memory and returns its handle.
    fn upload(&mut self, geometry: &GeometryUpload<'_>) -> Result<Self::Handle, Self::Error>;

    /// Issues one indexed draw of previously uploaded geometry.
    fn draw(&mut self, handle: &Self::Handle) -> Result<(), Self::Error>;

    /// Frees the resources behind a handle. Each handle is released exactly once.
    fn release(&mut self, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// Handle issued by [`HeadlessBackend`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeadlessHandle(u64);

/// Errors from [`HeadlessBackend`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeadlessError {
    /// The handle was never issued or has already been released.
    #[error("unknown geometry handle {0:?}")]
    UnknownHandle(HeadlessHandle),
    /// The upload would exceed the configured memory budget.
    #[error("out of geometry memory: {requested} bytes requested, {available} available")]
    OutOfMemory {
        /// Bytes the upload needed.
        requested: u64,
        /// Bytes left under the limit.
        available: u64,
    },
}

/// Analytics data for one uploaded geometry buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Bytes allocated for vertices and indices together.
    pub allocated_memory: u64,
    /// Indices per draw.
    pub index_count: u64,
    /// Draw calls issued against the buffer.
    pub times_drawn: u64,
}

/// Running totals over a backend's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendTotals {
    /// Successful uploads.
    pub uploads: u64,
    /// Draw calls issued.
    pub draws: u64,
    /// Handles released.
    pub releases: u64,
    /// Bytes currently allocated across live handles.
    pub allocated_memory: u64,
}

/// Device-less backend that records what a real backend would allocate and draw.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    buffers: HashMap<HeadlessHandle, BufferAnalytics>,
    next_handle: u64,
    totals: BackendTotals,
    memory_limit: Option<u64>,
}

impl HeadlessBackend {
    /// Creates a backend with no memory limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the bytes that may be allocated at once, to exercise upload failures.
    pub fn with_memory_limit(mut self, limit: u64) -> Self {
        self.memory_limit = Some(limit);
        self
    }

    /// Number of handles uploaded and not yet released.
    pub fn live_handles(&self) -> usize {
        self.buffers.len()
    }

    /// Running totals since creation.
    pub fn totals(&self) -> BackendTotals {
        self.totals
    }

    /// Analytics of a live handle, or `None` once it is released.
    pub fn analytics(&self, handle: &HeadlessHandle) -> Option<&BufferAnalytics> {
        self.buffers.get(handle)
    }
}

impl GeometryBackend for HeadlessBackend {
    type Handle = HeadlessHandle;
    type Error = HeadlessError;

    fn upload(&mut self, geometry: &GeometryUpload<'_>) -> Result<HeadlessHandle, HeadlessError> {
        let requested = geometry.byte_size() as u64;
        if let Some(limit) = self.memory_limit {
            let available = limit.saturating_sub(self.totals.allocated_memory);
            if requested > available {
                return Err(HeadlessError::OutOfMemory {
                    requested,
                    available,
                });
            }
        }

        let handle = HeadlessHandle(self.next_handle);
        self.next_handle += 1;
        self.buffers.insert(
            handle,
            BufferAnalytics {
                allocated_memory: requested,
                index_count: geometry.index_count as u64,
                times_drawn: 0,
            },
        );
        self.totals.uploads += 1;
        self.totals.allocated_memory += requested;
        Ok(handle)
    }

    fn draw(&mut self, handle: &HeadlessHandle) -> Result<(), HeadlessError> {
        let analytics = self
            .buffers
            .get_mut(handle)
            .ok_or(HeadlessError::UnknownHandle(*handle))?;
        analytics.times_drawn += 1;
        self.totals.draws += 1;
        Ok(())
    }

    fn release(&mut self, handle: HeadlessHandle) -> Result<(), HeadlessError> {
        let analytics = self
            .buffers
            .remove(&handle)
            .ok_or(HeadlessError::UnknownHandle(handle))?;
        self.totals.releases += 1;
        self.totals.allocated_memory -= analytics.allocated_memory;
        Ok(())
    }
}
