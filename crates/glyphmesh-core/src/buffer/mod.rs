//! The buffer storage text geometry is written into.

use std::fmt;
use std::ops::{Deref, DerefMut};

mod host;
pub use self::host::*;

use crate::index::IndexType;
use crate::Result;

/// How often buffer contents are expected to change. Backends may use it to
/// pick a memory type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum BufferUsage {
    /// Written once, drawn many times.
    #[default]
    StaticDraw,
    /// Rewritten repeatedly, drawn many times.
    DynamicDraw,
    /// Rewritten for almost every draw.
    StreamDraw,
}

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
    pub struct MapFlags: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;
        /// Previous contents of the mapped range may be discarded.
        const INVALIDATE_RANGE = 1 << 2;
        /// Previous contents of the whole buffer may be discarded.
        const INVALIDATE_BUFFER = 1 << 3;
    }
}

/// What a buffer (and the device behind it) supports.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BufferCapabilities {
    /// Ranges of the buffer can be mapped for writing.
    pub map_write: bool,
    /// 8-bit index buffers can be drawn from.
    pub u8_indices: bool,
}

impl BufferCapabilities {
    /// Narrowest index type able to address `vertex_count` vertices that can
    /// also be drawn from.
    pub fn index_type_for(&self, vertex_count: usize) -> IndexType {
        let index_type = IndexType::for_vertex_count(vertex_count);
        if self.u8_indices {
            index_type
        } else {
            index_type.max(IndexType::U16)
        }
    }
}

impl Default for BufferCapabilities {
    fn default() -> Self {
        Self {
            map_write: true,
            u8_indices: true,
        }
    }
}

/// A GPU buffer with explicitly managed storage.
///
/// At most one range can be mapped at a time. Prefer [`BufferMapping`] over
/// calling [`map`](GpuBuffer::map) and [`unmap`](GpuBuffer::unmap) by hand.
pub trait GpuBuffer {
    fn capabilities(&self) -> BufferCapabilities;

    /// Size of the storage in bytes.
    fn size(&self) -> usize;

    /// Replaces the storage with `size` bytes of unspecified contents.
    fn allocate(&mut self, size: usize, usage: BufferUsage) -> Result<()>;

    fn upload(&mut self, offset: usize, data: &[u8]) -> Result<()>;

    fn map(&mut self, offset: usize, len: usize, flags: MapFlags) -> Result<()>;

    /// The currently mapped range, empty if nothing is mapped.
    fn mapped(&self) -> &[u8];

    fn mapped_mut(&mut self) -> &mut [u8];

    /// Ends the mapping. Writes made through it are visible to subsequent
    /// draws only if this succeeds.
    fn unmap(&mut self) -> Result<()>;

    /// Replaces the storage with a copy of `data`.
    fn set_data(&mut self, data: &[u8], usage: BufferUsage) -> Result<()> {
        self.allocate(data.len(), usage)?;
        if !data.is_empty() {
            self.upload(0, data)?;
        }
        Ok(())
    }
}

/// An exclusively borrowed, mapped buffer range.
///
/// Dropping the guard unmaps the buffer and logs a failure. Call
/// [`BufferMapping::unmap`] to handle it instead.
pub struct BufferMapping<'a, B: GpuBuffer + ?Sized> {
    buffer: &'a mut B,
    active: bool,
}

impl<'a, B: GpuBuffer + ?Sized> BufferMapping<'a, B> {
    pub fn new(
        buffer: &'a mut B,
        offset: usize,
        len: usize,
        flags: MapFlags,
    ) -> Result<BufferMapping<'a, B>> {
        buffer.map(offset, len, flags)?;
        Ok(BufferMapping {
            buffer,
            active: true,
        })
    }

    pub fn unmap(mut self) -> Result<()> {
        self.active = false;
        self.buffer.unmap()
    }
}

impl<B: GpuBuffer + ?Sized> Deref for BufferMapping<'_, B> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.mapped()
    }
}

impl<B: GpuBuffer + ?Sized> DerefMut for BufferMapping<'_, B> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.mapped_mut()
    }
}

impl<B: GpuBuffer + ?Sized> Drop for BufferMapping<'_, B> {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = self.buffer.unmap() {
                log::error!("Failed to unmap buffer: {:?}", e);
            }
        }
    }
}

impl<B: GpuBuffer + ?Sized> fmt::Debug for BufferMapping<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferMapping")
            .field("len", &self.buffer.mapped().len())
            .field("active", &self.active)
            .finish()
    }
}
