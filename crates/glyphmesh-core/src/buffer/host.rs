use std::ops::Range;

use crate::buffer::{BufferCapabilities, BufferUsage, GpuBuffer, MapFlags};
use crate::{Error, ErrorKind, Result};

/// A [`GpuBuffer`] living in host memory.
///
/// Useful for software rendering, or for inspecting generated geometry.
/// Invalidating map flags zero the discarded bytes.
#[derive(Debug, Clone, Default)]
pub struct HostBuffer {
    data: Vec<u8>,
    usage: BufferUsage,
    mapped: Option<Range<usize>>,
}

impl HostBuffer {
    pub fn new() -> HostBuffer {
        HostBuffer::default()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn is_mapped(&self) -> bool {
        self.mapped.is_some()
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<Range<usize>> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(offset..end),
            _ => Err(Error::new(
                ErrorKind::BufferMap,
                format!(
                    "range {}+{} is out of bounds of a {} byte buffer",
                    offset,
                    len,
                    self.data.len()
                ),
            )),
        }
    }
}

impl GpuBuffer for HostBuffer {
    fn capabilities(&self) -> BufferCapabilities {
        BufferCapabilities::default()
    }

    fn size(&self) -> usize {
        self.data.len()
    }

    fn allocate(&mut self, size: usize, usage: BufferUsage) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::new(
                ErrorKind::BufferMap,
                "cannot reallocate a mapped buffer",
            ));
        }

        self.data.clear();
        self.data.resize(size, 0);
        self.usage = usage;
        Ok(())
    }

    fn upload(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::new(ErrorKind::BufferMap, "cannot upload to a mapped buffer"));
        }

        let range = self.check_range(offset, data.len())?;
        self.data[range].copy_from_slice(data);
        Ok(())
    }

    fn map(&mut self, offset: usize, len: usize, flags: MapFlags) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::new(ErrorKind::BufferMap, "buffer is already mapped"));
        }

        if !flags.intersects(MapFlags::READ | MapFlags::WRITE) {
            return Err(Error::new(
                ErrorKind::BufferMap,
                "mapping needs read or write access",
            ));
        }

        let range = self.check_range(offset, len)?;

        if flags.contains(MapFlags::INVALIDATE_BUFFER) {
            self.data.fill(0);
        } else if flags.contains(MapFlags::INVALIDATE_RANGE) {
            self.data[range.clone()].fill(0);
        }

        self.mapped = Some(range);
        Ok(())
    }

    fn mapped(&self) -> &[u8] {
        match &self.mapped {
            Some(range) => &self.data[range.clone()],
            None => &[],
        }
    }

    fn mapped_mut(&mut self) -> &mut [u8] {
        match &self.mapped {
            Some(range) => &mut self.data[range.clone()],
            None => &mut [],
        }
    }

    fn unmap(&mut self) -> Result<()> {
        match self.mapped.take() {
            Some(_) => Ok(()),
            None => Err(Error::new(ErrorKind::BufferMap, "buffer is not mapped")),
        }
    }
}
