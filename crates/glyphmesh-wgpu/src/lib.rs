//! [`GpuBuffer`] backend on top of `wgpu`, plus helpers for drawing the
//! resulting [`Mesh`].

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use glyphmesh_core::buffer::{BufferCapabilities, BufferUsage, GpuBuffer, MapFlags};
use glyphmesh_core::index::IndexType;
use glyphmesh_core::mesh::{AttributeFormat, Mesh, Primitive};
use glyphmesh_core::{Error, ErrorKind, Result};
use wgpu::*;

pub use wgpu;

/// What a [`WgpuBuffer`] is bound as when drawing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl BufferKind {
    fn usages(self) -> BufferUsages {
        match self {
            BufferKind::Vertex => BufferUsages::VERTEX | BufferUsages::COPY_DST,
            BufferKind::Index => BufferUsages::INDEX | BufferUsages::COPY_DST,
        }
    }

    fn label(self) -> &'static str {
        match self {
            BufferKind::Vertex => "glyphmesh vertices",
            BufferKind::Index => "glyphmesh indices",
        }
    }
}

/// A `wgpu` buffer with a host-side shadow copy.
///
/// wgpu can't map a buffer synchronously for writing, so mapping hands out
/// a slice of the shadow copy and unmapping queues a write of the mapped
/// range.
pub struct WgpuBuffer {
    device: Arc<Device>,
    queue: Arc<Queue>,
    kind: BufferKind,
    buffer: Option<Buffer>,
    shadow: Vec<u8>,
    size: usize,
    mapped: Option<Range<usize>>,
}

impl WgpuBuffer {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>, kind: BufferKind) -> WgpuBuffer {
        WgpuBuffer {
            device,
            queue,
            kind,
            buffer: None,
            shadow: Vec::new(),
            size: 0,
            mapped: None,
        }
    }

    pub fn vertex(device: Arc<Device>, queue: Arc<Queue>) -> WgpuBuffer {
        WgpuBuffer::new(device, queue, BufferKind::Vertex)
    }

    pub fn index(device: Arc<Device>, queue: Arc<Queue>) -> WgpuBuffer {
        WgpuBuffer::new(device, queue, BufferKind::Index)
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// The underlying buffer, `None` until storage is allocated.
    pub fn buffer(&self) -> Option<&Buffer> {
        self.buffer.as_ref()
    }

    fn check_range(&self, offset: usize, len: usize) -> Result<Range<usize>> {
        match offset.checked_add(len) {
            Some(end) if end <= self.size => Ok(offset..end),
            _ => Err(Error::new(
                ErrorKind::BufferMap,
                format!(
                    "range {}+{} is out of bounds of a {} byte buffer",
                    offset, len, self.size
                ),
            )),
        }
    }

    /// Queues a write of `range` from the shadow copy, widened to the copy
    /// alignment.
    fn flush(&self, range: Range<usize>) -> Result<()> {
        if range.is_empty() {
            return Ok(());
        }

        let Some(buffer) = &self.buffer else {
            return Err(Error::new(ErrorKind::Gpu, "buffer storage is not allocated"));
        };

        let range = aligned_range(range);
        self.queue
            .write_buffer(buffer, range.start as BufferAddress, &self.shadow[range]);
        Ok(())
    }
}

impl GpuBuffer for WgpuBuffer {
    fn capabilities(&self) -> BufferCapabilities {
        BufferCapabilities {
            map_write: true,
            u8_indices: false,
        }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn allocate(&mut self, size: usize, usage: BufferUsage) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::new(
                ErrorKind::BufferMap,
                "cannot reallocate a mapped buffer",
            ));
        }

        // wgpu picks memory on its own, so the usage hint has nothing to
        // select here
        let padded = align_up(size.max(1));
        let buffer = self.device.create_buffer(&BufferDescriptor {
            label: Some(self.kind.label()),
            size: padded as BufferAddress,
            usage: self.kind.usages(),
            mapped_at_creation: false,
        });

        log::trace!(
            "Allocated {:?} buffer of {} bytes for {:?}",
            self.kind,
            size,
            usage
        );

        self.buffer = Some(buffer);
        self.shadow.clear();
        self.shadow.resize(padded, 0);
        self.size = size;
        Ok(())
    }

    fn upload(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::new(ErrorKind::BufferMap, "cannot upload to a mapped buffer"));
        }

        let range = self.check_range(offset, data.len())?;
        self.shadow[range.clone()].copy_from_slice(data);
        self.flush(range)
    }

    fn map(&mut self, offset: usize, len: usize, flags: MapFlags) -> Result<()> {
        if self.mapped.is_some() {
            return Err(Error::new(ErrorKind::BufferMap, "buffer is already mapped"));
        }
        if !flags.contains(MapFlags::WRITE) {
            return Err(Error::new(
                ErrorKind::BufferMap,
                "wgpu buffers can only be mapped for writing",
            ));
        }

        let range = self.check_range(offset, len)?;
        if flags.contains(MapFlags::INVALIDATE_BUFFER) {
            self.shadow.fill(0);
        } else if flags.contains(MapFlags::INVALIDATE_RANGE) {
            self.shadow[range.clone()].fill(0);
        }

        self.mapped = Some(range);
        Ok(())
    }

    fn mapped(&self) -> &[u8] {
        match &self.mapped {
            Some(range) => &self.shadow[range.clone()],
            None => &[],
        }
    }

    fn mapped_mut(&mut self) -> &mut [u8] {
        match &self.mapped {
            Some(range) => &mut self.shadow[range.clone()],
            None => &mut [],
        }
    }

    fn unmap(&mut self) -> Result<()> {
        match self.mapped.take() {
            Some(range) => self.flush(range),
            None => Err(Error::new(ErrorKind::BufferMap, "buffer is not mapped")),
        }
    }
}

impl fmt::Debug for WgpuBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WgpuBuffer")
            .field("kind", &self.kind)
            .field("size", &self.size)
            .field("mapped", &self.mapped)
            .finish_non_exhaustive()
    }
}

fn align_up(n: usize) -> usize {
    let align = COPY_BUFFER_ALIGNMENT as usize;
    n.div_ceil(align) * align
}

fn aligned_range(range: Range<usize>) -> Range<usize> {
    let align = COPY_BUFFER_ALIGNMENT as usize;
    (range.start / align * align)..align_up(range.end)
}

/// `None` for [`IndexType::U8`], which wgpu can't draw from.
pub fn index_format(index_type: IndexType) -> Option<IndexFormat> {
    match index_type {
        IndexType::U8 => None,
        IndexType::U16 => Some(IndexFormat::Uint16),
        IndexType::U32 => Some(IndexFormat::Uint32),
    }
}

pub fn vertex_format(format: AttributeFormat) -> VertexFormat {
    match format {
        AttributeFormat::Float32x2 => VertexFormat::Float32x2,
        AttributeFormat::Float32x3 => VertexFormat::Float32x3,
        AttributeFormat::Float32x4 => VertexFormat::Float32x4,
    }
}

pub fn primitive_topology(primitive: Primitive) -> PrimitiveTopology {
    match primitive {
        Primitive::Triangles => PrimitiveTopology::TriangleList,
    }
}

pub fn vertex_attributes(mesh: &Mesh) -> Vec<VertexAttribute> {
    mesh.attributes
        .iter()
        .map(|attr| VertexAttribute {
            format: vertex_format(attr.format),
            offset: attr.offset,
            shader_location: attr.location,
        })
        .collect()
}

/// Layout of the mesh's vertex buffer, for use in a render pipeline.
/// `attributes` should come from [`vertex_attributes`].
pub fn vertex_buffer_layout<'a>(
    mesh: &Mesh,
    attributes: &'a [VertexAttribute],
) -> VertexBufferLayout<'a> {
    VertexBufferLayout {
        array_stride: mesh.stride,
        step_mode: VertexStepMode::Vertex,
        attributes,
    }
}

/// Records an indexed draw of `mesh`. Does nothing if the mesh is empty.
pub fn draw_mesh<'a>(
    pass: &mut RenderPass<'a>,
    mesh: &Mesh,
    vertex_buffer: &'a WgpuBuffer,
    index_buffer: &'a WgpuBuffer,
) -> Result<()> {
    if mesh.index_count == 0 {
        return Ok(());
    }

    let Some(format) = index_format(mesh.index_type) else {
        return Err(Error::new(
            ErrorKind::Gpu,
            format!("{:?} indices are not supported", mesh.index_type),
        ));
    };

    let (Some(vertices), Some(indices)) = (vertex_buffer.buffer(), index_buffer.buffer()) else {
        return Err(Error::new(ErrorKind::Gpu, "mesh buffers are not allocated"));
    };

    pass.set_vertex_buffer(0, vertices.slice(..));
    pass.set_index_buffer(indices.slice(..), format);
    pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    Ok(())
}

/// Creates a device without a surface, for rendering offscreen or into
/// textures the caller presents.
pub fn create_device() -> Result<(Arc<Device>, Arc<Queue>)> {
    let instance = Instance::new(InstanceDescriptor::default());
    let adapter = pollster::block_on(create_adapter(&instance))?;
    log::debug!("Using adapter {:?}", adapter.get_info());

    let (device, queue) = pollster::block_on(request_device(&adapter))?;
    Ok((Arc::new(device), Arc::new(queue)))
}

async fn create_adapter(instance: &Instance) -> Result<Adapter> {
    let adapter = instance
        .request_adapter(&RequestAdapterOptions {
            power_preference: PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        })
        .await;

    let Some(adapter) = adapter else {
        return Err(Error::new(ErrorKind::Gpu, "no compatible video adapters"));
    };

    Ok(adapter)
}

async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
    adapter
        .request_device(
            &DeviceDescriptor {
                label: None,
                required_features: Features::empty(),
                required_limits: Limits::downlevel_defaults().using_resolution(adapter.limits()),
            },
            None,
        )
        .await
        .map_err(|e| Error::new(ErrorKind::Gpu, "failed to create graphics device").with_source(e))
}
