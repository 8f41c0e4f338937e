//! Text that changes over time, rendered into preallocated buffers.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;
use std::sync::Arc;

use crate::buffer::{BufferMapping, BufferUsage, GpuBuffer, MapFlags};
use crate::index::{write_indices, INDICES_PER_GLYPH, MAX_GLYPHS, VERTICES_PER_GLYPH};
use crate::math::Rect;
use crate::mesh::{Mesh, RunBounds};
use crate::quad::{glyph_quads, Dim2, Dim3, Dimensions};
use crate::text::{Font, ShapingParams, TextLayouter, TextShaper};
use crate::Result;

pub type TextRenderer2D<S, B> = TextRenderer<Dim2, S, B>;
pub type TextRenderer3D<S, B> = TextRenderer<Dim3, S, B>;

/// Renders text into a vertex and an index buffer reserved for a fixed
/// number of glyphs.
///
/// [`reserve`](TextRenderer::reserve) allocates both buffers and fills the
/// index buffer once. Each [`render`](TextRenderer::render) only rewrites the
/// vertices of the new text and adjusts the index count of the mesh.
pub struct TextRenderer<D: Dimensions, S, B> {
    font: Arc<dyn Font>,
    size: f32,
    layouter: TextLayouter<S>,
    vertex_buffer: B,
    index_buffer: B,
    mesh: Mesh,
    rect: Rect,
    capacity: usize,
    _dimensions: PhantomData<D>,
}

impl<D: Dimensions, S: TextShaper, B: GpuBuffer> TextRenderer<D, S, B> {
    /// Creates a renderer drawing `font` at `size`. Nothing can be rendered
    /// until [`reserve`](TextRenderer::reserve) is called.
    ///
    /// # Panics
    ///
    /// Panics if either buffer can't be mapped for writing.
    pub fn new(
        font: Arc<dyn Font>,
        size: f32,
        shaper: S,
        vertex_buffer: B,
        index_buffer: B,
    ) -> TextRenderer<D, S, B> {
        assert!(
            vertex_buffer.capabilities().map_write && index_buffer.capabilities().map_write,
            "TextRenderer needs buffers that can be mapped for writing"
        );

        TextRenderer {
            font,
            size,
            layouter: TextLayouter::new(shaper),
            vertex_buffer,
            index_buffer,
            mesh: Mesh::new::<D>(),
            rect: Rect::ZERO,
            capacity: 0,
            _dimensions: PhantomData,
        }
    }

    pub fn with_params(mut self, params: ShapingParams) -> TextRenderer<D, S, B> {
        self.layouter.set_params(params);
        self
    }

    /// Allocates storage for `capacity` glyphs and prefills the index buffer,
    /// discarding previous buffer contents.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` exceeds [`MAX_GLYPHS`].
    pub fn reserve(
        &mut self,
        capacity: usize,
        vertex_usage: BufferUsage,
        index_usage: BufferUsage,
    ) -> Result<()> {
        assert!(
            capacity <= MAX_GLYPHS,
            "TextRenderer::reserve(): capacity {} exceeds {} glyphs",
            capacity,
            MAX_GLYPHS
        );

        let vertex_count = capacity * VERTICES_PER_GLYPH;
        let index_count = capacity * INDICES_PER_GLYPH;

        // stay unreserved if anything below fails
        self.capacity = 0;
        self.rect = Rect::ZERO;

        self.vertex_buffer
            .allocate(vertex_count * size_of::<D::Vertex>(), vertex_usage)?;
        self.mesh.vertex_count = 0;

        let index_type = self.index_buffer.capabilities().index_type_for(vertex_count);
        let index_size = index_count * index_type.size();
        self.index_buffer.allocate(index_size, index_usage)?;
        self.mesh.index_count = 0;
        self.mesh.index_type = index_type;
        self.mesh.index_range = 0..vertex_count as u32;

        if capacity > 0 {
            let mut indices = BufferMapping::new(
                &mut self.index_buffer,
                0,
                index_size,
                MapFlags::WRITE | MapFlags::INVALIDATE_BUFFER,
            )?;
            write_indices(capacity, index_type, &mut indices);
            indices
                .unmap()
                .map_err(|e| e.with_context("failed to prefill index buffer"))?;
        }

        self.capacity = capacity;

        log::debug!(
            "Reserved text renderer for {} glyphs with {:?} indices",
            capacity,
            index_type
        );

        Ok(())
    }

    /// Lays out `text` and writes its vertices into the vertex buffer.
    ///
    /// # Panics
    ///
    /// Panics if `text` shapes into more glyphs than were reserved.
    pub fn render(&mut self, text: &str) -> Result<()> {
        let glyphs = self.layouter.layout(&*self.font, text)?;
        let glyph_count = glyphs.len();

        assert!(
            glyph_count <= self.capacity,
            "TextRenderer::render(): capacity {} too small to render {} glyphs",
            self.capacity,
            glyph_count
        );

        let mut bounds = RunBounds::default();

        if glyph_count > 0 {
            let quad_size = VERTICES_PER_GLYPH * size_of::<D::Vertex>();
            let mut vertices = BufferMapping::new(
                &mut self.vertex_buffer,
                0,
                glyph_count * quad_size,
                MapFlags::WRITE | MapFlags::INVALIDATE_BUFFER,
            )?;
            assert_eq!(
                vertices.len(),
                glyph_count * quad_size,
                "vertex buffer mapped a region of the wrong size"
            );

            let quads = glyph_quads(glyphs, self.size);
            for (i, (quad, dst)) in quads.zip(vertices.chunks_exact_mut(quad_size)).enumerate() {
                bounds.add(i, glyph_count, &quad);
                let quad_vertices = quad.vertices::<D>();
                dst.copy_from_slice(bytemuck::cast_slice(&quad_vertices[..]));
            }

            vertices
                .unmap()
                .map_err(|e| e.with_context("failed to write text vertices"))?;
        }

        self.rect = bounds.rect;
        self.mesh.index_count = (glyph_count * INDICES_PER_GLYPH) as u32;

        log::trace!("Rendered {} glyphs", glyph_count);

        Ok(())
    }
}

impl<D: Dimensions, S, B> TextRenderer<D, S, B> {
    pub fn font(&self) -> &Arc<dyn Font> {
        &self.font
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    /// Number of glyphs the buffers are reserved for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bounding rectangle of the last rendered text.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn vertex_buffer(&self) -> &B {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &B {
        &self.index_buffer
    }

    pub fn params(&self) -> &ShapingParams {
        self.layouter.params()
    }
}

impl<D: Dimensions, S, B: fmt::Debug> fmt::Debug for TextRenderer<D, S, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRenderer")
            .field("size", &self.size)
            .field("capacity", &self.capacity)
            .field("rect", &self.rect)
            .field("mesh", &self.mesh)
            .field("vertex_buffer", &self.vertex_buffer)
            .field("index_buffer", &self.index_buffer)
            .finish_non_exhaustive()
    }
}
