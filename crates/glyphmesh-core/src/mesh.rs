//! One-shot text geometry.

use std::ops::Range;

use smallvec::{smallvec, SmallVec};

use crate::buffer::{BufferUsage, GpuBuffer};
use crate::index::{
    generate_indices, glyph_index_iter, IndexType, INDICES_PER_GLYPH, VERTICES_PER_GLYPH,
};
use crate::math::{Rect, Vec2};
use crate::quad::{glyph_quads, run_rect, Dimensions, GlyphQuad};
use crate::text::{Font, TextLayouter, TextShaper};
use crate::Result;

pub const POSITION_LOCATION: u32 = 0;
pub const TEX_COORDS_LOCATION: u32 = 1;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl AttributeFormat {
    pub fn size(self) -> u64 {
        match self {
            AttributeFormat::Float32x2 => 8,
            AttributeFormat::Float32x3 => 12,
            AttributeFormat::Float32x4 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct VertexAttribute {
    pub location: u32,
    pub format: AttributeFormat,
    pub offset: u64,
}

/// Text meshes are always triangle lists.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Primitive {
    #[default]
    Triangles,
}

/// Describes how to draw text geometry stored in a vertex and an index
/// buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub primitive: Primitive,
    pub vertex_count: u32,
    pub index_count: u32,
    pub index_type: IndexType,
    /// Range of vertex indices the index buffer may reference.
    pub index_range: Range<u32>,
    pub stride: u64,
    pub attributes: SmallVec<[VertexAttribute; 2]>,
}

impl Mesh {
    /// An empty triangle mesh with the interleaved position + texture
    /// coordinate layout of `D`.
    pub fn new<D: Dimensions>() -> Mesh {
        let position = VertexAttribute {
            location: POSITION_LOCATION,
            format: D::POSITION_FORMAT,
            offset: 0,
        };
        let tex_coords = VertexAttribute {
            location: TEX_COORDS_LOCATION,
            format: AttributeFormat::Float32x2,
            offset: D::POSITION_FORMAT.size(),
        };

        Mesh {
            primitive: Primitive::Triangles,
            vertex_count: 0,
            index_count: 0,
            index_type: IndexType::U8,
            index_range: 0..0,
            stride: std::mem::size_of::<D::Vertex>() as u64,
            attributes: smallvec![position, tex_coords],
        }
    }
}

/// Text geometry as separate arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMesh<P> {
    pub positions: Vec<P>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
    pub rect: Rect,
}

/// Lays out `text` and returns its geometry as plain arrays, with 32-bit
/// indices.
pub fn render_arrays<D: Dimensions, S: TextShaper>(
    layouter: &mut TextLayouter<S>,
    font: &dyn Font,
    size: f32,
    text: &str,
) -> Result<TextMesh<D::Point>> {
    let glyphs = layouter.layout(font, text)?;
    let vertex_count = glyphs.len() * VERTICES_PER_GLYPH;

    let mut positions = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);

    let mut bounds = RunBounds::default();
    for (i, quad) in glyph_quads(glyphs, size).enumerate() {
        bounds.add(i, glyphs.len(), &quad);
        positions.extend(quad.points::<D>());
        tex_coords.extend(quad.tex_coords());
    }

    let indices = glyph_index_iter(glyphs.len()).collect();

    log::debug!("Built text mesh of {} glyphs", glyphs.len());

    Ok(TextMesh {
        positions,
        tex_coords,
        indices,
        rect: bounds.rect,
    })
}

/// Lays out `text`, replaces the contents of both buffers with its geometry
/// and returns the mesh describing it.
///
/// Vertices are interleaved as [`Dimensions::Vertex`]. The index buffer uses
/// the narrowest index type the vertex count and the buffer allow.
pub fn render_to_buffers<D: Dimensions, S: TextShaper, B: GpuBuffer + ?Sized>(
    layouter: &mut TextLayouter<S>,
    font: &dyn Font,
    size: f32,
    text: &str,
    vertex_buffer: &mut B,
    index_buffer: &mut B,
    usage: BufferUsage,
) -> Result<(Mesh, Rect)> {
    let glyphs = layouter.layout(font, text)?;
    let glyph_count = glyphs.len();
    let vertex_count = glyph_count * VERTICES_PER_GLYPH;

    let mut vertices = Vec::with_capacity(vertex_count);
    let mut bounds = RunBounds::default();
    for (i, quad) in glyph_quads(glyphs, size).enumerate() {
        bounds.add(i, glyph_count, &quad);
        vertices.extend(quad.vertices::<D>());
    }
    vertex_buffer.set_data(bytemuck::cast_slice(vertices.as_slice()), usage)?;

    let index_type = index_buffer.capabilities().index_type_for(vertex_count);
    let indices = generate_indices(glyph_count, index_type);
    index_buffer.set_data(&indices.to_le_bytes(), usage)?;

    let mut mesh = Mesh::new::<D>();
    mesh.vertex_count = vertex_count as u32;
    mesh.index_count = (glyph_count * INDICES_PER_GLYPH) as u32;
    mesh.index_type = index_type;
    mesh.index_range = 0..vertex_count as u32;

    log::debug!(
        "Uploaded text mesh of {} glyphs with {:?} indices",
        glyph_count,
        index_type
    );

    Ok((mesh, bounds.rect))
}

/// Tracks the bounding rectangle of a run while its quads are emitted.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunBounds {
    pub rect: Rect,
    first: Option<GlyphQuad>,
}

impl RunBounds {
    pub fn add(&mut self, i: usize, count: usize, quad: &GlyphQuad) {
        if i == 0 {
            self.first = Some(*quad);
        }
        if i + 1 == count {
            if let Some(first) = &self.first {
                self.rect = run_rect(first, quad);
            }
        }
    }
}
