//! Glyph quads and their embedding into 2D or 3D vertex data.
//!
//! Every quad is emitted as four vertices in the order top-left, bottom-left,
//! top-right, bottom-right:
//!
//! ```text
//! 0---2
//! |  /|
//! | / |
//! |/  |
//! 1---3
//! ```

use std::fmt::Debug;

use bytemuck::{Pod, Zeroable};

use crate::math::{Rect, Vec2, Vec3, Vec4};
use crate::mesh::AttributeFormat;
use crate::text::PositionedGlyph;

/// Picks the point type glyph corners are embedded into.
pub trait Dimensions: 'static {
    type Point: Copy + PartialEq + Debug;
    type Vertex: Pod + PartialEq + Debug;

    const POSITION_FORMAT: AttributeFormat;

    fn point(v: Vec2) -> Self::Point;

    fn vertex(position: Self::Point, tex: Vec2) -> Self::Vertex;
}

/// Flat text: points are homogeneous `(x, y, 1)`.
#[derive(Debug, Clone, Copy)]
pub enum Dim2 {}

/// Text placed in a 3D scene on the `z = 0` plane: points are `(x, y, 0, 1)`.
#[derive(Debug, Clone, Copy)]
pub enum Dim3 {}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex2D {
    pub position: [f32; 3],
    pub tex: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex3D {
    pub position: [f32; 4],
    pub tex: [f32; 2],
}

impl Dimensions for Dim2 {
    type Point = Vec3;
    type Vertex = Vertex2D;

    const POSITION_FORMAT: AttributeFormat = AttributeFormat::Float32x3;

    fn point(v: Vec2) -> Vec3 {
        v.extend(1.0)
    }

    fn vertex(position: Vec3, tex: Vec2) -> Vertex2D {
        Vertex2D {
            position: position.to_array(),
            tex: tex.to_array(),
        }
    }
}

impl Dimensions for Dim3 {
    type Point = Vec4;
    type Vertex = Vertex3D;

    const POSITION_FORMAT: AttributeFormat = AttributeFormat::Float32x4;

    fn point(v: Vec2) -> Vec4 {
        Vec4::new(v.x, v.y, 0.0, 1.0)
    }

    fn vertex(position: Vec4, tex: Vec2) -> Vertex3D {
        Vertex3D {
            position: position.to_array(),
            tex: tex.to_array(),
        }
    }
}

/// A glyph placed at its final position and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub position: Rect,
    pub texture: Rect,
    /// Normalized advance to the next glyph.
    pub advance: Vec2,
}

impl GlyphQuad {
    pub fn points<D: Dimensions>(&self) -> [D::Point; 4] {
        corners(&self.position).map(D::point)
    }

    pub fn tex_coords(&self) -> [Vec2; 4] {
        corners(&self.texture)
    }

    pub fn vertices<D: Dimensions>(&self) -> [D::Vertex; 4] {
        let points = self.points::<D>();
        let tex = self.tex_coords();
        [
            D::vertex(points[0], tex[0]),
            D::vertex(points[1], tex[1]),
            D::vertex(points[2], tex[2]),
            D::vertex(points[3], tex[3]),
        ]
    }
}

/// Corners of `rect` in quad vertex order.
pub fn corners(rect: &Rect) -> [Vec2; 4] {
    [
        rect.top_left(),
        rect.bottom_left(),
        rect.top_right(),
        rect.bottom_right(),
    ]
}

/// Places `glyph` at `cursor`, scaled from normalized units to `size`.
///
/// The atlas quad's own bottom-left corner acts as the glyph's bearing.
pub fn render_glyph(cursor: Vec2, glyph: &PositionedGlyph, size: f32) -> GlyphQuad {
    let origin = (cursor + glyph.offset + glyph.quad.bottom_left()) * size;
    let position = Rect::from_size(origin, glyph.quad.size() * size);

    GlyphQuad {
        position,
        texture: glyph.texture,
        advance: glyph.advance,
    }
}

/// Places all glyphs left to right, starting at the origin.
pub fn glyph_quads(
    glyphs: &[PositionedGlyph],
    size: f32,
) -> impl ExactSizeIterator<Item = GlyphQuad> + '_ {
    let mut cursor = Vec2::ZERO;
    glyphs.iter().map(move |glyph| {
        let quad = render_glyph(cursor, glyph, size);
        cursor += quad.advance;
        quad
    })
}

/// Bounding rectangle of a run: the first quad's bottom-left corner to the
/// last quad's top-right corner.
///
/// Glyphs in the middle of the run are not considered, so a tall or
/// descending glyph there can stick out of the rectangle.
pub fn run_rect(first: &GlyphQuad, last: &GlyphQuad) -> Rect {
    Rect::new(first.position.bottom_left(), last.position.top_right())
}
