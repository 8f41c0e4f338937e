use crate::math::{Rect, Vec2};
use crate::text::{Font, ShapedGlyph, ShapingParams, TextShaper, SUBPIXEL_UNITS};
use crate::Result;

/// A shaped glyph resolved against the font atlas, in units of the font's
/// nominal size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedGlyph {
    /// Atlas quad of the glyph relative to the pen position.
    pub quad: Rect,
    pub texture: Rect,
    pub offset: Vec2,
    pub advance: Vec2,
}

/// Runs a [`TextShaper`] and resolves its output against a [`Font`].
///
/// Shaping scratch space is kept between calls.
#[derive(Debug, Default)]
pub struct TextLayouter<S> {
    shaper: S,
    params: ShapingParams,
    shaped: Vec<ShapedGlyph>,
    glyphs: Vec<PositionedGlyph>,
}

impl<S: TextShaper> TextLayouter<S> {
    pub fn new(shaper: S) -> TextLayouter<S> {
        TextLayouter::with_params(shaper, ShapingParams::default())
    }

    pub fn with_params(shaper: S, params: ShapingParams) -> TextLayouter<S> {
        TextLayouter {
            shaper,
            params,
            shaped: Vec::new(),
            glyphs: Vec::new(),
        }
    }

    /// Shapes `text` and returns its glyphs in order. The slice is valid until
    /// the next call.
    pub fn layout(&mut self, font: &dyn Font, text: &str) -> Result<&[PositionedGlyph]> {
        self.shaped.clear();
        self.glyphs.clear();

        self.shaper
            .shape(font, text, &self.params, &mut self.shaped)?;

        let scale = 1.0 / (SUBPIXEL_UNITS * font.size());

        self.glyphs.extend(self.shaped.iter().map(|shaped| {
            let atlas = font.glyph(shaped.glyph_id);
            PositionedGlyph {
                quad: atlas.quad,
                texture: atlas.texture,
                offset: shaped.offset.as_vec2() * scale,
                advance: shaped.advance.as_vec2() * scale,
            }
        }));

        Ok(&self.glyphs)
    }
}

impl<S> TextLayouter<S> {
    pub fn params(&self) -> &ShapingParams {
        &self.params
    }

    pub fn set_params(&mut self, params: ShapingParams) {
        self.params = params;
    }
}
