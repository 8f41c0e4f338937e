//! Deterministic fonts and shapers for unit tests.

use crate::math::{IVec2, Rect, Vec2};
use crate::text::{AtlasFont, Font, FontId, ShapedGlyph, ShapingParams, TextShaper};
use crate::Result;

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_size(Vec2::new(x, y), Vec2::new(w, h))
}

/// Atlas with a glyph per printable ASCII character. `l` is taller than the
/// rest and `g` hangs below the baseline.
pub fn test_font(size: f32) -> AtlasFont {
    let mut font = AtlasFont::new(FontId(7), size);

    for c in ' '..='~' {
        let id = c as u32;
        let quad = match c {
            'l' => rect(0.1, 0.0, 0.3, 1.3),
            'g' => rect(0.05, -0.4, 0.5, 1.1),
            _ => rect(0.05, 0.0, 0.5, 0.7),
        };
        let texture = rect(
            (id % 16) as f32 / 16.0,
            (id / 16) as f32 / 16.0,
            1.0 / 16.0,
            1.0 / 16.0,
        );
        font.insert_glyph(id, quad, texture);
    }

    font
}

/// Maps every character to the glyph with the same id, advancing by a fixed
/// amount.
#[derive(Debug, Clone, Default)]
pub struct CharShaper {
    advance: IVec2,
    offset: IVec2,
}

impl CharShaper {
    pub fn new(advance: IVec2) -> CharShaper {
        CharShaper {
            advance,
            ..Default::default()
        }
    }

    pub fn with_offset(mut self, offset: IVec2) -> CharShaper {
        self.offset = offset;
        self
    }
}

impl TextShaper for CharShaper {
    fn shape(
        &mut self,
        _font: &dyn Font,
        text: &str,
        _params: &ShapingParams,
        buf: &mut Vec<ShapedGlyph>,
    ) -> Result<()> {
        buf.extend(text.chars().map(|c| ShapedGlyph {
            glyph_id: c as u32,
            offset: self.offset,
            advance: self.advance,
        }));
        Ok(())
    }
}
