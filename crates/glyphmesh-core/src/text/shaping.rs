use std::borrow::Cow;

use crate::math::IVec2;
use crate::text::Font;
use crate::Result;

/// Shaper units per pixel: positions are 26.6 fixed point.
pub const SUBPIXEL_UNITS: f32 = 64.0;

/// A glyph as produced by a [`TextShaper`], in 26.6 fixed point units relative
/// to the font's nominal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    pub offset: IVec2,
    pub advance: IVec2,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Direction {
    #[default]
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// An ISO 15924 script tag, e.g. `Latn`.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct Script(pub [u8; 4]);

impl Script {
    pub const LATIN: Script = Script(*b"Latn");

    pub fn tag(&self) -> [u8; 4] {
        self.0
    }
}

impl Default for Script {
    fn default() -> Script {
        Script::LATIN
    }
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Script({})", String::from_utf8_lossy(&self.0))
    }
}

/// Segment properties handed to the shaper. No detection is performed, the
/// run is shaped exactly as described here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapingParams {
    pub direction: Direction,
    pub script: Script,
    /// BCP 47 language tag.
    pub language: Cow<'static, str>,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            direction: Direction::LeftToRight,
            script: Script::LATIN,
            language: Cow::Borrowed("en"),
        }
    }
}

pub trait TextShaper {
    /// Shapes `text` and appends the resulting glyphs to `buf` in visual
    /// order.
    fn shape(
        &mut self,
        font: &dyn Font,
        text: &str,
        params: &ShapingParams,
        buf: &mut Vec<ShapedGlyph>,
    ) -> Result<()>;
}

impl<S: TextShaper + ?Sized> TextShaper for Box<S> {
    fn shape(
        &mut self,
        font: &dyn Font,
        text: &str,
        params: &ShapingParams,
        buf: &mut Vec<ShapedGlyph>,
    ) -> Result<()> {
        (**self).shape(font, text, params, buf)
    }
}
