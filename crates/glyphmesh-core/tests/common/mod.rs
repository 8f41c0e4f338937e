#![allow(dead_code)]

use std::collections::HashMap;

use glyphmesh_core::buffer::{BufferCapabilities, BufferUsage, GpuBuffer, HostBuffer, MapFlags};
use glyphmesh_core::math::{IVec2, Rect, Vec2};
use glyphmesh_core::text::{AtlasFont, Font, FontId, ShapedGlyph, ShapingParams, TextShaper};
use glyphmesh_core::{Error, ErrorKind, Result};

pub const NOMINAL_SIZE: f32 = 16.0;

/// 26.6 units for `em` ems at the nominal size.
pub fn em(em: f32) -> i32 {
    (em * 64.0 * NOMINAL_SIZE) as i32
}

pub fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect::from_size(Vec2::new(x, y), Vec2::new(w, h))
}

/// Every ASCII letter is a 0.5 x 0.75 em box sitting on the baseline, except
/// `H` which is taller.
pub fn font() -> AtlasFont {
    let mut font = AtlasFont::new(FontId(1), NOMINAL_SIZE);
    for (i, c) in ('A'..='Z').chain('a'..='z').enumerate() {
        let quad = if c == 'H' {
            rect(0.0, 0.0, 0.5, 1.0)
        } else {
            rect(0.0, 0.0, 0.5, 0.75)
        };
        let texture = rect(i as f32 / 64.0, 0.0, 1.0 / 64.0, 1.0);
        font.insert_glyph(c as u32, quad, texture);
    }
    font
}

/// One glyph per character, advancing by half an em unless overridden.
#[derive(Debug, Clone, Default)]
pub struct CharShaper {
    advances: HashMap<char, IVec2>,
}

impl CharShaper {
    pub fn new() -> CharShaper {
        CharShaper::default()
    }

    pub fn with_advance(mut self, c: char, advance: IVec2) -> CharShaper {
        self.advances.insert(c, advance);
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
            offset: IVec2::ZERO,
            advance: self
                .advances
                .get(&c)
                .copied()
                .unwrap_or(IVec2::new(em(0.5), 0)),
        }));
        Ok(())
    }
}

/// A host buffer whose unmapping can be made to fail.
#[derive(Debug, Default)]
pub struct FlakyBuffer {
    pub inner: HostBuffer,
    pub fail_unmap: bool,
}

impl GpuBuffer for FlakyBuffer {
    fn capabilities(&self) -> BufferCapabilities {
        self.inner.capabilities()
    }

    fn size(&self) -> usize {
        self.inner.size()
    }

    fn allocate(&mut self, size: usize, usage: BufferUsage) -> Result<()> {
        self.inner.allocate(size, usage)
    }

    fn upload(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        self.inner.upload(offset, data)
    }

    fn map(&mut self, offset: usize, len: usize, flags: MapFlags) -> Result<()> {
        self.inner.map(offset, len, flags)
    }

    fn mapped(&self) -> &[u8] {
        self.inner.mapped()
    }

    fn mapped_mut(&mut self) -> &mut [u8] {
        self.inner.mapped_mut()
    }

    fn unmap(&mut self) -> Result<()> {
        self.inner.unmap()?;
        if self.fail_unmap {
            return Err(Error::new(ErrorKind::BufferMap, "buffer contents were lost"));
        }
        Ok(())
    }
}
