//! [`TextShaper`] implementation backed by [`rustybuzz`].

use std::collections::{hash_map, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use glyphmesh_core::math::IVec2;
use glyphmesh_core::text::{
    Direction, Font, FontData, FontId, Script, ShapedGlyph, ShapingParams, TextShaper,
    SUBPIXEL_UNITS,
};
use glyphmesh_core::{Error, ErrorKind, Result};
use rustybuzz::ttf_parser::Tag;
use rustybuzz::{Face, Language, UnicodeBuffer};

self_cell::self_cell! {
    struct CachedFace {
        owner: FontData,
        #[covariant]
        dependent: Face,
    }
}

/// Shapes text with rustybuzz, caching a parsed face per [`FontId`].
///
/// Glyph positions are returned in 26.6 fixed point at the font's nominal
/// size, with `y` pointing up.
#[derive(Default)]
pub struct RustybuzzShaper {
    buffer: UnicodeBuffer,
    faces: HashMap<FontId, CachedFace>,
}

impl RustybuzzShaper {
    pub fn new() -> RustybuzzShaper {
        RustybuzzShaper::default()
    }

    /// Drops the cached face of `font`, e.g. after its data changed.
    pub fn evict(&mut self, font: FontId) {
        self.faces.remove(&font);
    }
}

impl TextShaper for RustybuzzShaper {
    fn shape(
        &mut self,
        font: &dyn Font,
        text: &str,
        params: &ShapingParams,
        buf: &mut Vec<ShapedGlyph>,
    ) -> Result<()> {
        let face = match self.faces.entry(font.id()) {
            hash_map::Entry::Occupied(v) => v.into_mut().borrow_dependent(),
            hash_map::Entry::Vacant(v) => {
                let Some(font_face) = font.face() else {
                    return Err(Error::new(
                        ErrorKind::InvalidFont,
                        format!("font {:?} has no face to shape with", font.id()),
                    ));
                };

                let index = font_face.face_index();
                let cached_face = CachedFace::try_new(Arc::clone(font_face.data()), |data| {
                    rustybuzz::ttf_parser::Face::parse((**data).as_ref(), index)
                        .map(Face::from_face)
                })
                .map_err(|e| {
                    Error::new(ErrorKind::InvalidFont, format!("failed to parse font: {}", e))
                })?;

                v.insert(cached_face).borrow_dependent()
            }
        };

        let scale = SUBPIXEL_UNITS * font.size() / face.units_per_em() as f32;

        let mut buffer = std::mem::take(&mut self.buffer);
        buffer.clear();
        buffer.push_str(text);
        buffer.set_direction(map_direction(params.direction));

        match map_script(params.script) {
            Some(script) => buffer.set_script(script),
            None => log::warn!("Unknown script {:?}, guessing instead", params.script),
        }

        match Language::from_str(&params.language) {
            Ok(language) => buffer.set_language(language),
            Err(e) => log::warn!("Invalid language {:?}: {}", params.language, e),
        }

        buffer.guess_segment_properties();

        let glyphs = rustybuzz::shape(face, &[], buffer);

        let it = glyphs.glyph_infos().iter().zip(glyphs.glyph_positions());
        buf.extend(it.map(|(info, pos)| ShapedGlyph {
            glyph_id: info.glyph_id,
            offset: to_fixed(pos.x_offset, pos.y_offset, scale),
            advance: to_fixed(pos.x_advance, pos.y_advance, scale),
        }));

        self.buffer = glyphs.clear();

        Ok(())
    }
}

/// Converts font units to 26.6 fixed point, `scale` being fixed point units
/// per font unit.
fn to_fixed(x: i32, y: i32, scale: f32) -> IVec2 {
    (IVec2::new(x, y).as_vec2() * scale).round().as_ivec2()
}

fn map_direction(direction: Direction) -> rustybuzz::Direction {
    match direction {
        Direction::LeftToRight => rustybuzz::Direction::LeftToRight,
        Direction::RightToLeft => rustybuzz::Direction::RightToLeft,
        Direction::TopToBottom => rustybuzz::Direction::TopToBottom,
        Direction::BottomToTop => rustybuzz::Direction::BottomToTop,
    }
}

fn map_script(script: Script) -> Option<rustybuzz::Script> {
    rustybuzz::Script::from_iso15924_tag(Tag::from_bytes(&script.tag()))
}
