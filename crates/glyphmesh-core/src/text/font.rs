use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ttf_parser::Face;

use crate::math::Rect;
use crate::Result;

/// Shared font file contents.
pub type FontData = Arc<dyn AsRef<[u8]> + Send + Sync>;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct FontId(pub u64);

self_cell::self_cell! {
    struct FaceRef {
        owner: FontData,
        #[covariant]
        dependent: Face,
    }
}

/// A parsed font face. This is the native handle shapers work with.
pub struct FontFace {
    id: FontId,
    face_ref: FaceRef,
    face_index: u32,
}

impl FontFace {
    pub fn new(id: FontId, data: FontData, face_index: u32) -> Result<FontFace> {
        let face_ref = FaceRef::try_new(data, |data| Face::parse((**data).as_ref(), face_index))?;

        Ok(FontFace {
            id,
            face_ref,
            face_index,
        })
    }

    pub fn id(&self) -> FontId {
        self.id
    }

    pub fn data(&self) -> &FontData {
        self.face_ref.borrow_owner()
    }

    pub fn ttfp_face(&self) -> &Face {
        self.face_ref.borrow_dependent()
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("id", &self.id)
            .field("face_index", &self.face_index)
            .finish_non_exhaustive()
    }
}

/// Placement of a single glyph in a font's texture atlas.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AtlasGlyph {
    /// Position and size of the glyph image relative to the pen position, in
    /// units of the font's nominal size.
    pub quad: Rect,
    /// Texture coordinates of the glyph image in the atlas.
    pub texture: Rect,
}

/// A font as seen by the layout engine: an atlas lookup plus the handle a
/// [`TextShaper`](crate::text::TextShaper) shapes with.
pub trait Font {
    fn id(&self) -> FontId;

    /// Nominal size the atlas was rendered at, in pixels.
    fn size(&self) -> f32;

    fn glyph(&self, glyph_id: u32) -> AtlasGlyph;

    /// Parsed face, if the font carries one. Shapers that need outlines or
    /// OpenType tables fail without it.
    fn face(&self) -> Option<&FontFace>;
}

/// A [`Font`] backed by a prebuilt glyph table.
///
/// Glyphs missing from the table resolve to the `.notdef` glyph (id 0) when it
/// is present, and to an empty [`AtlasGlyph`] otherwise.
#[derive(Debug)]
pub struct AtlasFont {
    id: FontId,
    size: f32,
    face: Option<FontFace>,
    glyphs: HashMap<u32, AtlasGlyph>,
}

impl AtlasFont {
    pub fn new(id: FontId, size: f32) -> AtlasFont {
        AtlasFont {
            id,
            size,
            face: None,
            glyphs: HashMap::new(),
        }
    }

    pub fn from_face(face: FontFace, size: f32) -> AtlasFont {
        AtlasFont {
            id: face.id(),
            size,
            face: Some(face),
            glyphs: HashMap::new(),
        }
    }

    pub fn insert_glyph(&mut self, glyph_id: u32, quad: Rect, texture: Rect) {
        self.glyphs.insert(glyph_id, AtlasGlyph { quad, texture });
    }

    pub fn with_glyph(mut self, glyph_id: u32, quad: Rect, texture: Rect) -> AtlasFont {
        self.insert_glyph(glyph_id, quad, texture);
        self
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

impl Font for AtlasFont {
    fn id(&self) -> FontId {
        self.id
    }

    fn size(&self) -> f32 {
        self.size
    }

    fn glyph(&self, glyph_id: u32) -> AtlasGlyph {
        match self.glyphs.get(&glyph_id) {
            Some(glyph) => *glyph,
            None => {
                log::trace!("glyph {} missing from atlas of font {:?}", glyph_id, self.id);
                self.glyphs.get(&0).copied().unwrap_or_default()
            }
        }
    }

    fn face(&self) -> Option<&FontFace> {
        self.face.as_ref()
    }
}
