//! Triangle-list indices for glyph quads.

/// Integer width of an index buffer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    /// Narrowest width able to address `vertex_count` vertices.
    pub fn for_vertex_count(vertex_count: usize) -> IndexType {
        if vertex_count < 255 {
            IndexType::U8
        } else if vertex_count < 65535 {
            IndexType::U16
        } else {
            IndexType::U32
        }
    }

    /// Size of a single index in bytes.
    pub fn size(self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

pub const VERTICES_PER_GLYPH: usize = 4;
pub const INDICES_PER_GLYPH: usize = 6;

/// Largest glyph count whose vertex indices and index count fit into `u32`.
pub const MAX_GLYPHS: usize = u32::MAX as usize / INDICES_PER_GLYPH;

/// Indices of the two triangles covering glyph `i`: top-left, bottom-left,
/// top-right, then bottom-left, bottom-right, top-right.
pub fn glyph_indices(i: u32) -> [u32; INDICES_PER_GLYPH] {
    let base = i * VERTICES_PER_GLYPH as u32;
    [base, base + 1, base + 2, base + 1, base + 3, base + 2]
}

/// Indices of glyphs `0..glyph_count`, in draw order.
///
/// # Panics
///
/// Panics if `glyph_count` exceeds [`MAX_GLYPHS`].
pub fn glyph_index_iter(glyph_count: usize) -> impl Iterator<Item = u32> {
    assert!(
        glyph_count <= MAX_GLYPHS,
        "{} glyphs can't be addressed with 32-bit indices",
        glyph_count
    );
    (0..glyph_count as u32).flat_map(glyph_indices)
}

/// Index data at a specific width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Indices {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl Indices {
    pub fn index_type(&self) -> IndexType {
        match self {
            Indices::U8(_) => IndexType::U8,
            Indices::U16(_) => IndexType::U16,
            Indices::U32(_) => IndexType::U32,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Indices::U8(v) => v.len(),
            Indices::U16(v) => v.len(),
            Indices::U32(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> Option<u32> {
        match self {
            Indices::U8(v) => v.get(i).map(|&x| u32::from(x)),
            Indices::U16(v) => v.get(i).map(|&x| u32::from(x)),
            Indices::U32(v) => v.get(i).copied(),
        }
    }

    /// Index data as uploaded to a buffer: little-endian, like
    /// [`write_indices`] produces it.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        match self {
            Indices::U8(v) => v.clone(),
            Indices::U16(v) => v.iter().flat_map(|i| i.to_le_bytes()).collect(),
            Indices::U32(v) => v.iter().flat_map(|i| i.to_le_bytes()).collect(),
        }
    }
}

/// Generates `glyph_count * 6` indices at the given width.
///
/// # Panics
///
/// Panics if the last vertex index doesn't fit into `index_type`.
pub fn generate_indices(glyph_count: usize, index_type: IndexType) -> Indices {
    let it = glyph_index_iter(glyph_count);

    match index_type {
        IndexType::U8 => Indices::U8(it.map(narrow).collect()),
        IndexType::U16 => Indices::U16(it.map(narrow).collect()),
        IndexType::U32 => Indices::U32(it.collect()),
    }
}

/// Writes `glyph_count * 6` little-endian indices into `out`, which may be
/// unaligned (e.g. a mapped buffer region).
///
/// # Panics
///
/// Panics if `out` is shorter than the index data or an index doesn't fit
/// into `index_type`.
pub fn write_indices(glyph_count: usize, index_type: IndexType, out: &mut [u8]) {
    let size = index_type.size();
    assert!(
        out.len() >= glyph_count * INDICES_PER_GLYPH * size,
        "index region of {} bytes is too small for {} glyphs",
        out.len(),
        glyph_count,
    );

    let it = glyph_index_iter(glyph_count);
    for (index, dst) in it.zip(out.chunks_exact_mut(size)) {
        match index_type {
            IndexType::U8 => dst[0] = narrow(index),
            IndexType::U16 => dst.copy_from_slice(&narrow::<u16>(index).to_le_bytes()),
            IndexType::U32 => dst.copy_from_slice(&index.to_le_bytes()),
        }
    }
}

fn narrow<T: TryFrom<u32>>(index: u32) -> T {
    match T::try_from(index) {
        Ok(v) => v,
        Err(_) => panic!("vertex index {index} doesn't fit into the selected index type"),
    }
}
