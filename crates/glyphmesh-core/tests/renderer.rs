mod common;

use std::sync::Arc;

use glyphmesh_core::buffer::{BufferUsage, HostBuffer};
use glyphmesh_core::index::IndexType;
use glyphmesh_core::math::{IVec2, Vec2};
use glyphmesh_core::mesh::render_arrays;
use glyphmesh_core::quad::{Dim2, Vertex2D};
use glyphmesh_core::renderer::{TextRenderer2D, TextRenderer3D};
use glyphmesh_core::text::TextLayouter;
use glyphmesh_core::{ErrorKind, TextRenderer};

use common::{em, font, CharShaper, FlakyBuffer};

fn renderer(size: f32) -> TextRenderer2D<CharShaper, HostBuffer> {
    TextRenderer::new(
        Arc::new(font()),
        size,
        CharShaper::new(),
        HostBuffer::new(),
        HostBuffer::new(),
    )
}

fn vertices(buffer: &HostBuffer) -> Vec<Vertex2D> {
    buffer
        .data()
        .chunks_exact(std::mem::size_of::<Vertex2D>())
        .map(bytemuck::pod_read_unaligned)
        .collect()
}

#[test]
fn renders_hi() {
    let mut r = renderer(10.0);
    r.reserve(10, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();

    r.render("Hi").unwrap();

    assert_eq!(r.mesh().index_count, 12);
    assert_eq!(r.mesh().index_type, IndexType::U8);

    let written = vertices(r.vertex_buffer());
    assert_eq!(written.len(), 40);
    assert!(written[..8].iter().all(|v| v.position[2] == 1.0));
    assert!(written[8..].iter().all(|v| *v == bytemuck::Zeroable::zeroed()));

    // glyph 0's bottom-left to glyph 1's top-right
    assert_eq!(written[1].position, [0.0, 0.0, 1.0]);
    assert_eq!(written[6].position, [10.0, 7.5, 1.0]);
    assert_eq!(r.rect().min, Vec2::new(0.0, 0.0));
    assert_eq!(r.rect().max, Vec2::new(10.0, 7.5));
}

#[test]
fn matches_static_path() {
    let text = "Glyph";
    let mut r = renderer(3.0);
    r.reserve(8, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();
    r.render(text).unwrap();

    let font = font();
    let mut layouter = TextLayouter::new(CharShaper::new());
    let arrays = render_arrays::<Dim2, _>(&mut layouter, &font, 3.0, text).unwrap();

    let written = vertices(r.vertex_buffer());
    for (i, (position, tex)) in arrays.positions.iter().zip(&arrays.tex_coords).enumerate() {
        assert_eq!(written[i].position, position.to_array());
        assert_eq!(written[i].tex, tex.to_array());
    }
    assert_eq!(r.rect(), arrays.rect);
    assert_eq!(r.mesh().index_count as usize, arrays.indices.len());
}

#[test]
fn rendering_is_idempotent() {
    let mut r = renderer(12.0);
    r.reserve(16, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();

    r.render("same text").unwrap();
    let first = r.vertex_buffer().data().to_vec();
    let first_rect = r.rect();

    r.render("same text").unwrap();
    assert_eq!(r.vertex_buffer().data(), first.as_slice());
    assert_eq!(r.rect(), first_rect);
}

#[test]
fn index_buffer_is_left_alone() {
    let mut r = renderer(1.0);
    r.reserve(5, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();
    let indices = r.index_buffer().data().to_vec();

    r.render("abcde").unwrap();
    r.render("ab").unwrap();

    assert_eq!(r.index_buffer().data(), indices.as_slice());
    assert_eq!(r.mesh().index_count, 12);
}

#[test]
fn advances_accumulate() {
    let shaper = CharShaper::new()
        .with_advance('a', IVec2::new(em(1.0), 0))
        .with_advance('b', IVec2::new(em(0.25), em(0.5)));
    let mut r: TextRenderer2D<_, _> =
        TextRenderer::new(Arc::new(font()), 4.0, shaper, HostBuffer::new(), HostBuffer::new());
    r.reserve(3, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();

    r.render("abc").unwrap();

    let written = vertices(r.vertex_buffer());
    let origin = |glyph: usize| written[glyph * 4 + 1].position;
    assert_eq!(origin(0), [0.0, 0.0, 1.0]);
    assert_eq!(origin(1), [4.0, 0.0, 1.0]);
    assert_eq!(origin(2), [5.0, 2.0, 1.0]);
}

#[test]
fn reserve_again_discards_previous_state() {
    let mut r = renderer(1.0);
    r.reserve(2, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();
    r.render("ab").unwrap();

    r.reserve(100, BufferUsage::StreamDraw, BufferUsage::StaticDraw)
        .unwrap();

    assert_eq!(r.capacity(), 100);
    assert_eq!(r.mesh().index_count, 0);
    assert_eq!(r.mesh().index_type, IndexType::U16);
    assert!(r.vertex_buffer().data().iter().all(|&b| b == 0));

    r.render(&"x".repeat(100)).unwrap();
    assert_eq!(r.mesh().index_count, 600);
}

#[test]
#[should_panic(expected = "capacity 3 too small to render 4 glyphs")]
fn exceeding_capacity_is_fatal() {
    let mut r = renderer(1.0);
    r.reserve(3, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();
    let _ = r.render("abcd");
}

#[test]
fn failed_unmap_is_reported() {
    let vertex_buffer = FlakyBuffer {
        fail_unmap: true,
        ..Default::default()
    };
    let mut r: TextRenderer3D<_, _> = TextRenderer::new(
        Arc::new(font()),
        1.0,
        CharShaper::new(),
        vertex_buffer,
        FlakyBuffer::default(),
    );
    r.reserve(4, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap();

    let err = r.render("ok").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BufferMap);
    assert_eq!(err.to_string(), "failed to write text vertices");
    assert_eq!(r.mesh().index_count, 0);
    assert!(!r.vertex_buffer().inner.is_mapped());
}

#[test]
fn failed_index_prefill_is_reported() {
    let index_buffer = FlakyBuffer {
        fail_unmap: true,
        ..Default::default()
    };
    let mut r: TextRenderer3D<_, _> = TextRenderer::new(
        Arc::new(font()),
        1.0,
        CharShaper::new(),
        FlakyBuffer::default(),
        index_buffer,
    );

    let err = r
        .reserve(4, BufferUsage::DynamicDraw, BufferUsage::StaticDraw)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::BufferMap);
    assert_eq!(err.to_string(), "failed to prefill index buffer");
    assert_eq!(r.capacity(), 0);
    assert!(!r.index_buffer().inner.is_mapped());
}
