mod common;

use glyphmesh_core::buffer::{BufferUsage, GpuBuffer, HostBuffer};
use glyphmesh_core::index::IndexType;
use glyphmesh_core::math::{IVec2, Vec2, Vec4};
use glyphmesh_core::mesh::{render_arrays, render_to_buffers, AttributeFormat, Primitive};
use glyphmesh_core::quad::Dim3;
use glyphmesh_core::text::TextLayouter;

use common::{em, font, CharShaper};

#[test]
fn vertex_and_index_counts() {
    let font = font();
    let mut layouter = TextLayouter::new(CharShaper::new());

    for g in 0..6 {
        let text = "a".repeat(g);
        let arrays = render_arrays::<Dim3, _>(&mut layouter, &font, 1.0, &text).unwrap();
        assert_eq!(arrays.positions.len(), 4 * g);
        assert_eq!(arrays.indices.len(), 6 * g);

        let mut vertices = HostBuffer::new();
        let mut indices = HostBuffer::new();
        let (mesh, _) = render_to_buffers::<Dim3, _, _>(
            &mut layouter,
            &font,
            1.0,
            &text,
            &mut vertices,
            &mut indices,
            BufferUsage::StaticDraw,
        )
        .unwrap();
        assert_eq!(mesh.vertex_count as usize, 4 * g);
        assert_eq!(mesh.index_count as usize, 6 * g);
        assert_eq!(indices.size(), 6 * g);
    }
}

#[test]
fn glyph_origins_follow_summed_advances() {
    let advances = [em(0.5), em(0.25), em(1.0), em(0.75)];
    let shaper = "abcd"
        .chars()
        .zip(advances)
        .fold(CharShaper::new(), |s, (c, a)| s.with_advance(c, IVec2::new(a, 0)));
    let mut layouter = TextLayouter::new(shaper);

    let mesh = render_arrays::<Dim3, _>(&mut layouter, &font(), 8.0, "abcd").unwrap();

    let mut expected = 0.0;
    for k in 0..4 {
        let origin = mesh.positions[k * 4 + 1];
        assert_eq!(origin, Vec4::new(expected * 8.0, 0.0, 0.0, 1.0));
        expected += advances[k] as f32 / em(1.0) as f32;
    }
}

#[test]
fn tall_middle_glyph_sticks_out() {
    let mesh = render_arrays::<Dim3, _>(
        &mut TextLayouter::new(CharShaper::new()),
        &font(),
        4.0,
        "aHa",
    )
    .unwrap();

    assert_eq!(mesh.rect.min, Vec2::new(0.0, 0.0));
    assert_eq!(mesh.rect.max, Vec2::new(6.0, 3.0));
    assert!(mesh.positions.iter().any(|p| p.y == 4.0));
}

#[test]
fn mesh_description() {
    let mut vertices = HostBuffer::new();
    let mut indices = HostBuffer::new();
    let text = "z".repeat(70);

    let (mesh, _) = render_to_buffers::<Dim3, _, _>(
        &mut TextLayouter::new(CharShaper::new()),
        &font(),
        1.0,
        &text,
        &mut vertices,
        &mut indices,
        BufferUsage::DynamicDraw,
    )
    .unwrap();

    assert_eq!(mesh.primitive, Primitive::Triangles);
    assert_eq!(mesh.index_type, IndexType::U16);
    assert_eq!(mesh.stride, 24);
    assert_eq!(mesh.attributes[0].format, AttributeFormat::Float32x4);
    assert_eq!(mesh.attributes[1].format, AttributeFormat::Float32x2);
    assert_eq!(mesh.attributes[1].offset, 16);
    assert_eq!(indices.size(), 70 * 6 * 2);
    assert_eq!(vertices.usage(), BufferUsage::DynamicDraw);
}
