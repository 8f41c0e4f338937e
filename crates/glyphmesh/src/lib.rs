//! Glyph-to-quad text meshes, with the rustybuzz shaper and the wgpu buffer
//! backend enabled by default features.

pub use glyphmesh_core::*;

pub mod text {
    pub use glyphmesh_core::text::*;
    #[cfg(feature = "rustybuzz")]
    pub use glyphmesh_rustybuzz::RustybuzzShaper;

    #[cfg(feature = "rustybuzz")]
    pub type DefaultTextShaper = RustybuzzShaper;
}

#[cfg(feature = "wgpu")]
pub mod wgpu {
    #[cfg(feature = "rustybuzz")]
    use std::sync::Arc;

    pub use glyphmesh_wgpu::*;
    #[cfg(feature = "rustybuzz")]
    use glyphmesh_wgpu::wgpu::{Device, Queue};

    use crate::quad::{Dim2, Dim3};
    use crate::renderer::TextRenderer;
    #[cfg(feature = "rustybuzz")]
    use crate::text::{DefaultTextShaper, Font};

    pub type WgpuTextRenderer2D<S> = TextRenderer<Dim2, S, WgpuBuffer>;
    pub type WgpuTextRenderer3D<S> = TextRenderer<Dim3, S, WgpuBuffer>;

    /// A 2D renderer shaping with rustybuzz into fresh wgpu buffers.
    #[cfg(feature = "rustybuzz")]
    pub fn text_renderer(
        font: Arc<dyn Font>,
        size: f32,
        device: Arc<Device>,
        queue: Arc<Queue>,
    ) -> WgpuTextRenderer2D<DefaultTextShaper> {
        let vertices = WgpuBuffer::vertex(device.clone(), queue.clone());
        let indices = WgpuBuffer::index(device, queue);
        TextRenderer::new(font, size, DefaultTextShaper::new(), vertices, indices)
    }
}


