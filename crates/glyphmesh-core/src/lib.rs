//! Turns shaped text into quad geometry ready for GPU upload.
//!
//! The static path ([`mesh::render_arrays`], [`mesh::render_to_buffers`])
//! builds geometry once. The dynamic path ([`TextRenderer`]) reserves buffer
//! storage up front and rewrites vertices in place on every render.

pub mod buffer;
pub mod index;
pub mod math;
pub mod mesh;
pub mod quad;
pub mod renderer;
pub mod text;

mod error;

pub use self::error::*;
pub use self::renderer::TextRenderer;

#[cfg(test)]
pub(crate) mod testing;
