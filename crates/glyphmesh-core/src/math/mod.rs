//! Reexports [`glam`] and adds [`Rect`].

mod rect;

pub use glam::*;

pub use self::rect::*;
