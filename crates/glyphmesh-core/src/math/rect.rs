use crate::math::Vec2;

/// An axis-aligned rectangle with `y` pointing up: `min` is the bottom-left
/// corner, `max` is the top-right corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(Vec2::ZERO, Vec2::ZERO);

    pub const fn new(min: Vec2, max: Vec2) -> Rect {
        Rect { min, max }
    }

    /// Creates a rectangle from its bottom-left corner and size.
    pub fn from_size(bottom_left: Vec2, size: Vec2) -> Rect {
        Rect::new(bottom_left, bottom_left + size)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn bottom_left(&self) -> Vec2 {
        self.min
    }

    pub fn top_right(&self) -> Vec2 {
        self.max
    }

    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.min.x, self.max.y)
    }

    pub fn bottom_right(&self) -> Vec2 {
        Vec2::new(self.max.x, self.min.y)
    }

    pub fn union(self, other: Rect) -> Rect {
        Rect::new(self.min.min(other.min), self.max.max(other.max))
    }
}
