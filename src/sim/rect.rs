//! Axis-aligned rectangle geometry for the player, platforms and coins
//!
//! Screen space: x grows to the right, y grows downward, so a rectangle's
//! `top` is its smallest y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Width/height pair (non-negative)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Square size (coins)
    pub const fn square(side: f32) -> Self {
        Self::new(side, side)
    }

    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }
}

/// An axis-aligned bounding box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Size,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Size) -> Self {
        Self { pos, size }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.size.width, self.size.height) * 0.5
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.height
    }

    /// Strict overlap of the horizontal intervals (shared edges don't count)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.left() < other.right() && self.right() > other.left()
    }

    /// Strict overlap of the vertical intervals (shared edges don't count)
    #[inline]
    pub fn overlaps_y(&self, other: &Rect) -> bool {
        self.top() < other.bottom() && self.bottom() > other.top()
    }
}

/// Anything the collision code can treat as a rectangle
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}
