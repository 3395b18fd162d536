use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    pub fn normalized(self) -> Option<Vec2> {
        let length = self.length();
        if length == 0.0 || !length.is_finite() {
            return None;
        }
        Some(Vec2 {
            x: self.x / length,
            y: self.y / length,
        })
    }

    /// Component-wise product, used to scale a direction by a per-axis speed.
    pub fn scale_by(self, factors: Vec2) -> Vec2 {
        Vec2 {
            x: self.x * factors.x,
            y: self.y * factors.y,
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Integer pixel rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn translated(&self, offset_x: i32, offset_y: i32) -> Rect {
        Rect {
            x: self.x.saturating_add(offset_x),
            y: self.y.saturating_add(offset_y),
            ..*self
        }
    }
}

/// Pixel size of a sprite plus the anchor offset recorded when it was loaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteExtent {
    pub width: i32,
    pub height: i32,
    pub center: Vec2,
}

impl SpriteExtent {
    /// Anchors the sprite at its integer half size.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            center: Vec2::new((width / 2) as f32, (height / 2) as f32),
        }
    }

    pub fn with_center(width: i32, height: i32, center: Vec2) -> Self {
        Self {
            width,
            height,
            center,
        }
    }
}

// Float to int casts truncate toward zero, matching sprite-space pixel rects.
pub fn bounding_box(position: Vec2, extent: &SpriteExtent) -> Rect {
    Rect {
        x: (position.x - extent.center.x) as i32,
        y: (position.y - extent.center.y) as i32,
        width: extent.width,
        height: extent.height,
    }
}

pub fn half_width_bounding_box(position: Vec2, extent: &SpriteExtent) -> Rect {
    Rect {
        x: (position.x - extent.center.x / 2.0) as i32,
        y: (position.y - extent.center.y) as i32,
        width: extent.width / 2,
        height: extent.height,
    }
}
