use crate::sim::{Rect, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Half-open pixel rectangle: `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Portion inside the viewport, or `None` when fully off screen.
    pub fn clipped_to(&self, viewport: Viewport) -> Option<ScreenRect> {
        let clipped = ScreenRect {
            left: self.left.max(0),
            top: self.top.max(0),
            right: self.right.min(viewport.width as i32),
            bottom: self.bottom.min(viewport.height as i32),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// World rectangle to screen pixels. The camera value is a translation added
/// to world coordinates, truncated to whole pixels.
pub fn rect_to_screen(rect: Rect, camera: Vec2) -> ScreenRect {
    let moved = rect.translated(camera.x as i32, camera.y as i32);
    ScreenRect {
        left: moved.left(),
        top: moved.top(),
        right: moved.right(),
        bottom: moved.bottom(),
    }
}
