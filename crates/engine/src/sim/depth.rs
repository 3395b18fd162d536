pub const DEPTH_ORIGIN_Y: f32 = 200.0;
pub const DEPTH_BAND_HEIGHT: f32 = 5.0;
pub const FIRST_DYNAMIC_DEPTH: i32 = 5;
/// Fixed depths for background decor live below the first dynamic layer.
pub const MAX_FIXED_DEPTH: i32 = FIRST_DYNAMIC_DEPTH - 1;

/// Draw-order layer for a vertical position: `floor((y - 200) / 5) + 5`.
pub fn depth_for_y(y: f32) -> i32 {
    ((y - DEPTH_ORIGIN_Y) / DEPTH_BAND_HEIGHT).floor() as i32 + FIRST_DYNAMIC_DEPTH
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthMode {
    /// Re-derived from Y after every position change.
    #[default]
    Dynamic,
    /// Assigned once at spawn and never recomputed.
    Fixed(i32),
}

impl DepthMode {
    pub fn resolve(self, y: f32) -> i32 {
        match self {
            DepthMode::Dynamic => depth_for_y(y),
            DepthMode::Fixed(depth) => depth,
        }
    }
}
