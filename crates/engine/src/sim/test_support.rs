use std::sync::Arc;

use super::animation::SpriteSet;
use super::entity::{Body, EntityKind};
use super::geometry::{SpriteExtent, Vec2};
use super::collision::CollisionTier;
use super::depth::DepthMode;

pub(crate) fn walking_set(prefix: &str, frames: u32) -> SpriteSet {
    let names = [
        "down_still",
        "down_moving",
        "left_still",
        "left_moving",
        "right_still",
        "right_moving",
        "up_still",
        "up_moving",
    ];
    SpriteSet {
        sheets: names.map(|name| format!("{prefix}_{name}")),
        frame_counts: [1, frames, 1, frames, 1, frames, 1, frames],
        cell_width: 30,
        cell_height: 60,
    }
}

pub(crate) fn shared_set(prefix: &str, frames: u32) -> Arc<SpriteSet> {
    Arc::new(walking_set(prefix, frames))
}

pub(crate) fn body_at(position: Vec2, width: i32, height: i32, tier: CollisionTier) -> Body {
    Body::new(
        position,
        SpriteExtent::new(width, height),
        DepthMode::Dynamic,
        true,
        tier,
    )
}

pub(crate) fn static_prop() -> EntityKind {
    EntityKind::Static(Default::default())
}
