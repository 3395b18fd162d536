mod animation;
mod collision;
mod depth;
mod entity;
mod geometry;
mod npc;
mod player;
mod waypoint;
mod world;

#[cfg(test)]
pub(crate) mod test_support;

pub use animation::{AnimationSlot, AnimationState, Facing, Motion, SpriteSet, SLOT_COUNT};
pub use collision::{
    Collider, CollisionIndex, CollisionTier, IndexedCollider, InvalidCollisionTier,
    VERTICAL_BAND_LAYERS,
};
pub use depth::{depth_for_y, DepthMode, FIRST_DYNAMIC_DEPTH, MAX_FIXED_DEPTH};
pub use entity::{Body, Entity, EntityId, EntityKind, PropRole, StaticProp};
pub use geometry::{bounding_box, half_width_bounding_box, Rect, SpriteExtent, Vec2};
pub use npc::{GuardNpc, MotherNpc};
pub use player::{CameraFollow, MovementInput, PlayerActor, PlayerConfig};
pub use waypoint::{MoverState, WaypointMover, ARRIVAL_RADIUS};
pub use world::{Banner, SceneVisualState, SceneWorld, TickInput, WorldSnapshot};
