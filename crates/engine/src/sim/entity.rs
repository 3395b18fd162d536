use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::animation::AnimationState;
use super::collision::{Collider, CollisionTier};
use super::depth::DepthMode;
use super::geometry::{bounding_box, half_width_bounding_box, Rect, SpriteExtent, Vec2};
use super::npc::{GuardNpc, MotherNpc};
use super::player::PlayerActor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Positional and collision data shared by every entity variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    position: Vec2,
    pub extent: SpriteExtent,
    depth_mode: DepthMode,
    depth: i32,
    pub collidable: bool,
    pub tier: CollisionTier,
}

impl Body {
    pub fn new(
        position: Vec2,
        extent: SpriteExtent,
        depth_mode: DepthMode,
        collidable: bool,
        tier: CollisionTier,
    ) -> Self {
        Self {
            position,
            extent,
            depth_mode,
            depth: depth_mode.resolve(position.y),
            collidable,
            tier,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn depth_mode(&self) -> DepthMode {
        self.depth_mode
    }

    /// Moves the body and re-derives its depth.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.refresh_depth();
    }

    pub fn refresh_depth(&mut self) {
        self.depth = self.depth_mode.resolve(self.position.y);
    }

    pub fn bounding_box(&self) -> Rect {
        bounding_box(self.position, &self.extent)
    }

    pub fn half_width_bounding_box(&self) -> Rect {
        half_width_bounding_box(self.position, &self.extent)
    }

    pub fn collider(&self) -> Collider {
        Collider {
            depth: self.depth,
            collidable: self.collidable,
            bounds: self.bounding_box(),
            half_bounds: self.half_width_bounding_box(),
        }
    }
}

/// What a non-animated prop means to the level. Only affects gameplay lookups
/// and placeholder colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropRole {
    Decor,
    #[default]
    Obstacle,
    Foliage,
    WinTrigger,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticProp {
    pub role: PropRole,
    /// Sheet drawn whole; placeholder box when absent.
    pub sprite: Option<String>,
}

#[derive(Debug, Clone)]
pub enum EntityKind {
    Static(StaticProp),
    Animated(AnimationState),
    Player(PlayerActor),
    Mother(MotherNpc),
    Guard(GuardNpc),
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: Arc<str>,
    pub body: Body,
    pub kind: EntityKind,
    pub visible: bool,
    /// Drawn desaturated; set on the player while hidden.
    pub shaded: bool,
}

impl Entity {
    pub fn animation(&self) -> Option<&AnimationState> {
        match &self.kind {
            EntityKind::Static(_) => None,
            EntityKind::Animated(animation) => Some(animation),
            EntityKind::Player(player) => Some(&player.animation),
            EntityKind::Mother(mother) => Some(mother.animation()),
            EntityKind::Guard(guard) => Some(guard.animation()),
        }
    }

    pub fn as_player(&self) -> Option<&PlayerActor> {
        match &self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerActor> {
        match &mut self.kind {
            EntityKind::Player(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_mother(&self) -> Option<&MotherNpc> {
        match &self.kind {
            EntityKind::Mother(mother) => Some(mother),
            _ => None,
        }
    }

    pub fn as_mother_mut(&mut self) -> Option<&mut MotherNpc> {
        match &mut self.kind {
            EntityKind::Mother(mother) => Some(mother),
            _ => None,
        }
    }

    pub fn as_guard(&self) -> Option<&GuardNpc> {
        match &self.kind {
            EntityKind::Guard(guard) => Some(guard),
            _ => None,
        }
    }

    pub fn as_guard_mut(&mut self) -> Option<&mut GuardNpc> {
        match &mut self.kind {
            EntityKind::Guard(guard) => Some(guard),
            _ => None,
        }
    }

    pub fn prop_role(&self) -> Option<PropRole> {
        match &self.kind {
            EntityKind::Static(prop) => Some(prop.role),
            _ => None,
        }
    }
}
