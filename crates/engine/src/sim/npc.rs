use std::sync::Arc;

use super::animation::{AnimationState, SpriteSet};
use super::entity::Body;
use super::geometry::Vec2;
use super::waypoint::WaypointMover;
use super::world::WorldSnapshot;

/// Moves the body along the mover's target, re-deriving depth, and feeds the
/// resulting direction to the animation.
fn walk(mover: &mut WaypointMover, animation: &mut AnimationState, body: &mut Body) {
    let mut position = body.position();
    let movement = mover.step(&mut position);
    if !movement.is_zero() {
        body.set_position(position);
    }
    animation.update(movement);
}

/// A shopper carrying candy. Once robbed she counts down and restocks.
#[derive(Debug, Clone)]
pub struct MotherNpc {
    animation: AnimationState,
    mover: WaypointMover,
    has_candy: bool,
    observed_has_candy: bool,
    respawn_timer: u32,
    respawn_ticks: u32,
    spare_sprites: Arc<SpriteSet>,
}

impl MotherNpc {
    /// `without_candy` is shown while she has nothing left to steal.
    pub fn new(
        with_candy: Arc<SpriteSet>,
        without_candy: Arc<SpriteSet>,
        mover: WaypointMover,
        respawn_ticks: u32,
    ) -> Self {
        Self {
            animation: AnimationState::new(with_candy),
            mover,
            has_candy: true,
            observed_has_candy: true,
            respawn_timer: 0,
            respawn_ticks,
            spare_sprites: without_candy,
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn mover(&self) -> &WaypointMover {
        &self.mover
    }

    pub fn mover_mut(&mut self) -> &mut WaypointMover {
        &mut self.mover
    }

    pub fn has_candy(&self) -> bool {
        self.has_candy
    }

    pub fn set_has_candy(&mut self, has_candy: bool) {
        self.has_candy = has_candy;
    }

    pub fn respawn_timer(&self) -> u32 {
        self.respawn_timer
    }

    pub fn set_respawn_timer(&mut self, ticks: u32) {
        self.respawn_timer = ticks;
    }

    /// Countdown configured for this mother in the level.
    pub fn respawn_ticks(&self) -> u32 {
        self.respawn_ticks
    }

    pub fn update(&mut self, body: &mut Body, _snapshot: &WorldSnapshot) {
        if self.has_candy != self.observed_has_candy {
            self.observed_has_candy = self.has_candy;
            self.animation.swap_sprites(&mut self.spare_sprites);
        }

        if !self.has_candy {
            if self.respawn_timer > 0 {
                self.respawn_timer -= 1;
            } else {
                self.has_candy = true;
            }
        }

        walk(&mut self.mover, &mut self.animation, body);
    }
}

/// A mall cop that patrols and chases a visible player inside its radius.
#[derive(Debug, Clone)]
pub struct GuardNpc {
    animation: AnimationState,
    mover: WaypointMover,
    detection_radius: u32,
    chasing: bool,
}

impl GuardNpc {
    pub fn new(sprites: Arc<SpriteSet>, mover: WaypointMover, detection_radius: u32) -> Self {
        Self {
            animation: AnimationState::new(sprites),
            mover,
            detection_radius,
            chasing: false,
        }
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn mover(&self) -> &WaypointMover {
        &self.mover
    }

    pub fn mover_mut(&mut self) -> &mut WaypointMover {
        &mut self.mover
    }

    pub fn detection_radius(&self) -> u32 {
        self.detection_radius
    }

    pub fn set_detection_radius(&mut self, radius: u32) {
        self.detection_radius = radius;
    }

    pub fn is_chasing(&self) -> bool {
        self.chasing
    }

    pub fn is_within_detection_radius(&self, body: &Body, point: Vec2) -> bool {
        body.position().distance(point) < self.detection_radius as f32
    }

    pub fn update(&mut self, body: &mut Body, snapshot: &WorldSnapshot) {
        let target = snapshot
            .player_position
            .filter(|_| !snapshot.player_hidden)
            .filter(|position| self.is_within_detection_radius(body, *position));

        self.chasing = target.is_some();
        self.mover.set_temp_destination(target, false);

        walk(&mut self.mover, &mut self.animation, body);
    }
}
