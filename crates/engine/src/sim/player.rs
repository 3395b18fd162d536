use serde::{Deserialize, Serialize};

use super::animation::AnimationState;
use super::collision::CollisionIndex;
use super::entity::Body;
use super::geometry::Vec2;

/// Directional keys held this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Camera follow: locked to flat offsets near the map edges, panning 1:1
/// with the player in between.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraFollow {
    pub pan_start_x: f32,
    pub pan_end_x: f32,
    pub pan_start_y: f32,
    pub pan_end_y: f32,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            pan_start_x: 400.0,
            pan_end_x: 2600.0,
            pan_start_y: 300.0,
            pan_end_y: 700.0,
        }
    }
}

impl CameraFollow {
    pub fn translation_for(&self, position: Vec2) -> Vec2 {
        Vec2 {
            x: follow_axis(position.x, self.pan_start_x, self.pan_end_x),
            y: follow_axis(position.y, self.pan_start_y, self.pan_end_y),
        }
    }
}

fn follow_axis(value: f32, pan_start: f32, pan_end: f32) -> f32 {
    if value <= pan_start {
        0.0
    } else if value >= pan_end {
        pan_start - pan_end
    } else {
        pan_start - value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Units per tick on each axis.
    pub step: f32,
    pub min_y: f32,
    pub max_y: f32,
    pub max_x: f32,
    pub camera: CameraFollow,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            step: 5.0,
            min_y: 190.0,
            max_y: 950.0,
            max_x: 2975.0,
            camera: CameraFollow::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlayerActor {
    pub animation: AnimationState,
    config: PlayerConfig,
    movement_allowed: bool,
    hidden: bool,
    candy_count: u32,
    camera: Vec2,
}

impl PlayerActor {
    pub fn new(animation: AnimationState, config: PlayerConfig) -> Self {
        Self {
            animation,
            config,
            movement_allowed: false,
            hidden: false,
            candy_count: 0,
            camera: Vec2::ZERO,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn movement_allowed(&self) -> bool {
        self.movement_allowed
    }

    pub fn set_movement_allowed(&mut self, allowed: bool) {
        self.movement_allowed = allowed;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn candy_count(&self) -> u32 {
        self.candy_count
    }

    pub fn set_candy_count(&mut self, candy_count: u32) {
        self.candy_count = candy_count;
    }

    /// Current camera translation applied to world coordinates when drawing.
    pub fn camera(&self) -> Vec2 {
        self.camera
    }

    pub fn reset_camera(&mut self) {
        self.camera = Vec2::ZERO;
    }

    /// Desired displacement for this tick, with each key gated by the map
    /// bounds. Opposite keys cancel.
    pub fn intent(&self, input: MovementInput, body: &Body) -> Vec2 {
        let position = body.position();
        let step = self.config.step;
        let mut intent = Vec2::ZERO;

        if input.down && position.y < self.config.max_y {
            intent.y += step;
        }
        if input.left && position.x - (body.bounding_box().width / 4) as f32 > 0.0 {
            intent.x -= step;
        }
        if input.right && position.x < self.config.max_x {
            intent.x += step;
        }
        if input.up && position.y > self.config.min_y {
            intent.y -= step;
        }
        intent
    }

    /// Tentatively applies the intent and reverts it whole if anything in
    /// `index` blocks the new position. Returns the attempted intent so the
    /// walk animation plays against walls.
    pub fn step(
        &mut self,
        name: &str,
        body: &mut Body,
        input: MovementInput,
        index: &CollisionIndex,
    ) -> Vec2 {
        if !self.movement_allowed {
            return Vec2::ZERO;
        }

        let intent = self.intent(input, body);
        if !intent.is_zero() {
            let previous = body.position();
            body.set_position(previous + intent);
            if index.first_blocking(name, &body.collider()).is_some() {
                body.set_position(previous);
            }
        }

        self.camera = self.config.camera.translation_for(body.position());
        intent
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::sim::collision::{CollisionTier, IndexedCollider};
    use crate::sim::entity::EntityId;
    use crate::sim::test_support::{body_at, shared_set};

    fn player() -> PlayerActor {
        let mut player = PlayerActor::new(
            AnimationState::new(shared_set("player", 7)),
            PlayerConfig::default(),
        );
        player.set_movement_allowed(true);
        player
    }

    fn index_with(entries: &[(&str, &Body)]) -> CollisionIndex {
        let mut index = CollisionIndex::default();
        for (id, (name, body)) in entries.iter().enumerate() {
            index.insert(
                body.tier,
                IndexedCollider {
                    id: EntityId(id as u64),
                    name: Arc::from(*name),
                    collider: body.collider(),
                },
            );
        }
        index
    }

    #[test]
    fn opposite_keys_cancel() {
        let player = player();
        let body = body_at(Vec2::new(400.0, 300.0), 30, 60, CollisionTier::Fine);
        let input = MovementInput {
            up: true,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(player.intent(input, &body), Vec2::ZERO);
    }

    #[test]
    fn bounds_gate_each_direction() {
        let player = player();
        let all = MovementInput {
            up: true,
            down: true,
            left: true,
            right: true,
        };

        let top_left = body_at(Vec2::new(7.0, 190.0), 30, 60, CollisionTier::Fine);
        assert_eq!(player.intent(all, &top_left), Vec2::new(5.0, 5.0));

        let bottom_right = body_at(Vec2::new(2975.0, 950.0), 30, 60, CollisionTier::Fine);
        assert_eq!(player.intent(all, &bottom_right), Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn free_move_updates_position_and_depth() {
        let mut player = player();
        let mut body = body_at(Vec2::new(400.0, 300.0), 30, 60, CollisionTier::Fine);
        let input = MovementInput {
            down: true,
            ..MovementInput::default()
        };

        let moved = player.step("Player", &mut body, input, &CollisionIndex::default());
        assert_eq!(moved, Vec2::new(0.0, 5.0));
        assert_eq!(body.position(), Vec2::new(400.0, 305.0));
        assert_eq!(body.depth(), 26);
    }

    #[test]
    fn blocked_move_into_fine_entity_is_fully_reverted() {
        let mut player = player();
        let mut body = body_at(Vec2::new(400.0, 300.0), 30, 60, CollisionTier::Fine);
        let start_depth = body.depth();
        let crate_body = body_at(Vec2::new(415.0, 300.0), 30, 60, CollisionTier::Fine);
        let index = index_with(&[("Crate", &crate_body), ("Player", &body)]);
        let input = MovementInput {
            right: true,
            down: true,
            ..MovementInput::default()
        };

        let moved = player.step("Player", &mut body, input, &index);
        assert_eq!(moved, Vec2::new(5.0, 5.0));
        assert_eq!(body.position(), Vec2::new(400.0, 300.0));
        assert_eq!(body.depth(), start_depth);
    }

    #[test]
    fn coarse_entity_blocks_only_on_same_layer() {
        let mut player = player();
        let mut body = body_at(Vec2::new(400.0, 300.0), 30, 60, CollisionTier::Fine);
        let wall = body_at(Vec2::new(400.0, 330.0), 200, 60, CollisionTier::Coarse);
        let index = index_with(&[("Wall", &wall)]);
        let down = MovementInput {
            down: true,
            ..MovementInput::default()
        };

        // Depth 25 to 26 while the wall sits at 31: passes.
        player.step("Player", &mut body, down, &index);
        assert_eq!(body.position(), Vec2::new(400.0, 305.0));

        let mut level_body = body_at(Vec2::new(400.0, 325.0), 30, 60, CollisionTier::Fine);
        player.step("Player", &mut level_body, down, &index);
        assert_eq!(level_body.position(), Vec2::new(400.0, 325.0));
    }

    #[test]
    fn self_entry_never_blocks() {
        let mut player = player();
        let mut body = body_at(Vec2::new(400.0, 300.0), 30, 60, CollisionTier::Fine);
        let index = index_with(&[("Player", &body.clone())]);
        let input = MovementInput {
            left: true,
            ..MovementInput::default()
        };
        player.step("Player", &mut body, input, &index);
        assert_eq!(body.position(), Vec2::new(395.0, 300.0));
    }

    #[test]
    fn movement_disallowed_yields_zero_and_keeps_camera() {
        let mut player = player();
        player.set_movement_allowed(false);
        let mut body = body_at(Vec2::new(1000.0, 500.0), 30, 60, CollisionTier::Fine);
        let input = MovementInput {
            right: true,
            ..MovementInput::default()
        };
        assert_eq!(
            player.step("Player", &mut body, input, &CollisionIndex::default()),
            Vec2::ZERO
        );
        assert_eq!(body.position(), Vec2::new(1000.0, 500.0));
        assert_eq!(player.camera(), Vec2::ZERO);
    }

    #[test]
    fn camera_locks_near_edges_and_pans_between() {
        let follow = CameraFollow::default();
        assert_eq!(follow.translation_for(Vec2::new(300.0, 250.0)), Vec2::ZERO);
        assert_eq!(
            follow.translation_for(Vec2::new(1000.0, 500.0)),
            Vec2::new(-600.0, -200.0)
        );
        assert_eq!(
            follow.translation_for(Vec2::new(2800.0, 900.0)),
            Vec2::new(-2200.0, -400.0)
        );
    }
}
