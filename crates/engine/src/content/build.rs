use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::sim::{
    AnimationState, Body, DepthMode, EntityId, EntityKind, GuardNpc, MotherNpc, PlayerActor,
    PropRole, SceneWorld, SpriteSet, StaticProp, WaypointMover,
};

use super::level::{LevelDef, LevelError};

/// Ids of the entities gameplay rules need to find again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelHandles {
    pub player: Option<EntityId>,
    pub mothers: Vec<EntityId>,
    pub guards: Vec<EntityId>,
    pub foliage: Vec<EntityId>,
    pub win_trigger: Option<EntityId>,
}

impl LevelDef {
    /// Validates the level, clears `world` and spawns every entity into it.
    pub fn build_world(&self, world: &mut SceneWorld) -> Result<LevelHandles, LevelError> {
        self.validate()?;
        world.clear();

        let sprite_sets: HashMap<&str, Arc<SpriteSet>> = self
            .sprite_sets
            .iter()
            .map(|(name, set)| (name.as_str(), Arc::new(set.clone())))
            .collect();
        let sprites = |entity: &str, key: &str| -> Result<Arc<SpriteSet>, LevelError> {
            sprite_sets
                .get(key)
                .cloned()
                .ok_or_else(|| LevelError::UnknownSpriteSet {
                    entity: entity.to_string(),
                    sprite_set: key.to_string(),
                })
        };

        let mut handles = LevelHandles::default();

        for prop in &self.props {
            let depth_mode = prop
                .fixed_depth
                .map(DepthMode::Fixed)
                .unwrap_or(DepthMode::Dynamic);
            let body = Body::new(
                prop.position,
                prop.extent.to_extent(),
                depth_mode,
                prop.collidable,
                prop.tier,
            );
            let id = world.spawn(
                prop.name.as_str(),
                body,
                EntityKind::Static(StaticProp {
                    role: prop.role,
                    sprite: prop.sprite.clone(),
                }),
            );
            match prop.role {
                PropRole::Foliage => handles.foliage.push(id),
                PropRole::WinTrigger => handles.win_trigger = Some(id),
                PropRole::Decor | PropRole::Obstacle => {}
            }
        }

        let player = &self.player;
        let actor = PlayerActor::new(
            AnimationState::new(sprites(&player.name, &player.sprite_set)?),
            self.player_config,
        );
        handles.player = Some(world.spawn(
            player.name.as_str(),
            Body::new(
                player.position,
                player.extent.to_extent(),
                DepthMode::Dynamic,
                true,
                player.tier,
            ),
            EntityKind::Player(actor),
        ));

        for mother in &self.mothers {
            let npc = MotherNpc::new(
                sprites(&mother.name, &mother.sprite_set)?,
                sprites(&mother.name, &mother.empty_sprite_set)?,
                WaypointMover::new(mother.speed, mother.path.clone(), mother.movable),
                mother.respawn_ticks,
            );
            let id = world.spawn(
                mother.name.as_str(),
                Body::new(
                    mother.position,
                    mother.extent.to_extent(),
                    DepthMode::Dynamic,
                    true,
                    mother.tier,
                ),
                EntityKind::Mother(npc),
            );
            handles.mothers.push(id);
        }

        for guard in &self.guards {
            let npc = GuardNpc::new(
                sprites(&guard.name, &guard.sprite_set)?,
                WaypointMover::new(guard.speed, guard.path.clone(), guard.movable),
                guard.detection_radius,
            );
            let id = world.spawn(
                guard.name.as_str(),
                Body::new(
                    guard.position,
                    guard.extent.to_extent(),
                    DepthMode::Dynamic,
                    true,
                    guard.tier,
                ),
                EntityKind::Guard(npc),
            );
            handles.guards.push(id);
        }

        debug!(
            level = %self.name,
            entity_count = world.entity_count(),
            mothers = handles.mothers.len(),
            guards = handles.guards.len(),
            foliage = handles.foliage.len(),
            "level_built"
        );
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::test_level_json;
    use crate::sim::{CollisionTier, Entity, TickInput, Vec2};

    fn build() -> (SceneWorld, LevelHandles) {
        let level: LevelDef = serde_json::from_str(&test_level_json()).expect("level json");
        let mut world = SceneWorld::default();
        let handles = level.build_world(&mut world).expect("build");
        (world, handles)
    }

    #[test]
    fn build_spawns_every_entity_and_records_handles() {
        let (world, handles) = build();

        assert_eq!(world.entity_count(), 7);
        assert_eq!(handles.player, world.player_id());
        assert_eq!(handles.mothers.len(), 1);
        assert_eq!(handles.guards.len(), 1);
        assert_eq!(handles.foliage.len(), 1);
        assert!(handles.win_trigger.is_some());
    }

    #[test]
    fn decor_keeps_fixed_depth_and_actors_layer_by_y() {
        let (world, _) = build();

        let floor = world.find_by_name("MallFloor").expect("floor");
        assert_eq!(floor.body.depth(), 0);
        assert!(!floor.body.collidable);

        let player = world.player_entity().expect("player");
        assert_eq!(player.body.depth(), 25);
        assert_eq!(player.body.tier, CollisionTier::Fine);
    }

    #[test]
    fn player_starts_frozen_until_released() {
        let (mut world, _) = build();
        let start = world.player_entity().expect("player").body.position();
        let input = TickInput {
            movement: crate::sim::MovementInput {
                right: true,
                ..Default::default()
            },
        };

        world.update(&input);
        assert_eq!(
            world.player_entity().expect("player").body.position(),
            start
        );

        world.player_mut().expect("player").set_movement_allowed(true);
        world.update(&input);
        assert_eq!(
            world.player_entity().expect("player").body.position(),
            start + Vec2::new(5.0, 0.0)
        );
    }

    #[test]
    fn player_near_exit_with_full_bag_overlaps_win_trigger() {
        let (mut world, handles) = build();
        let player_id = handles.player.expect("player");
        {
            let player = world.find_entity_mut(player_id).expect("player");
            player.body.set_position(Vec2::new(2630.0, 200.0));
            player
                .as_player_mut()
                .expect("player actor")
                .set_candy_count(5);
        }

        let player = world.find_entity(player_id).expect("player");
        let exit = world
            .find_entity(handles.win_trigger.expect("trigger"))
            .expect("exit");
        assert_eq!(exit.body.position(), Vec2::new(2640.0, 200.0));
        assert_eq!(player.as_player().map(PlayerActor::candy_count), Some(5));
        assert!(player.body.collider().is_within_bounds(&exit.body.collider()));
    }

    #[test]
    fn mother_starts_with_candy_and_patrols() {
        let (mut world, handles) = build();
        let mother_id = handles.mothers[0];
        let start = world.find_entity(mother_id).expect("mother").body.position();

        world.update(&TickInput::default());

        let mother = world.find_entity(mother_id).expect("mother");
        assert!(mother.as_mother().is_some_and(MotherNpc::has_candy));
        assert_ne!(mother.body.position(), start);
        assert!(mother.animation().is_some());
        assert!(world
            .entities()
            .iter()
            .filter_map(Entity::as_guard)
            .all(|guard| !guard.is_chasing()));
    }

    #[test]
    fn invalid_level_leaves_world_untouched() {
        let mut level: LevelDef = serde_json::from_str(&test_level_json()).expect("level json");
        level.player.sprite_set = "nope".to_string();
        let mut world = SceneWorld::default();
        world.spawn(
            "Keep",
            Body::new(
                Vec2::ZERO,
                crate::sim::SpriteExtent::new(1, 1),
                DepthMode::Dynamic,
                false,
                CollisionTier::None,
            ),
            EntityKind::Static(StaticProp::default()),
        );

        assert!(level.build_world(&mut world).is_err());
        assert_eq!(world.entity_count(), 1);
    }
}
