use std::sync::Arc;

use super::collision::{CollisionIndex, IndexedCollider};
use super::entity::{Body, Entity, EntityId, EntityIdAllocator, EntityKind};
use super::geometry::Vec2;
use super::player::{MovementInput, PlayerActor};

/// Read-only view of cross-entity state, captured before any entity updates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorldSnapshot {
    pub player_position: Option<Vec2>,
    pub player_hidden: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub movement: MovementInput,
}

/// Full-screen state the renderer draws over the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    Title,
    Paused,
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneVisualState {
    pub banner: Option<Banner>,
}

#[derive(Debug, Default)]
pub struct SceneWorld {
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    player: Option<EntityId>,
    collision_index: CollisionIndex,
    visual_state: SceneVisualState,
    tick: u64,
}

impl SceneWorld {
    /// Adds an entity. The first `Player` spawned becomes the world's player.
    pub fn spawn(&mut self, name: impl Into<Arc<str>>, body: Body, kind: EntityKind) -> EntityId {
        let id = self.allocator.allocate();
        if matches!(kind, EntityKind::Player(_)) && self.player.is_none() {
            self.player = Some(id);
        }
        self.entities.push(Entity {
            id,
            name: name.into(),
            body,
            kind,
            visible: true,
            shaded: false,
        });
        id
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.player = None;
        self.collision_index.clear();
        self.visual_state = SceneVisualState::default();
        self.tick = 0;
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| &*entity.name == name)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player_entity(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.find_entity(id))
    }

    pub fn player(&self) -> Option<&PlayerActor> {
        self.player_entity().and_then(Entity::as_player)
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerActor> {
        let id = self.player?;
        self.find_entity_mut(id).and_then(Entity::as_player_mut)
    }

    /// Camera translation to apply when drawing; zero without a player.
    pub fn camera_translation(&self) -> Vec2 {
        self.player().map(PlayerActor::camera).unwrap_or_default()
    }

    pub fn visual_state(&self) -> &SceneVisualState {
        &self.visual_state
    }

    pub fn set_banner(&mut self, banner: Option<Banner>) {
        self.visual_state.banner = banner;
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn collision_index(&self) -> &CollisionIndex {
        &self.collision_index
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        match self.player_entity() {
            Some(entity) => WorldSnapshot {
                player_position: Some(entity.body.position()),
                player_hidden: entity.as_player().is_some_and(PlayerActor::is_hidden),
            },
            None => WorldSnapshot::default(),
        }
    }

    fn rebuild_collision_index(&mut self) {
        self.collision_index.clear();
        for entity in &self.entities {
            if !entity.body.collidable {
                continue;
            }
            self.collision_index.insert(
                entity.body.tier,
                IndexedCollider {
                    id: entity.id,
                    name: Arc::clone(&entity.name),
                    collider: entity.body.collider(),
                },
            );
        }
    }

    /// Runs one simulation tick over every entity. Cross-entity reads go
    /// through a snapshot and a collision index taken from the state at the
    /// end of the previous tick.
    pub fn update(&mut self, input: &TickInput) {
        let snapshot = self.snapshot();
        self.rebuild_collision_index();

        let index = &self.collision_index;
        for entity in &mut self.entities {
            let Entity {
                name, body, kind, ..
            } = entity;
            match kind {
                EntityKind::Static(_) => {}
                EntityKind::Animated(animation) => animation.update(Vec2::ZERO),
                EntityKind::Player(player) => {
                    let movement = player.step(name, body, input.movement, index);
                    player.animation.update(movement);
                }
                EntityKind::Mother(mother) => mother.update(body, &snapshot),
                EntityKind::Guard(guard) => guard.update(body, &snapshot),
            }
        }

        self.tick = self.tick.saturating_add(1);
    }

    /// Visible entity indices back to front: ascending depth, spawn order on
    /// ties.
    pub fn collect_draw_order(&self, out: &mut Vec<usize>) {
        out.clear();
        out.extend(
            self.entities
                .iter()
                .enumerate()
                .filter(|(_, entity)| entity.visible)
                .map(|(index, _)| index),
        );
        out.sort_by(|left, right| {
            let left_entity = &self.entities[*left];
            let right_entity = &self.entities[*right];
            left_entity
                .body
                .depth()
                .cmp(&right_entity.body.depth())
                .then_with(|| left_entity.id.cmp(&right_entity.id))
        });
    }
}
