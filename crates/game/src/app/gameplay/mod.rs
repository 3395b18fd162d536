use candy_engine::sim::Collider;
use candy_engine::{
    Banner, Entity, EntityId, GuardNpc, InputAction, InputSnapshot, LevelDef, LevelHandles,
    MotherNpc, PlayerActor, Scene, SceneCommand, SceneWorld, TickInput, Vec2,
};
use serde::Deserialize;
use tracing::{debug, error, info};

const WINDOW_TITLE: &str = "Grand Theft Candy";
const DEFAULT_RADIUS_PER_CANDY: u32 = 50;
const DEFAULT_CANDY_TO_WIN: u32 = 5;
const DEFAULT_PAUSE_DEBOUNCE_TICKS: u32 = 15;
const DEFAULT_DECOY_EFFECT_RADIUS: f32 = 250.0;
const DEFAULT_DECOY_ACTIVE_TICKS: u32 = 60;
const DEFAULT_DECOY_COOLDOWN_TICKS: u32 = 450;

include!("types.rs");
include!("systems.rs");
include!("scene_impl.rs");

pub(crate) fn build_scene(file: LevelFile) -> Box<dyn Scene> {
    Box::new(HeistScene::new(file))
}
