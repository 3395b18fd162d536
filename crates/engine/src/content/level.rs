use std::collections::{BTreeMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::sim::{
    CollisionTier, PlayerConfig, PropRole, SpriteExtent, SpriteSet, Vec2, MAX_FIXED_DEPTH,
};
use crate::sprite_keys::{validate_sprite_key, SpriteKeyError};

/// Declarative description of one playable level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelDef {
    pub name: String,
    #[serde(default)]
    pub player_config: PlayerConfig,
    pub sprite_sets: BTreeMap<String, SpriteSet>,
    pub player: PlayerDef,
    #[serde(default)]
    pub mothers: Vec<MotherDef>,
    #[serde(default)]
    pub guards: Vec<GuardDef>,
    #[serde(default)]
    pub props: Vec<PropDef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtentDef {
    pub width: i32,
    pub height: i32,
    /// Anchor offset; defaults to the integer half size.
    #[serde(default)]
    pub center: Option<Vec2>,
}

impl ExtentDef {
    pub fn to_extent(self) -> SpriteExtent {
        match self.center {
            Some(center) => SpriteExtent::with_center(self.width, self.height, center),
            None => SpriteExtent::new(self.width, self.height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerDef {
    pub name: String,
    pub position: Vec2,
    pub extent: ExtentDef,
    pub sprite_set: String,
    #[serde(default)]
    pub tier: CollisionTier,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotherDef {
    pub name: String,
    pub position: Vec2,
    pub extent: ExtentDef,
    pub speed: Vec2,
    pub respawn_ticks: u32,
    pub sprite_set: String,
    pub empty_sprite_set: String,
    #[serde(default)]
    pub path: Vec<Vec2>,
    #[serde(default = "default_movable")]
    pub movable: bool,
    #[serde(default)]
    pub tier: CollisionTier,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuardDef {
    pub name: String,
    pub position: Vec2,
    pub extent: ExtentDef,
    pub speed: Vec2,
    #[serde(default)]
    pub detection_radius: u32,
    pub sprite_set: String,
    #[serde(default)]
    pub path: Vec<Vec2>,
    #[serde(default = "default_movable")]
    pub movable: bool,
    #[serde(default)]
    pub tier: CollisionTier,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropDef {
    pub name: String,
    pub position: Vec2,
    pub extent: ExtentDef,
    #[serde(default)]
    pub collidable: bool,
    #[serde(default)]
    pub tier: CollisionTier,
    /// Background decor only; everything else layers by Y.
    #[serde(default)]
    pub fixed_depth: Option<i32>,
    #[serde(default)]
    pub role: PropRole,
    #[serde(default)]
    pub sprite: Option<String>,
}

fn default_movable() -> bool {
    true
}

fn check_sprite_key(owner: &str, key: &str) -> Result<(), LevelError> {
    validate_sprite_key(key).map_err(|source| LevelError::InvalidSpriteKey {
        owner: owner.to_string(),
        key: key.to_string(),
        source,
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("entity name '{name}' is used more than once")]
    DuplicateName { name: String },
    #[error("entity '{entity}' references unknown sprite set '{sprite_set}'")]
    UnknownSpriteSet { entity: String, sprite_set: String },
    #[error("sprite key '{key}' used by '{owner}' is invalid: {source}")]
    InvalidSpriteKey {
        owner: String,
        key: String,
        #[source]
        source: SpriteKeyError,
    },
    #[error("sprite set '{sprite_set}' has a zero cell size")]
    EmptySpriteCell { sprite_set: String },
    #[error("entity '{entity}' has non-positive extent {width}x{height}")]
    InvalidExtent {
        entity: String,
        width: i32,
        height: i32,
    },
    #[error("entity '{entity}' has fixed depth {depth}; decor depths must be 0..={max}")]
    FixedDepthOutOfRange { entity: String, depth: i32, max: i32 },
    #[error("level has more than one win trigger: '{first}' and '{second}'")]
    MultipleWinTriggers { first: String, second: String },
}

impl LevelDef {
    pub fn validate(&self) -> Result<(), LevelError> {
        for (name, set) in &self.sprite_sets {
            if set.cell_width == 0 || set.cell_height == 0 {
                return Err(LevelError::EmptySpriteCell {
                    sprite_set: name.clone(),
                });
            }
            for sheet in &set.sheets {
                check_sprite_key(name, sheet)?;
            }
        }

        let mut names = HashSet::new();
        let mut check_entity = |name: &str, extent: &ExtentDef| {
            if !names.insert(name.to_string()) {
                return Err(LevelError::DuplicateName {
                    name: name.to_string(),
                });
            }
            if extent.width <= 0 || extent.height <= 0 {
                return Err(LevelError::InvalidExtent {
                    entity: name.to_string(),
                    width: extent.width,
                    height: extent.height,
                });
            }
            Ok(())
        };

        check_entity(&self.player.name, &self.player.extent)?;
        self.require_sprite_set(&self.player.name, &self.player.sprite_set)?;

        for mother in &self.mothers {
            check_entity(&mother.name, &mother.extent)?;
            self.require_sprite_set(&mother.name, &mother.sprite_set)?;
            self.require_sprite_set(&mother.name, &mother.empty_sprite_set)?;
        }

        for guard in &self.guards {
            check_entity(&guard.name, &guard.extent)?;
            self.require_sprite_set(&guard.name, &guard.sprite_set)?;
        }

        let mut win_trigger: Option<&str> = None;
        for prop in &self.props {
            check_entity(&prop.name, &prop.extent)?;
            if let Some(sprite) = &prop.sprite {
                check_sprite_key(&prop.name, sprite)?;
            }
            if let Some(depth) = prop.fixed_depth {
                if !(0..=MAX_FIXED_DEPTH).contains(&depth) {
                    return Err(LevelError::FixedDepthOutOfRange {
                        entity: prop.name.clone(),
                        depth,
                        max: MAX_FIXED_DEPTH,
                    });
                }
            }
            if prop.role == PropRole::WinTrigger {
                if let Some(first) = win_trigger {
                    return Err(LevelError::MultipleWinTriggers {
                        first: first.to_string(),
                        second: prop.name.clone(),
                    });
                }
                win_trigger = Some(prop.name.as_str());
            }
        }

        Ok(())
    }

    pub fn has_win_trigger(&self) -> bool {
        self.props
            .iter()
            .any(|prop| prop.role == PropRole::WinTrigger)
    }

    fn require_sprite_set(&self, entity: &str, sprite_set: &str) -> Result<(), LevelError> {
        if self.sprite_sets.contains_key(sprite_set) {
            Ok(())
        } else {
            Err(LevelError::UnknownSpriteSet {
                entity: entity.to_string(),
                sprite_set: sprite_set.to_string(),
            })
        }
    }
}
