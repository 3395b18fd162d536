mod build;
mod level;

pub use build::LevelHandles;
pub use level::{ExtentDef, GuardDef, LevelDef, LevelError, MotherDef, PlayerDef, PropDef};

/// Small level shared by content and gameplay tests.
#[cfg(test)]
pub(crate) fn test_level_json() -> String {
    let walk = |prefix: &str| {
        format!(
            r#"{{
                "sheets": [
                    "{prefix}_down_still", "{prefix}_down_moving",
                    "{prefix}_left_still", "{prefix}_left_moving",
                    "{prefix}_right_still", "{prefix}_right_moving",
                    "{prefix}_up_still", "{prefix}_up_moving"
                ],
                "frame_counts": [1, 7, 1, 7, 1, 7, 1, 7],
                "cell_width": 30,
                "cell_height": 60
            }}"#
        )
    };

    format!(
        r#"{{
            "name": "test_mall",
            "sprite_sets": {{
                "player": {player},
                "mom": {mom},
                "mom_empty": {mom_empty},
                "guard": {guard}
            }},
            "player": {{
                "name": "Player",
                "position": {{ "x": 400.0, "y": 300.0 }},
                "extent": {{ "width": 30, "height": 60 }},
                "sprite_set": "player",
                "tier": 2
            }},
            "mothers": [
                {{
                    "name": "Mom1",
                    "position": {{ "x": 900.0, "y": 600.0 }},
                    "extent": {{ "width": 30, "height": 60 }},
                    "speed": {{ "x": 3.0, "y": 3.0 }},
                    "respawn_ticks": 500,
                    "sprite_set": "mom",
                    "empty_sprite_set": "mom_empty",
                    "path": [{{ "x": 1000.0, "y": 600.0 }}, {{ "x": 1000.0, "y": 800.0 }}]
                }}
            ],
            "guards": [
                {{
                    "name": "Cop1",
                    "position": {{ "x": 1500.0, "y": 400.0 }},
                    "extent": {{ "width": 30, "height": 60 }},
                    "speed": {{ "x": 4.0, "y": 4.0 }},
                    "sprite_set": "guard",
                    "path": [{{ "x": 1500.0, "y": 400.0 }}, {{ "x": 1500.0, "y": 700.0 }}],
                    "tier": 2
                }}
            ],
            "props": [
                {{
                    "name": "MallFloor",
                    "position": {{ "x": 1500.0, "y": 500.0 }},
                    "extent": {{ "width": 3000, "height": 1000 }},
                    "fixed_depth": 0,
                    "role": "decor"
                }},
                {{
                    "name": "Wall",
                    "position": {{ "x": 1500.0, "y": 100.0 }},
                    "extent": {{ "width": 3000, "height": 200 }},
                    "collidable": true,
                    "tier": 1,
                    "fixed_depth": 1
                }},
                {{
                    "name": "Bush1",
                    "position": {{ "x": 700.0, "y": 450.0 }},
                    "extent": {{ "width": 60, "height": 60 }},
                    "collidable": true,
                    "role": "foliage"
                }},
                {{
                    "name": "CandyEntrance",
                    "position": {{ "x": 2640.0, "y": 200.0 }},
                    "extent": {{ "width": 80, "height": 40 }},
                    "role": "win_trigger"
                }}
            ]
        }}"#,
        player = walk("player"),
        mom = walk("mom"),
        mom_empty = walk("mom_empty"),
        guard = walk("guard"),
    )
}
