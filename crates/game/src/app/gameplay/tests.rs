    use super::*;
    use serde_json::json;

    const TICK: f32 = 1.0 / 60.0;

    fn walker(prefix: &str) -> serde_json::Value {
        let slots = [
            "down_still",
            "down_moving",
            "left_still",
            "left_moving",
            "right_still",
            "right_moving",
            "up_still",
            "up_moving",
        ];
        json!({
            "sheets": slots.map(|slot| format!("{prefix}/{slot}")),
            "frame_counts": [1, 3, 1, 3, 1, 3, 1, 3],
            "cell_width": 30,
            "cell_height": 60
        })
    }

    fn test_level_file() -> LevelFile {
        let extent = json!({ "width": 30, "height": 60 });
        serde_json::from_value(json!({
            "level": {
                "name": "test_mall",
                "sprite_sets": {
                    "player": walker("player"),
                    "mom": walker("mom"),
                    "mom_empty": walker("mom_empty"),
                    "guard": walker("guard")
                },
                "player": {
                    "name": "Player",
                    "position": { "x": 400.0, "y": 300.0 },
                    "extent": extent,
                    "sprite_set": "player",
                    "tier": 2
                },
                "mothers": [{
                    "name": "Mom",
                    "position": { "x": 1000.0, "y": 600.0 },
                    "extent": extent,
                    "speed": { "x": 3.0, "y": 3.0 },
                    "respawn_ticks": 150,
                    "sprite_set": "mom",
                    "empty_sprite_set": "mom_empty"
                }],
                "guards": [{
                    "name": "Cop",
                    "position": { "x": 1500.0, "y": 600.0 },
                    "extent": extent,
                    "speed": { "x": 4.0, "y": 4.0 },
                    "sprite_set": "guard",
                    "tier": 2
                }],
                "props": [
                    {
                        "name": "Floor",
                        "position": { "x": 1500.0, "y": 500.0 },
                        "extent": { "width": 3000, "height": 1000 },
                        "fixed_depth": 0,
                        "role": "decor"
                    },
                    {
                        "name": "Bush",
                        "position": { "x": 700.0, "y": 450.0 },
                        "extent": { "width": 60, "height": 60 },
                        "collidable": true,
                        "role": "foliage"
                    },
                    {
                        "name": "Exit",
                        "position": { "x": 2640.0, "y": 200.0 },
                        "extent": { "width": 80, "height": 60 },
                        "role": "win_trigger"
                    }
                ]
            }
        }))
        .expect("test level")
    }

    fn loaded_scene() -> (HeistScene, SceneWorld) {
        let mut scene = HeistScene::new(test_level_file());
        let mut world = SceneWorld::default();
        scene.load(&mut world);
        (scene, world)
    }

    fn playing_scene() -> (HeistScene, SceneWorld) {
        let (mut scene, mut world) = loaded_scene();
        confirm(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Play);
        (scene, world)
    }

    fn confirm(scene: &mut HeistScene, world: &mut SceneWorld) {
        let input = InputSnapshot::empty().with_action_pressed(InputAction::Confirm);
        scene.update(TICK, &input, world);
    }

    fn idle(scene: &mut HeistScene, world: &mut SceneWorld) {
        scene.update(TICK, &InputSnapshot::empty(), world);
    }

    fn entity_id(world: &SceneWorld, name: &str) -> EntityId {
        world.find_by_name(name).expect(name).id
    }

    fn place(world: &mut SceneWorld, name: &str, position: Vec2) {
        let id = entity_id(world, name);
        world
            .find_entity_mut(id)
            .expect(name)
            .body
            .set_position(position);
    }

    fn guard(world: &SceneWorld) -> &GuardNpc {
        world
            .find_by_name("Cop")
            .and_then(Entity::as_guard)
            .expect("guard")
    }

    fn set_cop_radius(world: &mut SceneWorld, radius: u32) {
        let id = entity_id(world, "Cop");
        set_guard_radius(world, &[id], radius);
    }

    fn candy(world: &SceneWorld) -> u32 {
        world.player().map_or(0, PlayerActor::candy_count)
    }

    #[test]
    fn title_waits_for_confirm_then_frees_player() {
        let (mut scene, mut world) = loaded_scene();
        assert_eq!(scene.phase, GamePhase::Title);
        assert_eq!(world.visual_state().banner, Some(Banner::Title));

        idle(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Title);
        assert!(!world.player().expect("player").movement_allowed());
        assert_eq!(world.tick(), 0);

        confirm(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Play);
        assert_eq!(world.visual_state().banner, None);
        assert!(world.player().expect("player").movement_allowed());
        assert_eq!(world.tick(), 1);
    }

    #[test]
    fn player_walks_once_play_starts() {
        let (mut scene, mut world) = playing_scene();
        let input = InputSnapshot::empty().with_action_down(InputAction::MoveRight, true);

        scene.update(TICK, &input, &mut world);

        let player = world.player_entity().expect("player");
        assert_eq!(player.body.position(), Vec2::new(405.0, 300.0));
    }

    #[test]
    fn theft_moves_candy_and_scales_guard_radius() {
        let (mut scene, mut world) = playing_scene();
        place(&mut world, "Mom", Vec2::new(400.0, 320.0));

        idle(&mut scene, &mut world);

        assert_eq!(candy(&world), 1);
        assert_eq!(guard(&world).detection_radius(), 50);
        let mother = world
            .find_by_name("Mom")
            .and_then(Entity::as_mother)
            .expect("mother");
        assert!(!mother.has_candy());
        // Set to 150 by the theft, then counted down once by the world tick.
        assert_eq!(mother.respawn_timer(), 149);
        assert!(mother.animation().sheet().starts_with("mom_empty/"));

        idle(&mut scene, &mut world);
        assert_eq!(candy(&world), 1);
    }

    #[test]
    fn chasing_guard_catches_visible_player() {
        let (mut scene, mut world) = playing_scene();
        place(&mut world, "Cop", Vec2::new(420.0, 300.0));

        idle(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Play);
        assert!(!guard(&world).is_chasing());

        set_cop_radius(&mut world, 100);
        idle(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Play);
        assert!(guard(&world).is_chasing());

        idle(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Lost);
        assert_eq!(world.visual_state().banner, Some(Banner::Lost));
        let player = world.player().expect("player");
        assert!(!player.movement_allowed());
        assert_eq!(player.camera(), Vec2::ZERO);
    }

    #[test]
    fn foliage_hides_and_shades_the_player() {
        let (mut scene, mut world) = playing_scene();
        place(&mut world, "Bush", Vec2::new(400.0, 320.0));
        place(&mut world, "Cop", Vec2::new(420.0, 300.0));
        set_cop_radius(&mut world, 100);

        for _ in 0..5 {
            idle(&mut scene, &mut world);
        }

        assert_eq!(scene.phase, GamePhase::Play);
        assert!(!guard(&world).is_chasing());
        let player = world.player_entity().expect("player");
        assert!(player.shaded);
        assert!(player.as_player().is_some_and(PlayerActor::is_hidden));

        place(&mut world, "Bush", Vec2::new(700.0, 450.0));
        idle(&mut scene, &mut world);
        let player = world.player_entity().expect("player");
        assert!(!player.shaded);
    }

    #[test]
    fn pause_toggles_with_debounce() {
        let (mut scene, mut world) = playing_scene();
        let ticks_before = world.tick();
        let held = InputSnapshot::empty().with_action_down(InputAction::Pause, true);

        scene.update(TICK, &held, &mut world);
        assert_eq!(scene.phase, GamePhase::Paused);
        assert_eq!(world.visual_state().banner, Some(Banner::Paused));

        for _ in 1..15 {
            scene.update(TICK, &held, &mut world);
            assert_eq!(scene.phase, GamePhase::Paused);
        }
        assert_eq!(world.tick(), ticks_before);

        scene.update(TICK, &held, &mut world);
        assert_eq!(scene.phase, GamePhase::Play);
        assert_eq!(world.tick(), ticks_before + 1);
    }

    #[test]
    fn pause_is_ignored_on_the_title_screen() {
        let (mut scene, mut world) = loaded_scene();
        let input = InputSnapshot::empty().with_action_pressed(InputAction::Pause);

        scene.update(TICK, &input, &mut world);

        assert_eq!(scene.phase, GamePhase::Title);
    }

    #[test]
    fn decoy_spends_candy_and_halves_nearby_guards() {
        let (mut scene, mut world) = playing_scene();
        world.player_mut().expect("player").set_candy_count(2);
        place(&mut world, "Cop", Vec2::new(600.0, 300.0));
        set_cop_radius(&mut world, 100);
        let decoy = InputSnapshot::empty().with_action_down(InputAction::Decoy, true);

        scene.update(TICK, &decoy, &mut world);
        assert_eq!(candy(&world), 1);
        assert_eq!(scene.decoy.position, Some(Vec2::new(400.0, 300.0)));
        assert_eq!(guard(&world).detection_radius(), 100);

        scene.update(TICK, &decoy, &mut world);
        assert_eq!(guard(&world).detection_radius(), 50);
        assert_eq!(candy(&world), 1, "cooldown blocks a second drop");

        idle(&mut scene, &mut world);
        assert_eq!(guard(&world).detection_radius(), 25);
    }

    #[test]
    fn decoy_needs_candy() {
        let (mut scene, mut world) = playing_scene();
        let decoy = InputSnapshot::empty().with_action_down(InputAction::Decoy, true);

        scene.update(TICK, &decoy, &mut world);

        assert!(!scene.decoy.is_active());
        assert!(scene.decoy.is_ready());
    }

    #[test]
    fn decoy_expires_before_it_is_ready_again() {
        let rules = DecoyRules::default();
        let mut decoy = DecoyState::default();
        decoy.drop_at(Vec2::new(10.0, 10.0), &rules);

        for _ in 0..59 {
            decoy.tick();
        }
        assert!(decoy.is_active());
        decoy.tick();
        assert!(!decoy.is_active());
        assert!(!decoy.is_ready());

        for _ in 60..450 {
            decoy.tick();
        }
        assert!(decoy.is_ready());
    }

    #[test]
    fn full_bag_at_exit_wins() {
        let (mut scene, mut world) = playing_scene();
        world.player_mut().expect("player").set_candy_count(5);
        place(&mut world, "Player", Vec2::new(2630.0, 200.0));

        idle(&mut scene, &mut world);

        assert_eq!(scene.phase, GamePhase::Won);
        assert_eq!(world.visual_state().banner, Some(Banner::Won));
        let player = world.player().expect("player");
        assert!(!player.movement_allowed());
        assert_eq!(player.camera(), Vec2::ZERO);
    }

    #[test]
    fn exit_ignores_a_light_bag() {
        let (mut scene, mut world) = playing_scene();
        world.player_mut().expect("player").set_candy_count(4);
        place(&mut world, "Player", Vec2::new(2630.0, 200.0));

        idle(&mut scene, &mut world);

        assert_eq!(scene.phase, GamePhase::Play);
    }

    #[test]
    fn confirm_after_round_restarts_level() {
        let (mut scene, mut world) = playing_scene();
        world.player_mut().expect("player").set_candy_count(5);
        place(&mut world, "Player", Vec2::new(2630.0, 200.0));
        idle(&mut scene, &mut world);
        assert_eq!(scene.phase, GamePhase::Won);

        confirm(&mut scene, &mut world);

        assert_eq!(scene.phase, GamePhase::Title);
        assert_eq!(world.visual_state().banner, Some(Banner::Title));
        assert_eq!(candy(&world), 0);
        let player = world.player_entity().expect("player");
        assert_eq!(player.body.position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn systems_run_in_fixed_order() {
        let (scene, _world) = playing_scene();

        assert_eq!(scene.systems.last_tick_order(), HEIST_SYSTEM_ORDER.as_slice());
    }

    #[test]
    fn window_title_reports_candy_and_phase() {
        let (scene, mut world) = playing_scene();
        world.player_mut().expect("player").set_candy_count(3);

        assert_eq!(
            scene.window_title(&world).as_deref(),
            Some("Grand Theft Candy | candy 3/5 | play")
        );
    }

    #[test]
    fn shipped_mall_runs_patrols() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../assets/levels/mall.json");
        let file = crate::app::level_loader::load_level_file(&path).expect("mall");
        let mut scene = HeistScene::new(file);
        let mut world = SceneWorld::default();
        scene.load(&mut world);
        let start = world.find_by_name("Guard0").expect("guard").body.position();

        confirm(&mut scene, &mut world);
        for _ in 0..10 {
            idle(&mut scene, &mut world);
        }

        assert_eq!(scene.phase, GamePhase::Play);
        assert_ne!(
            world.find_by_name("Guard0").expect("guard").body.position(),
            start
        );
        assert_eq!(scene.handles.mothers.len(), 5);
        assert_eq!(scene.handles.foliage.len(), 8);
    }
