struct HeistScene {
    level: LevelDef,
    rules: HeistRules,
    handles: LevelHandles,
    phase: GamePhase,
    pause_cooldown: u32,
    decoy: DecoyState,
    systems: HeistSystemsHost,
    events: Vec<HeistEvent>,
}

impl HeistScene {
    fn new(file: LevelFile) -> Self {
        Self {
            level: file.level,
            rules: file.rules,
            handles: LevelHandles::default(),
            phase: GamePhase::Title,
            pause_cooldown: 0,
            decoy: DecoyState::default(),
            systems: HeistSystemsHost::default(),
            events: Vec::new(),
        }
    }

    fn start_level(&mut self, world: &mut SceneWorld) {
        self.handles = match self.level.build_world(world) {
            Ok(handles) => handles,
            Err(error) => {
                error!(level = %self.level.name, error = %error, "level_build_failed");
                world.clear();
                LevelHandles::default()
            }
        };
        self.phase = GamePhase::Title;
        self.pause_cooldown = 0;
        self.decoy = DecoyState::default();
        self.events.clear();
        world.set_banner(self.phase.banner());

        info!(
            level = %self.level.name,
            entity_count = world.entity_count(),
            mothers = self.handles.mothers.len(),
            guards = self.handles.guards.len(),
            "scene_loaded"
        );
    }

    fn set_phase(&mut self, world: &mut SceneWorld, next: GamePhase) {
        if self.phase == next {
            return;
        }
        info!(
            from = self.phase.as_token(),
            to = next.as_token(),
            tick = world.tick(),
            "phase_changed"
        );
        self.phase = next;
        world.set_banner(next.banner());
    }

    fn begin_play(&mut self, world: &mut SceneWorld) {
        if let Some(player) = world.player_mut() {
            player.set_movement_allowed(true);
        }
        self.set_phase(world, GamePhase::Play);
    }

    /// Ends the round: the player freezes and the camera snaps home.
    fn finish(&mut self, world: &mut SceneWorld, outcome: GamePhase) {
        if let Some(player) = world.player_mut() {
            player.set_movement_allowed(false);
            player.reset_camera();
        }
        self.set_phase(world, outcome);
    }

    /// Pause toggles on a held or tapped key, then ignores the key until the
    /// debounce window has passed.
    fn handle_pause(&mut self, input: &InputSnapshot, world: &mut SceneWorld) {
        let requested = input.was_pressed(InputAction::Pause) || input.is_down(InputAction::Pause);
        if requested && self.pause_cooldown == 0 {
            let next = match self.phase {
                GamePhase::Play => Some(GamePhase::Paused),
                GamePhase::Paused => Some(GamePhase::Play),
                GamePhase::Title | GamePhase::Won | GamePhase::Lost => None,
            };
            if let Some(next) = next {
                self.set_phase(world, next);
                self.pause_cooldown = self.rules.pause_debounce_ticks;
            }
        }
        self.pause_cooldown = self.pause_cooldown.saturating_sub(1);
    }

    fn apply_events(&mut self, world: &mut SceneWorld) {
        let mut events = std::mem::take(&mut self.events);
        for event in events.drain(..) {
            match event {
                HeistEvent::ReachedExit { candy_count } => {
                    if self.phase == GamePhase::Play {
                        info!(candy_count, "heist_won");
                        self.finish(world, GamePhase::Won);
                    }
                }
                HeistEvent::CandyStolen {
                    mother,
                    candy_count,
                } => {
                    info!(
                        mother = entity_name(world, mother),
                        candy_count,
                        guard_radius = self.rules.radius_per_candy.saturating_mul(candy_count),
                        "candy_stolen"
                    );
                }
                HeistEvent::Caught { guard } => {
                    if self.phase == GamePhase::Play {
                        info!(guard = entity_name(world, guard), "player_caught");
                        self.finish(world, GamePhase::Lost);
                    }
                }
                HeistEvent::DecoyDropped {
                    position,
                    candy_count,
                } => {
                    info!(
                        x = position.x,
                        y = position.y,
                        candy_count,
                        "decoy_dropped"
                    );
                }
            }
        }
        self.events = events;
    }
}

impl Scene for HeistScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.start_level(world);
    }

    fn update(
        &mut self,
        _fixed_dt_seconds: f32,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand {
        match self.phase {
            GamePhase::Title if input.was_pressed(InputAction::Confirm) => {
                self.begin_play(world);
            }
            phase if phase.is_finished() && input.was_pressed(InputAction::Confirm) => {
                info!(level = %self.level.name, "level_restarted");
                self.start_level(world);
                return SceneCommand::None;
            }
            _ => {}
        }

        self.handle_pause(input, world);
        if self.phase != GamePhase::Play {
            return SceneCommand::None;
        }

        let mut context = HeistSystemContext {
            world: &mut *world,
            handles: &self.handles,
            rules: &self.rules,
            input,
            decoy: &mut self.decoy,
            events: &mut self.events,
        };
        self.systems.run_once_per_tick(&mut context);
        debug!(
            tick = world.tick(),
            systems = ?self.systems.last_tick_order(),
            events = self.events.len(),
            "heist_systems_ran"
        );
        self.apply_events(world);

        if self.phase == GamePhase::Play {
            world.update(&TickInput {
                movement: input.movement(),
            });
        }

        SceneCommand::None
    }

    fn unload(&mut self, world: &mut SceneWorld) {
        self.handles = LevelHandles::default();
        self.events.clear();
        world.set_banner(None);
    }

    fn window_title(&self, world: &SceneWorld) -> Option<String> {
        let candy_count = world.player().map_or(0, PlayerActor::candy_count);
        Some(format!(
            "{WINDOW_TITLE} | candy {candy_count}/{} | {}",
            self.rules.candy_to_win,
            self.phase.as_token()
        ))
    }
}

fn entity_name(world: &SceneWorld, id: EntityId) -> &str {
    world
        .find_entity(id)
        .map(|entity| &*entity.name)
        .unwrap_or("unknown")
}
