#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeistSystemId {
    ExitCheck,
    CandyTheft,
    Capture,
    DecoyEffect,
    Hiding,
    DecoyControl,
}

const HEIST_SYSTEM_ORDER: [HeistSystemId; 6] = [
    HeistSystemId::ExitCheck,
    HeistSystemId::CandyTheft,
    HeistSystemId::Capture,
    HeistSystemId::DecoyEffect,
    HeistSystemId::Hiding,
    HeistSystemId::DecoyControl,
];

struct HeistSystemContext<'a> {
    world: &'a mut SceneWorld,
    handles: &'a LevelHandles,
    rules: &'a HeistRules,
    input: &'a InputSnapshot,
    decoy: &'a mut DecoyState,
    events: &'a mut Vec<HeistEvent>,
}

/// Runs the rule checks that sit between input and the world tick.
#[derive(Default)]
struct HeistSystemsHost {
    last_tick_order: Vec<HeistSystemId>,
}

impl HeistSystemsHost {
    fn last_tick_order(&self) -> &[HeistSystemId] {
        &self.last_tick_order
    }

    fn run_once_per_tick(&mut self, context: &mut HeistSystemContext<'_>) {
        self.last_tick_order.clear();
        for system_id in HEIST_SYSTEM_ORDER {
            self.last_tick_order.push(system_id);
            Self::run_system(system_id, context);
        }
    }

    fn run_system(system_id: HeistSystemId, context: &mut HeistSystemContext<'_>) {
        match system_id {
            HeistSystemId::ExitCheck => Self::check_exit(context),
            HeistSystemId::CandyTheft => Self::steal_candy(context),
            HeistSystemId::Capture => Self::check_capture(context),
            HeistSystemId::DecoyEffect => Self::apply_decoy(context),
            HeistSystemId::Hiding => Self::update_hiding(context),
            HeistSystemId::DecoyControl => Self::control_decoy(context),
        }
    }

    fn check_exit(context: &mut HeistSystemContext<'_>) {
        let Some(player) = context.world.player_entity() else {
            return;
        };
        let Some(exit) = context
            .handles
            .win_trigger
            .and_then(|id| context.world.find_entity(id))
        else {
            return;
        };

        let candy_count = player.as_player().map_or(0, PlayerActor::candy_count);
        if candy_count >= context.rules.candy_to_win
            && player.body.collider().is_within_bounds(&exit.body.collider())
        {
            context.events.push(HeistEvent::ReachedExit { candy_count });
        }
    }

    fn steal_candy(context: &mut HeistSystemContext<'_>) {
        let Some(player) = context.world.player_entity().map(|entity| entity.body.collider())
        else {
            return;
        };

        let world = &*context.world;
        let robbed: Vec<EntityId> = context
            .handles
            .mothers
            .iter()
            .copied()
            .filter(|mother_id| {
                world.find_entity(*mother_id).is_some_and(|entity| {
                    entity.as_mother().is_some_and(MotherNpc::has_candy)
                        && is_stacked_with(&player, &entity.body.collider())
                })
            })
            .collect();

        for mother_id in robbed {
            if let Some(mother) = context
                .world
                .find_entity_mut(mother_id)
                .and_then(Entity::as_mother_mut)
            {
                let respawn_ticks = mother.respawn_ticks();
                mother.set_has_candy(false);
                mother.set_respawn_timer(respawn_ticks);
            }

            let Some(actor) = context.world.player_mut() else {
                return;
            };
            let candy_count = actor.candy_count().saturating_add(1);
            actor.set_candy_count(candy_count);

            let radius = context.rules.radius_per_candy.saturating_mul(candy_count);
            set_guard_radius(context.world, &context.handles.guards, radius);
            context.events.push(HeistEvent::CandyStolen {
                mother: mother_id,
                candy_count,
            });
        }
    }

    fn check_capture(context: &mut HeistSystemContext<'_>) {
        let Some(player) = context.world.player_entity() else {
            return;
        };
        if player.as_player().is_some_and(PlayerActor::is_hidden) {
            return;
        }

        let player = player.body.collider();
        let caught_by = context.handles.guards.iter().copied().find(|guard_id| {
            context.world.find_entity(*guard_id).is_some_and(|entity| {
                let guard = entity.body.collider();
                entity.as_guard().is_some_and(GuardNpc::is_chasing)
                    && (player.collides(&guard) || player.collides_horizontally(&guard))
            })
        });

        if let Some(guard) = caught_by {
            context.events.push(HeistEvent::Caught { guard });
        }
    }

    /// Halves the radius of every guard near an active decoy, once per tick.
    fn apply_decoy(context: &mut HeistSystemContext<'_>) {
        let Some(origin) = context.decoy.position else {
            return;
        };
        let effect_radius = context.rules.decoy.effect_radius;

        for guard_id in &context.handles.guards {
            let Some(entity) = context.world.find_entity_mut(*guard_id) else {
                continue;
            };
            if entity.body.position().distance(origin) >= effect_radius {
                continue;
            }
            if let Some(guard) = entity.as_guard_mut() {
                guard.set_detection_radius(guard.detection_radius() / 2);
            }
        }
    }

    fn update_hiding(context: &mut HeistSystemContext<'_>) {
        let Some(player_id) = context.handles.player else {
            return;
        };
        let Some(player) = context.world.find_entity(player_id) else {
            return;
        };

        let collider = player.body.collider();
        let was_hidden = player.as_player().is_some_and(PlayerActor::is_hidden);
        let hidden = context
            .handles
            .foliage
            .iter()
            .filter_map(|id| context.world.find_entity(*id))
            .any(|foliage| is_stacked_with(&collider, &foliage.body.collider()));

        if let Some(player) = context.world.find_entity_mut(player_id) {
            player.shaded = hidden;
            if let Some(actor) = player.as_player_mut() {
                actor.set_hidden(hidden);
            }
        }
        if hidden != was_hidden {
            debug!(hidden, "player_hidden_changed");
        }
    }

    fn control_decoy(context: &mut HeistSystemContext<'_>) {
        if context.input.is_down(InputAction::Decoy) && context.decoy.is_ready() {
            Self::drop_decoy(context);
        }
        context.decoy.tick();
    }

    /// Spends one candy to drop the decoy where the player stands.
    fn drop_decoy(context: &mut HeistSystemContext<'_>) {
        let Some(player) = context
            .handles
            .player
            .and_then(|id| context.world.find_entity_mut(id))
        else {
            return;
        };
        let position = player.body.position();
        let Some(actor) = player.as_player_mut() else {
            return;
        };
        let candy_count = actor.candy_count();
        if candy_count == 0 {
            return;
        }

        actor.set_candy_count(candy_count - 1);
        context.decoy.drop_at(position, &context.rules.decoy);
        context.events.push(HeistEvent::DecoyDropped {
            position,
            candy_count: candy_count - 1,
        });
    }
}

/// `other` sits in the vertical band just above or below `player`.
fn is_stacked_with(player: &Collider, other: &Collider) -> bool {
    player.collides_with_above(other) || player.collides_with_below(other)
}

fn set_guard_radius(world: &mut SceneWorld, guards: &[EntityId], radius: u32) {
    for guard_id in guards {
        if let Some(guard) = world
            .find_entity_mut(*guard_id)
            .and_then(Entity::as_guard_mut)
        {
            guard.set_detection_radius(radius);
        }
    }
}
