use std::mem;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::geometry::{Rect, Vec2};

pub const SLOT_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facing {
    Down,
    Left,
    Right,
    Up,
}

impl Facing {
    /// Horizontal wins ties so diagonal movement faces sideways.
    pub fn from_movement(movement: Vec2) -> Facing {
        if movement.x.abs() >= movement.y.abs() {
            if movement.x < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            }
        } else if movement.y < 0.0 {
            Facing::Up
        } else {
            Facing::Down
        }
    }

    const fn index(self) -> usize {
        match self {
            Facing::Down => 0,
            Facing::Left => 1,
            Facing::Right => 2,
            Facing::Up => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Still,
    Moving,
}

/// One of the eight sheets in a sprite set, ordered
/// DownStill, DownMoving, LeftStill, LeftMoving, RightStill, RightMoving,
/// UpStill, UpMoving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationSlot {
    pub facing: Facing,
    pub motion: Motion,
}

impl AnimationSlot {
    pub const fn still(facing: Facing) -> Self {
        Self {
            facing,
            motion: Motion::Still,
        }
    }

    pub const fn moving(facing: Facing) -> Self {
        Self {
            facing,
            motion: Motion::Moving,
        }
    }

    pub const fn index(self) -> usize {
        let motion = match self.motion {
            Motion::Still => 0,
            Motion::Moving => 1,
        };
        self.facing.index() * 2 + motion
    }
}

impl Default for AnimationSlot {
    fn default() -> Self {
        Self::still(Facing::Left)
    }
}

/// Sheet keys and per-slot frame counts for one animated character look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpriteSet {
    pub sheets: [String; SLOT_COUNT],
    /// Highest frame column per slot; the walk cycle visits `0..=count`.
    pub frame_counts: [u32; SLOT_COUNT],
    pub cell_width: u32,
    pub cell_height: u32,
}

impl SpriteSet {
    pub fn sheet(&self, slot: AnimationSlot) -> &str {
        &self.sheets[slot.index()]
    }

    pub fn frame_count(&self, slot: AnimationSlot) -> u32 {
        self.frame_counts[slot.index()]
    }
}

#[derive(Debug, Clone)]
pub struct AnimationState {
    sprites: Arc<SpriteSet>,
    slot: AnimationSlot,
    frame: u32,
    previous_movement: Vec2,
    movement: Vec2,
    skip_next_advance: bool,
}

impl AnimationState {
    pub fn new(sprites: Arc<SpriteSet>) -> Self {
        Self {
            sprites,
            slot: AnimationSlot::default(),
            frame: 0,
            previous_movement: Vec2::ZERO,
            movement: Vec2::ZERO,
            skip_next_advance: false,
        }
    }

    pub fn slot(&self) -> AnimationSlot {
        self.slot
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    pub fn previous_movement(&self) -> Vec2 {
        self.previous_movement
    }

    pub fn sprites(&self) -> &Arc<SpriteSet> {
        &self.sprites
    }

    pub fn sheet(&self) -> &str {
        self.sprites.sheet(self.slot)
    }

    /// Exchanges the active sprite set with `other` without copying either.
    pub fn swap_sprites(&mut self, other: &mut Arc<SpriteSet>) {
        mem::swap(&mut self.sprites, other);
    }

    /// Source rectangle of the current frame within the current sheet.
    pub fn source_rect(&self) -> Rect {
        let width = self.sprites.cell_width as i32;
        Rect::new(
            (self.frame as i32).saturating_mul(width),
            0,
            width,
            self.sprites.cell_height as i32,
        )
    }

    /// Feeds this tick's movement vector, then advances the walk cycle.
    pub fn update(&mut self, movement: Vec2) {
        self.apply_movement(movement);
        self.advance_frame();
    }

    fn apply_movement(&mut self, movement: Vec2) {
        self.previous_movement = self.movement;
        self.movement = movement;

        if !movement.is_zero() {
            self.slot = AnimationSlot::moving(Facing::from_movement(movement));
        } else if self.slot.motion == Motion::Moving {
            self.slot = AnimationSlot::still(self.slot.facing);
            self.frame = 0;
        }
    }

    fn advance_frame(&mut self) {
        let skip = self.skip_next_advance;
        self.skip_next_advance = !skip;
        if skip || self.slot.motion != Motion::Moving {
            return;
        }

        if self.frame < self.sprites.frame_count(self.slot) {
            self.frame += 1;
        } else {
            self.frame = 0;
        }
    }
}
