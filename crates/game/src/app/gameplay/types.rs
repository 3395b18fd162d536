#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GamePhase {
    Title,
    Play,
    Paused,
    Won,
    Lost,
}

impl GamePhase {
    fn banner(self) -> Option<Banner> {
        match self {
            Self::Title => Some(Banner::Title),
            Self::Play => None,
            Self::Paused => Some(Banner::Paused),
            Self::Won => Some(Banner::Won),
            Self::Lost => Some(Banner::Lost),
        }
    }

    fn as_token(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Play => "play",
            Self::Paused => "paused",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Cotton-candy decoy tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DecoyRules {
    pub(crate) effect_radius: f32,
    pub(crate) active_ticks: u32,
    pub(crate) cooldown_ticks: u32,
}

impl Default for DecoyRules {
    fn default() -> Self {
        Self {
            effect_radius: DEFAULT_DECOY_EFFECT_RADIUS,
            active_ticks: DEFAULT_DECOY_ACTIVE_TICKS,
            cooldown_ticks: DEFAULT_DECOY_COOLDOWN_TICKS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct HeistRules {
    /// Every guard's detection radius is this times the player's candy.
    pub(crate) radius_per_candy: u32,
    pub(crate) candy_to_win: u32,
    pub(crate) pause_debounce_ticks: u32,
    pub(crate) decoy: DecoyRules,
}

impl Default for HeistRules {
    fn default() -> Self {
        Self {
            radius_per_candy: DEFAULT_RADIUS_PER_CANDY,
            candy_to_win: DEFAULT_CANDY_TO_WIN,
            pause_debounce_ticks: DEFAULT_PAUSE_DEBOUNCE_TICKS,
            decoy: DecoyRules::default(),
        }
    }
}

/// One level document: the layout plus the rules it is played with.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelFile {
    pub(crate) level: LevelDef,
    #[serde(default)]
    pub(crate) rules: HeistRules,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct DecoyState {
    /// Where the decoy was dropped while it is still active.
    position: Option<Vec2>,
    active_ticks: u32,
    cooldown_ticks: u32,
}

impl DecoyState {
    fn is_active(&self) -> bool {
        self.position.is_some()
    }

    fn is_ready(&self) -> bool {
        !self.is_active() && self.cooldown_ticks == 0
    }

    fn drop_at(&mut self, position: Vec2, rules: &DecoyRules) {
        self.position = Some(position);
        self.active_ticks = rules.active_ticks;
        self.cooldown_ticks = rules.cooldown_ticks;
    }

    fn tick(&mut self) {
        self.cooldown_ticks = self.cooldown_ticks.saturating_sub(1);
        self.active_ticks = self.active_ticks.saturating_sub(1);
        if self.active_ticks == 0 {
            self.position = None;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum HeistEvent {
    ReachedExit { candy_count: u32 },
    CandyStolen { mother: EntityId, candy_count: u32 },
    Caught { guard: EntityId },
    DecoyDropped { position: Vec2, candy_count: u32 },
}
