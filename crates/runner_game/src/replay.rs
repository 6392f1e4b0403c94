use std::path::Path;

use runner_core::input::Intent;
use serde::Deserialize;

use crate::error::{read_json, LoadError};
use crate::flow;
use crate::settings::GameSettings;
use crate::world::GameWorld;
use runner_hud::HudState;

/// A recorded run: a seed plus the intent delivered on each tick.
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default)]
    pub seed: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub intent: Option<ReplayIntent>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReplayIntent {
    MoveLeft,
    MoveRight,
    Jump,
    TogglePause,
    Start,
    Quit,
}

impl From<ReplayIntent> for Intent {
    fn from(intent: ReplayIntent) -> Self {
        match intent {
            ReplayIntent::MoveLeft => Intent::MoveLeft,
            ReplayIntent::MoveRight => Intent::MoveRight,
            ReplayIntent::Jump => Intent::Jump,
            ReplayIntent::TogglePause => Intent::TogglePause,
            ReplayIntent::Start => Intent::Start,
            ReplayIntent::Quit => Intent::Quit,
        }
    }
}

impl ReplaySequence {
    /// One item per tick, produced lazily. An intent with `repeat: n` fires
    /// on the first of its n ticks; the rest are idle, matching one key press.
    pub fn ticks(&self) -> impl Iterator<Item = Option<Intent>> + '_ {
        self.frames.iter().flat_map(|frame| {
            let first = std::iter::once(frame.intent.map(Intent::from));
            first.chain(std::iter::repeat(None).take(frame.repeat.max(1) as usize - 1))
        })
    }

    pub fn tick_count(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.repeat.max(1))).sum()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, LoadError> {
    let replay: ReplaySequence = read_json(path)?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), LoadError> {
    if replay.frames.is_empty() {
        return Err(LoadError::invalid("replay", "frames list is empty"));
    }
    Ok(())
}

const fn default_repeat() -> u32 {
    1
}

/// Final numbers of a headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayOutcome {
    pub ticks: u64,
    pub distance: f64,
    pub score: u64,
    pub coins: u32,
    pub game_over: bool,
}

/// Drive a fresh world through `replay`. The run starts immediately; a
/// `start` intent in the file is only needed after a game over or quit.
pub fn run_replay(replay: &ReplaySequence, settings: &GameSettings) -> (GameWorld, ReplayOutcome) {
    let mut world = GameWorld::new(GameSettings {
        seed: Some(replay.seed),
        ..settings.clone()
    });
    let mut hud = HudState::new();
    flow::start(&mut world, &mut hud);

    for intent in replay.ticks() {
        if let Some(intent) = intent {
            flow::handle_intent(&mut world, &mut hud, intent);
        }
        flow::step(&mut world, &mut hud);
    }

    let outcome = ReplayOutcome {
        ticks: world.state.frame_count,
        distance: world.state.distance,
        score: world.state.score,
        coins: world.state.coins,
        game_over: world.state.game_over,
    };
    (world, outcome)
}
