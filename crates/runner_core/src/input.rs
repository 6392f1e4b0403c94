//! Keyboard state and the discrete intents the runner understands.
//!
//! Physical keys are tracked level-triggered (`is_held`) and edge-triggered
//! (`is_just_pressed`). The game itself only consumes edges: every press maps
//! to at most one [`Intent`], and holding a key down does not repeat it.
//!
//! Edges are cleared by `end_frame()`, which the main loop calls only after a
//! fixed tick has consumed them, so a press landing on a frame with zero ticks
//! is not lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Space,
    Enter,
    Escape,
    P,
    A,
    D,
    W,
    F3,
}

/// A discrete player request, independent of the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Jump,
    TogglePause,
    /// Start from the title screen or restart after game over.
    Start,
    /// Abandon the run and return to the title screen.
    Quit,
}

impl Intent {
    pub fn from_key(key: Key) -> Option<Self> {
        match key {
            Key::Left | Key::A => Some(Self::MoveLeft),
            Key::Right | Key::D => Some(Self::MoveRight),
            Key::Up | Key::W | Key::Space => Some(Self::Jump),
            Key::P => Some(Self::TogglePause),
            Key::Enter => Some(Self::Start),
            Key::Escape => Some(Self::Quit),
            Key::F3 => None,
        }
    }
}

/// Stable ordering for intents collected from one frame's key edges.
const INTENT_KEYS: &[Key] = &[
    Key::Left,
    Key::A,
    Key::Right,
    Key::D,
    Key::Up,
    Key::W,
    Key::Space,
    Key::P,
    Key::Enter,
    Key::Escape,
];

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// Intents produced by this frame's key presses, deduplicated, in a fixed
    /// order (movement, jump, then session controls).
    pub fn intents(&self) -> Vec<Intent> {
        let mut out = Vec::new();
        for &key in INTENT_KEYS {
            if !self.is_just_pressed(key) {
                continue;
            }
            if let Some(intent) = Intent::from_key(key) {
                if !out.contains(&intent) {
                    out.push(intent);
                }
            }
        }
        out
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
