//! Axis-aligned boxes and the per-tick player-versus-entities pass.
//!
//! Boxes use a top-left origin with y growing downward. Overlap is strict:
//! boxes that only share an edge do not collide.
//!
//! Resolution order is fixed: obstacles, then coins, then enemies, each list
//! in insertion order. An obstacle hit or an unstomped enemy ends the run and
//! stops the pass, so nothing later in the order is looked at that tick.

use crate::entity::Entity;
use crate::player::Player;
use crate::settings::GameSettings;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// What one collision pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub coins_collected: u32,
    pub enemies_defeated: u32,
    pub game_over: bool,
}

/// A stomp needs a descending jump whose feet are still above the enemy's
/// vertical midpoint.
pub fn is_stomp(player: &Player, enemy: &Rect) -> bool {
    player.is_jumping() && player.velocity > 0.0 && player.bounds.bottom() < enemy.mid_y()
}

pub fn resolve_collisions(
    player: &mut Player,
    obstacles: &[Entity],
    coins: &mut Vec<Entity>,
    enemies: &mut [Entity],
    settings: &GameSettings,
) -> CollisionOutcome {
    let mut outcome = CollisionOutcome::default();
    let player_box = player.bounds;

    if obstacles.iter().any(|o| player_box.overlaps(&o.bounds)) {
        outcome.game_over = true;
        return outcome;
    }

    let before = coins.len();
    coins.retain(|coin| !player_box.overlaps(&coin.bounds));
    outcome.coins_collected = (before - coins.len()) as u32;

    for enemy in enemies.iter_mut() {
        if enemy.defeated || !player_box.overlaps(&enemy.bounds) {
            continue;
        }
        if is_stomp(player, &enemy.bounds) {
            enemy.defeated = true;
            player.bounce(settings);
            outcome.enemies_defeated += 1;
        } else {
            outcome.game_over = true;
            return outcome;
        }
    }

    outcome
}
