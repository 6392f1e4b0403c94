//! The runner: lane teleports and a single gravity integrator for jumps.

use crate::collision::Rect;
use crate::settings::GameSettings;

/// Vertical state. A jump stays `Jumping` through both the rise and the
/// descent, which is what the stomp check keys on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    Grounded,
    Jumping,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub bounds: Rect,
    pub lane: usize,
    pub stance: Stance,
    /// Positive is downward.
    pub velocity: f64,
}

impl Player {
    /// Standing on the ground in the home lane.
    pub fn new(settings: &GameSettings) -> Self {
        let size = settings.player_size;
        let lane = settings.home_lane;
        Self {
            bounds: Rect::new(
                settings.lane_x(lane, size.width),
                settings.ground_line(size.height),
                size.width,
                size.height,
            ),
            lane,
            stance: Stance::Grounded,
            velocity: 0.0,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.stance == Stance::Jumping
    }

    /// Start a jump. Ignored while airborne.
    pub fn jump(&mut self, settings: &GameSettings) -> bool {
        if self.stance != Stance::Grounded {
            return false;
        }
        self.stance = Stance::Jumping;
        self.velocity = -settings.jump_force;
        true
    }

    pub fn move_left(&mut self, settings: &GameSettings) -> bool {
        if self.lane == 0 {
            return false;
        }
        self.set_lane(self.lane - 1, settings);
        true
    }

    pub fn move_right(&mut self, settings: &GameSettings) -> bool {
        if self.lane + 1 >= settings.lane_count {
            return false;
        }
        self.set_lane(self.lane + 1, settings);
        true
    }

    fn set_lane(&mut self, lane: usize, settings: &GameSettings) {
        self.lane = lane;
        self.bounds.x = settings.lane_x(lane, self.bounds.w);
    }

    /// One tick of gravity. Returns true on the tick the player lands.
    pub fn integrate(&mut self, settings: &GameSettings) -> bool {
        if self.stance == Stance::Grounded {
            return false;
        }
        self.velocity += settings.gravity;
        self.bounds.y += self.velocity;

        let ground = settings.ground_line(self.bounds.h);
        if self.bounds.y >= ground {
            self.bounds.y = ground;
            self.stance = Stance::Grounded;
            self.velocity = 0.0;
            return true;
        }
        false
    }

    /// Small hop after landing on an enemy.
    pub fn bounce(&mut self, settings: &GameSettings) {
        self.velocity = -settings.jump_force / 2.0;
    }
}
