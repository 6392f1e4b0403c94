//! Frame-counted spawn timers.
//!
//! Each kind spawns when `frame_count - last_spawn >= base_frequency / difficulty`.
//! The three kinds run independently, so one tick can spawn all of them.

use rand::Rng;

use crate::collision::Rect;
use crate::entity::{Entity, EntityKind};
use crate::settings::GameSettings;

pub fn spawn_interval(base_frequency: f64, difficulty: f64) -> f64 {
    base_frequency / difficulty
}

/// Tick at which each kind last spawned, indexed by [`EntityKind::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnTimers {
    last_spawn_frame: [u64; 3],
}

impl SpawnTimers {
    pub fn last_spawn_frame(&self, kind: EntityKind) -> u64 {
        self.last_spawn_frame[kind.index()]
    }

    pub fn is_due(
        &self,
        kind: EntityKind,
        frame_count: u64,
        difficulty: f64,
        settings: &GameSettings,
    ) -> bool {
        let elapsed = frame_count.saturating_sub(self.last_spawn_frame(kind)) as f64;
        elapsed >= spawn_interval(kind.base_frequency(settings), difficulty)
    }

    /// Kinds due this tick, in spawn order. Marks each as spawned at `frame_count`.
    pub fn take_due(
        &mut self,
        frame_count: u64,
        difficulty: f64,
        settings: &GameSettings,
    ) -> Vec<EntityKind> {
        let mut due = Vec::new();
        for kind in EntityKind::ALL {
            if self.is_due(kind, frame_count, difficulty, settings) {
                self.last_spawn_frame[kind.index()] = frame_count;
                due.push(kind);
            }
        }
        due
    }
}

/// A new entity of `kind` centered in a uniformly random lane.
pub fn spawn_entity<R: Rng>(kind: EntityKind, rng: &mut R, settings: &GameSettings) -> Entity {
    let lane = rng.gen_range(0..settings.lane_count);
    let size = kind.size(settings);
    let x = settings.lane_x(lane, size.width);
    let ground = settings.ground_line(size.height);
    let y = match kind {
        EntityKind::Coin => {
            let extra = if settings.coin_lift_range > 0.0 {
                rng.gen_range(0.0..settings.coin_lift_range)
            } else {
                0.0
            };
            ground - settings.coin_base_lift - extra
        }
        EntityKind::Obstacle | EntityKind::Enemy => ground,
    };
    Entity::new(kind, Rect::new(x, y, size.width, size.height), lane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn interval_shrinks_as_difficulty_grows() {
        let mut previous = f64::INFINITY;
        for step in 0..1000 {
            let difficulty = 1.0 + step as f64 * 0.01;
            let interval = spawn_interval(100.0, difficulty);
            assert!(interval <= previous);
            previous = interval;
        }
    }

    #[test]
    fn kinds_become_due_at_their_own_frequency() {
        let settings = GameSettings::default();
        let mut timers = SpawnTimers::default();
        assert!(timers.take_due(99, 1.0, &settings).is_empty());
        assert_eq!(timers.take_due(100, 1.0, &settings), vec![EntityKind::Obstacle]);
        assert_eq!(timers.last_spawn_frame(EntityKind::Obstacle), 100);
        assert_eq!(timers.take_due(150, 1.0, &settings), vec![EntityKind::Coin]);
        assert_eq!(
            timers.take_due(200, 1.0, &settings),
            vec![EntityKind::Obstacle, EntityKind::Enemy]
        );
    }

    #[test]
    fn higher_difficulty_spawns_sooner() {
        let settings = GameSettings::default();
        let timers = SpawnTimers::default();
        assert!(!timers.is_due(EntityKind::Obstacle, 50, 1.0, &settings));
        assert!(timers.is_due(EntityKind::Obstacle, 50, 2.0, &settings));
    }

    #[test]
    fn spawned_entities_sit_in_a_lane() {
        let settings = GameSettings::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let obstacle = spawn_entity(EntityKind::Obstacle, &mut rng, &settings);
            assert!(obstacle.lane < settings.lane_count);
            assert_eq!(obstacle.bounds.x, settings.lane_x(obstacle.lane, 50.0));
            assert_eq!(obstacle.bounds.y, 520.0);

            let enemy = spawn_entity(EntityKind::Enemy, &mut rng, &settings);
            assert_eq!(enemy.bounds.y, 490.0);
            assert!(!enemy.defeated);

            let coin = spawn_entity(EntityKind::Coin, &mut rng, &settings);
            // Ground line for a 30px coin is 520; lifted by 50 plus [0, 100).
            assert!(coin.bounds.y <= 470.0 && coin.bounds.y > 370.0);
        }
    }
}
