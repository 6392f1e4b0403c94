//! The simulation: everything a run needs, advanced one tick at a time.
//!
//! Tick order:
//!   1. scroll the background (previous tick's difficulty)
//!   2. advance frame count, distance and difficulty
//!   3. spawn whatever kinds are due
//!   4. scroll and prune obstacles, coins and enemies
//!   5. integrate the player's jump
//!   6. resolve collisions (may end the run)
//!   7. recompute the score
//!
//! `tick()` touches no UI. Callers read the returned [`TickReport`] and the
//! public state to update the HUD.

use rand::rngs::StdRng;
use rand::SeedableRng;
use runner_core::input::Intent;

use crate::background::Background;
use crate::collision::resolve_collisions;
use crate::entity::{advance_entities, Entity, EntityKind};
use crate::player::Player;
use crate::settings::GameSettings;
use crate::spawner::{spawn_entity, SpawnTimers};

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub running: bool,
    pub paused: bool,
    /// Set when a collision ended the run; cleared by the next reset.
    pub game_over: bool,
    pub score: u64,
    pub coins: u32,
    pub distance: f64,
    pub difficulty: f64,
    pub frame_count: u64,
    pub spawn_timers: SpawnTimers,
    /// Stomp bonuses kept across ticks when `keep_defeat_bonus` is on.
    pub banked_bonus: u64,
}

impl GameState {
    pub fn new(settings: &GameSettings) -> Self {
        Self {
            running: false,
            paused: false,
            game_over: false,
            score: 0,
            coins: 0,
            distance: 0.0,
            difficulty: settings.initial_difficulty,
            frame_count: 0,
            spawn_timers: SpawnTimers::default(),
            banked_bonus: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.running && !self.paused
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// False when the tick was skipped (not running, or paused).
    pub advanced: bool,
    pub spawned: Vec<EntityKind>,
    pub coins_collected: u32,
    pub enemies_defeated: u32,
    pub landed: bool,
    pub game_over: bool,
}

pub struct GameWorld {
    pub settings: GameSettings,
    pub state: GameState,
    pub player: Player,
    pub obstacles: Vec<Entity>,
    pub coins: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub background: Background,
    seed: u64,
    rng: StdRng,
}

impl GameWorld {
    pub fn new(settings: GameSettings) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("World seed: {}", seed);
        Self {
            state: GameState::new(&settings),
            player: Player::new(&settings),
            obstacles: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            background: Background::new(&settings),
            rng: StdRng::seed_from_u64(seed),
            seed,
            settings,
        }
    }

    /// Fresh, not-yet-running state with the player home and no entities.
    /// The background keeps scrolling from where it was. A configured seed
    /// restarts the random stream so every run replays the same layout.
    pub fn reset(&mut self) {
        self.state = GameState::new(&self.settings);
        self.player = Player::new(&self.settings);
        self.obstacles.clear();
        self.coins.clear();
        self.enemies.clear();
        if self.settings.seed.is_some() {
            self.rng = StdRng::seed_from_u64(self.seed);
        }
        log::debug!("World reset");
    }

    /// Apply a player intent. Session intents and anything sent while the run
    /// is stopped or paused are ignored here; returns whether the player moved.
    pub fn apply_intent(&mut self, intent: Intent) -> bool {
        if !self.state.is_active() {
            return false;
        }
        match intent {
            Intent::MoveLeft => self.player.move_left(&self.settings),
            Intent::MoveRight => self.player.move_right(&self.settings),
            Intent::Jump => self.player.jump(&self.settings),
            Intent::TogglePause | Intent::Start | Intent::Quit => false,
        }
    }

    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        if !self.state.is_active() {
            return report;
        }
        report.advanced = true;

        self.background.scroll(&self.settings, self.state.difficulty);

        self.state.frame_count += 1;
        self.state.distance += self.settings.scroll_step(self.state.difficulty);
        self.state.difficulty += self.settings.difficulty_increase_rate;

        let due = self.state.spawn_timers.take_due(
            self.state.frame_count,
            self.state.difficulty,
            &self.settings,
        );
        for kind in &due {
            let entity = spawn_entity(*kind, &mut self.rng, &self.settings);
            log::trace!("Spawned {} in lane {}", kind.label(), entity.lane);
            self.list_mut(*kind).push(entity);
        }
        report.spawned = due;

        let dx = self.settings.scroll_step(self.state.difficulty);
        advance_entities(&mut self.obstacles, dx);
        advance_entities(&mut self.coins, dx);
        advance_entities(&mut self.enemies, dx);

        report.landed = self.player.integrate(&self.settings);

        let outcome = resolve_collisions(
            &mut self.player,
            &self.obstacles,
            &mut self.coins,
            &mut self.enemies,
            &self.settings,
        );
        self.state.coins += outcome.coins_collected;
        report.coins_collected = outcome.coins_collected;
        report.enemies_defeated = outcome.enemies_defeated;

        if outcome.game_over {
            // The score shown at game over is the one from the previous tick.
            self.state.running = false;
            self.state.game_over = true;
            report.game_over = true;
            log::info!(
                "Game over at tick {}: score {}, coins {}",
                self.state.frame_count,
                self.state.score,
                self.state.coins
            );
            return report;
        }

        let bonus =
            u64::from(outcome.enemies_defeated).saturating_mul(self.settings.enemy_defeat_bonus);
        self.update_score(bonus);
        report
    }

    /// `floor(distance / 10)` plus this tick's stomp bonus, or every bonus so
    /// far when `keep_defeat_bonus` is set.
    pub fn update_score(&mut self, tick_bonus: u64) {
        let base = (self.state.distance / 10.0).floor() as u64;
        self.state.score = if self.settings.keep_defeat_bonus {
            self.state.banked_bonus = self.state.banked_bonus.saturating_add(tick_bonus);
            base.saturating_add(self.state.banked_bonus)
        } else {
            base.saturating_add(tick_bonus)
        };
    }

    pub fn entities(&self, kind: EntityKind) -> &[Entity] {
        match kind {
            EntityKind::Obstacle => &self.obstacles,
            EntityKind::Coin => &self.coins,
            EntityKind::Enemy => &self.enemies,
        }
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<Entity> {
        match kind {
            EntityKind::Obstacle => &mut self.obstacles,
            EntityKind::Coin => &mut self.coins,
            EntityKind::Enemy => &mut self.enemies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::Rect;
    use crate::player::Stance;

    fn quiet_settings() -> GameSettings {
        GameSettings {
            obstacle_frequency: 1.0e9,
            coin_frequency: 1.0e9,
            enemy_frequency: 1.0e9,
            seed: Some(42),
            ..GameSettings::default()
        }
    }

    fn running_world(settings: GameSettings) -> GameWorld {
        let mut world = GameWorld::new(settings);
        world.reset();
        world.state.running = true;
        world
    }

    fn at_player(world: &GameWorld, kind: EntityKind) -> Entity {
        let size = kind.size(&world.settings);
        let p = world.player.bounds;
        Entity::new(
            kind,
            Rect::new(p.x, p.bottom() - size.height, size.width, size.height),
            world.player.lane,
        )
    }

    #[test]
    fn score_is_a_tenth_of_distance_rounded_down() {
        let mut world = running_world(quiet_settings());
        world.state.distance = 237.0;
        world.update_score(0);
        assert_eq!(world.state.score, 23);
    }

    #[test]
    fn tick_advances_counters_monotonically() {
        let mut world = running_world(GameSettings {
            seed: Some(3),
            ..GameSettings::default()
        });
        let mut last_frame = world.state.frame_count;
        let mut last_difficulty = world.state.difficulty;
        for _ in 0..600 {
            let report = world.tick();
            if !report.advanced {
                break;
            }
            assert_eq!(world.state.frame_count, last_frame + 1);
            assert!(world.state.difficulty >= last_difficulty);
            assert!(world.player.lane < world.settings.lane_count);
            last_frame = world.state.frame_count;
            last_difficulty = world.state.difficulty;
        }
    }

    #[test]
    fn first_tick_uses_initial_difficulty_for_distance() {
        let mut world = running_world(quiet_settings());
        world.tick();
        assert_eq!(world.state.frame_count, 1);
        assert_eq!(world.state.distance, 5.0);
        assert!((world.state.difficulty - 1.0001).abs() < 1e-12);
        assert_eq!(world.state.score, 0);
    }

    #[test]
    fn entities_spawn_on_their_frequency() {
        let mut world = running_world(GameSettings {
            seed: Some(9),
            ..GameSettings::default()
        });
        // At tick 99 the interval is 100 / 1.0099 > 99; at tick 100 it is
        // 100 / 1.01 < 100.
        for _ in 0..99 {
            world.tick();
        }
        assert!(world.obstacles.is_empty());
        let report = world.tick();
        assert_eq!(report.spawned, vec![EntityKind::Obstacle]);
        assert_eq!(world.obstacles.len(), 1);
    }

    #[test]
    fn obstacle_contact_ends_the_run_with_current_totals() {
        let mut world = running_world(quiet_settings());
        world.state.score = 7;
        world.state.coins = 3;
        let obstacle = at_player(&world, EntityKind::Obstacle);
        world.obstacles.push(obstacle);

        let report = world.tick();
        assert!(report.game_over);
        assert!(!world.state.running);
        assert!(world.state.game_over);
        assert_eq!(world.state.score, 7);
        assert_eq!(world.state.coins, 3);

        let frozen = world.state.clone();
        assert!(!world.tick().advanced);
        assert_eq!(world.state, frozen);
    }

    #[test]
    fn stomp_bonus_shows_for_one_tick() {
        let mut world = running_world(quiet_settings());
        // Enemy on the ground: top 490, midpoint 520.
        let enemy = at_player(&world, EntityKind::Enemy);
        world.enemies.push(enemy);
        world.player.stance = Stance::Jumping;
        world.player.velocity = 3.0;
        world.player.bounds.y = 420.0;

        let report = world.tick();
        assert_eq!(report.enemies_defeated, 1);
        assert!(!report.game_over);
        assert!(world.enemies[0].defeated);
        assert_eq!(world.player.velocity, -6.0);
        assert_eq!(world.state.score, 100);

        world.tick();
        assert!(world.enemies.is_empty());
        assert_eq!(world.state.score, 1);
    }

    #[test]
    fn kept_stomp_bonus_persists() {
        let mut world = running_world(GameSettings {
            keep_defeat_bonus: true,
            ..quiet_settings()
        });
        // Enemy on the ground: top 490, midpoint 520.
        let enemy = at_player(&world, EntityKind::Enemy);
        world.enemies.push(enemy);
        world.player.stance = Stance::Jumping;
        world.player.velocity = 3.0;
        world.player.bounds.y = 420.0;

        world.tick();
        world.tick();
        assert_eq!(world.state.score, 101);
    }

    #[test]
    fn huge_stomp_bonus_saturates_the_score() {
        let mut world = running_world(GameSettings {
            keep_defeat_bonus: true,
            enemy_defeat_bonus: u64::MAX,
            ..quiet_settings()
        });
        let enemy = at_player(&world, EntityKind::Enemy);
        world.enemies.push(enemy);
        world.player.stance = Stance::Jumping;
        world.player.velocity = 3.0;
        world.player.bounds.y = 420.0;

        world.tick();
        assert_eq!(world.state.score, u64::MAX);
        world.tick();
        assert_eq!(world.state.score, u64::MAX);
    }

    #[test]
    fn background_scrolls_without_any_images() {
        let mut world = running_world(quiet_settings());
        let width = world.settings.canvas_width;
        world.tick();
        assert!(world.background.layers[0].x < 0.0);
        assert!(world.background.layers[1].x < width);
    }

    #[test]
    fn coin_pickup_increments_and_removes() {
        let mut world = running_world(quiet_settings());
        world.state.coins = 4;
        let coin = at_player(&world, EntityKind::Coin);
        world.coins.push(coin);

        let report = world.tick();
        assert_eq!(report.coins_collected, 1);
        assert_eq!(world.state.coins, 5);
        assert!(world.coins.is_empty());
        assert!(world.state.running);
    }

    #[test]
    fn reset_then_idle_ticks_leave_player_home() {
        let mut world = running_world(quiet_settings());
        world.player.move_left(&world.settings);
        world.player.jump(&world.settings);
        for _ in 0..10 {
            world.tick();
        }

        world.reset();
        let home = Player::new(&world.settings);
        for _ in 0..50 {
            assert!(!world.tick().advanced);
        }
        assert_eq!(world.player, home);
        assert_eq!(world.player.lane, 1);
        assert_eq!(world.state.distance, 0.0);
        assert_eq!(world.state.score, 0);
        assert!(world.obstacles.is_empty() && world.coins.is_empty() && world.enemies.is_empty());
    }

    #[test]
    fn intents_are_ignored_unless_running_and_unpaused() {
        let mut world = GameWorld::new(quiet_settings());
        assert!(!world.apply_intent(Intent::MoveLeft));
        world.state.running = true;
        world.state.paused = true;
        assert!(!world.apply_intent(Intent::Jump));
        world.state.paused = false;
        assert!(world.apply_intent(Intent::MoveLeft));
        assert!(!world.apply_intent(Intent::MoveLeft));
        assert!(world.apply_intent(Intent::Jump));
        assert!(!world.apply_intent(Intent::Jump));
        assert!(!world.apply_intent(Intent::TogglePause));
    }

    #[test]
    fn paused_world_does_not_advance() {
        let mut world = running_world(quiet_settings());
        world.state.paused = true;
        let before = world.state.clone();
        assert!(!world.tick().advanced);
        assert_eq!(world.state, before);
    }

    #[test]
    fn same_seed_same_run() {
        let settings = GameSettings {
            seed: Some(1234),
            ..GameSettings::default()
        };
        let mut a = running_world(settings.clone());
        let mut b = running_world(settings);
        for _ in 0..900 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.state, b.state);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.coins, b.coins);
        assert_eq!(a.enemies, b.enemies);
    }
}
