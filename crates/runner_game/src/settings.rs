//! Tunables for a run, loaded from `assets/config/settings.json`.
//!
//! Every field is optional in the file; omitted ones keep the values below.
//! Distances are playfield units (the playfield is `canvas_width` x
//! `canvas_height`, y grows downward), times are ticks.

use std::path::Path;

use serde::Deserialize;

use crate::error::{read_json, LoadError};

pub const SETTINGS_PATH: &str = "assets/config/settings.json";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(50.0, 50.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub gravity: f64,
    /// Read but unused: lane changes are instantaneous.
    pub player_speed: f64,
    pub jump_force: f64,
    pub ground_height: f64,
    pub obstacle_speed: f64,
    pub obstacle_frequency: f64,
    pub coin_frequency: f64,
    pub enemy_frequency: f64,
    /// Nominal lane width. Lanes are laid out by dividing the playfield
    /// width by `lane_count`; this value is kept for configuration files
    /// that set it but does not move anything.
    pub lane_width: f64,
    pub lane_count: usize,
    pub initial_difficulty: f64,
    pub difficulty_increase_rate: f64,

    pub canvas_width: f64,
    pub canvas_height: f64,
    pub player_size: Size,
    pub obstacle_size: Size,
    pub coin_size: Size,
    pub enemy_size: Size,
    /// Coins float at least this far above the ground line...
    pub coin_base_lift: f64,
    /// ...plus a uniform random extra in `[0, coin_lift_range)`.
    pub coin_lift_range: f64,
    pub home_lane: usize,
    pub enemy_defeat_bonus: u64,
    /// Background layers scroll at this fraction of the obstacle speed.
    pub background_speed: f64,
    pub seed: Option<u64>,
    /// Keep stomp bonuses in the score instead of showing them for one tick.
    pub keep_defeat_bonus: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            player_speed: 5.0,
            jump_force: 12.0,
            ground_height: 50.0,
            obstacle_speed: 5.0,
            obstacle_frequency: 100.0,
            coin_frequency: 150.0,
            enemy_frequency: 200.0,
            lane_width: 100.0,
            lane_count: 3,
            initial_difficulty: 1.0,
            difficulty_increase_rate: 0.0001,

            canvas_width: 800.0,
            canvas_height: 600.0,
            player_size: Size::new(50.0, 80.0),
            obstacle_size: Size::new(50.0, 30.0),
            coin_size: Size::new(30.0, 30.0),
            enemy_size: Size::new(50.0, 60.0),
            coin_base_lift: 50.0,
            coin_lift_range: 100.0,
            home_lane: 1,
            enemy_defeat_bonus: 100,
            background_speed: 1.0,
            seed: None,
            keep_defeat_bonus: false,
        }
    }
}

impl GameSettings {
    /// Width of one lane on the playfield.
    pub fn lane_span(&self) -> f64 {
        self.canvas_width / self.lane_count as f64
    }

    /// Left edge that centers an object of `width` in `lane`.
    pub fn lane_x(&self, lane: usize, width: f64) -> f64 {
        let span = self.lane_span();
        lane as f64 * span + span / 2.0 - width / 2.0
    }

    /// Top edge of an object of `height` standing on the ground.
    pub fn ground_line(&self, height: f64) -> f64 {
        self.canvas_height - self.ground_height - height
    }

    /// Horizontal scroll per tick at `difficulty`.
    pub fn scroll_step(&self, difficulty: f64) -> f64 {
        self.obstacle_speed * difficulty
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        let fail = |reason: String| -> Result<(), LoadError> {
            Err(LoadError::invalid("settings", reason))
        };

        if self.lane_count == 0 {
            return fail("lane_count must be at least 1".to_string());
        }
        if self.home_lane >= self.lane_count {
            return fail(format!(
                "home_lane {} is outside 0..{}",
                self.home_lane, self.lane_count
            ));
        }
        for (name, value) in [
            ("obstacle_frequency", self.obstacle_frequency),
            ("coin_frequency", self.coin_frequency),
            ("enemy_frequency", self.enemy_frequency),
            ("initial_difficulty", self.initial_difficulty),
            ("obstacle_speed", self.obstacle_speed),
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ] {
            if value.is_nan() || value <= 0.0 {
                return fail(format!("{name} must be > 0 (got {value})"));
            }
        }
        for (name, value) in [
            ("gravity", self.gravity),
            ("player_speed", self.player_speed),
            ("lane_width", self.lane_width),
            ("jump_force", self.jump_force),
            ("difficulty_increase_rate", self.difficulty_increase_rate),
            ("coin_base_lift", self.coin_base_lift),
            ("coin_lift_range", self.coin_lift_range),
            ("background_speed", self.background_speed),
        ] {
            if value.is_nan() || value < 0.0 {
                return fail(format!("{name} must be >= 0 (got {value})"));
            }
        }
        if !(0.0..self.canvas_height).contains(&self.ground_height) {
            return fail(format!(
                "ground_height {} must lie within the canvas height {}",
                self.ground_height, self.canvas_height
            ));
        }
        for (name, size) in [
            ("player_size", self.player_size),
            ("obstacle_size", self.obstacle_size),
            ("coin_size", self.coin_size),
            ("enemy_size", self.enemy_size),
        ] {
            let positive = size.width > 0.0 && size.height > 0.0;
            if !positive {
                return fail(format!(
                    "{name} must be positive (got {}x{})",
                    size.width, size.height
                ));
            }
        }
        Ok(())
    }
}

pub fn load_settings_from_path(path: &Path) -> Result<GameSettings, LoadError> {
    let settings: GameSettings = read_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Like [`load_settings_from_path`], but a missing file means defaults.
pub fn load_settings_or_default(path: &Path) -> Result<GameSettings, LoadError> {
    match load_settings_from_path(path) {
        Ok(settings) => {
            log::info!("Settings loaded from {}", path.display());
            Ok(settings)
        }
        Err(err) if err.is_not_found() => {
            log::warn!("{} not found, using default settings", path.display());
            Ok(GameSettings::default())
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::temp_file_path;
    use std::fs;

    fn load_str(name_hint: &str, json: &str) -> Result<GameSettings, LoadError> {
        let path = temp_file_path(name_hint);
        fs::write(&path, json).expect("write settings file");
        let result = load_settings_from_path(&path);
        let _ = fs::remove_file(path);
        result
    }

    #[test]
    fn defaults_validate() {
        assert!(GameSettings::default().validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let settings = load_str(
            "partial",
            r#"{ "gravity": 0.8, "lane_count": 4, "player_size": { "height": 70 } }"#,
        )
        .expect("partial settings should load");
        assert_eq!(settings.gravity, 0.8);
        assert_eq!(settings.lane_count, 4);
        assert_eq!(settings.jump_force, 12.0);
        assert_eq!(settings.player_size, Size::new(50.0, 70.0));
    }

    #[test]
    fn zero_lanes_are_rejected() {
        let err = load_str("zero_lanes", r#"{ "lane_count": 0 }"#).expect_err("invalid");
        assert!(err.to_string().contains("lane_count"));
    }

    #[test]
    fn non_positive_frequency_is_rejected() {
        let err = load_str("freq", r#"{ "coin_frequency": 0 }"#).expect_err("invalid");
        assert!(err.to_string().contains("coin_frequency"));
    }

    #[test]
    fn home_lane_must_exist() {
        let err = load_str("home", r#"{ "lane_count": 2, "home_lane": 2 }"#).expect_err("invalid");
        assert!(err.to_string().contains("home_lane"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = temp_file_path("absent");
        let settings = load_settings_or_default(&path).expect("defaults");
        assert_eq!(settings, GameSettings::default());
    }

    #[test]
    fn lanes_center_objects() {
        let settings = GameSettings::default();
        let span = 800.0 / 3.0;
        assert!((settings.lane_x(0, 50.0) - (span / 2.0 - 25.0)).abs() < 1e-9);
        assert!((settings.lane_x(1, 30.0) - (span * 1.5 - 15.0)).abs() < 1e-9);
        assert_eq!(settings.ground_line(80.0), 470.0);
    }
}
