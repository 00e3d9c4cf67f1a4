//! Game tuning
//!
//! Scene geometry, sprite footprints and spawn timing. Defaults come from
//! [`crate::consts`]; hosts can override them from a JSON file.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rect;
use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Scene ===
    /// Scene size; the origin sits at the center
    pub screen_size: Vec2,

    // === Sprites ===
    pub player_size: Vec2,
    pub tie_size: Vec2,
    /// Asteroid diameter
    pub asteroid_size: f32,

    // === Spawning ===
    /// Seconds between tie fighter spawns
    pub enemy_interval: f32,
    /// Seconds between asteroid spawns
    pub hazard_interval: f32,
    /// Travel time range for every mover
    pub min_travel_time: f32,
    pub max_travel_time: f32,

    // === HUD ===
    /// Size of the game-over indicator (centered on the scene)
    pub game_over_size: Vec2,
    /// Player position at the start of each run
    pub player_start: Vec2,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_size: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),

            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            tie_size: Vec2::new(TIE_WIDTH, TIE_HEIGHT),
            asteroid_size: ASTEROID_SIZE,

            enemy_interval: ENEMY_SPAWN_INTERVAL,
            hazard_interval: HAZARD_SPAWN_INTERVAL,
            min_travel_time: MIN_TRAVEL_TIME,
            max_travel_time: MAX_TRAVEL_TIME,

            game_over_size: Vec2::new(GAME_OVER_WIDTH, GAME_OVER_HEIGHT),
            player_start: Vec2::new(0.0, PLAYER_START_Y),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the spawn rules cannot work with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(SettingsError::Invalid(format!("{name} must be positive, got {v}")))
            }
        };

        positive("screen width", self.screen_size.x)?;
        positive("screen height", self.screen_size.y)?;
        positive("player width", self.player_size.x)?;
        positive("player height", self.player_size.y)?;
        positive("tie width", self.tie_size.x)?;
        positive("tie height", self.tie_size.y)?;
        positive("asteroid size", self.asteroid_size)?;
        positive("enemy interval", self.enemy_interval)?;
        positive("hazard interval", self.hazard_interval)?;
        positive("min travel time", self.min_travel_time)?;
        positive("game-over width", self.game_over_size.x)?;
        positive("game-over height", self.game_over_size.y)?;

        if self.max_travel_time.is_nan() || self.max_travel_time < self.min_travel_time {
            return Err(SettingsError::Invalid(format!(
                "travel range inverted: {}..{}",
                self.min_travel_time, self.max_travel_time
            )));
        }
        if self.tie_size.x > self.screen_size.x || self.asteroid_size > self.screen_size.y {
            return Err(SettingsError::Invalid(
                "sprites must fit inside the scene".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn half_screen(&self) -> Vec2 {
        self.screen_size * 0.5
    }

    /// Hit region of the game-over indicator
    pub fn game_over_rect(&self) -> Rect {
        Rect::from_size(Vec2::ZERO, self.game_over_size)
    }

    /// Allowed spawn x range for tie fighters (sprite fully on screen)
    pub fn enemy_x_range(&self) -> (f32, f32) {
        let half = self.half_screen().x - self.tie_size.x / 2.0;
        (-half, half)
    }

    /// Allowed spawn y range for asteroids (sprite fully on screen)
    pub fn hazard_y_range(&self) -> (f32, f32) {
        let half = self.half_screen().y - self.asteroid_size / 2.0;
        (-half, half)
    }
}
