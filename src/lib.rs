//! Space Wing - dodge the asteroids, ram the tie fighters
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, linear motion, contacts, game phase)
//! - `platform`: Collaborator contracts for the scene, the scheduler and input
//! - `game`: Binds the simulation to injected collaborators
//! - `settings`: Data-driven game tuning

pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;

pub use game::{Game, SceneNodes};
pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Scene dimensions (origin at the center, y up)
    pub const SCREEN_WIDTH: f32 = 750.0;
    pub const SCREEN_HEIGHT: f32 = 1334.0;

    /// Sprite footprints
    pub const PLAYER_WIDTH: f32 = 96.0;
    pub const PLAYER_HEIGHT: f32 = 96.0;
    pub const TIE_WIDTH: f32 = 72.0;
    pub const TIE_HEIGHT: f32 = 64.0;
    /// Asteroids collide as a circle of this diameter
    pub const ASTEROID_SIZE: f32 = 80.0;

    /// Seconds between tie fighter spawns
    pub const ENEMY_SPAWN_INTERVAL: f32 = 1.0;
    /// Seconds between asteroid spawns
    pub const HAZARD_SPAWN_INTERVAL: f32 = 2.0;

    /// Travel time range for spawned movers (seconds)
    pub const MIN_TRAVEL_TIME: f32 = 2.0;
    pub const MAX_TRAVEL_TIME: f32 = 4.0;

    /// Game-over indicator hit region, centered on the scene
    pub const GAME_OVER_WIDTH: f32 = 420.0;
    pub const GAME_OVER_HEIGHT: f32 = 120.0;

    /// Where the ship sits when a run starts
    pub const PLAYER_START_Y: f32 = -SCREEN_HEIGHT / 2.0 + 200.0;
}

/// Axis-aligned rectangle described by its center and half extents
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Rect {
    pub fn from_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Half extents with the sign dropped
    #[inline]
    fn half(&self) -> Vec2 {
        self.half_extents.abs()
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half()
    }

    /// Inclusive point test
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        let half = self.half();
        d.x <= half.x && d.y <= half.y
    }

    /// Closest point inside the rectangle to `point`
    #[inline]
    pub fn clamp_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }
}

/// Uniform sample in `[min, max]`, tolerating a degenerate or inverted range
#[inline]
pub fn sample_between<R: rand::Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..=max)
    } else {
        min
    }
}
