//! Spawn rules for tie fighters and asteroids

use glam::Vec2;
use rand::Rng;

use super::state::{EntityId, GameState, MoverKind};
use crate::sample_between;

/// Screen side an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Spawn a tie fighter just above the top edge, heading straight down.
/// Returns `None` while the game is over.
pub fn spawn_enemy(state: &mut GameState) -> Option<EntityId> {
    if !state.is_playing() {
        log::debug!("spawn_enemy ignored: game over");
        return None;
    }

    let (x_min, x_max) = state.settings.enemy_x_range();
    let edge_y = state.settings.half_screen().y + state.settings.tie_size.y / 2.0;
    let (t_min, t_max) = (state.settings.min_travel_time, state.settings.max_travel_time);

    let x = sample_between(&mut state.rng, x_min, x_max);
    let duration = sample_between(&mut state.rng, t_min, t_max);

    let from = Vec2::new(x, edge_y);
    let to = Vec2::new(x, -edge_y);
    let id = state.add_mover(MoverKind::Tie, from, to, duration);
    log::debug!("Tie {id} spawned at x={x:.1}, {duration:.2}s to cross");
    Some(id)
}

/// Spawn an asteroid just outside a random side edge, crossing horizontally
/// to the opposite edge. Returns `None` while the game is over.
pub fn spawn_hazard(state: &mut GameState) -> Option<EntityId> {
    if !state.is_playing() {
        log::debug!("spawn_hazard ignored: game over");
        return None;
    }

    let (y_min, y_max) = state.settings.hazard_y_range();
    let edge_x = state.settings.half_screen().x + state.settings.asteroid_size / 2.0;
    let (t_min, t_max) = (state.settings.min_travel_time, state.settings.max_travel_time);

    let side = if state.rng.random_bool(0.5) {
        Side::Left
    } else {
        Side::Right
    };
    let y = sample_between(&mut state.rng, y_min, y_max);
    let duration = sample_between(&mut state.rng, t_min, t_max);

    let from = Vec2::new(side.sign() * edge_x, y);
    let to = Vec2::new(side.opposite().sign() * edge_x, y);
    let id = state.add_mover(MoverKind::Asteroid, from, to, duration);
    log::debug!("Asteroid {id} spawned on the {side:?} at y={y:.1}, {duration:.2}s to cross");
    Some(id)
}
