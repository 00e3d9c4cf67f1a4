//! Frame tick
//!
//! Advances the simulation clock, reports where every mover now is and
//! retires movers that have reached the end of their path.

use super::state::{EntityId, GameEvent, GameState, RemovalReason};

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) {
    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Ignoring bad tick dt {dt}");
        return;
    }

    state.time += f64::from(dt);
    // Contacts are reported per step; a new step starts a new dedupe window
    state.handled_contacts.clear();

    let now = state.time;
    let mut arrived: Vec<EntityId> = Vec::new();
    for mover in &state.movers {
        if mover.motion.is_finished(now) {
            arrived.push(mover.id);
        } else {
            state.events.push(GameEvent::Moved {
                id: mover.id,
                pos: mover.position(now),
            });
        }
    }

    for id in arrived {
        arrive(state, id);
    }
}

/// Retire a mover that reached its destination. Unknown ids are ignored,
/// since the mover may already have collided.
pub fn arrive(state: &mut GameState, id: EntityId) -> bool {
    state.remove_mover(id, RemovalReason::Arrived).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::state::{GamePhase, MoverKind};
    use crate::sim::{spawn_enemy, spawn_hazard};
    use glam::Vec2;

    fn playing() -> GameState {
        let mut state = GameState::new(12345, Settings::default());
        state.start_game();
        state.drain_events();
        state
    }

    #[test]
    fn test_tick_moves_and_retires() {
        let mut state = playing();
        let id = state.add_mover(MoverKind::Tie, Vec2::new(0.0, 100.0), Vec2::new(0.0, -100.0), 2.0);
        state.drain_events();

        tick(&mut state, 1.0);
        let events = state.drain_events();
        assert_eq!(events.len(), 1);
        match events[0] {
            GameEvent::Moved { id: moved, pos } => {
                assert_eq!(moved, id);
                assert!(pos.length() < 1e-4);
            }
            ref other => panic!("unexpected event {other:?}"),
        }

        tick(&mut state, 1.0);
        assert!(state.mover(id).is_none());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Removed {
                id,
                reason: RemovalReason::Arrived
            }]
        );
    }

    #[test]
    fn test_movers_finish_after_game_over() {
        let mut state = playing();
        let id = spawn_enemy(&mut state).unwrap();
        state.end_game();
        tick(&mut state, 0.5);
        assert!(state.mover(id).is_some());
        tick(&mut state, 10.0);
        assert!(state.mover(id).is_none());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_bad_dt_ignored() {
        let mut state = playing();
        tick(&mut state, f32::NAN);
        tick(&mut state, -1.0);
        tick(&mut state, f32::INFINITY);
        assert_eq!(state.time, 0.0);
    }

    #[test]
    fn test_tick_clears_contact_window() {
        use crate::sim::collision::ContactId;
        let mut state = playing();
        state.handled_contacts.insert(ContactId::Host(1));
        tick(&mut state, 0.016);
        assert!(state.handled_contacts.is_empty());
    }

    #[test]
    fn test_arrive_is_idempotent() {
        let mut state = playing();
        let id = spawn_hazard(&mut state).unwrap();
        assert!(arrive(&mut state, id));
        assert!(!arrive(&mut state, id));
    }

    #[test]
    fn test_movers_arrive_late_in_a_long_run() {
        let mut state = playing();
        state.time = 600_000.0;
        let id = spawn_enemy(&mut state).unwrap();
        let duration = state.mover(id).unwrap().motion.duration;

        let frame = 1.0 / 60.0;
        let steps = (duration / frame).ceil() as usize + 1;
        let before = state.time;
        for _ in 0..steps {
            tick(&mut state, frame);
        }
        assert!(state.time - before >= f64::from(duration));
        assert!(state.mover(id).is_none());
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = playing();
        let mut state2 = playing();

        for step in 0..240 {
            for state in [&mut state1, &mut state2] {
                if step % 60 == 0 {
                    spawn_enemy(state);
                }
                if step % 120 == 0 {
                    spawn_hazard(state);
                }
                tick(state, 1.0 / 60.0);
            }
        }

        assert_eq!(state1.movers.len(), state2.movers.len());
        for (a, b) in state1.movers.iter().zip(&state2.movers) {
            assert_eq!(a.position(state1.time), b.position(state2.time));
        }
    }
}
