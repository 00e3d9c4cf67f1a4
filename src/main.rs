//! Space Wing headless driver
//!
//! Runs the game core without a renderer: an autopilot chases tie fighters
//! and the built-in overlap test stands in for a physics engine.
//!
//! Usage: `space-wing [seed] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(demo::DEFAULT_SEED);
    let settings = match args.next() {
        Some(path) => match space_wing::Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => space_wing::Settings::default(),
    };

    log::info!("Space Wing (headless) starting with seed {seed}");
    let report = demo::run(seed, settings);
    println!(
        "Played {} runs in {:.0}s: {} tie fighters destroyed, best run {}",
        report.runs, report.seconds, report.total_destroyed, report.best
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use space_wing::platform::{RecordingScene, TimerQueue};
    use space_wing::sim::{GamePhase, GameState, MoverKind};
    use space_wing::{Game, SceneNodes, Settings};

    pub const DEFAULT_SEED: u64 = 0x5EED_2023;

    /// Frame step (60 Hz)
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// How long to play
    const DEMO_SECONDS: f32 = 120.0;
    /// Ship speed under autopilot (units/s)
    const AUTOPILOT_SPEED: f32 = 600.0;
    /// Asteroids closer than this push the ship away
    const DANGER_RADIUS: f32 = 220.0;
    /// Seconds to sit on the game-over screen before tapping restart
    const RESTART_DELAY: f32 = 1.0;

    pub struct Report {
        pub runs: u32,
        pub seconds: f32,
        pub total_destroyed: u32,
        pub best: u32,
    }

    pub fn run(seed: u64, settings: Settings) -> Report {
        let mut scene = RecordingScene::new();
        let nodes = SceneNodes::create(&mut scene, &settings);
        let mut game = Game::new(GameState::new(seed, settings), scene, TimerQueue::new(), nodes);

        let mut report = Report {
            runs: 1,
            seconds: 0.0,
            total_destroyed: 0,
            best: 0,
        };
        let mut over_for = 0.0;
        let mut last_count = 0;

        while report.seconds < DEMO_SECONDS {
            game.advance(FRAME_DT);
            report.seconds += FRAME_DT;

            match game.phase() {
                GamePhase::Playing => {
                    let target = steer(&game);
                    game.move_player(target);
                    game.resolve_overlaps();
                    last_count = game.destroyed_count();
                }
                GamePhase::GameOver => {
                    if over_for == 0.0 {
                        report.total_destroyed += last_count;
                        report.best = report.best.max(last_count);
                    }
                    over_for += FRAME_DT;
                    if over_for >= RESTART_DELAY {
                        over_for = 0.0;
                        last_count = 0;
                        if game.on_restart_tap(Vec2::ZERO) {
                            report.runs += 1;
                        }
                    }
                }
            }
        }

        if game.phase() == GamePhase::Playing {
            report.total_destroyed += last_count;
            report.best = report.best.max(last_count);
        }
        report
    }

    /// Head for the lowest tie fighter, sidestepping nearby asteroids
    fn steer<S, T>(game: &Game<S, T>) -> Vec2
    where
        S: space_wing::platform::Scene,
        T: space_wing::platform::Scheduler,
    {
        let state = game.state();
        let now = state.time;
        let ship = state.player.pos;

        let mut goal = state
            .movers
            .iter()
            .filter(|m| m.kind == MoverKind::Tie)
            .map(|m| m.position(now))
            .min_by(|a, b| a.y.total_cmp(&b.y))
            .unwrap_or(state.settings.player_start);

        for rock in state.movers.iter().filter(|m| m.kind == MoverKind::Asteroid) {
            let offset = ship - rock.position(now);
            let dist = offset.length();
            if dist < DANGER_RADIUS {
                goal += offset.normalize_or_zero() * (DANGER_RADIUS - dist) * 2.0;
            }
        }

        let half = state.settings.half_screen();
        let goal = goal.clamp(-half, half);
        ship + (goal - ship).clamp_length_max(AUTOPILOT_SPEED * FRAME_DT)
    }
}
