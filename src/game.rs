//! Game driver
//!
//! [`Game`] owns a [`GameState`] plus the collaborators it was handed at
//! construction. Every operation runs the pure simulation step, then replays
//! the resulting [`GameEvent`]s onto the scene and the scheduler.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::platform::{
    InputEvent, Scene, ScheduleHandle, Scheduler, Timer, TimerEvent, TimerQueue, VisualHandle,
    VisualKind,
};
use crate::settings::Settings;
use crate::sim::{
    self, Contact, ContactId, ContactOutcome, EntityId, EntityRef, GameEvent, GamePhase, GameState,
};

/// Text shown on the score label
pub fn score_text(destroyed: u32) -> String {
    format!("Destroyed Tie Fighters: {destroyed}")
}

/// Fixed scene nodes the game drives directly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodes {
    pub player: VisualHandle,
    pub score_label: VisualHandle,
    pub game_over: VisualHandle,
}

impl SceneNodes {
    /// Create the fixed nodes on a scene that has none yet
    pub fn create<S: Scene>(scene: &mut S, settings: &Settings) -> Self {
        let player = scene.create_visual(VisualKind::Player, settings.player_start);
        let label_pos = Vec2::new(0.0, settings.half_screen().y - 80.0);
        let score_label = scene.create_visual(VisualKind::ScoreLabel, label_pos);
        scene.set_text(score_label, &score_text(0));
        let game_over = scene.create_visual(VisualKind::GameOverIndicator, Vec2::ZERO);
        scene.set_visibility(game_over, false);
        Self {
            player,
            score_label,
            game_over,
        }
    }
}

/// A running game bound to its scene and scheduler
pub struct Game<S: Scene, T: Scheduler> {
    state: GameState,
    scene: S,
    scheduler: T,
    nodes: SceneNodes,
    /// Scene node of every live mover
    visuals: BTreeMap<EntityId, VisualHandle>,
    /// Pending arrival timer of every live mover
    arrivals: BTreeMap<EntityId, ScheduleHandle>,
    /// Enemy and hazard spawn timers of the current session
    spawn_schedules: Vec<ScheduleHandle>,
}

impl<S: Scene, T: Scheduler> Game<S, T> {
    /// Bind a state to its collaborators and start the first run
    pub fn new(state: GameState, scene: S, scheduler: T, nodes: SceneNodes) -> Self {
        let mut game = Self {
            state,
            scene,
            scheduler,
            nodes,
            visuals: BTreeMap::new(),
            arrivals: BTreeMap::new(),
            spawn_schedules: Vec::new(),
        };
        game.start_game();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scheduler(&self) -> &T {
        &self.scheduler
    }

    pub fn nodes(&self) -> SceneNodes {
        self.nodes
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn destroyed_count(&self) -> u32 {
        self.state.destroyed_count
    }

    /// Scene node of a live mover
    pub fn visual_of(&self, id: EntityId) -> Option<VisualHandle> {
        self.visuals.get(&id).copied()
    }

    /// Begin a fresh run, replacing any spawn timers left from the last one
    pub fn start_game(&mut self) {
        self.cancel_spawn_schedules();
        self.state.start_game();

        let session = self.state.session;
        let enemy = self.scheduler.schedule_periodic(
            self.state.settings.enemy_interval,
            Timer::new(session, TimerEvent::SpawnEnemy),
        );
        let hazard = self.scheduler.schedule_periodic(
            self.state.settings.hazard_interval,
            Timer::new(session, TimerEvent::SpawnHazard),
        );
        self.spawn_schedules = vec![enemy, hazard];

        self.flush_events();
    }

    /// End the current run
    pub fn end_game(&mut self) {
        self.state.end_game();
        self.flush_events();
    }

    pub fn spawn_enemy(&mut self) -> Option<EntityId> {
        let id = sim::spawn_enemy(&mut self.state);
        self.flush_events();
        id
    }

    pub fn spawn_hazard(&mut self) -> Option<EntityId> {
        let id = sim::spawn_hazard(&mut self.state);
        self.flush_events();
        id
    }

    /// Resolve a contact reported by the physics host
    pub fn on_contact(&mut self, contact: &Contact) -> ContactOutcome {
        let outcome = sim::handle_contact(&mut self.state, contact);
        self.flush_events();
        outcome
    }

    /// Resolve a contact given as raw category bits
    pub fn on_collision(
        &mut self,
        id: ContactId,
        bits_a: u32,
        bits_b: u32,
        entity_a: EntityRef,
        entity_b: EntityRef,
    ) -> ContactOutcome {
        match Contact::from_raw(id, bits_a, bits_b, entity_a, entity_b) {
            Some(contact) => self.on_contact(&contact),
            None => ContactOutcome::Ignored,
        }
    }

    /// Follow a drag. Ignored while the game is over.
    pub fn move_player(&mut self, pos: Vec2) -> bool {
        let moved = self.state.move_player(pos);
        self.flush_events();
        moved
    }

    /// Restart when the game is over and the tap hits the indicator
    pub fn on_restart_tap(&mut self, pos: Vec2) -> bool {
        if !self.state.is_restart_tap(pos) {
            return false;
        }
        self.start_game();
        true
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::TouchDown(pos) => {
                self.on_restart_tap(pos);
            }
            InputEvent::TouchMove(pos) => {
                self.move_player(pos);
            }
        }
    }

    /// Dispatch a timer delivered by the scheduler
    pub fn on_timer(&mut self, timer: Timer) {
        if timer.session != self.state.session {
            log::debug!(
                "Dropping stale {:?} from session {} (now {})",
                timer.event,
                timer.session,
                self.state.session
            );
            return;
        }

        match timer.event {
            TimerEvent::SpawnEnemy => {
                sim::spawn_enemy(&mut self.state);
            }
            TimerEvent::SpawnHazard => {
                sim::spawn_hazard(&mut self.state);
            }
            TimerEvent::Arrive(id) => {
                self.arrivals.remove(&id);
                sim::arrive(&mut self.state, id);
            }
        }
        self.flush_events();
    }

    /// Advance the simulation clock
    pub fn tick(&mut self, dt: f32) {
        sim::tick(&mut self.state, dt);
        self.flush_events();
    }

    /// Run the built-in overlap test and resolve whatever it finds
    pub fn resolve_overlaps(&mut self) -> Vec<ContactOutcome> {
        sim::detect_contacts(&self.state)
            .iter()
            .map(|contact| self.on_contact(contact))
            .collect()
    }

    fn cancel_spawn_schedules(&mut self) {
        for handle in self.spawn_schedules.drain(..) {
            self.scheduler.cancel(handle);
        }
    }

    /// Replay simulation events onto the collaborators
    fn flush_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::PhaseChanged(GamePhase::Playing) => {
                    self.scene.set_visibility(self.nodes.game_over, false);
                }
                GameEvent::PhaseChanged(GamePhase::GameOver) => {
                    self.cancel_spawn_schedules();
                    self.scene.set_visibility(self.nodes.game_over, true);
                }
                GameEvent::PlayerMoved(pos) => {
                    self.scene.set_position(self.nodes.player, pos);
                }
                GameEvent::PlayerVisibility(visible) => {
                    self.scene.set_visibility(self.nodes.player, visible);
                }
                GameEvent::DestroyedCount(n) => {
                    self.scene.set_text(self.nodes.score_label, &score_text(n));
                }
                GameEvent::Spawned {
                    id,
                    kind,
                    pos,
                    duration,
                } => {
                    let handle = self.scene.create_visual(kind.into(), pos);
                    self.visuals.insert(id, handle);
                    let timer = Timer::new(self.state.session, TimerEvent::Arrive(id));
                    let arrival = self.scheduler.schedule_once(duration, timer);
                    self.arrivals.insert(id, arrival);
                }
                GameEvent::Moved { id, pos } => {
                    if let Some(&handle) = self.visuals.get(&id) {
                        self.scene.set_position(handle, pos);
                    }
                }
                GameEvent::Removed { id, reason } => {
                    if let Some(handle) = self.visuals.remove(&id) {
                        self.scene.remove_visual(handle);
                    }
                    if let Some(arrival) = self.arrivals.remove(&id) {
                        self.scheduler.cancel(arrival);
                    }
                    log::trace!("Mover {id} removed ({reason:?})");
                }
            }
        }
    }
}

impl<S: Scene> Game<S, TimerQueue> {
    /// One frame with the built-in timer queue: advance the clock, move
    /// everything, then fire whatever timers came due.
    pub fn advance(&mut self, dt: f32) {
        self.tick(dt);
        self.scheduler.advance(dt);
        while let Some(timer) = self.scheduler.pop_due() {
            self.on_timer(timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::RecordingScene;
    use crate::sim::{Body, Category, MoverKind, RemovalReason};

    type TestGame = Game<RecordingScene, TimerQueue>;

    fn new_game(seed: u64) -> TestGame {
        let settings = Settings::default();
        let mut scene = RecordingScene::new();
        let nodes = SceneNodes::create(&mut scene, &settings);
        Game::new(GameState::new(seed, settings), scene, TimerQueue::new(), nodes)
    }

    fn tie_hit(id: u64, tie: EntityId) -> Contact {
        Contact::new(ContactId::Host(id), Body::player(), Body::mover(Category::Tie, tie))
    }

    fn rock_hit(id: u64, rock: EntityId) -> Contact {
        Contact::new(ContactId::Host(id), Body::player(), Body::mover(Category::Asteroid, rock))
    }

    #[test]
    fn test_new_game_is_playing() {
        let game = new_game(1);
        let nodes = game.nodes();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.scene().get(nodes.player).unwrap().visible);
        assert!(!game.scene().get(nodes.game_over).unwrap().visible);
        assert_eq!(
            game.scene().get(nodes.score_label).unwrap().text.as_deref(),
            Some("Destroyed Tie Fighters: 0")
        );
    }

    #[test]
    fn test_enemy_collision_scenario() {
        let mut game = new_game(2);
        let e1 = game.spawn_enemy().unwrap();
        let visual = game.visual_of(e1).unwrap();

        assert_eq!(game.on_contact(&tie_hit(1, e1)), ContactOutcome::TieDestroyed(1));
        assert_eq!(game.destroyed_count(), 1);
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(game.state().mover(e1).is_none());
        assert!(game.scene().get(visual).is_none());
        assert_eq!(
            game.scene().get(game.nodes().score_label).unwrap().text.as_deref(),
            Some("Destroyed Tie Fighters: 1")
        );
    }

    #[test]
    fn test_hazard_collision_scenario() {
        let mut game = new_game(3);
        let h1 = game.spawn_hazard().unwrap();
        let visual = game.visual_of(h1).unwrap();

        assert_eq!(game.on_contact(&rock_hit(1, h1)), ContactOutcome::GameOver);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(!game.state().player.visible);
        assert!(!game.scene().get(game.nodes().player).unwrap().visible);
        assert!(game.scene().get(game.nodes().game_over).unwrap().visible);
        assert!(game.state().mover(h1).is_none());
        assert!(game.scene().get(visual).is_none());
    }

    #[test]
    fn test_n_enemy_contacts_count_n() {
        let mut game = new_game(4);
        for n in 0..6 {
            let tie = game.spawn_enemy().unwrap();
            game.on_contact(&tie_hit(100 + n, tie));
        }
        assert_eq!(game.destroyed_count(), 6);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_hazard_ends_game_regardless_of_score() {
        let mut game = new_game(5);
        for n in 0..3 {
            let tie = game.spawn_enemy().unwrap();
            game.on_contact(&tie_hit(n, tie));
        }
        let rock = game.spawn_hazard().unwrap();
        game.on_contact(&rock_hit(99, rock));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_restart_inside_indicator() {
        let mut game = new_game(6);
        let tie = game.spawn_enemy().unwrap();
        game.on_contact(&tie_hit(1, tie));
        game.end_game();
        assert_eq!(game.phase(), GamePhase::GameOver);

        assert!(game.on_restart_tap(Vec2::new(10.0, -10.0)));
        assert_eq!(game.phase(), GamePhase::Playing);
        assert_eq!(game.destroyed_count(), 0);
        assert!(!game.scene().get(game.nodes().game_over).unwrap().visible);
    }

    #[test]
    fn test_restart_outside_indicator() {
        let mut game = new_game(7);
        game.end_game();
        assert!(!game.on_restart_tap(Vec2::new(0.0, 600.0)));
        assert_eq!(game.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_tap_while_playing_does_nothing() {
        let mut game = new_game(8);
        let session = game.state().session;
        game.handle_input(InputEvent::TouchDown(Vec2::ZERO));
        assert_eq!(game.state().session, session);
    }

    #[test]
    fn test_double_start_keeps_one_schedule_each() {
        let mut game = new_game(9);
        game.start_game();
        game.start_game();
        let timers = game.scheduler();
        assert_eq!(timers.periodic_count(TimerEvent::SpawnEnemy), 1);
        assert_eq!(timers.periodic_count(TimerEvent::SpawnHazard), 1);
    }

    #[test]
    fn test_end_game_cancels_spawning() {
        let mut game = new_game(10);
        game.end_game();
        assert_eq!(game.scheduler().periodic_count(TimerEvent::SpawnEnemy), 0);
        assert_eq!(game.scheduler().periodic_count(TimerEvent::SpawnHazard), 0);

        for _ in 0..300 {
            game.advance(1.0 / 60.0);
        }
        assert!(game.state().movers.is_empty());
        assert_eq!(game.scene().count_of(VisualKind::Tie), 0);
    }

    #[test]
    fn test_stale_timer_ignored() {
        let mut game = new_game(11);
        let old_session = game.state().session;
        game.start_game();
        game.on_timer(Timer::new(old_session, TimerEvent::SpawnEnemy));
        assert!(game.state().movers.is_empty());

        game.on_timer(Timer::new(game.state().session, TimerEvent::SpawnEnemy));
        assert_eq!(game.state().movers.len(), 1);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut game = new_game(12);
        // 0.0s fires both, then ties at 1.0 and asteroids at 2.0
        let mut ties = 0;
        let mut rocks = 0;
        for _ in 0..150 {
            let before: Vec<EntityId> = game.state().movers.iter().map(|m| m.id).collect();
            game.advance(1.0 / 100.0);
            for m in &game.state().movers {
                if !before.contains(&m.id) {
                    match m.kind {
                        MoverKind::Tie => ties += 1,
                        MoverKind::Asteroid => rocks += 1,
                    }
                }
            }
        }
        assert_eq!(ties, 2);
        assert_eq!(rocks, 1);
    }

    #[test]
    fn test_movers_retire_with_their_visuals() {
        let mut game = new_game(13);
        game.end_game();
        game.start_game();
        let tie = game.spawn_enemy().unwrap();
        let visual = game.visual_of(tie).unwrap();
        for _ in 0..(5 * 60) {
            game.advance(1.0 / 60.0);
            if game.state().mover(tie).is_none() {
                break;
            }
        }
        assert!(game.state().mover(tie).is_none());
        assert!(game.scene().get(visual).is_none());
        assert!(game.visual_of(tie).is_none());
    }

    #[test]
    fn test_positions_follow_motion() {
        let mut game = new_game(14);
        let tie = game.spawn_enemy().unwrap();
        game.tick(0.5);
        let expected = game.state().mover(tie).unwrap().position(game.state().time);
        let visual = game.visual_of(tie).unwrap();
        assert_eq!(game.scene().get(visual).unwrap().pos, expected);
    }

    #[test]
    fn test_move_player_only_while_playing() {
        let mut game = new_game(15);
        let target = Vec2::new(-900.0, 40.0);
        game.handle_input(InputEvent::TouchMove(target));
        assert_eq!(game.state().player.pos, target);
        assert_eq!(game.scene().get(game.nodes().player).unwrap().pos, target);

        game.end_game();
        assert!(!game.move_player(Vec2::ZERO));
        assert_eq!(game.state().player.pos, target);
    }

    #[test]
    fn test_raw_collision_bits() {
        let mut game = new_game(16);
        let tie = game.spawn_enemy().unwrap();
        let outcome = game.on_collision(
            ContactId::Host(1),
            0b010,
            0b001,
            EntityRef::Mover(tie),
            EntityRef::Player,
        );
        assert_eq!(outcome, ContactOutcome::TieDestroyed(1));

        let rock = game.spawn_hazard().unwrap();
        // Tie-vs-asteroid never matters
        let outcome = game.on_collision(
            ContactId::Host(2),
            0b010,
            0b100,
            EntityRef::Mover(tie),
            EntityRef::Mover(rock),
        );
        assert_eq!(outcome, ContactOutcome::Ignored);
        assert_eq!(game.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_restart_clears_leftovers() {
        let mut game = new_game(17);
        game.spawn_enemy();
        game.spawn_hazard();
        let rock = game.spawn_hazard().unwrap();
        game.on_contact(&rock_hit(1, rock));
        assert_eq!(game.state().movers.len(), 2);

        game.on_restart_tap(Vec2::ZERO);
        assert!(game.state().movers.is_empty());
        assert_eq!(game.scene().count_of(VisualKind::Tie), 0);
        assert_eq!(game.scene().count_of(VisualKind::Asteroid), 0);
        // Only the leftover arrival timers are gone; fresh spawn timers remain
        assert_eq!(game.scheduler().len(), 2);
    }

    #[test]
    fn test_overlap_detection_drives_contacts() {
        let mut game = new_game(18);
        let tie = game.spawn_enemy().unwrap();
        let x = game.state().mover(tie).unwrap().motion.from.x;
        // Park the ship in the tie's lane and wait for it to arrive
        game.move_player(Vec2::new(x, 0.0));

        let mut destroyed = false;
        for _ in 0..(4 * 60) {
            game.tick(1.0 / 60.0);
            let hits = game.resolve_overlaps();
            if hits.contains(&ContactOutcome::TieDestroyed(1)) {
                destroyed = true;
                break;
            }
        }
        assert!(destroyed);
        assert_eq!(game.destroyed_count(), 1);
        assert!(game.state().mover(tie).is_none());
    }

    #[test]
    fn test_removal_reason_for_collisions() {
        let mut state = GameState::new(1, Settings::default());
        state.start_game();
        let tie = sim::spawn_enemy(&mut state).unwrap();
        state.drain_events();
        sim::handle_contact(&mut state, &tie_hit(1, tie));
        assert!(state.drain_events().contains(&GameEvent::Removed {
            id: tie,
            reason: RemovalReason::Collided
        }));
    }
}
