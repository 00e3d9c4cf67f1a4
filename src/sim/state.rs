//! Game state and core simulation types
//!
//! Everything a run needs to be replayed from its seed lives here.

use std::collections::HashSet;

use bitflags::bitflags;
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::ContactId;
use super::motion::LinearMotion;
use crate::settings::Settings;

/// Entity identifier, unique within a [`GameState`]
pub type EntityId = u32;

bitflags! {
    /// Raw collision category bits as reported by a physics host
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CategoryMask: u32 {
        const PLAYER = 0b001;
        const TIE = 0b010;
        const ASTEROID = 0b100;
    }
}

/// Collision category of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Tie,
    Asteroid,
}

impl Category {
    pub fn bits(self) -> CategoryMask {
        match self {
            Category::Player => CategoryMask::PLAYER,
            Category::Tie => CategoryMask::TIE,
            Category::Asteroid => CategoryMask::ASTEROID,
        }
    }

    /// Decode a host bitmask. Exactly one known bit must be set.
    pub fn from_bits(bits: u32) -> Option<Self> {
        let mask = CategoryMask::from_bits(bits)?;
        if mask == CategoryMask::PLAYER {
            Some(Category::Player)
        } else if mask == CategoryMask::TIE {
            Some(Category::Tie)
        } else if mask == CategoryMask::ASTEROID {
            Some(Category::Asteroid)
        } else {
            None
        }
    }

    /// Categories this body reports contacts with
    pub fn contact_test_mask(self) -> CategoryMask {
        match self {
            Category::Player => CategoryMask::TIE | CategoryMask::ASTEROID,
            Category::Tie | Category::Asteroid => CategoryMask::PLAYER,
        }
    }
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Spawning and contacts are live
    Playing,
    /// Run ended, waiting for a restart tap
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Hidden while the game is over
    pub visible: bool,
}

/// What a mover is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoverKind {
    /// Tie fighter: falls from the top edge, worth a point when rammed
    Tie,
    /// Asteroid: crosses from one side to the other, ends the run on contact
    Asteroid,
}

impl MoverKind {
    pub fn category(self) -> Category {
        match self {
            MoverKind::Tie => Category::Tie,
            MoverKind::Asteroid => Category::Asteroid,
        }
    }
}

/// An enemy or hazard travelling along its scripted path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mover {
    pub id: EntityId,
    pub kind: MoverKind,
    pub motion: LinearMotion,
}

impl Mover {
    #[inline]
    pub fn position(&self, time: f64) -> Vec2 {
        self.motion.position_at(time)
    }

    #[inline]
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

/// Why a mover left the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemovalReason {
    /// Reached the end of its path
    Arrived,
    /// Hit the player
    Collided,
    /// Swept away by a new run
    Cleared,
}

/// Things the outside world needs to hear about, drained after each operation
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    PlayerMoved(Vec2),
    PlayerVisibility(bool),
    DestroyedCount(u32),
    Spawned {
        id: EntityId,
        kind: MoverKind,
        pos: Vec2,
        /// Seconds until arrival
        duration: f32,
    },
    Moved {
        id: EntityId,
        pos: Vec2,
    },
    Removed {
        id: EntityId,
        reason: RemovalReason,
    },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Bumped by every `start_game`; timers from older sessions are stale
    pub session: u32,
    /// Tie fighters rammed this session
    pub destroyed_count: u32,
    /// Simulation clock (seconds), advanced only by `tick`
    pub time: f64,
    pub player: Player,
    /// Live movers, sorted by id
    pub movers: Vec<Mover>,
    /// Contact resolved since the last tick or mover removal
    #[serde(skip)]
    pub handled_contacts: HashSet<ContactId>,
    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create an idle state; nothing spawns until `start_game`
    pub fn new(seed: u64, settings: Settings) -> Self {
        let player = Player {
            pos: settings.player_start,
            visible: false,
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            phase: GamePhase::GameOver,
            session: 0,
            destroyed_count: 0,
            time: 0.0,
            player,
            movers: Vec::new(),
            handled_contacts: HashSet::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Begin a fresh run. Safe to call from either phase.
    pub fn start_game(&mut self) {
        self.session += 1;
        self.destroyed_count = 0;
        self.handled_contacts.clear();

        let leftovers: Vec<EntityId> = self.movers.iter().map(|m| m.id).collect();
        for id in leftovers {
            self.remove_mover(id, RemovalReason::Cleared);
        }

        self.player.pos = self.settings.player_start;
        self.player.visible = true;
        self.phase = GamePhase::Playing;

        self.emit(GameEvent::DestroyedCount(0));
        self.emit(GameEvent::PlayerMoved(self.player.pos));
        self.emit(GameEvent::PlayerVisibility(true));
        self.emit(GameEvent::PhaseChanged(GamePhase::Playing));

        log::info!("Session {} started (seed {})", self.session, self.seed);
    }

    /// End the current run
    pub fn end_game(&mut self) {
        if self.phase != GamePhase::Playing {
            log::debug!("end_game ignored: already over");
            return;
        }
        self.phase = GamePhase::GameOver;
        self.player.visible = false;

        self.emit(GameEvent::PlayerVisibility(false));
        self.emit(GameEvent::PhaseChanged(GamePhase::GameOver));

        log::info!(
            "Session {} over: {} tie fighters destroyed",
            self.session,
            self.destroyed_count
        );
    }

    /// Teleport the ship to a touch position. Ignored while the game is over.
    pub fn move_player(&mut self, pos: Vec2) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if !pos.is_finite() {
            log::warn!("Ignoring non-finite player position {pos:?}");
            return false;
        }
        self.player.pos = pos;
        self.emit(GameEvent::PlayerMoved(pos));
        true
    }

    /// True when a touch at `pos` should restart the run
    pub fn is_restart_tap(&self, pos: Vec2) -> bool {
        self.phase == GamePhase::GameOver && self.settings.game_over_rect().contains(pos)
    }

    pub fn mover(&self, id: EntityId) -> Option<&Mover> {
        self.movers.iter().find(|m| m.id == id)
    }

    /// Add a mover starting its trip now
    pub(crate) fn add_mover(&mut self, kind: MoverKind, from: Vec2, to: Vec2, duration: f32) -> EntityId {
        let id = self.next_entity_id();
        let motion = LinearMotion::new(from, to, self.time, duration);
        self.movers.push(Mover { id, kind, motion });
        self.emit(GameEvent::Spawned {
            id,
            kind,
            pos: from,
            duration,
        });
        id
    }

    /// Remove a mover; unknown ids are ignored
    pub fn remove_mover(&mut self, id: EntityId, reason: RemovalReason) -> Option<Mover> {
        let idx = self.movers.iter().position(|m| m.id == id)?;
        let mover = self.movers.remove(idx);
        // Handled contacts only ever name removed movers, which `mover` no longer finds
        self.handled_contacts.clear();
        self.emit(GameEvent::Removed { id, reason });
        Some(mover)
    }

    /// Ensure movers are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.movers.sort_by_key(|m| m.id);
    }
}
