//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No scene, scheduler or platform dependencies; changes are reported as
//!   [`GameEvent`]s

pub mod collision;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{
    Body, Contact, ContactId, ContactKind, ContactOutcome, EntityRef, Shape, classify,
    detect_contacts, handle_contact, overlaps,
};
pub use motion::LinearMotion;
pub use spawn::{Side, spawn_enemy, spawn_hazard};
pub use state::{
    Category, CategoryMask, EntityId, GameEvent, GamePhase, GameState, Mover, MoverKind, Player,
    RemovalReason,
};
pub use tick::{arrive, tick};
