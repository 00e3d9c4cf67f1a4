//! Contact classification and resolution
//!
//! A physics host (or [`detect_contacts`]) reports contacts between two
//! bodies. Only player-vs-mover pairs matter: ramming a tie fighter scores,
//! touching an asteroid ends the run. Pairs are classified without regard to
//! which body came first, and each contact id is resolved at most once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Category, EntityId, GameEvent, GameState, RemovalReason};
use crate::Rect;

/// Identity of one physical contact. Hosts that report a contact twice
/// (once per body ordering) must reuse the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactId {
    /// Numbered by a physics host
    Host(u64),
    /// Found by [`detect_contacts`]: the player touching this mover
    Overlap(EntityId),
}

impl ContactId {
    /// Stable id for the player touching a given mover
    pub fn player_mover(mover: EntityId) -> Self {
        ContactId::Overlap(mover)
    }
}

/// Which entity a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Player,
    Mover(EntityId),
}

/// One side of a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Body {
    pub category: Category,
    pub entity: EntityRef,
}

impl Body {
    pub fn player() -> Self {
        Self {
            category: Category::Player,
            entity: EntityRef::Player,
        }
    }

    pub fn mover(category: Category, id: EntityId) -> Self {
        Self {
            category,
            entity: EntityRef::Mover(id),
        }
    }
}

/// A reported overlap between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(id: ContactId, a: Body, b: Body) -> Self {
        Self { id, a, b }
    }

    /// Build a contact from raw host category bits. Returns `None` (and logs)
    /// when either mask is not exactly one known category.
    pub fn from_raw(
        id: ContactId,
        bits_a: u32,
        bits_b: u32,
        entity_a: EntityRef,
        entity_b: EntityRef,
    ) -> Option<Self> {
        match (Category::from_bits(bits_a), Category::from_bits(bits_b)) {
            (Some(category_a), Some(category_b)) => Some(Self {
                id,
                a: Body {
                    category: category_a,
                    entity: entity_a,
                },
                b: Body {
                    category: category_b,
                    entity: entity_b,
                },
            }),
            _ => {
                log::warn!("Contact {:?} has unknown categories {bits_a:#b}/{bits_b:#b}", id);
                None
            }
        }
    }
}

/// What a contact means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    PlayerTie { tie: EntityId },
    PlayerAsteroid { asteroid: EntityId },
    Ignored,
}

/// Classify a body pair; `(a, b)` and `(b, a)` give the same answer
pub fn classify(a: &Body, b: &Body) -> ContactKind {
    let (player, other) = match (a.category, b.category) {
        (Category::Player, Category::Tie | Category::Asteroid) => (a, b),
        (Category::Tie | Category::Asteroid, Category::Player) => (b, a),
        _ => return ContactKind::Ignored,
    };

    match (player.entity, other.entity, other.category) {
        (EntityRef::Player, EntityRef::Mover(tie), Category::Tie) => ContactKind::PlayerTie { tie },
        (EntityRef::Player, EntityRef::Mover(asteroid), Category::Asteroid) => {
            ContactKind::PlayerAsteroid { asteroid }
        }
        _ => ContactKind::Ignored,
    }
}

/// Result of resolving a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// A tie fighter was destroyed; carries the new count
    TieDestroyed(u32),
    /// An asteroid hit the ship and the run ended
    GameOver,
    /// Nothing happened
    Ignored,
}

/// Resolve a contact against the game state
pub fn handle_contact(state: &mut GameState, contact: &Contact) -> ContactOutcome {
    if state.handled_contacts.contains(&contact.id) {
        log::debug!("Contact {:?} already handled", contact.id);
        return ContactOutcome::Ignored;
    }
    if !state.is_playing() {
        return ContactOutcome::Ignored;
    }

    match classify(&contact.a, &contact.b) {
        ContactKind::PlayerTie { tie } => {
            if !mover_matches(state, tie, Category::Tie) {
                return ContactOutcome::Ignored;
            }
            state.remove_mover(tie, RemovalReason::Collided);
            state.handled_contacts.insert(contact.id);
            state.destroyed_count += 1;
            let count = state.destroyed_count;
            state.emit(GameEvent::DestroyedCount(count));
            log::debug!("Tie {tie} destroyed ({count} total)");
            ContactOutcome::TieDestroyed(count)
        }
        ContactKind::PlayerAsteroid { asteroid } => {
            if !mover_matches(state, asteroid, Category::Asteroid) {
                return ContactOutcome::Ignored;
            }
            state.remove_mover(asteroid, RemovalReason::Collided);
            state.handled_contacts.insert(contact.id);
            log::debug!("Asteroid {asteroid} hit the ship");
            state.end_game();
            ContactOutcome::GameOver
        }
        ContactKind::Ignored => ContactOutcome::Ignored,
    }
}

fn mover_matches(state: &GameState, id: EntityId, category: Category) -> bool {
    match state.mover(id) {
        Some(mover) if mover.category() == category => true,
        Some(mover) => {
            log::warn!(
                "Contact names mover {id} as {category:?} but it is {:?}",
                mover.kind
            );
            false
        }
        None => {
            log::debug!("Contact with unknown mover {id}");
            false
        }
    }
}

/// Collision volume of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box given by half extents
    Box(Vec2),
    Circle(f32),
}

impl Shape {
    /// Volume used for a category under the given settings
    pub fn for_category(category: Category, settings: &crate::Settings) -> Self {
        match category {
            Category::Player => Shape::Box(settings.player_size * 0.5),
            Category::Tie => Shape::Box(settings.tie_size * 0.5),
            Category::Asteroid => Shape::Circle(settings.asteroid_size * 0.5),
        }
    }
}

/// Overlap test between two placed shapes
pub fn overlaps(pos_a: Vec2, a: Shape, pos_b: Vec2, b: Shape) -> bool {
    match (a, b) {
        (Shape::Box(ha), Shape::Box(hb)) => {
            let d = (pos_a - pos_b).abs();
            d.x < ha.x + hb.x && d.y < ha.y + hb.y
        }
        (Shape::Circle(ra), Shape::Circle(rb)) => pos_a.distance_squared(pos_b) < (ra + rb) * (ra + rb),
        (Shape::Box(h), Shape::Circle(r)) => box_circle(pos_a, h, pos_b, r),
        (Shape::Circle(r), Shape::Box(h)) => box_circle(pos_b, h, pos_a, r),
    }
}

fn box_circle(box_pos: Vec2, half: Vec2, circle_pos: Vec2, radius: f32) -> bool {
    let rect = Rect {
        center: box_pos,
        half_extents: half,
    };
    let closest = rect.clamp_point(circle_pos);
    closest.distance_squared(circle_pos) < radius * radius
}

/// Find player-vs-mover overlaps at the current time, for hosts that have no
/// physics engine of their own. Returns nothing while the game is over.
pub fn detect_contacts(state: &GameState) -> Vec<Contact> {
    if !state.is_playing() || !state.player.visible {
        return Vec::new();
    }
    let player_shape = Shape::for_category(Category::Player, &state.settings);

    state
        .movers
        .iter()
        .filter(|mover| {
            let shape = Shape::for_category(mover.category(), &state.settings);
            overlaps(state.player.pos, player_shape, mover.position(state.time), shape)
        })
        .map(|mover| {
            Contact::new(
                ContactId::player_mover(mover.id),
                Body::player(),
                Body::mover(mover.category(), mover.id),
            )
        })
        .collect()
}
