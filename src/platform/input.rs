//! Touch input reported by the host

use glam::Vec2;

/// A touch in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Finger down; restarts the run when it lands on the game-over indicator
    TouchDown(Vec2),
    /// Finger dragged; the ship follows it
    TouchMove(Vec2),
}

impl InputEvent {
    pub fn position(&self) -> Vec2 {
        match *self {
            InputEvent::TouchDown(pos) | InputEvent::TouchMove(pos) => pos,
        }
    }
}
