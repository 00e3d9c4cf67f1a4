//! Scripted linear motion
//!
//! Movers never steer. Each one carries where it started, where it is headed,
//! when it left and how long the trip takes; its position at any moment is
//! derived from that, so nothing mutates positions except the clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight-line trip from `from` to `to`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearMotion {
    pub from: Vec2,
    pub to: Vec2,
    /// Simulation time the trip began (seconds)
    pub start: f64,
    /// Trip length (seconds)
    pub duration: f32,
}

impl LinearMotion {
    pub fn new(from: Vec2, to: Vec2, start: f64, duration: f32) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// Fraction of the trip completed at `time`, clamped to [0, 1]
    pub fn progress(&self, time: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((time - self.start) / f64::from(self.duration)).clamp(0.0, 1.0) as f32
    }

    /// Position at `time`
    pub fn position_at(&self, time: f64) -> Vec2 {
        self.from.lerp(self.to, self.progress(time))
    }

    /// Simulation time at which the mover arrives
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.start + f64::from(self.duration)
    }

    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.end_time()
    }

    /// Seconds left until arrival
    pub fn remaining(&self, time: f64) -> f32 {
        (self.end_time() - time).max(0.0) as f32
    }

    /// Velocity along the path (constant)
    pub fn velocity(&self) -> Vec2 {
        if self.duration <= 0.0 {
            Vec2::ZERO
        } else {
            (self.to - self.from) / self.duration
        }
    }
}
