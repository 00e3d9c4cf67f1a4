//! Platform abstraction layer
//!
//! Contracts the host fulfils for the game core:
//! - `scene`: creating, moving and removing visual nodes
//! - `scheduler`: periodic and one-shot timers
//! - `input`: touch events
//!
//! In-memory implementations ([`RecordingScene`], [`TimerQueue`]) let the core
//! run headless and under test.

pub mod input;
pub mod scene;
pub mod scheduler;

pub use input::InputEvent;
pub use scene::{RecordingScene, Scene, Visual, VisualHandle, VisualKind};
pub use scheduler::{ScheduleHandle, Scheduler, Timer, TimerEvent, TimerQueue};
