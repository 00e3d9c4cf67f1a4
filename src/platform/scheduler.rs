//! Scheduler collaborator
//!
//! Timers carry a [`TimerEvent`] instead of a closure, tagged with the session
//! that scheduled them so a late delivery can be recognised as stale.

use std::collections::BTreeMap;

use crate::sim::EntityId;

/// Opaque timer handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(pub u64);

/// What a timer asks the game to do when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    SpawnEnemy,
    SpawnHazard,
    /// A mover should have reached the end of its path
    Arrive(EntityId),
}

/// A timer payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timer {
    pub session: u32,
    pub event: TimerEvent,
}

impl Timer {
    pub fn new(session: u32, event: TimerEvent) -> Self {
        Self { session, event }
    }
}

/// Timer collaborator contract
pub trait Scheduler {
    /// Fire `timer` now and then every `interval` seconds until cancelled
    fn schedule_periodic(&mut self, interval: f32, timer: Timer) -> ScheduleHandle;
    /// Fire `timer` once after `delay` seconds
    fn schedule_once(&mut self, delay: f32, timer: Timer) -> ScheduleHandle;
    /// Stop a timer; unknown or finished handles are ignored
    fn cancel(&mut self, handle: ScheduleHandle);
}

/// Smallest accepted period, keeps a bad interval from spinning forever
const MIN_INTERVAL: f32 = 1.0 / 1000.0;

#[derive(Debug, Clone)]
struct Entry {
    due: f64,
    interval: Option<f64>,
    timer: Timer,
}

/// Deterministic timer queue driven by an explicit clock
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: f64,
    next_handle: u64,
    entries: BTreeMap<ScheduleHandle, Entry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current queue time (seconds)
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Move the clock forward. Due timers are collected with [`Self::pop_due`].
    pub fn advance(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.now += f64::from(dt);
        }
    }

    /// Take the earliest timer that is due, rescheduling it if periodic.
    /// Ties are broken by handle so firing order is stable.
    pub fn pop_due(&mut self) -> Option<Timer> {
        let (&handle, _) = self
            .entries
            .iter()
            .filter(|(_, e)| e.due <= self.now)
            .min_by(|(ha, a), (hb, b)| a.due.total_cmp(&b.due).then(ha.cmp(hb)))?;

        let entry = self.entries.get_mut(&handle)?;
        let timer = entry.timer;
        match entry.interval {
            Some(interval) => entry.due += interval,
            None => {
                self.entries.remove(&handle);
            }
        }
        Some(timer)
    }

    pub fn is_active(&self, handle: ScheduleHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Number of pending timers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pending periodic timers carrying `event`
    pub fn periodic_count(&self, event: TimerEvent) -> usize {
        self.entries
            .values()
            .filter(|e| e.interval.is_some() && e.timer.event == event)
            .count()
    }

    fn insert(&mut self, due: f64, interval: Option<f64>, timer: Timer) -> ScheduleHandle {
        self.next_handle += 1;
        let handle = ScheduleHandle(self.next_handle);
        self.entries.insert(
            handle,
            Entry {
                due,
                interval,
                timer,
            },
        );
        handle
    }
}

impl Scheduler for TimerQueue {
    fn schedule_periodic(&mut self, interval: f32, timer: Timer) -> ScheduleHandle {
        let interval = if interval.is_finite() && interval >= MIN_INTERVAL {
            interval
        } else {
            log::warn!("Periodic interval {interval} too small, using {MIN_INTERVAL}");
            MIN_INTERVAL
        };
        self.insert(self.now, Some(f64::from(interval)), timer)
    }

    fn schedule_once(&mut self, delay: f32, timer: Timer) -> ScheduleHandle {
        let delay = if delay.is_finite() { delay.max(0.0) } else { 0.0 };
        self.insert(self.now + f64::from(delay), None, timer)
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.entries.remove(&handle);
    }
}
