//! Interval-driven processes.
//!
//! A [`MomentProcess`] wraps a registered system and runs it at most once per
//! `interval` seconds. A [`CompositeProcess`] drives an ordered list of moment
//! processes every frame; see
//! [`composite_process_system`](crate::systems::process::composite_process_system).

use bevy_ecs::prelude::{Component, Entity};
use bevy_ecs::system::SystemId;
use fastrand::Rng;

#[derive(Component, Clone, Debug)]
pub struct MomentProcess {
    pub enabled: bool,
    /// System run when the process fires.
    pub source: Option<SystemId>,
    /// Only fire while the process entity is active and the component enabled.
    pub only_process_on_active_and_enabled: bool,
    /// Time at which the process may fire next.
    pub next_process_time: f32,
    interval: f32,
}

impl MomentProcess {
    pub fn new(source: SystemId) -> Self {
        Self {
            enabled: true,
            source: Some(source),
            only_process_on_active_and_enabled: true,
            next_process_time: 0.0,
            interval: 0.0,
        }
    }

    pub fn with_interval(mut self, interval: f32) -> Self {
        self.set_interval(interval);
        self
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Negative intervals are clamped to zero.
    pub fn set_interval(&mut self, interval: f32) {
        self.interval = interval.max(0.0);
    }

    pub fn is_due(&self, now: f32) -> bool {
        self.next_process_time <= now
    }

    pub fn update_next_process_time(&mut self, now: f32) {
        self.next_process_time = now + self.interval;
    }

    /// Pick a first fire time in `[now, now + interval)` so that processes
    /// sharing an interval do not all fire on the same frame.
    pub fn randomize_next_process_time(&mut self, now: f32, rng: &mut Rng) {
        self.next_process_time = now + rng.f32() * self.interval;
    }

    pub fn clear_source(&mut self) {
        self.source = None;
    }
}

/// Ordered list of moment process entities processed together.
#[derive(Component, Clone, Debug, Default)]
pub struct CompositeProcess {
    pub processes: Option<Vec<Entity>>,
}

impl CompositeProcess {
    pub fn new(processes: impl IntoIterator<Item = Entity>) -> Self {
        Self {
            processes: Some(processes.into_iter().collect()),
        }
    }
}
