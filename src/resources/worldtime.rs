use bevy_ecs::prelude::Resource;

/// Frame timing shared by time-dependent systems.
///
/// `in_fixed_time_step` tells systems that the current update is a fixed step,
/// in which case [`WorldTime::step_delta`] reports `fixed_delta`.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub fixed_delta: f32,
    pub in_fixed_time_step: bool,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            fixed_delta: 0.02,
            in_fixed_time_step: false,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_fixed_delta(mut self, fixed_delta: f32) -> Self {
        self.fixed_delta = fixed_delta;
        self
    }

    /// Delta for the step currently running.
    pub fn step_delta(&self) -> f32 {
        if self.in_fixed_time_step {
            self.fixed_delta
        } else {
            self.delta
        }
    }
}
