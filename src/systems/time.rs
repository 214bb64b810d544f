//! Time update helpers.
//!
//! Update the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, or around a fixed step.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.in_fixed_time_step = false;
}

/// Run `schedule` as a fixed step: `WorldTime::step_delta` reports the fixed
/// delta while it runs.
pub fn run_fixed_step(world: &mut World, schedule: &mut Schedule) {
    world.resource_mut::<WorldTime>().in_fixed_time_step = true;
    schedule.run(world);
    world.resource_mut::<WorldTime>().in_fixed_time_step = false;
}
