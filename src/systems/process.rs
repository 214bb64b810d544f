//! Moment process systems.
//!
//! # System Flow
//!
//! Each frame:
//!
//! 1. `schedule_new_moment_processes` gives newly added processes a random
//!    first fire time within their interval.
//! 2. `composite_process_system` walks every [`CompositeProcess`] in list
//!    order and queues the source system of each due [`MomentProcess`].
//! 3. Queued systems run when the schedule applies its commands, in the
//!    order they were queued.

use bevy_ecs::prelude::*;
use fastrand::Rng;
use log::warn;

use crate::components::momentprocess::{CompositeProcess, MomentProcess};
use crate::resources::worldtime::WorldTime;
use crate::systems::hierarchy::{self, Activity};

/// Randomise the first fire time of newly added moment processes.
pub fn schedule_new_moment_processes(
    time: Res<WorldTime>,
    mut rng: Local<Rng>,
    mut added: Query<&mut MomentProcess, Added<MomentProcess>>,
) {
    for mut process in added.iter_mut() {
        process.randomize_next_process_time(time.elapsed, &mut rng);
    }
}

fn can_process(process: &MomentProcess, active_in_hierarchy: bool) -> bool {
    !process.only_process_on_active_and_enabled || (process.enabled && active_in_hierarchy)
}

/// Run the due moment processes of every composite, in list order.
pub fn composite_process_system(
    time: Res<WorldTime>,
    activity: Activity,
    composites: Query<&CompositeProcess>,
    mut processes: Query<&mut MomentProcess>,
    mut commands: Commands,
) {
    let now = time.elapsed;
    for composite in composites.iter() {
        let Some(list) = &composite.processes else {
            continue;
        };
        for entity in list {
            let Ok(mut process) = processes.get_mut(*entity) else {
                continue;
            };
            if !process.is_due(now) {
                continue;
            }
            let Some(source) = process.source else {
                continue;
            };
            if !can_process(&process, activity.is_active_in_hierarchy(*entity)) {
                continue;
            }
            commands.run_system(source);
            process.update_next_process_time(now);
        }
    }
}

/// Run a moment process immediately, ignoring its schedule.
///
/// Returns whether the source system ran.
pub fn process_now(world: &mut World, entity: Entity) -> bool {
    let Some(process) = world.get::<MomentProcess>(entity) else {
        return false;
    };
    let Some(source) = process.source else {
        return false;
    };
    if !can_process(process, hierarchy::is_active_in_hierarchy(world, entity)) {
        return false;
    }
    if let Err(e) = world.run_system(source) {
        warn!("Moment process {:?} failed to run its source: {}", entity, e);
        return false;
    }
    let now = world
        .get_resource::<WorldTime>()
        .map(|t| t.elapsed)
        .unwrap_or_default();
    if let Some(mut process) = world.get_mut::<MomentProcess>(entity) {
        process.update_next_process_time(now);
    }
    true
}

/// Drop the source of a moment process while it is enabled and active.
pub fn clear_moment_process_source(world: &mut World, entity: Entity) {
    let valid = world
        .get::<MomentProcess>(entity)
        .is_some_and(|p| p.enabled && hierarchy::is_active_in_hierarchy(world, entity));
    if !valid {
        return;
    }
    if let Some(mut process) = world.get_mut::<MomentProcess>(entity) {
        process.clear_source();
    }
}
