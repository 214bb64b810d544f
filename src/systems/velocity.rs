//! Velocity systems and helpers.
//!
//! - [`artificial_velocity_system`] moves the targets of every processing
//!   [`ArtificialVelocityApplier`] and stops appliers that became invalid.
//! - [`multiplied_velocity`] / [`multiplied_angular_velocity`] read a
//!   [`VelocityMultiplier`] through its source tracker.

use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::gameobject::LocalTransform;
use crate::components::velocity::{ArtificialVelocityApplier, VelocityMultiplier, VelocityTracker};
use crate::resources::worldtime::WorldTime;
use crate::systems::hierarchy::{self, Activity};

/// Advance every applier by the current step delta and move its target.
///
/// Appliers that are disabled or inactive stop decelerating, matching what
/// switching them off does.
pub fn artificial_velocity_system(
    time: Res<WorldTime>,
    activity: Activity,
    mut appliers: Query<(Entity, &mut ArtificialVelocityApplier)>,
    mut transforms: Query<&mut LocalTransform>,
) {
    let delta = time.step_delta();
    for (entity, mut applier) in appliers.iter_mut() {
        if !applier.is_processing() {
            continue;
        }
        if !applier.enabled || !activity.is_active_in_hierarchy(entity) {
            applier.cancel_deceleration();
            continue;
        }
        let Some(step) = applier.step(delta) else {
            continue;
        };
        let Some(target) = applier.target else {
            continue;
        };
        if let Ok(mut transform) = transforms.get_mut(target) {
            transform.rotation *= step.rotation;
            transform.position += step.translation;
        }
    }
}

/// Start decelerating `applier` if it is enabled and active.
pub fn apply_artificial_velocity(world: &mut World, applier: Entity) {
    let valid = world
        .get::<ArtificialVelocityApplier>(applier)
        .is_some_and(|a| a.enabled && hierarchy::is_active_in_hierarchy(world, applier));
    if let Some(mut component) = world.get_mut::<ArtificialVelocityApplier>(applier) {
        component.apply(valid);
    }
}

/// Drop the applier target if it is enabled and active.
pub fn clear_artificial_velocity_target(world: &mut World, applier: Entity) {
    let valid = world
        .get::<ArtificialVelocityApplier>(applier)
        .is_some_and(|a| a.enabled && hierarchy::is_active_in_hierarchy(world, applier));
    if !valid {
        return;
    }
    if let Some(mut component) = world.get_mut::<ArtificialVelocityApplier>(applier) {
        component.target = None;
    }
}

fn active_source<'w>(
    world: &'w World,
    multiplier: Entity,
) -> Option<(&'w VelocityMultiplier, &'w VelocityTracker)> {
    let component = world.get::<VelocityMultiplier>(multiplier)?;
    if !component.enabled || !hierarchy::is_active_in_hierarchy(world, multiplier) {
        return None;
    }
    let source = component.source?;
    let tracker = world.get::<VelocityTracker>(source)?;
    if !tracker.enabled || !hierarchy::is_active_in_hierarchy(world, source) {
        return None;
    }
    Some((component, tracker))
}

/// Source velocity scaled by the multiplier factor, or zero when either side
/// is not valid.
pub fn multiplied_velocity(world: &World, multiplier: Entity) -> Vec3 {
    active_source(world, multiplier)
        .map(|(m, t)| t.velocity * m.velocity_multiplier_factor)
        .unwrap_or(Vec3::ZERO)
}

/// Source angular velocity scaled by the multiplier factor, or zero when
/// either side is not valid.
pub fn multiplied_angular_velocity(world: &World, multiplier: Entity) -> Vec3 {
    active_source(world, multiplier)
        .map(|(m, t)| t.angular_velocity * m.angular_velocity_multiplier_factor)
        .unwrap_or(Vec3::ZERO)
}

/// Drop the multiplier source if the multiplier is enabled and active.
pub fn clear_velocity_multiplier_source(world: &mut World, multiplier: Entity) {
    let valid = world
        .get::<VelocityMultiplier>(multiplier)
        .is_some_and(|m| m.enabled && hierarchy::is_active_in_hierarchy(world, multiplier));
    if !valid {
        return;
    }
    if let Some(mut component) = world.get_mut::<VelocityMultiplier>(multiplier) {
        component.source = None;
    }
}
