//! World-level setters for remappers and observable properties.
//!
//! Both follow the usual tolerance: a missing component, a disabled
//! component or an inactive entity makes the call a no-op.

use bevy_ecs::prelude::*;

use crate::components::floatremapper::FloatRangeValueRemapper;
use crate::components::observableproperty::{ObservableProperty, ObservableValue, PropertyChange};
use crate::events::property::{FloatTransformed, PropertyChanged, PropertyValue};
use crate::systems::hierarchy;

/// Remap `input` with the remapper on `entity` and trigger [`FloatTransformed`].
pub fn transform_float(world: &mut World, entity: Entity, input: f32) -> Option<f32> {
    if !hierarchy::is_active_in_hierarchy(world, entity) {
        return None;
    }
    let value = world.get::<FloatRangeValueRemapper>(entity)?.remap(input);
    world.trigger(FloatTransformed { entity, value });
    Some(value)
}

/// Write `value` to the property on `entity` and trigger [`PropertyChanged`].
pub fn set_property<T>(world: &mut World, entity: Entity, value: T) -> Option<PropertyChange>
where
    T: ObservableValue + Into<PropertyValue>,
{
    let valid = world
        .get::<ObservableProperty<T>>(entity)
        .is_some_and(|p| p.enabled && hierarchy::is_active_in_hierarchy(world, entity));
    if !valid {
        return None;
    }
    let change = world.get_mut::<ObservableProperty<T>>(entity)?.set(value);
    world.trigger(PropertyChanged {
        entity,
        change,
        value: value.into(),
    });
    Some(change)
}
