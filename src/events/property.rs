//! Value notifications from remappers and observable properties.
use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};

use crate::components::observableproperty::PropertyChange;

/// Value written to an observable property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropertyValue {
    Float(f32),
    Vector2(Vec2),
    Vector3(Vec3),
}

impl From<f32> for PropertyValue {
    fn from(value: f32) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<Vec2> for PropertyValue {
    fn from(value: Vec2) -> Self {
        PropertyValue::Vector2(value)
    }
}

impl From<Vec3> for PropertyValue {
    fn from(value: Vec3) -> Self {
        PropertyValue::Vector3(value)
    }
}

/// An observable property on `entity` was written.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PropertyChanged {
    pub entity: Entity,
    pub change: PropertyChange,
    pub value: PropertyValue,
}

/// A remapper on `entity` produced `value`.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FloatTransformed {
    pub entity: Entity,
    pub value: f32,
}
