//! Values that report when they change.
//!
//! [`ObservableProperty`] stores a value and compares every write against the
//! stored one using an equality tolerance. The comparison result is reported
//! as a [`PropertyChange`]; the world-level setters in
//! [`systems::property`](crate::systems::property) turn it into a
//! [`PropertyChanged`](crate::events::property::PropertyChanged) event.

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};

/// Outcome of writing to an [`ObservableProperty`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyChange {
    /// First write.
    Initialized,
    /// The value differs from the previous one.
    Modified,
    /// The value is equal, within tolerance, to the previous one.
    Unmodified,
}

/// Value type usable in an [`ObservableProperty`].
pub trait ObservableValue: Copy + Send + Sync + 'static {
    fn approx_eq(&self, other: &Self, tolerance: f32) -> bool;
}

impl ObservableValue for f32 {
    fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        (self - other).abs() <= tolerance
    }
}

impl ObservableValue for Vec2 {
    fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.abs_diff_eq(*other, tolerance)
    }
}

impl ObservableValue for Vec3 {
    fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        self.abs_diff_eq(*other, tolerance)
    }
}

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ObservableProperty<T: ObservableValue> {
    pub enabled: bool,
    /// Tolerance within which two values are considered equal.
    pub equality_tolerance: f32,
    data: Option<T>,
}

pub type FloatObservableProperty = ObservableProperty<f32>;
pub type Vector2ObservableProperty = ObservableProperty<Vec2>;
pub type Vector3ObservableProperty = ObservableProperty<Vec3>;

impl<T: ObservableValue> Default for ObservableProperty<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ObservableValue> ObservableProperty<T> {
    pub fn new() -> Self {
        Self {
            enabled: true,
            equality_tolerance: f32::EPSILON,
            data: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.equality_tolerance = tolerance;
        self
    }

    pub fn data(&self) -> Option<T> {
        self.data
    }

    /// Store `value` and report how it compares with the previous value.
    pub fn set(&mut self, value: T) -> PropertyChange {
        let change = match self.data {
            None => PropertyChange::Initialized,
            Some(previous) if previous.approx_eq(&value, self.equality_tolerance) => {
                PropertyChange::Unmodified
            }
            Some(_) => PropertyChange::Modified,
        };
        self.data = Some(value);
        change
    }

    /// Forget the stored value; the next write reports `Initialized`.
    pub fn clear(&mut self) {
        self.data = None;
    }
}
