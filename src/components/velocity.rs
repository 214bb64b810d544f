//! Velocity sources and modifiers.
//!
//! - [`VelocityTracker`] reports the velocity of whatever it is attached to.
//! - [`VelocityMultiplier`] scales the readings of another tracker.
//! - [`ArtificialVelocityApplier`] pushes a target with a velocity that decays
//!   under drag until it comes to rest.

use bevy_ecs::prelude::{Component, Entity};
use glam::{EulerRot, Quat, Vec3};

use crate::resources::config::ZinniaConfig;

/// Velocity readings of an entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct VelocityTracker {
    pub enabled: bool,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Default for VelocityTracker {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

impl VelocityTracker {
    pub fn new(velocity: Vec3, angular_velocity: Vec3) -> Self {
        Self {
            enabled: true,
            velocity,
            angular_velocity,
        }
    }
}

/// Scales the readings of a source [`VelocityTracker`] component-wise.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct VelocityMultiplier {
    pub enabled: bool,
    /// Entity carrying the source tracker.
    pub source: Option<Entity>,
    pub velocity_multiplier_factor: Vec3,
    pub angular_velocity_multiplier_factor: Vec3,
}

impl Default for VelocityMultiplier {
    fn default() -> Self {
        Self {
            enabled: true,
            source: None,
            velocity_multiplier_factor: Vec3::ONE,
            angular_velocity_multiplier_factor: Vec3::ONE,
        }
    }
}

impl VelocityMultiplier {
    pub fn with_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }
}

/// Step result of an [`ArtificialVelocityApplier`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityStep {
    pub translation: Vec3,
    pub rotation: Quat,
}

/// Applies an artificial velocity to `target` that decays under drag.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct ArtificialVelocityApplier {
    pub enabled: bool,
    pub target: Option<Entity>,
    pub velocity: Vec3,
    /// Euler angles in degrees applied per step.
    pub angular_velocity: Vec3,
    pub drag: f32,
    pub angular_drag: f32,
    pub nil_velocity_tolerance: f32,
    pub nil_angular_velocity_tolerance: f32,
    can_process: bool,
}

impl Default for ArtificialVelocityApplier {
    fn default() -> Self {
        Self {
            enabled: true,
            target: None,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            drag: 1.0,
            angular_drag: 0.5,
            nil_velocity_tolerance: 0.001,
            nil_angular_velocity_tolerance: 0.001,
            can_process: false,
        }
    }
}

impl ArtificialVelocityApplier {
    pub fn from_config(config: &ZinniaConfig) -> Self {
        Self {
            drag: config.drag,
            angular_drag: config.angular_drag,
            nil_velocity_tolerance: config.nil_velocity_tolerance,
            nil_angular_velocity_tolerance: config.nil_angular_velocity_tolerance,
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn set_velocity_x(&mut self, value: f32) {
        self.velocity.x = value;
    }

    pub fn set_velocity_y(&mut self, value: f32) {
        self.velocity.y = value;
    }

    pub fn set_velocity_z(&mut self, value: f32) {
        self.velocity.z = value;
    }

    pub fn increment_velocity(&mut self, value: Vec3) {
        self.velocity += value;
    }

    pub fn clear_velocity(&mut self) {
        self.velocity = Vec3::ZERO;
    }

    pub fn set_angular_velocity_x(&mut self, value: f32) {
        self.angular_velocity.x = value;
    }

    pub fn set_angular_velocity_y(&mut self, value: f32) {
        self.angular_velocity.y = value;
    }

    pub fn set_angular_velocity_z(&mut self, value: f32) {
        self.angular_velocity.z = value;
    }

    pub fn increment_angular_velocity(&mut self, value: Vec3) {
        self.angular_velocity += value;
    }

    pub fn clear_angular_velocity(&mut self) {
        self.angular_velocity = Vec3::ZERO;
    }

    /// Start decelerating. `valid_state` is whether the applier is enabled
    /// and active; otherwise nothing happens.
    pub fn apply(&mut self, valid_state: bool) {
        if !valid_state {
            return;
        }
        self.can_process = true;
    }

    pub fn cancel_deceleration(&mut self) {
        self.can_process = false;
    }

    pub fn is_processing(&self) -> bool {
        self.can_process
    }

    /// Advance by `delta` seconds.
    ///
    /// Returns the movement to apply to the target, or `None` when not
    /// processing or once the velocities have come to rest (both are then
    /// zeroed and processing stops).
    pub fn step(&mut self, delta: f32) -> Option<VelocityStep> {
        if !self.can_process {
            return None;
        }

        let moving = !self
            .velocity
            .abs_diff_eq(Vec3::ZERO, self.nil_velocity_tolerance)
            || !self
                .angular_velocity
                .abs_diff_eq(Vec3::ZERO, self.nil_angular_velocity_tolerance);
        if !moving {
            self.velocity = Vec3::ZERO;
            self.angular_velocity = Vec3::ZERO;
            self.can_process = false;
            return None;
        }

        self.velocity = self
            .velocity
            .lerp(Vec3::ZERO, (self.drag * delta).clamp(0.0, 1.0));
        self.angular_velocity = self
            .angular_velocity
            .lerp(Vec3::ZERO, (self.angular_drag * delta).clamp(0.0, 1.0));

        Some(VelocityStep {
            translation: self.velocity * delta,
            rotation: euler_degrees(self.angular_velocity),
        })
    }
}

/// Rotation from Euler angles in degrees, applied Z, then X, then Y.
pub fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn axis_setters_and_increments() {
        let mut applier = ArtificialVelocityApplier::default();
        applier.set_velocity_x(1.0);
        applier.set_velocity_y(2.0);
        applier.set_velocity_z(3.0);
        applier.increment_velocity(Vec3::ONE);
        assert_eq!(applier.velocity, Vec3::new(2.0, 3.0, 4.0));

        applier.set_angular_velocity_y(10.0);
        applier.increment_angular_velocity(Vec3::X);
        assert_eq!(applier.angular_velocity, Vec3::new(1.0, 10.0, 0.0));

        applier.clear_velocity();
        applier.clear_angular_velocity();
        assert_eq!(applier.velocity, Vec3::ZERO);
        assert_eq!(applier.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn step_without_apply_does_nothing() {
        let mut applier = ArtificialVelocityApplier {
            velocity: Vec3::X,
            ..Default::default()
        };
        assert!(applier.step(0.1).is_none());
        assert_eq!(applier.velocity, Vec3::X);
    }

    #[test]
    fn apply_ignored_in_invalid_state() {
        let mut applier = ArtificialVelocityApplier::default();
        applier.apply(false);
        assert!(!applier.is_processing());
    }

    #[test]
    fn step_decays_velocity_by_drag() {
        let mut applier = ArtificialVelocityApplier {
            velocity: Vec3::new(10.0, 0.0, 0.0),
            drag: 1.0,
            ..Default::default()
        };
        applier.apply(true);
        let step = applier.step(0.5).unwrap();
        assert!((applier.velocity.x - 5.0).abs() < EPSILON);
        assert!((step.translation.x - 2.5).abs() < EPSILON);
    }

    #[test]
    fn step_stops_at_rest() {
        let mut applier = ArtificialVelocityApplier {
            velocity: Vec3::splat(0.0005),
            ..Default::default()
        };
        applier.apply(true);
        assert!(applier.step(0.1).is_none());
        assert!(!applier.is_processing());
        assert_eq!(applier.velocity, Vec3::ZERO);
    }

    #[test]
    fn cancel_deceleration_stops_processing() {
        let mut applier = ArtificialVelocityApplier {
            velocity: Vec3::X,
            ..Default::default()
        };
        applier.apply(true);
        applier.cancel_deceleration();
        assert!(applier.step(0.1).is_none());
    }

    #[test]
    fn euler_degrees_single_axis() {
        let q = euler_degrees(Vec3::new(0.0, 90.0, 0.0));
        let rotated = q * Vec3::Z;
        assert!(rotated.abs_diff_eq(Vec3::X, EPSILON));
    }

    #[test]
    fn from_config_copies_drag() {
        let mut config = ZinniaConfig::new();
        config.drag = 3.0;
        let applier = ArtificialVelocityApplier::from_config(&config);
        assert_eq!(applier.drag, 3.0);
        assert_eq!(applier.angular_drag, 0.5);
    }
}
