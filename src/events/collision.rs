//! Collision tracking events.
//!
//! The host physics layer triggers [`CollisionStarted`] and
//! [`CollisionStopped`] against an
//! [`ActiveCollisionsContainer`](crate::components::activecollisions::ActiveCollisionsContainer)
//! entity. Whenever the container contents change it triggers
//! [`ActiveCollisionsChanged`] with a copy of the list, which publishers
//! following that container pick up.
use bevy_ecs::prelude::*;

use crate::components::activecollisions::ActiveCollisionsEventData;
use crate::components::collision::CollisionData;

/// A collision began for the tracker on `container`.
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionStarted {
    pub container: Entity,
    pub collision: CollisionData,
}

/// A collision ended for the tracker on `container`.
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionStopped {
    pub container: Entity,
    pub collision: CollisionData,
}

/// The ongoing collisions of a tracker changed.
#[derive(Event, Debug, Clone)]
pub struct ActiveCollisionsChanged {
    pub container: Entity,
    pub data: ActiveCollisionsEventData,
}
