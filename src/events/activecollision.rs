//! Notifications raised by the active collision publish/consume protocol.
//!
//! All events are triggered synchronously from the exclusive operations in
//! [`systems::activecollision`](crate::systems::activecollision), so observers
//! see them in protocol order: consumptions and registrations during the
//! pass, then exactly one [`ActiveCollisionsPublished`] once every consumer has
//! been processed.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<ActiveCollisionsPublished>| {
//!     let event = trigger.event();
//!     log::info!("{:?} published {} collisions", event.publisher, event.payload.active_collisions.len());
//! });
//! ```

use bevy_ecs::prelude::*;

use crate::components::activecollisionpublisher::PayloadData;
use crate::components::collision::CollisionData;

/// A publisher finished a publish pass.
#[derive(Event, Debug, Clone)]
pub struct ActiveCollisionsPublished {
    pub publisher: Entity,
    pub payload: PayloadData,
}

/// A consumer accepted a payload.
///
/// `collision` is `None` when the payload was republished by a registered
/// consumer container rather than delivered for a specific collision.
#[derive(Event, Debug, Clone)]
pub struct ActiveCollisionConsumed {
    pub consumer: Entity,
    pub payload: PayloadData,
    pub collision: Option<CollisionData>,
}

/// A consumer dropped the payload it was holding.
#[derive(Event, Debug, Clone)]
pub struct ActiveCollisionConsumerCleared {
    pub consumer: Entity,
    pub payload: Option<PayloadData>,
}

/// A consumer was newly registered with a container.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerRegistered {
    pub container: Entity,
    pub consumer: Entity,
}

/// A consumer was removed from a container.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumerUnregistered {
    pub container: Entity,
    pub consumer: Entity,
}
