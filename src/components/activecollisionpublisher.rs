//! Publisher side of the active collision protocol.
//!
//! An [`ActiveCollisionPublisher`] holds a reusable [`PayloadData`] envelope.
//! Publishing walks every collision in the payload, finds
//! [`ActiveCollisionConsumer`](super::activecollisionconsumer::ActiveCollisionConsumer)
//! components under the collision's containing entity and hands them the
//! payload. The operations live in
//! [`systems::activecollision`](crate::systems::activecollision).

use bevy_ecs::prelude::{Component, Entity};

use crate::components::collision::CollisionData;

/// Envelope handed to consumers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PayloadData {
    /// The entity initiating the collision (for example a hand).
    pub source_container: Option<Entity>,
    /// The entity the publisher lives on, stamped when publishing.
    pub publisher_container: Option<Entity>,
    pub active_collisions: Vec<CollisionData>,
}

impl PayloadData {
    pub fn with_source(source_container: Entity) -> Self {
        Self {
            source_container: Some(source_container),
            ..Self::default()
        }
    }

    /// Replace the collision list with a copy of `collisions`.
    pub fn set_active_collisions(&mut self, collisions: &[CollisionData]) {
        self.active_collisions.clear();
        self.active_collisions.extend_from_slice(collisions);
    }

    /// Drop the source and collisions.
    pub fn clear(&mut self) {
        self.source_container = None;
        self.publisher_container = None;
        self.active_collisions.clear();
    }
}

#[derive(Component, Clone, Debug)]
pub struct ActiveCollisionPublisher {
    pub enabled: bool,
    pub payload: PayloadData,
    /// Entity holding the registered consumer container, if any.
    pub registered_consumer_container: Option<Entity>,
    /// Collision container this publisher follows automatically, if any.
    pub source: Option<Entity>,
    /// Reused snapshot buffer for publishing.
    pub(crate) snapshot: Vec<CollisionData>,
}

impl Default for ActiveCollisionPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveCollisionPublisher {
    pub fn new() -> Self {
        Self {
            enabled: true,
            payload: PayloadData::default(),
            registered_consumer_container: None,
            source: None,
            snapshot: Vec::new(),
        }
    }

    pub fn with_source_container(mut self, source_container: Entity) -> Self {
        self.payload.source_container = Some(source_container);
        self
    }

    pub fn with_registered_consumer_container(mut self, container: Entity) -> Self {
        self.registered_consumer_container = Some(container);
        self
    }

    /// Follow an [`ActiveCollisionsContainer`](super::activecollisions::ActiveCollisionsContainer).
    pub fn following(mut self, collisions: Entity) -> Self {
        self.source = Some(collisions);
        self
    }

    pub fn clear_active_collisions(&mut self) {
        self.payload.active_collisions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn payload_set_active_collisions_replaces_list() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut payload = PayloadData::default();
        payload.set_active_collisions(&[CollisionData::new(a)]);
        payload.set_active_collisions(&[CollisionData::new(b)]);
        assert_eq!(payload.active_collisions, vec![CollisionData::new(b)]);
    }

    #[test]
    fn payload_clear_drops_everything() {
        let mut world = World::new();
        let source = world.spawn_empty().id();
        let mut payload = PayloadData::with_source(source);
        payload.publisher_container = Some(source);
        payload.active_collisions.push(CollisionData::new(source));
        payload.clear();
        assert_eq!(payload, PayloadData::default());
    }

    #[test]
    fn publisher_builders() {
        let mut world = World::new();
        let hand = world.spawn_empty().id();
        let container = world.spawn_empty().id();
        let publisher = ActiveCollisionPublisher::new()
            .with_source_container(hand)
            .with_registered_consumer_container(container);
        assert!(publisher.enabled);
        assert_eq!(publisher.payload.source_container, Some(hand));
        assert_eq!(publisher.registered_consumer_container, Some(container));
        assert!(publisher.source.is_none());
    }
}
