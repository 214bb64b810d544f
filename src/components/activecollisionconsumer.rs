use bevy_ecs::prelude::{Component, Entity};

use crate::components::activecollisionpublisher::PayloadData;
use crate::components::collision::CollisionData;
use crate::components::rule::RuleContainer;

/// Receives payloads from publishers colliding with its entity tree.
///
/// A consumer only takes payloads for collisions on its `container` when one
/// is set, and only from publishers whose container passes
/// `publisher_validity`.
#[derive(Component, Clone, Debug)]
pub struct ActiveCollisionConsumer {
    pub enabled: bool,
    /// Restricts consumption to collisions whose containing entity is this one.
    pub container: Option<Entity>,
    /// Rule evaluated against the publisher container.
    pub publisher_validity: RuleContainer,
    /// Last payload consumed.
    pub published_payload: Option<PayloadData>,
    /// Collision the last payload was consumed for, if it came from one.
    pub active_collision: Option<CollisionData>,
}

impl Default for ActiveCollisionConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveCollisionConsumer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            container: None,
            publisher_validity: RuleContainer::empty(),
            published_payload: None,
            active_collision: None,
        }
    }

    pub fn with_container(mut self, container: Entity) -> Self {
        self.container = Some(container);
        self
    }

    pub fn with_publisher_validity(mut self, validity: RuleContainer) -> Self {
        self.publisher_validity = validity;
        self
    }

    /// Whether a collision on `reference` may reach this consumer.
    pub fn accepts_container(&self, reference: Entity) -> bool {
        self.container.is_none_or(|container| container == reference)
    }

    pub fn record(&mut self, payload: &PayloadData, collision: Option<&CollisionData>) {
        self.published_payload = Some(payload.clone());
        self.active_collision = collision.copied();
    }

    pub fn clear(&mut self) {
        self.published_payload = None;
        self.active_collision = None;
    }
}
