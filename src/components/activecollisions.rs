//! Tracker of ongoing collisions.
//!
//! [`ActiveCollisionsContainer`] keeps the ordered list of collisions that have
//! started and not yet stopped. It is fed by
//! [`CollisionStarted`](crate::events::collision::CollisionStarted) and
//! [`CollisionStopped`](crate::events::collision::CollisionStopped) and its
//! contents are what publishers copy before publishing.

use bevy_ecs::prelude::Component;
use bevy_ecs::prelude::Entity;

use crate::components::collision::CollisionData;
use crate::components::rule::RuleContainer;

/// Snapshot of a container handed to publishers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveCollisionsEventData {
    pub container: Option<Entity>,
    pub active_collisions: Vec<CollisionData>,
}

#[derive(Component, Clone, Debug)]
pub struct ActiveCollisionsContainer {
    pub enabled: bool,
    /// Rule evaluated against the containing entity of a new collision.
    pub collision_validity: RuleContainer,
    collisions: Vec<CollisionData>,
}

impl Default for ActiveCollisionsContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveCollisionsContainer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            collision_validity: RuleContainer::empty(),
            collisions: Vec::new(),
        }
    }

    pub fn with_collision_validity(mut self, validity: RuleContainer) -> Self {
        self.collision_validity = validity;
        self
    }

    pub fn collisions(&self) -> &[CollisionData] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.collisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collisions.is_empty()
    }

    /// Append a collision unless its collider is already tracked.
    /// Returns whether the contents changed.
    pub fn add(&mut self, collision: CollisionData) -> bool {
        if self.collisions.iter().any(|c| c.collider == collision.collider) {
            return false;
        }
        self.collisions.push(collision);
        true
    }

    /// Remove the collision for `collider`, keeping the order of the rest.
    /// Returns whether the contents changed.
    pub fn remove(&mut self, collider: Entity) -> bool {
        let before = self.collisions.len();
        self.collisions.retain(|c| c.collider != collider);
        self.collisions.len() != before
    }

    /// Returns whether the contents changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.collisions.is_empty();
        self.collisions.clear();
        changed
    }

    pub fn event_data(&self, container: Entity) -> ActiveCollisionsEventData {
        ActiveCollisionsEventData {
            container: Some(container),
            active_collisions: self.collisions.clone(),
        }
    }
}
