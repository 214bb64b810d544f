//! Bookkeeping of consumers a publisher has successfully published to.
//!
//! Consumers that accept a payload are registered together with the payload
//! they accepted, so that they can be unregistered later or republished to.
//! The ignored set holds consumers registered during the current publish pass;
//! it is cleared at the start of every pass.

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::FxHashSet;

use crate::components::activecollisionpublisher::PayloadData;

#[derive(Clone, Debug, PartialEq)]
pub struct RegisteredConsumer {
    pub consumer: Entity,
    pub payload: PayloadData,
}

#[derive(Component, Clone, Debug)]
pub struct ActiveCollisionRegisteredConsumerContainer {
    pub enabled: bool,
    registered: Vec<RegisteredConsumer>,
    ignored: FxHashSet<Entity>,
}

impl Default for ActiveCollisionRegisteredConsumerContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveCollisionRegisteredConsumerContainer {
    pub fn new() -> Self {
        Self {
            enabled: true,
            registered: Vec::new(),
            ignored: FxHashSet::default(),
        }
    }

    /// Registered consumers in registration order.
    pub fn registered(&self) -> &[RegisteredConsumer] {
        &self.registered
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    pub fn is_registered(&self, consumer: Entity) -> bool {
        self.registered.iter().any(|r| r.consumer == consumer)
    }

    pub fn payload_for(&self, consumer: Entity) -> Option<&PayloadData> {
        self.registered
            .iter()
            .find(|r| r.consumer == consumer)
            .map(|r| &r.payload)
    }

    /// Register `consumer`, or refresh its payload if it is already registered.
    /// Returns `true` only for a new registration.
    pub fn register(&mut self, consumer: Entity, payload: PayloadData) -> bool {
        if let Some(existing) = self.registered.iter_mut().find(|r| r.consumer == consumer) {
            existing.payload = payload;
            return false;
        }
        self.registered.push(RegisteredConsumer { consumer, payload });
        true
    }

    /// Returns whether `consumer` was registered.
    pub fn unregister(&mut self, consumer: Entity) -> bool {
        let before = self.registered.len();
        self.registered.retain(|r| r.consumer != consumer);
        self.ignored.remove(&consumer);
        self.registered.len() != before
    }

    /// Keep only consumers for which `keep` holds. Returns the dropped ones.
    pub fn retain_consumers(&mut self, mut keep: impl FnMut(Entity) -> bool) -> Vec<Entity> {
        let mut dropped = Vec::new();
        self.registered.retain(|r| {
            let kept = keep(r.consumer);
            if !kept {
                dropped.push(r.consumer);
            }
            kept
        });
        for consumer in &dropped {
            self.ignored.remove(consumer);
        }
        dropped
    }

    pub fn ignored(&self) -> &FxHashSet<Entity> {
        &self.ignored
    }

    pub fn is_ignored(&self, consumer: Entity) -> bool {
        self.ignored.contains(&consumer)
    }

    pub fn ignore(&mut self, consumer: Entity) {
        self.ignored.insert(consumer);
    }

    pub fn clear_ignored_registered_consumers(&mut self) {
        self.ignored.clear();
    }
}
