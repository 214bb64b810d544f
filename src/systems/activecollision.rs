//! Active collision publish/consume protocol.
//!
//! The operations here take `&mut World` because one publish pass touches the
//! publisher, every consumer it reaches and the registration container, and
//! triggers observer events as it goes. Systems and observers reach them by
//! queueing a closure on [`Commands`].
//!
//! Every operation is tolerant: a missing entity, a missing component, a
//! disabled component or an inactive hierarchy turns the call into a no-op
//! (or `false`) instead of an error.
//!
//! # Publish pass
//!
//! 1. Stamp the payload with the publisher entity.
//! 2. Snapshot the collision list.
//! 3. Clear the ignored set of the registration container, if any.
//! 4. For each collision, find consumers under its containing entity, unless
//!    the publisher itself sits at or below that entity.
//! 5. Deliver the payload; consumers that accept are ignored for the rest of
//!    the pass and registered.
//! 6. Trigger [`ActiveCollisionsPublished`] with the final payload.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::activecollisionconsumer::ActiveCollisionConsumer;
use crate::components::activecollisionpublisher::{ActiveCollisionPublisher, PayloadData};
use crate::components::activecollisions::{ActiveCollisionsContainer, ActiveCollisionsEventData};
use crate::components::collision::CollisionData;
use crate::components::registeredconsumers::ActiveCollisionRegisteredConsumerContainer;
use crate::components::rule::RuleTarget;
use crate::events::activecollision::{
    ActiveCollisionConsumed, ActiveCollisionConsumerCleared, ActiveCollisionsPublished,
    ConsumerRegistered, ConsumerUnregistered,
};
use crate::events::collision::{ActiveCollisionsChanged, CollisionStarted, CollisionStopped};
use crate::systems::hierarchy::{self, EntityList};
use crate::systems::rule::{RuleQueries, RuleSource, container_accepts, container_has_rule};

fn is_valid_state(world: &World, entity: Entity, enabled: bool) -> bool {
    enabled && hierarchy::is_active_in_hierarchy(world, entity)
}

fn publisher_is_valid(world: &World, publisher: Entity) -> bool {
    world
        .get::<ActiveCollisionPublisher>(publisher)
        .is_some_and(|p| is_valid_state(world, publisher, p.enabled))
}

fn registration_container(world: &World, publisher: Entity) -> Option<Entity> {
    world
        .get::<ActiveCollisionPublisher>(publisher)?
        .registered_consumer_container
        .filter(|container| {
            world
                .get::<ActiveCollisionRegisteredConsumerContainer>(*container)
                .is_some()
        })
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Copy the collisions of a tracker snapshot into the publisher payload.
///
/// No-op when the publisher is not in a valid state or `data` is `None`.
pub fn set_active_collisions(
    world: &mut World,
    publisher: Entity,
    data: Option<&ActiveCollisionsEventData>,
) {
    let Some(data) = data else {
        return;
    };
    if !publisher_is_valid(world, publisher) {
        return;
    }
    if let Some(mut component) = world.get_mut::<ActiveCollisionPublisher>(publisher) {
        component
            .payload
            .set_active_collisions(&data.active_collisions);
    }
}

/// Copy the collisions of another payload while the publisher is valid.
pub fn set_active_collisions_from_payload(
    world: &mut World,
    publisher: Entity,
    payload: Option<&PayloadData>,
) {
    if !publisher_is_valid(world, publisher) {
        return;
    }
    set_active_collisions_even_when_disabled(world, publisher, payload);
}

/// Copy the collisions of another payload regardless of publisher state.
pub fn set_active_collisions_even_when_disabled(
    world: &mut World,
    publisher: Entity,
    payload: Option<&PayloadData>,
) {
    let Some(payload) = payload else {
        return;
    };
    if let Some(mut component) = world.get_mut::<ActiveCollisionPublisher>(publisher) {
        component
            .payload
            .set_active_collisions(&payload.active_collisions);
    }
}

/// Empty the payload collision list.
pub fn clear_active_collisions(world: &mut World, publisher: Entity) {
    if let Some(mut component) = world.get_mut::<ActiveCollisionPublisher>(publisher) {
        component.clear_active_collisions();
    }
}

/// Publish while the publisher is enabled and active in the hierarchy.
pub fn publish(world: &mut World, publisher: Entity) {
    if !publisher_is_valid(world, publisher) {
        return;
    }
    force_publish(world, publisher);
}

/// Publish regardless of the publisher state.
pub fn force_publish(world: &mut World, publisher: Entity) {
    let mut snapshot = {
        let Some(mut component) = world.get_mut::<ActiveCollisionPublisher>(publisher) else {
            return;
        };
        component.payload.publisher_container = Some(publisher);
        let mut snapshot = std::mem::take(&mut component.snapshot);
        snapshot.clear();
        snapshot.extend_from_slice(&component.payload.active_collisions);
        snapshot
    };

    let container = registration_container(world, publisher);
    if let Some(container) = container {
        forget_despawned_consumers(world, container);
        if let Some(mut registered) =
            world.get_mut::<ActiveCollisionRegisteredConsumerContainer>(container)
        {
            registered.clear_ignored_registered_consumers();
        }
    }

    debug!(
        "Publisher {:?} publishing {} active collisions",
        publisher,
        snapshot.len()
    );

    for collision in &snapshot {
        let reference = collision.containing_entity();
        for consumer in get_consumers(world, publisher, reference) {
            let reachable = world
                .get::<ActiveCollisionConsumer>(consumer)
                .is_some_and(|c| c.accepts_container(reference));
            if !reachable {
                continue;
            }

            let Some(payload) = world
                .get::<ActiveCollisionPublisher>(publisher)
                .map(|p| p.payload.clone())
            else {
                return;
            };
            if !consume(world, consumer, &payload, Some(collision)) {
                continue;
            }
            if let Some(container) = container {
                if let Some(mut registered) =
                    world.get_mut::<ActiveCollisionRegisteredConsumerContainer>(container)
                {
                    registered.ignore(consumer);
                }
                register_consumer(world, container, consumer, payload);
            }
        }
    }

    let Some(mut component) = world.get_mut::<ActiveCollisionPublisher>(publisher) else {
        return;
    };
    snapshot.clear();
    component.snapshot = snapshot;
    let payload = component.payload.clone();
    world.trigger(ActiveCollisionsPublished { publisher, payload });
}

/// Unregister `consumer` from the publisher's registration container, if any.
pub fn unregister_registered_consumer(world: &mut World, publisher: Entity, consumer: Entity) {
    let Some(container) = registration_container(world, publisher) else {
        return;
    };
    unregister_consumer(world, container, consumer);
}

/// Consumers reachable from a collision on `reference`.
///
/// Empty when the publisher is `reference` or one of its descendants, so a
/// publisher never notifies consumers on itself or its ancestors.
pub fn get_consumers(world: &World, publisher: Entity, reference: Entity) -> EntityList {
    if hierarchy::is_child_of(world, publisher, reference) {
        return EntityList::new();
    }
    hierarchy::find_components_in_children::<ActiveCollisionConsumer>(world, reference)
}

// ---------------------------------------------------------------------------
// Consumer
// ---------------------------------------------------------------------------

/// Offer `payload` to `consumer`. Returns whether it was accepted.
pub fn consume(
    world: &mut World,
    consumer: Entity,
    payload: &PayloadData,
    collision: Option<&CollisionData>,
) -> bool {
    let Some(component) = world.get::<ActiveCollisionConsumer>(consumer) else {
        return false;
    };
    if !is_valid_state(world, consumer, component.enabled) {
        return false;
    }
    let validity = component.publisher_validity;
    let publisher_accepted = match payload.publisher_container {
        Some(publisher) => container_accepts(&*world, &validity, RuleTarget::Entity(publisher)),
        None => !container_has_rule(&*world, &validity),
    };
    if !publisher_accepted {
        return false;
    }

    if let Some(mut component) = world.get_mut::<ActiveCollisionConsumer>(consumer) {
        component.record(payload, collision);
    }
    world.trigger(ActiveCollisionConsumed {
        consumer,
        payload: payload.clone(),
        collision: collision.copied(),
    });
    true
}

/// Drop the payload held by `consumer` while it is in a valid state.
pub fn clear_consumer(world: &mut World, consumer: Entity) {
    let Some(component) = world.get::<ActiveCollisionConsumer>(consumer) else {
        return;
    };
    if !is_valid_state(world, consumer, component.enabled) {
        return;
    }
    let Some(mut component) = world.get_mut::<ActiveCollisionConsumer>(consumer) else {
        return;
    };
    let payload = component.published_payload.take();
    component.clear();
    world.trigger(ActiveCollisionConsumerCleared { consumer, payload });
}

// ---------------------------------------------------------------------------
// Registered consumer container
// ---------------------------------------------------------------------------

fn registered_container_is_valid(world: &World, container: Entity) -> bool {
    world
        .get::<ActiveCollisionRegisteredConsumerContainer>(container)
        .is_some_and(|c| is_valid_state(world, container, c.enabled))
}

/// Register `consumer` with `payload`. Returns whether it was a new registration.
pub fn register_consumer(
    world: &mut World,
    container: Entity,
    consumer: Entity,
    payload: PayloadData,
) -> bool {
    if !registered_container_is_valid(world, container) {
        return false;
    }
    let Some(mut registered) =
        world.get_mut::<ActiveCollisionRegisteredConsumerContainer>(container)
    else {
        return false;
    };
    if !registered.register(consumer, payload) {
        return false;
    }
    debug!("Consumer {:?} registered with {:?}", consumer, container);
    world.trigger(ConsumerRegistered {
        container,
        consumer,
    });
    true
}

/// Unregister `consumer`, clearing it. Returns whether it was registered.
pub fn unregister_consumer(world: &mut World, container: Entity, consumer: Entity) -> bool {
    if !registered_container_is_valid(world, container) {
        return false;
    }
    let Some(mut registered) =
        world.get_mut::<ActiveCollisionRegisteredConsumerContainer>(container)
    else {
        return false;
    };
    if !registered.unregister(consumer) {
        return false;
    }
    clear_consumer(world, consumer);
    debug!("Consumer {:?} unregistered from {:?}", consumer, container);
    world.trigger(ConsumerUnregistered {
        container,
        consumer,
    });
    true
}

/// Unregister every consumer restricted to `consumer_container`.
pub fn unregister_consumers_on_container(
    world: &mut World,
    container: Entity,
    consumer_container: Entity,
) {
    let Some(registered) = world.get::<ActiveCollisionRegisteredConsumerContainer>(container)
    else {
        return;
    };
    let matching: Vec<Entity> = registered
        .registered()
        .iter()
        .map(|r| r.consumer)
        .filter(|consumer| {
            world
                .get::<ActiveCollisionConsumer>(*consumer)
                .is_some_and(|c| c.container == Some(consumer_container))
        })
        .collect();
    for consumer in matching {
        unregister_consumer(world, container, consumer);
    }
}

/// Offer every registered consumer, except those ignored this pass, the payload
/// it was registered with.
pub fn publish_registered_consumers(world: &mut World, container: Entity) {
    if !registered_container_is_valid(world, container) {
        return;
    }
    forget_despawned_consumers(world, container);
    let Some(registered) = world.get::<ActiveCollisionRegisteredConsumerContainer>(container)
    else {
        return;
    };
    let pending: Vec<_> = registered
        .registered()
        .iter()
        .filter(|r| !registered.is_ignored(r.consumer))
        .cloned()
        .collect();
    for entry in pending {
        consume(world, entry.consumer, &entry.payload, None);
    }
}

/// Drop registrations whose consumer entity no longer exists.
fn forget_despawned_consumers(world: &mut World, container: Entity) {
    let Some(registered) = world.get::<ActiveCollisionRegisteredConsumerContainer>(container)
    else {
        return;
    };
    let despawned: Vec<Entity> = registered
        .registered()
        .iter()
        .map(|r| r.consumer)
        .filter(|consumer| world.get_entity(*consumer).is_err())
        .collect();
    if despawned.is_empty() {
        return;
    }
    let Some(mut registered) =
        world.get_mut::<ActiveCollisionRegisteredConsumerContainer>(container)
    else {
        return;
    };
    for consumer in registered.retain_consumers(|consumer| !despawned.contains(&consumer)) {
        debug!("Despawned consumer {:?} dropped from {:?}", consumer, container);
        world.trigger(ConsumerUnregistered {
            container,
            consumer,
        });
    }
}

// ---------------------------------------------------------------------------
// Collision tracking observers
// ---------------------------------------------------------------------------

/// Track a started collision on its container.
pub fn collision_started_observer(
    trigger: On<CollisionStarted>,
    mut containers: Query<&mut ActiveCollisionsContainer>,
    rules: RuleQueries,
    mut commands: Commands,
) {
    let event = trigger.event();
    let Ok(mut container) = containers.get_mut(event.container) else {
        return;
    };
    if !container.enabled || !rules.is_active_in_hierarchy(event.container) {
        return;
    }
    let target = RuleTarget::Entity(event.collision.containing_entity());
    if !container_accepts(&rules, &container.collision_validity, target) {
        debug!(
            "Collision with {:?} rejected by {:?}",
            event.collision.collider, event.container
        );
        return;
    }
    if container.add(event.collision) {
        commands.trigger(ActiveCollisionsChanged {
            container: event.container,
            data: container.event_data(event.container),
        });
    }
}

/// Stop tracking an ended collision.
pub fn collision_stopped_observer(
    trigger: On<CollisionStopped>,
    mut containers: Query<&mut ActiveCollisionsContainer>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let Ok(mut container) = containers.get_mut(event.container) else {
        return;
    };
    if container.remove(event.collision.collider) {
        commands.trigger(ActiveCollisionsChanged {
            container: event.container,
            data: container.event_data(event.container),
        });
    }
}

/// Push changed collisions into every publisher following the container, then
/// publish.
pub fn active_collisions_changed_observer(
    trigger: On<ActiveCollisionsChanged>,
    publishers: Query<(Entity, &ActiveCollisionPublisher)>,
    mut commands: Commands,
) {
    let event = trigger.event();
    for (publisher, component) in publishers.iter() {
        if component.source != Some(event.container) {
            continue;
        }
        let data = event.data.clone();
        commands.queue(move |world: &mut World| {
            set_active_collisions(world, publisher, Some(&data));
            publish(world, publisher);
        });
    }
}

/// Register the collision tracking observers on `world`.
pub fn add_observers(world: &mut World) {
    world.add_observer(collision_started_observer);
    world.add_observer(collision_stopped_observer);
    world.add_observer(active_collisions_changed_observer);
}
