//! Headless demo scene.
//!
//! A hand sweeps through a small room and touches three objects:
//!
//! - a cube on the interactable layer, with a consumer that accepts anything,
//! - a wall outside the interactable layer, which the hand collision rule
//!   rejects before it is ever tracked,
//! - a door whose consumer only accepts publishers tagged `Hand`.
//!
//! Every accepted consumer ends up in the registration container. When the
//! hand lets go of the cube it is thrown with the hand velocity and slowed
//! down by an [`ArtificialVelocityApplier`]. A heartbeat moment process and a
//! grip property run alongside.
//!
//! [`setup`] builds the scene, [`run`] plays the scripted frames and returns a
//! serialisable [`DemoSummary`].

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;
use glam::{Vec2, Vec3};
use log::{debug, info};
use serde::Serialize;

use crate::components::activecollisionconsumer::ActiveCollisionConsumer;
use crate::components::activecollisionpublisher::ActiveCollisionPublisher;
use crate::components::activecollisions::ActiveCollisionsContainer;
use crate::components::collision::CollisionData;
use crate::components::floatremapper::{FloatRange, FloatRangeValueRemapper, OutputMode};
use crate::components::gameobject::{Layer, LayerMask, LocalTransform, Tag};
use crate::components::momentprocess::{CompositeProcess, MomentProcess};
use crate::components::observableproperty::{FloatObservableProperty, PropertyChange};
use crate::components::registeredconsumers::ActiveCollisionRegisteredConsumerContainer;
use crate::components::rule::{Rule, RuleContainer, RuleTarget};
use crate::components::velocity::{ArtificialVelocityApplier, VelocityMultiplier, VelocityTracker};
use crate::events::activecollision::{
    ActiveCollisionConsumed, ActiveCollisionsPublished, ConsumerRegistered, ConsumerUnregistered,
};
use crate::events::collision::{CollisionStarted, CollisionStopped};
use crate::events::property::PropertyChanged;
use crate::resources::config::ZinniaConfig;
use crate::resources::navmesh::{FlatNavMesh, NavMesh, NavMeshRegion};
use crate::resources::worldtime::WorldTime;
use crate::systems::activecollision;
use crate::systems::process::{composite_process_system, schedule_new_moment_processes};
use crate::systems::rule::rule_accepts;
use crate::systems::time::{run_fixed_step, update_world_time};
use crate::systems::velocity::{
    apply_artificial_velocity, artificial_velocity_system, multiplied_angular_velocity,
    multiplied_velocity,
};
use crate::systems::{property, velocity};

const INTERACTABLE_LAYER: u8 = 9;
const HAND_SPEED: Vec3 = Vec3::new(1.5, 0.0, 0.0);
const HAND_SPIN: Vec3 = Vec3::new(0.0, 90.0, 0.0);
const THROW_FACTOR: Vec3 = Vec3::splat(2.0);

// Scripted frames.
const TOUCH_CUBE: u32 = 10;
const TOUCH_WALL: u32 = 20;
const TOUCH_DOOR: u32 = 30;
const LEAVE_DOOR: u32 = 40;
const THROW_CUBE: u32 = 45;
const REPUBLISH: u32 = 50;

/// Entities of the demo scene.
#[derive(Debug, Clone, Copy)]
pub struct DemoScene {
    pub hand: Entity,
    pub hand_collisions: Entity,
    pub publisher: Entity,
    pub registered: Entity,
    pub cube: Entity,
    pub cube_consumer: Entity,
    pub wall: Entity,
    pub wall_consumer: Entity,
    pub door: Entity,
    pub door_consumer: Entity,
    pub throw: Entity,
    pub teleport_rule: Entity,
    pub heartbeat: Entity,
}

/// Counters filled in by the demo observers.
#[derive(Resource, Debug, Default)]
pub struct DemoLog {
    pub frame: u32,
    pub published: Vec<PublishedSummary>,
    pub consumed: u32,
    pub registrations: u32,
    pub unregistrations: u32,
    pub grip_changes: u32,
    pub heartbeats: u32,
}

/// One publish pass as seen by the observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedSummary {
    pub frame: u32,
    pub publisher: u64,
    pub collisions: Vec<u64>,
    pub registered: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeleportCheck {
    pub point: Vec3,
    pub valid: bool,
}

/// What happened during a demo run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoSummary {
    pub frames: u32,
    pub elapsed: f32,
    pub published: Vec<PublishedSummary>,
    pub consumed: u32,
    pub registrations: u32,
    pub unregistrations: u32,
    pub registered: Vec<u64>,
    pub grip_changes: u32,
    pub heartbeats: u32,
    pub cube_position: Vec3,
    pub teleports: Vec<TeleportCheck>,
}

fn heartbeat(mut log: ResMut<DemoLog>, time: Res<WorldTime>) {
    log.heartbeats += 1;
    debug!("Heartbeat at {:.2}s", time.elapsed);
}

fn record_published(
    trigger: On<ActiveCollisionsPublished>,
    containers: Query<&ActiveCollisionRegisteredConsumerContainer>,
    publishers: Query<&ActiveCollisionPublisher>,
    mut log: ResMut<DemoLog>,
) {
    let event = trigger.event();
    let registered = publishers
        .get(event.publisher)
        .ok()
        .and_then(|p| p.registered_consumer_container)
        .and_then(|c| containers.get(c).ok())
        .map(|c| c.registered().iter().map(|r| r.consumer.to_bits()).collect())
        .unwrap_or_default();
    let summary = PublishedSummary {
        frame: log.frame,
        publisher: event.publisher.to_bits(),
        collisions: event
            .payload
            .active_collisions
            .iter()
            .map(|c| c.collider.to_bits())
            .collect(),
        registered,
    };
    info!(
        "Frame {}: published {} collisions, {} consumers registered",
        summary.frame,
        summary.collisions.len(),
        summary.registered.len()
    );
    log.published.push(summary);
}

fn record_consumed(_trigger: On<ActiveCollisionConsumed>, mut log: ResMut<DemoLog>) {
    log.consumed += 1;
}

fn record_registered(_trigger: On<ConsumerRegistered>, mut log: ResMut<DemoLog>) {
    log.registrations += 1;
}

fn record_unregistered(_trigger: On<ConsumerUnregistered>, mut log: ResMut<DemoLog>) {
    log.unregistrations += 1;
}

fn record_grip(trigger: On<PropertyChanged>, mut log: ResMut<DemoLog>) {
    if trigger.event().change != PropertyChange::Unmodified {
        log.grip_changes += 1;
    }
}

/// Build the demo world.
pub fn setup(world: &mut World, config: &ZinniaConfig) -> DemoScene {
    world.insert_resource(WorldTime::default().with_fixed_delta(config.fixed_delta));
    world.insert_resource(DemoLog::default());
    world.insert_resource(config.clone());
    world.insert_resource(NavMesh::new(FlatNavMesh::new(vec![
        NavMeshRegion::new(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0), 0.0),
        NavMeshRegion::new(Vec2::new(5.0, -1.0), Vec2::new(8.0, 1.0), 0.5).with_area(3),
    ])));

    activecollision::add_observers(world);
    world.add_observer(record_published);
    world.add_observer(record_consumed);
    world.add_observer(record_registered);
    world.add_observer(record_unregistered);
    world.add_observer(record_grip);

    let reject = config.reject_rule_states();

    // Rules.
    let interactable = world
        .spawn(
            Rule::any_layer(LayerMask::from_layers(&[INTERACTABLE_LAYER]))
                .with_auto_reject_states(reject),
        )
        .id();
    let hand_tag = world
        .spawn(Rule::any_tag(["Hand"]).with_auto_reject_states(reject))
        .id();
    let hand_only = world
        .spawn(Rule::any([hand_tag]).with_auto_reject_states(reject))
        .id();
    let teleport_rule = world
        .spawn(Rule::nav_mesh(config.nav_mesh_rule()).with_auto_reject_states(reject))
        .id();

    // Hand: tracker on the root, collision tracker and publisher below it.
    let registered = world
        .spawn(ActiveCollisionRegisteredConsumerContainer::new())
        .id();
    let hand = world
        .spawn((
            Tag::new("Hand"),
            LocalTransform::from_position(Vec3::new(-2.0, 1.0, 0.0)),
            VelocityTracker::new(HAND_SPEED, HAND_SPIN),
            FloatRangeValueRemapper::new(FloatRange::new(0.0, 1.0), FloatRange::new(0.0, 100.0))
                .with_mode(OutputMode::SmoothStep),
            FloatObservableProperty::new().with_tolerance(0.5),
        ))
        .id();
    let hand_collisions = world
        .spawn((
            ActiveCollisionsContainer::default()
                .with_collision_validity(RuleContainer::new(interactable)),
            ChildOf(hand),
        ))
        .id();
    let publisher = world
        .spawn((
            Tag::new("Hand"),
            ActiveCollisionPublisher::new()
                .with_source_container(hand)
                .with_registered_consumer_container(registered)
                .following(hand_collisions),
            ChildOf(hand),
        ))
        .id();

    // Scene objects.
    let cube = world
        .spawn((
            Layer(INTERACTABLE_LAYER),
            LocalTransform::from_position(Vec3::new(0.0, 1.0, 0.0)),
        ))
        .id();
    let cube_consumer = world
        .spawn((ActiveCollisionConsumer::new().with_container(cube), ChildOf(cube)))
        .id();
    let wall = world
        .spawn((Layer(0), LocalTransform::from_position(Vec3::new(1.0, 1.0, 0.0))))
        .id();
    let wall_consumer = world
        .spawn((ActiveCollisionConsumer::new(), ChildOf(wall)))
        .id();
    let door = world
        .spawn((
            Layer(INTERACTABLE_LAYER),
            LocalTransform::from_position(Vec3::new(2.0, 1.0, 0.0)),
        ))
        .id();
    let door_consumer = world
        .spawn((
            ActiveCollisionConsumer::new()
                .with_container(door)
                .with_publisher_validity(RuleContainer::new(hand_only)),
            ChildOf(door),
        ))
        .id();

    // Throwing the cube reuses the hand velocity through a multiplier.
    let throw = world
        .spawn((
            ArtificialVelocityApplier::from_config(config).with_target(cube),
            VelocityMultiplier {
                velocity_multiplier_factor: THROW_FACTOR,
                angular_velocity_multiplier_factor: THROW_FACTOR,
                ..VelocityMultiplier::default()
            }
            .with_source(hand),
        ))
        .id();

    let beat: SystemId = world.register_system(heartbeat);
    let heartbeat = world
        .spawn(MomentProcess::new(beat).with_interval(0.5))
        .id();
    world.spawn(CompositeProcess::new([heartbeat]));
    world.flush();

    DemoScene {
        hand,
        hand_collisions,
        publisher,
        registered,
        cube,
        cube_consumer,
        wall,
        wall_consumer,
        door,
        door_consumer,
        throw,
        teleport_rule,
        heartbeat,
    }
}

/// Frame schedule: moment processes.
pub fn build_update_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((schedule_new_moment_processes, composite_process_system).chain());
    schedule
}

/// Fixed step schedule: artificial velocity.
pub fn build_fixed_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(artificial_velocity_system);
    schedule
}

fn touch(world: &mut World, scene: &DemoScene, collider: Entity) {
    world.trigger(CollisionStarted {
        container: scene.hand_collisions,
        collision: CollisionData::new(collider).with_forward_source(scene.hand_collisions),
    });
}

fn leave(world: &mut World, scene: &DemoScene, collider: Entity) {
    world.trigger(CollisionStopped {
        container: scene.hand_collisions,
        collision: CollisionData::new(collider).with_forward_source(scene.hand_collisions),
    });
}

fn throw_cube(world: &mut World, scene: &DemoScene) {
    let linear = multiplied_velocity(world, scene.throw);
    let angular = multiplied_angular_velocity(world, scene.throw);
    if let Some(mut applier) = world.get_mut::<ArtificialVelocityApplier>(scene.throw) {
        applier.clear_velocity();
        applier.clear_angular_velocity();
        applier.increment_velocity(linear);
        applier.increment_angular_velocity(angular);
    }
    apply_artificial_velocity(world, scene.throw);
    info!("Cube thrown at {:?}", linear);
}

/// Apply the scripted events for `frame`.
pub fn script_frame(world: &mut World, scene: &DemoScene, frame: u32) {
    match frame {
        TOUCH_CUBE => touch(world, scene, scene.cube),
        TOUCH_WALL => touch(world, scene, scene.wall),
        TOUCH_DOOR => touch(world, scene, scene.door),
        LEAVE_DOOR => leave(world, scene, scene.door),
        THROW_CUBE => {
            leave(world, scene, scene.cube);
            activecollision::unregister_registered_consumer(
                world,
                scene.publisher,
                scene.cube_consumer,
            );
            throw_cube(world, scene);
        }
        REPUBLISH => activecollision::publish_registered_consumers(world, scene.registered),
        _ => {}
    }
}

fn move_hand(world: &mut World, scene: &DemoScene, frames: u32, frame: u32) {
    let delta = world.resource::<WorldTime>().delta;
    if let Some(mut transform) = world.get_mut::<LocalTransform>(scene.hand) {
        transform.position += HAND_SPEED * delta;
    }
    let grip = property::transform_float(world, scene.hand, frame as f32 / frames.max(1) as f32);
    if let Some(grip) = grip {
        property::set_property(world, scene.hand, grip);
    }
}

fn teleport_checks(world: &World, scene: &DemoScene) -> Vec<TeleportCheck> {
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(6.0, 0.5, 0.0),
        Vec3::new(0.0, 3.0, 0.0),
        Vec3::new(20.0, 0.0, 20.0),
    ]
    .into_iter()
    .map(|point| TeleportCheck {
        point,
        valid: rule_accepts(world, scene.teleport_rule, RuleTarget::Point(point)),
    })
    .collect()
}

/// Play `frames` frames of `dt` seconds each and summarise the run.
pub fn run(world: &mut World, scene: &DemoScene, frames: u32, dt: f32) -> DemoSummary {
    let mut update = build_update_schedule();
    let mut fixed = build_fixed_schedule();
    let mut accumulator = 0.0;

    for frame in 1..=frames {
        world.resource_mut::<DemoLog>().frame = frame;
        update_world_time(world, dt);
        move_hand(world, scene, frames, frame);
        script_frame(world, scene, frame);
        world.flush();
        update.run(world);

        accumulator += world.resource::<WorldTime>().delta;
        let fixed_delta = world.resource::<WorldTime>().fixed_delta;
        while fixed_delta > 0.0 && accumulator >= fixed_delta {
            run_fixed_step(world, &mut fixed);
            accumulator -= fixed_delta;
        }
    }

    // The hand stops tracking velocity once the run is over.
    velocity::clear_velocity_multiplier_source(world, scene.throw);

    let registered = world
        .get::<ActiveCollisionRegisteredConsumerContainer>(scene.registered)
        .map(|c| c.registered().iter().map(|r| r.consumer.to_bits()).collect())
        .unwrap_or_default();
    let cube_position = world
        .get::<LocalTransform>(scene.cube)
        .map(|t| t.position)
        .unwrap_or_default();
    let teleports = teleport_checks(world, scene);
    let elapsed = world.resource::<WorldTime>().elapsed;
    let log = world.resource::<DemoLog>();

    DemoSummary {
        frames,
        elapsed,
        published: log.published.clone(),
        consumed: log.consumed,
        registrations: log.registrations,
        unregistrations: log.unregistrations,
        registered,
        grip_changes: log.grip_changes,
        heartbeats: log.heartbeats,
        cube_position,
        teleports,
    }
}
