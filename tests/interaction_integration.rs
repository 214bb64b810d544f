//! Integration tests for the helpers around the collision protocol:
//! hierarchy queries, artificial velocity, moment processes and observable
//! values.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test interaction_integration
//! ```

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use zinnia::components::activecollisionconsumer::ActiveCollisionConsumer;
use zinnia::components::floatremapper::{FloatRange, FloatRangeValueRemapper};
use zinnia::components::gameobject::{Active, LocalTransform};
use zinnia::components::momentprocess::{CompositeProcess, MomentProcess};
use zinnia::components::observableproperty::{
    FloatObservableProperty, PropertyChange, Vector3ObservableProperty,
};
use zinnia::components::velocity::{ArtificialVelocityApplier, VelocityMultiplier, VelocityTracker};
use zinnia::events::property::{FloatTransformed, PropertyChanged, PropertyValue};
use zinnia::resources::worldtime::WorldTime;
use zinnia::systems::hierarchy::{find_components_in_children, is_active_in_hierarchy, is_child_of};
use zinnia::systems::process::{
    clear_moment_process_source, composite_process_system, process_now,
    schedule_new_moment_processes,
};
use zinnia::systems::property::{set_property, transform_float};
use zinnia::systems::time::{run_fixed_step, update_world_time};
use zinnia::systems::velocity::{
    apply_artificial_velocity, artificial_velocity_system, clear_artificial_velocity_target,
    clear_velocity_multiplier_source, multiplied_angular_velocity, multiplied_velocity,
};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================================
// Hierarchy
// =============================================================================

#[test]
fn activity_follows_ancestors() {
    let mut world = World::new();
    let root = world.spawn(Active(true)).id();
    let middle = world.spawn((Active(false), ChildOf(root))).id();
    let leaf = world.spawn(ChildOf(middle)).id();

    assert!(is_active_in_hierarchy(&world, root));
    assert!(!is_active_in_hierarchy(&world, middle));
    assert!(!is_active_in_hierarchy(&world, leaf));

    world.entity_mut(middle).insert(Active(true));
    assert!(is_active_in_hierarchy(&world, leaf));

    world.despawn(leaf);
    assert!(!is_active_in_hierarchy(&world, leaf));
}

#[test]
fn child_of_includes_self_and_descendants() {
    let mut world = World::new();
    let root = world.spawn_empty().id();
    let child = world.spawn(ChildOf(root)).id();
    let grandchild = world.spawn(ChildOf(child)).id();
    let stranger = world.spawn_empty().id();

    assert!(is_child_of(&world, grandchild, root));
    assert!(is_child_of(&world, child, child));
    assert!(!is_child_of(&world, root, child));
    assert!(!is_child_of(&world, stranger, root));
}

#[test]
fn component_discovery_is_depth_first_and_skips_inactive() {
    let mut world = World::new();
    let root = world.spawn(ActiveCollisionConsumer::new()).id();
    let first = world.spawn(ChildOf(root)).id();
    let first_leaf = world
        .spawn((ActiveCollisionConsumer::new(), ChildOf(first)))
        .id();
    let hidden = world.spawn((Active(false), ChildOf(root))).id();
    world.spawn((ActiveCollisionConsumer::new(), ChildOf(hidden)));
    let last = world
        .spawn((ActiveCollisionConsumer::new(), ChildOf(root)))
        .id();

    let found = find_components_in_children::<ActiveCollisionConsumer>(&world, root);
    assert_eq!(found.to_vec(), vec![root, first_leaf, last]);

    assert!(find_components_in_children::<ActiveCollisionConsumer>(&world, hidden).is_empty());
}

// =============================================================================
// Velocity
// =============================================================================

fn moving_applier(
    target: Entity,
    velocity: Vec3,
    angular_velocity: Vec3,
) -> ArtificialVelocityApplier {
    let mut applier = ArtificialVelocityApplier::default().with_target(target);
    applier.velocity = velocity;
    applier.angular_velocity = angular_velocity;
    applier.drag = 1.0;
    applier.angular_drag = 0.0;
    applier
}

fn velocity_world() -> (World, Schedule) {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_fixed_delta(0.1));
    let mut schedule = Schedule::default();
    schedule.add_systems(artificial_velocity_system);
    (world, schedule)
}

#[test]
fn artificial_velocity_moves_and_slows_target() {
    let (mut world, mut fixed) = velocity_world();
    let target = world.spawn(LocalTransform::default()).id();
    let applier = world
        .spawn(moving_applier(target, Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO))
        .id();
    apply_artificial_velocity(&mut world, applier);

    run_fixed_step(&mut world, &mut fixed);

    let position = world.get::<LocalTransform>(target).unwrap().position;
    // Velocity decays to 3.6 before being applied for 0.1s.
    assert!(approx_eq(position.x, 0.36));
    let applier_state = world.get::<ArtificialVelocityApplier>(applier).unwrap();
    assert!(approx_eq(applier_state.velocity.x, 3.6));
    assert!(applier_state.is_processing());
}

#[test]
fn artificial_velocity_rotates_target() {
    let (mut world, mut fixed) = velocity_world();
    let target = world.spawn(LocalTransform::default()).id();
    let applier = world
        .spawn(moving_applier(target, Vec3::ZERO, Vec3::new(0.0, 100.0, 0.0)))
        .id();
    apply_artificial_velocity(&mut world, applier);

    run_fixed_step(&mut world, &mut fixed);

    // Angular velocity is applied as a whole rotation per step.
    let rotation = world.get::<LocalTransform>(target).unwrap().rotation;
    let expected = Quat::from_rotation_y(100.0_f32.to_radians());
    assert!(rotation.abs_diff_eq(expected, EPSILON));
}

#[test]
fn disabled_applier_stops_processing() {
    let (mut world, mut fixed) = velocity_world();
    let target = world.spawn(LocalTransform::default()).id();
    let applier = world
        .spawn(moving_applier(target, Vec3::X, Vec3::ZERO))
        .id();
    apply_artificial_velocity(&mut world, applier);
    world
        .get_mut::<ArtificialVelocityApplier>(applier)
        .unwrap()
        .enabled = false;

    run_fixed_step(&mut world, &mut fixed);

    assert_eq!(world.get::<LocalTransform>(target).unwrap().position, Vec3::ZERO);
    assert!(
        !world
            .get::<ArtificialVelocityApplier>(applier)
            .unwrap()
            .is_processing()
    );
}

#[test]
fn inactive_applier_cannot_start() {
    let (mut world, _) = velocity_world();
    let folder = world.spawn(Active(false)).id();
    let applier = world
        .spawn((ArtificialVelocityApplier::default(), ChildOf(folder)))
        .id();

    apply_artificial_velocity(&mut world, applier);
    assert!(
        !world
            .get::<ArtificialVelocityApplier>(applier)
            .unwrap()
            .is_processing()
    );
}

#[test]
fn clearing_target_leaves_transforms_alone() {
    let (mut world, mut fixed) = velocity_world();
    let target = world.spawn(LocalTransform::default()).id();
    let applier = world
        .spawn(moving_applier(target, Vec3::X, Vec3::ZERO))
        .id();
    apply_artificial_velocity(&mut world, applier);
    clear_artificial_velocity_target(&mut world, applier);

    run_fixed_step(&mut world, &mut fixed);

    assert_eq!(world.get::<LocalTransform>(target).unwrap().position, Vec3::ZERO);
}

#[test]
fn multiplier_scales_tracked_velocity() {
    let mut world = World::new();
    let tracker = world
        .spawn(VelocityTracker::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y))
        .id();
    let multiplier = world
        .spawn(
            VelocityMultiplier {
                velocity_multiplier_factor: Vec3::new(2.0, 0.0, -1.0),
                angular_velocity_multiplier_factor: Vec3::splat(3.0),
                ..VelocityMultiplier::default()
            }
            .with_source(tracker),
        )
        .id();

    assert_eq!(multiplied_velocity(&world, multiplier), Vec3::new(2.0, 0.0, -3.0));
    assert_eq!(multiplied_angular_velocity(&world, multiplier), Vec3::new(0.0, 3.0, 0.0));

    world.get_mut::<VelocityTracker>(tracker).unwrap().enabled = false;
    assert_eq!(multiplied_velocity(&world, multiplier), Vec3::ZERO);

    world.get_mut::<VelocityTracker>(tracker).unwrap().enabled = true;
    clear_velocity_multiplier_source(&mut world, multiplier);
    assert_eq!(multiplied_velocity(&world, multiplier), Vec3::ZERO);
}

// =============================================================================
// Moment processes
// =============================================================================

#[derive(Resource, Default)]
struct Ticks(Vec<&'static str>);

fn tick_a(mut ticks: ResMut<Ticks>) {
    ticks.0.push("a");
}

fn tick_b(mut ticks: ResMut<Ticks>) {
    ticks.0.push("b");
}

fn process_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((schedule_new_moment_processes, composite_process_system).chain());
    schedule
}

#[test]
fn composite_runs_due_processes_in_order() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.init_resource::<Ticks>();
    let a = world.register_system(tick_a);
    let b = world.register_system(tick_b);
    let first = world.spawn(MomentProcess::new(b)).id();
    let second = world.spawn(MomentProcess::new(a)).id();
    world.spawn(CompositeProcess::new([first, second]));
    let mut schedule = process_schedule();

    update_world_time(&mut world, 0.1);
    schedule.run(&mut world);

    assert_eq!(world.resource::<Ticks>().0, vec!["b", "a"]);
}

#[test]
fn processes_wait_for_their_interval() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.init_resource::<Ticks>();
    let a = world.register_system(tick_a);
    let process = world.spawn(MomentProcess::new(a).with_interval(1.0)).id();
    world.spawn(CompositeProcess::new([process]));
    let mut schedule = process_schedule();

    // Ten seconds in steps of 0.25s fire roughly once per second.
    for _ in 0..40 {
        update_world_time(&mut world, 0.25);
        schedule.run(&mut world);
    }

    let fired = world.resource::<Ticks>().0.len();
    assert!((9..=11).contains(&fired), "fired {fired} times");
}

#[test]
fn inactive_process_is_skipped() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.init_resource::<Ticks>();
    let a = world.register_system(tick_a);
    let folder = world.spawn(Active(false)).id();
    let process = world.spawn((MomentProcess::new(a), ChildOf(folder))).id();
    world.spawn(CompositeProcess::new([process]));
    let mut schedule = process_schedule();

    update_world_time(&mut world, 0.1);
    schedule.run(&mut world);
    assert!(world.resource::<Ticks>().0.is_empty());
    assert!(!process_now(&mut world, process));

    let mut always = MomentProcess::new(a);
    always.only_process_on_active_and_enabled = false;
    world.entity_mut(process).insert(always);
    assert!(process_now(&mut world, process));
    assert_eq!(world.resource::<Ticks>().0, vec!["a"]);
}

#[test]
fn cleared_source_never_runs() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.init_resource::<Ticks>();
    let a = world.register_system(tick_a);
    let process = world.spawn(MomentProcess::new(a)).id();

    clear_moment_process_source(&mut world, process);
    assert!(!process_now(&mut world, process));
    assert!(world.resource::<Ticks>().0.is_empty());
}

// =============================================================================
// Observable values
// =============================================================================

#[derive(Resource, Default)]
struct Changes(Vec<PropertyChanged>);

#[derive(Resource, Default)]
struct Transformed(Vec<f32>);

#[test]
fn property_writes_trigger_change_events() {
    let mut world = World::new();
    world.init_resource::<Changes>();
    world.add_observer(|t: On<PropertyChanged>, mut changes: ResMut<Changes>| {
        changes.0.push(*t.event());
    });
    let entity = world
        .spawn(Vector3ObservableProperty::new().with_tolerance(0.01))
        .id();

    assert_eq!(set_property(&mut world, entity, Vec3::ONE), Some(PropertyChange::Initialized));
    assert_eq!(set_property(&mut world, entity, Vec3::ONE), Some(PropertyChange::Unmodified));
    assert_eq!(set_property(&mut world, entity, Vec3::ZERO), Some(PropertyChange::Modified));

    let changes = &world.resource::<Changes>().0;
    assert_eq!(changes.len(), 3);
    assert_eq!(changes[2].value, PropertyValue::Vector3(Vec3::ZERO));
    assert_eq!(changes[2].entity, entity);
}

#[test]
fn disabled_property_ignores_writes() {
    let mut world = World::new();
    let mut property = FloatObservableProperty::new();
    property.enabled = false;
    let entity = world.spawn(property).id();

    assert_eq!(set_property(&mut world, entity, 1.0_f32), None);
    assert_eq!(world.get::<FloatObservableProperty>(entity).unwrap().data(), None);
}

#[test]
fn remapper_reports_transformed_value() {
    let mut world = World::new();
    world.init_resource::<Transformed>();
    world.add_observer(|t: On<FloatTransformed>, mut seen: ResMut<Transformed>| {
        seen.0.push(t.event().value);
    });
    let entity = world
        .spawn(FloatRangeValueRemapper::new(
            FloatRange::new(0.0, 2.0),
            FloatRange::new(10.0, 20.0),
        ))
        .id();

    assert_eq!(transform_float(&mut world, entity, 1.0), Some(15.0));
    assert_eq!(world.resource::<Transformed>().0, vec![15.0]);

    world.entity_mut(entity).insert(Active(false));
    assert_eq!(transform_float(&mut world, entity, 1.0), None);
}

#[test]
fn time_scale_slows_world_time() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(0.5));
    update_world_time(&mut world, 0.2);
    let time = world.resource::<WorldTime>();
    assert!(approx_eq(time.delta, 0.1));
    assert!(approx_eq(time.elapsed, 0.1));
}
