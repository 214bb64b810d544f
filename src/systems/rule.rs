//! Rule evaluation.
//!
//! Rules are evaluated through the [`RuleSource`] trait so the same code runs
//! against a whole [`World`] (exclusive operations such as publishing) and
//! against the [`RuleQueries`] system parameter (regular systems).
//!
//! # Example
//!
//! ```ignore
//! fn gate(rules: RuleQueries, hands: Query<Entity, With<Hand>>) {
//!     for hand in hands.iter() {
//!         if rule_accepts(&rules, grab_rule, RuleTarget::Entity(hand)) { /* ... */ }
//!     }
//! }
//! ```

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use glam::Vec3;
use log::warn;
use smallvec::SmallVec;

use crate::components::gameobject::{Layer, LocalTransform, Tag};
use crate::components::rule::{Rule, RuleContainer, RuleKind, RuleTarget};
use crate::resources::navmesh::NavMesh;
use crate::systems::hierarchy::{self, Activity};

/// Nesting limit for composed rules.
pub const MAX_RULE_DEPTH: usize = 32;

/// Read access to everything a rule may look at.
pub trait RuleSource {
    fn rule(&self, entity: Entity) -> Option<&Rule>;
    fn layer(&self, entity: Entity) -> Option<Layer>;
    fn tag(&self, entity: Entity) -> Option<&Tag>;
    fn position(&self, entity: Entity) -> Option<Vec3>;
    fn is_active_in_hierarchy(&self, entity: Entity) -> bool;
    fn nav_mesh(&self) -> Option<&NavMesh>;
}

impl RuleSource for World {
    fn rule(&self, entity: Entity) -> Option<&Rule> {
        self.get::<Rule>(entity)
    }

    fn layer(&self, entity: Entity) -> Option<Layer> {
        self.get::<Layer>(entity).copied()
    }

    fn tag(&self, entity: Entity) -> Option<&Tag> {
        self.get::<Tag>(entity)
    }

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.get::<LocalTransform>(entity).map(|t| t.position)
    }

    fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        hierarchy::is_active_in_hierarchy(self, entity)
    }

    fn nav_mesh(&self) -> Option<&NavMesh> {
        self.get_resource::<NavMesh>()
    }
}

/// System parameter bundling the queries rule evaluation needs.
#[derive(SystemParam)]
pub struct RuleQueries<'w, 's> {
    rules: Query<'w, 's, &'static Rule>,
    layers: Query<'w, 's, &'static Layer>,
    tags: Query<'w, 's, &'static Tag>,
    transforms: Query<'w, 's, &'static LocalTransform>,
    activity: Activity<'w, 's>,
    nav_mesh: Option<Res<'w, NavMesh>>,
}

impl RuleSource for RuleQueries<'_, '_> {
    fn rule(&self, entity: Entity) -> Option<&Rule> {
        self.rules.get(entity).ok()
    }

    fn layer(&self, entity: Entity) -> Option<Layer> {
        self.layers.get(entity).ok().copied()
    }

    fn tag(&self, entity: Entity) -> Option<&Tag> {
        self.tags.get(entity).ok()
    }

    fn position(&self, entity: Entity) -> Option<Vec3> {
        self.transforms.get(entity).ok().map(|t| t.position)
    }

    fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        self.activity.is_active_in_hierarchy(entity)
    }

    fn nav_mesh(&self) -> Option<&NavMesh> {
        self.nav_mesh.as_deref()
    }
}

/// Whether the rule on `rule_entity` should reject because of its own state.
///
/// Entities without a [`Rule`] never auto-reject.
pub fn should_auto_reject_due_to_state<S: RuleSource + ?Sized>(
    source: &S,
    rule_entity: Entity,
) -> bool {
    source.rule(rule_entity).is_some_and(|rule| {
        rule.should_auto_reject_due_to_state(source.is_active_in_hierarchy(rule_entity))
    })
}

/// Evaluate the rule on `rule_entity` against `target`.
///
/// Returns `false` when the entity carries no [`Rule`].
pub fn rule_accepts<S: RuleSource + ?Sized>(
    source: &S,
    rule_entity: Entity,
    target: RuleTarget,
) -> bool {
    accepts_on_path(source, rule_entity, target, &mut RulePath::new())
}

/// Evaluate a container: empty containers, and containers pointing at
/// entities without a [`Rule`], accept.
pub fn container_accepts<S: RuleSource + ?Sized>(
    source: &S,
    container: &RuleContainer,
    target: RuleTarget,
) -> bool {
    container_accepts_on_path(source, container, target, &mut RulePath::new())
}

/// Whether `container` points at an entity carrying a [`Rule`].
///
/// Containers without one accept every target.
pub fn container_has_rule<S: RuleSource + ?Sized>(source: &S, container: &RuleContainer) -> bool {
    container.0.is_some_and(|rule_entity| source.rule(rule_entity).is_some())
}

/// Rule entities on the current evaluation path, outermost first.
type RulePath = SmallVec<[Entity; 8]>;

fn container_accepts_on_path<S: RuleSource + ?Sized>(
    source: &S,
    container: &RuleContainer,
    target: RuleTarget,
    path: &mut RulePath,
) -> bool {
    match container.0 {
        Some(rule_entity) if container_has_rule(source, container) => {
            accepts_on_path(source, rule_entity, target, path)
        }
        _ => true,
    }
}

fn accepts_on_path<S: RuleSource + ?Sized>(
    source: &S,
    rule_entity: Entity,
    target: RuleTarget,
    path: &mut RulePath,
) -> bool {
    if path.contains(&rule_entity) {
        warn!("Rule {:?} contains itself, rejecting", rule_entity);
        return false;
    }
    if path.len() >= MAX_RULE_DEPTH {
        warn!(
            "Rule {:?} nested deeper than {} levels, rejecting",
            rule_entity, MAX_RULE_DEPTH
        );
        return false;
    }
    let Some(rule) = source.rule(rule_entity) else {
        return false;
    };

    match &rule.kind {
        RuleKind::AnyLayer(layer_rule) => match target {
            RuleTarget::Entity(entity) => {
                layer_rule.accepts_layer(source.layer(entity).unwrap_or_default())
            }
            RuleTarget::Point(_) => false,
        },
        RuleKind::AnyTag(tag_rule) => match target {
            RuleTarget::Entity(entity) => match source.tag(entity) {
                Some(tag) => tag_rule.accepts_tag(tag),
                None => tag_rule.accepts_tag(&Tag::default()),
            },
            RuleTarget::Point(_) => false,
        },
        RuleKind::NavMesh(nav_rule) => {
            let point = match target {
                RuleTarget::Point(point) => Some(point),
                RuleTarget::Entity(entity) => source.position(entity),
            };
            let (Some(point), Some(nav_mesh)) = (point, source.nav_mesh()) else {
                return false;
            };
            nav_mesh
                .sample_position(
                    point + Vec3::Y * nav_rule.base_offset,
                    nav_rule.distance_limit,
                    nav_rule.valid_areas,
                )
                .is_some()
        }
        RuleKind::Any(any_rule) => {
            if rule.should_auto_reject_due_to_state(source.is_active_in_hierarchy(rule_entity)) {
                return false;
            }
            let Some(rules) = &any_rule.rules else {
                return false;
            };
            path.push(rule_entity);
            let mut accepted = false;
            for contained in rules {
                if container_accepts_on_path(source, contained, target, path) {
                    accepted = true;
                    break;
                }
            }
            path.pop();
            accepted
        }
    }
}
