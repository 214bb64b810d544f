//! Hierarchy helpers over parent-child entities.
//!
//! Walks [`ChildOf`] upwards for activity and ancestry checks, and
//! [`Children`] downwards to discover components in a subtree. These are the
//! only scene-graph questions the interaction code asks.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use smallvec::SmallVec;

use crate::components::gameobject::Active;

/// Entity buffer returned by subtree discovery.
pub type EntityList = SmallVec<[Entity; 8]>;

/// System parameter answering activity questions from inside regular systems.
#[derive(SystemParam)]
pub struct Activity<'w, 's> {
    activity: Query<'w, 's, (Option<&'static Active>, Option<&'static ChildOf>)>,
}

impl Activity<'_, '_> {
    /// Same as [`is_active_in_hierarchy`], through queries.
    pub fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        let mut current = entity;
        loop {
            let Ok((active, child_of)) = self.activity.get(current) else {
                return false;
            };
            if active.is_some_and(|a| !a.0) {
                return false;
            }
            match child_of {
                Some(child_of) => current = child_of.parent(),
                None => return true,
            }
        }
    }
}

/// Whether `entity` and all of its ancestors are active.
///
/// Entities that do not exist are never active.
pub fn is_active_in_hierarchy(world: &World, entity: Entity) -> bool {
    let mut current = entity;
    loop {
        let Ok(entity_ref) = world.get_entity(current) else {
            return false;
        };
        if entity_ref.get::<Active>().is_some_and(|active| !active.0) {
            return false;
        }
        match entity_ref.get::<ChildOf>() {
            Some(child_of) => current = child_of.parent(),
            None => return true,
        }
    }
}

/// Whether `entity` is `ancestor` or one of its descendants.
pub fn is_child_of(world: &World, entity: Entity, ancestor: Entity) -> bool {
    let mut current = entity;
    loop {
        if current == ancestor {
            return true;
        }
        match world.get::<ChildOf>(current) {
            Some(child_of) => current = child_of.parent(),
            None => return false,
        }
    }
}

/// Collect every entity carrying `T` in the subtree rooted at `root`.
///
/// The root is included. Traversal is depth-first in child order and skips
/// inactive entities together with their subtrees; an inactive root yields
/// nothing.
pub fn find_components_in_children<T: Component>(world: &World, root: Entity) -> EntityList {
    let mut found = EntityList::new();
    if !is_active_in_hierarchy(world, root) {
        return found;
    }

    let mut stack: EntityList = SmallVec::new();
    stack.push(root);
    while let Some(current) = stack.pop() {
        let Ok(entity_ref) = world.get_entity(current) else {
            continue;
        };
        if entity_ref.get::<Active>().is_some_and(|active| !active.0) {
            continue;
        }
        if entity_ref.contains::<T>() {
            found.push(current);
        }
        if let Some(children) = entity_ref.get::<Children>() {
            let children: &[Entity] = children;
            // Reverse so the first child is popped first.
            stack.extend(children.iter().rev().copied());
        }
    }
    found
}
