use bevy_ecs::prelude::*;

/// One physical collision as reported by the collision tracker.
///
/// The collider may belong to a body further up the hierarchy; the
/// [`containing_entity`](CollisionData::containing_entity) is the entity
/// consumers are searched under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionData {
    /// The entity that detected the collision, or that forwarded it.
    pub forward_source: Option<Entity>,
    /// Whether the collision came from a trigger volume.
    pub is_trigger: bool,
    /// The collider that was hit.
    pub collider: Entity,
    /// The body the collider is attached to, if any.
    pub attached_body: Option<Entity>,
}

impl CollisionData {
    pub fn new(collider: Entity) -> Self {
        Self {
            forward_source: None,
            is_trigger: false,
            collider,
            attached_body: None,
        }
    }

    pub fn with_attached_body(mut self, body: Entity) -> Self {
        self.attached_body = Some(body);
        self
    }

    pub fn with_forward_source(mut self, source: Entity) -> Self {
        self.forward_source = Some(source);
        self
    }

    pub fn as_trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// The attached body when present, otherwise the collider itself.
    pub fn containing_entity(&self) -> Entity {
        self.attached_body.unwrap_or(self.collider)
    }
}
