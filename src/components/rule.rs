//! Rule components.
//!
//! A [`Rule`] lives on its own entity and answers whether a [`RuleTarget`] is
//! accepted. The concrete predicate is selected by [`RuleKind`]; rules refer to
//! each other through [`RuleContainer`] so that an [`AnyRule`] can compose
//! other rule entities.
//!
//! Every rule carries an auto-reject policy ([`RejectRuleStates`]) computed from
//! its own `enabled` flag and from whether its entity is active in the
//! hierarchy. The policy is only consulted by kinds that opt in: [`AnyRule`]
//! does, the layer, tag and navigation mesh rules look at their target alone.
//!
//! Evaluation against a world lives in
//! [`systems::rule`](crate::systems::rule).

use bevy_ecs::prelude::{Component, Entity};
use bitflags::bitflags;
use glam::Vec3;

use crate::components::gameobject::{Layer, LayerMask, Tag};

bitflags! {
    /// States that make a [`Rule`] reject automatically.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RejectRuleStates: u8 {
        /// Reject while the rule component is disabled.
        const RULE_COMPONENT_IS_DISABLED = 1 << 0;
        /// Reject while the rule entity is not active in the hierarchy.
        const RULE_ENTITY_IS_NOT_ACTIVE_IN_HIERARCHY = 1 << 1;
    }
}

impl Default for RejectRuleStates {
    fn default() -> Self {
        Self::all()
    }
}

/// What a rule is asked about.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RuleTarget {
    Entity(Entity),
    Point(Vec3),
}

impl From<Entity> for RuleTarget {
    fn from(entity: Entity) -> Self {
        RuleTarget::Entity(entity)
    }
}

impl From<Vec3> for RuleTarget {
    fn from(point: Vec3) -> Self {
        RuleTarget::Point(point)
    }
}

/// Optional reference to an entity holding a [`Rule`].
///
/// An empty container accepts everything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RuleContainer(pub Option<Entity>);

impl RuleContainer {
    pub fn new(rule: Entity) -> Self {
        RuleContainer(Some(rule))
    }

    pub fn empty() -> Self {
        RuleContainer(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// Accepts entities whose [`Layer`] is part of a mask.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnyLayerRule {
    pub layer_mask: LayerMask,
}

impl AnyLayerRule {
    pub fn new(layer_mask: LayerMask) -> Self {
        Self { layer_mask }
    }

    pub fn accepts_layer(&self, layer: Layer) -> bool {
        self.layer_mask.contains(layer)
    }
}

/// Accepts entities whose [`Tag`] is one of a list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnyTagRule {
    pub tags: Option<Vec<String>>,
}

impl AnyTagRule {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: Some(tags.into_iter().map(Into::into).collect()),
        }
    }

    pub fn accepts_tag(&self, tag: &Tag) -> bool {
        let Some(tags) = &self.tags else {
            return false;
        };
        tags.iter().any(|tested| tested == tag.as_str())
    }
}

/// Accepts points that snap onto the navigation mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavMeshRule {
    /// Vertical displacement of the mesh relative to the nearest surface.
    pub base_offset: f32,
    /// How far outside the mesh a point may be and still count as valid.
    pub distance_limit: f32,
    /// Area bit mask considered valid; `-1` allows every area.
    pub valid_areas: i32,
}

impl Default for NavMeshRule {
    fn default() -> Self {
        Self {
            base_offset: 0.0,
            distance_limit: 0.1,
            valid_areas: -1,
        }
    }
}

/// Accepts when any contained rule accepts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnyRule {
    pub rules: Option<Vec<RuleContainer>>,
}

impl AnyRule {
    pub fn new(rules: impl IntoIterator<Item = Entity>) -> Self {
        Self {
            rules: Some(rules.into_iter().map(RuleContainer::new).collect()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RuleKind {
    AnyLayer(AnyLayerRule),
    AnyTag(AnyTagRule),
    NavMesh(NavMeshRule),
    Any(AnyRule),
}

/// A rule living on an entity.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Rule {
    pub enabled: bool,
    pub auto_reject_states: RejectRuleStates,
    pub kind: RuleKind,
}

impl Rule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            enabled: true,
            auto_reject_states: RejectRuleStates::default(),
            kind,
        }
    }

    pub fn any_layer(layer_mask: LayerMask) -> Self {
        Self::new(RuleKind::AnyLayer(AnyLayerRule::new(layer_mask)))
    }

    pub fn any_tag<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(RuleKind::AnyTag(AnyTagRule::new(tags)))
    }

    pub fn nav_mesh(rule: NavMeshRule) -> Self {
        Self::new(RuleKind::NavMesh(rule))
    }

    pub fn any(rules: impl IntoIterator<Item = Entity>) -> Self {
        Self::new(RuleKind::Any(AnyRule::new(rules)))
    }

    pub fn with_auto_reject_states(mut self, states: RejectRuleStates) -> Self {
        self.auto_reject_states = states;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the rule should reject regardless of its target.
    ///
    /// `active_in_hierarchy` is the state of the entity the rule lives on.
    pub fn should_auto_reject_due_to_state(&self, active_in_hierarchy: bool) -> bool {
        (self
            .auto_reject_states
            .contains(RejectRuleStates::RULE_COMPONENT_IS_DISABLED)
            && !self.enabled)
            || (self
                .auto_reject_states
                .contains(RejectRuleStates::RULE_ENTITY_IS_NOT_ACTIVE_IN_HIERARCHY)
                && !active_in_hierarchy)
    }
}
