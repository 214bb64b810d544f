//! Per-entity scene state shared by rules, consumers and processes.
//!
//! An entity behaves like a scene object: it may be switched off with
//! [`Active`], it lives on a [`Layer`], it carries a [`Tag`], and it may have a
//! [`LocalTransform`]. Every component is optional; missing components read as
//! the scene defaults (active, layer 0, `"Untagged"`, identity transform).

use bevy_ecs::prelude::Component;
use glam::{Quat, Vec3};

/// Tag reported by entities without a [`Tag`] component.
pub const UNTAGGED: &str = "Untagged";

/// Number of addressable layers in a [`LayerMask`].
pub const LAYER_COUNT: u8 = 32;

/// Local "active self" flag. An entity without this component is active.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Active(pub bool);

impl Default for Active {
    fn default() -> Self {
        Active(true)
    }
}

/// Layer index in `0..32`.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Layer(pub u8);

/// Bit set of layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Mask with no layer set.
    pub const NOTHING: LayerMask = LayerMask(0);
    /// Mask with every layer set.
    pub const EVERYTHING: LayerMask = LayerMask(u32::MAX);

    /// Build a mask from a list of layer indices. Out of range indices are ignored.
    pub fn from_layers(layers: &[u8]) -> Self {
        layers
            .iter()
            .filter(|layer| **layer < LAYER_COUNT)
            .fold(LayerMask::NOTHING, |mask, layer| {
                LayerMask(mask.0 | (1u32 << *layer))
            })
    }

    /// Whether the bit for `layer` is set.
    pub fn contains(&self, layer: Layer) -> bool {
        layer.0 < LAYER_COUNT && (self.0 & (1u32 << layer.0)) != 0
    }
}

/// String tag used by tag rules.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(pub String);

impl Tag {
    pub fn new(tag: impl Into<String>) -> Self {
        Tag(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Tag {
    fn default() -> Self {
        Tag(UNTAGGED.to_string())
    }
}

/// Position and rotation relative to the parent entity.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl LocalTransform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}
