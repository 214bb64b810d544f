//! Zinnia interaction building blocks.
//!
//! Rule-based filtering, active collision publishing and consuming, velocity
//! helpers, timed processes and observable values, built on `bevy_ecs`.
//!
//! This module exposes components, events, resources and systems for use by
//! host applications and integration tests.

pub mod components;
pub mod demo;
pub mod events;
pub mod resources;
pub mod systems;
