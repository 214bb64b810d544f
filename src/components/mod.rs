//! ECS components for interaction entities.
//!
//! Components hold the data of rules, the collision publish/consume protocol,
//! velocity helpers, processes and observable values. Behaviour that needs to
//! reach across entities lives in [`systems`](crate::systems).
//!
//! Submodules overview:
//! - [`activecollisionconsumer`] – receiver of published collision payloads
//! - [`activecollisionpublisher`] – publisher and its reusable payload
//! - [`activecollisions`] – tracker of ongoing collisions
//! - [`collision`] – a single collision record
//! - [`floatremapper`] – range-to-range float remapping
//! - [`gameobject`] – activity, layer, tag and local transform of an entity
//! - [`momentprocess`] – interval-driven processes and composites
//! - [`observableproperty`] – values that report when they change
//! - [`registeredconsumers`] – bookkeeping of consumers a publisher reached
//! - [`rule`] – rules and rule composition
//! - [`velocity`] – velocity trackers, multipliers and the artificial applier

pub mod activecollisionconsumer;
pub mod activecollisionpublisher;
pub mod activecollisions;
pub mod collision;
pub mod floatremapper;
pub mod gameobject;
pub mod momentprocess;
pub mod observableproperty;
pub mod registeredconsumers;
pub mod rule;
pub mod velocity;
