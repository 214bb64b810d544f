//! ECS resources.
//!
//! - [`config`] – INI-backed defaults for rules, velocity and time
//! - [`navmesh`] – navigation mesh proximity queries
//! - [`worldtime`] – frame and fixed-step timing
pub mod config;
pub mod navmesh;
pub mod worldtime;
