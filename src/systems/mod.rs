//! Systems, observers and exclusive world operations.
//!
//! - [`activecollision`] – the publish/consume/registration protocol
//! - [`hierarchy`] – activity, ancestry and subtree discovery
//! - [`process`] – moment and composite processes
//! - [`property`] – remapper and observable property setters
//! - [`rule`] – rule evaluation
//! - [`time`] – world clock updates
//! - [`velocity`] – artificial velocity and velocity multipliers
pub mod activecollision;
pub mod hierarchy;
pub mod process;
pub mod property;
pub mod rule;
pub mod time;
pub mod velocity;
