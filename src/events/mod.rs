//! Event types exchanged through observers.
//!
//! Events are triggered synchronously; observers run before the triggering
//! operation returns.
//!
//! Submodules:
//! - [`activecollision`] – publish, consume and registration notifications
//! - [`collision`] – collision tracking input and change notifications
//! - [`property`] – remapped values and observable property writes
pub mod activecollision;
pub mod collision;
pub mod property;
