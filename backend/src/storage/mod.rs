//! # Storage Module
//!
//! Access to everything the gateway does not own itself.
//!
//! Slots, users, templates and credits are stored by the Astros API and reached
//! through the [`http`] repositories. The only local state is the session,
//! persisted as YAML by [`yaml::SessionRepository`].
//!
//! Domain services depend on the traits in [`traits`], never on the concrete
//! repositories, so tests can swap in the doubles from `test_utils`.

pub mod error;
pub mod http;
pub mod traits;
pub mod yaml;

#[cfg(test)]
pub mod test_utils;

pub use error::GatewayError;
pub use traits::{
    AuthStorage, CreditStorage, GatewayResult, PlantillaStorage, SessionStorage, TurnoStorage,
    UserStorage,
};
