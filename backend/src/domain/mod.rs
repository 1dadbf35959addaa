//! # Domain Layer
//!
//! Business rules of the booking gateway: who may do what, how slots are
//! validated and ordered, how bookings spend credits and how a month of slots
//! becomes a calendar grid.
//!
//! Services reach the Astros API only through the storage traits and receive
//! the session explicitly, so every rule here can be exercised with the
//! in-memory doubles.
//!
//! ## Services
//!
//! - [`AuthService`]: login, logout, registration
//! - [`TurnoService`]: monthly and weekly slots, bookings, releases
//! - [`PlantillaService`]: slot templates
//! - [`UserService`]: member administration and the dashboard
//! - [`CreditService`]: credit ledger and consumption on booking
//! - [`CalendarService`]: month grids

pub mod auth_service;
pub mod calendar;
pub mod commands;
pub mod credit_service;
pub mod error;
pub mod models;
pub mod plantilla_service;
pub mod schedule;
pub mod session;
pub mod turno_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use calendar::CalendarService;
pub use credit_service::CreditService;
pub use error::ServiceError;
pub use plantilla_service::PlantillaService;
pub use session::SessionContext;
pub use turno_service::TurnoService;
pub use user_service::UserService;
