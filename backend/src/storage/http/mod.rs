//! Repositories backed by the Astros REST API.

pub mod auth_repository;
pub mod connection;
pub mod credit_repository;
pub mod plantilla_repository;
pub mod turno_repository;
pub mod user_repository;

pub use auth_repository::AuthRepository;
pub use connection::AstrosConnection;
pub use credit_repository::CreditRepository;
pub use plantilla_repository::PlantillaRepository;
pub use turno_repository::TurnoRepository;
pub use user_repository::UserRepository;
