//! # Storage Traits
//!
//! The gateway owns no booking data: slots, users and credits live behind the
//! Astros API. These traits abstract that remote store so the domain services
//! can be exercised against in-memory doubles. Every authenticated operation
//! takes the caller's [`AuthToken`] explicitly.
//!
//! The session itself is the only thing kept locally, see [`SessionStorage`].

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    ApiMessage, AsignarTurnoRequest, CreateCreditoRequest, CreatePlantillaUsuarioRequest,
    CreateTurnoRequest, Credito, LiberarTurnoRequest, LoginRequest, LoginResponse,
    MisTurnosResponse, PlantillaTurnoUsuario, RegisterRequest, TipoTurno, Turno,
    UpdateUserRequest, User,
};

use crate::domain::models::{AuthToken, Session};
use crate::storage::GatewayError;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Authentication and account creation
#[async_trait]
pub trait AuthStorage: Send + Sync {
    /// Exchange credentials for a token
    async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse>;

    /// Create a new account (no token required)
    async fn register(&self, request: &RegisterRequest) -> GatewayResult<ApiMessage>;

    /// Profile of the token's owner
    async fn get_profile(&self, token: &AuthToken) -> GatewayResult<User>;
}

/// Monthly and weekly slots
#[async_trait]
pub trait TurnoStorage: Send + Sync {
    /// All dated slots, optionally only those on a Spanish weekday label
    async fn list_turnos(&self, token: &AuthToken, dia: Option<&str>) -> GatewayResult<Vec<Turno>>;

    async fn create_turno(&self, token: &AuthToken, request: &CreateTurnoRequest) -> GatewayResult<ApiMessage>;

    async fn delete_turno(&self, token: &AuthToken, turno_id: &str) -> GatewayResult<ApiMessage>;

    /// Book a user into a dated slot
    async fn assign_turno(&self, token: &AuthToken, request: &AsignarTurnoRequest) -> GatewayResult<ApiMessage>;

    /// Free a user's seat in a monthly or weekly slot
    async fn release_turno(&self, token: &AuthToken, request: &LiberarTurnoRequest) -> GatewayResult<ApiMessage>;

    async fn list_weekly(&self, token: &AuthToken) -> GatewayResult<Vec<Turno>>;

    /// Weekly slots with free seats for the token's owner
    async fn list_weekly_available(&self, token: &AuthToken) -> GatewayResult<Vec<Turno>>;

    /// The token's owner claims a weekly slot
    async fn take_weekly(&self, token: &AuthToken, turno_id: &str) -> GatewayResult<ApiMessage>;

    async fn assign_weekly(&self, token: &AuthToken, request: &AsignarTurnoRequest) -> GatewayResult<ApiMessage>;

    /// Both booking kinds of the token's owner
    async fn my_turnos(&self, token: &AuthToken) -> GatewayResult<MisTurnosResponse>;

    /// Bookings of any user, by kind
    async fn user_turnos(&self, token: &AuthToken, user_id: &str, tipo: TipoTurno) -> GatewayResult<Vec<Turno>>;
}

/// Recurring templates used to generate slots
#[async_trait]
pub trait PlantillaStorage: Send + Sync {
    async fn create_template(&self, token: &AuthToken, request: &CreateTurnoRequest) -> GatewayResult<ApiMessage>;

    /// Slots generated for a user in the current week
    async fn week_for_user(&self, token: &AuthToken, user_id: &str) -> GatewayResult<Vec<Turno>>;

    async fn list_user_templates(&self, token: &AuthToken) -> GatewayResult<Vec<PlantillaTurnoUsuario>>;

    async fn create_user_template(
        &self,
        token: &AuthToken,
        request: &CreatePlantillaUsuarioRequest,
    ) -> GatewayResult<ApiMessage>;

    async fn delete_user_template(&self, token: &AuthToken, template_id: &str) -> GatewayResult<ApiMessage>;
}

/// Club member accounts
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn list_users(&self, token: &AuthToken) -> GatewayResult<Vec<User>>;

    async fn get_user(&self, token: &AuthToken, user_id: &str) -> GatewayResult<User>;

    async fn update_user(&self, token: &AuthToken, request: &UpdateUserRequest) -> GatewayResult<ApiMessage>;
}

/// Credit ledger entries
#[async_trait]
pub trait CreditStorage: Send + Sync {
    /// Credits of a user, oldest first as ordered by the API
    async fn list_credits(&self, token: &AuthToken, user_id: &str) -> GatewayResult<Vec<Credito>>;

    async fn create_credit(&self, token: &AuthToken, request: &CreateCreditoRequest) -> GatewayResult<ApiMessage>;

    async fn delete_credit(&self, token: &AuthToken, credit_id: &str) -> GatewayResult<ApiMessage>;

    /// Spend the token owner's oldest credit; needs no staff rights
    async fn consume_own_oldest(&self, token: &AuthToken) -> GatewayResult<ApiMessage>;
}

/// Local persistence of the single process-wide session
pub trait SessionStorage: Send + Sync {
    /// Previously saved session, if any
    fn load_session(&self) -> Result<Option<Session>>;

    fn save_session(&self, session: &Session) -> Result<()>;

    /// Forget the saved session; succeeds when there is none
    fn clear_session(&self) -> Result<()>;
}
