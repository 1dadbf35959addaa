use shared::Role;

use crate::storage::GatewayError;

/// Errors surfaced by the domain services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No active session, please log in")]
    NotAuthenticated,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Role {role} is not allowed to {action}")]
    Forbidden { role: Role, action: &'static str },
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    /// Any remote failure except 401, which always ends the session instead
    #[error(transparent)]
    Upstream(GatewayError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ServiceError {
    /// Report an upstream 404 as `NotFound(what)`, leave anything else as is
    pub fn or_not_found(self, what: impl FnOnce() -> String) -> Self {
        match self {
            ServiceError::Upstream(GatewayError::Rejected { status, .. }) if status.as_u16() == 404 => {
                ServiceError::NotFound(what())
            }
            other => other,
        }
    }
}
