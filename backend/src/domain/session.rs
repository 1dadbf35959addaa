//! Process-wide authenticated session.
//!
//! The gateway serves a single UI, so there is exactly one session at a time.
//! It is created by a successful login, destroyed by logout or by any 401 from
//! the Astros API, and mirrored to local storage so a restart keeps the user
//! logged in.

use chrono::Utc;
use log::{info, warn};
use shared::{Capabilities, Role, User};
use std::sync::{Arc, RwLock};

use crate::domain::error::ServiceError;
use crate::domain::models::{AuthToken, Session};
use crate::storage::{GatewayError, SessionStorage};

#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
    storage: Option<Arc<dyn SessionStorage>>,
}

impl SessionContext {
    /// Create a context backed by `storage`, restoring any saved session
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = match storage.load_session() {
            Ok(Some(session)) => {
                info!("Restored session for user {}", session.user.id);
                Some(session)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring unreadable stored session: {}", e);
                None
            }
        };

        Self {
            current: Arc::new(RwLock::new(restored)),
            storage: Some(storage),
        }
    }

    /// A context that never touches disk
    pub fn in_memory() -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            storage: None,
        }
    }

    /// Replace the current session with a new one for `user`
    pub fn establish(&self, token: AuthToken, user: User) -> Session {
        let session = Session {
            token,
            user,
            created_at: Utc::now().to_rfc3339(),
        };

        if let Some(storage) = &self.storage {
            if let Err(e) = storage.save_session(&session) {
                warn!("Session for {} will not survive a restart: {}", session.user.id, e);
            }
        }

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        info!("Session established for user {} ({})", session.user.id, session.user.role);
        session
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// The current session, or `NotAuthenticated`
    pub fn require(&self) -> Result<Session, ServiceError> {
        self.current().ok_or(ServiceError::NotAuthenticated)
    }

    /// The current session, provided its user is an admin or a teacher
    pub fn require_staff(&self, action: &'static str) -> Result<Session, ServiceError> {
        let session = self.require()?;
        if !session.user.role.is_staff() {
            warn!("User {} ({}) tried to {}", session.user.id, session.user.role, action);
            return Err(ServiceError::Forbidden {
                role: session.user.role,
                action,
            });
        }
        Ok(session)
    }

    /// Drop the current session, in memory and on disk
    pub fn destroy(&self) {
        let previous = self.current.write().unwrap_or_else(|e| e.into_inner()).take();

        if let Some(storage) = &self.storage {
            if let Err(e) = storage.clear_session() {
                warn!("Failed to clear stored session: {}", e);
            }
        }

        if let Some(session) = previous {
            info!("Session ended for user {}", session.user.id);
        }
    }

    /// Map a gateway result into the domain, ending the session on 401
    pub fn guard<T>(&self, result: Result<T, GatewayError>) -> Result<T, ServiceError> {
        match result {
            Ok(value) => Ok(value),
            Err(GatewayError::Unauthorized) => {
                warn!("Astros API rejected the session token, logging out");
                self.destroy();
                Err(ServiceError::NotAuthenticated)
            }
            Err(e) => Err(ServiceError::Upstream(e)),
        }
    }
}

/// What a role may do in the UI
pub fn capabilities(role: Role) -> Capabilities {
    let staff = role.is_staff();
    Capabilities {
        manage_turnos: staff,
        manage_users: staff,
        manage_credits: staff,
        take_turnos: role.is_student(),
    }
}

#[cfg(test)]
pub(crate) fn test_user(id: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        username: id.to_string(),
        email: format!("{}@astros.test", id),
        first_name: "Test".to_string(),
        last_name: id.to_string(),
        role,
        telefono: None,
        activo: true,
    }
}
