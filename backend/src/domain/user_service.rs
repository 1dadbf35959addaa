use log::info;
use shared::{ApiMessage, DashboardResponse, UpdateUserRequest, User, UserSummary};
use std::sync::Arc;

use crate::domain::commands::users::UpdateUserCommand;
use crate::domain::credit_service::CreditService;
use crate::domain::error::ServiceError;
use crate::domain::schedule::sort_by_full_name;
use crate::domain::session::{capabilities, SessionContext};
use crate::storage::UserStorage;

/// Service for member accounts and the landing dashboard
#[derive(Clone)]
pub struct UserService {
    session: SessionContext,
    users: Arc<dyn UserStorage>,
    credits: CreditService,
}

impl UserService {
    pub fn new(session: SessionContext, users: Arc<dyn UserStorage>, credits: CreditService) -> Self {
        Self {
            session,
            users,
            credits,
        }
    }

    /// All members ordered by full name, each with its credit count
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, ServiceError> {
        let session = self.session.require_staff("list members")?;
        let mut users = self.session.guard(self.users.list_users(&session.token).await)?;
        sort_by_full_name(&mut users);

        let mut summaries = Vec::with_capacity(users.len());
        for user in users {
            let credit_count = self.credits.count_credits(&session.token, &user.id).await?;
            summaries.push(UserSummary { user, credit_count });
        }

        info!("Listed {} members", summaries.len());
        Ok(summaries)
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, ServiceError> {
        let session = self.session.require()?;
        if user_id != session.user.id && !session.user.role.is_staff() {
            return Err(ServiceError::Forbidden {
                role: session.user.role,
                action: "view another member",
            });
        }
        if user_id.trim().is_empty() {
            return Err(ServiceError::Validation("User id is required".to_string()));
        }
        self.session
            .guard(self.users.get_user(&session.token, user_id).await)
            .map_err(|e| e.or_not_found(|| format!("User {}", user_id)))
    }

    pub async fn update_user(&self, command: UpdateUserCommand) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("edit members")?;

        let request = UpdateUserRequest {
            id: command.user_id.trim().to_string(),
            username: command.username.trim().to_string(),
            first_name: command.first_name.trim().to_string(),
            last_name: command.last_name.trim().to_string(),
            role: command.role,
            activo: command.activo,
        };
        for (value, field) in [
            (&request.id, "User id"),
            (&request.username, "Username"),
            (&request.first_name, "First name"),
            (&request.last_name, "Last name"),
        ] {
            if value.is_empty() {
                return Err(ServiceError::Validation(format!("{} is required", field)));
            }
        }

        let message = self.session.guard(self.users.update_user(&session.token, &request).await)?;
        info!("Updated member {} (role {}, active {})", request.id, request.role, request.activo);
        Ok(message)
    }

    /// Fresh profile of the session user, credit count and capabilities
    pub async fn dashboard(&self) -> Result<DashboardResponse, ServiceError> {
        let session = self.session.require()?;
        let user = self.session.guard(self.users.get_user(&session.token, &session.user.id).await)?;
        let credit_count = self.credits.count_credits(&session.token, &user.id).await?;
        let capabilities = capabilities(user.role);

        Ok(DashboardResponse {
            user,
            credit_count,
            capabilities,
        })
    }
}
