use async_trait::async_trait;
use log::info;
use shared::{ApiMessage, UpdateUserRequest, User};

use super::connection::AstrosConnection;
use crate::domain::models::AuthToken;
use crate::storage::{GatewayResult, UserStorage};

/// Member administration endpoints under `/api/users`
#[derive(Clone)]
pub struct UserRepository {
    connection: AstrosConnection,
}

impl UserRepository {
    pub fn new(connection: AstrosConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn list_users(&self, token: &AuthToken) -> GatewayResult<Vec<User>> {
        self.connection
            .get(&["api", "users", "usuarios"], &[], Some(token))
            .await
    }

    async fn get_user(&self, token: &AuthToken, user_id: &str) -> GatewayResult<User> {
        self.connection
            .get(&["api", "users", "usuario", user_id], &[], Some(token))
            .await
    }

    async fn update_user(&self, token: &AuthToken, request: &UpdateUserRequest) -> GatewayResult<ApiMessage> {
        info!("Updating user {}", request.id);
        self.connection
            .put(&["api", "users", "profile"], request, token)
            .await
    }
}
