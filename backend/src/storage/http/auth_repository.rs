use async_trait::async_trait;
use log::info;
use shared::{ApiMessage, LoginRequest, LoginResponse, RegisterRequest, User};

use super::connection::AstrosConnection;
use crate::domain::models::AuthToken;
use crate::storage::{AuthStorage, GatewayResult};

/// Login, registration and profile endpoints under `/api/users`
#[derive(Clone)]
pub struct AuthRepository {
    connection: AstrosConnection,
}

impl AuthRepository {
    pub fn new(connection: AstrosConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl AuthStorage for AuthRepository {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse> {
        info!("Logging in {}", request.email);
        self.connection
            .post(&["api", "users", "login"], Some(request), None)
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<ApiMessage> {
        info!("Registering {} ({})", request.username, request.email);
        self.connection
            .post(&["api", "users", "register"], Some(request), None)
            .await
    }

    async fn get_profile(&self, token: &AuthToken) -> GatewayResult<User> {
        self.connection
            .get(&["api", "users", "profile"], &[], Some(token))
            .await
    }
}
