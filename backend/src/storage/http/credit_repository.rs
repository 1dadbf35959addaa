use async_trait::async_trait;
use log::info;
use shared::{ApiMessage, CreateCreditoRequest, Credito};

use super::connection::AstrosConnection;
use crate::domain::models::AuthToken;
use crate::storage::{CreditStorage, GatewayResult};

/// Credit endpoints under `/api/creditos`
#[derive(Clone)]
pub struct CreditRepository {
    connection: AstrosConnection,
}

impl CreditRepository {
    pub fn new(connection: AstrosConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl CreditStorage for CreditRepository {
    async fn list_credits(&self, token: &AuthToken, user_id: &str) -> GatewayResult<Vec<Credito>> {
        self.connection
            .get(&["api", "creditos", "usuario", user_id], &[], Some(token))
            .await
    }

    async fn create_credit(&self, token: &AuthToken, request: &CreateCreditoRequest) -> GatewayResult<ApiMessage> {
        info!("Creating credit for {} expiring {}", request.usuario, request.vence_en);
        self.connection
            .post(&["api", "creditos"], Some(request), Some(token))
            .await
    }

    async fn delete_credit(&self, token: &AuthToken, credit_id: &str) -> GatewayResult<ApiMessage> {
        info!("Deleting credit {}", credit_id);
        self.connection.delete(&["api", "creditos", credit_id], token).await
    }

    async fn consume_own_oldest(&self, token: &AuthToken) -> GatewayResult<ApiMessage> {
        info!("Consuming the session user's oldest credit");
        self.connection
            .delete(&["api", "users", "creditos", "oldest"], token)
            .await
    }
}
