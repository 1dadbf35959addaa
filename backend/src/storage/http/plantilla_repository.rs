use async_trait::async_trait;
use log::info;
use serde_json::json;
use shared::{ApiMessage, CreatePlantillaUsuarioRequest, CreateTurnoRequest, PlantillaTurnoUsuario, Turno};

use super::connection::AstrosConnection;
use crate::domain::models::AuthToken;
use crate::storage::{GatewayResult, PlantillaStorage};

/// Slot templates (`/api/plantilla`) and per-user templates (`/api/plantilla-turnos-usuario`)
#[derive(Clone)]
pub struct PlantillaRepository {
    connection: AstrosConnection,
}

impl PlantillaRepository {
    pub fn new(connection: AstrosConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl PlantillaStorage for PlantillaRepository {
    async fn create_template(&self, token: &AuthToken, request: &CreateTurnoRequest) -> GatewayResult<ApiMessage> {
        info!("Creating template {} {} at {}", request.dia, request.hora, request.sede);
        self.connection
            .post(&["api", "plantilla"], Some(request), Some(token))
            .await
    }

    async fn week_for_user(&self, token: &AuthToken, user_id: &str) -> GatewayResult<Vec<Turno>> {
        self.connection
            .post(&["api", "plantilla", "turnosSemana"], Some(&json!({ "userId": user_id })), Some(token))
            .await
    }

    async fn list_user_templates(&self, token: &AuthToken) -> GatewayResult<Vec<PlantillaTurnoUsuario>> {
        self.connection
            .get(&["api", "plantilla-turnos-usuario"], &[], Some(token))
            .await
    }

    async fn create_user_template(
        &self,
        token: &AuthToken,
        request: &CreatePlantillaUsuarioRequest,
    ) -> GatewayResult<ApiMessage> {
        info!("Creating template {} {} for user {}", request.dia, request.hora, request.usuario);
        self.connection
            .post(&["api", "plantilla-turnos-usuario"], Some(request), Some(token))
            .await
    }

    async fn delete_user_template(&self, token: &AuthToken, template_id: &str) -> GatewayResult<ApiMessage> {
        info!("Deleting user template {}", template_id);
        self.connection
            .delete(&["api", "plantilla-turnos-usuario", template_id], token)
            .await
    }
}
