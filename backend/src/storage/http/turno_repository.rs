//! Monthly (`/api/turnos`) and weekly (`/api/turnosSemanales`) slot endpoints.

use async_trait::async_trait;
use log::{debug, info};
use shared::{
    ApiMessage, AsignarTurnoRequest, CreateTurnoRequest, LiberarTurnoRequest, MisTurnosResponse,
    TipoTurno, Turno,
};

use super::connection::AstrosConnection;
use crate::domain::models::AuthToken;
use crate::storage::{GatewayResult, TurnoStorage};

#[derive(Clone)]
pub struct TurnoRepository {
    connection: AstrosConnection,
}

impl TurnoRepository {
    pub fn new(connection: AstrosConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TurnoStorage for TurnoRepository {
    async fn list_turnos(&self, token: &AuthToken, dia: Option<&str>) -> GatewayResult<Vec<Turno>> {
        let query: Vec<(&str, &str)> = dia.map(|d| ("dia", d)).into_iter().collect();
        let turnos: Vec<Turno> = self
            .connection
            .get(&["api", "turnos", "todos"], &query, Some(token))
            .await?;
        debug!("Fetched {} slots (dia={:?})", turnos.len(), dia);
        Ok(turnos)
    }

    async fn create_turno(&self, token: &AuthToken, request: &CreateTurnoRequest) -> GatewayResult<ApiMessage> {
        info!("Creating slot {} {} at {}", request.dia, request.hora, request.sede);
        // The API only routes the trailing-slash form
        self.connection
            .post(&["api", "turnos", ""], Some(request), Some(token))
            .await
    }

    async fn delete_turno(&self, token: &AuthToken, turno_id: &str) -> GatewayResult<ApiMessage> {
        info!("Deleting slot {}", turno_id);
        self.connection.delete(&["api", "turnos", turno_id], token).await
    }

    async fn assign_turno(&self, token: &AuthToken, request: &AsignarTurnoRequest) -> GatewayResult<ApiMessage> {
        info!("Assigning slot {} to {}", request.turno_id, request.user_id);
        self.connection
            .post(&["api", "turnos", "asignar"], Some(request), Some(token))
            .await
    }

    async fn release_turno(&self, token: &AuthToken, request: &LiberarTurnoRequest) -> GatewayResult<ApiMessage> {
        info!("Releasing {:?} slot {} for {}", request.tipo, request.turno_id, request.user_id);
        let path: &[&str] = match request.tipo {
            TipoTurno::Mensual => &["api", "turnos", "liberar"],
            TipoTurno::Semanal => &["api", "turnosSemanales", "liberarSema"],
        };
        self.connection.put(path, request, token).await
    }

    async fn list_weekly(&self, token: &AuthToken) -> GatewayResult<Vec<Turno>> {
        self.connection
            .get(&["api", "turnosSemanales", "todoSema"], &[], Some(token))
            .await
    }

    async fn list_weekly_available(&self, token: &AuthToken) -> GatewayResult<Vec<Turno>> {
        self.connection
            .get(&["api", "turnosSemanales", "disponibles"], &[], Some(token))
            .await
    }

    async fn take_weekly(&self, token: &AuthToken, turno_id: &str) -> GatewayResult<ApiMessage> {
        info!("Taking weekly slot {}", turno_id);
        self.connection
            .post(&["api", "turnosSemanales", "tomar", turno_id], Some(&serde_json::json!({})), Some(token))
            .await
    }

    async fn assign_weekly(&self, token: &AuthToken, request: &AsignarTurnoRequest) -> GatewayResult<ApiMessage> {
        info!("Assigning weekly slot {} to {}", request.turno_id, request.user_id);
        self.connection
            .post(&["api", "turnosSemanales", "asignarSema"], Some(request), Some(token))
            .await
    }

    async fn my_turnos(&self, token: &AuthToken) -> GatewayResult<MisTurnosResponse> {
        self.connection
            .get(&["api", "turnosSemanales", "misTurnos"], &[], Some(token))
            .await
    }

    async fn user_turnos(&self, token: &AuthToken, user_id: &str, tipo: TipoTurno) -> GatewayResult<Vec<Turno>> {
        let endpoint = match tipo {
            TipoTurno::Mensual => "turnosMensuales",
            TipoTurno::Semanal => "turnosSemanales",
        };
        self.connection
            .get(&["api", "users", endpoint, user_id], &[], Some(token))
            .await
    }
}
