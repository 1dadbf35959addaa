//! In-memory stand-ins for the Astros API and the session file.
//!
//! `FakeAstros` implements every remote storage trait against a shared state
//! so service and handler tests can book, release and consume credits end to
//! end. Tokens are issued as `token-{user_id}`; flipping `revoked` makes every
//! authenticated call answer 401.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use shared::{
    ApiMessage, AsignarTurnoRequest, CreateCreditoRequest, CreatePlantillaUsuarioRequest,
    CreateTurnoRequest, Credito, LiberarTurnoRequest, LoginRequest, LoginResponse,
    MisTurnosResponse, PlantillaTurnoUsuario, RegisterRequest, TipoTurno, Turno,
    UpdateUserRequest, User,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::domain::models::{AuthToken, Session};
use crate::storage::{
    AuthStorage, CreditStorage, GatewayError, GatewayResult, PlantillaStorage, SessionStorage,
    TurnoStorage, UserStorage,
};

#[derive(Default)]
pub struct FakeState {
    pub users: Vec<User>,
    pub passwords: HashMap<String, String>,
    pub turnos: Vec<Turno>,
    pub weekly: Vec<Turno>,
    pub templates: Vec<CreateTurnoRequest>,
    pub user_templates: Vec<PlantillaTurnoUsuario>,
    pub week_slots: HashMap<String, Vec<Turno>>,
    pub credits: Vec<Credito>,
    pub registered: Vec<RegisterRequest>,
    pub revoked: bool,
    pub fail_credit_delete: bool,
    next_id: u32,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct FakeAstros {
    state: Mutex<FakeState>,
}

impl FakeAstros {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User, password: &str) -> Self {
        {
            let mut state = self.state();
            state.passwords.insert(user.email.clone(), password.to_string());
            state.users.push(user);
        }
        self
    }

    pub fn with_turno(self, turno: Turno) -> Self {
        self.state().turnos.push(turno);
        self
    }

    pub fn with_weekly(self, turno: Turno) -> Self {
        self.state().weekly.push(turno);
        self
    }

    pub fn with_credit(self, user_id: &str, credit_id: &str) -> Self {
        self.state().credits.push(Credito {
            id: credit_id.to_string(),
            usuario: user_id.to_string(),
            vence_en: Some("2099-12-31".to_string()),
            created_at: None,
        });
        self
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Id of the token's owner, or 401
    fn caller(&self, token: &AuthToken) -> GatewayResult<String> {
        let state = self.state();
        if state.revoked {
            return Err(GatewayError::Unauthorized);
        }
        let user_id = token
            .as_str()
            .strip_prefix("token-")
            .ok_or(GatewayError::Unauthorized)?;
        if state.users.iter().any(|u| u.id == user_id) {
            Ok(user_id.to_string())
        } else {
            Err(GatewayError::Unauthorized)
        }
    }
}

pub fn token_for(user_id: &str) -> AuthToken {
    AuthToken::new(format!("token-{}", user_id))
}

fn rejected(status: StatusCode, message: &str) -> GatewayError {
    GatewayError::Rejected {
        status,
        message: message.to_string(),
    }
}

fn ack(message: &str) -> GatewayResult<ApiMessage> {
    Ok(ApiMessage {
        message: message.to_string(),
    })
}

fn book(turnos: &mut [Turno], turno_id: &str, user_id: &str) -> GatewayResult<()> {
    let turno = turnos
        .iter_mut()
        .find(|t| t.id == turno_id)
        .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Turno no encontrado"))?;
    if turno.ocupado_por.iter().any(|id| id == user_id) {
        return Err(rejected(StatusCode::BAD_REQUEST, "El usuario ya tiene este turno"));
    }
    if turno.cupos_disponibles == 0 {
        return Err(rejected(StatusCode::BAD_REQUEST, "No hay cupos disponibles"));
    }
    turno.cupos_disponibles -= 1;
    turno.ocupado_por.push(user_id.to_string());
    Ok(())
}

/// A slot for tests; `fecha` is None for weekly slots
pub fn turno(id: &str, dia: &str, hora: &str, fecha: Option<&str>) -> Turno {
    Turno {
        id: id.to_string(),
        sede: "Palermo".to_string(),
        nivel: "Azul".to_string(),
        dia: dia.to_string(),
        hora: hora.to_string(),
        fecha: fecha.map(str::to_string),
        cupos_disponibles: 4,
        ocupado_por: Vec::new(),
        activo: true,
    }
}

#[async_trait]
impl AuthStorage for FakeAstros {
    async fn login(&self, request: &LoginRequest) -> GatewayResult<LoginResponse> {
        let state = self.state();
        let password_ok = state.passwords.get(&request.email) == Some(&request.password);
        match state.users.iter().find(|u| u.email == request.email) {
            Some(user) if password_ok => Ok(LoginResponse {
                token: format!("token-{}", user.id),
            }),
            _ => Err(GatewayError::Unauthorized),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> GatewayResult<ApiMessage> {
        let mut state = self.state();
        if state.users.iter().any(|u| u.email == request.email) {
            return Err(rejected(StatusCode::BAD_REQUEST, "El email ya está registrado"));
        }
        let id = state.next_id("u");
        state.users.push(User {
            id,
            username: request.username.clone(),
            email: request.email.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role: request.role,
            telefono: request.telefono.clone(),
            activo: true,
        });
        state.passwords.insert(request.email.clone(), request.password.clone());
        state.registered.push(request.clone());
        ack("Usuario registrado")
    }

    async fn get_profile(&self, token: &AuthToken) -> GatewayResult<User> {
        let user_id = self.caller(token)?;
        let state = self.state();
        state
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(GatewayError::Unauthorized)
    }
}

#[async_trait]
impl TurnoStorage for FakeAstros {
    async fn list_turnos(&self, token: &AuthToken, dia: Option<&str>) -> GatewayResult<Vec<Turno>> {
        self.caller(token)?;
        let state = self.state();
        Ok(state
            .turnos
            .iter()
            .filter(|t| dia.map_or(true, |d| t.dia.eq_ignore_ascii_case(d)))
            .cloned()
            .collect())
    }

    async fn create_turno(&self, token: &AuthToken, request: &CreateTurnoRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let id = state.next_id("t");
        state.turnos.push(Turno {
            id,
            sede: request.sede.clone(),
            nivel: request.nivel.clone(),
            dia: request.dia.clone(),
            hora: request.hora.clone(),
            fecha: None,
            cupos_disponibles: request.cupos_disponibles,
            ocupado_por: Vec::new(),
            activo: true,
        });
        ack("Turno creado")
    }

    async fn delete_turno(&self, token: &AuthToken, turno_id: &str) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let before = state.turnos.len();
        state.turnos.retain(|t| t.id != turno_id);
        if state.turnos.len() == before {
            return Err(rejected(StatusCode::NOT_FOUND, "Turno no encontrado"));
        }
        ack("Turno eliminado")
    }

    async fn assign_turno(&self, token: &AuthToken, request: &AsignarTurnoRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        book(&mut self.state().turnos, &request.turno_id, &request.user_id)?;
        ack("Turno asignado")
    }

    async fn release_turno(&self, token: &AuthToken, request: &LiberarTurnoRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let turnos = match request.tipo {
            TipoTurno::Mensual => &mut state.turnos,
            TipoTurno::Semanal => &mut state.weekly,
        };
        let turno = turnos
            .iter_mut()
            .find(|t| t.id == request.turno_id)
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Turno no encontrado"))?;
        let before = turno.ocupado_por.len();
        turno.ocupado_por.retain(|id| id != &request.user_id);
        if turno.ocupado_por.len() == before {
            return Err(rejected(StatusCode::BAD_REQUEST, "El usuario no tiene este turno"));
        }
        turno.cupos_disponibles += 1;
        ack("Turno liberado")
    }

    async fn list_weekly(&self, token: &AuthToken) -> GatewayResult<Vec<Turno>> {
        self.caller(token)?;
        Ok(self.state().weekly.clone())
    }

    async fn list_weekly_available(&self, token: &AuthToken) -> GatewayResult<Vec<Turno>> {
        let user_id = self.caller(token)?;
        let state = self.state();
        Ok(state
            .weekly
            .iter()
            .filter(|t| t.cupos_disponibles > 0 && !t.ocupado_por.contains(&user_id))
            .cloned()
            .collect())
    }

    async fn take_weekly(&self, token: &AuthToken, turno_id: &str) -> GatewayResult<ApiMessage> {
        let user_id = self.caller(token)?;
        book(&mut self.state().weekly, turno_id, &user_id)?;
        ack("Turno tomado")
    }

    async fn assign_weekly(&self, token: &AuthToken, request: &AsignarTurnoRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        book(&mut self.state().weekly, &request.turno_id, &request.user_id)?;
        ack("Turno semanal asignado")
    }

    async fn my_turnos(&self, token: &AuthToken) -> GatewayResult<MisTurnosResponse> {
        let user_id = self.caller(token)?;
        let state = self.state();
        let mine = |turnos: &[Turno]| -> Vec<Turno> {
            turnos.iter().filter(|t| t.ocupado_por.contains(&user_id)).cloned().collect()
        };
        Ok(MisTurnosResponse {
            turnos_semanales: mine(&state.weekly),
            turnos_mensuales: mine(&state.turnos),
        })
    }

    async fn user_turnos(&self, token: &AuthToken, user_id: &str, tipo: TipoTurno) -> GatewayResult<Vec<Turno>> {
        self.caller(token)?;
        let state = self.state();
        let turnos = match tipo {
            TipoTurno::Mensual => &state.turnos,
            TipoTurno::Semanal => &state.weekly,
        };
        Ok(turnos
            .iter()
            .filter(|t| t.ocupado_por.iter().any(|id| id == user_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PlantillaStorage for FakeAstros {
    async fn create_template(&self, token: &AuthToken, request: &CreateTurnoRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        self.state().templates.push(request.clone());
        ack("Plantilla creada")
    }

    async fn week_for_user(&self, token: &AuthToken, user_id: &str) -> GatewayResult<Vec<Turno>> {
        self.caller(token)?;
        Ok(self.state().week_slots.get(user_id).cloned().unwrap_or_default())
    }

    async fn list_user_templates(&self, token: &AuthToken) -> GatewayResult<Vec<PlantillaTurnoUsuario>> {
        self.caller(token)?;
        Ok(self.state().user_templates.clone())
    }

    async fn create_user_template(
        &self,
        token: &AuthToken,
        request: &CreatePlantillaUsuarioRequest,
    ) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let id = state.next_id("p");
        state.user_templates.push(PlantillaTurnoUsuario {
            id,
            usuario: request.usuario.clone(),
            dia: request.dia.clone(),
            hora: request.hora.clone(),
            sede: request.sede.clone(),
            nivel: request.nivel.clone(),
        });
        ack("Plantilla de usuario creada")
    }

    async fn delete_user_template(&self, token: &AuthToken, template_id: &str) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let before = state.user_templates.len();
        state.user_templates.retain(|p| p.id != template_id);
        if state.user_templates.len() == before {
            return Err(rejected(StatusCode::NOT_FOUND, "Plantilla no encontrada"));
        }
        ack("Plantilla eliminada")
    }
}

#[async_trait]
impl UserStorage for FakeAstros {
    async fn list_users(&self, token: &AuthToken) -> GatewayResult<Vec<User>> {
        self.caller(token)?;
        Ok(self.state().users.clone())
    }

    async fn get_user(&self, token: &AuthToken, user_id: &str) -> GatewayResult<User> {
        self.caller(token)?;
        self.state()
            .users
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Usuario no encontrado"))
    }

    async fn update_user(&self, token: &AuthToken, request: &UpdateUserRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let user = state
            .users
            .iter_mut()
            .find(|u| u.id == request.id)
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "Usuario no encontrado"))?;
        user.username = request.username.clone();
        user.first_name = request.first_name.clone();
        user.last_name = request.last_name.clone();
        user.role = request.role;
        user.activo = request.activo;
        ack("Usuario actualizado")
    }
}

#[async_trait]
impl CreditStorage for FakeAstros {
    async fn list_credits(&self, token: &AuthToken, user_id: &str) -> GatewayResult<Vec<Credito>> {
        self.caller(token)?;
        Ok(self
            .state()
            .credits
            .iter()
            .filter(|c| c.usuario == user_id)
            .cloned()
            .collect())
    }

    async fn create_credit(&self, token: &AuthToken, request: &CreateCreditoRequest) -> GatewayResult<ApiMessage> {
        self.caller(token)?;
        let mut state = self.state();
        let id = state.next_id("c");
        state.credits.push(Credito {
            id,
            usuario: request.usuario.clone(),
            vence_en: Some(request.vence_en.clone()),
            created_at: None,
        });
        ack("Crédito creado")
    }

    async fn delete_credit(&self, token: &AuthToken, credit_id: &str) -> GatewayResult<ApiMessage> {
        let caller = self.caller(token)?;
        let mut state = self.state();
        // The ledger endpoint is staff-only; members spend through `consume_own_oldest`
        let staff = state.users.iter().any(|u| u.id == caller && u.role.is_staff());
        if !staff {
            return Err(rejected(StatusCode::FORBIDDEN, "Acceso denegado"));
        }
        if state.fail_credit_delete {
            return Err(rejected(StatusCode::INTERNAL_SERVER_ERROR, "Error al eliminar crédito"));
        }
        let before = state.credits.len();
        state.credits.retain(|c| c.id != credit_id);
        if state.credits.len() == before {
            return Err(rejected(StatusCode::NOT_FOUND, "Crédito no encontrado"));
        }
        ack("Crédito eliminado")
    }

    async fn consume_own_oldest(&self, token: &AuthToken) -> GatewayResult<ApiMessage> {
        let user_id = self.caller(token)?;
        let mut state = self.state();
        if state.fail_credit_delete {
            return Err(rejected(StatusCode::INTERNAL_SERVER_ERROR, "Error al eliminar crédito"));
        }
        let oldest = state
            .credits
            .iter()
            .position(|c| c.usuario == user_id)
            .ok_or_else(|| rejected(StatusCode::NOT_FOUND, "No hay créditos disponibles"))?;
        state.credits.remove(oldest);
        ack("Crédito más antiguo eliminado")
    }
}

/// Session storage kept in memory
#[derive(Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

impl SessionStorage for MemorySessionStorage {
    fn load_session(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }

    fn save_session(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> Result<()> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}
