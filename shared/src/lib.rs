use serde::{Deserialize, Serialize};
use std::fmt;
use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Astros API payloads (field names follow the remote API)
// ---------------------------------------------------------------------------

/// A bookable slot as returned by the Astros API.
///
/// Monthly slots carry a `fecha`; weekly ones only know their weekday (`dia`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turno {
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Venue, e.g. "Palermo" or "Fulgor"
    #[serde(default)]
    pub sede: String,
    /// Level/tier the slot is meant for (Blanco, Azul, Violeta)
    #[serde(default)]
    pub nivel: String,
    /// Spanish weekday label ("Lunes" .. "Domingo")
    #[serde(default)]
    pub dia: String,
    /// Time of day as "HH:MM"
    #[serde(default)]
    pub hora: String,
    /// ISO 8601 date or date-time. Absent for weekly slots.
    #[serde(default)]
    pub fecha: Option<String>,
    #[serde(default)]
    pub cupos_disponibles: u32,
    /// Ids of the users holding a seat
    #[serde(default)]
    pub ocupado_por: Vec<String>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

fn default_true() -> bool {
    true
}

/// User roles known to the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Profesor,
    Blanco,
    Azul,
    Violeta,
    Principiante,
}

impl Role {
    /// Admins and teachers manage slots, users and credits
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Profesor)
    }

    pub fn is_student(&self) -> bool {
        !self.is_staff()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Profesor => "Profesor",
            Role::Blanco => "Blanco",
            Role::Azul => "Azul",
            Role::Violeta => "Violeta",
            Role::Principiante => "Principiante",
        }
    }

    /// Parse a role label, ignoring case
    pub fn parse(label: &str) -> Option<Role> {
        match label.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "profesor" => Some(Role::Profesor),
            "blanco" => Some(Role::Blanco),
            "azul" => Some(Role::Azul),
            "violeta" => Some(Role::Violeta),
            "principiante" => Some(Role::Principiante),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A club member account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "first_name")]
    pub first_name: String,
    #[serde(default, alias = "last_name")]
    pub last_name: String,
    #[serde(alias = "rol")]
    pub role: Role,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default = "default_true")]
    pub activo: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// A consumable entitlement allowing a student to claim one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credito {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub usuario: String,
    #[serde(default)]
    pub vence_en: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A recurring per-user weekly booking template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantillaTurnoUsuario {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub usuario: String,
    pub dia: String,
    pub hora: String,
    pub sede: String,
    pub nivel: String,
}

/// Body of `POST /api/users/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token issued by the Astros API on login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Body of `POST /api/users/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Only checked locally, never forwarded
    #[serde(default, skip_serializing)]
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub telefono: Option<String>,
}

/// Body of `PUT /api/users/profile`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub activo: bool,
}

/// Body of `POST /api/turnos/` and `POST /api/plantilla`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTurnoRequest {
    pub sede: String,
    pub nivel: String,
    pub dia: String,
    pub hora: String,
    pub cupos_disponibles: u32,
}

/// Body of the slot assignment endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsignarTurnoRequest {
    pub turno_id: String,
    pub user_id: String,
}

/// Whether a booking is a one-off monthly slot or a recurring weekly one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipoTurno {
    Mensual,
    Semanal,
}

/// Body of `PUT /api/turnos/liberar` and `PUT /api/turnosSemanales/liberarSema`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiberarTurnoRequest {
    pub turno_id: String,
    pub user_id: String,
    pub tipo: TipoTurno,
}

/// Body of `POST /api/creditos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditoRequest {
    pub usuario: String,
    pub vence_en: String,
}

/// Body of `POST /api/plantilla-turnos-usuario`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlantillaUsuarioRequest {
    pub usuario: String,
    pub dia: String,
    pub hora: String,
    pub sede: String,
    pub nivel: String,
}

/// Response of `GET /api/turnosSemanales/misTurnos`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MisTurnosResponse {
    #[serde(default)]
    pub turnos_semanales: Vec<Turno>,
    #[serde(default)]
    pub turnos_mensuales: Vec<Turno>,
}

/// Plain `{ "message": ... }` body used by the Astros API for acks and errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Gateway payloads (served to the rendering UI)
// ---------------------------------------------------------------------------

/// First weekday of a displayed calendar week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// One slot plotted in a calendar cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: String,
    /// "HH:MM"
    pub time: String,
    pub venue: String,
    pub level: String,
    pub weekday_label: String,
    pub available_seats: u32,
    pub occupied_seats: u32,
}

/// A single day of the calendar grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub in_target_month: bool,
    pub is_today: bool,
    pub entries: Vec<CalendarEntry>,
}

/// A slot that could not be placed on the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecord {
    pub record_id: String,
    pub field: String,
    pub reason: String,
}

/// Full month grid, complete weeks in row-major order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarGridResponse {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub week_start: WeekStart,
    pub cells: Vec<CalendarCell>,
    pub rejected: Vec<RejectedRecord>,
}

/// Today's date as the gateway sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentDateResponse {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub iso_date: String,
}

/// What the logged-in user is allowed to do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capabilities {
    pub manage_turnos: bool,
    pub manage_users: bool,
    pub manage_credits: bool,
    pub take_turnos: bool,
}

/// Current session as exposed to the UI (never includes the token)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    pub capabilities: Capabilities,
}

/// Landing page data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub user: User,
    pub credit_count: usize,
    pub capabilities: Capabilities,
}

/// A user row in the administration list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user: User,
    pub credit_count: usize,
}

/// Outcome of a booking that may consume a credit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub message: String,
    pub credit_consumed: bool,
}

/// Both booking kinds of the logged-in user, each sorted by weekday then time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyTurnosResponse {
    pub weekly: Vec<Turno>,
    pub monthly: Vec<Turno>,
}

/// A player booked into a slot, as listed in its roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jugador {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

impl From<User> for Jugador {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
        }
    }
}

/// Gateway-side assign body (the slot id comes from the path)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignRequest {
    pub user_id: String,
}

/// Gateway-side release body (the slot id comes from the path)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRequest {
    /// Defaults to the session user
    #[serde(default)]
    pub user_id: Option<String>,
    pub tipo: TipoTurno,
}

/// Body of the gateway's week-for-user template query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekForUserRequest {
    pub user_id: String,
}

/// Uniform error body returned by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turno_deserializes_api_field_names() {
        let json = r#"{
            "_id": "t1",
            "sede": "Palermo",
            "nivel": "Azul",
            "dia": "Jueves",
            "hora": "09:30",
            "fecha": "2024-02-15T00:00:00.000Z",
            "cuposDisponibles": 8,
            "ocupadoPor": ["u1", "u2"]
        }"#;

        let turno: Turno = serde_json::from_str(json).unwrap();
        assert_eq!(turno.id, "t1");
        assert_eq!(turno.cupos_disponibles, 8);
        assert_eq!(turno.ocupado_por.len(), 2);
        assert_eq!(turno.fecha.as_deref(), Some("2024-02-15T00:00:00.000Z"));
        assert!(turno.activo);
    }

    #[test]
    fn test_user_accepts_snake_case_aliases() {
        let json = r#"{"_id":"u1","first_name":"Ana","last_name":"Paz","rol":"Violeta"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.full_name(), "Ana Paz");
        assert_eq!(user.role, Role::Violeta);
    }

    #[test]
    fn test_role_parse_and_staff() {
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse(" azul "), Some(Role::Azul));
        assert_eq!(Role::parse("coach"), None);
        assert!(Role::Profesor.is_staff());
        assert!(Role::Principiante.is_student());
    }

    #[test]
    fn test_register_request_never_serializes_confirmation() {
        let request = RegisterRequest {
            username: "ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "Secreta1!".to_string(),
            confirm_password: "Secreta1!".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Paz".to_string(),
            role: Role::Blanco,
            telefono: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("confirmPassword").is_none());
        assert_eq!(json["firstName"], "Ana");
    }

    #[test]
    fn test_week_start_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WeekStart::Sunday).unwrap(), "\"sunday\"");
        assert_eq!(WeekStart::default(), WeekStart::Monday);
    }
}
