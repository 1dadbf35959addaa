use log::{debug, info, warn};
use shared::{
    ApiMessage, AsignarTurnoRequest, CreateTurnoRequest, Jugador, LiberarTurnoRequest,
    MyTurnosResponse, TipoTurno, Turno,
};
use std::sync::Arc;

use crate::domain::commands::turnos::{AssignTurnoCommand, BookingResult, ReleaseTurnoCommand};
use crate::domain::credit_service::CreditService;
use crate::domain::error::ServiceError;
use crate::domain::models::record::parse_time_of_day;
use crate::domain::models::{ingest_turnos, RecordBatch};
use crate::domain::schedule::{sort_by_weekday_and_time, weekday_index};
use crate::domain::session::SessionContext;
use crate::storage::{TurnoStorage, UserStorage};

/// Service for monthly and weekly slots and their bookings
#[derive(Clone)]
pub struct TurnoService {
    session: SessionContext,
    turnos: Arc<dyn TurnoStorage>,
    users: Arc<dyn UserStorage>,
    credits: CreditService,
}

impl TurnoService {
    pub fn new(
        session: SessionContext,
        turnos: Arc<dyn TurnoStorage>,
        users: Arc<dyn UserStorage>,
        credits: CreditService,
    ) -> Self {
        Self {
            session,
            turnos,
            users,
            credits,
        }
    }

    /// All dated slots, optionally for one weekday, ordered by weekday then time
    pub async fn list_turnos(&self, dia: Option<&str>) -> Result<Vec<Turno>, ServiceError> {
        let session = self.session.require()?;
        let dia = dia.map(str::trim).filter(|d| !d.is_empty());
        let turnos = self.session.guard(self.turnos.list_turnos(&session.token, dia).await)?;
        info!("Listed {} slots (dia={:?})", turnos.len(), dia);
        Ok(sort_by_weekday_and_time(turnos))
    }

    /// Slots to plot on the calendar, validated. With `mine`, only the session user's.
    pub async fn calendar_records(&self, mine: bool) -> Result<RecordBatch, ServiceError> {
        let session = self.session.require()?;
        let turnos = self.session.guard(self.turnos.list_turnos(&session.token, None).await)?;

        let mut batch = ingest_turnos(&turnos);
        if mine {
            batch.records.retain(|r| r.is_occupied_by(&session.user.id));
        }
        debug!(
            "Calendar source: {} records, {} rejected (mine={})",
            batch.records.len(),
            batch.rejected.len(),
            mine
        );
        Ok(batch)
    }

    pub async fn create_turno(&self, request: CreateTurnoRequest) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("create slots")?;
        let request = validate_slot_request(request)?;
        let message = self.session.guard(self.turnos.create_turno(&session.token, &request).await)?;
        info!("Created slot {} {} at {} ({})", request.dia, request.hora, request.sede, request.nivel);
        Ok(message)
    }

    pub async fn delete_turno(&self, turno_id: &str) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require_staff("delete slots")?;
        require_id(turno_id, "Slot id")?;
        let message = self
            .session
            .guard(self.turnos.delete_turno(&session.token, turno_id).await)
            .map_err(|e| e.or_not_found(|| format!("Slot {}", turno_id)))?;
        info!("Deleted slot {}", turno_id);
        Ok(message)
    }

    /// Book a user into a dated slot, then consume that user's oldest credit
    pub async fn assign_turno(&self, command: AssignTurnoCommand) -> Result<BookingResult, ServiceError> {
        let session = self.session.require_staff("assign slots")?;
        let request = assignment(command)?;

        let message = self.session.guard(self.turnos.assign_turno(&session.token, &request).await)?;
        let credit_consumed = self.credits.consume_oldest(&session.token, &request.user_id).await;
        info!(
            "Assigned slot {} to {} (credit consumed: {})",
            request.turno_id, request.user_id, credit_consumed
        );

        Ok(BookingResult {
            message: message.message,
            credit_consumed,
        })
    }

    /// Free a seat. Members may only release their own.
    pub async fn release_turno(&self, command: ReleaseTurnoCommand) -> Result<ApiMessage, ServiceError> {
        let session = self.session.require()?;
        require_id(&command.turno_id, "Slot id")?;

        let user_id = match command.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => session.user.id.clone(),
        };
        if user_id != session.user.id && !session.user.role.is_staff() {
            return Err(ServiceError::Forbidden {
                role: session.user.role,
                action: "release another member's slot",
            });
        }

        let request = LiberarTurnoRequest {
            turno_id: command.turno_id,
            user_id,
            tipo: command.tipo,
        };
        let message = self.session.guard(self.turnos.release_turno(&session.token, &request).await)?;
        info!("Released {:?} slot {} for {}", request.tipo, request.turno_id, request.user_id);
        Ok(message)
    }

    /// Players booked into a monthly or weekly slot, in booking order.
    ///
    /// Occupants whose account no longer exists are left out.
    pub async fn roster(&self, turno_id: &str) -> Result<Vec<Jugador>, ServiceError> {
        let session = self.session.require_staff("view slot rosters")?;
        require_id(turno_id, "Slot id")?;
        let turno_id = turno_id.trim();

        let mut slot = self
            .session
            .guard(self.turnos.list_turnos(&session.token, None).await)?
            .into_iter()
            .find(|t| t.id == turno_id);
        if slot.is_none() {
            slot = self
                .session
                .guard(self.turnos.list_weekly(&session.token).await)?
                .into_iter()
                .find(|t| t.id == turno_id);
        }
        let slot = slot.ok_or_else(|| ServiceError::NotFound(format!("Slot {}", turno_id)))?;

        let mut jugadores = Vec::with_capacity(slot.ocupado_por.len());
        for user_id in &slot.ocupado_por {
            let user = self
                .session
                .guard(self.users.get_user(&session.token, user_id).await)
                .map_err(|e| e.or_not_found(|| format!("User {}", user_id)));
            match user {
                Ok(user) => jugadores.push(Jugador::from(user)),
                Err(ServiceError::NotFound(_)) => {
                    warn!("Slot {} is booked by unknown user {}", turno_id, user_id);
                }
                Err(e) => return Err(e),
            }
        }
        debug!("Slot {} has {} players", turno_id, jugadores.len());
        Ok(jugadores)
    }

    /// The session user's bookings, each list ordered by weekday then time
    pub async fn my_turnos(&self) -> Result<MyTurnosResponse, ServiceError> {
        let session = self.session.require()?;
        let mine = self.session.guard(self.turnos.my_turnos(&session.token).await)?;
        Ok(MyTurnosResponse {
            weekly: sort_by_weekday_and_time(mine.turnos_semanales),
            monthly: sort_by_weekday_and_time(mine.turnos_mensuales),
        })
    }

    pub async fn list_weekly(&self) -> Result<Vec<Turno>, ServiceError> {
        let session = self.session.require()?;
        let turnos = self.session.guard(self.turnos.list_weekly(&session.token).await)?;
        Ok(sort_by_weekday_and_time(turnos))
    }

    pub async fn list_weekly_available(&self) -> Result<Vec<Turno>, ServiceError> {
        let session = self.session.require()?;
        let turnos = self.session.guard(self.turnos.list_weekly_available(&session.token).await)?;
        Ok(sort_by_weekday_and_time(turnos))
    }

    /// A member claims a weekly slot and spends their own oldest credit
    pub async fn take_weekly(&self, turno_id: &str) -> Result<BookingResult, ServiceError> {
        let session = self.session.require()?;
        if !session.user.role.is_student() {
            return Err(ServiceError::Forbidden {
                role: session.user.role,
                action: "take weekly slots",
            });
        }
        require_id(turno_id, "Slot id")?;

        let message = self.session.guard(self.turnos.take_weekly(&session.token, turno_id).await)?;
        let credit_consumed = self.credits.consume_own_oldest(&session.token, &session.user.id).await;
        info!(
            "User {} took weekly slot {} (credit consumed: {})",
            session.user.id, turno_id, credit_consumed
        );

        Ok(BookingResult {
            message: message.message,
            credit_consumed,
        })
    }

    /// Staff books a member into a weekly slot, spending the member's oldest credit
    pub async fn assign_weekly(&self, command: AssignTurnoCommand) -> Result<BookingResult, ServiceError> {
        let session = self.session.require_staff("assign weekly slots")?;
        let request = assignment(command)?;

        let message = self.session.guard(self.turnos.assign_weekly(&session.token, &request).await)?;
        let credit_consumed = self.credits.consume_oldest(&session.token, &request.user_id).await;
        info!(
            "Assigned weekly slot {} to {} (credit consumed: {})",
            request.turno_id, request.user_id, credit_consumed
        );

        Ok(BookingResult {
            message: message.message,
            credit_consumed,
        })
    }

    /// Bookings of one member; staff may look at anyone
    pub async fn user_turnos(&self, user_id: &str, tipo: TipoTurno) -> Result<Vec<Turno>, ServiceError> {
        let session = self.session.require()?;
        require_id(user_id, "User id")?;
        if user_id != session.user.id && !session.user.role.is_staff() {
            return Err(ServiceError::Forbidden {
                role: session.user.role,
                action: "view another member's slots",
            });
        }
        let turnos = self.session.guard(self.turnos.user_turnos(&session.token, user_id, tipo).await)?;
        Ok(sort_by_weekday_and_time(turnos))
    }
}

fn require_id(id: &str, what: &str) -> Result<(), ServiceError> {
    if id.trim().is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", what)));
    }
    Ok(())
}

fn assignment(command: AssignTurnoCommand) -> Result<AsignarTurnoRequest, ServiceError> {
    require_id(&command.turno_id, "Slot id")?;
    require_id(&command.user_id, "User id")?;
    Ok(AsignarTurnoRequest {
        turno_id: command.turno_id.trim().to_string(),
        user_id: command.user_id.trim().to_string(),
    })
}

/// Trimmed copy of a slot or template request, or why it is unacceptable
pub(crate) fn validate_slot_request(request: CreateTurnoRequest) -> Result<CreateTurnoRequest, ServiceError> {
    let sede = request.sede.trim().to_string();
    let nivel = request.nivel.trim().to_string();
    let dia = request.dia.trim().to_string();
    let hora = request.hora.trim().to_string();

    if sede.is_empty() {
        return Err(ServiceError::Validation("Venue is required".to_string()));
    }
    if nivel.is_empty() {
        return Err(ServiceError::Validation("Level is required".to_string()));
    }
    if weekday_index(&dia).is_none() {
        return Err(ServiceError::Validation(format!("Unknown weekday '{}'", dia)));
    }
    if parse_time_of_day(&hora).is_none() {
        return Err(ServiceError::Validation(format!("Invalid time '{}', expected HH:MM", hora)));
    }
    if request.cupos_disponibles == 0 {
        return Err(ServiceError::Validation("A slot needs at least one seat".to_string()));
    }

    Ok(CreateTurnoRequest {
        sede,
        nivel,
        dia,
        hora,
        cupos_disponibles: request.cupos_disponibles,
    })
}
