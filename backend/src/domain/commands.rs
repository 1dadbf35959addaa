//! Domain-level command and result types.
//!
//! Services take these instead of the gateway DTOs in `shared`; the REST layer
//! fills them in from path, query and body.

pub mod auth {
    /// Credentials for a login attempt.
    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub email: String,
        pub password: String,
    }
}

pub mod turnos {
    use shared::TipoTurno;

    /// Book a user into a slot on someone else's behalf.
    #[derive(Debug, Clone)]
    pub struct AssignTurnoCommand {
        pub turno_id: String,
        pub user_id: String,
    }

    /// Free a seat. `user_id` defaults to the session user.
    #[derive(Debug, Clone)]
    pub struct ReleaseTurnoCommand {
        pub turno_id: String,
        pub user_id: Option<String>,
        pub tipo: TipoTurno,
    }

    /// Outcome of a booking followed by credit consumption.
    #[derive(Debug, Clone, PartialEq)]
    pub struct BookingResult {
        pub message: String,
        pub credit_consumed: bool,
    }
}

pub mod users {
    use shared::Role;

    /// Editable profile fields of a member.
    #[derive(Debug, Clone)]
    pub struct UpdateUserCommand {
        pub user_id: String,
        pub username: String,
        pub first_name: String,
        pub last_name: String,
        pub role: Role,
        pub activo: bool,
    }
}

pub mod credits {
    #[derive(Debug, Clone)]
    pub struct CreateCreditCommand {
        pub user_id: String,
        /// YYYY-MM-DD or an ISO 8601 date-time
        pub expires_on: String,
    }
}
