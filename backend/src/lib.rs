//! # Astros Booking Gateway
//!
//! Local backend for the Astros sports-club booking UI. It owns the login
//! session, enforces role rules, turns slot listings into calendar grids and
//! relays everything else to the club's REST API.
//!
//! ## Architecture
//!
//! ```text
//! UI
//!     ↓
//! IO Layer (REST API under /api)
//!     ↓
//! Domain Layer (services, session, calendar)
//!     ↓
//! Storage Layer (Astros API over HTTP, session file)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::domain::{
    AuthService, CalendarService, CreditService, PlantillaService, SessionContext, TurnoService, UserService,
};
use crate::storage::http::{
    AstrosConnection, AuthRepository, CreditRepository, PlantillaRepository, TurnoRepository, UserRepository,
};
use crate::storage::yaml::SessionRepository;
use crate::storage::{AuthStorage, CreditStorage, PlantillaStorage, TurnoStorage, UserStorage};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub turno_service: TurnoService,
    pub plantilla_service: PlantillaService,
    pub user_service: UserService,
    pub credit_service: CreditService,
    pub calendar_service: CalendarService,
}

/// Wire the services over the given storages, all sharing one session
pub fn build_state(
    session: SessionContext,
    auth: Arc<dyn AuthStorage>,
    turnos: Arc<dyn TurnoStorage>,
    plantillas: Arc<dyn PlantillaStorage>,
    users: Arc<dyn UserStorage>,
    credits: Arc<dyn CreditStorage>,
    calendar_service: CalendarService,
) -> AppState {
    let credit_service = CreditService::new(session.clone(), credits);

    AppState {
        auth_service: AuthService::new(session.clone(), auth),
        turno_service: TurnoService::new(
            session.clone(),
            turnos,
            users.clone(),
            credit_service.clone(),
        ),
        plantilla_service: PlantillaService::new(session.clone(), plantillas),
        user_service: UserService::new(session, users, credit_service.clone()),
        credit_service,
        calendar_service,
    }
}

/// Initialize the backend against the configured Astros API
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to Astros API at {}", config.api_base_url);
    let connection = AstrosConnection::new(&config.api_base_url, config.request_timeout())?;

    info!("Restoring session from {:?}", config.data_dir);
    let session = SessionContext::new(Arc::new(SessionRepository::new(&config.data_dir)?));

    info!("Setting up application state (week starts on {:?})", config.week_start);
    Ok(build_state(
        session,
        Arc::new(AuthRepository::new(connection.clone())),
        Arc::new(TurnoRepository::new(connection.clone())),
        Arc::new(PlantillaRepository::new(connection.clone())),
        Arc::new(UserRepository::new(connection.clone())),
        Arc::new(CreditRepository::new(connection)),
        CalendarService::new(config.week_start),
    ))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: Option<&str>) -> Router {
    let mut router = Router::new()
        .nest("/api", io::rest::router())
        .layer(TraceLayer::new_for_http());

    // CORS setup to allow the UI to make requests
    if let Some(origin) = cors_origin {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => {
                let cors = CorsLayer::new()
                    .allow_origin(origin)
                    .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                    .allow_headers(Any);
                router = router.layer(cors);
            }
            Err(e) => warn!("Ignoring invalid CORS origin '{}': {}", origin, e),
        }
    }

    router.with_state(app_state)
}
