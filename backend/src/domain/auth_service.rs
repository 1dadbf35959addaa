use log::{info, warn};
use shared::{ApiMessage, LoginRequest, RegisterRequest, SessionResponse};
use std::sync::Arc;

use crate::domain::commands::auth::LoginCommand;
use crate::domain::error::ServiceError;
use crate::domain::models::{AuthToken, Session};
use crate::domain::session::{capabilities, SessionContext};
use crate::storage::{AuthStorage, GatewayError};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Reasons a registration form is refused before reaching the API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Password must contain at least one {0}")]
    PasswordMissing(&'static str),
    #[error("Passwords do not match")]
    PasswordMismatch,
}

impl From<RegistrationError> for ServiceError {
    fn from(e: RegistrationError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

/// Check a password against the club's rules: length, lower and upper case
/// letters, a digit and a symbol (anything that is not an ASCII letter or digit).
pub fn validate_password(password: &str, confirmation: &str) -> Result<(), RegistrationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(RegistrationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(RegistrationError::PasswordMissing("lowercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(RegistrationError::PasswordMissing("uppercase letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(RegistrationError::PasswordMissing("digit"));
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return Err(RegistrationError::PasswordMissing("symbol"));
    }
    if password != confirmation {
        return Err(RegistrationError::PasswordMismatch);
    }
    Ok(())
}

pub fn validate_registration(request: &RegisterRequest) -> Result<(), RegistrationError> {
    for (value, field) in [
        (&request.username, "Username"),
        (&request.email, "Email"),
        (&request.first_name, "First name"),
        (&request.last_name, "Last name"),
    ] {
        if value.trim().is_empty() {
            return Err(RegistrationError::MissingField(field));
        }
    }

    let email = request.email.trim();
    let well_formed = email
        .split_once('@')
        .map_or(false, |(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'));
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(RegistrationError::InvalidEmail(email.to_string()));
    }

    validate_password(&request.password, &request.confirm_password)
}

/// Login, logout and account registration
#[derive(Clone)]
pub struct AuthService {
    session: SessionContext,
    auth: Arc<dyn AuthStorage>,
}

impl AuthService {
    pub fn new(session: SessionContext, auth: Arc<dyn AuthStorage>) -> Self {
        Self { session, auth }
    }

    /// Exchange credentials for a token, then load the profile behind it
    pub async fn login(&self, command: LoginCommand) -> Result<Session, ServiceError> {
        let email = command.email.trim().to_string();
        if email.is_empty() || command.password.is_empty() {
            return Err(ServiceError::Validation("Email and password are required".to_string()));
        }
        info!("Login attempt for {}", email);

        let request = LoginRequest {
            email: email.clone(),
            password: command.password,
        };
        let response = self.auth.login(&request).await.map_err(|e| login_error(&email, e))?;

        let token = AuthToken::new(response.token);
        let user = self.auth.get_profile(&token).await.map_err(|e| login_error(&email, e))?;

        Ok(self.session.establish(token, user))
    }

    pub fn logout(&self) {
        self.session.destroy();
    }

    pub fn current_session(&self) -> Result<SessionResponse, ServiceError> {
        let session = self.session.require()?;
        let capabilities = capabilities(session.user.role);
        Ok(SessionResponse {
            user: session.user,
            capabilities,
        })
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<ApiMessage, ServiceError> {
        validate_registration(&request)?;

        let request = RegisterRequest {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            telefono: request.telefono.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()),
            ..request
        };

        let message = self.auth.register(&request).await.map_err(ServiceError::Upstream)?;
        info!("Registered {} as {}", request.email, request.role);
        Ok(message)
    }
}

/// Client errors on login mean bad credentials; anything else is an outage
fn login_error(email: &str, error: GatewayError) -> ServiceError {
    match error {
        GatewayError::Unauthorized => {
            warn!("Login rejected for {}", email);
            ServiceError::InvalidCredentials
        }
        GatewayError::Rejected { status, .. } if status.is_client_error() => {
            warn!("Login rejected for {} ({})", email, status);
            ServiceError::InvalidCredentials
        }
        other => ServiceError::Upstream(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::test_user;
    use crate::storage::test_utils::FakeAstros;
    use shared::Role;

    fn setup() -> (AuthService, SessionContext, Arc<FakeAstros>) {
        let fake = Arc::new(FakeAstros::new().with_user(test_user("ana", Role::Violeta), "Secreta1!"));
        let session = SessionContext::in_memory();
        (AuthService::new(session.clone(), fake.clone()), session, fake)
    }

    fn registration(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            username: "luis".to_string(),
            email: "luis@astros.test".to_string(),
            password: password.to_string(),
            confirm_password: confirmation.to_string(),
            first_name: "Luis".to_string(),
            last_name: "Gomez".to_string(),
            role: Role::Principiante,
            telefono: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_password_rules() {
        assert_eq!(validate_password("Ab1!", "Ab1!"), Err(RegistrationError::PasswordTooShort));
        assert_eq!(
            validate_password("ABCDEFG1!", "ABCDEFG1!"),
            Err(RegistrationError::PasswordMissing("lowercase letter"))
        );
        assert_eq!(
            validate_password("abcdefg1!", "abcdefg1!"),
            Err(RegistrationError::PasswordMissing("uppercase letter"))
        );
        assert_eq!(
            validate_password("Abcdefgh!", "Abcdefgh!"),
            Err(RegistrationError::PasswordMissing("digit"))
        );
        assert_eq!(
            validate_password("Abcdefgh1", "Abcdefgh1"),
            Err(RegistrationError::PasswordMissing("symbol"))
        );
        assert_eq!(validate_password("Abcdefg_1", "Abcdefg_2"), Err(RegistrationError::PasswordMismatch));
        assert_eq!(validate_password("Abcdefg_1", "Abcdefg_1"), Ok(()));
    }

    #[test]
    fn test_registration_fields() {
        let mut request = registration("Secreta1!", "Secreta1!");
        request.first_name = "  ".to_string();
        assert_eq!(validate_registration(&request), Err(RegistrationError::MissingField("First name")));

        let mut request = registration("Secreta1!", "Secreta1!");
        request.email = "luis.astros.test".to_string();
        assert!(matches!(validate_registration(&request), Err(RegistrationError::InvalidEmail(_))));
    }

    #[tokio::test]
    async fn test_login_establishes_session() {
        let (service, session, _fake) = setup();

        let established = service
            .login(LoginCommand {
                email: " ana@astros.test ".to_string(),
                password: "Secreta1!".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(established.user.id, "ana");
        assert_eq!(established.token.as_str(), "token-ana");
        assert_eq!(session.current().unwrap().user.role, Role::Violeta);

        let current = service.current_session().unwrap();
        assert!(current.capabilities.take_turnos);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let (service, session, _fake) = setup();

        let result = service
            .login(LoginCommand {
                email: "ana@astros.test".to_string(),
                password: "nope".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ServiceError::InvalidCredentials)));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let (service, session, _fake) = setup();
        service
            .login(LoginCommand {
                email: "ana@astros.test".to_string(),
                password: "Secreta1!".to_string(),
            })
            .await
            .unwrap();

        service.logout();
        assert!(session.current().is_none());
        assert!(matches!(service.current_session(), Err(ServiceError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_register_validates_before_calling_api() {
        let (service, _session, fake) = setup();

        let result = service.register(registration("Secreta1!", "Secreta2!")).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert!(fake.state().registered.is_empty());

        service.register(registration("Secreta1!", "Secreta1!")).await.unwrap();
        let state = fake.state();
        assert_eq!(state.registered.len(), 1);
        assert_eq!(state.registered[0].telefono, None);
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_upstream_rejection() {
        let (service, _session, _fake) = setup();
        let mut request = registration("Secreta1!", "Secreta1!");
        request.email = "ana@astros.test".to_string();

        assert!(matches!(service.register(request).await, Err(ServiceError::Upstream(_))));
    }
}
