use reqwest::StatusCode;

/// Failure talking to the Astros API
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The token was missing, expired or revoked
    #[error("The Astros API rejected the session token")]
    Unauthorized,
    #[error("The Astros API answered {status}: {message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Could not reach the Astros API: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Unexpected response from the Astros API: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            GatewayError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
