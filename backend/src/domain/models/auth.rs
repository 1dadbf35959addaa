use serde::{Deserialize, Serialize};
use shared::User;
use std::fmt;

/// Bearer token issued by the Astros API.
///
/// Passed explicitly to every storage call that needs authenticated access.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Tokens must never end up in logs
impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// An authenticated user together with the token that proves it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: AuthToken,
    pub user: User,
    /// RFC 3339 timestamp of the login
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let token = AuthToken::new("secret-jwt");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");
        assert_eq!(token.bearer_header(), "Bearer secret-jwt");
    }
}
