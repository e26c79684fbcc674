//! Session context holding the bearer credential used for backend calls.

use super::error::GatewayError;
use std::fmt::Debug;
use std::sync::RwLock;
use tracing::debug;

/// Opaque bearer credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: &str) -> Result<Self, GatewayError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::Validation(
                "Session token must not be empty".to_string(),
            ));
        }
        Ok(SessionToken(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Explicit session state shared with the gateway. `begin` on login,
/// `end` on logout.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<SessionToken>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: SessionToken) -> Self {
        Self {
            token: RwLock::new(Some(token)),
        }
    }

    pub fn begin(&self, token: SessionToken) {
        debug!("Session started");
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    pub fn end(&self) {
        debug!("Session ended");
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    pub fn is_active(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Current credential, or `Auth` when nobody is logged in.
    pub fn token(&self) -> Result<SessionToken, GatewayError> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or_else(|| {
                GatewayError::Auth("Not logged in: no session token available".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_rejected() {
        assert!(matches!(
            SessionToken::new("   "),
            Err(GatewayError::Validation(_))
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = SessionToken::new("secret-jwt").unwrap();
        assert!(!format!("{token:?}").contains("secret-jwt"));
        assert_eq!(token.expose(), "secret-jwt");
    }

    #[test]
    fn test_session_lifecycle() {
        let session = Session::new();
        assert!(matches!(session.token(), Err(GatewayError::Auth(_))));

        session.begin(SessionToken::new("abc").unwrap());
        assert!(session.is_active());
        assert_eq!(session.token().unwrap().expose(), "abc");

        session.end();
        assert!(!session.is_active());
        assert!(matches!(session.token(), Err(GatewayError::Auth(_))));
    }
}
