//! Dashboard sessions
//!
//! A successful login yields an opaque bearer token. The resolved [`Session`]
//! travels with each request instead of living in process-wide state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Credentials;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("missing bearer token")]
    MissingToken,

    #[error("unknown or expired session")]
    UnknownToken,
}

/// Identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user_name: Option<String>,
}

impl Session {
    /// Session used when authentication is not enforced and no token was sent
    pub fn anonymous() -> Self {
        Self { user_name: None }
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }
}

/// Issued sessions keyed by token
#[derive(Clone)]
pub struct SessionStore {
    credentials: Arc<Credentials>,
    required: bool,
    sessions: Arc<RwLock<HashMap<String, String>>>,
}

impl SessionStore {
    pub fn new(credentials: Credentials, required: bool) -> Self {
        Self {
            credentials: Arc::new(credentials),
            required,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Whether operation routes demand a valid session
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Check credentials and issue a new token
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        if username != self.credentials.username || password != self.credentials.password {
            warn!("Failed login attempt for user {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .insert(token.clone(), username.to_string());

        info!("User {} logged in", username);
        Ok(token)
    }

    pub fn logout(&self, token: &str) -> Result<(), AuthError> {
        match self.sessions.write().remove(token) {
            Some(user) => {
                info!("User {} logged out", user);
                Ok(())
            }
            None => Err(AuthError::UnknownToken),
        }
    }

    pub fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        self.sessions
            .read()
            .get(token)
            .map(|user| Session {
                user_name: Some(user.clone()),
            })
            .ok_or(AuthError::UnknownToken)
    }

    /// Resolve the session for a request carrying `token`, if any
    pub fn authorize(&self, token: Option<&str>) -> Result<Session, AuthError> {
        match token {
            Some(token) => self.resolve(token),
            None if self.required => Err(AuthError::MissingToken),
            None => Ok(Session::anonymous()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(required: bool) -> SessionStore {
        SessionStore::new(Credentials::default(), required)
    }

    #[test]
    fn test_login_with_valid_credentials() {
        let store = store(true);
        let token = store.login("admin", "admin").unwrap();

        let session = store.resolve(&token).unwrap();
        assert_eq!(session.user_name(), Some("admin"));
        assert_ne!(session, Session::anonymous());
    }

    #[test]
    fn test_login_with_wrong_password() {
        let store = store(true);
        assert_eq!(store.login("admin", "nope"), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn test_logout_invalidates_token() {
        let store = store(true);
        let token = store.login("admin", "admin").unwrap();

        store.logout(&token).unwrap();
        assert_eq!(store.resolve(&token), Err(AuthError::UnknownToken));
        assert_eq!(store.logout(&token), Err(AuthError::UnknownToken));
    }

    #[test]
    fn test_authorize_without_token() {
        assert_eq!(store(true).authorize(None), Err(AuthError::MissingToken));
        assert_eq!(store(false).authorize(None), Ok(Session::anonymous()));
    }

    #[test]
    fn test_authorize_rejects_unknown_token_even_when_optional() {
        assert_eq!(
            store(false).authorize(Some("bogus")),
            Err(AuthError::UnknownToken)
        );
    }
}
