//! In-memory bearer token holder.
//!
//! The token lives only for the lifetime of the process. Readers are free;
//! writes are reserved to the gateway (refresh) and the auth flow
//! (login/logout).

use std::sync::{PoisonError, RwLock};

/// Shared bearer token cell.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<String>>,
}

impl SessionStore {
    /// Empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with a previously issued token.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// Current bearer token.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a token is held.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
    }

    pub(crate) fn clear(&self) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_lifecycle() {
        let session = SessionStore::new();
        assert!(!session.has_token());
        session.set_token("abc".to_string());
        assert_eq!(session.token().as_deref(), Some("abc"));
        session.clear();
        assert!(session.token().is_none());
    }

    #[test]
    fn seeded_session_holds_token() {
        let session = SessionStore::with_token("seed");
        assert!(session.has_token());
    }
}
