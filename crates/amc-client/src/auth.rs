//! Authentication state machine.
//!
//! # Design
//! - `Unknown` until the first session check settles.
//! - Login validates locally first; invalid credentials never hit the network.
//! - Logout always ends `Unauthenticated` with the token cleared, even when
//!   the server call fails. The failure is still returned for display.

use std::sync::Arc;

use amc_api_models::CurrentUser;
use amc_telemetry::Metrics;
use tokio::sync::watch;

use crate::api::AuthApi;
use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::session::SessionStore;
use crate::validate::Credentials;

/// Where the session currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthStatus {
    /// No session check has completed yet.
    #[default]
    Unknown,
    /// A login or session check is in flight.
    Authenticating,
    /// The server confirmed the session.
    Authenticated(CurrentUser),
    /// No valid session. `error` carries the last login failure, if any.
    Unauthenticated {
        /// Operator-facing failure message.
        error: Option<String>,
    },
}

impl AuthStatus {
    /// Signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Whether a check or login is still outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Unknown | Self::Authenticating)
    }
}

/// Drives login, session checks and logout.
#[derive(Debug)]
pub struct AuthController {
    api: AuthApi,
    session: Arc<SessionStore>,
    status: watch::Sender<AuthStatus>,
    metrics: Metrics,
}

impl AuthController {
    /// Controller sharing the gateway's session.
    #[must_use]
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        let session = Arc::clone(gateway.session());
        let metrics = gateway.metrics().clone();
        let (status, _) = watch::channel(AuthStatus::Unknown);
        Self {
            api: AuthApi::new(gateway),
            session,
            status,
            metrics,
        }
    }

    /// Observe status changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthStatus> {
        self.status.subscribe()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> AuthStatus {
        self.status.borrow().clone()
    }

    /// Ask the server who the session belongs to.
    ///
    /// # Errors
    ///
    /// Returns the `GET /auth/me` failure; the status becomes
    /// `Unauthenticated` without an error message.
    pub async fn check_session(&self) -> ApiResult<CurrentUser> {
        self.transition(AuthStatus::Authenticating);
        match self.api.me().await {
            Ok(user) => {
                tracing::info!(user = user.display_name(), "session confirmed");
                self.transition(AuthStatus::Authenticated(user.clone()));
                Ok(user)
            }
            Err(err) => {
                tracing::debug!(error = %err, status = ?err.status(), "no active session");
                self.transition(AuthStatus::Unauthenticated { error: None });
                Err(err)
            }
        }
    }

    /// Sign in and confirm the resulting session.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::Validation`] for malformed credentials (status
    /// unchanged), otherwise the login or session check failure.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<CurrentUser> {
        let request = credentials.validate()?;
        self.transition(AuthStatus::Authenticating);
        match self.api.login(&request).await {
            Ok(Some(token)) => self.session.set_token(token),
            Ok(None) => tracing::warn!("login response carried no token"),
            Err(err) => {
                tracing::warn!(error = %err, status = ?err.status(), "login rejected");
                self.transition(AuthStatus::Unauthenticated {
                    error: Some(err.user_message()),
                });
                return Err(err);
            }
        }
        self.check_session().await
    }

    /// Sign out. Local session state is cleared whatever the server says.
    ///
    /// # Errors
    ///
    /// Returns the `GET /auth/logout` failure after clearing local state.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.api.logout().await;
        self.session.clear();
        self.transition(AuthStatus::Unauthenticated { error: None });
        if let Err(err) = &result {
            tracing::warn!(error = %err, "logout call failed; local session cleared");
        }
        result
    }

    fn transition(&self, next: AuthStatus) {
        self.metrics
            .set_session_authenticated(matches!(next, AuthStatus::Authenticated(_)));
        self.status.send_replace(next);
    }
}
