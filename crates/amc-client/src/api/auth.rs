//! `/auth` endpoints.
//!
//! These calls only talk to the server; token bookkeeping belongs to
//! [`crate::auth::AuthController`].

use std::sync::Arc;

use amc_api_models::{ApiEnvelope, CurrentUser, LoginRequest, TokenPayload};
use serde_json::Value;

use crate::error::ApiResult;
use crate::gateway::ApiGateway;

/// Session endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    gateway: Arc<ApiGateway>,
}

impl AuthApi {
    /// Service backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `POST /auth/login`; returns the issued token, if any.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<Option<String>> {
        let envelope: ApiEnvelope<TokenPayload> =
            self.gateway.post("/auth/login", request).await?;
        Ok(envelope.data.token.filter(|token| !token.is_empty()))
    }

    /// `GET /auth/me`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn me(&self) -> ApiResult<CurrentUser> {
        let envelope: ApiEnvelope<CurrentUser> = self.gateway.get("/auth/me").await?;
        Ok(envelope.data)
    }

    /// `GET /auth/logout`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn logout(&self) -> ApiResult<()> {
        let _: Value = self.gateway.get("/auth/logout").await?;
        Ok(())
    }
}
