//! Single HTTP entry point for the AMC API.
//!
//! # Design
//! - Every call attaches the session's bearer token when one is held.
//! - A `401` on any path other than the refresh endpoint triggers exactly one
//!   `GET /auth/refresh-token`. A fresh token replays the original request
//!   once and that outcome is final; otherwise the original `401` is returned
//!   and the session is left untouched.
//! - Concurrent `401`s each run their own refresh; the last token written wins.
//! - Non-success bodies are mined for `{message}` the same way for every route.

use std::sync::Arc;
use std::time::Duration;

use amc_api_models::{ApiEnvelope, ErrorBody, TokenPayload};
use amc_config::ClientSettings;
use amc_telemetry::{Metrics, RefreshOutcomeLabel};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::session::SessionStore;

/// Token refresh endpoint. Never itself subject to refresh-and-retry.
pub const REFRESH_PATH: &str = "/auth/refresh-token";

const HEADER_REQUEST_ID: &str = "x-request-id";

/// Description of one API call, replayable after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Request with no body and no query string.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Encode`] when `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|source| ApiError::Encode {
            path: self.path.clone(),
            source,
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Append query parameters.
    #[must_use]
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Authenticated HTTP client with one-shot token refresh.
#[derive(Debug)]
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    metrics: Metrics,
}

impl ApiGateway {
    /// Gateway for the configured API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] when the HTTP client cannot be built.
    pub fn new(
        settings: &ClientSettings,
        session: Arc<SessionStore>,
        metrics: Metrics,
    ) -> ApiResult<Self> {
        Self::with_base_url(
            settings.api_url.as_str(),
            settings.request_timeout,
            session,
            metrics,
        )
    }

    /// Gateway for an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ClientBuild`] when the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionStore>,
        metrics: Metrics,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|source| ApiError::ClientBuild { source })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            metrics,
        })
    }

    /// Session the gateway reads tokens from.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Metrics registry requests are counted in.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Issue `call` and return the decoded JSON body (`null` when empty).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] for non-success statuses (after at most one
    /// refresh-and-retry on `401`), [`ApiError::Network`] for transport
    /// failures and [`ApiError::Decode`] for malformed bodies.
    pub async fn request(&self, call: &ApiRequest) -> ApiResult<Value> {
        let response = self.send(call).await?;
        if response.status() != StatusCode::UNAUTHORIZED || is_refresh_path(call.path()) {
            return read_json(call.path(), response).await;
        }

        let rejected = classify_failure(response).await;
        tracing::debug!(path = call.path(), "session rejected; attempting token refresh");
        if !self.refresh_token().await {
            return Err(rejected);
        }
        let retried = self.send(call).await?;
        read_json(call.path(), retried).await
    }

    /// Issue `call` and decode the body into `T`.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn send_json<T: DeserializeOwned>(&self, call: &ApiRequest) -> ApiResult<T> {
        let body = self.request(call).await?;
        decode(call.path(), body)
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(&ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send_json(&ApiRequest::post(path).json(body)?).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn put<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send_json(&ApiRequest::put(path).json(body)?).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiGateway::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send_json(&ApiRequest::delete(path)).await
    }

    async fn send(&self, call: &ApiRequest) -> ApiResult<Response> {
        let url = self.url_for(call.path())?;
        let mut builder = self
            .http
            .request(call.method.clone(), url)
            .header(HEADER_REQUEST_ID, Uuid::new_v4().to_string());
        if !call.query.is_empty() {
            builder = builder.query(&call.query);
        }
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &call.body {
            builder = builder.json(body);
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                self.metrics
                    .inc_http_request(call.method.as_str(), Some(status));
                tracing::debug!(method = %call.method, path = call.path(), status, "api call completed");
                Ok(response)
            }
            Err(source) => {
                self.metrics.inc_http_request(call.method.as_str(), None);
                tracing::warn!(method = %call.method, path = call.path(), error = %source, "api call failed");
                Err(ApiError::Network {
                    path: call.path.clone(),
                    source,
                })
            }
        }
    }

    fn url_for(&self, path: &str) -> ApiResult<Url> {
        let joined = if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        };
        Url::parse(&joined).map_err(|source| ApiError::InvalidUrl {
            url: joined,
            source,
        })
    }

    async fn refresh_token(&self) -> bool {
        match self.fetch_refreshed_token().await {
            Ok(Some(token)) => {
                self.session.set_token(token);
                self.metrics.inc_token_refresh(RefreshOutcomeLabel::Refreshed);
                tracing::info!("bearer token refreshed");
                true
            }
            Ok(None) => {
                self.metrics.inc_token_refresh(RefreshOutcomeLabel::Empty);
                tracing::warn!("token refresh returned no token");
                false
            }
            Err(err) => {
                self.metrics.inc_token_refresh(RefreshOutcomeLabel::Rejected);
                tracing::warn!(error = %err, status = ?err.status(), "token refresh failed");
                false
            }
        }
    }

    async fn fetch_refreshed_token(&self) -> ApiResult<Option<String>> {
        let response = self.send(&ApiRequest::get(REFRESH_PATH)).await?;
        let body = read_json(REFRESH_PATH, response).await?;
        let envelope: ApiEnvelope<TokenPayload> = decode(REFRESH_PATH, body)?;
        Ok(envelope.data.token.filter(|token| !token.is_empty()))
    }
}

fn is_refresh_path(path: &str) -> bool {
    path.contains(REFRESH_PATH)
}

fn decode<T: DeserializeOwned>(path: &str, body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

async fn read_json(path: &str, response: Response) -> ApiResult<Value> {
    if !response.status().is_success() {
        return Err(classify_failure(response).await);
    }
    let bytes = response.bytes().await.map_err(|source| ApiError::Network {
        path: path.to_string(),
        source,
    })?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Turn a non-success response into [`ApiError::Http`].
async fn classify_failure(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.unwrap_or_default();
    let body_text = String::from_utf8_lossy(&bytes).trim().to_string();

    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .or_else(|| (!body_text.is_empty()).then_some(body_text))
        .unwrap_or_else(|| format!("request failed with status {status}"));
    ApiError::Http { status, message }
}
