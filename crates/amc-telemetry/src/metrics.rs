//! Prometheus-backed client metrics.
//!
//! # Design
//! - Collector registration is encapsulated so the public API stays small.
//! - Counters cover what the client observes: outbound requests, token
//!   refresh attempts, list fetch outcomes and optimistic mutations.

use std::sync::Arc;

use prometheus::{Encoder, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Outcome label recorded for a token refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcomeLabel {
    /// The refresh call returned a new token.
    Refreshed,
    /// The refresh call succeeded but carried no token.
    Empty,
    /// The refresh call failed.
    Rejected,
}

impl RefreshOutcomeLabel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Refreshed => "refreshed",
            Self::Empty => "empty",
            Self::Rejected => "rejected",
        }
    }
}

/// Outcome label recorded for a list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcomeLabel {
    /// The response was applied to the list state.
    Applied,
    /// The response arrived after a newer request and was discarded.
    Stale,
    /// The request failed.
    Failed,
}

impl FetchOutcomeLabel {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Stale => "stale",
            Self::Failed => "failed",
        }
    }
}

/// Prometheus-backed metrics registry shared by client components.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    token_refresh_total: IntCounterVec,
    list_fetch_total: IntCounterVec,
    mutations_total: IntCounterVec,
    session_authenticated: IntGauge,
}

/// Snapshot of selected counters for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Token refreshes that produced a new token.
    pub token_refreshed_total: u64,
    /// Token refreshes that failed or returned no token.
    pub token_refresh_failed_total: u64,
    /// List responses discarded because a newer request superseded them.
    pub stale_list_results_total: u64,
    /// Whether the session is currently authenticated (`1`) or not (`0`).
    pub session_authenticated: i64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = counter_vec(
            "http_requests_total",
            "Outbound API requests by method and status",
            &["method", "status"],
        )?;
        let token_refresh_total = counter_vec(
            "token_refresh_total",
            "Bearer token refresh attempts by outcome",
            &["outcome"],
        )?;
        let list_fetch_total = counter_vec(
            "list_fetch_total",
            "List page fetches by entity and outcome",
            &["entity", "outcome"],
        )?;
        let mutations_total = counter_vec(
            "mutations_total",
            "Optimistic list mutations by entity and kind",
            &["entity", "kind"],
        )?;
        let session_authenticated = IntGauge::with_opts(Opts::new(
            "session_authenticated",
            "Whether the client holds an authenticated session",
        ))
        .map_err(|source| TelemetryError::Metric {
            name: "session_authenticated",
            source,
        })?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "token_refresh_total", &token_refresh_total)?;
        register(&registry, "list_fetch_total", &list_fetch_total)?;
        register(&registry, "mutations_total", &mutations_total)?;
        registry
            .register(Box::new(session_authenticated.clone()))
            .map_err(|source| TelemetryError::Metric {
                name: "session_authenticated",
                source,
            })?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                token_refresh_total,
                list_fetch_total,
                mutations_total,
                session_authenticated,
            }),
        })
    }

    /// Count an outbound request. `status` is `None` when no response arrived.
    pub fn inc_http_request(&self, method: &str, status: Option<u16>) {
        let status = status.map_or_else(|| "error".to_string(), |code| code.to_string());
        self.inner
            .http_requests_total
            .with_label_values(&[method, status.as_str()])
            .inc();
    }

    /// Count a token refresh attempt.
    pub fn inc_token_refresh(&self, outcome: RefreshOutcomeLabel) {
        self.inner
            .token_refresh_total
            .with_label_values(&[outcome.as_str()])
            .inc();
    }

    /// Count a list fetch for `entity`.
    pub fn inc_list_fetch(&self, entity: &str, outcome: FetchOutcomeLabel) {
        self.inner
            .list_fetch_total
            .with_label_values(&[entity, outcome.as_str()])
            .inc();
    }

    /// Count an optimistic mutation applied to a list.
    pub fn inc_mutation(&self, entity: &str, kind: &str) {
        self.inner
            .mutations_total
            .with_label_values(&[entity, kind])
            .inc();
    }

    /// Record whether a session is currently authenticated.
    pub fn set_session_authenticated(&self, authenticated: bool) {
        self.inner
            .session_authenticated
            .set(i64::from(authenticated));
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::Render { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::RenderEncoding { source })
    }

    /// Take a point-in-time snapshot of the most relevant counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        let refresh = |outcome: RefreshOutcomeLabel| {
            self.inner
                .token_refresh_total
                .with_label_values(&[outcome.as_str()])
                .get()
        };
        let stale = ["clients", "chargers"]
            .iter()
            .map(|entity| {
                self.inner
                    .list_fetch_total
                    .with_label_values(&[*entity, FetchOutcomeLabel::Stale.as_str()])
                    .get()
            })
            .sum();
        MetricsSnapshot {
            token_refreshed_total: refresh(RefreshOutcomeLabel::Refreshed),
            token_refresh_failed_total: refresh(RefreshOutcomeLabel::Rejected)
                + refresh(RefreshOutcomeLabel::Empty),
            stale_list_results_total: stale,
            session_authenticated: self.inner.session_authenticated.get(),
        }
    }
}

fn counter_vec(name: &'static str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .map_err(|source| TelemetryError::Metric { name, source })
}

fn register(registry: &Registry, name: &'static str, collector: &IntCounterVec) -> Result<()> {
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Metric { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("GET", Some(200));
        metrics.inc_http_request("POST", None);
        metrics.inc_token_refresh(RefreshOutcomeLabel::Refreshed);
        metrics.inc_token_refresh(RefreshOutcomeLabel::Empty);
        metrics.inc_token_refresh(RefreshOutcomeLabel::Rejected);
        metrics.inc_list_fetch("clients", FetchOutcomeLabel::Stale);
        metrics.inc_list_fetch("chargers", FetchOutcomeLabel::Stale);
        metrics.inc_list_fetch("chargers", FetchOutcomeLabel::Applied);
        metrics.inc_mutation("clients", "delete");
        metrics.set_session_authenticated(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.token_refreshed_total, 1);
        assert_eq!(snapshot.token_refresh_failed_total, 2);
        assert_eq!(snapshot.stale_list_results_total, 2);
        assert_eq!(snapshot.session_authenticated, 1);

        let rendered = metrics.render()?;
        assert!(rendered.contains("http_requests_total"));
        assert!(rendered.contains("status=\"error\""));
        assert!(rendered.contains("list_fetch_total"));
        assert!(rendered.contains("mutations_total"));
        Ok(())
    }

    #[test]
    fn snapshot_serializes_to_json() -> Result<()> {
        let metrics = Metrics::new()?;
        let value = serde_json::to_value(metrics.snapshot()).map_err(|err| {
            TelemetryError::Render {
                source: prometheus::Error::Msg(err.to_string()),
            }
        })?;
        assert_eq!(value["session_authenticated"], 0);
        Ok(())
    }
}
