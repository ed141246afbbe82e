//! Telemetry failures.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::string::FromUtf8Error;

use prometheus::Error as PrometheusError;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised while wiring up logging or client metrics.
#[derive(Debug)]
pub enum TelemetryError {
    /// A global tracing subscriber is already installed.
    SubscriberInstall {
        /// Error reported by `tracing-subscriber`.
        source: TryInitError,
    },
    /// A collector could not be created or added to the registry.
    Metric {
        /// Name of the offending metric.
        name: &'static str,
        /// Error reported by Prometheus.
        source: PrometheusError,
    },
    /// The registry could not be written in text exposition format.
    Render {
        /// Error reported by the encoder.
        source: PrometheusError,
    },
    /// The rendered exposition was not UTF-8.
    RenderEncoding {
        /// Conversion error for the encoded buffer.
        source: FromUtf8Error,
    },
}

impl TelemetryError {
    /// Metric name attached to the error, if any.
    #[must_use]
    pub const fn metric_name(&self) -> Option<&'static str> {
        match self {
            Self::Metric { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl Display for TelemetryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::SubscriberInstall { .. } => "tracing subscriber already installed",
            Self::Metric { .. } => "failed to set up client metric",
            Self::Render { .. } => "failed to render client metrics",
            Self::RenderEncoding { .. } => "rendered client metrics were not utf-8",
        };
        f.write_str(message)
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::SubscriberInstall { source } => Some(source),
            Self::Metric { source, .. } | Self::Render { source } => Some(source),
            Self::RenderEncoding { source } => Some(source),
        }
    }
}
