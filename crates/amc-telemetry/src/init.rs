//! Logging setup for the client library and CLI.
//!
//! Logs always go to stderr so stdout stays reserved for command output
//! (tables or JSON that callers may pipe).

use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, TelemetryError};

/// Level used when neither `RUST_LOG` nor the settings provide one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// HTTP stack crates are capped at `warn` unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn";

static APP_VERSION: OnceCell<String> = OnceCell::new();

/// Install the global tracing subscriber described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::SubscriberInstall`] when a global subscriber is
/// already in place.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    // First caller wins; later calls keep the recorded version.
    let _ = APP_VERSION.set(config.app_version.to_string());

    let filter = env_filter(config.level);
    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.level.eq_ignore_ascii_case("trace"));
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(base.json().flatten_event(true))
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(base.compact())
            .try_init(),
    };
    installed.map_err(|source| TelemetryError::SubscriberInstall { source })?;

    tracing::debug!(version = app_version(), format = ?config.format, "logging ready");
    Ok(())
}

/// Version recorded by [`init_logging`], or this crate's version before then.
#[must_use]
pub fn app_version() -> &'static str {
    APP_VERSION
        .get()
        .map_or(env!("CARGO_PKG_VERSION"), String::as_str)
}

/// Inputs for [`init_logging`].
#[derive(Debug, Clone, Copy)]
pub struct LoggingConfig<'a> {
    /// Default filter directive such as `info` or `amc_client=debug`.
    pub level: &'a str,
    /// Output format.
    pub format: LogFormat,
    /// Version string attached to the startup event.
    pub app_version: &'a str,
}

/// Log output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Compact human-readable lines.
    Pretty,
}

impl LogFormat {
    /// Pretty for debug builds, JSON for release builds.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }

    /// Map a settings label (`json`, `pretty`, `auto`) onto a format.
    /// Anything other than `json` or `pretty` falls back to [`Self::infer`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::infer(),
        }
    }
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},{QUIET_DEPENDENCIES}")))
}
