//! Shared context construction and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use amc_client::{ApiError, AppContext};
use amc_config::{ClientSettings, SettingsLoader};
use amc_telemetry::{LogFormat, LoggingConfig, Metrics, init_logging};
use anyhow::anyhow;
use url::Url;

use crate::cli::Cli;

/// Command failure, split by exit code: rejected input (2) or anything else (3).
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) fn not_signed_in() -> Self {
        Self::failure(anyhow!("not signed in (run `amc login` or set AMC_TOKEN)"))
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "invalid input: {message}"),
            Self::Failure(error) => write!(f, "{error:#}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Map API failures onto CLI exit semantics. Rejected input is a validation
/// error; everything else is operational.
impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match &err {
            ApiError::Validation(errors) => Self::validation(errors.summary()),
            ApiError::Http {
                status: 400 | 409 | 422,
                message,
            } => Self::validation(message.clone()),
            ApiError::Http { status: 401, .. } => Self::not_signed_in(),
            ApiError::Http { status, message } => {
                Self::failure(anyhow!("{message} (status {status})"))
            }
            _ => {
                let summary = err.user_message();
                Self::failure(anyhow::Error::new(err).context(summary))
            }
        }
    }
}

/// Resolve settings from the environment, then apply CLI flag overrides.
pub(crate) fn resolve_settings(cli: &Cli) -> CliResult<ClientSettings> {
    let mut settings = SettingsLoader::from_env()
        .load()
        .map_err(|err| CliError::validation(err.detail()))?;
    if let Some(url) = &cli.api_url {
        settings.api_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(limit) = cli.page_size {
        settings.lists.page_size = limit.max(1);
    }
    Ok(settings)
}

/// Install the log subscriber. Failure leaves logging off but is not fatal.
pub(crate) fn install_logging(settings: &ClientSettings) {
    let config = LoggingConfig {
        level: &settings.log_level,
        format: LogFormat::from_label(settings.log_format.as_str()),
        app_version: env!("CARGO_PKG_VERSION"),
    };
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }
}

/// Build the application container for one invocation.
pub(crate) fn build_context(settings: &ClientSettings, token: Option<String>) -> CliResult<AppContext> {
    let metrics = Metrics::new().map_err(|err| CliError::failure(anyhow!("{err}")))?;
    AppContext::new(settings, token.filter(|value| !value.trim().is_empty()), metrics)
        .map_err(CliError::from)
}

/// Parse the API URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}
