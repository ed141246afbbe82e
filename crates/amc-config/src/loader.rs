//! Environment-backed settings loader.
//!
//! # Design
//! - Lookups go through an injected function so tests never touch the process
//!   environment.
//! - Every variable is optional; unset variables fall back to `defaults.rs`.

use std::time::Duration;

use crate::defaults::{
    DEFAULT_API_URL, MAX_DEBOUNCE_MS, MAX_PAGE_SIZE, MAX_TIMEOUT_SECS,
};
use crate::error::ConfigResult;
use crate::model::{ClientSettings, ListSettings};
use crate::validate::{
    parse_api_url, parse_bounded_u32, parse_bounded_u64, parse_log_format, parse_log_level,
};

/// REST API base URL.
pub const ENV_API_URL: &str = "AMC_API_URL";
/// Rows per list page.
pub const ENV_PAGE_SIZE: &str = "AMC_PAGE_SIZE";
/// Debounce window in milliseconds.
pub const ENV_DEBOUNCE_MS: &str = "AMC_DEBOUNCE_MS";
/// Request timeout in seconds.
pub const ENV_TIMEOUT_SECS: &str = "AMC_HTTP_TIMEOUT_SECS";
/// Log level directive.
pub const ENV_LOG_LEVEL: &str = "AMC_LOG_LEVEL";
/// Log format (`auto`, `pretty`, `json`).
pub const ENV_LOG_FORMAT: &str = "AMC_LOG_FORMAT";

/// Loads [`ClientSettings`] from a key/value source.
pub struct SettingsLoader<F> {
    lookup: F,
}

impl SettingsLoader<fn(&str) -> Option<String>> {
    /// Loader backed by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            lookup: env_lookup,
        }
    }
}

impl<F> SettingsLoader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Loader backed by an arbitrary lookup function.
    pub const fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Resolve every setting, applying defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::ConfigError`] raised by field validation.
    pub fn load(&self) -> ConfigResult<ClientSettings> {
        let api_url = match self.value(ENV_API_URL) {
            Some(raw) => parse_api_url(ENV_API_URL, &raw)?,
            None => parse_api_url(ENV_API_URL, DEFAULT_API_URL)?,
        };
        let mut settings = ClientSettings::for_url(api_url);
        let defaults = ListSettings::default();

        settings.lists.page_size = self
            .value(ENV_PAGE_SIZE)
            .map(|raw| parse_bounded_u32(ENV_PAGE_SIZE, &raw, 1, MAX_PAGE_SIZE))
            .transpose()?
            .unwrap_or(defaults.page_size);
        settings.lists.debounce = self
            .value(ENV_DEBOUNCE_MS)
            .map(|raw| parse_bounded_u64(ENV_DEBOUNCE_MS, &raw, 0, MAX_DEBOUNCE_MS))
            .transpose()?
            .map_or(defaults.debounce, Duration::from_millis);
        if let Some(raw) = self.value(ENV_TIMEOUT_SECS) {
            let secs = parse_bounded_u64(ENV_TIMEOUT_SECS, &raw, 1, MAX_TIMEOUT_SECS)?;
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = self.value(ENV_LOG_LEVEL) {
            settings.log_level = parse_log_level(ENV_LOG_LEVEL, &raw)?;
        }
        if let Some(raw) = self.value(ENV_LOG_FORMAT) {
            settings.log_format = parse_log_format(ENV_LOG_FORMAT, &raw)?;
        }

        tracing::debug!(
            api_url = %settings.api_url,
            page_size = settings.lists.page_size,
            debounce_ms = settings.lists.debounce.as_millis(),
            timeout_secs = settings.request_timeout.as_secs(),
            "client settings resolved"
        );
        Ok(settings)
    }

    fn value(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
