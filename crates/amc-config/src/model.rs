//! Typed settings consumed by the client library and CLI.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::defaults::{
    DEFAULT_DEBOUNCE_MS, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS,
};

/// Requested log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormatSetting {
    /// Pretty in debug builds, JSON in release builds.
    #[default]
    Auto,
    /// Human-readable output.
    Pretty,
    /// Structured JSON output.
    Json,
}

impl LogFormatSetting {
    /// Stable label for the setting.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Pretty => "pretty",
            Self::Json => "json",
        }
    }
}

/// Per-list synchronization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSettings {
    /// Rows requested per page.
    pub page_size: u32,
    /// Quiet period before a filter change triggers a fetch.
    pub debounce: Duration,
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// REST API base URL, path prefix included.
    pub api_url: Url,
    /// List synchronization settings shared by every list screen.
    pub lists: ListSettings,
    /// Timeout applied to each outbound request.
    pub request_timeout: Duration,
    /// Log level directive.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormatSetting,
}

impl ClientSettings {
    /// Settings pointing at `api_url` with every other field defaulted.
    #[must_use]
    pub fn for_url(api_url: Url) -> Self {
        Self {
            api_url,
            lists: ListSettings::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormatSetting::Auto,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let url = Url::parse("http://127.0.0.1:8080").expect("url");
        let settings = ClientSettings::for_url(url);
        assert_eq!(settings.api_url.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(settings.lists.page_size, 10);
        assert_eq!(settings.lists.debounce, Duration::from_millis(500));
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.log_format, LogFormatSetting::Auto);
    }

    #[test]
    fn log_format_labels_are_stable() {
        assert_eq!(LogFormatSetting::Json.as_str(), "json");
        assert_eq!(LogFormatSetting::Pretty.as_str(), "pretty");
        assert_eq!(LogFormatSetting::Auto.as_str(), "auto");
    }
}
