//! Parsing and bounds checks for raw settings values.

use url::Url;

use crate::error::{ConfigError, ConfigResult};
use crate::model::LogFormatSetting;

/// Parse an API base URL. Only `http` and `https` schemes are accepted.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] when the value does not parse, or
/// [`ConfigError::InvalidField`] when the scheme is not HTTP(S).
pub fn parse_api_url(field: &str, value: &str) -> ConfigResult<Url> {
    let trimmed = value.trim();
    let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidUrl {
        value: trimmed.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(trimmed.to_string()),
            reason: "scheme must be http or https",
        }),
    }
}

/// Parse an unsigned integer within `min..=max`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for non-numeric or out-of-range input.
pub fn parse_bounded_u64(field: &str, value: &str, min: u64, max: u64) -> ConfigResult<u64> {
    let parsed = value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(value.to_string()),
            reason: "must be an unsigned integer",
        })?;
    if parsed < min || parsed > max {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(value.to_string()),
            reason: "out of range",
        });
    }
    Ok(parsed)
}

/// Parse a `u32` within `min..=max`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for non-numeric or out-of-range input.
pub fn parse_bounded_u32(field: &str, value: &str, min: u32, max: u32) -> ConfigResult<u32> {
    let parsed = parse_bounded_u64(field, value, u64::from(min), u64::from(max))?;
    u32::try_from(parsed).map_err(|_| ConfigError::InvalidField {
        field: field.to_string(),
        value: Some(value.to_string()),
        reason: "out of range",
    })
}

/// Parse a log format label.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for labels other than
/// `auto`, `pretty`, or `json`.
pub fn parse_log_format(field: &str, value: &str) -> ConfigResult<LogFormatSetting> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "auto" => Ok(LogFormatSetting::Auto),
        "pretty" => Ok(LogFormatSetting::Pretty),
        "json" => Ok(LogFormatSetting::Json),
        _ => Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: Some(value.to_string()),
            reason: "expected auto, pretty, or json",
        }),
    }
}

/// Reject blank log level directives.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the directive is empty.
pub fn parse_log_level(field: &str, value: &str) -> ConfigResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            value: None,
            reason: "must not be empty",
        });
    }
    Ok(trimmed.to_string())
}
