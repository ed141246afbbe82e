//! Fallback values applied when an `AMC_*` variable is unset.
//!
//! # Design
//! - Keep every default in one place so the CLI help text and the loader agree.
//! - Request timeout is explicit; the transport default is never relied on.

/// Base URL of the REST API.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
/// Rows per list page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Quiet period before a filter change triggers a list fetch.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
/// Per-request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Log level used when neither `RUST_LOG` nor `AMC_LOG_LEVEL` is set.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Largest accepted page size.
pub(crate) const MAX_PAGE_SIZE: u32 = 100;
/// Largest accepted debounce window.
pub(crate) const MAX_DEBOUNCE_MS: u64 = 10_000;
/// Largest accepted request timeout.
pub(crate) const MAX_TIMEOUT_SECS: u64 = 300;
