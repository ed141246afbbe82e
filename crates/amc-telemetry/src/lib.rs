#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]

//! Telemetry primitives shared across the AMC console workspace.
//!
//! This crate centralises logging and client-side metrics so the library and
//! the CLI share one observability story.

pub mod error;
pub mod init;
pub mod metrics;

pub use error::{Result, TelemetryError};
pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, app_version, init_logging};
pub use metrics::{FetchOutcomeLabel, Metrics, MetricsSnapshot, RefreshOutcomeLabel};
