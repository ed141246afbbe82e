#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]

//! Typed client settings for the AMC console.
//!
//! Layout: `model.rs` (settings structs), `validate.rs` (field parsing and
//! bounds), `loader.rs` (`SettingsLoader` reading `AMC_*` variables),
//! `defaults.rs` (fallback values).

mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::{
    DEFAULT_API_URL, DEFAULT_DEBOUNCE_MS, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ENV_API_URL, ENV_DEBOUNCE_MS, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_PAGE_SIZE, ENV_TIMEOUT_SECS,
    SettingsLoader,
};
pub use model::{ClientSettings, ListSettings, LogFormatSetting};
