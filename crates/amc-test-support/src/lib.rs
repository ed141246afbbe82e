#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]

//! Shared test helpers used across the AMC console suites.
//! Layout: fixtures.rs (wire JSON builders and typed entities), http.rs
//! (header helpers for mock servers).

pub mod fixtures;
pub mod http;
