#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]

//! Client-side state layer for the AMC admin console.
//!
//! Layers, leaves first: [`SessionStore`] holds the bearer token,
//! [`ApiGateway`] sends requests with a single refresh-and-retry on 401, the
//! typed services in [`api`] map resources, [`ListController`] keeps a
//! debounced, sequence-guarded view of one paginated list, and
//! [`AuthController`] tracks the sign-in state. [`AppContext`] wires them
//! together for one process.

pub mod api;
pub mod auth;
pub mod context;
pub mod error;
pub mod format;
pub mod gateway;
pub mod list;
pub mod notify;
pub mod overview;
pub mod routes;
pub mod screens;
pub mod session;
pub mod validate;

pub use auth::{AuthController, AuthStatus};
pub use context::AppContext;
pub use error::{ApiError, ApiResult};
pub use gateway::{ApiGateway, ApiRequest};
pub use list::{EntityListState, FetchOutcome, ListController, ListEntity, ListSource};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use overview::{ChargerSummary, ClientOverview, ContractPeriod};
pub use routes::{RouteArea, RouteDecision, decide_route};
pub use screens::{ChargersScreen, ClientsScreen};
pub use session::SessionStore;
pub use validate::{ChargerForm, ClientForm, Credentials, ValidationErrors};
