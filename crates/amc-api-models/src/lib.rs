#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls
)]
#![warn(missing_docs, unreachable_pub, unused)]
//! Shared HTTP DTOs for the AMC console API.
//!
//! The server owns the canonical schema; these types mirror what the client
//! caches. Field names follow the wire format (`snake_case` for entity columns,
//! `camelCase` for timestamps and aggregates) so request/response encoding
//! stays deterministic across the client library and the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Numeric identifier assigned by the server to clients and chargers.
pub type EntityId = i64;

/// Default page size used by list screens.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Lifecycle status of an AMC agreement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AmcStatus {
    /// Created but not yet started.
    #[default]
    Pending,
    /// Contract currently in force.
    Active,
    /// Manually disabled.
    Inactive,
    /// Contract end date has passed.
    Expired,
    /// Status value the client does not recognise.
    #[serde(other)]
    Unknown,
}

impl AmcStatus {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::Expired => "EXPIRED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for AmcStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AmcStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACTIVE" => Ok(Self::Active),
            "INACTIVE" => Ok(Self::Inactive),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(ParseStatusError {
                value: value.to_string(),
            }),
        }
    }
}

/// Raised when a status string does not name a known status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    /// Offending input.
    pub value: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status '{}'", self.value)
    }
}

impl std::error::Error for ParseStatusError {}

/// Status filter applied to list endpoints. `All` disables filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    /// No status filtering.
    #[default]
    All,
    /// Only entries with the given status.
    Only(AmcStatus),
}

impl StatusFilter {
    /// Value sent as the `status` query parameter.
    #[must_use]
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(status) => status.as_str(),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

impl Serialize for StatusFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_query())
    }
}

/// Renewal increment assumed when a client has none recorded.
const DEFAULT_INCREMENT_VALUE: f64 = 1.0;

/// Read an explicit `null` the same way as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

const fn default_increment() -> f64 {
    DEFAULT_INCREMENT_VALUE
}

fn increment_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Option::<f64>::deserialize(deserializer).map(|value| value.unwrap_or(DEFAULT_INCREMENT_VALUE))
}

/// Client record with its AMC terms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Client {
    /// Server identifier.
    pub id: EntityId,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    /// AMC start date (ISO-8601).
    pub amc_start: Option<String>,
    /// AMC end date (ISO-8601).
    pub amc_end: Option<String>,
    /// Contract status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AmcStatus,
    /// Integration token issued for the client.
    pub token: Option<String>,
    /// Client domain.
    pub domain: Option<String>,
    /// Maintenance hours covered by the AMC.
    #[serde(default, deserialize_with = "null_as_default")]
    pub amc_hours: u32,
    /// Number of chargers covered by the AMC.
    #[serde(default, deserialize_with = "null_as_default")]
    pub chargers_for_amc: u32,
    /// Increment value applied on renewal.
    #[serde(default = "default_increment", deserialize_with = "increment_or_default")]
    pub increment_value: f64,
    /// Chargers attached to the client, when the endpoint joins them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chargers: Option<Vec<Charger>>,
    /// Aggregated charger count, when the endpoint computes it.
    #[serde(
        rename = "totalChargers",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_chargers: Option<u32>,
    /// Creation timestamp.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Charger record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Charger {
    /// Server identifier.
    pub id: EntityId,
    /// Hardware identifier printed on the device.
    #[serde(default, deserialize_with = "null_as_default")]
    pub charger_id: String,
    /// Charger model/type.
    pub charger_type: Option<String>,
    /// AMC start date (ISO-8601).
    pub amc_start: Option<String>,
    /// AMC end date (ISO-8601).
    pub amc_end: Option<String>,
    /// Contract status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AmcStatus,
    /// Creation timestamp.
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last update timestamp.
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Owning client, when the endpoint joins it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<ChargerClient>,
}

/// Client summary joined onto a charger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChargerClient {
    /// Client identifier.
    pub id: EntityId,
    /// Display name.
    pub name: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Standard `{ data, message }` response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    /// Response payload.
    pub data: T,
    /// Optional server message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error body returned by the server on failure statuses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable failure description.
    pub message: Option<String>,
}

/// Pagination block as returned by list endpoints.
///
/// Client lists report `currentPage`/`totalClients`/`limit` while charger lists
/// report `page`/`total`; both spellings are accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationDto {
    /// One-based page index.
    #[serde(rename = "currentPage", alias = "page", default = "first_page")]
    pub current_page: u32,
    /// Total page count.
    #[serde(rename = "totalPages", default = "first_page")]
    pub total_pages: u32,
    /// Total matching records.
    #[serde(
        rename = "total",
        alias = "totalClients",
        alias = "totalChargers",
        default
    )]
    pub total: u64,
    /// Page size echoed by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

const fn first_page() -> u32 {
    1
}

/// Payload of `GET /clients`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientList {
    /// Clients on the requested page.
    pub clients: Vec<Client>,
    /// Pagination metadata.
    pub pagination: PaginationDto,
}

/// Payload of `GET /chargers` and `GET /chargers/client/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChargerList {
    /// Chargers on the requested page.
    pub chargers: Vec<Charger>,
    /// Pagination metadata.
    pub pagination: PaginationDto,
}

/// Query parameters shared by list endpoints.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ListQuery {
    /// One-based page index.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Free-text search.
    pub search: String,
    /// Status filter.
    pub status: StatusFilter,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: String::new(),
            status: StatusFilter::All,
        }
    }
}

/// Token payload returned by login and refresh.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPayload {
    /// Bearer token, absent when the server declined to issue one.
    pub token: Option<String>,
}

/// `POST /auth/login` body.
#[derive(Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated user as returned by `GET /auth/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CurrentUser {
    /// User identifier.
    pub id: Option<EntityId>,
    /// Account email.
    pub email: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Role label.
    pub role: Option<String>,
    /// Fields the client does not model.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrentUser {
    /// Best available label for display.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("unknown user")
    }
}

/// Body for `POST /clients` and `PUT /clients/:id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientPayload {
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// AMC start date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amc_start: Option<String>,
    /// AMC end date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amc_end: Option<String>,
    /// Contract status.
    pub status: AmcStatus,
    /// Client domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Maintenance hours covered.
    pub amc_hours: u32,
    /// Chargers covered.
    pub chargers_for_amc: u32,
    /// Renewal increment.
    pub increment_value: f64,
}

/// Body for `PUT /chargers/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChargerUpdate {
    /// New AMC start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amc_start: Option<String>,
    /// New AMC end date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amc_end: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AmcStatus>,
}

impl ChargerUpdate {
    /// Whether the update carries no changes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amc_start.is_none() && self.amc_end.is_none() && self.status.is_none()
    }
}

/// Headline counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Total clients.
    #[serde(default)]
    pub total_clients: u64,
    /// Total chargers.
    #[serde(default)]
    pub total_chargers: u64,
    /// Chargers whose AMC is about to expire.
    #[serde(default)]
    pub expiring_chargers: u64,
    /// Recently registered chargers.
    #[serde(default)]
    pub new_chargers: u64,
}

/// Payload of `GET /dashboard`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardData {
    /// Headline counters.
    #[serde(default)]
    pub stats: DashboardStats,
    /// Clients whose AMC is about to expire.
    #[serde(rename = "expiringClientsData", default)]
    pub expiring_clients: Vec<Client>,
    /// Chargers whose AMC is about to expire.
    #[serde(rename = "expiringChargersData", default)]
    pub expiring_chargers: Vec<Charger>,
}
