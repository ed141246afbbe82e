//! Form validation for writes that reach the API.
//!
//! # Design
//! - Forms hold loosely typed input exactly as an operator typed it.
//! - `validate` either yields the wire payload or every field error at once;
//!   nothing invalid is ever handed to the gateway.
//! - Calendar dates are entered as `YYYY-MM-DD` and sent as UTC midnight
//!   timestamps.

use std::fmt;

use amc_api_models::{AmcStatus, Charger, ChargerUpdate, Client, ClientPayload, LoginRequest};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
const MIN_INCREMENT_VALUE: f64 = 0.1;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field.
    pub field: &'static str,
    /// Operator-facing explanation.
    pub message: String,
}

/// Every field error found while validating a form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("form validation failed")]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Record an error for `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterate the recorded errors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    /// One-line summary suitable for a notice.
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|error| format!("{}: {}", error.field, error.message))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Raw login input.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Validate and convert into the login request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] when the email is malformed or the
    /// password is empty.
    pub fn validate(&self) -> Result<LoginRequest, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = self.email.trim();
        check_email(&mut errors, email);
        if self.password.is_empty() {
            errors.push("password", "Password is required");
        }
        errors.finish(LoginRequest {
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}

/// Client create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientForm {
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Contract start, `YYYY-MM-DD`; blank means unset.
    pub amc_start: String,
    /// Contract end, `YYYY-MM-DD`; blank means unset.
    pub amc_end: String,
    /// Contract status.
    pub status: AmcStatus,
    /// Client domain; blank means unset.
    pub domain: String,
    /// Contracted service hours.
    pub amc_hours: i64,
    /// Chargers covered by the contract.
    pub chargers_for_amc: i64,
    /// Billing increment.
    pub increment_value: f64,
}

impl Default for ClientForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            phone: String::new(),
            amc_start: String::new(),
            amc_end: String::new(),
            status: AmcStatus::Pending,
            domain: String::new(),
            amc_hours: 0,
            chargers_for_amc: 1,
            increment_value: 1.0,
        }
    }
}

impl ClientForm {
    /// Pre-fill the form from an existing client.
    #[must_use]
    pub fn from_client(client: &Client) -> Self {
        Self {
            email: client.email.clone(),
            phone: client.phone.clone(),
            amc_start: date_input(client.amc_start.as_deref()),
            amc_end: date_input(client.amc_end.as_deref()),
            status: client.status,
            domain: client.domain.clone().unwrap_or_default(),
            amc_hours: i64::from(client.amc_hours),
            chargers_for_amc: i64::from(client.chargers_for_amc),
            increment_value: client.increment_value,
        }
    }

    /// Validate the form and build the request body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every rejected field.
    pub fn validate(&self) -> Result<ClientPayload, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let email = self.email.trim();
        check_email(&mut errors, email);
        let phone = self.phone.trim();
        if phone.is_empty() {
            errors.push("phone", "Phone is required");
        }
        check_status(&mut errors, self.status);

        let amc_hours = u32::try_from(self.amc_hours).unwrap_or_else(|_| {
            errors.push("amc_hours", "AMC hours must be 0 or more");
            0
        });
        let chargers_for_amc = match u32::try_from(self.chargers_for_amc) {
            Ok(value) if value >= 1 => value,
            _ => {
                errors.push("chargers_for_amc", "At least 1 charger is required");
                1
            }
        };
        if !self.increment_value.is_finite() || self.increment_value < MIN_INCREMENT_VALUE {
            errors.push("increment_value", "Increment value must be at least 0.1");
        }

        let (amc_start, amc_end) = check_period(&mut errors, &self.amc_start, &self.amc_end);
        let domain = non_blank(&self.domain);

        errors.finish(ClientPayload {
            email: email.to_string(),
            phone: phone.to_string(),
            amc_start,
            amc_end,
            status: self.status,
            domain,
            amc_hours,
            chargers_for_amc,
            increment_value: self.increment_value,
        })
    }
}

/// Charger edit form. Only the contract period and status are writable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChargerForm {
    /// Contract start, `YYYY-MM-DD`; blank leaves it unchanged.
    pub amc_start: String,
    /// Contract end, `YYYY-MM-DD`; blank leaves it unchanged.
    pub amc_end: String,
    /// New status, if changing.
    pub status: Option<AmcStatus>,
}

impl ChargerForm {
    /// Pre-fill the form from an existing charger.
    #[must_use]
    pub fn from_charger(charger: &Charger) -> Self {
        Self {
            amc_start: date_input(charger.amc_start.as_deref()),
            amc_end: date_input(charger.amc_end.as_deref()),
            status: Some(charger.status),
        }
    }

    /// Validate the form and build the update body.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] for malformed dates, an inverted period,
    /// an unknown status, or an update that changes nothing.
    pub fn validate(&self) -> Result<ChargerUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if let Some(status) = self.status {
            check_status(&mut errors, status);
        }
        let (amc_start, amc_end) = check_period(&mut errors, &self.amc_start, &self.amc_end);
        let update = ChargerUpdate {
            amc_start,
            amc_end,
            status: self.status,
        };
        if update.is_empty() && errors.is_empty() {
            errors.push("status", "Nothing to update");
        }
        errors.finish(update)
    }
}

/// Trim a stored timestamp down to the `YYYY-MM-DD` form input.
fn date_input(value: Option<&str>) -> String {
    value
        .map(|raw| raw.get(..10).unwrap_or(raw).to_string())
        .unwrap_or_default()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        errors.push("email", "Email is required");
    } else if !looks_like_email(email) {
        errors.push("email", "Invalid email");
    }
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(head, tail)| !head.is_empty() && !tail.is_empty() && !tail.ends_with('.'))
}

fn check_status(errors: &mut ValidationErrors, status: AmcStatus) {
    if status == AmcStatus::Unknown {
        errors.push("status", "Status must be PENDING, ACTIVE, INACTIVE, or EXPIRED");
    }
}

fn parse_date(errors: &mut ValidationErrors, field: &'static str, raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_INPUT_FORMAT).map_or_else(
        |_| {
            errors.push(field, "Use the YYYY-MM-DD format");
            None
        },
        Some,
    )
}

fn check_period(
    errors: &mut ValidationErrors,
    start: &str,
    end: &str,
) -> (Option<String>, Option<String>) {
    let start = parse_date(errors, "amc_start", start);
    let end = parse_date(errors, "amc_end", end);
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        errors.push("amc_end", "AMC end must not be before AMC start");
    }
    (start.map(to_wire_timestamp), end.map(to_wire_timestamp))
}

fn to_wire_timestamp(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format(DATE_INPUT_FORMAT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ClientForm {
        ClientForm {
            email: "ops@example.com".to_string(),
            phone: "+15550100".to_string(),
            amc_start: "2025-01-01".to_string(),
            amc_end: "2025-12-31".to_string(),
            ..ClientForm::default()
        }
    }

    #[test]
    fn valid_client_form_builds_payload() {
        let payload = valid_form().validate().expect("valid form");
        assert_eq!(payload.email, "ops@example.com");
        assert_eq!(payload.amc_start.as_deref(), Some("2025-01-01T00:00:00.000Z"));
        assert_eq!(payload.amc_end.as_deref(), Some("2025-12-31T00:00:00.000Z"));
        assert_eq!(payload.chargers_for_amc, 1);
        assert!(payload.domain.is_none());
    }

    #[test]
    fn client_form_collects_every_error() {
        let form = ClientForm {
            email: "not-an-email".to_string(),
            phone: "   ".to_string(),
            amc_hours: -1,
            chargers_for_amc: 0,
            increment_value: 0.05,
            ..ClientForm::default()
        };
        let errors = form.validate().expect_err("invalid form");
        assert_eq!(errors.message_for("email"), Some("Invalid email"));
        assert_eq!(errors.message_for("phone"), Some("Phone is required"));
        assert!(errors.message_for("amc_hours").is_some());
        assert!(errors.message_for("chargers_for_amc").is_some());
        assert!(errors.message_for("increment_value").is_some());
        assert_eq!(errors.iter().count(), 5);
    }

    #[test]
    fn inverted_period_is_rejected() {
        let form = ClientForm {
            amc_start: "2025-06-01".to_string(),
            amc_end: "2025-05-01".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("inverted period");
        assert_eq!(
            errors.message_for("amc_end"),
            Some("AMC end must not be before AMC start")
        );
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let form = ClientForm {
            amc_start: "01/02/2025".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("bad date");
        assert!(errors.summary().starts_with("amc_start:"));
    }

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.co"));
        assert!(!looks_like_email("a@@b.co"));
    }

    #[test]
    fn credentials_require_password() {
        let creds = Credentials {
            email: "admin@example.com".to_string(),
            password: String::new(),
        };
        let errors = creds.validate().expect_err("missing password");
        assert_eq!(errors.message_for("password"), Some("Password is required"));
        assert!(!format!("{creds:?}").contains("password: \"\""));
    }

    #[test]
    fn charger_form_requires_a_change() {
        let errors = ChargerForm::default().validate().expect_err("empty update");
        assert_eq!(errors.message_for("status"), Some("Nothing to update"));

        let update = ChargerForm {
            status: Some(AmcStatus::Inactive),
            ..ChargerForm::default()
        }
        .validate()
        .expect("status only");
        assert_eq!(update.status, Some(AmcStatus::Inactive));
        assert!(update.amc_start.is_none());
    }

    #[test]
    fn date_input_trims_timestamps() {
        assert_eq!(date_input(Some("2025-01-05T00:00:00.000Z")), "2025-01-05");
        assert_eq!(date_input(None), "");
    }
}
