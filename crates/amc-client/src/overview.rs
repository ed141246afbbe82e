//! Per-client detail figures derived from already-fetched data.

use amc_api_models::{AmcStatus, Charger, Client};
use chrono::NaiveDate;
use serde::Serialize;

use crate::format::{in_month_of, parse_date};

/// Whether a contract period covers a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContractPeriod {
    /// `today` lies within `[amc_start, amc_end]`.
    Active,
    /// Outside the period, or the period is incomplete.
    Expired,
}

impl ContractPeriod {
    /// Classify the period `[start, end]` against `today`.
    #[must_use]
    pub fn of(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Self {
        match (start.and_then(parse_date), end.and_then(parse_date)) {
            (Some(start), Some(end)) if start <= today && today <= end => Self::Active,
            _ => Self::Expired,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expired => "Expired",
        }
    }
}

/// Charger counts shown on a client's detail view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChargerSummary {
    /// All chargers listed for the client.
    pub total: usize,
    /// Chargers whose AMC ends this calendar month.
    pub expiring_this_month: usize,
    /// Chargers created this calendar month.
    pub added_this_month: usize,
    /// Chargers with status `ACTIVE`.
    pub active: usize,
}

impl ChargerSummary {
    /// Tally `chargers` as of `today`.
    #[must_use]
    pub fn tally(chargers: &[Charger], today: NaiveDate) -> Self {
        chargers.iter().fold(
            Self {
                total: chargers.len(),
                ..Self::default()
            },
            |mut acc, charger| {
                acc.expiring_this_month += usize::from(in_month_of(charger.amc_end.as_deref(), today));
                acc.added_this_month += usize::from(in_month_of(charger.created_at.as_deref(), today));
                acc.active += usize::from(charger.status == AmcStatus::Active);
                acc
            },
        )
    }
}

/// Everything the client detail view shows beyond the raw record.
#[derive(Debug, Clone, Serialize)]
pub struct ClientOverview {
    /// The client record.
    pub client: Client,
    /// Contract period as of `today`.
    pub period: ContractPeriod,
    /// Charger tallies.
    pub chargers: ChargerSummary,
}

impl ClientOverview {
    /// Combine a client with its chargers.
    #[must_use]
    pub fn build(client: Client, chargers: &[Charger], today: NaiveDate) -> Self {
        let period = ContractPeriod::of(client.amc_start.as_deref(), client.amc_end.as_deref(), today);
        Self {
            client,
            period,
            chargers: ChargerSummary::tally(chargers, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_test_support::fixtures;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn contract_period_is_inclusive() {
        let today = day(2025, 3, 31);
        assert_eq!(
            ContractPeriod::of(Some("2024-04-01"), Some("2025-03-31"), today),
            ContractPeriod::Active
        );
        assert_eq!(
            ContractPeriod::of(Some("2024-04-01"), Some("2025-03-30T00:00:00.000Z"), today),
            ContractPeriod::Expired
        );
        assert_eq!(ContractPeriod::of(None, Some("2026-01-01"), today), ContractPeriod::Expired);
    }

    #[test]
    fn summary_counts_this_month_only() {
        let today = day(2025, 5, 12);
        let mut expiring = fixtures::charger(1, "CH-1", Some(4));
        expiring.amc_end = Some("2025-05-30T00:00:00.000Z".to_string());
        expiring.created_at = Some("2024-05-02T10:00:00.000Z".to_string());
        let mut fresh = fixtures::charger(2, "CH-2", Some(4));
        fresh.created_at = Some("2025-05-01T08:00:00.000Z".to_string());
        fresh.status = AmcStatus::Inactive;
        let mut old = fixtures::charger(3, "CH-3", Some(4));
        old.amc_end = Some("2025-06-01".to_string());

        let summary = ChargerSummary::tally(&[expiring, fresh, old], today);
        assert_eq!(
            summary,
            ChargerSummary {
                total: 3,
                expiring_this_month: 1,
                added_this_month: 1,
                active: 2,
            }
        );
    }

    #[test]
    fn overview_combines_client_and_chargers() {
        let mut client = fixtures::client(4, "ops@example.com");
        client.amc_start = Some("2025-01-01".to_string());
        client.amc_end = Some("2025-12-31".to_string());
        let overview = ClientOverview::build(client, &[], day(2025, 7, 1));
        assert_eq!(overview.period.as_str(), "Active");
        assert_eq!(overview.chargers.total, 0);
    }
}
