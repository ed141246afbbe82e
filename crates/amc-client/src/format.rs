//! Date helpers for display.
//!
//! The server sends dates either as `YYYY-MM-DD` or as RFC 3339 timestamps;
//! both are accepted everywhere.

use chrono::{DateTime, Datelike, NaiveDate};

const DISPLAY_FORMAT: &str = "%b %-d, %Y";
const PLACEHOLDER: &str = "-";

/// Parse a server date into a calendar day.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.date_naive());
    }
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Render a server date as `Jan 5, 2025`.
///
/// Missing values render as `-`; unparseable values are shown verbatim.
#[must_use]
pub fn format_date(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        None | Some("") => PLACEHOLDER.to_string(),
        Some(value) => parse_date(value)
            .map_or_else(|| value.to_string(), |day| day.format(DISPLAY_FORMAT).to_string()),
    }
}

/// Whole days from `today` until `end`; negative once the date has passed.
#[must_use]
pub fn days_remaining(end: Option<&str>, today: NaiveDate) -> Option<i64> {
    let end = parse_date(end?)?;
    Some((end - today).num_days())
}

/// Whether `raw` falls in the same calendar month as `today`.
#[must_use]
pub fn in_month_of(raw: Option<&str>, today: NaiveDate) -> bool {
    raw.and_then(parse_date)
        .is_some_and(|day| day.year() == today.year() && day.month() == today.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn formats_plain_and_timestamp_dates() {
        assert_eq!(format_date(Some("2025-01-05")), "Jan 5, 2025");
        assert_eq!(format_date(Some("2024-12-31T00:00:00.000Z")), "Dec 31, 2024");
        assert_eq!(format_date(Some("2024-03-09T18:30:00+05:30")), "Mar 9, 2024");
    }

    #[test]
    fn missing_and_garbage_values_degrade() {
        assert_eq!(format_date(None), "-");
        assert_eq!(format_date(Some("  ")), "-");
        assert_eq!(format_date(Some("someday")), "someday");
    }

    #[test]
    fn days_remaining_counts_signed_days() {
        let today = day(2025, 1, 10);
        assert_eq!(days_remaining(Some("2025-01-20"), today), Some(10));
        assert_eq!(days_remaining(Some("2025-01-01T00:00:00.000Z"), today), Some(-9));
        assert_eq!(days_remaining(None, today), None);
        assert_eq!(days_remaining(Some("never"), today), None);
    }

    #[test]
    fn month_membership_checks_year_too() {
        let today = day(2025, 6, 15);
        assert!(in_month_of(Some("2025-06-01"), today));
        assert!(!in_month_of(Some("2024-06-01"), today));
        assert!(!in_month_of(None, today));
    }
}
