pub(crate) mod auth;
pub(crate) mod chargers;
pub(crate) mod clients;
pub(crate) mod dashboard;
pub(crate) mod watch;

use amc_client::Notice;
use chrono::{Local, NaiveDate};
use tokio::sync::broadcast;

use crate::output::print_notice;

/// Print every notice queued since `rx` subscribed.
pub(crate) fn drain_notices(rx: &mut broadcast::Receiver<Notice>) {
    while let Ok(notice) = rx.try_recv() {
        print_notice(&notice);
    }
}

/// Calendar day used for relative date figures.
pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
