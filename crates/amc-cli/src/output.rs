//! Output renderers and formatting helpers for CLI commands.

use amc_api_models::{Charger, Client, CurrentUser, DashboardData};
use amc_client::format::{days_remaining, format_date};
use amc_client::list::Pagination;
use amc_client::{ClientOverview, Notice, NoticeLevel};
use anyhow::anyhow;
use chrono::NaiveDate;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

#[derive(Serialize)]
struct ListView<'a, T> {
    items: &'a [T],
    pagination: Pagination,
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_client_list(
    items: &[Client],
    pagination: Pagination,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&ListView { items, pagination })?,
        OutputFormat::Table => {
            println!(
                "{:>6} {:<32} {:<16} {:<9} {:<13} {:<13} {:>8}",
                "ID", "EMAIL", "PHONE", "STATUS", "AMC START", "AMC END", "CHARGERS"
            );
            for client in items {
                let chargers = client
                    .total_chargers
                    .or_else(|| client.chargers.as_ref().and_then(|list| u32::try_from(list.len()).ok()))
                    .map_or_else(|| "-".to_string(), |count| count.to_string());
                println!(
                    "{:>6} {:<32} {:<16} {:<9} {:<13} {:<13} {:>8}",
                    client.id,
                    client.email,
                    client.phone,
                    client.status.as_str(),
                    format_date(client.amc_start.as_deref()),
                    format_date(client.amc_end.as_deref()),
                    chargers
                );
            }
            print_page_footer(pagination);
        }
    }
    Ok(())
}

pub(crate) fn render_charger_list(
    items: &[Charger],
    pagination: Pagination,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&ListView { items, pagination })?,
        OutputFormat::Table => {
            println!(
                "{:>6} {:<16} {:<8} {:<9} {:<13} {:<13} CLIENT",
                "ID", "CHARGER", "TYPE", "STATUS", "AMC START", "AMC END"
            );
            for charger in items {
                println!(
                    "{:>6} {:<16} {:<8} {:<9} {:<13} {:<13} {}",
                    charger.id,
                    charger.charger_id,
                    charger.charger_type.as_deref().unwrap_or("-"),
                    charger.status.as_str(),
                    format_date(charger.amc_start.as_deref()),
                    format_date(charger.amc_end.as_deref()),
                    charger_owner(charger)
                );
            }
            print_page_footer(pagination);
        }
    }
    Ok(())
}

pub(crate) fn render_client(client: &Client, today: NaiveDate, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(client)?,
        OutputFormat::Table => print_client_fields(client, today),
    }
    Ok(())
}

pub(crate) fn render_client_overview(
    overview: &ClientOverview,
    today: NaiveDate,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(overview)?,
        OutputFormat::Table => {
            print_client_fields(&overview.client, today);
            println!("contract: {}", overview.period.as_str());
            let summary = overview.chargers;
            println!("chargers: {}", summary.total);
            println!("  active: {}", summary.active);
            println!("  expiring this month: {}", summary.expiring_this_month);
            println!("  added this month: {}", summary.added_this_month);
        }
    }
    Ok(())
}

pub(crate) fn render_charger(charger: &Charger, today: NaiveDate, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(charger)?,
        OutputFormat::Table => {
            println!("id: {}", charger.id);
            println!("charger: {}", charger.charger_id);
            if let Some(kind) = &charger.charger_type {
                println!("type: {kind}");
            }
            println!("status: {}", charger.status);
            print_period(charger.amc_start.as_deref(), charger.amc_end.as_deref(), today);
            println!("client: {}", charger_owner(charger));
            println!("added: {}", format_date(charger.created_at.as_deref()));
        }
    }
    Ok(())
}

pub(crate) fn render_dashboard(data: &DashboardData, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(data)?,
        OutputFormat::Table => {
            let stats = data.stats;
            println!("clients: {}", stats.total_clients);
            println!("chargers: {}", stats.total_chargers);
            println!("expiring chargers: {}", stats.expiring_chargers);
            println!("new chargers: {}", stats.new_chargers);
            if !data.expiring_clients.is_empty() {
                println!("expiring clients:");
                for client in &data.expiring_clients {
                    println!(
                        "  {:>6} {:<32} ends {}",
                        client.id,
                        client.email,
                        format_date(client.amc_end.as_deref())
                    );
                }
            }
            if !data.expiring_chargers.is_empty() {
                println!("expiring chargers:");
                for charger in &data.expiring_chargers {
                    println!(
                        "  {:>6} {:<16} ends {}",
                        charger.id,
                        charger.charger_id,
                        format_date(charger.amc_end.as_deref())
                    );
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn render_user(user: &CurrentUser, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(user)?,
        OutputFormat::Table => {
            println!("user: {}", user.display_name());
            if let Some(email) = &user.email {
                println!("email: {email}");
            }
            if let Some(role) = &user.role {
                println!("role: {role}");
            }
        }
    }
    Ok(())
}

pub(crate) fn print_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Success => eprintln!("ok: {}", notice.message),
        NoticeLevel::Error => eprintln!("failed: {}", notice.message),
    }
}

fn print_client_fields(client: &Client, today: NaiveDate) {
    println!("id: {}", client.id);
    println!("email: {}", client.email);
    println!("phone: {}", client.phone);
    if let Some(domain) = &client.domain {
        println!("domain: {domain}");
    }
    println!("status: {}", client.status);
    print_period(client.amc_start.as_deref(), client.amc_end.as_deref(), today);
    println!("amc hours: {}", client.amc_hours);
    println!("chargers covered: {}", client.chargers_for_amc);
    println!("increment: {}", client.increment_value);
    println!("added: {}", format_date(client.created_at.as_deref()));
}

fn print_period(start: Option<&str>, end: Option<&str>, today: NaiveDate) {
    println!("amc: {} to {}", format_date(start), format_date(end));
    if let Some(days) = days_remaining(end, today) {
        println!("days remaining: {}", describe_days(days));
    }
}

pub(crate) fn describe_days(days: i64) -> String {
    match days {
        0 => "ends today".to_string(),
        1 => "1 day".to_string(),
        n if n > 0 => format!("{n} days"),
        n => format!("ended {} days ago", n.unsigned_abs()),
    }
}

fn charger_owner(charger: &Charger) -> String {
    charger.client.as_ref().map_or_else(
        || "-".to_string(),
        |client| {
            client
                .name
                .clone()
                .or_else(|| client.email.clone())
                .unwrap_or_else(|| format!("#{}", client.id))
        },
    )
}

fn print_page_footer(pagination: Pagination) {
    println!(
        "page {}/{} ({} total)",
        pagination.current_page, pagination.total_pages, pagination.total_count
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_test_support::fixtures;

    #[test]
    fn days_are_described_relative_to_today() {
        assert_eq!(describe_days(0), "ends today");
        assert_eq!(describe_days(1), "1 day");
        assert_eq!(describe_days(12), "12 days");
        assert_eq!(describe_days(-3), "ended 3 days ago");
    }

    #[test]
    fn charger_owner_prefers_name() {
        let owned = fixtures::charger(1, "CH-1", Some(7));
        assert_eq!(charger_owner(&owned), "Client 7");
        let orphan = fixtures::charger(2, "CH-2", None);
        assert_eq!(charger_owner(&orphan), "-");
    }

    #[test]
    fn list_view_serializes_items_and_pagination() {
        let clients = [fixtures::client(1, "a@example.com")];
        let view = ListView {
            items: &clients,
            pagination: Pagination::first(10),
        };
        let value = serde_json::to_value(&view).expect("serialize");
        assert_eq!(value["items"][0]["email"], "a@example.com");
        assert_eq!(value["pagination"]["page_size"], 10);
    }
}
