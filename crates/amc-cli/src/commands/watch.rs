//! Interactive list mode: filter changes typed on stdin drive a
//! [`ListController`], and each settled state is re-rendered.
//!
//! Commands, one per line: `search <text>`, `status <all|pending|active|
//! inactive|expired>`, `page <n>`, `next`, `prev`, `limit <n>`, `refresh`,
//! `delete <id>` (clients only), `help`, `quit`.

use amc_api_models::{Charger, Client, EntityId, StatusFilter};
use amc_client::list::{EntityListState, ListEntity, Pagination};
use amc_client::{AppContext, ClientsScreen, ListController};
use anyhow::anyhow;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{OutputFormat, WatchArgs};
use crate::client::{CliError, CliResult};
use crate::output::{print_notice, render_charger_list, render_client_list};

const HELP: &str = "commands: search <text> | status <all|pending|active|inactive|expired> | \
page <n> | next | prev | limit <n> | refresh | delete <id> | help | quit";

/// Which list to watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WatchTarget {
    Clients,
    Chargers { client: Option<EntityId> },
}

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WatchCommand {
    Search(String),
    Status(StatusFilter),
    Page(u32),
    Next,
    Prev,
    Limit(u32),
    Refresh,
    Delete(EntityId),
    Help,
    Quit,
}

type Renderer<T> = fn(&[T], Pagination, OutputFormat) -> CliResult<()>;

pub(crate) async fn handle_watch(
    ctx: &AppContext,
    target: WatchTarget,
    args: WatchArgs,
    output: OutputFormat,
) -> CliResult<()> {
    match target {
        WatchTarget::Clients => {
            let screen = ctx.clients_screen();
            let render: Renderer<Client> = render_client_list;
            watch_loop(ctx, screen.list(), Some(&screen), args, render, output).await
        }
        WatchTarget::Chargers { client } => {
            let screen = ctx.chargers_screen(client);
            let render: Renderer<Charger> = render_charger_list;
            watch_loop(ctx, screen.list(), None, args, render, output).await
        }
    }
}

async fn watch_loop<T: ListEntity>(
    ctx: &AppContext,
    list: &ListController<T>,
    deleter: Option<&ClientsScreen>,
    args: WatchArgs,
    render: Renderer<T>,
    output: OutputFormat,
) -> CliResult<()> {
    let mut states = list.subscribe();
    let mut notices = ctx.notifier().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    list.set_search(args.search);
    list.set_status(args.status);
    list.start();
    eprintln!("{HELP}");

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                show_state(&state, render, output)?;
            }
            notice = notices.recv() => {
                if let Ok(notice) = notice {
                    print_notice(&notice);
                }
            }
            line = lines.next_line() => {
                let line = line.map_err(|err| CliError::failure(anyhow!("failed to read stdin: {err}")))?;
                let Some(line) = line else {
                    break;
                };
                match parse_watch_command(&line) {
                    Ok(None) => {}
                    Ok(Some(WatchCommand::Quit)) => break,
                    Ok(Some(command)) => apply_command(list, deleter, command).await,
                    Err(message) => eprintln!("{message}"),
                }
            }
        }
    }
    list.cancel_pending();
    Ok(())
}

fn show_state<T: ListEntity>(
    state: &EntityListState<T>,
    render: Renderer<T>,
    output: OutputFormat,
) -> CliResult<()> {
    if state.is_loading {
        return Ok(());
    }
    render(&state.items, state.pagination, output)?;
    if let Some(error) = &state.last_error {
        eprintln!("failed: {error}");
    }
    Ok(())
}

async fn apply_command<T: ListEntity>(
    list: &ListController<T>,
    deleter: Option<&ClientsScreen>,
    command: WatchCommand,
) {
    let current = list.snapshot().pagination;
    match command {
        WatchCommand::Search(text) => list.set_search(text),
        WatchCommand::Status(filter) => list.set_status(filter),
        WatchCommand::Page(page) => list.set_page(page.clamp(1, current.total_pages)),
        WatchCommand::Next if current.current_page < current.total_pages => {
            list.set_page(current.current_page + 1);
        }
        WatchCommand::Prev if current.current_page > 1 => list.set_page(current.current_page - 1),
        WatchCommand::Next | WatchCommand::Prev => eprintln!("no more pages"),
        WatchCommand::Limit(limit) => list.set_page_size(limit),
        WatchCommand::Refresh => {
            if let Err(err) = list.refresh().await {
                tracing::debug!(error = %err, "manual refresh failed");
            }
        }
        WatchCommand::Delete(id) => match deleter {
            // The screen publishes the outcome as a notice.
            Some(screen) => {
                let _ = screen.delete(id).await;
            }
            None => eprintln!("delete is only available for clients"),
        },
        WatchCommand::Help => eprintln!("{HELP}"),
        WatchCommand::Quit => {}
    }
}

/// Parse one stdin line. Blank lines yield `None`.
pub(crate) fn parse_watch_command(line: &str) -> Result<Option<WatchCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => WatchCommand::Search(rest.to_string()),
        "status" => WatchCommand::Status(rest.parse().map_err(|err| format!("{err}"))?),
        "page" | "p" => WatchCommand::Page(parse_number(verb, rest)?),
        "next" | "n" => WatchCommand::Next,
        "prev" => WatchCommand::Prev,
        "limit" => WatchCommand::Limit(parse_number(verb, rest)?),
        "refresh" | "r" => WatchCommand::Refresh,
        "delete" | "rm" => WatchCommand::Delete(
            rest.parse()
                .map_err(|_| format!("delete expects an id, got '{rest}'"))?,
        ),
        "help" | "?" => WatchCommand::Help,
        "quit" | "q" | "exit" => WatchCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type help")),
    };
    Ok(Some(command))
}

fn parse_number(verb: &str, rest: &str) -> Result<u32, String> {
    match rest.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(format!("{verb} expects a positive number, got '{rest}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_api_models::AmcStatus;

    #[test]
    fn parses_filter_commands() {
        assert_eq!(
            parse_watch_command("search  acme corp "),
            Ok(Some(WatchCommand::Search("acme corp".to_string())))
        );
        assert_eq!(parse_watch_command("search"), Ok(Some(WatchCommand::Search(String::new()))));
        assert_eq!(
            parse_watch_command("status inactive"),
            Ok(Some(WatchCommand::Status(StatusFilter::Only(AmcStatus::Inactive))))
        );
        assert_eq!(
            parse_watch_command("STATUS all"),
            Ok(Some(WatchCommand::Status(StatusFilter::All)))
        );
        assert_eq!(parse_watch_command("p 3"), Ok(Some(WatchCommand::Page(3))));
        assert_eq!(parse_watch_command("limit 25"), Ok(Some(WatchCommand::Limit(25))));
    }

    #[test]
    fn parses_actions() {
        assert_eq!(parse_watch_command(""), Ok(None));
        assert_eq!(parse_watch_command("n"), Ok(Some(WatchCommand::Next)));
        assert_eq!(parse_watch_command("rm 42"), Ok(Some(WatchCommand::Delete(42))));
        assert_eq!(parse_watch_command("q"), Ok(Some(WatchCommand::Quit)));
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_watch_command("page 0").is_err());
        assert!(parse_watch_command("page two").is_err());
        assert!(parse_watch_command("delete x").is_err());
        assert!(parse_watch_command("status archived").is_err());
        assert!(parse_watch_command("dance").is_err());
    }
}
