//! Argument parsing and command dispatch.

use amc_api_models::{AmcStatus, EntityId, ListQuery, StatusFilter};
use amc_client::AppContext;
use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;
use uuid::Uuid;

use crate::client::{CliResult, build_context, install_logging, parse_url, resolve_settings};
use crate::commands::auth::{handle_login, handle_logout, handle_me};
use crate::commands::chargers::{handle_charger_list, handle_charger_show, handle_charger_update};
use crate::commands::clients::{
    handle_client_create, handle_client_delete, handle_client_list, handle_client_show,
    handle_client_update,
};
use crate::commands::dashboard::handle_dashboard;
use crate::commands::watch::{WatchTarget, handle_watch};

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();

    let result = dispatch(cli, &trace_id).await;

    match result {
        Ok(()) => {
            tracing::debug!(command = command_name, trace_id, "command finished");
            0
        }
        Err(err) => {
            let message = err.display_message();
            tracing::debug!(command = command_name, trace_id, error = %message, "command failed");
            eprintln!("error: {message}");
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let settings = resolve_settings(&cli)?;
    install_logging(&settings);
    tracing::debug!(trace_id, api_url = %settings.api_url, "resolved settings");
    let ctx = build_context(&settings, cli.token.clone())?;
    let output = cli.output;

    let result = execute(&ctx, cli.command, output).await;
    if cli.print_metrics {
        match ctx.metrics().render() {
            Ok(text) => eprint!("{text}"),
            Err(err) => eprintln!("warning: metrics unavailable: {err}"),
        }
    }
    result
}

async fn execute(ctx: &AppContext, command: Command, output: OutputFormat) -> CliResult<()> {
    match command {
        Command::Login(args) => handle_login(ctx, args, output).await,
        Command::Logout => handle_logout(ctx).await,
        Command::Me => handle_me(ctx, output).await,
        Command::Dashboard => handle_dashboard(ctx, output).await,
        Command::Clients(clients) => match clients {
            ClientsCommand::Ls(args) => handle_client_list(ctx, args, output).await,
            ClientsCommand::Show(args) => handle_client_show(ctx, args, output).await,
            ClientsCommand::Create(args) => handle_client_create(ctx, args, output).await,
            ClientsCommand::Update(args) => handle_client_update(ctx, args, output).await,
            ClientsCommand::Delete(args) => handle_client_delete(ctx, args).await,
            ClientsCommand::Watch(args) => handle_watch(ctx, WatchTarget::Clients, args, output).await,
        },
        Command::Chargers(chargers) => match chargers {
            ChargersCommand::Ls(args) => handle_charger_list(ctx, args, output).await,
            ChargersCommand::Show(args) => handle_charger_show(ctx, args, output).await,
            ChargersCommand::Update(args) => handle_charger_update(ctx, args, output).await,
            ChargersCommand::Watch(args) => {
                let target = WatchTarget::Chargers { client: args.client };
                handle_watch(ctx, target, args.watch, output).await
            }
        },
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Logout => "logout",
        Command::Me => "me",
        Command::Dashboard => "dashboard",
        Command::Clients(ClientsCommand::Ls(_)) => "clients_ls",
        Command::Clients(ClientsCommand::Show(_)) => "clients_show",
        Command::Clients(ClientsCommand::Create(_)) => "clients_create",
        Command::Clients(ClientsCommand::Update(_)) => "clients_update",
        Command::Clients(ClientsCommand::Delete(_)) => "clients_delete",
        Command::Clients(ClientsCommand::Watch(_)) => "clients_watch",
        Command::Chargers(ChargersCommand::Ls(_)) => "chargers_ls",
        Command::Chargers(ChargersCommand::Show(_)) => "chargers_show",
        Command::Chargers(ChargersCommand::Update(_)) => "chargers_update",
        Command::Chargers(ChargersCommand::Watch(_)) => "chargers_watch",
    }
}

#[derive(Parser)]
#[command(name = "amc", about = "Administrative CLI for the AMC console")]
pub(crate) struct Cli {
    #[arg(long, global = true, value_parser = parse_url, help = "API base URL (overrides AMC_API_URL)")]
    pub(crate) api_url: Option<Url>,
    #[arg(long, global = true, env = "AMC_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,
    #[arg(long, global = true, help = "Request timeout in seconds (overrides AMC_HTTP_TIMEOUT_SECS)")]
    pub(crate) timeout: Option<u64>,
    #[arg(long, global = true, help = "Rows per page (overrides AMC_PAGE_SIZE)")]
    pub(crate) page_size: Option<u32>,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(long, global = true, help = "Print client metrics to stderr on exit")]
    pub(crate) print_metrics: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Sign in and print the issued bearer token.
    Login(LoginArgs),
    /// Sign out and forget the token.
    Logout,
    /// Show the signed-in user.
    Me,
    /// Show dashboard statistics.
    Dashboard,
    #[command(subcommand)]
    Clients(ClientsCommand),
    #[command(subcommand)]
    Chargers(ChargersCommand),
}

#[derive(Subcommand)]
pub(crate) enum ClientsCommand {
    Ls(ListArgs),
    Show(ClientShowArgs),
    Create(ClientFormArgs),
    Update(ClientUpdateArgs),
    Delete(IdArgs),
    Watch(WatchArgs),
}

#[derive(Subcommand)]
pub(crate) enum ChargersCommand {
    Ls(ChargerListArgs),
    Show(IdArgs),
    Update(ChargerUpdateArgs),
    Watch(ChargerWatchArgs),
}

#[derive(Args)]
pub(crate) struct LoginArgs {
    #[arg(long, env = "AMC_EMAIL")]
    pub(crate) email: String,
    #[arg(long, env = "AMC_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Clone)]
pub(crate) struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long)]
    pub(crate) limit: Option<u32>,
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    #[arg(long, default_value = "all", value_parser = parse_status_filter)]
    pub(crate) status: StatusFilter,
}

impl ListArgs {
    pub(crate) fn query(&self, default_limit: u32) -> ListQuery {
        ListQuery {
            page: self.page.max(1),
            limit: self.limit.unwrap_or(default_limit).max(1),
            search: self.search.trim().to_string(),
            status: self.status,
        }
    }
}

#[derive(Args)]
pub(crate) struct ChargerListArgs {
    #[arg(long, help = "Only chargers belonging to this client")]
    pub(crate) client: Option<EntityId>,
    #[command(flatten)]
    pub(crate) list: ListArgs,
}

#[derive(Args)]
pub(crate) struct IdArgs {
    pub(crate) id: EntityId,
}

#[derive(Args)]
pub(crate) struct ClientShowArgs {
    pub(crate) id: EntityId,
    #[arg(long, help = "Include charger figures for the client")]
    pub(crate) overview: bool,
}

#[derive(Args, Default)]
pub(crate) struct ClientFormArgs {
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    #[arg(long, help = "Contract start, YYYY-MM-DD")]
    pub(crate) amc_start: Option<String>,
    #[arg(long, help = "Contract end, YYYY-MM-DD")]
    pub(crate) amc_end: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<AmcStatus>,
    #[arg(long)]
    pub(crate) domain: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) amc_hours: Option<i64>,
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) chargers_for_amc: Option<i64>,
    #[arg(long)]
    pub(crate) increment_value: Option<f64>,
}

#[derive(Args)]
pub(crate) struct ClientUpdateArgs {
    pub(crate) id: EntityId,
    #[command(flatten)]
    pub(crate) form: ClientFormArgs,
}

#[derive(Args)]
pub(crate) struct ChargerUpdateArgs {
    pub(crate) id: EntityId,
    #[arg(long, help = "Contract start, YYYY-MM-DD")]
    pub(crate) amc_start: Option<String>,
    #[arg(long, help = "Contract end, YYYY-MM-DD")]
    pub(crate) amc_end: Option<String>,
    #[arg(long, value_parser = parse_status)]
    pub(crate) status: Option<AmcStatus>,
}

#[derive(Args, Clone)]
pub(crate) struct WatchArgs {
    #[arg(long, default_value = "")]
    pub(crate) search: String,
    #[arg(long, default_value = "all", value_parser = parse_status_filter)]
    pub(crate) status: StatusFilter,
}

#[derive(Args)]
pub(crate) struct ChargerWatchArgs {
    #[arg(long, help = "Only chargers belonging to this client")]
    pub(crate) client: Option<EntityId>,
    #[command(flatten)]
    pub(crate) watch: WatchArgs,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) fn parse_status_filter(input: &str) -> Result<StatusFilter, String> {
    input.parse().map_err(|err| format!("{err}"))
}

pub(crate) fn parse_status(input: &str) -> Result<AmcStatus, String> {
    input.parse().map_err(|err| format!("{err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_args_build_queries() {
        let cli = Cli::try_parse_from([
            "amc", "clients", "ls", "--page", "2", "--search", " acme ", "--status", "expired",
        ])
        .expect("parse");
        let Command::Clients(ClientsCommand::Ls(args)) = cli.command else {
            panic!("unexpected command");
        };
        let query = args.query(10);
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 10);
        assert_eq!(query.search, "acme");
        assert_eq!(query.status, StatusFilter::Only(AmcStatus::Expired));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(Cli::try_parse_from(["amc", "chargers", "ls", "--status", "broken"]).is_err());
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "amc",
            "me",
            "--output",
            "json",
            "--api-url",
            "http://127.0.0.1:9000/api",
        ])
        .expect("parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(command_label(&cli.command), "me");
        assert_eq!(
            cli.api_url.map(|url| url.to_string()).as_deref(),
            Some("http://127.0.0.1:9000/api")
        );
    }
}
