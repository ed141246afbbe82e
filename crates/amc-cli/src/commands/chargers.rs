use amc_client::list::Pagination;
use amc_client::{AppContext, ChargerForm};

use crate::cli::{ChargerListArgs, ChargerUpdateArgs, IdArgs, OutputFormat};
use crate::client::CliResult;
use crate::commands::{drain_notices, today};
use crate::output::{render_charger, render_charger_list};

pub(crate) async fn handle_charger_list(
    ctx: &AppContext,
    args: ChargerListArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let query = args.list.query(ctx.list_settings().page_size);
    let api = ctx.chargers_api();
    let page = match args.client {
        Some(client_id) => api.for_client(client_id).list(&query).await?,
        None => api.list(&query).await?,
    };
    let pagination = Pagination::from_dto(page.pagination, query.limit);
    render_charger_list(&page.chargers, pagination, output)
}

pub(crate) async fn handle_charger_show(
    ctx: &AppContext,
    args: IdArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let screen = ctx.chargers_screen(None);
    let mut notices = ctx.notifier().subscribe();
    match screen.detail(args.id).await {
        Ok(charger) => render_charger(&charger, today(), output),
        Err(err) => {
            drain_notices(&mut notices);
            Err(err.into())
        }
    }
}

pub(crate) async fn handle_charger_update(
    ctx: &AppContext,
    args: ChargerUpdateArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let form = ChargerForm {
        amc_start: args.amc_start.unwrap_or_default(),
        amc_end: args.amc_end.unwrap_or_default(),
        status: args.status,
    };
    let screen = ctx.chargers_screen(None);
    let mut notices = ctx.notifier().subscribe();
    let result = screen.update(args.id, &form).await;
    drain_notices(&mut notices);
    render_charger(&result?, today(), output)
}
