use amc_client::list::Pagination;
use amc_client::{AppContext, ClientForm};

use crate::cli::{ClientFormArgs, ClientShowArgs, ClientUpdateArgs, IdArgs, ListArgs, OutputFormat};
use crate::client::{CliError, CliResult};
use crate::commands::{drain_notices, today};
use crate::output::{render_client, render_client_list, render_client_overview};

pub(crate) async fn handle_client_list(
    ctx: &AppContext,
    args: ListArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let query = args.query(ctx.list_settings().page_size);
    let page = ctx.clients_api().list(&query).await?;
    let pagination = Pagination::from_dto(page.pagination, query.limit);
    render_client_list(&page.clients, pagination, output)
}

pub(crate) async fn handle_client_show(
    ctx: &AppContext,
    args: ClientShowArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let screen = ctx.clients_screen();
    let mut notices = ctx.notifier().subscribe();
    let today = today();
    let result = if args.overview {
        match screen.overview(args.id, today).await {
            Ok(overview) => render_client_overview(&overview, today, output),
            Err(err) => Err(err.into()),
        }
    } else {
        match screen.detail(args.id).await {
            Ok(client) => render_client(&client, today, output),
            Err(err) => Err(err.into()),
        }
    };
    if result.is_err() {
        drain_notices(&mut notices);
    }
    result
}

pub(crate) async fn handle_client_create(
    ctx: &AppContext,
    args: ClientFormArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let mut form = ClientForm::default();
    apply_form_args(&mut form, args);

    let screen = ctx.clients_screen();
    let mut notices = ctx.notifier().subscribe();
    let result = screen.save(None, &form).await;
    drain_notices(&mut notices);
    render_client(&result?, today(), output)
}

pub(crate) async fn handle_client_update(
    ctx: &AppContext,
    args: ClientUpdateArgs,
    output: OutputFormat,
) -> CliResult<()> {
    let screen = ctx.clients_screen();
    let mut notices = ctx.notifier().subscribe();
    let existing = match screen.detail(args.id).await {
        Ok(client) => client,
        Err(err) => {
            drain_notices(&mut notices);
            return Err(err.into());
        }
    };
    let mut form = ClientForm::from_client(&existing);
    apply_form_args(&mut form, args.form);

    let result = screen.save(Some(args.id), &form).await;
    drain_notices(&mut notices);
    render_client(&result?, today(), output)
}

pub(crate) async fn handle_client_delete(ctx: &AppContext, args: IdArgs) -> CliResult<()> {
    let screen = ctx.clients_screen();
    let mut notices = ctx.notifier().subscribe();
    let result = screen.delete(args.id).await;
    drain_notices(&mut notices);
    result.map_err(CliError::from)
}

/// Overlay the flags that were given onto `form`.
pub(crate) fn apply_form_args(form: &mut ClientForm, args: ClientFormArgs) {
    let ClientFormArgs {
        email,
        phone,
        amc_start,
        amc_end,
        status,
        domain,
        amc_hours,
        chargers_for_amc,
        increment_value,
    } = args;
    if let Some(email) = email {
        form.email = email;
    }
    if let Some(phone) = phone {
        form.phone = phone;
    }
    if let Some(amc_start) = amc_start {
        form.amc_start = amc_start;
    }
    if let Some(amc_end) = amc_end {
        form.amc_end = amc_end;
    }
    if let Some(status) = status {
        form.status = status;
    }
    if let Some(domain) = domain {
        form.domain = domain;
    }
    if let Some(hours) = amc_hours {
        form.amc_hours = hours;
    }
    if let Some(count) = chargers_for_amc {
        form.chargers_for_amc = count;
    }
    if let Some(value) = increment_value {
        form.increment_value = value;
    }
}
