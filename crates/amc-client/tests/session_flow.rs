use std::time::Duration;

use amc_api_models::{AmcStatus, ListQuery};
use amc_client::routes::{RouteArea, RouteDecision, decide_route};
use amc_client::{AppContext, AuthStatus, ChargerForm, Credentials};
use amc_config::{ClientSettings, ListSettings};
use amc_telemetry::Metrics;
use amc_test_support::fixtures::{
    charger_json, charger_list_body, client_json, client_list_body, envelope, error_body,
    token_envelope,
};
use amc_test_support::http::{AUTHORIZATION, bearer};
use httpmock::MockServer;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;

fn context(server: &MockServer) -> anyhow::Result<AppContext> {
    let mut settings = ClientSettings::for_url(Url::parse(&server.base_url())?);
    settings.lists = ListSettings {
        page_size: 10,
        debounce: Duration::from_millis(20),
    };
    Ok(AppContext::new(&settings, None, Metrics::new()?)?)
}

#[tokio::test]
async fn login_token_is_reused_for_client_listing() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/auth/login");
        then.status(200).json_body(token_envelope("T1"));
    });
    server.mock(|when, then| {
        when.method(GET).path("/auth/me").header(AUTHORIZATION, bearer("T1"));
        then.status(200)
            .json_body(json!({"data": {"id": 1, "email": "admin@example.com"}}));
    });
    let clients = server.mock(|when, then| {
        when.method(GET)
            .path("/clients")
            .header(AUTHORIZATION, bearer("T1"))
            .query_param("page", "1")
            .query_param("status", "All");
        then.status(200).json_body(client_list_body(
            vec![client_json(1, "a@example.com", "ACTIVE")],
            1,
            1,
            1,
        ));
    });

    let ctx = context(&server)?;
    let auth = ctx.auth();
    auth.login(&Credentials {
        email: "admin@example.com".to_string(),
        password: "hunter2".to_string(),
    })
    .await?;
    let page = ctx.clients_api().list(&ListQuery::default()).await?;

    clients.assert();
    assert_eq!(page.clients.len(), 1);
    assert_eq!(
        decide_route(&auth.status(), RouteArea::Auth),
        RouteDecision::Redirect("/")
    );
    Ok(())
}

#[tokio::test]
async fn debounced_load_applies_first_of_three_pages() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let rows = (1..=10)
        .map(|id| client_json(id, &format!("c{id}@example.com"), "ACTIVE"))
        .collect();
    let list = server.mock(|when, then| {
        when.method(GET).path("/clients").query_param("limit", "10");
        then.status(200).json_body(client_list_body(rows, 1, 3, 25));
    });

    let ctx = context(&server)?;
    let controller = ctx.clients_list();
    let mut rx = controller.subscribe();
    controller.start();

    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|state| !state.is_loading && !state.items.is_empty()),
    )
    .await??
    .clone();

    list.assert();
    assert_eq!(state.items.len(), 10);
    assert_eq!(state.pagination.current_page, 1);
    assert_eq!(state.pagination.total_pages, 3);
    assert_eq!(state.pagination.total_count, 25);
    assert!(state.last_error.is_none());
    Ok(())
}

#[tokio::test]
async fn charger_status_change_patches_row_without_refetch() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let list = server.mock(|when, then| {
        when.method(GET).path("/chargers");
        then.status(200).json_body(charger_list_body(
            vec![
                charger_json(4, "CH-4", "ACTIVE", Some(1)),
                charger_json(5, "CH-5", "ACTIVE", Some(1)),
            ],
            1,
            1,
            2,
        ));
    });
    let update = server.mock(|when, then| {
        when.method(PUT)
            .path("/chargers/5")
            .json_body(json!({"status": "INACTIVE"}));
        then.status(200)
            .json_body(envelope(charger_json(5, "CH-5", "INACTIVE", None)));
    });

    let ctx = context(&server)?;
    let screen = ctx.chargers_screen(None);
    screen.list().refresh().await?;
    screen
        .update(
            5,
            &ChargerForm {
                status: Some(AmcStatus::Inactive),
                ..ChargerForm::default()
            },
        )
        .await?;

    list.assert_hits(1);
    update.assert();
    let state = screen.list().snapshot();
    let row = state
        .items
        .iter()
        .find(|charger| charger.id == 5)
        .ok_or_else(|| anyhow::anyhow!("row 5 missing"))?;
    assert_eq!(row.status, AmcStatus::Inactive);
    assert_eq!(row.client.as_ref().map(|client| client.id), Some(1));
    assert_eq!(state.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn failed_logout_still_routes_to_login() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(GET).path("/auth/logout");
        then.status(500).json_body(error_body("boom"));
    });

    let ctx = context(&server)?;
    let auth = ctx.auth();
    let result = auth.logout().await;

    assert!(result.is_err());
    assert!(!ctx.session().has_token());
    assert_eq!(auth.status(), AuthStatus::Unauthenticated { error: None });
    assert_eq!(
        decide_route(&auth.status(), RouteArea::Private),
        RouteDecision::Redirect("/auth/login")
    );
    assert_eq!(ctx.metrics().snapshot().session_authenticated, 0);
    Ok(())
}
