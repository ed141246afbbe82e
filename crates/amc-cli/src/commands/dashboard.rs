use amc_client::AppContext;

use crate::cli::OutputFormat;
use crate::client::CliResult;
use crate::output::render_dashboard;

pub(crate) async fn handle_dashboard(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let data = ctx.dashboard_api().fetch().await?;
    render_dashboard(&data, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_config::ClientSettings;
    use amc_telemetry::Metrics;
    use amc_test_support::fixtures::{client_json, envelope};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn dashboard_renders_both_formats() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/dashboard");
            then.status(200).json_body(envelope(json!({
                "stats": {"totalClients": 4, "totalChargers": 9, "expiringChargers": 2, "newChargers": 1},
                "expiringClientsData": [client_json(1, "a@example.com", "ACTIVE")],
                "expiringChargersData": []
            })));
        });
        let settings = ClientSettings::for_url(server.base_url().parse().expect("valid URL"));
        let ctx = AppContext::new(&settings, Some("T1".to_string()), Metrics::new().expect("metrics"))
            .expect("context");

        handle_dashboard(&ctx, OutputFormat::Table).await.expect("table");
        handle_dashboard(&ctx, OutputFormat::Json).await.expect("json");

        mock.assert_calls(2);
    }
}
