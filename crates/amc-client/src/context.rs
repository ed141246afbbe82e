//! Application container wiring session, gateway and services together.
//!
//! # Design
//! - One `AppContext` per process, passed explicitly instead of global state.
//! - Controllers are built on demand; each gets its own list state but shares
//!   the session, gateway, metrics and notifier.

use std::sync::Arc;

use amc_api_models::{Charger, Client, EntityId};
use amc_config::{ClientSettings, ListSettings};
use amc_telemetry::Metrics;

use crate::api::{AuthApi, ChargersApi, ClientsApi, DashboardApi};
use crate::auth::AuthController;
use crate::error::ApiResult;
use crate::gateway::ApiGateway;
use crate::list::ListController;
use crate::notify::Notifier;
use crate::screens::{ChargersScreen, ClientsScreen};
use crate::session::SessionStore;

/// Shared handles for one operator session.
#[derive(Debug, Clone)]
pub struct AppContext {
    session: Arc<SessionStore>,
    gateway: Arc<ApiGateway>,
    lists: ListSettings,
    notifier: Notifier,
}

impl AppContext {
    /// Build the container, optionally seeding a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ApiError::ClientBuild`] when the HTTP client cannot
    /// be built.
    pub fn new(settings: &ClientSettings, token: Option<String>, metrics: Metrics) -> ApiResult<Self> {
        let session = Arc::new(token.map_or_else(SessionStore::new, SessionStore::with_token));
        let gateway = Arc::new(ApiGateway::new(settings, Arc::clone(&session), metrics)?);
        Ok(Self {
            session,
            gateway,
            lists: settings.lists,
            notifier: Notifier::new(),
        })
    }

    /// Current session.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Shared gateway.
    #[must_use]
    pub const fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    /// Metrics registry used by every component.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        self.gateway.metrics()
    }

    /// Notice fan-out.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// List settings applied to new controllers.
    #[must_use]
    pub const fn list_settings(&self) -> ListSettings {
        self.lists
    }

    /// Auth endpoints.
    #[must_use]
    pub fn auth_api(&self) -> AuthApi {
        AuthApi::new(Arc::clone(&self.gateway))
    }

    /// Client endpoints.
    #[must_use]
    pub fn clients_api(&self) -> ClientsApi {
        ClientsApi::new(Arc::clone(&self.gateway))
    }

    /// Charger endpoints.
    #[must_use]
    pub fn chargers_api(&self) -> ChargersApi {
        ChargersApi::new(Arc::clone(&self.gateway))
    }

    /// Dashboard endpoint.
    #[must_use]
    pub fn dashboard_api(&self) -> DashboardApi {
        DashboardApi::new(Arc::clone(&self.gateway))
    }

    /// Fresh auth state machine over the shared session.
    #[must_use]
    pub fn auth(&self) -> AuthController {
        AuthController::new(Arc::clone(&self.gateway))
    }

    /// Controller over `GET /clients`.
    #[must_use]
    pub fn clients_list(&self) -> ListController<Client> {
        ListController::new(
            Arc::new(self.clients_api()),
            self.lists,
            self.metrics().clone(),
        )
    }

    /// Controller over `GET /chargers`.
    #[must_use]
    pub fn chargers_list(&self) -> ListController<Charger> {
        ListController::new(
            Arc::new(self.chargers_api()),
            self.lists,
            self.metrics().clone(),
        )
    }

    /// Controller over `GET /chargers/client/{client_id}`.
    #[must_use]
    pub fn client_chargers_list(&self, client_id: EntityId) -> ListController<Charger> {
        ListController::new(
            Arc::new(self.chargers_api().for_client(client_id)),
            self.lists,
            self.metrics().clone(),
        )
    }

    /// Clients screen with its own list controller.
    #[must_use]
    pub fn clients_screen(&self) -> ClientsScreen {
        ClientsScreen::new(
            self.clients_list(),
            self.clients_api(),
            self.chargers_api(),
            self.notifier.clone(),
        )
    }

    /// Chargers screen, global or scoped to one client.
    #[must_use]
    pub fn chargers_screen(&self, client_id: Option<EntityId>) -> ChargersScreen {
        let list = client_id.map_or_else(
            || self.chargers_list(),
            |id| self.client_chargers_list(id),
        );
        ChargersScreen::new(list, self.chargers_api(), self.notifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_test_support::fixtures::{charger_list_body, envelope};
    use amc_test_support::http::{AUTHORIZATION, bearer};
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    fn context(server: &MockServer, token: Option<&str>) -> AppContext {
        let url = Url::parse(&server.base_url()).expect("url");
        AppContext::new(
            &ClientSettings::for_url(url),
            token.map(str::to_string),
            Metrics::new().expect("metrics"),
        )
        .expect("context")
    }

    #[tokio::test]
    async fn seeded_token_is_attached() {
        let server = MockServer::start_async().await;
        let dashboard = server.mock(|when, then| {
            when.method(GET)
                .path("/dashboard")
                .header(AUTHORIZATION, bearer("seed"));
            then.status(200).json_body(envelope(json!({
                "stats": {"totalClients": 2, "totalChargers": 5, "expiringChargers": 1, "newChargers": 0},
                "expiringClientsData": [],
                "expiringChargersData": []
            })));
        });

        let ctx = context(&server, Some("seed"));
        assert!(ctx.session().has_token());
        let data = ctx.dashboard_api().fetch().await.expect("dashboard");

        dashboard.assert();
        assert_eq!(data.stats.total_chargers, 5);
    }

    #[tokio::test]
    async fn client_scoped_controller_hits_client_route() {
        let server = MockServer::start_async().await;
        let scoped = server.mock(|when, then| {
            when.method(GET).path("/chargers/client/7");
            then.status(200)
                .json_body(charger_list_body(Vec::new(), 1, 1, 0));
        });

        let ctx = context(&server, None);
        let screen = ctx.chargers_screen(Some(7));
        screen.list().refresh().await.expect("refresh");

        scoped.assert();
        assert!(screen.list().snapshot().items.is_empty());
    }
}
