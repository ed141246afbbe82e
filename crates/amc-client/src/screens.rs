//! Screen-level glue: form submission, list patching and operator notices.
//!
//! # Design
//! - Forms are validated before any request; validation failures are returned
//!   for inline display and raise no notice.
//! - Successful writes go through the list controller so the visible page is
//!   patched in place.

use amc_api_models::{Charger, Client, EntityId, ListQuery};
use chrono::NaiveDate;

use crate::api::{ChargersApi, ClientsApi};
use crate::error::ApiResult;
use crate::list::ListController;
use crate::notify::Notifier;
use crate::overview::ClientOverview;
use crate::validate::{ChargerForm, ClientForm};

const OVERVIEW_CHARGER_LIMIT: u32 = 100;

/// Clients list and detail screen.
#[derive(Debug, Clone)]
pub struct ClientsScreen {
    list: ListController<Client>,
    clients: ClientsApi,
    chargers: ChargersApi,
    notifier: Notifier,
}

impl ClientsScreen {
    /// Screen over an existing list controller.
    #[must_use]
    pub const fn new(
        list: ListController<Client>,
        clients: ClientsApi,
        chargers: ChargersApi,
        notifier: Notifier,
    ) -> Self {
        Self {
            list,
            clients,
            chargers,
            notifier,
        }
    }

    /// The backing list controller.
    #[must_use]
    pub const fn list(&self) -> &ListController<Client> {
        &self.list
    }

    /// Submit the client form: create when `editing` is `None`, update otherwise.
    ///
    /// # Errors
    ///
    /// Returns validation errors without touching the network, or the write
    /// failure after publishing an error notice.
    pub async fn save(&self, editing: Option<EntityId>, form: &ClientForm) -> ApiResult<Client> {
        let payload = form.validate()?;
        let (result, success) = match editing {
            Some(id) => (
                self.list.update(id, self.clients.update(id, &payload)).await,
                "Client updated successfully!",
            ),
            None => (
                self.list.create(self.clients.create(&payload)).await,
                "Client created successfully!",
            ),
        };
        match &result {
            Ok(_) => self.notifier.success(success),
            Err(err) => self.notifier.error(err.message_or("Failed to save client")),
        }
        result
    }

    /// Delete a client and drop it from the list.
    ///
    /// # Errors
    ///
    /// Returns the delete failure after publishing an error notice.
    pub async fn delete(&self, id: EntityId) -> ApiResult<()> {
        let result = self.list.delete(id, self.clients.delete(id)).await;
        match &result {
            Ok(()) => self.notifier.success("Client deleted successfully"),
            Err(err) => self.notifier.error(err.message_or("Failed to delete client")),
        }
        result
    }

    /// Load one client.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure after publishing an error notice.
    pub async fn detail(&self, id: EntityId) -> ApiResult<Client> {
        self.clients
            .get(id)
            .await
            .inspect_err(|err| self.notifier.error(err.message_or("Failed to fetch client")))
    }

    /// Load a client with its chargers and derive the detail figures.
    ///
    /// # Errors
    ///
    /// Returns the first failing fetch after publishing an error notice.
    pub async fn overview(&self, id: EntityId, today: NaiveDate) -> ApiResult<ClientOverview> {
        let client = self.detail(id).await?;
        let query = ListQuery {
            limit: OVERVIEW_CHARGER_LIMIT,
            ..ListQuery::default()
        };
        let chargers = self
            .chargers
            .for_client(id)
            .list(&query)
            .await
            .inspect_err(|err| self.notifier.error(err.message_or("Failed to fetch chargers")))?;
        Ok(ClientOverview::build(client, &chargers.chargers, today))
    }
}

/// Chargers list screen, either global or scoped to one client.
#[derive(Debug, Clone)]
pub struct ChargersScreen {
    list: ListController<Charger>,
    chargers: ChargersApi,
    notifier: Notifier,
}

impl ChargersScreen {
    /// Screen over an existing list controller.
    #[must_use]
    pub const fn new(list: ListController<Charger>, chargers: ChargersApi, notifier: Notifier) -> Self {
        Self {
            list,
            chargers,
            notifier,
        }
    }

    /// The backing list controller.
    #[must_use]
    pub const fn list(&self) -> &ListController<Charger> {
        &self.list
    }

    /// Submit the charger edit form.
    ///
    /// # Errors
    ///
    /// Returns validation errors without touching the network, or the write
    /// failure after publishing an error notice.
    pub async fn update(&self, id: EntityId, form: &ChargerForm) -> ApiResult<Charger> {
        let update = form.validate()?;
        let result = self.list.update(id, self.chargers.update(id, &update)).await;
        match &result {
            Ok(_) => self.notifier.success("Charger updated successfully !"),
            Err(err) => self.notifier.error(err.message_or("Failed to update charger")),
        }
        result
    }

    /// Load one charger.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure after publishing an error notice.
    pub async fn detail(&self, id: EntityId) -> ApiResult<Charger> {
        self.chargers
            .get(id)
            .await
            .inspect_err(|err| self.notifier.error(err.message_or("Failed to fetch charger")))
    }
}
