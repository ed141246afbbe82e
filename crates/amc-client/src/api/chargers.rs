//! `/chargers` resource, globally and scoped to one client.

use std::sync::Arc;

use amc_api_models::{ApiEnvelope, Charger, ChargerList, ChargerUpdate, EntityId, ListQuery};

use crate::api::list_params;
use crate::error::ApiResult;
use crate::gateway::{ApiGateway, ApiRequest};

/// Charger read and update calls.
#[derive(Debug, Clone)]
pub struct ChargersApi {
    gateway: Arc<ApiGateway>,
}

impl ChargersApi {
    /// Service backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `GET /chargers` for one page.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<ChargerList> {
        fetch_list(&self.gateway, "/chargers", query).await
    }

    /// `GET /chargers/:id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn get(&self, id: EntityId) -> ApiResult<Charger> {
        let envelope: ApiEnvelope<Charger> = self.gateway.get(&format!("/chargers/{id}")).await?;
        Ok(envelope.data)
    }

    /// `PUT /chargers/:id`; returns the stored charger.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn update(&self, id: EntityId, update: &ChargerUpdate) -> ApiResult<Charger> {
        let envelope: ApiEnvelope<Charger> = self
            .gateway
            .put(&format!("/chargers/{id}"), update)
            .await?;
        Ok(envelope.data)
    }

    /// Scope list calls to the chargers of `client_id`.
    #[must_use]
    pub fn for_client(&self, client_id: EntityId) -> ClientChargersApi {
        ClientChargersApi {
            gateway: Arc::clone(&self.gateway),
            client_id,
        }
    }
}

/// `GET /chargers/client/:id` listing.
#[derive(Debug, Clone)]
pub struct ClientChargersApi {
    gateway: Arc<ApiGateway>,
    client_id: EntityId,
}

impl ClientChargersApi {
    /// Owning client.
    #[must_use]
    pub const fn client_id(&self) -> EntityId {
        self.client_id
    }

    /// One page of the client's chargers.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<ChargerList> {
        let path = format!("/chargers/client/{}", self.client_id);
        fetch_list(&self.gateway, &path, query).await
    }
}

async fn fetch_list(gateway: &ApiGateway, path: &str, query: &ListQuery) -> ApiResult<ChargerList> {
    let call = ApiRequest::get(path).query(list_params(query));
    let envelope: ApiEnvelope<ChargerList> = gateway.send_json(&call).await?;
    Ok(envelope.data)
}
