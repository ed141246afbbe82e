//! `/clients` resource.

use std::sync::Arc;

use amc_api_models::{ApiEnvelope, Client, ClientList, ClientPayload, EntityId, ListQuery};
use serde_json::Value;

use crate::api::list_params;
use crate::error::ApiResult;
use crate::gateway::{ApiGateway, ApiRequest};

/// Client CRUD calls.
#[derive(Debug, Clone)]
pub struct ClientsApi {
    gateway: Arc<ApiGateway>,
}

impl ClientsApi {
    /// Service backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `GET /clients` for one page.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn list(&self, query: &ListQuery) -> ApiResult<ClientList> {
        let call = ApiRequest::get("/clients").query(list_params(query));
        let envelope: ApiEnvelope<ClientList> = self.gateway.send_json(&call).await?;
        Ok(envelope.data)
    }

    /// `GET /clients/:id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn get(&self, id: EntityId) -> ApiResult<Client> {
        let envelope: ApiEnvelope<Client> = self.gateway.get(&format!("/clients/{id}")).await?;
        Ok(envelope.data)
    }

    /// `POST /clients`; returns the stored client.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn create(&self, payload: &ClientPayload) -> ApiResult<Client> {
        let envelope: ApiEnvelope<Client> = self.gateway.post("/clients", payload).await?;
        Ok(envelope.data)
    }

    /// `PUT /clients/:id`; returns the stored client.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn update(&self, id: EntityId, payload: &ClientPayload) -> ApiResult<Client> {
        let envelope: ApiEnvelope<Client> = self
            .gateway
            .put(&format!("/clients/{id}"), payload)
            .await?;
        Ok(envelope.data)
    }

    /// `DELETE /clients/:id`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn delete(&self, id: EntityId) -> ApiResult<()> {
        let _: Value = self.gateway.delete(&format!("/clients/{id}")).await?;
        Ok(())
    }
}
