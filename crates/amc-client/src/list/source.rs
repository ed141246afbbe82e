//! Where list pages come from.

use amc_api_models::{Charger, Client, ListQuery};
use async_trait::async_trait;

use crate::api::{ChargersApi, ClientChargersApi, ClientsApi};
use crate::error::ApiResult;
use crate::list::state::Page;

/// Fetches one page of `T` for a query.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    /// Fetch the page described by `query`.
    async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<T>>;
}

#[async_trait]
impl ListSource<Client> for ClientsApi {
    async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<Client>> {
        let list = self.list(query).await?;
        Ok(Page {
            items: list.clients,
            pagination: list.pagination,
        })
    }
}

#[async_trait]
impl ListSource<Charger> for ChargersApi {
    async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<Charger>> {
        let list = self.list(query).await?;
        Ok(Page {
            items: list.chargers,
            pagination: list.pagination,
        })
    }
}

#[async_trait]
impl ListSource<Charger> for ClientChargersApi {
    async fn fetch_page(&self, query: &ListQuery) -> ApiResult<Page<Charger>> {
        let list = self.list(query).await?;
        Ok(Page {
            items: list.chargers,
            pagination: list.pagination,
        })
    }
}
