//! `/dashboard` summary.

use std::sync::Arc;

use amc_api_models::{ApiEnvelope, DashboardData};

use crate::error::ApiResult;
use crate::gateway::ApiGateway;

/// Dashboard statistics call. Aggregation happens server-side.
#[derive(Debug, Clone)]
pub struct DashboardApi {
    gateway: Arc<ApiGateway>,
}

impl DashboardApi {
    /// Service backed by `gateway`.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// `GET /dashboard`.
    ///
    /// # Errors
    ///
    /// Propagates gateway errors.
    pub async fn fetch(&self) -> ApiResult<DashboardData> {
        let envelope: ApiEnvelope<DashboardData> = self.gateway.get("/dashboard").await?;
        Ok(envelope.data)
    }
}
