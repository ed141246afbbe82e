//! Typed services over the gateway, one per API resource.

pub mod auth;
pub mod chargers;
pub mod clients;
pub mod dashboard;

use amc_api_models::ListQuery;

pub use auth::AuthApi;
pub use chargers::{ChargersApi, ClientChargersApi};
pub use clients::ClientsApi;
pub use dashboard::DashboardApi;

/// Query string pairs shared by every list endpoint.
pub(crate) fn list_params(query: &ListQuery) -> [(&'static str, String); 4] {
    [
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        ("search", query.search.clone()),
        ("status", query.status.as_query().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use amc_api_models::{AmcStatus, StatusFilter};

    #[test]
    fn list_params_follow_wire_names() {
        let query = ListQuery {
            page: 3,
            limit: 25,
            search: "acme".to_string(),
            status: StatusFilter::Only(AmcStatus::Expired),
        };
        let params = list_params(&query);
        assert_eq!(params[0], ("page", "3".to_string()));
        assert_eq!(params[1], ("limit", "25".to_string()));
        assert_eq!(params[2], ("search", "acme".to_string()));
        assert_eq!(params[3], ("status", "EXPIRED".to_string()));
        assert_eq!(list_params(&ListQuery::default())[3].1, "All");
    }
}
