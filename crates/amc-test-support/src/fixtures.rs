//! Wire-format JSON builders and typed entities for tests.
//!
//! The JSON builders mirror what the API actually returns, including the two
//! pagination spellings, so decoding is exercised on realistic payloads.

use amc_api_models::{Charger, Client, EntityId};
use serde_json::{Value, json};

/// Wrap `data` in the `{data, message}` envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "data": data, "message": "ok" })
}

/// Envelope carrying a bearer token, as returned by login and refresh.
#[must_use]
pub fn token_envelope(token: &str) -> Value {
    envelope(json!({ "token": token }))
}

/// Client row as returned by `GET /clients`.
#[must_use]
pub fn client_json(id: EntityId, email: &str, status: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "phone": "+15550100",
        "amc_start": "2025-01-01T00:00:00.000Z",
        "amc_end": "2025-12-31T00:00:00.000Z",
        "status": status,
        "token": format!("tok-{id}"),
        "domain": "example.com",
        "amc_hours": 12,
        "chargers_for_amc": 3,
        "increment_value": 1.5,
        "totalChargers": 3,
        "createdAt": "2024-12-01T10:00:00.000Z",
        "updatedAt": "2024-12-02T10:00:00.000Z"
    })
}

/// Charger row as returned by `GET /chargers`, optionally with its client.
#[must_use]
pub fn charger_json(id: EntityId, charger_id: &str, status: &str, client_id: Option<EntityId>) -> Value {
    let mut value = json!({
        "id": id,
        "charger_id": charger_id,
        "charger_type": "AC",
        "amc_start": "2025-01-01T00:00:00.000Z",
        "amc_end": "2025-12-31T00:00:00.000Z",
        "status": status,
        "createdAt": "2024-12-01T10:00:00.000Z",
        "updatedAt": "2024-12-02T10:00:00.000Z"
    });
    if let (Some(client_id), Some(object)) = (client_id, value.as_object_mut()) {
        object.insert(
            "client".to_string(),
            json!({
                "id": client_id,
                "name": format!("Client {client_id}"),
                "email": format!("client{client_id}@example.com"),
                "phone": "+15550199"
            }),
        );
    }
    value
}

/// `GET /clients` response body.
#[must_use]
pub fn client_list_body(clients: Vec<Value>, current_page: u32, total_pages: u32, total: u64) -> Value {
    envelope(json!({
        "clients": clients,
        "pagination": {
            "currentPage": current_page,
            "totalPages": total_pages,
            "totalClients": total,
            "limit": 10
        }
    }))
}

/// `GET /chargers` response body.
#[must_use]
pub fn charger_list_body(chargers: Vec<Value>, page: u32, total_pages: u32, total: u64) -> Value {
    envelope(json!({
        "chargers": chargers,
        "pagination": {
            "page": page,
            "totalPages": total_pages,
            "total": total
        }
    }))
}

/// Error body with a server message.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "message": message })
}

/// Typed client built from [`client_json`].
///
/// # Panics
///
/// Panics if the fixture no longer matches the client model.
#[must_use]
pub fn client(id: EntityId, email: &str) -> Client {
    serde_json::from_value(client_json(id, email, "ACTIVE")).expect("client fixture decodes")
}

/// Typed charger built from [`charger_json`].
///
/// # Panics
///
/// Panics if the fixture no longer matches the charger model.
#[must_use]
pub fn charger(id: EntityId, charger_id: &str, client_id: Option<EntityId>) -> Charger {
    serde_json::from_value(charger_json(id, charger_id, "ACTIVE", client_id))
        .expect("charger fixture decodes")
}
