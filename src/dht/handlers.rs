use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

use super::runner::DhtClient;
use super::types::{validate_key, validate_value, ValueResponse};
use crate::error::GatewayError;
use crate::ring::store::RingStore;
use crate::ring::types::NodeRecord;

/// GET /nodes/:key — look up a key through the ring's get program.
pub async fn handle_get_value(
    Extension(store): Extension<Arc<RingStore>>,
    Extension(dht): Extension<Arc<DhtClient>>,
    Path(key): Path<String>,
) -> Response {
    if let Err(e) = validate_key(&key) {
        return e.reply().into_response();
    }

    let entry = match entry_node(&store).await {
        Ok(entry) => entry,
        Err(e) => return e.reply().into_response(),
    };

    match dht.get(&entry.id, &key).await {
        Ok(value) => (StatusCode::OK, Json(ValueResponse { value })).into_response(),
        Err(e) => {
            tracing::error!("Get for key '{}' via {} failed: {}", key, entry.id, e);
            e.reply().into_response()
        }
    }
}

/// GET /nodes/:key/:value — store a pair through the ring's put program.
pub async fn handle_put_value(
    Extension(store): Extension<Arc<RingStore>>,
    Extension(dht): Extension<Arc<DhtClient>>,
    Path((key, value)): Path<(String, String)>,
) -> Response {
    if let Err(e) = validate_key(&key) {
        return e.reply().into_response();
    }
    if let Err(e) = validate_value(&value) {
        return e.reply().into_response();
    }

    let entry = match entry_node(&store).await {
        Ok(entry) => entry,
        Err(e) => return e.reply().into_response(),
    };

    match dht.put(&entry.id, &key, &value).await {
        Ok(value) => (StatusCode::OK, Json(ValueResponse { value })).into_response(),
        Err(e) => {
            tracing::error!("Put for key '{}' via {} failed: {}", key, entry.id, e);
            e.reply().into_response()
        }
    }
}

/// The first registered node is the ring's entry point for every operation.
async fn entry_node(store: &RingStore) -> Result<NodeRecord, GatewayError> {
    match store.first_node().await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => {
            tracing::warn!("Operation rejected: ring has no registered nodes");
            Err(GatewayError::EmptyRing)
        }
        Err(e) => {
            tracing::error!("Failed to select entry node: {}", e);
            Err(e)
        }
    }
}
