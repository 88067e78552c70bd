use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use std::sync::Arc;

use super::store::RingStore;
use super::types::{GraphResponse, HealthResponse};

/// GET /nodes — the ring topology as a nodes + links graph.
pub async fn handle_nodes(Extension(store): Extension<Arc<RingStore>>) -> Response {
    let records = match store.list_nodes().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Failed to read ring topology: {}", e);
            return e.reply().into_response();
        }
    };

    match GraphResponse::from_records(&records) {
        Ok(graph) => (StatusCode::OK, Json(graph)).into_response(),
        Err(e) => {
            tracing::error!("Ring topology is inconsistent: {}", e);
            e.reply().into_response()
        }
    }
}

/// GET /health — liveness plus the current ring size.
pub async fn handle_health(Extension(store): Extension<Arc<RingStore>>) -> Response {
    match store.node_count().await {
        Ok(nodes) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                nodes,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Health probe failed to reach the database: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    nodes: 0,
                }),
            )
                .into_response()
        }
    }
}
