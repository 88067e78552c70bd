//! Gateway Error Taxonomy
//!
//! Every failure the gateway can surface to a caller lives here, together
//! with its HTTP status mapping. Handlers convert a `GatewayError` into a
//! `{"error": ...}` reply via [`GatewayError::reply`].

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("database query failed: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("ring has no registered nodes")]
    EmptyRing,

    /// The `chord` table names a successor that is not itself a node.
    #[error("node {node} points at unknown successor {successor}")]
    UnknownSuccessor { node: String, successor: String },

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("failed to launch {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("{program} exited with code {}: {stderr}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    ProgramFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("blocking task failed: {0}")]
    Blocking(String),
}

/// JSON body returned on every error reply.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl GatewayError {
    /// The HTTP status a variant maps onto.
    ///
    /// Validation failures are the caller's fault (400), an empty ring means
    /// there is no entry node to route through (503), program failures are
    /// upstream failures (502/504), everything else is internal (500).
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidKey(_) | GatewayError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            GatewayError::EmptyRing => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::Spawn { .. } | GatewayError::ProgramFailed { .. } => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Pool(_)
            | GatewayError::Db(_)
            | GatewayError::UnknownSuccessor { .. }
            | GatewayError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `(status, body)` pair handlers hand back to axum.
    pub fn reply(&self) -> (StatusCode, Json<ErrorBody>) {
        (
            self.status(),
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
    }
}
