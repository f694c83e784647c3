//! Liveness endpoint

use axum::response::Json;
use chrono::{SecondsFormat, Utc};

use crate::server::types::HealthResponse;

/// GET /health - Always answers while the process is serving
pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse {
    status: "ok".to_string(),
    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
  })
}
