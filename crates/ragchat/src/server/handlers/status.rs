//! Health endpoint handler

use axum::response::Json;

use crate::server::types::HealthResponse;

/// GET /health - answers the same whether or not the pipeline initialized
pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse::ok())
}
