//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};

use crate::server::handlers::{chat, status};
use crate::server::middleware::request_context_middleware;
use crate::server::AppState;

/// API routes first; any other path is served from `frontend_dir`, falling
/// back to its `index.html`
pub fn create_router(state: Arc<AppState>, frontend_dir: &Path) -> Router {
  let static_files =
    ServeDir::new(frontend_dir).fallback(ServeFile::new(frontend_dir.join("index.html")));

  Router::new()
    .route("/health", get(status::health))
    .route("/api/chat", post(chat::chat))
    .fallback_service(static_files)
    .layer(middleware::from_fn(request_context_middleware))
    .with_state(state)
}
