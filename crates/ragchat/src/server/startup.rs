//! REST server startup and configuration

use anyhow::Result;
use axum::serve;
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::server::routing::create_router;
use crate::server::AppState;

/// Bind and serve until ctrl-c or SIGTERM
#[cfg(not(tarpaulin_include))] // Skip coverage - socket binding and server lifecycle
pub async fn start_server(addr: SocketAddr, state: Arc<AppState>, frontend_dir: &Path) -> Result<()> {
  if !frontend_dir.join("index.html").exists() {
    bentley::warn!(&format!("No index.html in {}; the frontend will 404", frontend_dir.display()));
  }

  let app = create_router(state, frontend_dir)
    .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()));

  let listener = TcpListener::bind(addr).await?;
  bentley::info!(&format!("Server listening on {addr}"));

  match serve(listener, app).with_graceful_shutdown(shutdown_signal()).await {
    Ok(()) => {
      bentley::info!("Server shutdown gracefully");
      Ok(())
    }
    Err(e) => {
      bentley::error!(&format!("Server error: {e}"));
      Err(anyhow::anyhow!("Server error: {}", e))
    }
  }
}

#[cfg(not(tarpaulin_include))] // Skip coverage - OS signal handling
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      bentley::warn!(&format!("Could not listen for ctrl-c: {e}"));
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(e) => {
        bentley::warn!(&format!("Could not listen for SIGTERM: {e}"));
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => {},
    _ = terminate => {},
  }
}
