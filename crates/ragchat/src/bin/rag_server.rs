//! RAG Chatbot REST Server
//!
//! Runs the pipeline startup once, then serves `/api/chat`, `/health` and the
//! static frontend. Startup failures leave the server up in degraded mode.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use ragchat::config::ModelServerArgs;
use ragchat::pipeline::RagService;
use ragchat::server::{startup::start_server, AppState};

#[derive(Parser)]
#[command(name = "rag_server")]
#[command(about = "RAG Chatbot REST API Server")]
#[command(version)]
struct Args {
  /// Server bind address
  #[arg(long, default_value = "0.0.0.0:8000")]
  bind: SocketAddr,

  /// Directory holding index.html and the other frontend assets
  #[arg(long, default_value = "frontend")]
  frontend_dir: PathBuf,

  #[command(flatten)]
  server: ModelServerArgs,

  /// Enable verbose logging
  #[arg(short, long)]
  verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if args.verbose {
      EnvFilter::new("debug,hyper=info,reqwest=info")
    } else {
      EnvFilter::new("ragchat=info,tower_http=info,warn")
    }
  });
  tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

  bentley::info!(&format!("Starting RAG Chatbot server v{}", env!("CARGO_PKG_VERSION")));

  let settings = args.server.into_settings();
  let service = RagService::initialize(&settings).await;
  let state = Arc::new(AppState::new(service));

  start_server(args.bind, state, &args.frontend_dir).await
}
