//! HTTP surface of the chatbot
//!
//! `GET /health`, `POST /api/chat` and the static frontend for everything else.

pub mod handlers;
pub mod middleware;
pub mod routing;
pub mod startup;
pub mod types;

use crate::pipeline::RagService;

/// State shared by every handler, built once before the listener starts
pub struct AppState {
  pub service: RagService,
}

impl AppState {
  pub fn new(service: RagService) -> Self {
    Self { service }
  }
}
