//! HTTP client for the Ollama model server
//!
//! Only the endpoints the pipeline needs are covered:
//! - GET  /             connectivity
//! - GET  /api/tags     model registry
//! - POST /api/pull     model download
//! - POST /api/embeddings
//! - POST /api/chat

pub mod client;
pub mod types;

pub use client::OllamaClient;
