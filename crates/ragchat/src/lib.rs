//! RAG Chatbot - retrieval-augmented answers from a local Ollama server
//!
//! Waits for the model server, makes sure the chat model is pulled, embeds a
//! small corpus into an in-memory vector index and answers questions with the
//! retrieved context. Ships as a one-shot script (`rag_pipeline`) and as an
//! HTTP service (`rag_server`).

pub mod config;
pub mod error;
pub mod ollama;
pub mod pipeline;
pub mod server;

pub use config::Settings;
pub use error::RagError;
