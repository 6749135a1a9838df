//! Seams between the pipeline stages and the model server
//!
//! `OllamaClient` implements all of these; tests swap in doubles.

use async_trait::async_trait;

use crate::error::RagError;

/// How a model download is awaited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullMode {
  /// Consume the progress stream line by line until it ends
  Streaming,
  /// Single request that returns once the server is done
  Blocking,
}

/// Connectivity check against the model server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Probe: Send + Sync {
  /// Succeeds when the server answered at all, whatever the status code
  async fn probe(&self) -> Result<(), RagError>;

  /// Where the probe points, for log lines
  fn target(&self) -> String;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelRegistry: Send + Sync {
  /// Names of the models the server already has
  async fn list_models(&self) -> Result<Vec<String>, RagError>;

  async fn pull(&self, model: &str, mode: PullMode) -> Result<(), RagError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Embedder: Send + Sync {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatModel: Send + Sync {
  /// Send one user prompt and return the generated text
  async fn complete(&self, prompt: &str) -> Result<String, RagError>;
}
