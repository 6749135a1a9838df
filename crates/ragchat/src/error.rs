//! Error taxonomy for the pipeline stages

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
  #[error("Could not connect to the model server at {url} after {attempts} attempts")]
  ServiceUnavailable { url: String, attempts: u32 },

  #[error("Listing models failed with status {status}")]
  ProvisioningDegraded { status: u16 },

  #[error("Pulling model '{model}' failed: {message}")]
  PullFailed { model: String, message: String },

  #[error("Model server returned {status}: {body}")]
  Daemon { status: u16, body: String },

  #[error("Request to model server failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Malformed response from model server: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("RAG system not initialized")]
  UninitializedState,
}

impl RagError {
  pub fn pull_failed(model: impl Into<String>, message: impl Into<String>) -> Self {
    Self::PullFailed { model: model.into(), message: message.into() }
  }

  pub fn daemon(status: u16, body: impl Into<String>) -> Self {
    Self::Daemon { status, body: body.into() }
  }

  /// Text handed back to HTTP clients as the `detail` field
  pub fn detail(&self) -> String {
    self.to_string()
  }
}
