//! Wire types for the Ollama REST API

use serde::{Deserialize, Serialize};

/// Response from GET /api/tags
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagsResponse {
  #[serde(default)]
  pub models: Vec<RegistryModel>,
}

impl TagsResponse {
  pub fn names(&self) -> Vec<String> {
    self.models.iter().map(|m| m.name.clone()).collect()
  }
}

/// One model known to the server, e.g. `tinyllama:latest`
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryModel {
  pub name: String,
}

/// Body for POST /api/pull
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
  pub name: String,
  pub stream: bool,
}

/// One progress line from POST /api/pull
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullProgress {
  #[serde(default)]
  pub status: String,
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub completed: u64,
  #[serde(default)]
  pub error: Option<String>,
}

impl PullProgress {
  pub fn percent(&self) -> f64 {
    if self.total == 0 {
      0.0
    } else {
      (self.completed as f64 / self.total as f64) * 100.0
    }
  }

  pub fn is_success(&self) -> bool {
    self.status == "success"
  }
}

/// Body for POST /api/embeddings
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest<'a> {
  pub model: &'a str,
  pub prompt: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
  pub embedding: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
  pub role: String,
  pub content: String,
}

impl ChatMessage {
  pub fn user(content: impl Into<String>) -> Self {
    Self { role: "user".to_string(), content: content.into() }
  }
}

/// Body for POST /api/chat
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
  pub model: &'a str,
  pub messages: Vec<ChatMessage>,
  pub stream: bool,
}

/// Non-streaming response from POST /api/chat
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
  pub message: ChatMessage,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_tags_response_without_models_is_empty() {
    let tags: TagsResponse = serde_json::from_str("{}").unwrap();
    assert!(tags.names().is_empty());
  }

  #[test]
  fn test_tags_response_names() {
    let body = r#"{"models":[{"name":"tinyllama:latest","size":637700138},{"name":"other-model"}]}"#;
    let tags: TagsResponse = serde_json::from_str(body).unwrap();
    assert_eq!(tags.names(), vec!["tinyllama:latest", "other-model"]);
  }

  #[test]
  fn test_pull_progress_percent() {
    let progress: PullProgress =
      serde_json::from_str(r#"{"status":"pulling abc","total":200,"completed":50}"#).unwrap();
    assert_eq!(progress.percent(), 25.0);
    assert!(!progress.is_success());

    let done: PullProgress = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
    assert_eq!(done.percent(), 0.0);
    assert!(done.is_success());
  }

  #[test]
  fn test_chat_request_shape() {
    let request = ChatRequest {
      model: "tinyllama",
      messages: vec![ChatMessage::user("hi")],
      stream: false,
    };
    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(
      value,
      serde_json::json!({
        "model": "tinyllama",
        "messages": [{"role": "user", "content": "hi"}],
        "stream": false
      })
    );
  }
}
