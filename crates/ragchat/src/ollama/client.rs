use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};

use crate::config::Settings;
use crate::error::RagError;
use crate::ollama::types::{
  ChatMessage, ChatRequest, ChatResponse, EmbeddingRequest, EmbeddingResponse, PullProgress,
  PullRequest, TagsResponse,
};
use crate::pipeline::traits::{ChatModel, Embedder, ModelRegistry, Probe, PullMode};

/// Client bound to one server and one model
#[derive(Debug, Clone)]
pub struct OllamaClient {
  client: Client,
  base_url: String,
  model: String,
}

/// What a finished pull reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
  pub model: String,
  pub final_status: Option<String>,
  pub succeeded: bool,
}

impl OllamaClient {
  pub fn new(settings: &Settings) -> Result<Self, RagError> {
    let mut builder = Client::builder();
    if let Some(timeout) = settings.request_timeout {
      builder = builder.timeout(timeout);
    }

    Ok(Self {
      client: builder.build()?,
      base_url: settings.ollama_base_url.clone(),
      model: settings.model.clone(),
    })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// Plain GET on the base URL. Any HTTP response means the server is up.
  pub async fn ping(&self) -> Result<(), RagError> {
    tracing::debug!(url = %self.base_url, "probing model server");
    self.client.get(&self.base_url).send().await?;
    Ok(())
  }

  /// Names from GET /api/tags. A non-200 status comes back as `ProvisioningDegraded`.
  pub async fn list_models(&self) -> Result<Vec<String>, RagError> {
    let response = self.client.get(self.url("/api/tags")).send().await?;

    let status = response.status();
    if status != StatusCode::OK {
      return Err(RagError::ProvisioningDegraded { status: status.as_u16() });
    }

    let body = response.text().await?;
    let tags: TagsResponse = serde_json::from_str(&body)?;
    Ok(tags.names())
  }

  /// Pull with `stream: true` and read progress lines until the server closes the stream
  pub async fn pull_streaming(&self, model: &str) -> Result<PullSummary, RagError> {
    let request = PullRequest { name: model.to_string(), stream: true };
    let response = self.client.post(self.url("/api/pull")).json(&request).send().await?;
    let response = ensure_success(response).await?;

    let mut tracker = PullTracker::new(model);
    let mut buffer: Vec<u8> = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
      buffer.extend_from_slice(&chunk?);
      while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
        let line: Vec<u8> = buffer.drain(..=pos).collect();
        tracker.observe(String::from_utf8_lossy(&line).trim())?;
      }
    }
    tracker.observe(String::from_utf8_lossy(&buffer).trim())?;

    Ok(tracker.finish())
  }

  /// Pull with `stream: false`; the server answers once the download is done
  pub async fn pull_blocking(&self, model: &str) -> Result<PullSummary, RagError> {
    let request = PullRequest { name: model.to_string(), stream: false };
    let response = self.client.post(self.url("/api/pull")).json(&request).send().await?;
    let body = ensure_success(response).await?.text().await?;

    let mut tracker = PullTracker::new(model);
    tracker.observe(body.trim())?;
    Ok(tracker.finish())
  }

  pub async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
    tracing::debug!(model = %self.model, chars = text.len(), "requesting embedding");
    let request = EmbeddingRequest { model: &self.model, prompt: text };
    let response = self.client.post(self.url("/api/embeddings")).json(&request).send().await?;
    let body = ensure_success(response).await?.text().await?;

    let parsed: EmbeddingResponse = serde_json::from_str(&body)?;
    Ok(parsed.embedding.into_iter().map(|x| x as f32).collect())
  }

  pub async fn chat(&self, prompt: &str) -> Result<String, RagError> {
    tracing::debug!(model = %self.model, chars = prompt.len(), "requesting chat completion");
    let request =
      ChatRequest { model: &self.model, messages: vec![ChatMessage::user(prompt)], stream: false };
    let response = self.client.post(self.url("/api/chat")).json(&request).send().await?;
    let body = ensure_success(response).await?.text().await?;

    let parsed: ChatResponse = serde_json::from_str(&body)?;
    Ok(parsed.message.content)
  }
}

async fn ensure_success(response: Response) -> Result<Response, RagError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let body = response.text().await.unwrap_or_default();
  Err(RagError::daemon(status.as_u16(), body))
}

/// Follows pull progress lines and fails on the first reported error
#[derive(Debug)]
struct PullTracker {
  model: String,
  last_status: Option<String>,
  succeeded: bool,
}

impl PullTracker {
  fn new(model: &str) -> Self {
    Self { model: model.to_string(), last_status: None, succeeded: false }
  }

  fn observe(&mut self, line: &str) -> Result<(), RagError> {
    if line.is_empty() {
      return Ok(());
    }

    let progress: PullProgress = match serde_json::from_str(line) {
      Ok(progress) => progress,
      Err(_) => {
        bentley::verbose!(&format!("Skipping unreadable pull progress line: {line}"));
        return Ok(());
      }
    };

    if let Some(message) = progress.error {
      return Err(RagError::pull_failed(&self.model, message));
    }

    if progress.is_success() {
      self.succeeded = true;
    }

    if self.last_status.as_deref() != Some(progress.status.as_str()) {
      if progress.total > 0 {
        bentley::info!(&format!("{} ({:.0}%)", progress.status, progress.percent()));
      } else {
        bentley::info!(&progress.status);
      }
      self.last_status = Some(progress.status);
    }

    Ok(())
  }

  fn finish(self) -> PullSummary {
    PullSummary { model: self.model, final_status: self.last_status, succeeded: self.succeeded }
  }
}

#[async_trait]
impl Probe for OllamaClient {
  async fn probe(&self) -> Result<(), RagError> {
    self.ping().await
  }

  fn target(&self) -> String {
    self.base_url.clone()
  }
}

#[async_trait]
impl ModelRegistry for OllamaClient {
  async fn list_models(&self) -> Result<Vec<String>, RagError> {
    OllamaClient::list_models(self).await
  }

  async fn pull(&self, model: &str, mode: PullMode) -> Result<(), RagError> {
    let summary = match mode {
      PullMode::Streaming => self.pull_streaming(model).await?,
      PullMode::Blocking => self.pull_blocking(model).await?,
    };

    if !summary.succeeded {
      bentley::warn!(&format!(
        "Pull of '{}' ended without a success status (last status: {})",
        summary.model,
        summary.final_status.as_deref().unwrap_or("none")
      ));
    }
    Ok(())
  }
}

#[async_trait]
impl Embedder for OllamaClient {
  async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
    OllamaClient::embed(self, text).await
  }
}

#[async_trait]
impl ChatModel for OllamaClient {
  async fn complete(&self, prompt: &str) -> Result<String, RagError> {
    self.chat(prompt).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::{Matcher, Server};
  use serde_json::json;

  fn client_for(url: &str) -> OllamaClient {
    OllamaClient::new(&Settings::default().with_base_url(url)).unwrap()
  }

  #[tokio::test]
  async fn test_ping_accepts_any_http_status() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/").with_status(503).create_async().await;

    let client = client_for(&server.url());
    assert!(client.ping().await.is_ok());
  }

  #[tokio::test]
  async fn test_ping_fails_without_a_listener() {
    let client = client_for("http://127.0.0.1:1");
    match client.ping().await {
      Err(RagError::Transport(_)) => {}
      other => panic!("Expected Transport error, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_list_models_success() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("GET", "/api/tags")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"{"models":[{"name":"tinyllama:latest"},{"name":"other-model"}]}"#)
      .create_async()
      .await;

    let client = client_for(&server.url());
    let names = client.list_models().await.unwrap();
    assert_eq!(names, vec!["tinyllama:latest", "other-model"]);
  }

  #[tokio::test]
  async fn test_list_models_non_200_is_degraded() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("GET", "/api/tags").with_status(500).create_async().await;

    let client = client_for(&server.url());
    match client.list_models().await {
      Err(RagError::ProvisioningDegraded { status }) => assert_eq!(status, 500),
      other => panic!("Expected ProvisioningDegraded, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_pull_streaming_consumes_progress_to_the_end() {
    let mut server = Server::new_async().await;
    let body = concat!(
      "{\"status\":\"pulling manifest\"}\n",
      "{\"status\":\"pulling 2af3b81862c6\",\"total\":100,\"completed\":40}\n",
      "{\"status\":\"pulling 2af3b81862c6\",\"total\":100,\"completed\":100}\n",
      "{\"status\":\"verifying sha256 digest\"}\n",
      "{\"status\":\"success\"}\n"
    );
    let mock = server
      .mock("POST", "/api/pull")
      .match_body(Matcher::Json(json!({"name": "tinyllama", "stream": true})))
      .with_status(200)
      .with_body(body)
      .create_async()
      .await;

    let client = client_for(&server.url());
    let summary = client.pull_streaming("tinyllama").await.unwrap();

    mock.assert_async().await;
    assert!(summary.succeeded);
    assert_eq!(summary.final_status.as_deref(), Some("success"));
  }

  #[tokio::test]
  async fn test_pull_streaming_fails_on_error_line() {
    let mut server = Server::new_async().await;
    let body = "{\"status\":\"pulling manifest\"}\n{\"error\":\"pull model manifest: file does not exist\"}\n";
    let _mock = server.mock("POST", "/api/pull").with_status(200).with_body(body).create_async().await;

    let client = client_for(&server.url());
    match client.pull_streaming("tinyllama").await {
      Err(RagError::PullFailed { model, message }) => {
        assert_eq!(model, "tinyllama");
        assert!(message.contains("file does not exist"));
      }
      other => panic!("Expected PullFailed, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_pull_streaming_without_success_is_not_an_error() {
    let mut server = Server::new_async().await;
    let body = "{\"status\":\"pulling manifest\"}\nnot json at all";
    let _mock = server.mock("POST", "/api/pull").with_status(200).with_body(body).create_async().await;

    let client = client_for(&server.url());
    let summary = client.pull_streaming("tinyllama").await.unwrap();
    assert!(!summary.succeeded);
    assert_eq!(summary.final_status.as_deref(), Some("pulling manifest"));
  }

  #[tokio::test]
  async fn test_pull_blocking_sends_stream_false() {
    let mut server = Server::new_async().await;
    let mock = server
      .mock("POST", "/api/pull")
      .match_body(Matcher::Json(json!({"name": "tinyllama", "stream": false})))
      .with_status(200)
      .with_body(r#"{"status":"success"}"#)
      .create_async()
      .await;

    let client = client_for(&server.url());
    let summary = client.pull_blocking("tinyllama").await.unwrap();

    mock.assert_async().await;
    assert!(summary.succeeded);
  }

  #[tokio::test]
  async fn test_pull_blocking_http_error() {
    let mut server = Server::new_async().await;
    let _mock = server.mock("POST", "/api/pull").with_status(500).with_body("boom").create_async().await;

    let client = client_for(&server.url());
    match client.pull_blocking("tinyllama").await {
      Err(RagError::Daemon { status, body }) => {
        assert_eq!(status, 500);
        assert_eq!(body, "boom");
      }
      other => panic!("Expected Daemon error, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_pull_blocking_fails_on_error_field() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/api/pull")
      .with_status(200)
      .with_body(r#"{"error":"pull model manifest: file does not exist"}"#)
      .create_async()
      .await;

    let client = client_for(&server.url());
    match client.pull_blocking("tinyllama").await {
      Err(RagError::PullFailed { model, message }) => {
        assert_eq!(model, "tinyllama");
        assert_eq!(message, "pull model manifest: file does not exist");
      }
      other => panic!("Expected PullFailed, got: {other:?}"),
    }
  }

  #[tokio::test]
  async fn test_request_timeout_reaches_http_client() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let silent = tokio::spawn(async move {
      let mut held = Vec::new();
      loop {
        match listener.accept().await {
          Ok((socket, _)) => held.push(socket),
          Err(_) => break,
        }
      }
    });

    let settings = Settings::default()
      .with_base_url(format!("http://{addr}"))
      .with_timeout(Some(std::time::Duration::from_millis(200)));
    let client = OllamaClient::new(&settings).unwrap();

    match client.ping().await {
      Err(RagError::Transport(e)) => assert!(e.is_timeout(), "Expected a timeout, got: {e}"),
      other => panic!("Expected Transport timeout, got: {other:?}"),
    }
    silent.abort();
  }

  #[tokio::test]
  async fn test_embed_converts_to_f32() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/api/embeddings")
      .match_body(Matcher::Json(json!({"model": "tinyllama", "prompt": "hello"})))
      .with_status(200)
      .with_body(r#"{"embedding":[0.5,-1.0,2.25]}"#)
      .create_async()
      .await;

    let client = client_for(&server.url());
    let embedding = client.embed("hello").await.unwrap();
    assert_eq!(embedding, vec![0.5f32, -1.0, 2.25]);
  }

  #[tokio::test]
  async fn test_chat_returns_message_content() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/api/chat")
      .match_body(Matcher::PartialJson(json!({
        "model": "tinyllama",
        "stream": false,
        "messages": [{"role": "user", "content": "Say hi"}]
      })))
      .with_status(200)
      .with_body(r#"{"model":"tinyllama","message":{"role":"assistant","content":"hi"},"done":true}"#)
      .create_async()
      .await;

    let client = client_for(&server.url());
    assert_eq!(client.chat("Say hi").await.unwrap(), "hi");
  }

  #[tokio::test]
  async fn test_chat_model_missing_is_daemon_error() {
    let mut server = Server::new_async().await;
    let _mock = server
      .mock("POST", "/api/chat")
      .with_status(404)
      .with_body(r#"{"error":"model 'tinyllama' not found"}"#)
      .create_async()
      .await;

    let client = client_for(&server.url());
    let err = client.chat("Say hi").await.unwrap_err();
    assert!(matches!(err, RagError::Daemon { status: 404, .. }));
    assert!(err.to_string().contains("not found"));
  }
}
