//! Long-lived pipeline behind the HTTP handlers
//!
//! Built once before the listener starts and shared read-only afterwards.
//! When startup fails the service still exists, just without a pipeline, so
//! the health endpoint keeps answering.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::RagError;
use crate::ollama::OllamaClient;
use crate::pipeline::answerer::Answerer;
use crate::pipeline::index::{Indexer, VectorIndex};
use crate::pipeline::prober::AvailabilityProber;
use crate::pipeline::provisioner::ModelProvisioner;
use crate::pipeline::retriever::Retriever;
use crate::pipeline::traits::{ChatModel, Embedder, ModelRegistry, Probe, PullMode};
use crate::pipeline::Stage;

/// Answer given for every question while the pipeline is not initialized
pub const NOT_INITIALIZED_ANSWER: &str = "Error: RAG system not initialized.";

/// Generated answer plus the context it was produced from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
  pub answer: String,
  pub context: String,
}

impl AnswerRecord {
  pub fn not_initialized() -> Self {
    Self { answer: NOT_INITIALIZED_ANSWER.to_string(), context: String::new() }
  }
}

struct ReadyPipeline {
  index: VectorIndex,
  embedder: Arc<dyn Embedder>,
  chat: Arc<dyn ChatModel>,
}

pub struct RagService {
  pipeline: Option<ReadyPipeline>,
}

impl RagService {
  pub fn uninitialized() -> Self {
    Self { pipeline: None }
  }

  pub fn ready(index: VectorIndex, embedder: Arc<dyn Embedder>, chat: Arc<dyn ChatModel>) -> Self {
    Self { pipeline: Some(ReadyPipeline { index, embedder, chat }) }
  }

  pub fn is_ready(&self) -> bool {
    self.pipeline.is_some()
  }

  pub fn document_count(&self) -> usize {
    self.pipeline.as_ref().map_or(0, |p| p.index.len())
  }

  /// Startup against the configured Ollama server. Never fails: errors are
  /// logged and leave the service uninitialized.
  pub async fn initialize(settings: &Settings) -> Self {
    let client = match OllamaClient::new(settings) {
      Ok(client) => Arc::new(client),
      Err(e) => {
        bentley::error!(&format!("Fatal error during initialization: {e}"));
        return Self::uninitialized();
      }
    };

    let embedder: Arc<dyn Embedder> = client.clone();
    let chat: Arc<dyn ChatModel> = client.clone();
    Self::initialize_with(settings, client.as_ref(), client.as_ref(), embedder, chat).await
  }

  pub async fn initialize_with(
    settings: &Settings,
    probe: &dyn Probe,
    registry: &dyn ModelRegistry,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
  ) -> Self {
    bentley::info!(&format!("RAG service: checking model ({})", settings.model));

    match Self::build_index(settings, probe, registry, embedder.as_ref()).await {
      Ok(index) => {
        bentley::success!("RAG pipeline ready");
        Self::ready(index, embedder, chat)
      }
      Err((stage, e)) => {
        bentley::error!(&format!("Fatal error during initialization ({stage}): {e}"));
        bentley::warn!("Serving without a RAG pipeline; questions get a fixed answer");
        Self::uninitialized()
      }
    }
  }

  async fn build_index(
    settings: &Settings,
    probe: &dyn Probe,
    registry: &dyn ModelRegistry,
    embedder: &dyn Embedder,
  ) -> Result<VectorIndex, (Stage, RagError)> {
    AvailabilityProber::from_settings(settings)
      .wait_for_service(probe)
      .await
      .map_err(|e| (Stage::WaitForService, e))?;

    ModelProvisioner::new(&settings.model, settings.model_match, PullMode::Blocking)
      .ensure_model(registry)
      .await
      .map_err(|e| (Stage::EnsureModel, e))?;

    bentley::info!("RAG service: initializing pipeline");
    Indexer::new(embedder).build(&settings.corpus).await.map_err(|e| (Stage::BuildIndex, e))
  }

  /// Retrieve then answer. `UninitializedState` when startup did not finish.
  pub async fn query(&self, question: &str) -> Result<AnswerRecord, RagError> {
    let pipeline = self.pipeline.as_ref().ok_or(RagError::UninitializedState)?;

    bentley::info!(&format!("Processing question: {question}"));
    let context = Retriever::new(&pipeline.index, pipeline.embedder.as_ref()).retrieve(question).await?;
    let answer = Answerer::new(pipeline.chat.as_ref()).answer(&context, question).await?;

    Ok(AnswerRecord { answer, context })
  }
}
