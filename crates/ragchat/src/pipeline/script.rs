//! One-shot run of the whole pipeline, printing each stage as it goes

use crate::config::Settings;
use crate::error::RagError;
use crate::ollama::OllamaClient;
use crate::pipeline::answerer::Answerer;
use crate::pipeline::index::Indexer;
use crate::pipeline::prober::AvailabilityProber;
use crate::pipeline::provisioner::{ModelProvisioner, ProvisionOutcome};
use crate::pipeline::retriever::Retriever;
use crate::pipeline::traits::{ChatModel, Embedder, ModelRegistry, Probe, PullMode};
use crate::pipeline::Stage;

#[derive(Debug, Clone)]
pub struct ScriptOptions {
  pub question: String,
  pub self_evaluate: bool,
}

/// Everything the run produced, in stage order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptReport {
  pub attempts: u32,
  pub provisioning: ProvisionOutcome,
  pub question: String,
  pub context: String,
  pub answer: String,
  pub evaluation: Option<String>,
}

/// Run against the configured Ollama server
pub async fn run_script(settings: &Settings, options: &ScriptOptions) -> Result<ScriptReport, RagError> {
  let client = OllamaClient::new(settings)?;
  run_script_with(settings, options, &client, &client, &client, &client).await
}

/// Start -> WaitForService -> EnsureModel -> BuildIndex -> Retrieve -> Answer
/// -> SelfEvaluate -> Done. The first failing stage ends the run.
pub async fn run_script_with(
  settings: &Settings,
  options: &ScriptOptions,
  probe: &dyn Probe,
  registry: &dyn ModelRegistry,
  embedder: &dyn Embedder,
  chat: &dyn ChatModel,
) -> Result<ScriptReport, RagError> {
  bentley::announce!(&Stage::WaitForService.to_string());
  let attempts = AvailabilityProber::from_settings(settings).wait_for_service(probe).await?;

  bentley::announce!(&format!("{} ({})", Stage::EnsureModel, settings.model));
  let provisioning = ModelProvisioner::new(&settings.model, settings.model_match, PullMode::Streaming)
    .ensure_model(registry)
    .await?;

  bentley::announce!(&Stage::BuildIndex.to_string());
  let index = Indexer::new(embedder).build(&settings.corpus).await?;

  bentley::announce!(&Stage::Retrieve.to_string());
  bentley::info!(&format!("Question: '{}'", options.question));
  let context = Retriever::new(&index, embedder).retrieve(&options.question).await?;
  if context.is_empty() {
    bentley::warn!("No relevant context found");
  } else {
    bentley::info!(&format!("Retrieved context: '{context}'"));
  }

  bentley::announce!(&Stage::Answer.to_string());
  let answerer = Answerer::new(chat);
  let answer = answerer.answer(&context, &options.question).await?;
  bentley::success!(&format!("Model answer: {answer}"));

  let evaluation = if options.self_evaluate {
    bentley::announce!(&Stage::SelfEvaluate.to_string());
    let score = answerer.self_evaluate(&answer).await?;
    bentley::info!(&format!("Self-evaluation score: {score}"));
    Some(score)
  } else {
    None
  };

  Ok(ScriptReport {
    attempts,
    provisioning,
    question: options.question.clone(),
    context,
    answer,
    evaluation,
  })
}
