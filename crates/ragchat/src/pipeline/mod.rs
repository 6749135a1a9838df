//! The RAG pipeline: probe, provision, index, retrieve, answer
//!
//! Stages run strictly one after another. `service` wires them for the HTTP
//! server (startup once, then one query per request); `script` runs them once
//! end to end with a self-evaluation step at the end.

use std::fmt;

pub mod answerer;
pub mod index;
pub mod prober;
pub mod provisioner;
pub mod retriever;
pub mod script;
pub mod service;
pub mod traits;

pub use answerer::{compose_judge_prompt, compose_prompt, Answerer};
pub use index::{cosine_similarity, Indexer, VectorIndex};
pub use prober::AvailabilityProber;
pub use provisioner::{model_present, ModelProvisioner, ProvisionOutcome};
pub use retriever::Retriever;
pub use service::{AnswerRecord, RagService, NOT_INITIALIZED_ANSWER};

/// Pipeline stages in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
  WaitForService,
  EnsureModel,
  BuildIndex,
  Retrieve,
  Answer,
  SelfEvaluate,
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Stage::WaitForService => "Wait for model server",
      Stage::EnsureModel => "Ensure model",
      Stage::BuildIndex => "Build index",
      Stage::Retrieve => "Retrieve",
      Stage::Answer => "Answer",
      Stage::SelfEvaluate => "Self-evaluation",
    };
    f.write_str(name)
  }
}
