//! Request and response bodies

use serde::{Deserialize, Serialize};

use crate::pipeline::AnswerRecord;

pub const SERVICE_NAME: &str = "RAG Chatbot";

/// Body of POST /api/chat
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
  pub answer: String,
  pub context: String,
}

impl From<AnswerRecord> for ChatResponse {
  fn from(record: AnswerRecord) -> Self {
    Self { answer: record.answer, context: record.context }
  }
}

/// Body of a 500 response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
  pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
  pub status: String,
  pub service: String,
}

impl HealthResponse {
  pub fn ok() -> Self {
    Self { status: "ok".to_string(), service: SERVICE_NAME.to_string() }
  }
}
