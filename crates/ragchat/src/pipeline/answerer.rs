//! Prompt composition and chat-model calls

use crate::error::RagError;
use crate::pipeline::traits::ChatModel;

/// Prompt asking the model to answer `question` from `context`
pub fn compose_prompt(context: &str, question: &str) -> String {
  format!(
    "Use the following context to answer the question.\nContext: {context}\nQuestion: {question}\nAnswer:"
  )
}

/// Judge prompt asking the model to score `answer` for clarity
pub fn compose_judge_prompt(answer: &str) -> String {
  format!(
    "Rate the previous answer from 0 to 10 based on clarity. Answer under review: '{answer}'. Return only the numeric score."
  )
}

pub struct Answerer<'a> {
  chat: &'a dyn ChatModel,
}

impl<'a> Answerer<'a> {
  pub fn new(chat: &'a dyn ChatModel) -> Self {
    Self { chat }
  }

  /// Failures of the remote call are returned as-is for the caller to classify
  pub async fn answer(&self, context: &str, question: &str) -> Result<String, RagError> {
    self.chat.complete(&compose_prompt(context, question)).await
  }

  /// Score is whatever text the model returns; it is not parsed
  pub async fn self_evaluate(&self, answer: &str) -> Result<String, RagError> {
    self.chat.complete(&compose_judge_prompt(answer)).await
  }
}
