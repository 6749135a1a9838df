//! Chat endpoint handler

use axum::{
  extract::{Extension, Json, State},
  http::StatusCode,
  response::Json as ResponseJson,
};
use std::sync::Arc;

use crate::error::RagError;
use crate::pipeline::AnswerRecord;
use crate::server::middleware::RequestContext;
use crate::server::types::{ChatRequest, ChatResponse, ErrorResponse};
use crate::server::AppState;

/// POST /api/chat - retrieve context for the message and answer it
pub async fn chat(
  State(state): State<Arc<AppState>>,
  Extension(context): Extension<RequestContext>,
  Json(request): Json<ChatRequest>,
) -> Result<ResponseJson<ChatResponse>, (StatusCode, ResponseJson<ErrorResponse>)> {
  match state.service.query(&request.message).await {
    Ok(record) => Ok(ResponseJson(record.into())),
    Err(RagError::UninitializedState) => {
      context.log_warn("Question received but the RAG pipeline is not initialized");
      Ok(ResponseJson(AnswerRecord::not_initialized().into()))
    }
    Err(e) => {
      context.log_error(&format!("Query failed: {e}"));
      Err((StatusCode::INTERNAL_SERVER_ERROR, ResponseJson(ErrorResponse { detail: e.detail() })))
    }
  }
}
