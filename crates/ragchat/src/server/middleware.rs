//! Per-request context and logging
//!
//! Every request gets a UUID that prefixes its log lines, so the start,
//! the handler's own messages and the completion line can be matched up.

use axum::{
  extract::Request,
  http::{Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use uuid::Uuid;

/// Request metadata injected into handlers as an extension
#[derive(Debug, Clone)]
pub struct RequestContext {
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri }
  }

  fn with_context(&self, message: &str) -> String {
    format!("[{}] {} {} - {}", self.request_id, self.method, self.uri.path(), message)
  }

  pub fn log_info(&self, message: &str) {
    bentley::info!(&self.with_context(message));
  }

  pub fn log_warn(&self, message: &str) {
    bentley::warn!(&self.with_context(message));
  }

  pub fn log_error(&self, message: &str) {
    bentley::error!(&self.with_context(message));
  }

  pub fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    self.log_info(&format!("Request completed (Status: {status_code}, Duration: {duration_ms:.2}ms)"));
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());

  let start_time = Instant::now();
  context.log_info("Request started");

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms);

  response
}
