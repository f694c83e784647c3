//! Request context and middleware for the review API
//!
//! Every request gets a [`RequestContext`] carrying a request id and the
//! request line, injected as an extension so handlers can log with it.

use axum::{
  extract::Request,
  http::{HeaderMap, Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use uuid::Uuid;

/// Request metadata attached to every log line a handler writes
#[derive(Debug, Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
  pub user_agent: String,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri, headers: &HeaderMap) -> Self {
    let user_agent = headers
      .get("user-agent")
      .and_then(|value| value.to_str().ok())
      .unwrap_or("none")
      .to_string();

    Self { request_id: Uuid::new_v4(), method, uri, user_agent }
  }

  pub fn log_info(&self, message: &str, component: &str) {
    tracing::info!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      component,
      "{message}"
    );
  }

  pub fn log_warn(&self, message: &str, component: &str) {
    tracing::warn!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      component,
      "{message}"
    );
  }

  pub fn log_error(&self, message: &str, component: &str) {
    tracing::error!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      component,
      "{message}"
    );
  }

  pub fn log_request_start(&self) {
    tracing::info!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      user_agent = %self.user_agent,
      "request started"
    );
  }

  pub fn log_request_complete(&self, status_code: u16, duration_ms: f64) {
    tracing::info!(
      request_id = %self.request_id,
      method = %self.method,
      path = self.uri.path(),
      status = status_code,
      duration_ms,
      "request completed"
    );
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context =
    RequestContext::new(request.method().clone(), request.uri().clone(), request.headers());

  let start_time = Instant::now();
  context.log_request_start();

  request.extensions_mut().insert(context.clone());
  let response = next.run(request).await;

  let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
  context.log_request_complete(response.status().as_u16(), duration_ms);

  response
}
