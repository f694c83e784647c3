//! Axum router configuration for all endpoints

use axum::{
  middleware,
  routing::{get, post},
  Router,
};

use crate::server::handlers::{health, search};
use crate::server::middleware::request_context_middleware;
use crate::server::state::AppState;

/// Create the application router over the given service state
pub fn create_router(state: AppState) -> Router {
  Router::new()
    .route("/search", post(search::search))
    .route("/health", get(health::health))
    .layer(middleware::from_fn(request_context_middleware))
    .with_state(state)
}
