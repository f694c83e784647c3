//! HTTP service for user story reviews
//!
//! Exposes `POST /search` and `GET /health`. Uses axum for routing and
//! schemars for OpenAPI-ready request/response types.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routing;
pub mod services;
pub mod startup;
pub mod state;
pub mod types;
