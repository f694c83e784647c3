//! Storyreview - User Story Review Service
//!
//! Reviews healthcare user stories by finding similar stored stories through
//! vector search and asking a hosted language model for a scored assessment.
//! The `server` module is the HTTP service; `cli` is its thin terminal client.

pub mod cli;
pub mod server;
