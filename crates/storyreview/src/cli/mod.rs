//! Terminal client for the review server

pub mod client;
pub mod commands;
pub mod display;
pub mod session;
