//! YaMDb application layer.
//!
//! Exposes configuration, shared state, error handling and the per-entity
//! operations so an HTTP router, integration tests and the bootstrap binary
//! can all reach them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;
