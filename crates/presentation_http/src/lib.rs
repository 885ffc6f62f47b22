//! Tomato classifier HTTP presentation layer
//!
//! This crate provides the HTTP API: a health check and the image
//! prediction endpoint.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use middleware::{RequestId, RequestIdLayer};
pub use routes::create_router;
pub use state::AppState;
