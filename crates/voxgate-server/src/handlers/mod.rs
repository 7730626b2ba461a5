//! HTTP route handlers for the voxgate server.

pub mod assistant;

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}
