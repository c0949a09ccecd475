//! Axum routes for the message endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{post_message, MessageAppState};

/// Creates routes for the message endpoint.
///
/// REST Endpoints:
/// - POST /api/message - Relay one conversation turn
pub fn message_routes() -> Router<MessageAppState> {
    Router::new().route("/message", post(post_message))
}

/// Combined router with the message routes under /api.
pub fn message_router() -> Router<MessageAppState> {
    Router::new().nest("/api", message_routes())
}
