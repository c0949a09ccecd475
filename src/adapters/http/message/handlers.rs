//! HTTP handler for the message endpoint.
//!
//! Connects the Axum route to the Message Router. All reply paths that do
//! not stem from a dialog collaborator failure answer 200; dialog failures
//! are propagated with the collaborator's own status and payload.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::MessageRouter;

use super::dto::MessageRequest;

/// Shared application state for the message endpoint.
#[derive(Clone)]
pub struct MessageAppState {
    /// The sole request-handling component, constructed once at startup.
    pub router: Arc<MessageRouter>,
}

impl MessageAppState {
    /// Creates a new MessageAppState.
    pub fn new(router: Arc<MessageRouter>) -> Self {
        Self { router }
    }
}

/// POST /api/message - Relay one conversation turn.
///
/// Returns 200 with the (possibly search-augmented) dialog reply, the
/// fixed setup guidance when no workspace is configured, or the dialog
/// collaborator's error status and payload verbatim on upstream failure.
pub async fn post_message(
    State(state): State<MessageAppState>,
    Json(body): Json<MessageRequest>,
) -> Response {
    match state.router.handle(body.context, body.input).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "dialog collaborator call failed");
            let status = StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(err.into_body())).into_response()
        }
    }
}
