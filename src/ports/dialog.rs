//! Dialog Service Port - Interface for the hosted dialog-management collaborator.
//!
//! The dialog collaborator owns intent/entity recognition and context state
//! transitions; this port only describes the message exchange the gateway
//! needs. Implementations translate between the collaborator's REST API and
//! these types.
//!
//! # Design
//!
//! - The conversation context is an opaque key-value bag
//!   ([`serde_json::Map`]); the gateway never interprets it beyond the
//!   `call_discovery` flag.
//! - Collaborator failures carry the upstream status and the error payload
//!   verbatim so the HTTP layer can propagate them unchanged.
//! - Unknown collaborator-owned response keys (intents, entities, ...) are
//!   preserved through a flattened map rather than dropped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Port for the dialog-management collaborator.
#[async_trait]
pub trait DialogService: Send + Sync {
    /// Send one conversation turn and await the collaborator's reply.
    async fn message(&self, request: DialogRequest) -> Result<DialogResponse, DialogError>;
}

/// One conversation turn sent to the dialog collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct DialogRequest {
    /// Workspace identifier selecting the dialog model.
    pub workspace_id: String,
    /// Prior dialog context (opaque, caller-supplied).
    pub context: Map<String, Value>,
    /// The new user input.
    pub input: DialogInput,
}

/// User input for a conversation turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogInput {
    /// The user's message text.
    #[serde(default)]
    pub text: String,
}

impl DialogInput {
    /// Creates input from text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Output portion of a dialog reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogOutput {
    /// Reply lines/paragraphs to render.
    #[serde(default)]
    pub text: Vec<String>,
    /// Collaborator-owned output keys we pass through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reply from the dialog collaborator for one turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogResponse {
    /// Updated dialog context (may contain the `call_discovery` flag).
    #[serde(default)]
    pub context: Map<String, Value>,
    /// Output text and flags.
    #[serde(default)]
    pub output: DialogOutput,
    /// Echo of the input that was sent.
    #[serde(default)]
    pub input: DialogInput,
    /// Collaborator-owned response keys (intents, entities, ...) we pass
    /// through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Dialog collaborator errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DialogError {
    /// The collaborator answered with an error status.
    #[error("dialog collaborator returned status {status}")]
    Upstream {
        /// HTTP status the collaborator answered with.
        status: u16,
        /// The error payload, verbatim.
        body: Value,
    },

    /// The collaborator could not be reached.
    #[error("dialog collaborator unreachable: {0}")]
    Network(String),

    /// The collaborator's reply could not be parsed.
    #[error("failed to parse dialog reply: {0}")]
    Parse(String),
}

impl DialogError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// The HTTP status to answer the caller with. Upstream failures keep
    /// the collaborator's own status; everything else defaults to 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Upstream { status, .. } => *status,
            Self::Network(_) | Self::Parse(_) => 500,
        }
    }

    /// The body to answer the caller with. Upstream failures carry the
    /// collaborator's payload verbatim.
    pub fn into_body(self) -> Value {
        match self {
            Self::Upstream { body, .. } => body,
            other => json!({ "error": other.to_string() }),
        }
    }
}
