//! HTTP DTOs for the message endpoint.
//!
//! The inbound body is deliberately lenient: both fields are optional and
//! default to empty, and no schema validation is applied to the opaque
//! context bag.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ports::DialogInput;

/// Body of `POST /api/message`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageRequest {
    /// Prior dialog context, as returned by the previous turn.
    #[serde(default)]
    pub context: Map<String, Value>,

    /// The new user input.
    #[serde(default)]
    pub input: DialogInput,
}
