//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the message-routing core to external systems:
//! - `dialog` - HTTP client for the dialog-management collaborator
//! - `search` - HTTP client for the document-search collaborator
//! - `http` - Axum endpoints exposed to the chat UI

pub mod dialog;
pub mod http;
pub mod search;
