//! HTTP Adapters - Axum endpoints exposed to the chat UI.

pub mod message;
