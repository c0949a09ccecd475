//! Dialog Gateway - Conversational HTTP gateway.
//!
//! Relays chat turns to a hosted dialog-management service and, when the
//! dialog model asks for it, augments the reply with results from a hosted
//! document-search service.

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
