//! Dialog Collaborator Adapter.
//!
//! HTTP implementation of the `DialogService` port against the hosted
//! dialog engine's REST API.

mod client;

pub use client::{DialogClient, DialogClientConfig};
