//! Search Collaborator Adapter.
//!
//! HTTP implementation of the `SearchService` port against the hosted
//! document-search API.

mod client;

pub use client::{SearchClient, SearchClientConfig};
