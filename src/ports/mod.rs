//! Ports - Interfaces for the external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the message-routing core and the outside world. Adapters implement
//! these ports.
//!
//! - `DialogService` - hosted dialog-management collaborator
//! - `SearchService` - hosted document-search collaborator

mod dialog;
mod search;

pub use dialog::{
    DialogError, DialogInput, DialogOutput, DialogRequest, DialogResponse, DialogService,
};
pub use search::{Document, SearchError, SearchQuery, SearchService};
