//! Search Service Port - Interface for the hosted document-search collaborator.
//!
//! The search collaborator owns indexing and relevance ranking; the gateway
//! only submits a query and renders the documents in the order they come
//! back. Search failures are recoverable at the application layer (the
//! reply degrades to an apology), so the error type here exists mainly for
//! operator-visible logging.

use async_trait::async_trait;

/// Port for the document-search collaborator.
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Run a natural-language query and return the ranked documents.
    async fn query(&self, query: SearchQuery) -> Result<Vec<Document>, SearchError>;
}

/// A document-search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Search environment identifier.
    pub environment_id: String,
    /// Document collection identifier.
    pub collection_id: String,
    /// Natural-language query text.
    pub query: String,
    /// Maximum number of documents to return.
    pub count: u32,
}

/// A ranked document returned by the search collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Document title.
    pub title: String,
    /// Document body text.
    pub text: String,
}

impl Document {
    /// Creates a document.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Search collaborator errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The collaborator answered with an error status.
    #[error("search collaborator returned status {status}: {body}")]
    Upstream {
        /// HTTP status the collaborator answered with.
        status: u16,
        /// Error payload as text, for logging.
        body: String,
    },

    /// The collaborator could not be reached.
    #[error("search collaborator unreachable: {0}")]
    Network(String),

    /// The collaborator's reply could not be parsed.
    #[error("failed to parse search reply: {0}")]
    Parse(String),
}

impl SearchError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
