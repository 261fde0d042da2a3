//! Error types for halunder-review
//!
//! Every variant is recoverable except `Fetch`, which ends the workbench
//! session: without the initial collection there is nothing to review.

use thiserror::Error;

use crate::client::StoreError;

/// Main error type for the review workbench
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Initial load of the corpus failed
    #[error("Failed to load sentences: {0}")]
    Fetch(#[source] StoreError),

    /// Edit target is not in the local collection
    #[error("Sentence not found: {0}")]
    NotFound(String),

    /// The store rejected a commit; the draft is kept for retry
    #[error("Failed to save sentence {id}: {source}")]
    Update {
        id: String,
        #[source]
        source: StoreError,
    },

    /// Export request failed
    #[error("Export failed: {0}")]
    Export(#[source] StoreError),

    /// Command not valid in the current edit-session state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Submission rejected before it was sent
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// Processing engine call failed
    #[error("Processing failed: {0}")]
    Ingest(#[source] StoreError),

    /// Writing an export to disk failed
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReviewError {
    /// HTTP status reported by the remote side, when there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ReviewError::Fetch(e) | ReviewError::Export(e) | ReviewError::Ingest(e) => e.status(),
            ReviewError::Update { source, .. } => source.status(),
            _ => None,
        }
    }
}

/// Convenience Result type using ReviewError
pub type Result<T> = std::result::Result<T, ReviewError>;
