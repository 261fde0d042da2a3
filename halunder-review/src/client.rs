//! Corpus store client
//!
//! The workbench talks to the remote store only through [`CorpusStore`];
//! [`HttpCorpusStore`] is the production implementation over the store's
//! JSON API.

use async_trait::async_trait;
use halunder_common::models::{SentencesResponse, UsersResponse};
use halunder_common::{SentencePair, SentencePatch};
use reqwest::header::{ACCEPT, CONTENT_DISPOSITION};
use std::time::Duration;
use thiserror::Error;

use crate::export::filename_from_disposition;

const USER_AGENT: &str = concat!("halunder-review/", env!("CARGO_PKG_VERSION"));

/// Remote call errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport failure: connection refused, timeout, DNS
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("Remote returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// HTTP client could not be constructed
    #[error("Client setup error: {0}")]
    Setup(String),
}

impl StoreError {
    /// HTTP status for `Status` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Raw export body plus the filename the store suggested
#[derive(Debug, Clone)]
pub struct ExportPayload {
    pub filename_hint: Option<String>,
    pub bytes: Vec<u8>,
}

/// Request/response contract of the remote corpus store
#[async_trait]
pub trait CorpusStore: Send + Sync {
    /// Retrieve the entire corpus in one call
    async fn fetch_all(&self) -> Result<Vec<SentencePair>, StoreError>;

    /// Partial update of one sentence pair
    async fn update_sentence(&self, id: &str, patch: &SentencePatch) -> Result<(), StoreError>;

    /// Full-corpus CSV snapshot
    async fn export_csv(&self) -> Result<ExportPayload, StoreError>;
}

/// Build the shared reqwest client
pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client, StoreError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| StoreError::Setup(e.to_string()))
}

/// Turn a non-success response into `StoreError::Status`
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(StoreError::Status {
        status: status.as_u16(),
        message,
    })
}

/// HTTP client for the corpus store
#[derive(Clone)]
pub struct HttpCorpusStore {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpCorpusStore {
    /// `base_url` without trailing slash, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoreError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL extended by `segments`, each percent-encoded as one segment
    ///
    /// Sentence ids are opaque, so an id like `x?y` or `a/b` must reach the
    /// store as a single path segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, StoreError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| StoreError::Setup(format!("invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::Setup(format!("base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// One-shot read of the operator list
    pub async fn list_users(&self) -> Result<Vec<String>, StoreError> {
        let url = self.endpoint(&["api", "users"])?;
        tracing::debug!(url = %url, "Fetching user list");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let body: UsersResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        Ok(body.users)
    }
}

#[async_trait]
impl CorpusStore for HttpCorpusStore {
    async fn fetch_all(&self) -> Result<Vec<SentencePair>, StoreError> {
        let url = self.endpoint(&["api", "all-sentences"])?;
        tracing::debug!(url = %url, "Fetching corpus");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let body: SentencesResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        tracing::info!(count = body.sentences.len(), "Retrieved corpus from store");
        Ok(body.sentences)
    }

    async fn update_sentence(&self, id: &str, patch: &SentencePatch) -> Result<(), StoreError> {
        let url = self.endpoint(&["api", "sentences", id])?;
        tracing::debug!(id = %id, "Sending sentence update");

        let response = self
            .http_client
            .put(url)
            .json(patch)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check_status(response).await?;

        Ok(())
    }

    async fn export_csv(&self) -> Result<ExportPayload, StoreError> {
        let url = self.endpoint(&["api", "export"])?;

        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "text/csv")
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        let response = check_status(response).await?;

        let filename_hint = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?
            .to_vec();

        Ok(ExportPayload {
            filename_hint,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpCorpusStore::new("http://127.0.0.1:8000", Duration::from_secs(5));
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "http://127.0.0.1:8000");
    }

    #[test]
    fn test_status_accessor() {
        let err = StoreError::Status {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(StoreError::Network("refused".to_string()).status(), None);
    }

    #[test]
    fn test_sentence_ids_are_one_encoded_segment() {
        let client = HttpCorpusStore::new("http://127.0.0.1:8000/", Duration::from_secs(5)).unwrap();

        let url = client.endpoint(&["api", "sentences", "x?y"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/sentences/x%3Fy");

        let url = client.endpoint(&["api", "sentences", "a/b#1 c"]).unwrap();
        assert_eq!(url.path(), "/api/sentences/a%2Fb%231%20c");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = HttpCorpusStore::new("http://corpus.example/halunder", Duration::from_secs(5)).unwrap();
        let url = client.endpoint(&["api", "export"]).unwrap();
        assert_eq!(url.as_str(), "http://corpus.example/halunder/api/export");
    }

    #[tokio::test]
    async fn test_unreachable_store_is_network_error() {
        // Port 9 (discard) is essentially never served on loopback
        let client = HttpCorpusStore::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = client.fetch_all().await;
        assert!(matches!(result, Err(StoreError::Network(_))));
    }
}
