//! Ingestion workflow
//!
//! Validates a raw-text submission locally, hands it to the processing
//! engine and surfaces the engine's extraction summary.

use async_trait::async_trait;
use halunder_common::models::{ProcessSummary, TextSubmission};
use std::time::Duration;
use tracing::{info, warn};

use crate::client::{build_http_client, check_status, StoreError};
use crate::error::{ReviewError, Result};

/// Contract of the external text-processing engine
#[async_trait]
pub trait ProcessingEngine: Send + Sync {
    async fn process(&self, submission: &TextSubmission) -> std::result::Result<ProcessSummary, StoreError>;
}

/// HTTP client for the processing engine
#[derive(Clone)]
pub struct HttpProcessingEngine {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpProcessingEngine {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> std::result::Result<Self, StoreError> {
        Ok(Self {
            http_client: build_http_client(timeout)?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProcessingEngine for HttpProcessingEngine {
    async fn process(&self, submission: &TextSubmission) -> std::result::Result<ProcessSummary, StoreError> {
        let url = format!("{}/api/process", self.base_url);
        tracing::debug!(url = %url, "Submitting text for processing");

        let response = self
            .http_client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}

/// Local checks run before anything is sent
pub fn validate_submission(submission: &TextSubmission) -> Result<()> {
    if submission.added_by.trim().is_empty() {
        return Err(ReviewError::InvalidSubmission(
            "select a user before submitting".to_string(),
        ));
    }
    if submission.halunder_text.trim().is_empty() {
        return Err(ReviewError::InvalidSubmission(
            "Halunder text is required".to_string(),
        ));
    }
    Ok(())
}

/// Validate, submit and return the extraction summary
pub async fn submit<E: ProcessingEngine + ?Sized>(
    engine: &E,
    submission: &TextSubmission,
) -> Result<ProcessSummary> {
    validate_submission(submission)?;

    let summary = engine.process(submission).await.map_err(|e| {
        warn!(error = %e, "Processing engine call failed");
        ReviewError::Ingest(e)
    })?;

    info!(
        sentences = summary.sentences_extracted,
        translation_aids = summary.translation_aids_extracted,
        idioms = summary.idioms_extracted,
        parallel = summary.has_parallel_text,
        "Text processed"
    );
    Ok(summary)
}
