//! Shared wire model for the corpus store and the review workbench
//!
//! Field names follow the store's JSON API (snake_case). Both sides of a
//! sentence pair may be missing in storage; on the wire a `null` text is
//! read as the empty string so that "incomplete" is a plain emptiness check.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::{Error, Result};

/// One aligned (or partially aligned) Halunder/German sentence record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentencePair {
    /// Store-assigned identifier, never reassigned
    pub id: String,

    /// Halunder side (empty when the pair lacks it)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub halunder_text: String,

    /// German side (empty when the pair lacks it)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub german_text: String,

    /// Alignment confidence in [0.0, 1.0]; absent means 0.0
    #[serde(default)]
    pub match_confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,

    /// Free-text justification from the aligner or the curator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,

    // Read-only metadata joined in by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(default)]
    pub is_idiom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl SentencePair {
    /// Create a bare pair with only the curated fields set
    pub fn new(
        id: impl Into<String>,
        halunder_text: impl Into<String>,
        german_text: impl Into<String>,
        match_confidence: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            halunder_text: halunder_text.into(),
            german_text: german_text.into(),
            match_confidence,
            source_title: None,
            reasoning: None,
            text_id: None,
            position: None,
            is_idiom: false,
            source_author: None,
            source_page: None,
            added_by: None,
            created_at: None,
        }
    }

    /// Confidence with absence treated as 0.0
    pub fn confidence(&self) -> f64 {
        self.match_confidence.unwrap_or(0.0)
    }

    /// True when at least one side of the pair is empty
    pub fn is_incomplete(&self) -> bool {
        self.halunder_text.is_empty() || self.german_text.is_empty()
    }

    /// Overwrite the fields present in `patch`; `id` is never touched
    pub fn apply_patch(&mut self, patch: &SentencePatch) {
        if let Some(text) = &patch.halunder_text {
            self.halunder_text = text.clone();
        }
        if let Some(text) = &patch.german_text {
            self.german_text = text.clone();
        }
        if let Some(confidence) = patch.match_confidence {
            self.match_confidence = Some(confidence);
        }
        if let Some(reasoning) = &patch.reasoning {
            self.reasoning = Some(reasoning.clone());
        }
    }
}

/// Partial update of a sentence pair's curatable fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentencePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub halunder_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub german_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl SentencePatch {
    pub fn is_empty(&self) -> bool {
        self.halunder_text.is_none()
            && self.german_text.is_none()
            && self.match_confidence.is_none()
            && self.reasoning.is_none()
    }

    /// Reject empty patches and confidences outside [0.0, 1.0]
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidInput("update contains no fields".to_string()));
        }
        if let Some(confidence) = self.match_confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(Error::InvalidInput(format!(
                    "match_confidence {} outside [0.0, 1.0]",
                    confidence
                )));
            }
        }
        Ok(())
    }
}

/// `GET /api/all-sentences` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentencesResponse {
    pub sentences: Vec<SentencePair>,
}

/// `PUT /api/sentences/:id` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    #[serde(default)]
    pub updated: Option<SentencePair>,
}

/// `GET /api/users` response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsersResponse {
    pub users: Vec<String>,
}

/// Raw dual-language text handed to the processing engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextSubmission {
    pub halunder_text: String,
    #[serde(default)]
    pub german_text: String,
    #[serde(default)]
    pub translation_aids: String,
    #[serde(default)]
    pub idiom_explanations: String,
    #[serde(default)]
    pub source_title: String,
    #[serde(default)]
    pub source_author: String,
    #[serde(default)]
    pub source_page: String,
    #[serde(default)]
    pub source_date: String,
    #[serde(default)]
    pub proofread: bool,
    #[serde(default)]
    pub proofread_by: String,
    pub added_by: String,
}

/// Language classification reported by the processing engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextTypeInfo {
    #[serde(default)]
    pub primary_language: Option<String>,
}

/// Processing engine summary for one submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSummary {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub text_ids: HashMap<String, String>,
    #[serde(default)]
    pub text_type: TextTypeInfo,
    #[serde(default)]
    pub sentences_extracted: u64,
    #[serde(default)]
    pub translation_aids_extracted: u64,
    #[serde(default)]
    pub idioms_extracted: u64,
    #[serde(default)]
    pub has_parallel_text: bool,
}

/// One extracted sentence pair as produced by the processing engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSentence {
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub halunder_text: Option<String>,
    #[serde(default)]
    pub german_text: Option<String>,
    #[serde(default)]
    pub match_confidence: Option<f64>,
    #[serde(default)]
    pub is_idiom: bool,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// `POST /api/texts` body: a source text plus its extracted sentences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewText {
    pub content: String,
    pub language: String,
    #[serde(default)]
    pub text_type: Option<String>,
    #[serde(default)]
    pub source_title: Option<String>,
    #[serde(default)]
    pub source_author: Option<String>,
    #[serde(default)]
    pub source_page: Option<String>,
    #[serde(default)]
    pub source_date: Option<String>,
    #[serde(default)]
    pub proofread: bool,
    #[serde(default)]
    pub proofread_by: Option<String>,
    pub added_by: String,
    #[serde(default)]
    pub sentences: Vec<NewSentence>,
}

/// `POST /api/texts` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub text_id: String,
    pub sentences_inserted: u64,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
