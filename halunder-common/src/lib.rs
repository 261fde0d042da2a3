//! # Halunder Corpus Common Library
//!
//! Shared code for the Halunder corpus store and review workbench:
//! - Sentence-pair wire model and partial-update payloads
//! - Ingestion submission and processing summary types
//! - Confidence conversions (fraction <-> editable percentage)
//! - Layered configuration resolution

pub mod confidence;
pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::{SentencePair, SentencePatch};
