//! # Halunder Review Workbench
//!
//! Curation client for the Halunder/German parallel corpus:
//! - [`dataset`]: the full collection, fetched once
//! - [`filter`] and [`pagination`]: the filtered, paged view
//! - [`session`]: single-record edit transaction with remote commit
//! - [`export`]: CSV snapshot download
//! - [`ingest`]: raw-text submission to the processing engine
//! - [`workbench`]: command-dispatching context tying these together

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod ingest;
pub mod pagination;
pub mod session;
pub mod workbench;

pub use client::{CorpusStore, HttpCorpusStore, StoreError};
pub use error::{Result, ReviewError};
pub use filter::FilterCriteria;
pub use workbench::{Command, DraftEdit, Outcome, PageView, Workbench};
