//! Client-side dataset store
//!
//! Holds the full collection in retrieval order. Length and order never
//! change for the lifetime of a workbench; the only mutation is an in-place
//! patch of one record after the remote store acknowledged it.

use halunder_common::{SentencePair, SentencePatch};
use tracing::debug;

use crate::client::CorpusStore;
use crate::error::{ReviewError, Result};

#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    pairs: Vec<SentencePair>,
}

impl DatasetStore {
    /// Retrieve the entire corpus from the remote store
    pub async fn load<S: CorpusStore + ?Sized>(store: &S) -> Result<Self> {
        let pairs = store.fetch_all().await.map_err(ReviewError::Fetch)?;
        Ok(Self { pairs })
    }

    pub fn from_pairs(pairs: Vec<SentencePair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[SentencePair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&SentencePair> {
        self.pairs.iter().find(|p| p.id == id)
    }

    /// Update the record with this id in place
    ///
    /// Returns false (and changes nothing) when the id is not in the local
    /// collection, which happens if the remote store moved on since load.
    pub fn apply_patch(&mut self, id: &str, patch: &SentencePatch) -> bool {
        match self.pairs.iter_mut().find(|p| p.id == id) {
            Some(pair) => {
                pair.apply_patch(patch);
                true
            }
            None => {
                debug!(id = %id, "Patch target not in local collection, ignoring");
                false
            }
        }
    }
}
