//! Edit session: single-record edit transaction
//!
//! ```text
//! Idle --open_for--> Open --begin_commit--> Committing --ok--> Idle
//!  ^                  |  ^                      |
//!  +-----cancel-------+  +--------error---------+
//! ```
//!
//! `open_for` from any state is a deliberate reset: the previous draft is
//! discarded, never merged. Every `open_for` mints a new [`SessionToken`];
//! a commit carries the token it started under, so a completion that
//! arrives after the operator moved on can be told apart from the current
//! one. The local collection is patched only after the store acknowledged
//! the update.

use halunder_common::confidence;
use halunder_common::{SentencePair, SentencePatch};
use tracing::{debug, info, warn};

use crate::client::{CorpusStore, StoreError};
use crate::dataset::DatasetStore;
use crate::error::{ReviewError, Result};

/// Editable copy of a pair's curatable fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub halunder_text: String,
    pub german_text: String,
    /// Confidence as a whole percentage, 0..=100
    pub confidence_percent: u8,
    pub reasoning: String,
}

impl Draft {
    pub fn from_pair(pair: &SentencePair) -> Self {
        Self {
            halunder_text: pair.halunder_text.clone(),
            german_text: pair.german_text.clone(),
            confidence_percent: confidence::to_percent(pair.confidence()),
            reasoning: pair.reasoning.clone().unwrap_or_default(),
        }
    }

    pub fn set_confidence_percent(&mut self, percent: u8) {
        self.confidence_percent = percent.min(100);
    }

    /// Patch sent to the store: every draft field, confidence as a fraction
    pub fn to_patch(&self) -> SentencePatch {
        SentencePatch {
            halunder_text: Some(self.halunder_text.clone()),
            german_text: Some(self.german_text.clone()),
            match_confidence: Some(confidence::from_percent(self.confidence_percent)),
            reasoning: Some(self.reasoning.clone()),
        }
    }
}

/// Identity of one opened session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Open {
        pair_id: String,
        draft: Draft,
        token: SessionToken,
    },
    Committing {
        pair_id: String,
        draft: Draft,
        token: SessionToken,
    },
}

/// An in-flight commit
#[derive(Debug, Clone)]
pub struct CommitTicket {
    pub token: SessionToken,
    pub pair_id: String,
    pub patch: SentencePatch,
}

/// How a successful commit landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitResolution {
    /// The committing session was still current and is now idle
    Applied,
    /// The operator had already moved on; data was patched, the newer
    /// session was left alone
    Superseded,
}

#[derive(Debug)]
pub struct EditSession {
    state: SessionState,
    next_token: u64,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            next_token: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    pub fn is_committing(&self) -> bool {
        matches!(self.state, SessionState::Committing { .. })
    }

    /// Id of the pair being edited, if any
    pub fn pair_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Open { pair_id, .. } | SessionState::Committing { pair_id, .. } => {
                Some(pair_id)
            }
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Open { draft, .. } | SessionState::Committing { draft, .. } => {
                Some(draft)
            }
        }
    }

    /// Mutable draft; only while `Open` (not during a commit)
    pub fn draft_mut(&mut self) -> Result<&mut Draft> {
        match &mut self.state {
            SessionState::Open { draft, .. } => Ok(draft),
            SessionState::Committing { .. } => Err(ReviewError::InvalidState(
                "draft is locked while a commit is in flight".to_string(),
            )),
            SessionState::Idle => Err(ReviewError::InvalidState(
                "no edit session is open".to_string(),
            )),
        }
    }

    /// Start editing `pair_id`, discarding whatever was open before
    ///
    /// Fails with `NotFound` when the pair is not in `dataset`; the prior
    /// draft is gone either way.
    pub fn open_for(&mut self, dataset: &DatasetStore, pair_id: &str) -> Result<&Draft> {
        if let Some(previous) = self.pair_id() {
            debug!(previous = %previous, next = %pair_id, "Discarding previous draft");
        }
        self.state = SessionState::Idle;

        let pair = dataset
            .get(pair_id)
            .ok_or_else(|| ReviewError::NotFound(pair_id.to_string()))?;

        self.next_token += 1;
        self.state = SessionState::Open {
            pair_id: pair_id.to_string(),
            draft: Draft::from_pair(pair),
            token: SessionToken(self.next_token),
        };

        self.draft()
            .ok_or_else(|| ReviewError::InvalidState("session did not open".to_string()))
    }

    /// Discard the draft; true if there was one
    pub fn cancel(&mut self) -> bool {
        let had_draft = !self.is_idle();
        self.state = SessionState::Idle;
        had_draft
    }

    /// `Open -> Committing`; hands out the patch to transmit
    pub fn begin_commit(&mut self) -> Result<CommitTicket> {
        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        match state {
            SessionState::Open {
                pair_id,
                draft,
                token,
            } => {
                let ticket = CommitTicket {
                    token,
                    pair_id: pair_id.clone(),
                    patch: draft.to_patch(),
                };
                self.state = SessionState::Committing {
                    pair_id,
                    draft,
                    token,
                };
                Ok(ticket)
            }
            other => {
                let reason = if matches!(other, SessionState::Committing { .. }) {
                    "a commit is already in flight"
                } else {
                    "no edit session is open"
                };
                self.state = other;
                Err(ReviewError::InvalidState(reason.to_string()))
            }
        }
    }

    /// Settle the session side of a finished commit
    ///
    /// Returns true when `ticket` belongs to the current session. Success
    /// moves it to `Idle`, failure back to `Open` with the draft intact. A
    /// stale ticket leaves the state untouched.
    pub fn finish_commit(&mut self, ticket: &CommitTicket, succeeded: bool) -> bool {
        let is_current = matches!(
            &self.state,
            SessionState::Committing { token, .. } if *token == ticket.token
        );
        if !is_current {
            return false;
        }

        let state = std::mem::replace(&mut self.state, SessionState::Idle);
        if let SessionState::Committing {
            pair_id,
            draft,
            token,
        } = state
        {
            if !succeeded {
                self.state = SessionState::Open {
                    pair_id,
                    draft,
                    token,
                };
            }
        }
        true
    }

    /// Full commit: transmit, then patch locally only on acknowledgment
    pub async fn commit<S: CorpusStore + ?Sized>(
        &mut self,
        store: &S,
        dataset: &mut DatasetStore,
    ) -> Result<CommitResolution> {
        let ticket = self.begin_commit()?;
        let result = store.update_sentence(&ticket.pair_id, &ticket.patch).await;
        settle_commit(self, dataset, &ticket, result)
    }
}

/// Reconcile a finished remote update with local state
///
/// On success the dataset is patched before the session is released, and
/// regardless of whether the session moved on: the store accepted the
/// update, so the local copy must reflect it. On failure nothing is
/// patched.
pub fn settle_commit(
    session: &mut EditSession,
    dataset: &mut DatasetStore,
    ticket: &CommitTicket,
    result: std::result::Result<(), StoreError>,
) -> Result<CommitResolution> {
    match result {
        Ok(()) => {
            dataset.apply_patch(&ticket.pair_id, &ticket.patch);
            let current = session.finish_commit(ticket, true);
            info!(id = %ticket.pair_id, current, "Committed sentence edit");
            Ok(if current {
                CommitResolution::Applied
            } else {
                CommitResolution::Superseded
            })
        }
        Err(source) => {
            session.finish_commit(ticket, false);
            warn!(id = %ticket.pair_id, error = %source, "Sentence edit rejected");
            Err(ReviewError::Update {
                id: ticket.pair_id.clone(),
                source,
            })
        }
    }
}
