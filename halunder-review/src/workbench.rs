//! Review workbench context
//!
//! Owns the dataset, filter criteria, filtered view, pager and edit session
//! for one operator. Every operator action is a [`Command`] dispatched
//! through [`Workbench::handle`]; an error from any command leaves the
//! in-memory state consistent.
//!
//! The filtered view holds positions into the full collection. A commit
//! patches the record behind a position, so visible rows pick up the edit
//! without re-filtering; membership is only recomputed when criteria change.

use halunder_common::confidence::{self, ConfidenceBand};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::client::{CorpusStore, StoreError};
use crate::dataset::DatasetStore;
use crate::error::Result;
use crate::export::{self, NamedFile};
use crate::filter::{self, FilterCriteria};
use crate::pagination::{page_slice, Pager};
use crate::session::{self, CommitResolution, CommitTicket, Draft, EditSession};

/// Operator actions
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    ApplyFilters(FilterCriteria),
    ResetFilters,
    NextPage,
    PrevPage,
    GoToPage(usize),
    OpenEdit(String),
    EditDraft(DraftEdit),
    CancelEdit,
    CommitEdit,
    Export,
}

/// Single-field change to the open draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    HalunderText(String),
    GermanText(String),
    /// Clamped to 0..=100
    ConfidencePercent(u8),
    Reasoning(String),
}

impl DraftEdit {
    fn apply_to(self, draft: &mut Draft) {
        match self {
            DraftEdit::HalunderText(text) => draft.halunder_text = text,
            DraftEdit::GermanText(text) => draft.german_text = text,
            DraftEdit::ConfidencePercent(p) => draft.set_confidence_percent(p),
            DraftEdit::Reasoning(text) => draft.reasoning = text,
        }
    }
}

/// Result of a successfully handled command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Current page after the command
    Rendered(PageView),
    /// Edit session is open on `pair_id`
    Editing { pair_id: String, draft: Draft },
    /// Export snapshot, not yet written anywhere
    Exported(NamedFile),
    /// Nothing changed (e.g. stepping past the last page)
    Unchanged,
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    /// 1-based position within the filtered view
    pub number: usize,
    pub id: String,
    pub halunder_text: String,
    pub german_text: String,
    pub confidence_percent: u8,
    pub band: ConfidenceBand,
    pub source_title: Option<String>,
    pub reasoning: Option<String>,
}

/// One rendered page of the filtered view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub rows: Vec<RowView>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub can_prev: bool,
    pub can_next: bool,
}

pub struct Workbench<S: CorpusStore> {
    store: Arc<S>,
    dataset: DatasetStore,
    criteria: FilterCriteria,
    view: Vec<usize>,
    pager: Pager,
    session: EditSession,
}

impl<S: CorpusStore> Workbench<S> {
    /// Fetch the corpus and open the workbench on page 1, no filters
    ///
    /// A fetch failure is fatal: no workbench is created.
    pub async fn load(store: S) -> Result<Self> {
        let store = Arc::new(store);
        let dataset = DatasetStore::load(store.as_ref()).await?;
        if dataset.is_empty() {
            warn!("Corpus store returned no sentence pairs");
        }
        info!(count = dataset.len(), "Workbench loaded");
        Ok(Self::with_dataset(store, dataset))
    }

    pub fn with_dataset(store: Arc<S>, dataset: DatasetStore) -> Self {
        let criteria = FilterCriteria::default();
        let view = filter::matching_indices(dataset.pairs(), &criteria);
        Self {
            store,
            dataset,
            criteria,
            view,
            pager: Pager::new(),
            session: EditSession::new(),
        }
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    pub fn dataset(&self) -> &DatasetStore {
        &self.dataset
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    /// Number of pairs in the filtered view
    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Ids in the filtered view, in collection order
    pub fn filtered_ids(&self) -> Vec<&str> {
        self.view
            .iter()
            .filter_map(|&i| self.dataset.pairs().get(i))
            .map(|p| p.id.as_str())
            .collect()
    }

    /// Dispatch one operator action
    pub async fn handle(&mut self, command: Command) -> Result<Outcome> {
        debug!(?command, "Handling command");

        match command {
            Command::ApplyFilters(criteria) => {
                self.set_criteria(criteria);
                Ok(Outcome::Rendered(self.render_page()))
            }
            Command::ResetFilters => {
                self.set_criteria(FilterCriteria::default());
                Ok(Outcome::Rendered(self.render_page()))
            }
            Command::NextPage => {
                let moved = self.pager.next(self.view.len());
                Ok(self.rendered_if(moved))
            }
            Command::PrevPage => {
                let moved = self.pager.prev();
                Ok(self.rendered_if(moved))
            }
            Command::GoToPage(page) => {
                let moved = self.pager.go_to(page, self.view.len());
                Ok(self.rendered_if(moved))
            }
            Command::OpenEdit(pair_id) => {
                let draft = self.session.open_for(&self.dataset, &pair_id)?.clone();
                Ok(Outcome::Editing { pair_id, draft })
            }
            Command::EditDraft(edit) => {
                edit.apply_to(self.session.draft_mut()?);
                self.editing_outcome()
            }
            Command::CancelEdit => {
                if self.session.cancel() {
                    Ok(Outcome::Rendered(self.render_page()))
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            Command::CommitEdit => {
                self.session
                    .commit(self.store.as_ref(), &mut self.dataset)
                    .await?;
                Ok(Outcome::Rendered(self.render_page()))
            }
            Command::Export => {
                let file = export::export_snapshot(self.store.as_ref()).await?;
                Ok(Outcome::Exported(file))
            }
        }
    }

    /// First half of a split commit
    ///
    /// For callers that keep dispatching commands while the update is in
    /// flight: send `ticket.patch` through [`Workbench::store`], then hand
    /// the result to [`Workbench::finish_commit`].
    pub fn begin_commit(&mut self) -> Result<CommitTicket> {
        self.session.begin_commit()
    }

    /// Second half of a split commit
    ///
    /// A success patches the dataset even if the operator has since opened
    /// another record; that newer session is left untouched.
    pub fn finish_commit(
        &mut self,
        ticket: &CommitTicket,
        result: std::result::Result<(), StoreError>,
    ) -> Result<Outcome> {
        match session::settle_commit(&mut self.session, &mut self.dataset, ticket, result)? {
            CommitResolution::Applied => Ok(Outcome::Rendered(self.render_page())),
            CommitResolution::Superseded => self.editing_outcome(),
        }
    }

    /// Render the current page of the filtered view
    pub fn render_page(&self) -> PageView {
        let (positions, p) = page_slice(&self.view, self.pager.current());
        let pairs = self.dataset.pairs();

        let rows = positions
            .iter()
            .enumerate()
            .filter_map(|(i, &pos)| pairs.get(pos).map(|pair| (p.offset + i + 1, pair)))
            .map(|(number, pair)| {
                let percent = confidence::to_percent(pair.confidence());
                RowView {
                    number,
                    id: pair.id.clone(),
                    halunder_text: pair.halunder_text.clone(),
                    german_text: pair.german_text.clone(),
                    confidence_percent: percent,
                    band: ConfidenceBand::for_percent(percent),
                    source_title: pair.source_title.clone(),
                    reasoning: pair.reasoning.clone(),
                }
            })
            .collect();

        PageView {
            rows,
            page: p.page,
            total_pages: p.total_pages,
            total_items: self.view.len(),
            can_prev: self.pager.can_prev(),
            can_next: self.pager.can_next(self.view.len()),
        }
    }

    fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.view = filter::matching_indices(self.dataset.pairs(), &criteria);
        self.criteria = criteria;
        self.pager.reset();
        info!(
            min_confidence = self.criteria.min_confidence(),
            source = %self.criteria.source_query(),
            incomplete_only = self.criteria.incomplete_only(),
            matches = self.view.len(),
            "Filters applied"
        );
    }

    fn rendered_if(&self, changed: bool) -> Outcome {
        if changed {
            Outcome::Rendered(self.render_page())
        } else {
            Outcome::Unchanged
        }
    }

    fn editing_outcome(&self) -> Result<Outcome> {
        match (self.session.pair_id(), self.session.draft()) {
            (Some(pair_id), Some(draft)) => Ok(Outcome::Editing {
                pair_id: pair_id.to_string(),
                draft: draft.clone(),
            }),
            _ => Ok(Outcome::Unchanged),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ExportPayload;
    use crate::error::ReviewError;
    use async_trait::async_trait;
    use halunder_common::{SentencePair, SentencePatch};

    struct StaticStore;

    #[async_trait]
    impl CorpusStore for StaticStore {
        async fn fetch_all(&self) -> std::result::Result<Vec<SentencePair>, StoreError> {
            Ok((0..75)
                .map(|i| SentencePair::new(format!("p{}", i), "h", "g", Some(0.5)))
                .collect())
        }

        async fn update_sentence(
            &self,
            _id: &str,
            _patch: &SentencePatch,
        ) -> std::result::Result<(), StoreError> {
            Ok(())
        }

        async fn export_csv(&self) -> std::result::Result<ExportPayload, StoreError> {
            Ok(ExportPayload {
                filename_hint: None,
                bytes: Vec::new(),
            })
        }
    }

    #[tokio::test]
    async fn test_rows_are_numbered_across_pages() {
        let mut wb = Workbench::load(StaticStore).await.unwrap();

        let page = match wb.handle(Command::NextPage).await.unwrap() {
            Outcome::Rendered(page) => page,
            other => panic!("expected page, got {:?}", other),
        };
        assert_eq!(page.page, 2);
        assert_eq!(page.rows.len(), 25);
        assert_eq!(page.rows[0].number, 51);
        assert_eq!(page.rows[0].id, "p50");
        assert_eq!(page.rows[0].band, ConfidenceBand::Medium);
        assert!(page.can_prev);
        assert!(!page.can_next);
    }

    #[tokio::test]
    async fn test_step_past_end_is_unchanged() {
        let mut wb = Workbench::load(StaticStore).await.unwrap();
        assert_eq!(wb.handle(Command::PrevPage).await.unwrap(), Outcome::Unchanged);
        assert_eq!(
            wb.handle(Command::GoToPage(3)).await.unwrap(),
            Outcome::Unchanged
        );
        assert_eq!(wb.current_page(), 1);
    }

    #[tokio::test]
    async fn test_filter_change_resets_page() {
        let mut wb = Workbench::load(StaticStore).await.unwrap();
        wb.handle(Command::GoToPage(2)).await.unwrap();

        wb.handle(Command::ApplyFilters(FilterCriteria::new(10, "", false)))
            .await
            .unwrap();
        assert_eq!(wb.current_page(), 1);
    }

    #[tokio::test]
    async fn test_edit_draft_requires_open_session() {
        let mut wb = Workbench::load(StaticStore).await.unwrap();
        let result = wb
            .handle(Command::EditDraft(DraftEdit::GermanText("x".to_string())))
            .await;
        assert!(matches!(result, Err(ReviewError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_edit_draft_updates_open_draft() {
        let mut wb = Workbench::load(StaticStore).await.unwrap();
        wb.handle(Command::OpenEdit("p3".to_string())).await.unwrap();

        let outcome = wb
            .handle(Command::EditDraft(DraftEdit::ConfidencePercent(140)))
            .await
            .unwrap();
        match outcome {
            Outcome::Editing { pair_id, draft } => {
                assert_eq!(pair_id, "p3");
                assert_eq!(draft.confidence_percent, 100);
            }
            other => panic!("expected editing, got {:?}", other),
        }
        // nothing reaches the collection before commit
        assert_eq!(wb.dataset().get("p3").unwrap().match_confidence, Some(0.5));
    }

    #[tokio::test]
    async fn test_cancel_without_session_is_unchanged() {
        let mut wb = Workbench::load(StaticStore).await.unwrap();
        assert_eq!(
            wb.handle(Command::CancelEdit).await.unwrap(),
            Outcome::Unchanged
        );
    }
}
