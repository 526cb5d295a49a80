//! The persistent draft store as seen by an editing session.

use crate::wire::{CreateDraftReq, Draft, DraftInput};
use crate::{PromptDeskResult, RecordId};
use async_trait::async_trait;

/// Durable owner of draft records.
///
/// [`crate::DraftRepository`] is the SQLite implementation; sessions only ever talk to this
/// trait so the save protocol can be exercised against a failing store.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// All drafts, most recently updated first.
    async fn list_drafts(&self) -> PromptDeskResult<Vec<Draft>>;

    /// Insert a draft; the store assigns the id and both timestamps.
    async fn create_draft(&self, input: CreateDraftReq) -> PromptDeskResult<Draft>;

    /// Delete by id.
    ///
    /// # Errors
    ///
    /// Returns `PromptDeskError::NotFound` when no draft has this id.
    async fn delete_draft(&self, id: RecordId) -> PromptDeskResult<()>;

    /// Update-or-insert every draft in one all-or-nothing transaction.
    ///
    /// Returns the refreshed records in input order.
    async fn batch_upsert_drafts(&self, drafts: Vec<DraftInput>) -> PromptDeskResult<Vec<Draft>>;
}
