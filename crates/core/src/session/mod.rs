//! # Draft editing sessions
//!
//! A [`DraftSession`] owns one working set of drafts loaded from a [`DraftStore`]. Edits stay in
//! memory and are tracked against the last-persisted snapshot; [`DraftSession::save_all`] writes
//! the whole working set in one store transaction. An optional auto-save task calls the same
//! save path on a fixed period whenever something is dirty.
//!
//! Every operation that mutates the working set holds the session's workspace lock for its
//! whole duration, including the store round trip. A manual save, an auto-save tick and a
//! delete on the same session therefore run one after another, never interleaved.

mod auto_save;
mod events;
mod workspace;

pub use events::{SaveTrigger, SessionAction, SessionEvent};
pub use workspace::{has_changes, DraftWorkspace};

use crate::constants::{NEW_DRAFT_TITLE_PREFIX, SESSION_EVENT_CAPACITY};
use crate::settings_hub::SettingsSubscription;
use crate::store::DraftStore;
use crate::wire::{CreateDraftReq, Draft, DraftField, DraftState, SessionRes};
use crate::{PromptDeskError, PromptDeskResult, RecordId};
use auto_save::AutoSaveTask;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Result of one auto-save tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AutoSaveOutcome {
    Skipped,
    Saved(usize),
    Failed,
}

pub(crate) struct SessionInner {
    id: RecordId,
    store: Arc<dyn DraftStore>,
    workspace: Mutex<DraftWorkspace>,
    events: broadcast::Sender<SessionEvent>,
    settings: Option<SettingsSubscription>,
}

impl SessionInner {
    fn emit(&self, event: SessionEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }

    fn fail(&self, action: SessionAction, err: &PromptDeskError) {
        error!(session_id = %self.id, ?action, error = %err, "draft session action failed");
        self.emit(SessionEvent::ActionFailed {
            action,
            message: err.to_string(),
        });
    }

    /// Write the working set and adopt the store's result. The caller holds the lock.
    async fn save_locked(
        &self,
        ws: &mut DraftWorkspace,
        trigger: SaveTrigger,
    ) -> PromptDeskResult<Vec<Draft>> {
        let saved = self.store.batch_upsert_drafts(ws.to_save()).await?;
        ws.apply_saved(saved.clone());
        if trigger == SaveTrigger::Auto {
            ws.mark_auto_saved(Utc::now());
        }
        self.emit(SessionEvent::Saved {
            trigger,
            count: saved.len(),
        });
        Ok(saved)
    }

    pub(crate) async fn auto_save_tick(&self) -> AutoSaveOutcome {
        if let Some(settings) = &self.settings {
            if !settings.auto_save_enabled() {
                return AutoSaveOutcome::Skipped;
            }
        }

        let mut ws = self.workspace.lock().await;
        if !ws.has_any_changes() {
            return AutoSaveOutcome::Skipped;
        }

        match self.save_locked(&mut ws, SaveTrigger::Auto).await {
            Ok(saved) => AutoSaveOutcome::Saved(saved.len()),
            Err(e) => {
                warn!(
                    session_id = %self.id,
                    error = %e,
                    "auto-save failed, will retry on next tick"
                );
                AutoSaveOutcome::Failed
            }
        }
    }
}

/// One editing session over the draft store.
pub struct DraftSession {
    inner: Arc<SessionInner>,
    auto_save: Mutex<Option<AutoSaveTask>>,
    opened_at: Instant,
    /// Milliseconds after `opened_at` of the last [`DraftSession::touch`].
    last_activity_ms: AtomicU64,
}

impl DraftSession {
    /// Create an empty session. Nothing is loaded and no timer runs yet.
    ///
    /// With a settings subscription, auto-save ticks are skipped while `autoSave` is off.
    pub fn new(store: Arc<dyn DraftStore>, settings: Option<SettingsSubscription>) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                id: RecordId::new(),
                store,
                workspace: Mutex::new(DraftWorkspace::default()),
                events,
                settings,
            }),
            auto_save: Mutex::new(None),
            opened_at: Instant::now(),
            last_activity_ms: AtomicU64::new(0),
        }
    }

    /// Create a session, load the drafts and start auto-save with `period`.
    pub async fn open(
        store: Arc<dyn DraftStore>,
        settings: Option<SettingsSubscription>,
        period: Duration,
    ) -> PromptDeskResult<Self> {
        let session = Self::new(store, settings);
        session.load().await?;
        session.start_auto_save(period).await;
        info!(session_id = %session.id(), "draft session opened");
        Ok(session)
    }

    pub fn id(&self) -> RecordId {
        self.inner.id
    }

    /// Record client activity. Auto-save ticks do not count.
    pub fn touch(&self) {
        let elapsed = u64::try_from(self.opened_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.last_activity_ms.store(elapsed, Ordering::Relaxed);
    }

    /// Time since the session was opened or last touched.
    pub fn idle_for(&self) -> Duration {
        let last = Duration::from_millis(self.last_activity_ms.load(Ordering::Relaxed));
        self.opened_at.elapsed().saturating_sub(last)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Replace the working set with the store's drafts.
    pub async fn load(&self) -> PromptDeskResult<usize> {
        let mut ws = self.inner.workspace.lock().await;
        match self.inner.store.list_drafts().await {
            Ok(drafts) => {
                let count = drafts.len();
                ws.load(drafts);
                self.inner.emit(SessionEvent::Loaded { count });
                Ok(count)
            }
            Err(e) => {
                self.inner.fail(SessionAction::Load, &e);
                Err(e)
            }
        }
    }

    /// Create an empty draft titled `Draft {n+1}` and make it active.
    pub async fn create_new_draft(&self) -> PromptDeskResult<Draft> {
        let mut ws = self.inner.workspace.lock().await;
        let req = CreateDraftReq {
            title: format!("{} {}", NEW_DRAFT_TITLE_PREFIX, ws.len() + 1),
            ..Default::default()
        };

        match self.inner.store.create_draft(req).await {
            Ok(draft) => {
                ws.push_created(draft.clone());
                self.inner.emit(SessionEvent::DraftCreated { id: draft.id });
                Ok(draft)
            }
            Err(e) => {
                self.inner.fail(SessionAction::Create, &e);
                Err(e)
            }
        }
    }

    /// Edit one field in memory. Nothing is written until the next save.
    pub async fn update_draft(
        &self,
        id: RecordId,
        field: DraftField,
        value: String,
    ) -> PromptDeskResult<DraftState> {
        let mut ws = self.inner.workspace.lock().await;
        ws.update_field(id, field, value).cloned()
    }

    /// Delete a draft from the store immediately, then drop it from the working set.
    ///
    /// # Errors
    ///
    /// Returns `PromptDeskError::NotFound` when the store has no such draft; the working set is
    /// unchanged on any error.
    pub async fn delete_draft(&self, id: RecordId) -> PromptDeskResult<()> {
        let mut ws = self.inner.workspace.lock().await;
        match self.inner.store.delete_draft(id).await {
            Ok(()) => {
                ws.remove(id);
                self.inner.emit(SessionEvent::DraftDeleted { id });
                Ok(())
            }
            Err(e) => {
                self.inner.fail(SessionAction::Delete, &e);
                Err(e)
            }
        }
    }

    pub async fn set_active(&self, id: Option<RecordId>) -> PromptDeskResult<()> {
        self.inner.workspace.lock().await.set_active(id)
    }

    /// Persist every draft of the working set in one transaction.
    ///
    /// On success the store's records become both the working set and the snapshot, so every
    /// draft is clean. On failure the working set, dirty flags included, is untouched. Manual
    /// failures are published as [`SessionEvent::ActionFailed`]; auto-save failures are only
    /// logged.
    pub async fn save_all(&self, trigger: SaveTrigger) -> PromptDeskResult<Vec<Draft>> {
        let mut ws = self.inner.workspace.lock().await;
        match self.inner.save_locked(&mut ws, trigger).await {
            Ok(saved) => {
                info!(session_id = %self.id(), ?trigger, count = saved.len(), "saved drafts");
                Ok(saved)
            }
            Err(e) => {
                match trigger {
                    SaveTrigger::Manual => self.inner.fail(SessionAction::Save, &e),
                    SaveTrigger::Auto => {
                        warn!(session_id = %self.id(), error = %e, "auto-save failed")
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn snapshot(&self) -> SessionRes {
        let ws = self.inner.workspace.lock().await;
        SessionRes {
            id: self.id(),
            drafts: ws.drafts().to_vec(),
            active_draft_id: ws.active(),
            has_any_changes: ws.has_any_changes(),
            last_auto_save: ws.last_auto_save(),
        }
    }

    /// Start (or restart) the auto-save timer.
    pub async fn start_auto_save(&self, period: Duration) {
        let mut slot = self.auto_save.lock().await;
        if let Some(previous) = slot.take() {
            previous.cancel().await;
        }
        *slot = Some(AutoSaveTask::spawn(Arc::clone(&self.inner), period));
    }

    pub async fn is_auto_saving(&self) -> bool {
        self.auto_save.lock().await.is_some()
    }

    /// Stop the auto-save timer and wait for it to finish. Idempotent.
    pub async fn shutdown(&self) {
        let task = self.auto_save.lock().await.take();
        if let Some(task) = task {
            task.cancel().await;
            info!(session_id = %self.id(), "draft session closed");
        }
    }
}
