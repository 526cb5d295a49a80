//! In-memory draft working set.
//!
//! A [`DraftWorkspace`] holds the drafts being edited, the last-persisted snapshot they are
//! compared against, and the active selection. It performs no I/O; [`super::DraftSession`]
//! drives it around store round trips.

use crate::wire::{Draft, DraftField, DraftInput, DraftState};
use crate::{PromptDeskError, PromptDeskResult, RecordId};
use chrono::{DateTime, Utc};

/// Whether `draft` differs from its persisted counterpart in `originals`.
///
/// Only title, description and content are compared. A draft with no counterpart is dirty.
pub fn has_changes(draft: &Draft, originals: &[Draft]) -> bool {
    match originals.iter().find(|o| o.id == draft.id) {
        None => true,
        Some(original) => {
            original.title != draft.title
                || original.description != draft.description
                || original.content != draft.content
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DraftWorkspace {
    drafts: Vec<DraftState>,
    originals: Vec<Draft>,
    active: Option<RecordId>,
    last_auto_save: Option<DateTime<Utc>>,
}

impl DraftWorkspace {
    /// Replace the working set and snapshot with freshly loaded drafts, all clean.
    pub fn load(&mut self, drafts: Vec<Draft>) {
        self.originals = drafts.clone();
        self.drafts = drafts.into_iter().map(DraftState::clean).collect();
        self.reselect();
    }

    pub fn drafts(&self) -> &[DraftState] {
        &self.drafts
    }

    pub fn originals(&self) -> &[Draft] {
        &self.originals
    }

    pub fn get(&self, id: RecordId) -> Option<&DraftState> {
        self.drafts.iter().find(|d| d.draft.id == id)
    }

    pub fn active(&self) -> Option<RecordId> {
        self.active
    }

    /// Select a draft, or clear the selection with `None`.
    pub fn set_active(&mut self, id: Option<RecordId>) -> PromptDeskResult<()> {
        if let Some(id) = id {
            if self.get(id).is_none() {
                return Err(PromptDeskError::not_found("draft", id));
            }
        }
        self.active = id;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    pub fn last_auto_save(&self) -> Option<DateTime<Utc>> {
        self.last_auto_save
    }

    pub fn mark_auto_saved(&mut self, at: DateTime<Utc>) {
        self.last_auto_save = Some(at);
    }

    /// Append a draft the store just created and make it active.
    ///
    /// The store already holds it, so it joins the snapshot too and starts clean.
    pub fn push_created(&mut self, draft: Draft) {
        let id = draft.id;
        self.originals.push(draft.clone());
        self.drafts.push(DraftState::clean(draft));
        self.active = Some(id);
    }

    /// Edit one field in memory and recompute the draft's dirty flag.
    pub fn update_field(
        &mut self,
        id: RecordId,
        field: DraftField,
        value: String,
    ) -> PromptDeskResult<&DraftState> {
        let originals = &self.originals;
        let state = self
            .drafts
            .iter_mut()
            .find(|d| d.draft.id == id)
            .ok_or_else(|| PromptDeskError::not_found("draft", id))?;

        match field {
            DraftField::Title => state.draft.title = value,
            DraftField::Description => state.draft.description = value,
            DraftField::Content => state.draft.content = value,
        }
        state.has_changes = has_changes(&state.draft, originals);
        Ok(state)
    }

    /// Drop a deleted draft from the working set and the snapshot.
    ///
    /// If it was active, the preceding draft becomes active (the first one if it was first,
    /// none if the list is now empty). Unknown ids are ignored.
    pub fn remove(&mut self, id: RecordId) {
        self.originals.retain(|d| d.id != id);
        let Some(index) = self.drafts.iter().position(|d| d.draft.id == id) else {
            return;
        };
        self.drafts.remove(index);

        if self.active == Some(id) {
            self.active = if self.drafts.is_empty() {
                None
            } else {
                Some(self.drafts[index.saturating_sub(1)].draft.id)
            };
        }
    }

    /// The working set stripped of dirty flags, in working-set order.
    pub fn to_save(&self) -> Vec<DraftInput> {
        self.drafts.iter().map(|d| DraftInput::from(&d.draft)).collect()
    }

    /// Adopt the store's post-save records as both working set and snapshot.
    pub fn apply_saved(&mut self, saved: Vec<Draft>) {
        self.load(saved);
    }

    pub fn has_any_changes(&self) -> bool {
        self.drafts.iter().any(|d| d.has_changes)
    }

    fn reselect(&mut self) {
        let still_present = self.active.is_some_and(|id| self.get(id).is_some());
        if !still_present {
            self.active = self.drafts.first().map(|d| d.draft.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> Draft {
        let now = Utc::now();
        Draft {
            id: RecordId::new(),
            title: title.into(),
            description: String::new(),
            content: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn loaded(titles: &[&str]) -> DraftWorkspace {
        let mut ws = DraftWorkspace::default();
        ws.load(titles.iter().map(|t| draft(t)).collect());
        ws
    }

    #[test]
    fn test_unchanged_fields_are_clean() {
        let original = draft("T1");
        let mut copy = original.clone();
        copy.updated_at = Utc::now() + chrono::Duration::seconds(10);
        assert!(!has_changes(&copy, &[original]));
    }

    #[test]
    fn test_draft_without_snapshot_is_dirty() {
        assert!(has_changes(&draft("T1"), &[]));
        assert!(has_changes(&draft("T1"), &[draft("T1")]));
    }

    #[test]
    fn test_each_field_is_compared() {
        let original = draft("T1");
        for field in [DraftField::Title, DraftField::Description, DraftField::Content] {
            let mut ws = DraftWorkspace::default();
            ws.load(vec![original.clone()]);
            let state = ws.update_field(original.id, field, "changed".into()).unwrap();
            assert!(state.has_changes, "{field:?} edit should be dirty");
        }
    }

    #[test]
    fn test_reverting_an_edit_clears_the_flag() {
        let mut ws = loaded(&["T1"]);
        let id = ws.drafts()[0].draft.id;

        ws.update_field(id, DraftField::Title, "T2".into()).unwrap();
        assert!(ws.has_any_changes());
        ws.update_field(id, DraftField::Title, "T1".into()).unwrap();
        assert!(!ws.has_any_changes());
    }

    #[test]
    fn test_load_selects_first_draft() {
        let ws = loaded(&["a", "b"]);
        assert_eq!(ws.active(), Some(ws.drafts()[0].draft.id));
        assert!(!ws.has_any_changes());
    }

    #[test]
    fn test_load_keeps_existing_selection() {
        let mut ws = loaded(&["a", "b"]);
        let second = ws.drafts()[1].clone();
        ws.set_active(Some(second.draft.id)).unwrap();

        ws.load(vec![ws.drafts()[0].draft.clone(), second.draft.clone()]);
        assert_eq!(ws.active(), Some(second.draft.id));
    }

    #[test]
    fn test_removing_only_active_draft_clears_selection() {
        let mut ws = loaded(&["only"]);
        let id = ws.drafts()[0].draft.id;

        ws.remove(id);

        assert!(ws.is_empty());
        assert!(ws.originals().is_empty());
        assert_eq!(ws.active(), None);
    }

    #[test]
    fn test_removing_active_draft_selects_preceding() {
        let mut ws = loaded(&["a", "b", "c"]);
        let ids: Vec<RecordId> = ws.drafts().iter().map(|d| d.draft.id).collect();

        ws.set_active(Some(ids[2])).unwrap();
        ws.remove(ids[2]);
        assert_eq!(ws.active(), Some(ids[1]));

        ws.set_active(Some(ids[0])).unwrap();
        ws.remove(ids[0]);
        assert_eq!(ws.active(), Some(ids[1]));
    }

    #[test]
    fn test_removing_inactive_draft_keeps_selection() {
        let mut ws = loaded(&["a", "b"]);
        let ids: Vec<RecordId> = ws.drafts().iter().map(|d| d.draft.id).collect();

        ws.remove(ids[1]);
        assert_eq!(ws.active(), Some(ids[0]));
    }

    #[test]
    fn test_push_created_is_clean_and_active() {
        let mut ws = loaded(&["a"]);
        let new = draft("Draft 2");
        let id = new.id;

        ws.push_created(new);

        assert_eq!(ws.active(), Some(id));
        assert!(!ws.get(id).unwrap().has_changes);
        assert_eq!(ws.originals().len(), 2);
        assert_eq!(ws.to_save().len(), 2);
    }

    #[test]
    fn test_set_active_unknown_is_not_found() {
        let mut ws = loaded(&["a"]);
        assert!(ws.set_active(Some(RecordId::new())).unwrap_err().is_not_found());
        ws.set_active(None).unwrap();
        assert_eq!(ws.active(), None);
    }
}
