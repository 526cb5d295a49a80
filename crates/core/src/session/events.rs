use crate::RecordId;
use serde::Serialize;

/// What caused a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveTrigger {
    Manual,
    Auto,
}

/// A user-initiated session action that talks to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionAction {
    Load,
    Create,
    Delete,
    Save,
}

/// Notifications published by a [`super::DraftSession`].
///
/// Auto-save failures are not published; they are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    Loaded { count: usize },
    DraftCreated { id: RecordId },
    DraftDeleted { id: RecordId },
    Saved { trigger: SaveTrigger, count: usize },
    ActionFailed { action: SessionAction, message: String },
}
