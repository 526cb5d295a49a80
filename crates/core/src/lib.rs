//! # PromptDesk Core
//!
//! Core business logic for PromptDesk:
//! - SQLite persistence for drafts, prompts and settings (`repositories`)
//! - The multi-draft editing session with dirty tracking, batch save and auto-save (`session`)
//! - The process-wide settings hub with publish/subscribe (`settings_hub`)
//! - Data export, import and reset (`repositories::data`)
//!
//! **No API concerns**: HTTP routing and CLI parsing belong in `api-rest` and `promptdesk-cli`.

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod repositories;
pub mod seed;
pub mod session;
pub mod settings_hub;
pub mod store;
pub mod validation;

// Wire records double as the core's domain records.
pub use api_shared::wire;

pub use config::CoreConfig;
pub use constants::{AUTO_SAVE_INTERVAL, DEFAULT_DATABASE_URL, NEW_DRAFT_TITLE_PREFIX};
pub use error::{PromptDeskError, PromptDeskResult};
pub use promptdesk_types::NonEmptyText;
pub use promptdesk_uuid::RecordId;
pub use repositories::{DataService, DraftRepository, PromptService, SettingsService};
pub use session::{DraftSession, DraftWorkspace, SaveTrigger, SessionAction, SessionEvent};
pub use settings_hub::{SettingsHub, SettingsSubscription};
pub use store::DraftStore;
