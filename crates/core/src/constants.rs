//! Constants used throughout the PromptDesk core crate.

use std::time::Duration;

/// Database used when `PROMPTDESK_DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://promptdesk.db";

/// Period of the draft session auto-save timer.
pub const AUTO_SAVE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// A draft session with no client activity for this many auto-save periods is closed.
pub const SESSION_IDLE_PERIODS: u32 = 3;

/// Prefix for the title given to a freshly created draft (`Draft 1`, `Draft 2`, ...).
pub const NEW_DRAFT_TITLE_PREFIX: &str = "Draft";

/// Format version written into export bundles.
pub const EXPORT_BUNDLE_VERSION: u32 = 1;

/// Capacity of the per-session notification channel.
pub const SESSION_EVENT_CAPACITY: usize = 64;

/// Connection pool bounds. SQLite has a single writer, so this mostly serves readers.
pub const MAX_DB_CONNECTIONS: u32 = 5;
pub const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);
