//! Record identifiers.
//!
//! Every stored draft, prompt and settings row is keyed by a *canonical* UUID: **32 lowercase
//! hexadecimal characters** (no hyphens), e.g. `550e8400e29b41d4a716446655440000`.
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//! Identifiers that arrive from outside the core (REST path segments, batch-save payloads,
//! import bundles) must already be canonical; [`RecordId::parse`] rejects anything else rather
//! than normalising it, so the same record can never be stored under two spellings.

mod service;

pub use service::{RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum RecordIdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type RecordIdResult<T> = Result<T, RecordIdError>;
