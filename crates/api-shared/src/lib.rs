//! # API Shared
//!
//! Shared definitions for PromptDesk APIs.
//!
//! Contains:
//! - Wire types (`wire` module), serialised in camelCase and annotated for OpenAPI
//! - Shared services like `HealthService`
//!
//! Used by `promptdesk-core`, which returns these records directly, and by `api-rest`.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
