//! SQLite-backed services.
//!
//! Each service owns a clone of the pool; the pool is cheap to clone and internally shared.

pub mod data;
pub mod drafts;
pub(crate) mod helpers;
pub mod prompts;
pub mod settings;

pub use data::DataService;
pub use drafts::DraftRepository;
pub use prompts::PromptService;
pub use settings::SettingsService;
