//! Input validation.
//!
//! Everything here runs before a store call, so a rejected request never touches the database.

use crate::wire::{DraftInput, Settings};
use crate::{NonEmptyText, PromptDeskError, PromptDeskResult};
use std::collections::HashSet;

/// Rejects a batch that names the same draft twice.
pub fn validate_unique_draft_ids(drafts: &[DraftInput]) -> PromptDeskResult<()> {
    let mut seen = HashSet::with_capacity(drafts.len());
    for draft in drafts {
        if !seen.insert(draft.id) {
            return Err(PromptDeskError::InvalidInput(format!(
                "draft {} appears more than once in the batch",
                draft.id
            )));
        }
    }
    Ok(())
}

/// Validates a prompt title and body. Both are required; neither has a length limit.
pub fn validate_prompt_text(title: &str, content: &str) -> PromptDeskResult<()> {
    NonEmptyText::new(title)
        .and_then(|_| NonEmptyText::new(content))
        .map_err(|_| PromptDeskError::InvalidInput("title and content are required".into()))?;
    Ok(())
}

/// Validates editor settings ranges.
pub fn validate_settings(settings: &Settings) -> PromptDeskResult<()> {
    if !(8..=72).contains(&settings.font_size) {
        return Err(PromptDeskError::InvalidInput(format!(
            "fontSize must be between 8 and 72, got {}",
            settings.font_size
        )));
    }

    if !(1..=8).contains(&settings.tab_size) {
        return Err(PromptDeskError::InvalidInput(format!(
            "tabSize must be between 1 and 8, got {}",
            settings.tab_size
        )));
    }

    if !settings.line_height.is_finite() || settings.line_height <= 0.0 {
        return Err(PromptDeskError::InvalidInput(
            "lineHeight must be a positive number".into(),
        ));
    }

    if settings.auto_save_interval == 0 {
        return Err(PromptDeskError::InvalidInput(
            "autoSaveInterval must be greater than zero".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    fn input(id: RecordId) -> DraftInput {
        DraftInput {
            id,
            title: String::new(),
            description: String::new(),
            content: String::new(),
        }
    }

    #[test]
    fn test_duplicate_draft_ids_are_rejected() {
        let id = RecordId::new();
        let err = validate_unique_draft_ids(&[input(id), input(RecordId::new()), input(id)])
            .expect_err("duplicate ids should be rejected");
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_prompt_text_requires_title_and_content() {
        assert!(validate_prompt_text("Title", "Body").is_ok());
        assert!(validate_prompt_text("", "Body").is_err());
        assert!(validate_prompt_text("Title", "   ").is_err());
    }

    #[test]
    fn test_long_prompt_title_is_accepted() {
        assert!(validate_prompt_text(&"x".repeat(5_000), "Body").is_ok());
    }

    #[test]
    fn test_settings_ranges() {
        assert!(validate_settings(&Settings::default()).is_ok());

        let mut settings = Settings::default();
        settings.font_size = 4;
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.tab_size = 0;
        assert!(validate_settings(&settings).is_err());

        let mut settings = Settings::default();
        settings.line_height = f64::NAN;
        assert!(validate_settings(&settings).is_err());
    }
}
