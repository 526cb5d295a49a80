//! Validated text types shared across PromptDesk crates.
//!
//! Prompt bodies are user-authored and whitespace can be meaningful (indentation inside a
//! template, trailing newlines before a placeholder), so these types validate without rewriting
//! the input.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees at least one non-whitespace character.
///
/// Unlike a trimmed identifier, the original input is kept byte-for-byte. There is no length
/// bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is empty or contains only whitespace.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let input = input.into();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(input))
    }
}
