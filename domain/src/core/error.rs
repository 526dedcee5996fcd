//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Please enter a prompt")]
    EmptyPrompt,

    #[error("No content received from the API")]
    EmptyContent,

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),
}

impl DomainError {
    /// Whether this error was caused by user input rather than an upstream service
    pub fn is_user_input(&self) -> bool {
        matches!(self, DomainError::EmptyPrompt | DomainError::InvalidUserId(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_prompt_display() {
        assert_eq!(DomainError::EmptyPrompt.to_string(), "Please enter a prompt");
    }

    #[test]
    fn test_empty_content_display() {
        assert_eq!(
            DomainError::EmptyContent.to_string(),
            "No content received from the API"
        );
    }

    #[test]
    fn test_is_user_input() {
        assert!(DomainError::EmptyPrompt.is_user_input());
        assert!(DomainError::InvalidUserId(String::new()).is_user_input());
        assert!(!DomainError::EmptyContent.is_user_input());
    }
}
