//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Prompt is required")]
    EmptyPrompt,

    #[error("No providers configured")]
    NoProviders,

    #[error("Provider configured more than once: {0}")]
    DuplicateProvider(String),

    #[error("Provider id is reserved: {0}")]
    ReservedProviderId(String),

    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),
}

impl DomainError {
    /// Whether this error was caused by the caller's request rather than configuration
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyPrompt | DomainError::InvalidAttachment(_)
        )
    }
}
