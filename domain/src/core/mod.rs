//! Core domain concepts shared across all subdomains.
//!
//! - [`provider_id::ProviderId`]: stable logical name of a provider ("gpt", "claude", ...)
//! - [`prompt::Prompt`]: a validated, final prompt to dispatch
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod prompt;
pub mod provider_id;
pub mod string;
