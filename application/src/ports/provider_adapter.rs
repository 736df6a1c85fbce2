//! Provider adapter port
//!
//! What the dispatch coordinator sees of a provider: a total call that
//! always yields a [`ProviderResult`].

use async_trait::async_trait;
use triplet_domain::{Attachment, ProviderId, ProviderResult};

#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Stable logical id ("gpt", "claude", ...)
    fn id(&self) -> &ProviderId;

    /// Whether the preferred path of this provider accepts images
    fn supports_vision(&self) -> bool;

    /// Run the prompt. Never fails: errors come back as `is_error` results.
    async fn call(&self, prompt: &str, attachments: &[Attachment]) -> ProviderResult;
}
