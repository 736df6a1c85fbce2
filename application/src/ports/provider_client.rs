//! Provider client port
//!
//! Defines the raw call contract of one LLM backend (one HTTP API).
//! A client knows nothing about fallback chains or retries; that policy
//! lives in [`ChainedProviderAdapter`](crate::use_cases::call_provider::ChainedProviderAdapter).

use async_trait::async_trait;
use thiserror::Error;
use triplet_domain::Attachment;

/// Errors a backend call can end with
///
/// The variants drive the fallback policy: only [`is_transient`](Self::is_transient)
/// errors are retried on the same step; everything else falls through.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Provider overloaded: {0}")]
    Overloaded(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl GatewayError {
    /// Capacity signals worth retrying on the same step
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Overloaded(_) | GatewayError::RateLimited(_)
        )
    }

    /// Short description safe to show to end users (no raw payloads)
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Overloaded(_) => "the service is overloaded, try again later".to_string(),
            GatewayError::RateLimited(_) => "rate limit reached, try again later".to_string(),
            GatewayError::Authentication(_) => {
                "authentication failed (invalid or missing API key)".to_string()
            }
            GatewayError::InvalidRequest(_) => "the request was rejected as invalid".to_string(),
            GatewayError::ModelNotAvailable(m) => format!("model not available ({})", m),
            GatewayError::Timeout => "the request timed out".to_string(),
            GatewayError::ConnectionError(_) => "could not connect to the service".to_string(),
            GatewayError::InvalidResponse(_) => {
                "the service returned an unreadable response".to_string()
            }
            GatewayError::RequestFailed(_) => "the request failed".to_string(),
        }
    }
}

/// One completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: Option<String>,
    pub prompt: String,
    /// Image attachments; empty unless the step declared vision support
    pub images: Vec<Attachment>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            prompt: prompt.into(),
            images: Vec::new(),
            max_tokens: 2000,
            temperature: None,
        }
    }
}

/// A long-lived handle to one LLM backend
///
/// Built once at startup and shared read-only across requests.
/// Implementations normalize the backend's response shape into plain text.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Backend name for logs ("openai", "anthropic", ...)
    fn name(&self) -> &str;

    /// Send one completion request and return the answer text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}
