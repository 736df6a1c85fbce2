//! Fallback chain execution for one provider
//!
//! A provider is described as data: an ordered list of [`ChainStep`]s.
//! [`ChainedProviderAdapter`] walks the chain until one step answers:
//!
//! 1. transient failures (overload, rate limit) are retried on the same step
//!    with exponential backoff, when the step is `retryable`;
//! 2. any other failure, an empty answer, or a timeout falls through to the
//!    next step;
//! 3. answers from a `substitute` step are prefixed with the fallback notice.
//!
//! When every step fails the adapter still returns a [`ProviderResult`],
//! marked as an error.

use crate::config::DispatchParams;
use crate::ports::provider_adapter::ProviderAdapter;
use crate::ports::provider_client::{CompletionRequest, GatewayError, ProviderClient};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use triplet_domain::{Attachment, NoticeTemplate, ProviderId, ProviderResult};

/// One backend/model pair in a fallback chain
#[derive(Clone)]
pub struct ChainStep {
    client: Arc<dyn ProviderClient>,
    model: String,
    system_prompt: Option<String>,
    vision: bool,
    retryable: bool,
    substitute: bool,
    max_tokens: u32,
    temperature: Option<f32>,
    timeout: Option<Duration>,
}

impl ChainStep {
    pub fn new(client: Arc<dyn ProviderClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: None,
            vision: false,
            retryable: true,
            substitute: false,
            max_tokens: 2000,
            temperature: None,
            timeout: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    pub fn with_vision(mut self, vision: bool) -> Self {
        self.vision = vision;
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Mark the step as served by another provider
    pub fn as_substitute(mut self) -> Self {
        self.substitute = true;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Override the dispatch-wide step timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn supports_vision(&self) -> bool {
        self.vision
    }

    pub fn is_substitute(&self) -> bool {
        self.substitute
    }

    fn request(&self, prompt: &str, attachments: &[Attachment]) -> CompletionRequest {
        let images = if self.vision {
            attachments
                .iter()
                .filter(|a| a.is_forwardable_image())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        CompletionRequest {
            model: self.model.clone(),
            system: self.system_prompt.clone(),
            prompt: prompt.to_string(),
            images,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

impl std::fmt::Debug for ChainStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainStep")
            .field("client", &self.client.name())
            .field("model", &self.model)
            .field("vision", &self.vision)
            .field("retryable", &self.retryable)
            .field("substitute", &self.substitute)
            .finish()
    }
}

/// Generic provider adapter driven by a fallback chain
pub struct ChainedProviderAdapter {
    id: ProviderId,
    steps: Vec<ChainStep>,
    params: DispatchParams,
}

impl ChainedProviderAdapter {
    pub fn new(id: ProviderId, steps: Vec<ChainStep>, params: DispatchParams) -> Self {
        Self { id, steps, params }
    }

    pub fn steps(&self) -> &[ChainStep] {
        &self.steps
    }

    /// Run one step, retrying transient failures when allowed
    async fn run_step(
        &self,
        step: &ChainStep,
        request: &CompletionRequest,
    ) -> Result<String, GatewayError> {
        let max_attempts = if step.retryable {
            self.params.retry.max_attempts
        } else {
            1
        };
        let step_timeout = step.timeout.unwrap_or(self.params.step_timeout);

        let mut attempt = 1;
        loop {
            let error =
                match tokio::time::timeout(step_timeout, step.client.complete(request)).await {
                    Ok(Ok(text)) if !text.trim().is_empty() => return Ok(text),
                    Ok(Ok(_)) => GatewayError::InvalidResponse("empty answer".to_string()),
                    Ok(Err(e)) => e,
                    Err(_) => GatewayError::Timeout,
                };

            if !error.is_transient() || attempt >= max_attempts {
                return Err(error);
            }

            let delay = self.params.retry.delay_after(attempt);
            warn!(
                "{} ({}) attempt {}/{} failed: {}; retrying in {:?}",
                self.id,
                step.model,
                attempt,
                max_attempts,
                error,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl ProviderAdapter for ChainedProviderAdapter {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn supports_vision(&self) -> bool {
        self.steps.first().is_some_and(|s| s.vision)
    }

    async fn call(&self, prompt: &str, attachments: &[Attachment]) -> ProviderResult {
        let start = Instant::now();
        let has_images = attachments.iter().any(Attachment::is_forwardable_image);
        let mut last_error: Option<GatewayError> = None;

        for (index, step) in self.steps.iter().enumerate() {
            debug!(
                "{} step {} -> {} via {}",
                self.id,
                index + 1,
                step.model,
                step.client.name()
            );
            let request = step.request(prompt, attachments);

            match self.run_step(step, &request).await {
                Ok(answer) => {
                    let mut text = if step.substitute {
                        format!("{}\n\n{}", NoticeTemplate::fallback_prefix(), answer)
                    } else {
                        answer
                    };
                    if has_images && !step.vision {
                        text.push_str(NoticeTemplate::vision_limitation());
                    }

                    let elapsed = start.elapsed().as_millis() as u64;
                    info!("{} answered via {} in {}ms", self.id, step.model, elapsed);
                    return ProviderResult::success(self.id.clone(), text, elapsed);
                }
                Err(e) => {
                    warn!("{} step {} ({}) failed: {}", self.id, index + 1, step.model, e);
                    last_error = Some(e);
                }
            }
        }

        let description = last_error
            .map(|e| e.user_message())
            .unwrap_or_else(|| "no backend is configured".to_string());
        let elapsed = start.elapsed().as_millis() as u64;
        warn!("{} exhausted its fallback chain: {}", self.id, description);

        ProviderResult::failure(
            self.id.clone(),
            NoticeTemplate::provider_error(&self.id, &description),
            elapsed,
        )
    }
}
