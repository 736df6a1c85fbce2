//! Startup wiring from configuration to adapters
//!
//! One `reqwest::Client` is built for the whole process and shared by all
//! provider clients; adapters and the judge hold `Arc`s to those clients.

use super::{AnthropicClient, OpenAiClient, ProviderKind};
use crate::config::{ConfigValidationError, FileConfig, FileEndpointConfig};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use triplet_application::{
    ChainStep, ChainedProviderAdapter, ProviderAdapter, ProviderClient, VerdictJudge,
};

/// Connection setup timeout; request timeouts are per chain step
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigValidationError),
}

/// Long-lived provider clients, one per API family
pub struct ProviderRegistry {
    clients: HashMap<ProviderKind, Arc<dyn ProviderClient>>,
}

impl ProviderRegistry {
    /// Build every client. Missing API keys are not an error here; calls
    /// through such a client fail with an authentication error instead.
    pub fn from_config(config: &FileConfig) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("triplet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let providers = &config.providers;
        let mut clients: HashMap<ProviderKind, Arc<dyn ProviderClient>> = HashMap::new();

        clients.insert(
            ProviderKind::OpenAi,
            Arc::new(Self::openai_compatible(
                ProviderKind::OpenAi,
                http.clone(),
                &providers.openai,
            )),
        );
        clients.insert(
            ProviderKind::DeepSeek,
            Arc::new(Self::openai_compatible(
                ProviderKind::DeepSeek,
                http.clone(),
                &providers.deepseek,
            )),
        );
        clients.insert(
            ProviderKind::Anthropic,
            Arc::new(AnthropicClient::new(
                http,
                &providers.anthropic.base_url,
                Self::api_key(ProviderKind::Anthropic, &providers.anthropic),
                providers.anthropic.api_key_env.clone(),
                providers.anthropic_version.clone(),
            )),
        );

        Ok(Self { clients })
    }

    fn openai_compatible(
        kind: ProviderKind,
        http: reqwest::Client,
        endpoint: &FileEndpointConfig,
    ) -> OpenAiClient {
        OpenAiClient::new(
            kind.as_str(),
            http,
            &endpoint.base_url,
            Self::api_key(kind, endpoint),
            endpoint.api_key_env.clone(),
        )
    }

    fn api_key(kind: ProviderKind, endpoint: &FileEndpointConfig) -> Option<String> {
        let key = endpoint.resolve_api_key();
        if key.is_none() {
            warn!("No API key for {} (set {})", kind, endpoint.api_key_env);
        }
        key
    }

    fn client(&self, name: &str, context: String) -> Result<Arc<dyn ProviderClient>, RegistryError> {
        name.parse::<ProviderKind>()
            .ok()
            .and_then(|kind| self.clients.get(&kind).cloned())
            .ok_or_else(|| {
                RegistryError::Config(ConfigValidationError::UnknownClient {
                    context,
                    client: name.to_string(),
                })
            })
    }

    /// One chained adapter per configured provider, in dispatch order
    pub fn build_adapters(
        &self,
        config: &FileConfig,
    ) -> Result<Vec<Arc<dyn ProviderAdapter>>, RegistryError> {
        let params = config.behavior.to_dispatch_params();
        let mut adapters: Vec<Arc<dyn ProviderAdapter>> = Vec::new();

        for id in config.provider_ids() {
            let chain = config
                .chain(&id)
                .ok_or_else(|| ConfigValidationError::MissingChain(id.to_string()))?;

            let mut steps = Vec::with_capacity(chain.len());
            for (index, file_step) in chain.iter().enumerate() {
                let client =
                    self.client(&file_step.client, format!("chains.{}[{}]", id, index))?;

                let mut step = ChainStep::new(client, file_step.model.clone())
                    .with_vision(file_step.vision)
                    .with_retryable(file_step.retryable)
                    .with_max_tokens(file_step.max_tokens);
                if file_step.substitute {
                    step = step.as_substitute();
                }
                if let Some(system) = &file_step.system_prompt {
                    step = step.with_system_prompt(system.clone());
                }
                if let Some(temperature) = file_step.temperature {
                    step = step.with_temperature(temperature);
                }
                if let Some(secs) = file_step.timeout_seconds {
                    step = step.with_timeout(Duration::from_secs(secs));
                }
                steps.push(step);
            }

            debug!("{} chain: {:?}", id, steps);
            adapters.push(Arc::new(ChainedProviderAdapter::new(id, steps, params)));
        }

        Ok(adapters)
    }

    pub fn build_judge(&self, config: &FileConfig) -> Result<VerdictJudge, RegistryError> {
        let client = self.client(&config.judge.client, "judge".to_string())?;
        Ok(VerdictJudge::new(client, config.judge.to_settings()))
    }
}
