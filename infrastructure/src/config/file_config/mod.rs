//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; [`FileConfig::validate`] checks the
//! cross-section references (providers ↔ chains ↔ clients).

mod behavior;
mod chains;
mod judge;
mod logging;
mod output;
mod providers;
mod triplet;

pub use behavior::FileBehaviorConfig;
pub use chains::{DEEPSEEK_SYSTEM_PROMPT, FileChainStep, default_chains};
pub use judge::FileJudgeConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{ANTHROPIC_API_VERSION, FileEndpointConfig, FileProvidersConfig};
pub use triplet::FileTripletConfig;

use crate::providers::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use triplet_domain::ProviderId;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("triplet.providers cannot be empty")]
    NoProviders,

    #[error("provider '{0}' is listed more than once")]
    DuplicateProvider(String),

    #[error("provider id '{0}' is reserved")]
    ReservedProvider(String),

    #[error("provider '{0}' has no [[chains.{0}]] entries")]
    MissingChain(String),

    #[error("{context}: unknown client '{client}' (expected openai, anthropic or deepseek)")]
    UnknownClient { context: String, client: String },

    #[error("{0}: model name cannot be empty")]
    EmptyModelName(String),

    #[error("{0}: timeout cannot be 0")]
    InvalidTimeout(String),

    #[error("behavior.max_attempts must be at least 1")]
    InvalidAttempts,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider set and dispatch defaults
    pub triplet: FileTripletConfig,
    /// Verdict judge
    pub judge: FileJudgeConfig,
    /// Timeouts and retries
    pub behavior: FileBehaviorConfig,
    /// HTTP endpoints and credentials
    pub providers: FileProvidersConfig,
    /// Fallback chain per provider id
    pub chains: BTreeMap<String, Vec<FileChainStep>>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Log destinations
    pub logging: FileLoggingConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            triplet: FileTripletConfig::default(),
            judge: FileJudgeConfig::default(),
            behavior: FileBehaviorConfig::default(),
            providers: FileProvidersConfig::default(),
            chains: default_chains(),
            output: FileOutputConfig::default(),
            logging: FileLoggingConfig::default(),
        }
    }
}

impl FileConfig {
    /// Configured provider ids in dispatch order
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.triplet
            .providers
            .iter()
            .map(|p| ProviderId::new(p.as_str()))
            .collect()
    }

    /// Chain for a provider id, if one is configured
    pub fn chain(&self, provider_id: &ProviderId) -> Option<&[FileChainStep]> {
        self.chains
            .get(provider_id.as_str())
            .map(Vec::as_slice)
            .filter(|c| !c.is_empty())
    }

    /// Validate the entire configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        // 1. Provider set
        if self.triplet.providers.is_empty() {
            errors.push(ConfigValidationError::NoProviders);
        }
        let mut seen = HashSet::new();
        for id in self.provider_ids() {
            if id.is_reserved() {
                errors.push(ConfigValidationError::ReservedProvider(id.to_string()));
            }
            if !seen.insert(id.clone()) {
                errors.push(ConfigValidationError::DuplicateProvider(id.to_string()));
            }
        }

        // 2. Chains of configured providers
        for id in seen.iter().filter(|id| !id.is_reserved()) {
            let Some(chain) = self.chain(id) else {
                errors.push(ConfigValidationError::MissingChain(id.to_string()));
                continue;
            };
            for (index, step) in chain.iter().enumerate() {
                let context = format!("chains.{}[{}]", id, index);
                if step.client.parse::<ProviderKind>().is_err() {
                    errors.push(ConfigValidationError::UnknownClient {
                        context: context.clone(),
                        client: step.client.clone(),
                    });
                }
                if step.model.trim().is_empty() {
                    errors.push(ConfigValidationError::EmptyModelName(context.clone()));
                }
                if step.timeout_seconds == Some(0) {
                    errors.push(ConfigValidationError::InvalidTimeout(context));
                }
            }
        }

        // 3. Judge
        if self.judge.client.parse::<ProviderKind>().is_err() {
            errors.push(ConfigValidationError::UnknownClient {
                context: "judge".to_string(),
                client: self.judge.client.clone(),
            });
        }
        if self.judge.model.trim().is_empty() {
            errors.push(ConfigValidationError::EmptyModelName("judge".to_string()));
        }
        if self.judge.timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidTimeout("judge".to_string()));
        }

        // 4. Behavior
        if self.behavior.step_timeout_seconds == 0 {
            errors.push(ConfigValidationError::InvalidTimeout(
                "behavior.step_timeout_seconds".to_string(),
            ));
        }
        if self.behavior.max_attempts == 0 {
            errors.push(ConfigValidationError::InvalidAttempts);
        }

        errors
    }
}
