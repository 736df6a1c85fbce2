//! Fallback chain configuration from TOML (`[[chains.<provider>]]` arrays)
//!
//! Each provider id maps to an ordered list of steps. The first step is the
//! preferred path; later steps are tried in order when earlier ones fail.
//!
//! ```toml
//! [[chains.deepseek]]
//! client = "deepseek"
//! model = "deepseek-chat"
//! system_prompt = "You are a helpful AI assistant. Always respond in English."
//!
//! [[chains.deepseek]]
//! client = "openai"
//! model = "gpt-4o-mini"
//! substitute = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// System instruction for DeepSeek steps
pub const DEEPSEEK_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Always respond in English.";

fn default_true() -> bool {
    true
}

fn default_max_tokens() -> u32 {
    2000
}

/// One step of a fallback chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChainStep {
    /// Backend: "openai", "anthropic" or "deepseek"
    pub client: String,
    pub model: String,
    /// Whether image attachments are forwarded to this step
    #[serde(default)]
    pub vision: bool,
    /// Answer comes from another provider; prefixed with the fallback notice
    #[serde(default)]
    pub substitute: bool,
    /// Retry overload/rate-limit failures on this step
    #[serde(default = "default_true")]
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Overrides `[behavior] step_timeout_seconds`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl FileChainStep {
    pub fn new(client: &str, model: &str) -> Self {
        Self {
            client: client.to_string(),
            model: model.to_string(),
            vision: false,
            substitute: false,
            retryable: true,
            system_prompt: None,
            max_tokens: default_max_tokens(),
            temperature: None,
            timeout_seconds: None,
        }
    }

    fn vision(mut self) -> Self {
        self.vision = true;
        self
    }

    fn substitute(mut self) -> Self {
        self.substitute = true;
        self
    }

    fn system(mut self, prompt: &str) -> Self {
        self.system_prompt = Some(prompt.to_string());
        self
    }
}

/// Built-in chains for the default provider set
pub fn default_chains() -> BTreeMap<String, Vec<FileChainStep>> {
    let mut chains = BTreeMap::new();

    chains.insert(
        "gpt".to_string(),
        vec![
            FileChainStep::new("openai", "gpt-4o").vision(),
            FileChainStep::new("openai", "gpt-4o-mini").vision(),
            FileChainStep::new("anthropic", "claude-sonnet-4-20250514")
                .vision()
                .substitute(),
        ],
    );

    chains.insert(
        "claude".to_string(),
        vec![
            FileChainStep::new("anthropic", "claude-opus-4-5-20251101").vision(),
            FileChainStep::new("anthropic", "claude-sonnet-4-20250514").vision(),
            FileChainStep::new("openai", "gpt-4o").vision().substitute(),
        ],
    );

    chains.insert(
        "deepseek".to_string(),
        vec![
            FileChainStep::new("deepseek", "deepseek-chat").system(DEEPSEEK_SYSTEM_PROMPT),
            FileChainStep::new("deepseek", "deepseek-reasoner").system(DEEPSEEK_SYSTEM_PROMPT),
            FileChainStep::new("openai", "gpt-4o-mini").substitute(),
        ],
    );

    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chains_cover_default_providers() {
        let chains = default_chains();
        for id in ["gpt", "claude", "deepseek"] {
            let chain = &chains[id];
            assert_eq!(chain.len(), 3);
            assert!(!chain[0].substitute);
            assert!(chain.last().unwrap().substitute);
        }
        assert!(!chains["deepseek"][0].vision);
        assert_eq!(
            chains["deepseek"][0].system_prompt.as_deref(),
            Some(DEEPSEEK_SYSTEM_PROMPT)
        );
    }

    #[test]
    fn test_step_defaults() {
        let step: FileChainStep = toml::from_str(
            r#"
client = "openai"
model = "gpt-4o"
"#,
        )
        .unwrap();
        assert!(step.retryable);
        assert!(!step.vision);
        assert!(!step.substitute);
        assert_eq!(step.max_tokens, 2000);
        assert_eq!(step.timeout_seconds, None);
    }
}
