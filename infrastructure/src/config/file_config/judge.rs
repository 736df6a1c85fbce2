//! Verdict judge configuration from TOML (`[judge]` section)

use serde::{Deserialize, Serialize};
use std::time::Duration;
use triplet_application::JudgeSettings;

/// Judge model settings
///
/// # Example
///
/// ```toml
/// [judge]
/// client = "openai"
/// model = "gpt-4o"
/// temperature = 0.3
/// max_tokens = 900
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJudgeConfig {
    /// Backend hosting the judge: "openai", "anthropic" or "deepseek"
    pub client: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for FileJudgeConfig {
    fn default() -> Self {
        let settings = JudgeSettings::default();
        Self {
            client: "openai".to_string(),
            model: settings.model,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout_seconds: settings.timeout.as_secs(),
        }
    }
}

impl FileJudgeConfig {
    pub fn to_settings(&self) -> JudgeSettings {
        JudgeSettings {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout: Duration::from_secs(self.timeout_seconds),
        }
    }
}
