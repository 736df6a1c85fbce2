//! Verdict judge settings.

use std::time::Duration;

/// Model and sampling parameters for the blind judge
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeSettings {
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: Some(0.3),
            max_tokens: 900,
            timeout: Duration::from_secs(90),
        }
    }
}

impl JudgeSettings {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
