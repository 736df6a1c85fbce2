//! Provider identity value object

use serde::{Deserialize, Serialize};

/// Stable logical name of a provider (Value Object)
///
/// This is the role a backend plays in a consensus run ("gpt", "claude",
/// "deepseek"), not a concrete model string. Which model actually answered
/// after a fallback is an adapter detail and never changes the id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    /// Key used on the wire for the verdict entry; no provider may take it.
    pub const VERDICT: &'static str = "verdict";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_lowercase())
    }

    pub fn gpt() -> Self {
        Self::new("gpt")
    }

    pub fn claude() -> Self {
        Self::new("claude")
    }

    pub fn deepseek() -> Self {
        Self::new("deepseek")
    }

    /// The default dispatch set, in caller order
    pub fn default_set() -> Vec<ProviderId> {
        vec![Self::gpt(), Self::claude(), Self::deepseek()]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id collides with a key reserved by the wire format
    pub fn is_reserved(&self) -> bool {
        self.0 == Self::VERDICT || self.0 == "done" || self.0 == "error"
    }

    /// Human-facing name used in error texts and console output
    pub fn display_name(&self) -> String {
        match self.0.as_str() {
            "gpt" => "GPT".to_string(),
            "claude" => "Claude".to_string(),
            "deepseek" => "DeepSeek".to_string(),
            other => {
                let mut chars = other.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        ProviderId::new(s)
    }
}

impl From<String> for ProviderId {
    fn from(s: String) -> Self {
        ProviderId::new(s)
    }
}
