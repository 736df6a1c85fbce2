//! Dispatch configuration from TOML (`[triplet]` section)

use serde::{Deserialize, Serialize};

/// Which providers run, in dispatch order
///
/// # Example
///
/// ```toml
/// [triplet]
/// providers = ["gpt", "claude", "deepseek"]
/// skip_verdict = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTripletConfig {
    /// Logical provider ids; each needs a `[[chains.<id>]]` entry
    pub providers: Vec<String>,
    /// Skip the AI verdict unless the request asks for it
    pub skip_verdict: bool,
}

impl Default for FileTripletConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                "gpt".to_string(),
                "claude".to_string(),
                "deepseek".to_string(),
            ],
            skip_verdict: false,
        }
    }
}
