//! Provider endpoint configuration from TOML (`[providers]` section)

use serde::{Deserialize, Deserializer, Serialize};

/// Anthropic API version header value.
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// One HTTP backend.
///
/// There is no provider-neutral default: a partial section is filled from
/// the defaults of the backend it configures (see [`FileProvidersConfig`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEndpointConfig {
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Direct API key (not recommended; prefer the env var).
    pub api_key: Option<String>,
    /// Base URL without the `/v1/...` path.
    pub base_url: String,
}

impl FileEndpointConfig {
    fn new(api_key_env: &str, base_url: &str) -> Self {
        Self {
            api_key_env: api_key_env.to_string(),
            api_key: None,
            base_url: base_url.to_string(),
        }
    }

    pub fn openai() -> Self {
        Self::new("OPENAI_API_KEY", "https://api.openai.com")
    }

    pub fn anthropic() -> Self {
        Self::new("ANTHROPIC_API_KEY", "https://api.anthropic.com")
    }

    pub fn deepseek() -> Self {
        Self::new("DEEPSEEK_API_KEY", "https://api.deepseek.com")
    }

    /// Explicit key first, then the environment. Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Fields a `[providers.<backend>]` section may set
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointOverrides {
    api_key_env: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
}

impl EndpointOverrides {
    fn apply_to(self, mut endpoint: FileEndpointConfig) -> FileEndpointConfig {
        if let Some(env) = self.api_key_env {
            endpoint.api_key_env = env;
        }
        if self.api_key.is_some() {
            endpoint.api_key = self.api_key;
        }
        if let Some(url) = self.base_url {
            endpoint.base_url = url;
        }
        endpoint
    }
}

fn openai_endpoint<'de, D: Deserializer<'de>>(d: D) -> Result<FileEndpointConfig, D::Error> {
    Ok(EndpointOverrides::deserialize(d)?.apply_to(FileEndpointConfig::openai()))
}

fn anthropic_endpoint<'de, D: Deserializer<'de>>(d: D) -> Result<FileEndpointConfig, D::Error> {
    Ok(EndpointOverrides::deserialize(d)?.apply_to(FileEndpointConfig::anthropic()))
}

fn deepseek_endpoint<'de, D: Deserializer<'de>>(d: D) -> Result<FileEndpointConfig, D::Error> {
    Ok(EndpointOverrides::deserialize(d)?.apply_to(FileEndpointConfig::deepseek()))
}

fn default_api_version() -> String {
    ANTHROPIC_API_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileProvidersConfig {
    #[serde(default = "FileEndpointConfig::openai", deserialize_with = "openai_endpoint")]
    pub openai: FileEndpointConfig,
    #[serde(
        default = "FileEndpointConfig::anthropic",
        deserialize_with = "anthropic_endpoint"
    )]
    pub anthropic: FileEndpointConfig,
    #[serde(
        default = "FileEndpointConfig::deepseek",
        deserialize_with = "deepseek_endpoint"
    )]
    pub deepseek: FileEndpointConfig,
    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub anthropic_version: String,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            openai: FileEndpointConfig::openai(),
            anthropic: FileEndpointConfig::anthropic(),
            deepseek: FileEndpointConfig::deepseek(),
            anthropic_version: default_api_version(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[deepseek]
base_url = "http://localhost:9000"
"#,
        )
        .unwrap();
        assert_eq!(config.deepseek.base_url, "http://localhost:9000");
        assert_eq!(config.deepseek.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(config.anthropic.base_url, "https://api.anthropic.com");
        assert_eq!(config.anthropic_version, "2023-06-01");
    }

    #[test]
    fn test_partial_section_never_borrows_openai_endpoint() {
        let config: FileProvidersConfig = toml::from_str(
            r#"
[anthropic]
base_url = "http://localhost:9100"

[deepseek]
api_key = "sk-deepseek"
"#,
        )
        .unwrap();
        assert_eq!(config.anthropic.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(config.anthropic.base_url, "http://localhost:9100");
        assert_eq!(config.deepseek.api_key_env, "DEEPSEEK_API_KEY");
        assert_eq!(config.deepseek.base_url, "https://api.deepseek.com");
        assert_eq!(config.deepseek.api_key.as_deref(), Some("sk-deepseek"));
        assert_eq!(config.openai, FileEndpointConfig::openai());
    }

    #[test]
    fn test_explicit_key_wins_and_blank_is_missing() {
        let mut endpoint = FileEndpointConfig::new("TRIPLET_TEST_UNSET_KEY_VAR", "http://x");
        assert_eq!(endpoint.resolve_api_key(), None);

        endpoint.api_key = Some("   ".to_string());
        assert_eq!(endpoint.resolve_api_key(), None);

        endpoint.api_key = Some("sk-test".to_string());
        assert_eq!(endpoint.resolve_api_key().as_deref(), Some("sk-test"));
    }
}
