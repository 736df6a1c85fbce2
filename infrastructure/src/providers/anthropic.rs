//! Anthropic Messages API client
//!
//! The Messages API differs from chat completions: the system prompt is a
//! top-level field, images are base64 content blocks placed before the
//! text, and the answer comes back as a list of content blocks.

use super::http::{endpoint, send_json};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use triplet_application::{CompletionRequest, GatewayError, ProviderClient};

/// Client for `POST {base_url}/v1/messages`
pub struct AnthropicClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
    api_version: String,
}

impl AnthropicClient {
    pub fn new(
        http: Client,
        base_url: &str,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint(base_url, "messages"),
            api_key,
            api_key_env: api_key_env.into(),
            api_version: api_version.into(),
        }
    }

    pub fn body(request: &CompletionRequest) -> Value {
        let mut content: Vec<Value> = request
            .images
            .iter()
            .map(|image| {
                json!({
                    "type": "image",
                    "source": {
                        "type": "base64",
                        "media_type": image.media_type(),
                        "data": image.payload(),
                    }
                })
            })
            .collect();
        content.push(json!({"type": "text", "text": request.prompt}));

        let mut body = json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "messages": [{"role": "user", "content": content}],
        });
        if let Some(system) = &request.system {
            body["system"] = json!(system);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Join the `text` content blocks; other block types are ignored
    pub fn normalize(raw: &Value) -> Result<String, GatewayError> {
        let blocks = raw
            .get("content")
            .and_then(Value::as_array)
            .ok_or_else(|| GatewayError::InvalidResponse("no content in response".to_string()))?;

        let text = blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl ProviderClient for AnthropicClient {
    fn name(&self) -> &str {
        "anthropic"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let Some(api_key) = &self.api_key else {
            return Err(GatewayError::Authentication(format!(
                "missing API key (set {})",
                self.api_key_env
            )));
        };

        let builder = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&Self::body(request));

        let raw = send_json(builder, self.name()).await?;
        Self::normalize(&raw)
    }
}
