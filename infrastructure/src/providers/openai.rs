//! OpenAI-compatible chat completions client
//!
//! Also serves DeepSeek, whose API speaks the same wire format.

use super::http::{endpoint, send_json};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use triplet_application::{CompletionRequest, GatewayError, ProviderClient};

/// Client for `POST {base_url}/v1/chat/completions`
pub struct OpenAiClient {
    name: String,
    http: Client,
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl OpenAiClient {
    /// `api_key` may be missing; calls then fail with an authentication error.
    pub fn new(
        name: impl Into<String>,
        http: Client,
        base_url: &str,
        api_key: Option<String>,
        api_key_env: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            http,
            endpoint: endpoint(base_url, "chat/completions"),
            api_key,
            api_key_env: api_key_env.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Request body for one completion
    pub fn body(request: &CompletionRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.system {
            messages.push(json!({"role": "system", "content": system}));
        }

        let content = if request.images.is_empty() {
            json!(request.prompt)
        } else {
            let mut parts = vec![json!({"type": "text", "text": request.prompt})];
            parts.extend(request.images.iter().map(|image| {
                json!({"type": "image_url", "image_url": {"url": image.data_url()}})
            }));
            Value::Array(parts)
        };
        messages.push(json!({"role": "user", "content": content}));

        let mut body = json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": request.max_tokens,
        });
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        body
    }

    /// Answer text from `choices[0].message.content`, a string or a list of text parts
    pub fn normalize(raw: &Value) -> Result<String, GatewayError> {
        let content = raw
            .pointer("/choices/0/message/content")
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))?;

        match content {
            Value::String(text) => Ok(text.trim().to_string()),
            Value::Array(parts) => Ok(parts
                .iter()
                .filter_map(|part| match part {
                    Value::String(s) => Some(s.as_str()),
                    other => other.get("text").and_then(Value::as_str),
                })
                .collect::<Vec<_>>()
                .join("")
                .trim()
                .to_string()),
            Value::Null => Ok(String::new()),
            other => Err(GatewayError::InvalidResponse(format!(
                "unexpected content type: {}",
                other
            ))),
        }
    }
}

#[async_trait]
impl ProviderClient for OpenAiClient {
    fn name(&self) -> &str {
        &self.name
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
            .bearer_auth(api_key)
            .json(&Self::body(request));

        let raw = send_json(builder, &self.name).await?;
        Self::normalize(&raw)
    }
}
