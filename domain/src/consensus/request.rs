//! Consensus request

use super::attachment::Attachment;
use crate::core::{error::DomainError, prompt::Prompt};
use serde::Deserialize;

/// One consensus run: a final prompt, its attachments and whether to judge
#[derive(Debug, Clone)]
pub struct ConsensusRequest {
    prompt: Prompt,
    attachments: Vec<Attachment>,
    skip_verdict: bool,
}

impl ConsensusRequest {
    pub fn new(prompt: Prompt) -> Self {
        Self {
            prompt,
            attachments: Vec::new(),
            skip_verdict: false,
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Attachment>) -> Self {
        self.attachments = attachments;
        self
    }

    /// Skip the judge; a static comparison stub takes its place
    pub fn without_verdict(mut self) -> Self {
        self.skip_verdict = true;
        self
    }

    pub fn with_skip_verdict(mut self, skip: bool) -> Self {
        self.skip_verdict = skip;
        self
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn skip_verdict(&self) -> bool {
        self.skip_verdict
    }

    /// Whether any attachment carries image data that would reach a backend
    pub fn has_images(&self) -> bool {
        self.attachments.iter().any(Attachment::is_forwardable_image)
    }
}

/// Request body as it arrives on the wire
///
/// ```json
/// { "prompt": "...", "attachments": [{"name": "...", "type": "...", "base64": "..."}],
///   "skip_ai_verdict": false }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsensusRequestBody {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
    #[serde(default)]
    pub skip_ai_verdict: Option<bool>,
}

impl ConsensusRequestBody {
    /// Validate the body; an empty prompt is rejected before any dispatch.
    ///
    /// Attachments without a payload are dropped, as there is nothing to forward.
    pub fn into_request(self) -> Result<ConsensusRequest, DomainError> {
        let prompt = Prompt::try_new(self.prompt)?;
        let attachments = self
            .attachments
            .unwrap_or_default()
            .into_iter()
            .filter(|a| !a.is_empty())
            .collect();

        Ok(ConsensusRequest::new(prompt)
            .with_attachments(attachments)
            .with_skip_verdict(self.skip_ai_verdict.unwrap_or(false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_defaults() {
        let body: ConsensusRequestBody =
            serde_json::from_str(r#"{"prompt":"What is the capital of France?"}"#).unwrap();
        let request = body.into_request().unwrap();
        assert!(!request.skip_verdict());
        assert!(request.attachments().is_empty());
        assert!(!request.has_images());
    }

    #[test]
    fn test_body_rejects_blank_prompt() {
        let body: ConsensusRequestBody = serde_json::from_str(r#"{"prompt":"   "}"#).unwrap();
        assert_eq!(body.into_request().unwrap_err(), DomainError::EmptyPrompt);
    }

    #[test]
    fn test_body_missing_prompt_rejected() {
        let body: ConsensusRequestBody = serde_json::from_str("{}").unwrap();
        assert!(body.into_request().is_err());
    }

    #[test]
    fn test_empty_image_does_not_count() {
        let prompt = Prompt::try_new("Describe this").unwrap();
        let request = ConsensusRequest::new(prompt)
            .with_attachments(vec![Attachment::new("blank.png", "image/png", "")]);
        assert!(!request.has_images());
    }

    #[test]
    fn test_body_with_attachments_and_skip() {
        let body: ConsensusRequestBody = serde_json::from_str(
            r#"{
                "prompt": "Describe this",
                "attachments": [
                    {"name": "cat.png", "type": "image/png", "base64": "AAAA"},
                    {"name": "empty.png", "type": "image/png", "base64": ""}
                ],
                "skip_ai_verdict": true
            }"#,
        )
        .unwrap();

        let request = body.into_request().unwrap();
        assert!(request.skip_verdict());
        assert_eq!(request.attachments().len(), 1);
        assert!(request.has_images());
    }
}
