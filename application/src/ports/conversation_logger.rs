//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording what each run
//! produced (provider answers, verdicts, run summaries) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the transcript in
//! a machine-readable format (JSONL). Provider results are logged even when
//! the streaming caller has already gone away.

use serde_json::{Value, json};
use triplet_domain::{ProviderResult, VerdictReport};

/// A structured conversation event for logging.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "provider_result", "verdict").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn provider_result(result: &ProviderResult) -> Self {
        Self::new(
            "provider_result",
            json!({
                "provider": result.provider_id().as_str(),
                "is_error": result.is_error(),
                "elapsed_ms": result.elapsed_ms(),
                "chars": result.text().chars().count(),
                "text": result.text(),
            }),
        )
    }

    pub fn verdict(report: &VerdictReport) -> Self {
        Self::new(
            "verdict",
            json!({
                "kind": report.kind.to_string(),
                "judge": report.judge,
                "label_to_provider": report.label_to_provider,
                "scores": report.scores,
                "synthesized_answer": report.synthesized_answer,
            }),
        )
    }

    pub fn run_complete(mode: &str, providers: usize, failed: usize, total_elapsed_ms: u64) -> Self {
        Self::new(
            "consensus_complete",
            json!({
                "mode": mode,
                "providers": providers,
                "failed": failed,
                "total_elapsed_ms": total_elapsed_ms,
            }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// The `log` method is synchronous and non-fallible so it can never disturb
/// a consensus run; logging failures are ignored by implementations.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use triplet_domain::ProviderId;

    #[test]
    fn test_provider_result_payload() {
        let result = ProviderResult::failure(ProviderId::claude(), "Claude Error: x", 12);
        let event = ConversationEvent::provider_result(&result);
        assert_eq!(event.event_type, "provider_result");
        assert_eq!(event.payload["provider"], "claude");
        assert_eq!(event.payload["is_error"], true);
        assert_eq!(event.payload["elapsed_ms"], 12);
    }

    #[test]
    fn test_verdict_payload() {
        let event = ConversationEvent::verdict(&VerdictReport::fallback());
        assert_eq!(event.payload["kind"], "fallback");
        assert!(event.payload["scores"].as_object().unwrap().is_empty());
    }
}
