//! Blind verdict use case
//!
//! Scores the successful answers of one run under anonymous labels and asks
//! the judge for a synthesized best answer. Best-effort: every outcome,
//! including a failed judge call, is a [`VerdictReport`].

use crate::config::JudgeSettings;
use crate::ports::provider_client::{CompletionRequest, ProviderClient};
use std::sync::Arc;
use tracing::{debug, info, warn};
use triplet_domain::{
    ProviderId, ProviderResult, VerdictReport, VerdictTemplate, assign_labels, parse_verdict,
};

/// Source of label permutation seeds
pub trait SeedSource: Send + Sync {
    fn next_seed(&self) -> u64;
}

/// Fresh OS-seeded entropy for every evaluation
pub struct EntropySeed;

impl SeedSource for EntropySeed {
    fn next_seed(&self) -> u64 {
        rand::random()
    }
}

/// The blind judge
pub struct VerdictJudge {
    client: Arc<dyn ProviderClient>,
    settings: JudgeSettings,
    seeds: Arc<dyn SeedSource>,
}

impl VerdictJudge {
    pub fn new(client: Arc<dyn ProviderClient>, settings: JudgeSettings) -> Self {
        Self {
            client,
            settings,
            seeds: Arc::new(EntropySeed),
        }
    }

    pub fn with_seed_source(mut self, seeds: Arc<dyn SeedSource>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Evaluate the results of one run against the original question.
    pub async fn evaluate(&self, question: &str, results: &[ProviderResult]) -> VerdictReport {
        let usable: Vec<&ProviderResult> = results.iter().filter(|r| !r.is_error()).collect();
        if usable.len() < 2 {
            info!(
                "Skipping judge: {} usable answer(s), at least 2 needed",
                usable.len()
            );
            return VerdictReport::unavailable(usable.len());
        }

        let ids: Vec<ProviderId> = usable.iter().map(|r| r.provider_id().clone()).collect();
        let assignment = assign_labels(&ids, self.seeds.next_seed());

        let labeled: Vec<(String, String)> = assignment
            .iter()
            .filter_map(|(label, id)| {
                usable
                    .iter()
                    .find(|r| r.provider_id() == id)
                    .map(|r| (label.to_string(), r.text().to_string()))
            })
            .collect();

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            system: Some(VerdictTemplate::judge_system().to_string()),
            prompt: VerdictTemplate::evaluation_prompt(question, &labeled),
            images: Vec::new(),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        debug!(
            "Judging {} labels with {} via {}",
            labeled.len(),
            self.settings.model,
            self.client.name()
        );

        let response =
            match tokio::time::timeout(self.settings.timeout, self.client.complete(&request)).await
            {
                Ok(Ok(text)) if !text.trim().is_empty() => text,
                Ok(Ok(_)) => {
                    warn!("Judge returned an empty answer");
                    return VerdictReport::fallback();
                }
                Ok(Err(e)) => {
                    warn!("Judge call failed: {}", e);
                    return VerdictReport::fallback();
                }
                Err(_) => {
                    warn!("Judge call timed out after {:?}", self.settings.timeout);
                    return VerdictReport::fallback();
                }
            };

        let parsed = parse_verdict(&response, &assignment.labels());
        if parsed.scores.len() < labeled.len() {
            warn!(
                "Judge scored {} of {} labels",
                parsed.scores.len(),
                labeled.len()
            );
        }
        let answer = parsed
            .synthesized_answer
            .unwrap_or_else(|| response.trim().to_string());

        VerdictReport::judged(
            self.settings.model.clone(),
            assignment.into_map(),
            parsed.scores,
            answer,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider_client::GatewayError;
    use crate::testing::{FixedSeed, ScriptedClient};
    use std::collections::HashSet;
    use triplet_domain::VerdictKind;

    const JUDGE_ANSWER: &str = r#"```json
{"scores": {"A": {"score": 9, "rationale": "precise"},
            "B": {"score": 7, "rationale": "correct but terse"},
            "C": {"score": 8, "rationale": "good context"}},
 "synthesized_answer": "Paris is the capital of France."}
```"#;

    fn paris_results() -> Vec<ProviderResult> {
        vec![
            ProviderResult::success(ProviderId::gpt(), "The capital of France is Paris.", 900),
            ProviderResult::success(ProviderId::claude(), "Paris.", 700),
            ProviderResult::success(ProviderId::deepseek(), "Paris, on the Seine.", 800),
        ]
    }

    #[tokio::test]
    async fn test_scores_every_usable_answer() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client.clone(), JudgeSettings::default());

        let report = judge
            .evaluate("What is the capital of France?", &paris_results())
            .await;

        assert_eq!(report.kind, VerdictKind::Judged);
        assert_eq!(report.scores.len(), 3);
        assert_eq!(report.label_to_provider.len(), 3);
        assert!(report.synthesized_answer.contains("Paris"));
        assert_eq!(report.judge.as_deref(), Some("gpt-4o"));
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_judge_prompt_is_anonymous() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client.clone(), JudgeSettings::default());
        judge.evaluate("Capital?", &paris_results()).await;

        let request = client.last_request().unwrap();
        for name in ["gpt", "GPT", "claude", "Claude", "deepseek", "DeepSeek"] {
            assert!(!request.prompt.contains(name));
        }
        assert!(request.prompt.contains("Paris, on the Seine."));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_errors_are_not_judged() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client.clone(), JudgeSettings::default());
        let results = vec![
            ProviderResult::success(ProviderId::gpt(), "Paris.", 1),
            ProviderResult::success(ProviderId::claude(), "Paris!", 1),
            ProviderResult::failure(ProviderId::deepseek(), "DeepSeek Error: auth", 1),
        ];

        let report = judge.evaluate("Capital?", &results).await;
        assert_eq!(report.label_to_provider.len(), 2);
        assert!(
            !report
                .label_to_provider
                .values()
                .any(|id| id == &ProviderId::deepseek())
        );
        // "C" was never assigned, so the judge's score for it is discarded
        assert_eq!(report.scores.len(), 2);
        assert!(!client.last_request().unwrap().prompt.contains("DeepSeek Error"));
    }

    #[tokio::test]
    async fn test_fewer_than_two_answers_skips_the_judge() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client.clone(), JudgeSettings::default());
        let results = vec![
            ProviderResult::success(ProviderId::gpt(), "Paris.", 1),
            ProviderResult::failure(ProviderId::claude(), "Claude Error: x", 1),
        ];

        let report = judge.evaluate("Capital?", &results).await;
        assert_eq!(report.kind, VerdictKind::Unavailable);
        assert!(report.scores.is_empty());
        assert!(!report.synthesized_answer.is_empty());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_judge_failure_yields_fallback() {
        let client = ScriptedClient::failing(
            "openai",
            GatewayError::ConnectionError("refused".to_string()),
        );
        let judge = VerdictJudge::new(client, JudgeSettings::default());

        let report = judge.evaluate("Capital?", &paris_results()).await;
        assert_eq!(report, VerdictReport::fallback());
    }

    #[tokio::test]
    async fn test_same_input_gives_same_score_keys() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client, JudgeSettings::default());

        let first = judge.evaluate("Capital?", &paris_results()).await;
        let second = judge.evaluate("Capital?", &paris_results()).await;
        let first_keys: Vec<&String> = first.scores.keys().collect();
        let second_keys: Vec<&String> = second.scores.keys().collect();
        assert_eq!(first_keys, second_keys);
    }

    #[tokio::test]
    async fn test_labels_vary_across_runs() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client, JudgeSettings::default());

        let mut seen = HashSet::new();
        for _ in 0..20 {
            let report = judge.evaluate("Capital?", &paris_results()).await;
            seen.insert(report.label_to_provider["A"].clone());
        }
        assert!(seen.len() > 1, "label A always mapped to the same provider");
    }

    #[tokio::test]
    async fn test_fixed_seed_is_reproducible() {
        let client = ScriptedClient::answering("openai", JUDGE_ANSWER);
        let judge = VerdictJudge::new(client, JudgeSettings::default())
            .with_seed_source(Arc::new(FixedSeed(42)));

        let first = judge.evaluate("Capital?", &paris_results()).await;
        let second = judge.evaluate("Capital?", &paris_results()).await;
        assert_eq!(first.label_to_provider, second.label_to_provider);
    }

    #[tokio::test]
    async fn test_unparseable_answer_is_kept_as_synthesis() {
        let client = ScriptedClient::answering("openai", "They all say Paris.");
        let judge = VerdictJudge::new(client, JudgeSettings::default());

        let report = judge.evaluate("Capital?", &paris_results()).await;
        assert_eq!(report.kind, VerdictKind::Judged);
        assert!(report.scores.is_empty());
        assert_eq!(report.synthesized_answer, "They all say Paris.");
    }
}
