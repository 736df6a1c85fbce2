//! Prompt and notice templates for the consensus flow

use crate::consensus::result::ProviderResult;
use crate::core::provider_id::ProviderId;

/// Templates for the blind judge
pub struct VerdictTemplate;

impl VerdictTemplate {
    /// System prompt for the judge
    pub fn judge_system() -> &'static str {
        r#"You are an impartial judge comparing several answers to the same question.
The answers are labeled anonymously. You are not told which system wrote which answer,
and you must not speculate about it. Judge each answer only on its content."#
    }

    /// Evaluation prompt over labeled responses
    ///
    /// `labeled` pairs an anonymous label with the answer text. Provider names
    /// never appear here.
    pub fn evaluation_prompt(question: &str, labeled: &[(String, String)]) -> String {
        let mut prompt = format!(
            r#"USER QUESTION:
{}

"#,
            question
        );

        for (label, content) in labeled {
            prompt.push_str(&format!("--- Response {} ---\n{}\n\n", label, content));
        }

        let labels: Vec<&str> = labeled.iter().map(|(l, _)| l.as_str()).collect();
        prompt.push_str(&format!(
            r#"Score each response ({}) from 1 to 10, weighing accuracy, completeness,
clarity and relevance to the question. Give a one or two sentence rationale per response.
Then write one synthesized best answer that combines the strongest elements of all responses.

Reply with a single JSON object and nothing else:
{{"scores": {{"<label>": {{"score": <1-10>, "rationale": "<why>"}}}}, "synthesized_answer": "<answer>"}}"#,
            labels.join(", ")
        ));

        prompt
    }

    /// Closing line of every judged verdict
    pub fn blind_disclaimer() -> &'static str {
        "This verdict was generated by an independent AI judge who did not know which model produced which response."
    }

    /// Vision capability note for requests that carried images
    pub fn vision_note(capabilities: &[(ProviderId, bool)]) -> String {
        let mut note = String::from("Note on vision capabilities:");
        for (id, vision) in capabilities {
            if *vision {
                note.push_str(&format!("\n- {}: full vision support", id.display_name()));
            } else {
                note.push_str(&format!(
                    "\n- {}: no vision support (text-only response)",
                    id.display_name()
                ));
            }
        }
        note
    }
}

/// Fixed notice texts
pub struct NoticeTemplate;

impl NoticeTemplate {
    /// Prefix for answers produced by a substitute provider
    pub fn fallback_prefix() -> &'static str {
        "[Using fallback — primary unavailable]"
    }

    /// Appended when images were attached but the answering backend is text-only.
    ///
    /// The answer text later reaches the blind judge, so the notice names no provider.
    pub fn vision_limitation() -> &'static str {
        "\n\n---\nNote: this model doesn't support image analysis. The response above is based on the text of your question only."
    }

    /// Error text for a provider whose whole chain failed
    pub fn provider_error(provider_id: &ProviderId, description: &str) -> String {
        format!("{} Error: {}", provider_id.display_name(), description)
    }

    pub fn evaluation_not_possible(usable: usize) -> String {
        format!(
            "Evaluation was not possible: at least 2 successful responses are needed for a comparison, but only {} succeeded.",
            usable
        )
    }

    pub fn judge_unavailable() -> &'static str {
        "The AI verdict could not be generated. All responses are displayed above; compare them yourself to pick the best answer."
    }

    /// Static stub used in place of a verdict when judging is skipped
    pub fn comparison_stub(results: &[ProviderResult]) -> String {
        let mut stub = String::from("AI verdict skipped. Compare the responses above.\n");
        for result in results {
            let name = result.provider_id().display_name();
            if result.is_error() {
                stub.push_str(&format!("\n- {}: error", name));
            } else {
                stub.push_str(&format!(
                    "\n- {}: {} characters",
                    name,
                    result.text().chars().count()
                ));
            }
        }
        stub
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_prompt_is_anonymous() {
        let labeled = vec![
            ("A".to_string(), "Paris.".to_string()),
            ("B".to_string(), "It is Paris, France.".to_string()),
        ];
        let prompt = VerdictTemplate::evaluation_prompt("What is the capital of France?", &labeled);

        assert!(prompt.contains("What is the capital of France?"));
        assert!(prompt.contains("--- Response A ---\nParis."));
        assert!(prompt.contains("--- Response B ---"));
        assert!(prompt.contains("(A, B)"));
        assert!(prompt.contains("synthesized_answer"));
        for name in ["gpt", "GPT", "claude", "Claude", "deepseek", "DeepSeek"] {
            assert!(!prompt.contains(name), "prompt leaks provider name {}", name);
        }
    }

    #[test]
    fn test_vision_limitation_is_anonymous() {
        let notice = NoticeTemplate::vision_limitation();
        assert!(notice.contains("doesn't support image analysis"));
        for id in ProviderId::default_set() {
            assert!(!notice.contains(&id.display_name()));
        }
    }

    #[test]
    fn test_provider_error_text() {
        assert_eq!(
            NoticeTemplate::provider_error(&ProviderId::deepseek(), "authentication failed"),
            "DeepSeek Error: authentication failed"
        );
    }

    #[test]
    fn test_vision_note() {
        let note = VerdictTemplate::vision_note(&[
            (ProviderId::gpt(), true),
            (ProviderId::deepseek(), false),
        ]);
        assert!(note.contains("GPT: full vision support"));
        assert!(note.contains("DeepSeek: no vision support"));
    }

    #[test]
    fn test_comparison_stub_counts_chars() {
        let results = vec![ProviderResult::success(ProviderId::claude(), "héllo", 3)];
        let stub = NoticeTemplate::comparison_stub(&results);
        assert!(stub.contains("Compare the responses above"));
        assert!(stub.contains("Claude: 5 characters"));
    }
}
