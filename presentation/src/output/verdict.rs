//! Plain-text rendering of a verdict
//!
//! The same text is used as the `verdict` value in batch JSON, as the
//! verdict frame in streaming mode, and in the console report.

use triplet_domain::{VerdictKind, VerdictReport, VerdictTemplate};

pub struct VerdictRenderer;

impl VerdictRenderer {
    pub fn render(report: &VerdictReport) -> String {
        let mut text = match report.kind {
            VerdictKind::Judged => Self::render_judged(report),
            VerdictKind::Unavailable | VerdictKind::Fallback | VerdictKind::Skipped => {
                report.synthesized_answer.clone()
            }
        };

        for note in &report.notes {
            text.push_str("\n\n");
            text.push_str(note);
        }

        text
    }

    fn render_judged(report: &VerdictReport) -> String {
        let mut text = String::from("## AI Verdict\n\n### Scores\n");

        for (label, score) in report.ranking() {
            text.push_str(&format!("- Response {}: {}/10", label, score.score));
            if !score.rationale.is_empty() {
                text.push_str(&format!(" - {}", score.rationale));
            }
            text.push('\n');
        }
        if report.scores.is_empty() {
            text.push_str("- The judge did not return scores.\n");
        }

        text.push_str("\n### Synthesized Answer\n\n");
        text.push_str(report.synthesized_answer.trim());
        text.push_str("\n\n---\n");
        text.push_str(VerdictTemplate::blind_disclaimer());

        if !report.label_to_provider.is_empty() {
            let disclosure: Vec<String> = report
                .label_to_provider
                .iter()
                .map(|(label, id)| format!("Response {} = {}", label, id.display_name()))
                .collect();
            text.push_str("\n\n");
            text.push_str(&disclosure.join(", "));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use triplet_domain::{LabelScore, ProviderId, ProviderResult};

    fn judged() -> VerdictReport {
        let mut mapping = BTreeMap::new();
        mapping.insert("A".to_string(), ProviderId::deepseek());
        mapping.insert("B".to_string(), ProviderId::gpt());

        let mut scores = BTreeMap::new();
        scores.insert("A".to_string(), LabelScore::new(7, "correct"));
        scores.insert("B".to_string(), LabelScore::new(9, "complete"));

        VerdictReport::judged("gpt-4o", mapping, scores, "Paris is the capital of France.")
    }

    #[test]
    fn test_judged_verdict_ranks_and_discloses() {
        let text = VerdictRenderer::render(&judged());

        let b = text.find("Response B: 9/10 - complete").unwrap();
        let a = text.find("Response A: 7/10 - correct").unwrap();
        assert!(b < a, "best score first");

        assert!(text.contains("### Synthesized Answer\n\nParis is the capital of France."));
        let disclaimer = text.find(VerdictTemplate::blind_disclaimer()).unwrap();
        let disclosure = text.find("Response A = DeepSeek, Response B = GPT").unwrap();
        assert!(disclaimer < disclosure);
    }

    #[test]
    fn test_notes_are_appended() {
        let report = judged().with_note("Note on vision capabilities:\n- GPT: full vision support");
        let text = VerdictRenderer::render(&report);
        assert!(text.ends_with("- GPT: full vision support"));
    }

    #[test]
    fn test_non_judged_kinds_render_answer_only() {
        let report = VerdictReport::skipped(&[ProviderResult::success(ProviderId::gpt(), "abc", 1)]);
        let text = VerdictRenderer::render(&report);
        assert_eq!(text, report.synthesized_answer);
        assert!(!text.contains(VerdictTemplate::blind_disclaimer()));

        let text = VerdictRenderer::render(&VerdictReport::fallback());
        assert!(!text.contains("### Scores"));
    }
}
