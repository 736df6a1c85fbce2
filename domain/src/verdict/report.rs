//! Verdict report value object

use crate::consensus::result::ProviderResult;
use crate::core::provider_id::ProviderId;
use crate::prompt::NoticeTemplate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a verdict came to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    /// The judge scored the anonymized answers
    Judged,
    /// Fewer than two usable answers; nothing to compare
    Unavailable,
    /// The judge call failed; neutral placeholder
    Fallback,
    /// Judging was skipped by the caller; static comparison stub
    Skipped,
}

impl std::fmt::Display for VerdictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerdictKind::Judged => write!(f, "judged"),
            VerdictKind::Unavailable => write!(f, "unavailable"),
            VerdictKind::Fallback => write!(f, "fallback"),
            VerdictKind::Skipped => write!(f, "skipped"),
        }
    }
}

/// Score given to one anonymous label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelScore {
    /// 1-10
    pub score: u8,
    pub rationale: String,
}

impl LabelScore {
    pub fn new(score: u8, rationale: impl Into<String>) -> Self {
        Self {
            score: score.clamp(1, 10),
            rationale: rationale.into(),
        }
    }
}

/// Outcome of the verdict step
///
/// `label_to_provider` is kept apart from what the judge saw; it exists
/// only for disclosure to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictReport {
    pub kind: VerdictKind,
    /// Model that produced the judgement, when one ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge: Option<String>,
    pub label_to_provider: BTreeMap<String, ProviderId>,
    pub scores: BTreeMap<String, LabelScore>,
    pub synthesized_answer: String,
    /// Extra remarks appended after the answer (e.g. vision capabilities)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl VerdictReport {
    /// A scored verdict
    pub fn judged(
        judge: impl Into<String>,
        label_to_provider: BTreeMap<String, ProviderId>,
        scores: BTreeMap<String, LabelScore>,
        synthesized_answer: impl Into<String>,
    ) -> Self {
        Self {
            kind: VerdictKind::Judged,
            judge: Some(judge.into()),
            label_to_provider,
            scores,
            synthesized_answer: synthesized_answer.into(),
            notes: Vec::new(),
        }
    }

    /// Not enough usable answers to compare
    pub fn unavailable(usable: usize) -> Self {
        Self {
            kind: VerdictKind::Unavailable,
            judge: None,
            label_to_provider: BTreeMap::new(),
            scores: BTreeMap::new(),
            synthesized_answer: NoticeTemplate::evaluation_not_possible(usable),
            notes: Vec::new(),
        }
    }

    /// The judge could not be reached or failed; deterministic placeholder
    pub fn fallback() -> Self {
        Self {
            kind: VerdictKind::Fallback,
            judge: None,
            label_to_provider: BTreeMap::new(),
            scores: BTreeMap::new(),
            synthesized_answer: NoticeTemplate::judge_unavailable().to_string(),
            notes: Vec::new(),
        }
    }

    /// Static comparison stub used when judging is skipped
    pub fn skipped(results: &[ProviderResult]) -> Self {
        Self {
            kind: VerdictKind::Skipped,
            judge: None,
            label_to_provider: BTreeMap::new(),
            scores: BTreeMap::new(),
            synthesized_answer: NoticeTemplate::comparison_stub(results),
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_judged(&self) -> bool {
        self.kind == VerdictKind::Judged
    }

    /// Labels ranked best first (ties broken by label)
    pub fn ranking(&self) -> Vec<(&str, &LabelScore)> {
        let mut ranked: Vec<(&str, &LabelScore)> =
            self.scores.iter().map(|(l, s)| (l.as_str(), s)).collect();
        ranked.sort_by(|a, b| b.1.score.cmp(&a.1.score).then(a.0.cmp(b.0)));
        ranked
    }

    /// Provider behind the best-scored label
    pub fn winner(&self) -> Option<&ProviderId> {
        self.ranking()
            .first()
            .and_then(|(label, _)| self.label_to_provider.get(*label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VerdictReport {
        let mut mapping = BTreeMap::new();
        mapping.insert("A".to_string(), ProviderId::claude());
        mapping.insert("B".to_string(), ProviderId::gpt());

        let mut scores = BTreeMap::new();
        scores.insert("A".to_string(), LabelScore::new(7, "ok"));
        scores.insert("B".to_string(), LabelScore::new(9, "best"));

        VerdictReport::judged("gpt-4o", mapping, scores, "Paris.")
    }

    #[test]
    fn test_score_clamped() {
        assert_eq!(LabelScore::new(0, "").score, 1);
        assert_eq!(LabelScore::new(42, "").score, 10);
    }

    #[test]
    fn test_ranking_and_winner() {
        let report = sample();
        let ranking: Vec<&str> = report.ranking().iter().map(|(l, _)| *l).collect();
        assert_eq!(ranking, vec!["B", "A"]);
        assert_eq!(report.winner(), Some(&ProviderId::gpt()));
    }

    #[test]
    fn test_unavailable_has_no_scores() {
        let report = VerdictReport::unavailable(1);
        assert_eq!(report.kind, VerdictKind::Unavailable);
        assert!(report.scores.is_empty());
        assert!(!report.synthesized_answer.is_empty());
        assert!(report.winner().is_none());
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(VerdictReport::fallback(), VerdictReport::fallback());
        assert!(VerdictReport::fallback().scores.is_empty());
    }

    #[test]
    fn test_skipped_lists_character_counts() {
        let results = vec![
            ProviderResult::success(ProviderId::gpt(), "abcd", 1),
            ProviderResult::failure(ProviderId::claude(), "Claude Error: down", 1),
        ];
        let report = VerdictReport::skipped(&results);
        assert_eq!(report.kind, VerdictKind::Skipped);
        assert!(report.synthesized_answer.contains("GPT: 4 characters"));
        assert!(report.synthesized_answer.contains("Claude: error"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&VerdictKind::Skipped).unwrap();
        assert_eq!(json, r#""skipped""#);
    }
}
