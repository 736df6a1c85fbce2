//! Judge response parsing for blind verdicts.
//!
//! Pure text processing: no I/O, no knowledge of which provider sits behind
//! which label.
//!
//! # Supported Formats
//!
//! 1. **JSON** (requested from the judge, may be wrapped in a code fence):
//!    `{"scores": {"A": {"score": 8, "rationale": "..."}}, "synthesized_answer": "..."}`
//! 2. **Scorecard text**: lines like `Response A: 8/10 - rationale` or
//!    `**B** (Score: 7) ...`, followed by a `Synthesized answer:` section.
//!
//! Scores are clamped to 1-10; labels the judge invents are discarded.

use super::report::LabelScore;
use serde_json::Value;
use std::collections::BTreeMap;

/// Structured content extracted from a judge response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedVerdict {
    pub scores: BTreeMap<String, LabelScore>,
    pub synthesized_answer: Option<String>,
}

/// Parse a judge response against the labels that were actually assigned.
///
/// # Examples
///
/// ```
/// use triplet_domain::parse_verdict;
///
/// let labels = vec!["A".to_string(), "B".to_string()];
/// let parsed = parse_verdict(
///     r#"{"scores": {"A": {"score": 9, "rationale": "precise"},
///                    "B": {"score": 6, "rationale": "vague"}},
///         "synthesized_answer": "Paris is the capital of France."}"#,
///     &labels,
/// );
/// assert_eq!(parsed.scores["A"].score, 9);
/// assert_eq!(parsed.synthesized_answer.as_deref(), Some("Paris is the capital of France."));
/// ```
pub fn parse_verdict(response: &str, labels: &[String]) -> ParsedVerdict {
    if let Some(parsed) = parse_json_verdict(response, labels) {
        return parsed;
    }
    parse_text_verdict(response, labels)
}

fn parse_json_verdict(response: &str, labels: &[String]) -> Option<ParsedVerdict> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    if end <= start {
        return None;
    }

    let value: Value = serde_json::from_str(&response[start..=end]).ok()?;
    let object = value.as_object()?;

    let mut scores = BTreeMap::new();
    match object.get("scores") {
        Some(Value::Object(map)) => {
            for (key, entry) in map {
                if let Some(label) = match_label(key, labels)
                    && let Some(score) = json_score(entry)
                {
                    scores.insert(label, LabelScore::new(score, json_rationale(entry)));
                }
            }
        }
        Some(Value::Array(items)) => {
            for item in items {
                if let Some(key) = item.get("label").and_then(Value::as_str)
                    && let Some(label) = match_label(key, labels)
                    && let Some(score) = json_score(item)
                {
                    scores.insert(label, LabelScore::new(score, json_rationale(item)));
                }
            }
        }
        _ => {}
    }

    let synthesized_answer = ["synthesized_answer", "synthesis", "best_answer", "answer"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from);

    if scores.is_empty() && synthesized_answer.is_none() {
        return None;
    }

    Some(ParsedVerdict {
        scores,
        synthesized_answer,
    })
}

fn parse_text_verdict(response: &str, labels: &[String]) -> ParsedVerdict {
    let lines: Vec<&str> = response.lines().collect();
    let mut scores = BTreeMap::new();
    let mut synthesis_start = None;

    for (i, line) in lines.iter().enumerate() {
        let cleaned = clean_line(line);

        if is_synthesis_heading(&cleaned) {
            synthesis_start = Some(i);
            break;
        }

        if let Some((label, rest)) = split_label(&cleaned, labels)
            && !scores.contains_key(&label)
            && let Some((score, rationale)) = score_from_text(rest)
        {
            scores.insert(label, LabelScore::new(score, rationale));
        }
    }

    let synthesized_answer = synthesis_start.and_then(|i| {
        let cleaned = clean_line(lines[i]);
        let inline = cleaned
            .split_once(':')
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default();

        let mut body = vec![inline];
        body.extend(lines[i + 1..].iter().map(|l| l.to_string()));
        let text = body.join("\n").trim().to_string();
        (!text.is_empty()).then_some(text)
    });

    ParsedVerdict {
        scores,
        synthesized_answer,
    }
}

/// Strip markdown decoration from the start of a line and bold markers anywhere
fn clean_line(line: &str) -> String {
    line.trim()
        .trim_start_matches(|c: char| c == '#' || c == '-' || c == '>' || c.is_whitespace())
        .replace("**", "")
        .replace("__", "")
        .trim()
        .to_string()
}

fn is_synthesis_heading(cleaned: &str) -> bool {
    let lower = cleaned.to_lowercase();
    lower.starts_with("synthesized answer")
        || lower.starts_with("synthesis")
        || lower.starts_with("best answer")
        || lower.starts_with("recommended answer")
        || lower.starts_with("final answer")
}

fn strip_response_prefix(s: &str) -> (&str, bool) {
    match s.get(..8) {
        Some(head) if head.eq_ignore_ascii_case("response") => (s[8..].trim_start(), true),
        _ => (s, false),
    }
}

fn match_label(key: &str, labels: &[String]) -> Option<String> {
    let (rest, _) = strip_response_prefix(key.trim());
    let rest = rest.trim_matches(|c: char| !c.is_ascii_alphanumeric());
    labels
        .iter()
        .find(|l| l.eq_ignore_ascii_case(rest))
        .cloned()
}

/// Split `Response A: ...` / `A) ...` into the label and the remainder
fn split_label<'a>(cleaned: &'a str, labels: &[String]) -> Option<(String, &'a str)> {
    let (rest, had_prefix) = strip_response_prefix(cleaned);

    let mut ordered: Vec<&String> = labels.iter().collect();
    ordered.sort_by_key(|l| std::cmp::Reverse(l.len()));

    for label in ordered {
        let Some(after) = rest.strip_prefix(label.as_str()) else {
            continue;
        };
        let next = after.chars().next();
        let separated = if had_prefix {
            next.is_none_or(|c| !c.is_alphanumeric())
        } else {
            matches!(next, Some(':' | ')' | '.'))
        };
        if separated {
            let remainder = after.trim_start_matches(|c: char| {
                matches!(c, ':' | ')' | '.' | '-' | '(') || c.is_whitespace()
            });
            return Some((label.clone(), remainder));
        }
    }
    None
}

fn clamp_score(n: f64) -> u8 {
    n.round().clamp(1.0, 10.0) as u8
}

/// Find `N/10` or `Score: N` in the remainder of a label line
fn score_from_text(rest: &str) -> Option<(u8, String)> {
    let words: Vec<&str> = rest.split_whitespace().collect();

    for (i, word) in words.iter().enumerate() {
        let token = word.trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | ',' | '.' | '*'));

        let number = if let Some(n) = token.strip_suffix("/10") {
            n.parse::<f64>().ok()
        } else if i > 0
            && words[i - 1]
                .trim_matches(|c: char| !c.is_alphabetic())
                .eq_ignore_ascii_case("score")
        {
            token.parse::<f64>().ok()
        } else {
            None
        };

        if let Some(n) = number {
            let rationale = words[i + 1..]
                .join(" ")
                .trim_start_matches(|c: char| {
                    matches!(c, '-' | ':' | '—' | '–' | ')' | ',') || c.is_whitespace()
                })
                .to_string();
            return Some((clamp_score(n), rationale));
        }
    }
    None
}

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            s.strip_suffix("/10").unwrap_or(s).trim().parse().ok()
        }
        _ => None,
    }
}

fn json_score(entry: &Value) -> Option<u8> {
    entry
        .get("score")
        .and_then(json_number)
        .or_else(|| json_number(entry))
        .map(clamp_score)
}

fn json_rationale(entry: &Value) -> String {
    ["rationale", "reason", "reasoning", "explanation"]
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Vec<String> {
        vec!["A".to_string(), "B".to_string(), "C".to_string()]
    }

    // ==================== JSON Tests ====================

    #[test]
    fn test_json_object_scores() {
        let response = r#"{"scores": {"A": {"score": 8, "rationale": "Accurate"},
            "B": {"score": 6, "rationale": "Vague"}, "C": {"score": 9, "rationale": "Complete"}},
            "synthesized_answer": "Paris is the capital of France."}"#;

        let parsed = parse_verdict(response, &abc());
        assert_eq!(parsed.scores.len(), 3);
        assert_eq!(parsed.scores["A"], LabelScore::new(8, "Accurate"));
        assert_eq!(parsed.scores["C"].score, 9);
        assert_eq!(
            parsed.synthesized_answer.as_deref(),
            Some("Paris is the capital of France.")
        );
    }

    #[test]
    fn test_json_in_code_fence_with_response_keys() {
        let response = r#"
Here is my evaluation:
```json
{"scores": {"Response A": {"score": "7/10", "reason": "Fine"}, "Response B": 5},
 "synthesized_answer": "Combined."}
```
"#;
        let parsed = parse_verdict(response, &abc());
        assert_eq!(parsed.scores["A"], LabelScore::new(7, "Fine"));
        assert_eq!(parsed.scores["B"], LabelScore::new(5, ""));
        assert!(!parsed.scores.contains_key("C"));
    }

    #[test]
    fn test_json_array_scores() {
        let response = r#"{"scores": [{"label": "B", "score": 4, "rationale": "Wrong"}],
            "synthesis": "Use B's structure."}"#;
        let parsed = parse_verdict(response, &abc());
        assert_eq!(parsed.scores["B"].score, 4);
        assert_eq!(parsed.synthesized_answer.as_deref(), Some("Use B's structure."));
    }

    #[test]
    fn test_json_unknown_labels_discarded_and_clamped() {
        let labels = vec!["A".to_string(), "B".to_string()];
        let response = r#"{"scores": {"A": {"score": 15}, "B": {"score": -2}, "C": {"score": 9}},
            "synthesized_answer": "x"}"#;
        let parsed = parse_verdict(response, &labels);
        assert_eq!(parsed.scores.len(), 2);
        assert_eq!(parsed.scores["A"].score, 10);
        assert_eq!(parsed.scores["B"].score, 1);
    }

    // ==================== Text Tests ====================

    #[test]
    fn test_text_scorecard() {
        let response = "\
## Evaluation
**Response A**: 8/10 - Accurate and concise.
- Response B: Score: 6 — Misses context.
Response C (9/10) Thorough.

Synthesized answer: Paris is the capital of France.
It has been since the 10th century.";

        let parsed = parse_verdict(response, &abc());
        assert_eq!(parsed.scores["A"], LabelScore::new(8, "Accurate and concise."));
        assert_eq!(parsed.scores["B"], LabelScore::new(6, "Misses context."));
        assert_eq!(parsed.scores["C"].score, 9);
        assert_eq!(
            parsed.synthesized_answer.as_deref(),
            Some("Paris is the capital of France.\nIt has been since the 10th century.")
        );
    }

    #[test]
    fn test_text_bare_label_needs_separator() {
        let labels = abc();
        // "A good answer" must not be read as label A
        let parsed = parse_verdict("A good answer gets 9/10 from me", &labels);
        assert!(parsed.scores.is_empty());

        let parsed = parse_verdict("A: 9/10 good", &labels);
        assert_eq!(parsed.scores["A"].score, 9);
    }

    #[test]
    fn test_text_synthesis_heading_on_own_line() {
        let response = "Response A: 7/10 ok\n### Synthesis\nThe best answer is Paris.";
        let parsed = parse_verdict(response, &abc());
        assert_eq!(parsed.scores.len(), 1);
        assert_eq!(
            parsed.synthesized_answer.as_deref(),
            Some("The best answer is Paris.")
        );
    }

    #[test]
    fn test_nothing_parseable() {
        let parsed = parse_verdict("I cannot decide.", &abc());
        assert!(parsed.scores.is_empty());
        assert!(parsed.synthesized_answer.is_none());
    }

    #[test]
    fn test_same_input_same_keys() {
        let response = "Response A: 8/10 good\nResponse B: 6/10 meh\nSynthesized answer: x";
        let first = parse_verdict(response, &abc());
        let second = parse_verdict(response, &abc());
        assert_eq!(
            first.scores.keys().collect::<Vec<_>>(),
            second.scores.keys().collect::<Vec<_>>()
        );
    }
}
