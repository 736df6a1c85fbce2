//! Flat JSON response for batch mode
//!
//! `{"<provider_id>": text, ..., "verdict": text}` with providers in
//! configured order. Error entries keep their `"<Provider> Error: ..."` text.

use super::verdict::VerdictRenderer;
use serde::ser::{Serialize, SerializeMap, Serializer};
use triplet_domain::{ConsensusResult, ProviderId};

/// Serializable view over a [`ConsensusResult`]
pub struct BatchResponse<'a> {
    result: &'a ConsensusResult,
}

impl<'a> BatchResponse<'a> {
    pub fn new(result: &'a ConsensusResult) -> Self {
        Self { result }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for BatchResponse<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let results = self.result.results();
        let verdict = self.result.verdict();
        let len = results.len() + usize::from(verdict.is_some());

        let mut map = serializer.serialize_map(Some(len))?;
        for result in results {
            map.serialize_entry(result.provider_id().as_str(), result.text())?;
        }
        if let Some(report) = verdict {
            map.serialize_entry(ProviderId::VERDICT, &VerdictRenderer::render(report))?;
        }
        map.end()
    }
}
