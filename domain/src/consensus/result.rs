//! Consensus result value objects
//!
//! - [`ProviderResult`] - one provider's answer (or error) for one request
//! - [`ConsensusResultBuilder`] - write-once slots filled as tasks complete
//! - [`ConsensusResult`] - the sealed outcome, in caller order, plus the verdict

use crate::core::provider_id::ProviderId;
use crate::verdict::report::VerdictReport;
use serde::{Deserialize, Serialize};

/// Result from a single provider
///
/// Created exactly once per provider per request and never modified.
/// Errors are data: a failed provider still yields a `ProviderResult`,
/// with `is_error` set and a user-safe description in `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResult {
    provider_id: ProviderId,
    text: String,
    is_error: bool,
    elapsed_ms: u64,
}

impl ProviderResult {
    /// Creates a successful result.
    pub fn success(provider_id: ProviderId, text: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            provider_id,
            text: text.into(),
            is_error: false,
            elapsed_ms,
        }
    }

    /// Creates a failed result carrying a human-readable error text.
    pub fn failure(provider_id: ProviderId, text: impl Into<String>, elapsed_ms: u64) -> Self {
        Self {
            provider_id,
            text: text.into(),
            is_error: true,
            elapsed_ms,
        }
    }

    pub fn provider_id(&self) -> &ProviderId {
        &self.provider_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Elapsed time in seconds, rounded to two decimals
    pub fn elapsed_seconds(&self) -> f64 {
        (self.elapsed_ms as f64 / 10.0).round() / 100.0
    }
}

/// Write-once result slots for one run, in caller order
///
/// Each provider task owns exactly one slot; a slot filled twice keeps
/// its first value.
#[derive(Debug)]
pub struct ConsensusResultBuilder {
    slots: Vec<(ProviderId, Option<ProviderResult>)>,
}

impl ConsensusResultBuilder {
    pub fn new(provider_ids: impl IntoIterator<Item = ProviderId>) -> Self {
        Self {
            slots: provider_ids.into_iter().map(|id| (id, None)).collect(),
        }
    }

    /// Fill the slot at `index`. Returns `false` if the index is unknown or
    /// the slot was already filled.
    pub fn fill(&mut self, index: usize, result: ProviderResult) -> bool {
        match self.slots.get_mut(index) {
            Some((_, slot @ None)) => {
                *slot = Some(result);
                true
            }
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|(_, r)| r.is_some())
    }

    /// Results filled so far, in caller order
    pub fn completed(&self) -> Vec<ProviderResult> {
        self.slots.iter().filter_map(|(_, r)| r.clone()).collect()
    }

    /// Seal the run. Any slot that was never filled is reported as an error
    /// so the caller still sees an entry for every configured provider.
    pub fn seal(self, verdict: Option<VerdictReport>, total_elapsed_ms: u64) -> ConsensusResult {
        let results = self
            .slots
            .into_iter()
            .map(|(id, slot)| {
                slot.unwrap_or_else(|| {
                    let text = format!("{} Error: no result was produced", id.display_name());
                    ProviderResult::failure(id, text, total_elapsed_ms)
                })
            })
            .collect();

        ConsensusResult {
            results,
            verdict,
            total_elapsed_ms,
        }
    }
}

/// Complete result of a consensus run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    results: Vec<ProviderResult>,
    verdict: Option<VerdictReport>,
    total_elapsed_ms: u64,
}

impl ConsensusResult {
    /// All provider results, in caller order
    pub fn results(&self) -> &[ProviderResult] {
        &self.results
    }

    pub fn get(&self, provider_id: &ProviderId) -> Option<&ProviderResult> {
        self.results.iter().find(|r| r.provider_id() == provider_id)
    }

    pub fn provider_ids(&self) -> impl Iterator<Item = &ProviderId> {
        self.results.iter().map(|r| r.provider_id())
    }

    pub fn successful(&self) -> impl Iterator<Item = &ProviderResult> {
        self.results.iter().filter(|r| !r.is_error())
    }

    pub fn failed(&self) -> impl Iterator<Item = &ProviderResult> {
        self.results.iter().filter(|r| r.is_error())
    }

    pub fn verdict(&self) -> Option<&VerdictReport> {
        self.verdict.as_ref()
    }

    pub fn total_elapsed_ms(&self) -> u64 {
        self.total_elapsed_ms
    }
}
