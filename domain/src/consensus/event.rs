//! Streaming events emitted by a consensus run

use super::result::ProviderResult;
use crate::verdict::report::VerdictReport;

/// One event of a streaming consensus run
///
/// Ordering contract: every `Provider` event (completion order) comes
/// before the single `Verdict` event, and `Done` is always last.
/// `Error` reports an internal failure and is still followed by `Done`.
#[derive(Debug, Clone)]
pub enum ConsensusEvent {
    Provider(ProviderResult),
    Verdict(VerdictReport),
    Error(String),
    Done,
}

impl ConsensusEvent {
    pub fn is_done(&self) -> bool {
        matches!(self, ConsensusEvent::Done)
    }

    /// Wire key of the event's source, if it has one
    pub fn source(&self) -> Option<&str> {
        match self {
            ConsensusEvent::Provider(r) => Some(r.provider_id().as_str()),
            ConsensusEvent::Verdict(_) => Some(crate::core::provider_id::ProviderId::VERDICT),
            ConsensusEvent::Error(_) | ConsensusEvent::Done => None,
        }
    }
}
