//! Domain layer for triplet
//!
//! This crate contains the core entities and pure algorithms of the
//! multi-model consensus orchestrator. It has no I/O and no async code.
//!
//! # Core Concepts
//!
//! ## Consensus
//!
//! The same prompt is sent to several independent providers. Each provider
//! produces exactly one [`ProviderResult`], successful or not, and the
//! results are gathered into a [`ConsensusResult`].
//!
//! ## Blind Verdict
//!
//! A judge model scores the answers under anonymous labels (`A`, `B`, `C`, ...)
//! assigned by a fresh random permutation per request
//! ([`assign_labels`]), so it cannot favor a provider by name.

pub mod consensus;
pub mod core;
pub mod prompt;
pub mod verdict;

// Re-export commonly used types
pub use consensus::{
    attachment::Attachment,
    event::ConsensusEvent,
    request::{ConsensusRequest, ConsensusRequestBody},
    result::{ConsensusResult, ConsensusResultBuilder, ProviderResult},
};
pub use core::{error::DomainError, prompt::Prompt, provider_id::ProviderId, string::preview};
pub use prompt::{NoticeTemplate, VerdictTemplate};
pub use verdict::{
    labels::{LabelAssignment, assign_labels, label_name},
    parsing::{ParsedVerdict, parse_verdict},
    report::{LabelScore, VerdictKind, VerdictReport},
};
