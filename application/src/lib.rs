//! Application layer for triplet
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.
//!
//! ```text
//! RunConsensusUseCase ──spawn×N──▶ ProviderAdapter (ChainedProviderAdapter)
//!        │                              └── ChainStep → ProviderClient (port)
//!        └──────────────▶ VerdictJudge ──▶ ProviderClient (port)
//! ```

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{DispatchParams, JudgeSettings, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoProgress, ProgressNotifier},
    provider_adapter::ProviderAdapter,
    provider_client::{CompletionRequest, GatewayError, ProviderClient},
};
pub use use_cases::call_provider::{ChainStep, ChainedProviderAdapter};
pub use use_cases::judge_verdict::{EntropySeed, SeedSource, VerdictJudge};
pub use use_cases::run_consensus::{ConsensusStream, RunConsensusError, RunConsensusUseCase};
