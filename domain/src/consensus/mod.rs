//! Consensus domain
//!
//! Request-scoped value objects flowing through one consensus run:
//!
//! ```text
//! ConsensusRequest ──dispatch──▶ ProviderResult × N ──▶ ConsensusResult
//!                                      │                     ▲
//!                                      └── ConsensusEvent ───┘ (streaming)
//! ```

pub mod attachment;
pub mod event;
pub mod request;
pub mod result;
