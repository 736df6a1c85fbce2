//! Use cases for the application layer
//!
//! - [`call_provider`]: one provider's fallback chain
//! - [`judge_verdict`]: blind scoring and synthesis
//! - [`run_consensus`]: concurrent dispatch, batch and streaming delivery

pub mod call_provider;
pub mod judge_verdict;
pub mod run_consensus;
