//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DispatchParams`]: per-step timeout and transient retry policy
//! - [`JudgeSettings`]: model and sampling parameters for the verdict judge

pub mod dispatch_params;
pub mod judge_settings;

pub use dispatch_params::{DispatchParams, RetryPolicy};
pub use judge_settings::JudgeSettings;
