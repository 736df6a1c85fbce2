//! Prompt domain
//!
//! Judge prompts and the fixed notice texts that appear in provider answers
//! and verdicts.

mod template;

pub use template::{NoticeTemplate, VerdictTemplate};
