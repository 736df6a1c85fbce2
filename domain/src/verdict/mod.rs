//! Blind verdict domain
//!
//! - [`labels`]: random anonymous labels for provider answers
//! - [`parsing`]: extracting scores and the synthesized answer from judge output
//! - [`report`]: the verdict report handed back to callers

pub mod labels;
pub mod parsing;
pub mod report;
