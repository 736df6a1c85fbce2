//! Output formatting for batch results

pub mod batch;
pub mod console;
pub mod verdict;
