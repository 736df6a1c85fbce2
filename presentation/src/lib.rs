//! Presentation layer for triplet
//!
//! This crate contains CLI definitions, request building, output
//! formatters, the streaming frame writer, and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;
pub mod stream;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use cli::request::{RequestError, request_from_args, request_from_json};
pub use output::{batch::BatchResponse, console::ConsoleFormatter, verdict::VerdictRenderer};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use stream::multiplexer::StreamMultiplexer;
