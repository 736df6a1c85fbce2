//! Infrastructure layer for triplet
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: HTTP provider clients, configuration
//! file loading, and JSONL conversation logging.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileChainStep, FileConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat,
};
pub use logging::JsonlConversationLogger;
pub use providers::{AnthropicClient, OpenAiClient, ProviderKind, ProviderRegistry, RegistryError};
