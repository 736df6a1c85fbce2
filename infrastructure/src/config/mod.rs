//! Configuration file loading for triplet
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TRIPLET_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./triplet.toml` or `./.triplet.toml`
//! 4. Global: `$XDG_CONFIG_HOME/triplet/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ANTHROPIC_API_VERSION, ConfigValidationError, DEEPSEEK_SYSTEM_PROMPT, FileBehaviorConfig,
    FileChainStep, FileConfig, FileEndpointConfig, FileJudgeConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat, FileProvidersConfig, FileTripletConfig, default_chains,
};
pub use loader::ConfigLoader;
