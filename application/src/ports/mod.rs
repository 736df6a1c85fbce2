//! Port definitions (interfaces for infrastructure adapters)
//!
//! Ports define the boundaries between the application layer and
//! external systems. Adapters in the infrastructure layer implement these.

pub mod conversation_logger;
pub mod progress;
pub mod provider_adapter;
pub mod provider_client;
