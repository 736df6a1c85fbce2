//! Streaming output

pub mod multiplexer;
