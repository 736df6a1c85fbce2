pub mod commands;
pub mod request;
