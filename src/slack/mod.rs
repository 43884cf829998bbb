//! All Slack-specific functionality

pub mod client;
pub mod listener;
pub mod response_builder;

// Re-export main types for convenience
pub use client::{BotIdentity, SlackClient};
pub use listener::run_socket_mode;
