//! hereguard - A Slack bot that nudges people who post noisy messages.
//!
//! The bot watches public channels over Socket Mode. When someone posts an
//! `@here`/`@channel` broadcast, or invites a user by posting nothing but their
//! mention, it sends the author a courtesy notice through every response
//! channel enabled in configuration (DM, thread reply, ephemeral message,
//! emoji reaction).
//!
//! # Architecture
//!
//! - `features::classify` decides whether a message matches a pattern
//! - `features::gate` suppresses notices in channels below a member threshold
//! - `features::deliver` fans the notice out, one independent future per channel
//! - `worker::MessageHandler` ties the steps together for one message
//! - `slack` holds the Web API client and the Socket Mode listener
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hereguard::core::config::AppConfig;
//! use hereguard::slack::SlackClient;
//! use hereguard::worker::MessageHandler;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     hereguard::setup_logging("info");
//!
//!     let config = AppConfig::from_env()?;
//!     let client = Arc::new(SlackClient::with_api_base(
//!         config.slack_bot_token.clone(),
//!         config.slack_api_base_url.clone(),
//!     ));
//!     let handler = MessageHandler::new(client.clone(), client, config.dispatch.clone());
//!
//!     hereguard::slack::run_socket_mode(
//!         &config.slack_app_token,
//!         handler,
//!         config.handle_timeout,
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod features;
pub mod slack;
pub mod worker;

pub use errors::{NotifierError, SlackError};

/// Configure structured JSON logging.
///
/// `level` is an `EnvFilter` directive such as `info` or `hereguard=debug`;
/// an invalid directive falls back to `info`. Calling this more than once is
/// harmless.
///
/// # Example
///
/// ```
/// hereguard::setup_logging("debug");
/// ```
pub fn setup_logging(level: &str) {
    use tracing_subscriber::prelude::*;

    let filter = log_filter(level);
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// The `EnvFilter` for a `LOG_LEVEL` value; unparsable directives fall back
/// to `info`.
#[must_use]
pub fn log_filter(level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_new(level)
        .unwrap_or_else(|_| EnvFilter::new(crate::core::config::DEFAULT_LOG_LEVEL))
}
