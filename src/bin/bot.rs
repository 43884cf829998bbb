use std::sync::Arc;

use anyhow::Context;
use hereguard::api::health;
use hereguard::core::config::AppConfig;
use hereguard::slack::{SlackClient, run_socket_mode};
use hereguard::worker::MessageHandler;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    hereguard::setup_logging(&config.log_level);

    let client = Arc::new(SlackClient::with_api_base(
        config.slack_bot_token.clone(),
        config.slack_api_base_url.clone(),
    ));

    match client.auth_test().await {
        Ok(identity) => info!(
            bot_user = %identity.user,
            bot_user_id = %identity.user_id,
            team = %identity.team,
            "Authenticated with Slack"
        ),
        Err(e) => warn!("auth.test failed, continuing: {}", e),
    }

    let dispatch = config.dispatch.clone();
    info!(
        min_members = dispatch.min_members_for_notification,
        mention_invite_rule = dispatch.enable_mention_invite_rule,
        response_channels = ?dispatch.response_channels.enabled(),
        "Dispatch configuration loaded"
    );
    if dispatch.response_channels.is_empty() {
        warn!("No response channel enabled; matched messages will not be answered");
    }

    if let Some(port) = config.port {
        tokio::spawn(async move {
            if let Err(e) = health::serve(port).await {
                error!("Health check server failed: {}", e);
            }
        });
    } else {
        info!("PORT not set, so not starting health check server");
    }

    let handler = MessageHandler::new(client.clone(), client, dispatch);
    run_socket_mode(&config.slack_app_token, handler, config.handle_timeout).await
}
