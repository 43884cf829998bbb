//! Socket Mode connection handler for Slack.
//!
//! Receives events over a WebSocket without a public HTTP endpoint and hands
//! every channel message to the [`MessageHandler`] in its own task.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use slack_morphism::prelude::*;
use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::core::models::InboundMessage;
use crate::worker::handler::MessageHandler;

/// Shared state for socket mode callbacks.
#[derive(Clone)]
struct ListenerState {
    handler: MessageHandler,
    handle_timeout: Duration,
}

/// Connect with the app-level token and serve events until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the HTTP connector cannot be built or the socket
/// connection cannot be established.
pub async fn run_socket_mode(
    app_token: &str,
    handler: MessageHandler,
    handle_timeout: Duration,
) -> Result<()> {
    let client = Arc::new(SlackHyperClient::new(SlackClientHyperConnector::new()?));
    let app_token = SlackApiToken::new(SlackApiTokenValue::new(app_token.to_string()));

    let state = ListenerState {
        handler,
        handle_timeout,
    };

    let callbacks = SlackSocketModeListenerCallbacks::new().with_push_events(handle_push_events);

    let listener_env = Arc::new(
        SlackClientEventsListenerEnvironment::new(client).with_user_state(state),
    );

    let socket_listener = SlackClientSocketModeListener::new(
        &SlackClientSocketModeConfig::new(),
        listener_env,
        callbacks,
    );

    socket_listener.listen_for(&app_token).await?;
    info!("Socket mode connected, waiting for messages");

    socket_listener.serve().await;
    info!("Socket mode listener stopped");

    Ok(())
}

async fn handle_push_events(
    event: SlackPushEventCallback,
    _client: Arc<SlackHyperClient>,
    states: SlackClientEventsUserState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let state = {
        let guard = states.read().await;
        guard
            .get_user_state::<ListenerState>()
            .cloned()
            .ok_or("missing socket mode state")?
    };

    match &event.event {
        SlackEventCallbackBody::Message(msg) => {
            let message = inbound_from_event(msg);
            tokio::spawn(handle_in_background(state, message));
        }
        SlackEventCallbackBody::MemberJoinedChannel(joined) => {
            info!(user_id = %joined.user, channel_id = %joined.channel, "Member joined channel");
        }
        SlackEventCallbackBody::MemberLeftChannel(left) => {
            info!(user_id = %left.user, channel_id = %left.channel, "Member left channel");
        }
        _ => {
            debug!("Ignoring event callback type");
        }
    }

    Ok(())
}

async fn handle_in_background(state: ListenerState, message: InboundMessage) {
    let correlation_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "inbound_message",
        %correlation_id,
        channel_id = %message.channel_id
    );

    async move {
        match state
            .handler
            .handle_within(&message, state.handle_timeout)
            .await
        {
            Ok(outcome) => debug!(?outcome, "Message handled"),
            Err(e) if e.is_metadata_failure() => warn!("Message not handled: {}", e),
            Err(e) => error!("Message not handled: {}", e),
        }
    }
    .instrument(span)
    .await;
}

/// Flatten a Slack message event into the shape the classifier reads.
#[must_use]
pub fn inbound_from_event(event: &SlackMessageEvent) -> InboundMessage {
    InboundMessage {
        channel_id: event
            .origin
            .channel
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        author_id: event.sender.user.as_ref().map(ToString::to_string),
        bot_id: event.sender.bot_id.as_ref().map(ToString::to_string),
        text: event.content.as_ref().and_then(|c| c.text.clone()),
        thread_ts: event.origin.thread_ts.as_ref().map(ToString::to_string),
        ts: event.origin.ts.to_string(),
    }
}
