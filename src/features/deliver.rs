//! Fans a composed notice out to every enabled response channel.

use futures::future::{BoxFuture, FutureExt, join_all};
use tracing::{debug, error, info};

use crate::core::config::DispatchConfig;
use crate::core::models::{
    ChannelInfo, DeliveryOutcome, DispatchReport, InboundMessage, PatternKind, ResponseChannel,
    UserInfo,
};
use crate::core::traits::ChatSender;
use crate::errors::SlackError;
use crate::features::compose::compose_notice;

/// Compose the notice for `pattern` and attempt every enabled channel.
///
/// Deliveries run concurrently and never wait on one another; a failed
/// channel is recorded in the report and does not affect its siblings.
pub async fn dispatch(
    sender: &dyn ChatSender,
    message: &InboundMessage,
    pattern: PatternKind,
    channel: &ChannelInfo,
    author: &UserInfo,
    config: &DispatchConfig,
) -> DispatchReport {
    let text = compose_notice(pattern, author, channel);
    let channels = &config.response_channels;

    info!(
        user = %author.name,
        channel = %channel.name,
        %pattern,
        "Sending courtesy notice"
    );

    let mut deliveries: Vec<BoxFuture<'_, DeliveryOutcome>> = Vec::with_capacity(4);

    if channels.direct_message {
        deliveries.push(
            attempt(
                ResponseChannel::DirectMessage,
                sender.send_direct_message(&author.id, &text),
            )
            .boxed(),
        );
    }

    if channels.thread_reply {
        deliveries.push(
            attempt(
                ResponseChannel::ThreadReply,
                sender.send_thread_reply(&channel.id, &text, message.thread_anchor()),
            )
            .boxed(),
        );
    }

    if channels.ephemeral_reply {
        deliveries.push(
            attempt(
                ResponseChannel::EphemeralReply,
                sender.send_ephemeral(&channel.id, &text, &author.id),
            )
            .boxed(),
        );
    }

    if let Some(emoji) = channels.reaction_emoji.as_deref() {
        deliveries.push(
            attempt(
                ResponseChannel::ReactionEmoji,
                sender.send_reaction(&channel.id, &message.ts, emoji),
            )
            .boxed(),
        );
    }

    DispatchReport {
        outcomes: join_all(deliveries).await,
    }
}

async fn attempt<F>(channel: ResponseChannel, send: F) -> DeliveryOutcome
where
    F: Future<Output = Result<(), SlackError>> + Send,
{
    let result = match send.await {
        Ok(()) => {
            debug!(response_channel = %channel, "Delivery succeeded");
            Ok(())
        }
        Err(e) => {
            error!(response_channel = %channel, "Delivery failed: {}", e);
            Err(e.to_string())
        }
    };
    DeliveryOutcome { channel, result }
}
