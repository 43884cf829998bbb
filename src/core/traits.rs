//! Capabilities the moderation core needs from the chat platform.

use async_trait::async_trait;

use crate::core::models::{ChannelInfo, UserInfo};
use crate::errors::SlackError;

/// Channel and user metadata lookups. Results are never cached.
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    async fn fetch_channel_info(&self, channel_id: &str) -> Result<ChannelInfo, SlackError>;

    async fn fetch_user_info(&self, user_id: &str) -> Result<UserInfo, SlackError>;
}

/// Outbound calls used to deliver a courtesy notice. Each call stands alone.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), SlackError>;

    async fn send_thread_reply(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: &str,
    ) -> Result<(), SlackError>;

    async fn send_ephemeral(
        &self,
        channel_id: &str,
        text: &str,
        user_id: &str,
    ) -> Result<(), SlackError>;

    async fn send_reaction(
        &self,
        channel_id: &str,
        message_ts: &str,
        emoji_name: &str,
    ) -> Result<(), SlackError>;
}
