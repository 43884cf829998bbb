#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use hereguard::core::config::{DispatchConfig, ResponseChannels};
use hereguard::core::models::{ChannelInfo, InboundMessage, ResponseChannel, UserInfo};
use hereguard::core::traits::{ChatDirectory, ChatSender};
use hereguard::errors::SlackError;

pub const CHANNEL_ID: &str = "C2HLLGPT3";
pub const USER_ID: &str = "U0C6SS0N9";
pub const MESSAGE_TS: &str = "1509195448.000118";

/// A public channel message from a human, like the RTM fixture.
pub fn message(text: &str) -> InboundMessage {
    InboundMessage {
        channel_id: CHANNEL_ID.to_string(),
        author_id: Some(USER_ID.to_string()),
        bot_id: None,
        text: Some(text.to_string()),
        thread_ts: None,
        ts: MESSAGE_TS.to_string(),
    }
}

pub fn channel_info(member_count: Option<u64>) -> ChannelInfo {
    ChannelInfo {
        id: CHANNEL_ID.to_string(),
        name: "e-bot-test".to_string(),
        member_count,
    }
}

pub fn user_info() -> UserInfo {
    UserInfo {
        id: USER_ID.to_string(),
        name: "john".to_string(),
    }
}

pub fn config(channels: ResponseChannels) -> DispatchConfig {
    DispatchConfig {
        min_members_for_notification: 0,
        enable_mention_invite_rule: true,
        response_channels: channels,
    }
}

pub fn only_dm() -> ResponseChannels {
    ResponseChannels {
        direct_message: true,
        ..ResponseChannels::default()
    }
}

pub fn only_thread() -> ResponseChannels {
    ResponseChannels {
        thread_reply: true,
        ..ResponseChannels::default()
    }
}

pub fn only_ephemeral() -> ResponseChannels {
    ResponseChannels {
        ephemeral_reply: true,
        ..ResponseChannels::default()
    }
}

pub fn all_channels() -> ResponseChannels {
    ResponseChannels {
        direct_message: true,
        thread_reply: true,
        ephemeral_reply: true,
        reaction_emoji: Some("shushing_face".to_string()),
    }
}

pub struct FakeDirectory {
    pub channel: ChannelInfo,
    pub user: UserInfo,
    pub fail_channel: bool,
    pub fail_user: bool,
    pub delay: Option<Duration>,
    pub channel_calls: AtomicUsize,
    pub user_calls: AtomicUsize,
}

impl FakeDirectory {
    pub fn new(member_count: Option<u64>) -> Self {
        Self {
            channel: channel_info(member_count),
            user: user_info(),
            fail_channel: false,
            fail_user: false,
            delay: None,
            channel_calls: AtomicUsize::new(0),
            user_calls: AtomicUsize::new(0),
        }
    }

    pub fn channel_calls(&self) -> usize {
        self.channel_calls.load(Ordering::SeqCst)
    }

    pub fn user_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatDirectory for FakeDirectory {
    async fn fetch_channel_info(&self, _channel_id: &str) -> Result<ChannelInfo, SlackError> {
        self.channel_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_channel {
            return Err(SlackError::ApiError(
                "conversations.info error: channel_not_found".to_string(),
            ));
        }
        Ok(self.channel.clone())
    }

    async fn fetch_user_info(&self, _user_id: &str) -> Result<UserInfo, SlackError> {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_user {
            return Err(SlackError::ApiError("users.info error: user_not_found".to_string()));
        }
        Ok(self.user.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentCall {
    DirectMessage { user_id: String, text: String },
    ThreadReply { channel_id: String, text: String, thread_ts: String },
    Ephemeral { channel_id: String, text: String, user_id: String },
    Reaction { channel_id: String, message_ts: String, emoji_name: String },
}

#[derive(Default)]
pub struct RecordingSender {
    pub calls: Mutex<Vec<SentCall>>,
    pub failing: HashSet<ResponseChannel>,
    /// Holds the DM send open this long before it completes.
    pub dm_delay: Option<Duration>,
}

impl RecordingSender {
    pub fn failing(channels: &[ResponseChannel]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: channels.iter().copied().collect(),
            dm_delay: None,
        }
    }

    pub fn calls(&self) -> Vec<SentCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, channel: ResponseChannel, call: SentCall) -> Result<(), SlackError> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(&channel) {
            Err(SlackError::ApiError(format!("{channel} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), SlackError> {
        if let Some(delay) = self.dm_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(
            ResponseChannel::DirectMessage,
            SentCall::DirectMessage {
                user_id: user_id.to_string(),
                text: text.to_string(),
            },
        )
    }

    async fn send_thread_reply(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: &str,
    ) -> Result<(), SlackError> {
        self.record(
            ResponseChannel::ThreadReply,
            SentCall::ThreadReply {
                channel_id: channel_id.to_string(),
                text: text.to_string(),
                thread_ts: thread_ts.to_string(),
            },
        )
    }

    async fn send_ephemeral(
        &self,
        channel_id: &str,
        text: &str,
        user_id: &str,
    ) -> Result<(), SlackError> {
        self.record(
            ResponseChannel::EphemeralReply,
            SentCall::Ephemeral {
                channel_id: channel_id.to_string(),
                text: text.to_string(),
                user_id: user_id.to_string(),
            },
        )
    }

    async fn send_reaction(
        &self,
        channel_id: &str,
        message_ts: &str,
        emoji_name: &str,
    ) -> Result<(), SlackError> {
        self.record(
            ResponseChannel::ReactionEmoji,
            SentCall::Reaction {
                channel_id: channel_id.to_string(),
                message_ts: message_ts.to_string(),
                emoji_name: emoji_name.to_string(),
            },
        )
    }
}
