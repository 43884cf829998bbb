//! JSON payloads for the Slack Web API methods the bot calls.
//!
//! Notices are sent as the bot itself with `link_names` enabled so that
//! `<@name>` and `#channel` references render as links.

use serde_json::{Value, json};

/// `chat.postMessage` addressed to a user id, which Slack routes to the DM.
#[must_use]
pub fn build_direct_message_payload(user_id: &str, text: &str) -> Value {
    json!({
        "channel": user_id,
        "text": text,
        "as_user": true,
        "link_names": true,
    })
}

/// `chat.postMessage` as a reply in the thread rooted at `thread_ts`.
#[must_use]
pub fn build_thread_reply_payload(channel_id: &str, text: &str, thread_ts: &str) -> Value {
    json!({
        "channel": channel_id,
        "text": text,
        "thread_ts": thread_ts,
        "as_user": true,
        "link_names": true,
    })
}

/// `chat.postEphemeral`, visible to `user_id` only.
#[must_use]
pub fn build_ephemeral_payload(channel_id: &str, text: &str, user_id: &str) -> Value {
    json!({
        "channel": channel_id,
        "text": text,
        "user": user_id,
        "as_user": true,
        "link_names": true,
    })
}

/// `reactions.add` on the message at `timestamp`.
#[must_use]
pub fn build_reaction_payload(channel_id: &str, timestamp: &str, emoji_name: &str) -> Value {
    json!({
        "channel": channel_id,
        "timestamp": timestamp,
        "name": emoji_name,
    })
}
