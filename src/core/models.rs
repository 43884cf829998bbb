use serde::{Deserialize, Serialize};
use std::fmt;

/// One chat message as received from the event stream.
///
/// `author_id` is absent for automated actors; `bot_id` is set when an
/// integration posted the message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub channel_id: String,
    pub author_id: Option<String>,
    pub bot_id: Option<String>,
    pub text: Option<String>,
    pub thread_ts: Option<String>,
    pub ts: String,
}

impl InboundMessage {
    /// Timestamp a thread reply should be anchored to.
    #[must_use]
    pub fn thread_anchor(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    /// `None` when Slack did not report a member count.
    pub member_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    BroadcastMention,
    BareUserReference,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::BroadcastMention => write!(f, "broadcast_mention"),
            PatternKind::BareUserReference => write!(f, "bare_user_reference"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreReason {
    FromAutomatedActor,
    NotAPublicChannel,
    NoText,
    NoPatternMatch,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::FromAutomatedActor => write!(f, "from_automated_actor"),
            IgnoreReason::NotAPublicChannel => write!(f, "not_a_public_channel"),
            IgnoreReason::NoText => write!(f, "no_text"),
            IgnoreReason::NoPatternMatch => write!(f, "no_pattern_match"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Ignored(IgnoreReason),
    Matched(PatternKind),
}

/// The ways a courtesy notice can reach the author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseChannel {
    DirectMessage,
    ThreadReply,
    EphemeralReply,
    ReactionEmoji,
}

impl fmt::Display for ResponseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseChannel::DirectMessage => write!(f, "direct_message"),
            ResponseChannel::ThreadReply => write!(f, "thread_reply"),
            ResponseChannel::EphemeralReply => write!(f, "ephemeral_reply"),
            ResponseChannel::ReactionEmoji => write!(f, "reaction_emoji"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub channel: ResponseChannel,
    /// `Err` carries the failure detail.
    pub result: Result<(), String>,
}

/// Per-channel results of one dispatch. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<DeliveryOutcome>,
}

impl DispatchReport {
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    #[must_use]
    pub fn outcome_for(&self, channel: ResponseChannel) -> Option<&DeliveryOutcome> {
        self.outcomes.iter().find(|o| o.channel == channel)
    }
}

/// What happened to one inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    Ignored(IgnoreReason),
    /// Matched, but the channel is below the population threshold.
    Suppressed {
        pattern: PatternKind,
        member_count: u64,
        min_members: u64,
    },
    Dispatched {
        pattern: PatternKind,
        report: DispatchReport,
    },
}
