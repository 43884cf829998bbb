use std::env;
use std::time::Duration;

use crate::core::models::ResponseChannel;
use crate::errors::NotifierError;

pub const DEFAULT_API_BASE_URL: &str = "https://slack.com/api";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_HANDLE_TIMEOUT: Duration = Duration::from_secs(30);

/// Which response channels are enabled. The reaction channel carries its emoji.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseChannels {
    pub direct_message: bool,
    pub thread_reply: bool,
    pub ephemeral_reply: bool,
    pub reaction_emoji: Option<String>,
}

impl ResponseChannels {
    /// Enabled channels in dispatch order.
    #[must_use]
    pub fn enabled(&self) -> Vec<ResponseChannel> {
        let mut out = Vec::with_capacity(4);
        if self.direct_message {
            out.push(ResponseChannel::DirectMessage);
        }
        if self.thread_reply {
            out.push(ResponseChannel::ThreadReply);
        }
        if self.ephemeral_reply {
            out.push(ResponseChannel::EphemeralReply);
        }
        if self.reaction_emoji.is_some() {
            out.push(ResponseChannel::ReactionEmoji);
        }
        out
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }
}

/// Classification and dispatch settings, resolved once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchConfig {
    pub min_members_for_notification: u64,
    pub enable_mention_invite_rule: bool,
    pub response_channels: ResponseChannels,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub slack_app_token: String,
    pub slack_api_base_url: String,
    pub port: Option<u16>,
    pub log_level: String,
    pub handle_timeout: Duration,
    pub dispatch: DispatchConfig,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `NotifierError::Config` when a required variable is missing or
    /// a value cannot be parsed.
    pub fn from_env() -> Result<Self, NotifierError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let slack_bot_token = get("SLACK_BOT_TOKEN")
            .or_else(|| get("SLACK_TOKEN"))
            .ok_or_else(|| NotifierError::Config("SLACK_BOT_TOKEN: not set".to_string()))?;
        let slack_app_token = get("SLACK_APP_TOKEN")
            .ok_or_else(|| NotifierError::Config("SLACK_APP_TOKEN: not set".to_string()))?;

        let port = get("PORT")
            .map(|v| {
                v.parse::<u16>()
                    .map_err(|e| NotifierError::Config(format!("PORT: {e}")))
            })
            .transpose()?;

        let handle_timeout = get("HANDLE_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| NotifierError::Config(format!("HANDLE_TIMEOUT_SECS: {e}")))
            })
            .transpose()?
            .unwrap_or(DEFAULT_HANDLE_TIMEOUT);

        Ok(Self {
            slack_bot_token,
            slack_app_token,
            slack_api_base_url: get("SLACK_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            port,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            handle_timeout,
            dispatch: DispatchConfig::from_lookup(get)?,
        })
    }
}

impl DispatchConfig {
    /// # Errors
    ///
    /// Returns `NotifierError::Config` for unparsable numbers or booleans.
    pub fn from_lookup<F>(get: F) -> Result<Self, NotifierError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_members_for_notification = get("MIN_USERS_IN_CHANNEL")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|e| NotifierError::Config(format!("MIN_USERS_IN_CHANNEL: {e}")))
            })
            .transpose()?
            .unwrap_or(0);

        let flag = |key: &str| -> Result<bool, NotifierError> {
            get(key).map_or(Ok(false), |v| parse_bool(key, &v))
        };

        Ok(Self {
            min_members_for_notification,
            enable_mention_invite_rule: flag("ENABLE_MENTION_INVITE")?,
            response_channels: ResponseChannels {
                direct_message: flag("RESPONSE_TYPE_DM")?,
                thread_reply: flag("RESPONSE_TYPE_THREAD")?,
                ephemeral_reply: flag("RESPONSE_TYPE_EPHEMERAL")?,
                reaction_emoji: get("RESPONSE_TYPE_REACTION_EMOJI")
                    .map(|v| normalize_emoji_name(&v))
                    .filter(|v| !v.is_empty()),
            },
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, NotifierError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(NotifierError::Config(format!(
            "{key}: expected a boolean, got {other:?}"
        ))),
    }
}

/// `:wave:` and `wave` both name the same emoji for `reactions.add`.
#[must_use]
pub fn normalize_emoji_name(raw: &str) -> String {
    raw.trim().trim_matches(':').to_string()
}
