use thiserror::Error;

/// Failures talking to the Slack Web API.
#[derive(Debug, Error)]
pub enum SlackError {
    #[error("Failed to parse Slack response: {0}")]
    ParseError(String),

    #[error("Failed to access Slack API: {0}")]
    ApiError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Rate limited by Slack API (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Slack client error: {0}")]
    GeneralError(String),
}

impl SlackError {
    /// Whether Slack rejected the call before processing it.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, SlackError::RateLimited { .. })
    }
}

impl From<reqwest::Error> for SlackError {
    fn from(error: reqwest::Error) -> Self {
        SlackError::HttpError(error.to_string())
    }
}

impl From<serde_json::Error> for SlackError {
    fn from(error: serde_json::Error) -> Self {
        SlackError::ParseError(error.to_string())
    }
}

/// Failures of a single handling cycle or of startup configuration.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("Failed to look up channel {channel_id}: {source}")]
    ChannelLookup {
        channel_id: String,
        #[source]
        source: SlackError,
    },

    #[error("Failed to look up user {user_id}: {source}")]
    UserLookup {
        user_id: String,
        #[source]
        source: SlackError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Handling timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl NotifierError {
    /// True for failures resolving channel or user metadata.
    #[must_use]
    pub fn is_metadata_failure(&self) -> bool {
        matches!(
            self,
            NotifierError::ChannelLookup { .. } | NotifierError::UserLookup { .. }
        )
    }
}
