//! Slack API client module
//!
//! Encapsulates the Slack Web API calls the bot makes, with retry on rate
//! limiting and error handling.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use super::response_builder::{
    build_direct_message_payload, build_ephemeral_payload, build_reaction_payload,
    build_thread_reply_payload,
};
use crate::core::config::DEFAULT_API_BASE_URL;
use crate::core::models::{ChannelInfo, UserInfo};
use crate::core::traits::{ChatDirectory, ChatSender};
use crate::errors::SlackError;

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

const MAX_RATE_LIMIT_RETRIES: usize = 3;
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ConversationsInfoResponse {
    channel: ConversationsInfoChannel,
}

#[derive(Debug, Deserialize)]
struct ConversationsInfoChannel {
    id: String,
    name: Option<String>,
    num_members: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    user: UsersInfoUser,
}

#[derive(Debug, Deserialize)]
struct UsersInfoUser {
    id: String,
    name: Option<String>,
    profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    display_name: Option<String>,
}

/// Identity of the token owner as reported by `auth.test`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub user_id: String,
    pub user: String,
    pub team: String,
    pub team_id: Option<String>,
}

/// Slack Web API client with rate-limit retry and error handling
pub struct SlackClient {
    token: String,
    api_base: String,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE_URL)
    }

    /// Point the client at another API root, e.g. a local mock server.
    #[must_use]
    pub fn with_api_base(token: String, api_base: impl Into<String>) -> Self {
        Self {
            token,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.api_base, method)
    }

    /// Retries only calls Slack rejected with HTTP 429. Nothing was processed
    /// for those, so a retried send can never be delivered twice.
    ///
    /// The next attempt waits at least as long as the `Retry-After` header
    /// asked for, capped at [`MAX_RETRY_AFTER`].
    async fn with_retry<F, Fut, T>(&self, mut operation: F) -> Result<T, SlackError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, SlackError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(250)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(MAX_RATE_LIMIT_RETRIES);

        let retry_after_secs = AtomicU64::new(0);

        RetryIf::start(
            strategy,
            || {
                let wait = retry_after_secs.swap(0, Ordering::Relaxed);
                let call = operation();
                async move {
                    if wait > 0 {
                        tokio::time::sleep(Duration::from_secs(wait)).await;
                    }
                    call.await
                }
            },
            |e: &SlackError| match e {
                SlackError::RateLimited { retry_after_secs: secs } => {
                    let wait = secs.unwrap_or(0).min(MAX_RETRY_AFTER.as_secs());
                    warn!(retry_after_secs = wait, "Slack API rate limited, backing off");
                    retry_after_secs.store(wait, Ordering::Relaxed);
                    true
                }
                _ => false,
            },
        )
        .await
    }

    async fn post_json(&self, method: &str, payload: &Value) -> Result<Value, SlackError> {
        self.with_retry(|| async move {
            let resp = HTTP_CLIENT
                .post(self.method_url(method))
                .bearer_auth(&self.token)
                .json(payload)
                .send()
                .await
                .map_err(|e| SlackError::HttpError(format!("{method}: {e}")))?;

            read_response(method, resp).await
        })
        .await
    }

    async fn get_form(&self, method: &str, params: &[(&str, &str)]) -> Result<Value, SlackError> {
        self.with_retry(|| async move {
            let resp = HTTP_CLIENT
                .get(self.method_url(method))
                .bearer_auth(&self.token)
                .query(params)
                .send()
                .await
                .map_err(|e| SlackError::HttpError(format!("{method}: {e}")))?;

            read_response(method, resp).await
        })
        .await
    }

    /// # Errors
    ///
    /// Returns an error if the token is rejected or the response is malformed.
    pub async fn auth_test(&self) -> Result<BotIdentity, SlackError> {
        let body = self.post_json("auth.test", &json!({})).await?;
        parse_body("auth.test", body)
    }
}

/// Turn a raw HTTP response into the JSON body of a successful Slack call.
async fn read_response(method: &str, resp: Response) -> Result<Value, SlackError> {
    let status = resp.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SlackError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }

    if !status.is_success() {
        return Err(SlackError::ApiError(format!("{method} HTTP {status}")));
    }

    let body: Value = resp
        .json()
        .await
        .map_err(|e| SlackError::ParseError(format!("{method} JSON parse error: {e}")))?;

    if !body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Err(SlackError::ApiError(format!(
            "{method} error: {}",
            body.get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
        )));
    }

    if let Some(warning) = body.get("warning").and_then(Value::as_str) {
        debug!("{} warning: {}", method, warning);
    }

    Ok(body)
}

/// `Retry-After` in whole seconds, when Slack sent one.
fn parse_retry_after(resp: &Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

fn parse_body<T: DeserializeOwned>(method: &str, body: Value) -> Result<T, SlackError> {
    serde_json::from_value(body)
        .map_err(|e| SlackError::ParseError(format!("{method} response: {e}")))
}

#[async_trait]
impl ChatDirectory for SlackClient {
    async fn fetch_channel_info(&self, channel_id: &str) -> Result<ChannelInfo, SlackError> {
        let body = self
            .get_form(
                "conversations.info",
                &[("channel", channel_id), ("include_num_members", "true")],
            )
            .await?;
        let resp: ConversationsInfoResponse = parse_body("conversations.info", body)?;

        Ok(ChannelInfo {
            name: resp.channel.name.unwrap_or_else(|| resp.channel.id.clone()),
            id: resp.channel.id,
            member_count: resp.channel.num_members,
        })
    }

    async fn fetch_user_info(&self, user_id: &str) -> Result<UserInfo, SlackError> {
        let body = self.get_form("users.info", &[("user", user_id)]).await?;
        let resp: UsersInfoResponse = parse_body("users.info", body)?;

        let name = resp
            .user
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| {
                resp.user
                    .profile
                    .and_then(|p| p.display_name)
                    .filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| resp.user.id.clone());

        Ok(UserInfo {
            id: resp.user.id,
            name,
        })
    }
}

#[async_trait]
impl ChatSender for SlackClient {
    async fn send_direct_message(&self, user_id: &str, text: &str) -> Result<(), SlackError> {
        let payload = build_direct_message_payload(user_id, text);
        self.post_json("chat.postMessage", &payload).await?;
        Ok(())
    }

    async fn send_thread_reply(
        &self,
        channel_id: &str,
        text: &str,
        thread_ts: &str,
    ) -> Result<(), SlackError> {
        let payload = build_thread_reply_payload(channel_id, text, thread_ts);
        self.post_json("chat.postMessage", &payload).await?;
        Ok(())
    }

    async fn send_ephemeral(
        &self,
        channel_id: &str,
        text: &str,
        user_id: &str,
    ) -> Result<(), SlackError> {
        let payload = build_ephemeral_payload(channel_id, text, user_id);
        self.post_json("chat.postEphemeral", &payload).await?;
        Ok(())
    }

    async fn send_reaction(
        &self,
        channel_id: &str,
        message_ts: &str,
        emoji_name: &str,
    ) -> Result<(), SlackError> {
        let payload = build_reaction_payload(channel_id, message_ts, emoji_name);
        self.post_json("reactions.add", &payload).await?;
        Ok(())
    }
}
