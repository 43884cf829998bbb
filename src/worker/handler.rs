use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::core::config::DispatchConfig;
use crate::core::models::{
    ChannelInfo, Classification, HandleOutcome, InboundMessage, PatternKind, UserInfo,
};
use crate::core::traits::{ChatDirectory, ChatSender};
use crate::errors::NotifierError;
use crate::features::{classify::classify, deliver::dispatch, gate::meets_population_threshold};

/// Runs one inbound message through classification, gating and dispatch.
#[derive(Clone)]
pub struct MessageHandler {
    directory: Arc<dyn ChatDirectory>,
    sender: Arc<dyn ChatSender>,
    config: Arc<DispatchConfig>,
}

impl MessageHandler {
    #[must_use]
    pub fn new(
        directory: Arc<dyn ChatDirectory>,
        sender: Arc<dyn ChatSender>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            directory,
            sender,
            config: Arc::new(config),
        }
    }

    #[must_use]
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Handle one message.
    ///
    /// Delivery failures are folded into the returned report and never turn
    /// into an `Err`.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::ChannelLookup` or `NotifierError::UserLookup`
    /// when metadata for a matched message cannot be resolved; nothing is sent
    /// in that case.
    pub async fn handle_inbound_message(
        &self,
        message: &InboundMessage,
    ) -> Result<HandleOutcome, NotifierError> {
        match self.prepare(message).await? {
            Prepared::Done(outcome) => Ok(outcome),
            Prepared::Ready(notice) => Ok(self.deliver(message, notice).await),
        }
    }

    /// [`MessageHandler::handle_inbound_message`] with `limit` applied to
    /// classification and metadata lookups.
    ///
    /// Once dispatch has started every enabled channel is attempted to
    /// completion; the deadline never cancels a send.
    ///
    /// # Errors
    ///
    /// Returns `NotifierError::Timeout` when the lookups do not finish in
    /// time, otherwise the same errors as the unbounded call.
    pub async fn handle_within(
        &self,
        message: &InboundMessage,
        limit: Duration,
    ) -> Result<HandleOutcome, NotifierError> {
        let prepared = tokio::time::timeout(limit, self.prepare(message))
            .await
            .map_err(|_| NotifierError::Timeout(limit))??;

        match prepared {
            Prepared::Done(outcome) => Ok(outcome),
            Prepared::Ready(notice) => Ok(self.deliver(message, notice).await),
        }
    }

    /// Everything up to the first send: classification, lookups, the gate.
    async fn prepare(&self, message: &InboundMessage) -> Result<Prepared, NotifierError> {
        #[cfg(feature = "debug-logs")]
        debug!("Received message: {:?}", message);

        #[cfg(not(feature = "debug-logs"))]
        debug!(
            channel_id = %message.channel_id,
            ts = %message.ts,
            "Received message"
        );

        let pattern = match classify(message, &self.config) {
            Classification::Ignored(reason) => {
                debug!(%reason, "Message ignored");
                return Ok(Prepared::Done(HandleOutcome::Ignored(reason)));
            }
            Classification::Matched(pattern) => pattern,
        };

        // Automated actors were ignored above, so a matched message has an author.
        let author_id = message.author_id.as_deref().unwrap_or_default();

        let channel = self
            .directory
            .fetch_channel_info(&message.channel_id)
            .await
            .map_err(|source| {
                error!(channel_id = %message.channel_id, "Getting channel info: {}", source);
                NotifierError::ChannelLookup {
                    channel_id: message.channel_id.clone(),
                    source,
                }
            })?;

        let min_members = self.config.min_members_for_notification;
        if !meets_population_threshold(&channel, min_members) {
            let member_count = channel.member_count.unwrap_or_default();
            debug!(
                channel = %channel.name,
                member_count,
                min_members,
                "Channel does not meet minimum member count, ignoring"
            );
            return Ok(Prepared::Done(HandleOutcome::Suppressed {
                pattern,
                member_count,
                min_members,
            }));
        }

        let author = self
            .directory
            .fetch_user_info(author_id)
            .await
            .map_err(|source| {
                error!(user_id = %author_id, "Getting user info: {}", source);
                NotifierError::UserLookup {
                    user_id: author_id.to_string(),
                    source,
                }
            })?;

        Ok(Prepared::Ready(Notice {
            pattern,
            channel,
            author,
        }))
    }

    async fn deliver(&self, message: &InboundMessage, notice: Notice) -> HandleOutcome {
        let Notice {
            pattern,
            channel,
            author,
        } = notice;

        if self.config.response_channels.is_empty() {
            warn!(%pattern, "Message matched but no response channel is enabled");
        }

        let report = dispatch(
            self.sender.as_ref(),
            message,
            pattern,
            &channel,
            &author,
            &self.config,
        )
        .await;

        info!(
            %pattern,
            attempted = report.attempted(),
            succeeded = report.successes(),
            failed = report.failures(),
            "Courtesy notice dispatched"
        );

        HandleOutcome::Dispatched { pattern, report }
    }
}

/// A matched message whose metadata has been resolved.
struct Notice {
    pattern: PatternKind,
    channel: ChannelInfo,
    author: UserInfo,
}

enum Prepared {
    Done(HandleOutcome),
    Ready(Notice),
}
