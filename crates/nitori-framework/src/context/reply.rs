//! Replies into the context's channel.

use std::fmt;

use tracing::{error, warn};

use nitori_core::{ChannelId, ClientError, Embed, Message, Permissions};

use super::Context;
use crate::strings::ERROR_OCCURRED;

impl Context {
    /// Sends a text message into the context's channel.
    ///
    /// Returns `None` without sending when the bot may not post here. A send
    /// failure is logged and followed by one attempt to post the generic
    /// failure message.
    pub async fn send_message(&self, content: &str) -> Option<Message> {
        let channel = self.reply_channel()?;
        match self.client.send_message(channel, content).await {
            Ok(message) => Some(message),
            Err(e) => {
                self.report_send_failure(channel, "message", &e).await;
                None
            }
        }
    }

    /// Sends an embed into the context's channel.
    ///
    /// An empty `content` sends the embed alone. Failure handling matches
    /// [`send_message`](Self::send_message).
    pub async fn send_embed(&self, content: &str, embed: &Embed) -> Option<Message> {
        let channel = self.reply_channel()?;
        let content = (!content.is_empty()).then_some(content);
        match self.client.send_embed(channel, content, embed).await {
            Ok(message) => Some(message),
            Err(e) => {
                self.report_send_failure(channel, "embed", &e).await;
                None
            }
        }
    }

    /// Reports a handler outcome to the invoking user.
    ///
    /// Returns `true` for `Ok`. An error is logged and answered with the
    /// generic failure message, followed by the error text itself when the
    /// multiplexer reveals errors.
    pub async fn handle_error<E: fmt::Display>(&self, result: Result<(), E>) -> bool {
        let detail = match result {
            Ok(()) => return true,
            Err(e) => e.to_string(),
        };

        error!(error = %detail, "Error occurred while executing command");
        self.send_message(ERROR_OCCURRED).await;
        if self.mux.reveal_errors() {
            self.send_message(&detail).await;
        }
        false
    }

    /// The channel to reply into, if the bot may post there.
    fn reply_channel(&self) -> Option<ChannelId> {
        let Some(channel) = self.channel_id() else {
            warn!(event = %self.event.kind(), "No channel to reply into");
            return None;
        };
        if self.is_private || self.bot_has_permission(Permissions::SEND_MESSAGES) {
            Some(channel)
        } else {
            None
        }
    }

    async fn report_send_failure(&self, channel: ChannelId, what: &str, e: &ClientError) {
        error!(
            guild = ?self.guild.as_ref().map(|g| g.id),
            channel = %channel,
            error = %e,
            "Error while sending {what}"
        );
        let _ = self.client.send_message(channel, ERROR_OCCURRED).await;
    }
}
