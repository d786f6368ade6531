//! The platform client interface.
//!
//! The multiplexer never talks to the platform directly. Everything it needs
//! (the bot's identity, the guild/channel cache, remote fetches, permission
//! bits, and the few write primitives handlers use) goes through [`Client`].
//!
//! # Cache Semantics
//!
//! The cache accessors are synchronous and cheap; the `fetch_*` methods reach
//! the remote API. Callers that miss the cache fetch remotely and then try
//! [`Client::cache_guild`] / [`Client::cache_channel`] so the next lookup hits.
//! Implementations must synchronize their cache internally: the same client is
//! shared by every dispatch task.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    Channel, ChannelId, Embed, Guild, GuildId, Message, MessageId, Permissions, User, UserId,
};

/// Errors returned by client operations.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The requested object does not exist in the cache.
    #[error("{kind} {id} not found in cache")]
    NotCached {
        /// Object kind (e.g. "guild").
        kind: &'static str,
        /// The missing identifier.
        id: u64,
    },

    /// The remote API does not know the requested object.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Object kind (e.g. "channel").
        kind: &'static str,
        /// The missing identifier.
        id: u64,
    },

    /// The platform refused the operation.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The client has no live session.
    #[error("client is not connected")]
    NotConnected,

    /// The remote API returned an error.
    #[error("API error ({code}): {message}")]
    Api {
        /// Platform error code.
        code: i32,
        /// Platform error message.
        message: String,
    },

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    pub fn not_cached(kind: &'static str, id: u64) -> Self {
        Self::NotCached { kind, id }
    }

    pub fn not_found(kind: &'static str, id: u64) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// An established voice connection.
///
/// The audio pipeline owns what happens next; the core only reports where the
/// bot joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConnection {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub self_mute: bool,
    pub self_deaf: bool,
}

/// The capabilities the multiplexer consumes from the platform client.
#[async_trait]
pub trait Client: Send + Sync {
    /// The bot's own user.
    fn current_user(&self) -> &User;

    /// The shard this client serves, used for log context.
    fn shard_id(&self) -> u32 {
        0
    }

    /// Looks up a guild in the local cache.
    fn cached_guild(&self, id: GuildId) -> ClientResult<Arc<Guild>>;

    /// Inserts or replaces a guild in the local cache.
    fn cache_guild(&self, guild: Arc<Guild>) -> ClientResult<()>;

    /// Looks up a channel in the local cache.
    fn cached_channel(&self, id: ChannelId) -> ClientResult<Arc<Channel>>;

    /// Inserts or replaces a channel in the local cache.
    fn cache_channel(&self, channel: Arc<Channel>) -> ClientResult<()>;

    /// Fetches a guild from the remote API.
    async fn fetch_guild(&self, id: GuildId) -> ClientResult<Guild>;

    /// Fetches a channel from the remote API.
    async fn fetch_channel(&self, id: ChannelId) -> ClientResult<Channel>;

    /// Fetches a single message from the remote API.
    async fn fetch_message(&self, channel: ChannelId, message: MessageId) -> ClientResult<Message>;

    /// Computes a user's effective permissions in a channel.
    fn channel_permissions(&self, user: UserId, channel: ChannelId) -> ClientResult<Permissions>;

    /// Sends a plain text message.
    async fn send_message(&self, channel: ChannelId, content: &str) -> ClientResult<Message>;

    /// Sends an embed, optionally with a text body.
    async fn send_embed(
        &self,
        channel: ChannelId,
        content: Option<&str>,
        embed: &Embed,
    ) -> ClientResult<Message>;

    /// Joins a voice channel.
    async fn join_voice(
        &self,
        guild: GuildId,
        channel: ChannelId,
        self_mute: bool,
        self_deaf: bool,
    ) -> ClientResult<VoiceConnection>;

    /// Bans a user from a guild, deleting `delete_message_days` of history.
    async fn create_ban(
        &self,
        guild: GuildId,
        user: UserId,
        delete_message_days: u8,
    ) -> ClientResult<()>;

    /// Returns self as an `Arc<dyn Any>` for downcasting to the concrete client.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A shared client trait object.
pub type BoxedClient = Arc<dyn Client>;

/// Attempts to downcast a [`BoxedClient`] to a concrete client type.
///
/// ```rust,ignore
/// if let Some(memory) = downcast_client::<MemoryClient>(ctx.client_arc()) {
///     assert_eq!(memory.sent().len(), 1);
/// }
/// ```
pub fn downcast_client<T: Client + 'static>(client: BoxedClient) -> Option<Arc<T>> {
    Arc::downcast::<T>(client.as_any()).ok()
}
