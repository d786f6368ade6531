//! An in-process [`Client`] implementation.
//!
//! `MemoryClient` keeps two tiers of state: a *cache* (what a real client
//! would hold locally) and a *remote* store (what the platform API would
//! answer). This lets callers exercise the cache-then-fetch path without a
//! network. Every write primitive is recorded so tests and demos can inspect
//! what the bot did.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::client::{Client, ClientError, ClientResult, VoiceConnection};
use crate::model::{
    Channel, ChannelId, Embed, Guild, GuildId, Message, MessageId, Permissions, User, UserId,
};

/// A message written through the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: ChannelId,
    pub content: Option<String>,
    pub embed: Option<Embed>,
}

/// A ban written through the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BanRecord {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub delete_message_days: u8,
}

/// In-memory platform client.
pub struct MemoryClient {
    user: User,
    shard_id: u32,
    cached_guilds: RwLock<HashMap<GuildId, Arc<Guild>>>,
    cached_channels: RwLock<HashMap<ChannelId, Arc<Channel>>>,
    remote_guilds: RwLock<HashMap<GuildId, Guild>>,
    remote_channels: RwLock<HashMap<ChannelId, Channel>>,
    remote_messages: RwLock<HashMap<(ChannelId, MessageId), Message>>,
    permissions: RwLock<HashMap<(UserId, ChannelId), Permissions>>,
    sent: Mutex<Vec<SentMessage>>,
    bans: Mutex<Vec<BanRecord>>,
    voice: Mutex<Vec<VoiceConnection>>,
    reject_cache_writes: AtomicBool,
    fail_sends: AtomicBool,
    next_message_id: AtomicU64,
}

impl MemoryClient {
    /// Creates a client acting as `user`, with empty cache and remote state.
    pub fn new(user: User) -> Self {
        Self {
            user,
            shard_id: 0,
            cached_guilds: RwLock::new(HashMap::new()),
            cached_channels: RwLock::new(HashMap::new()),
            remote_guilds: RwLock::new(HashMap::new()),
            remote_channels: RwLock::new(HashMap::new()),
            remote_messages: RwLock::new(HashMap::new()),
            permissions: RwLock::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
            bans: Mutex::new(Vec::new()),
            voice: Mutex::new(Vec::new()),
            reject_cache_writes: AtomicBool::new(false),
            fail_sends: AtomicBool::new(false),
            next_message_id: AtomicU64::new(1),
        }
    }

    /// Sets the shard id reported to log lines.
    pub fn with_shard(mut self, shard_id: u32) -> Self {
        self.shard_id = shard_id;
        self
    }

    /// Puts a guild straight into the cache.
    pub fn cache_guild_state(&self, guild: Guild) {
        self.cached_guilds.write().insert(guild.id, Arc::new(guild));
    }

    /// Puts a channel straight into the cache.
    pub fn cache_channel_state(&self, channel: Channel) {
        self.cached_channels
            .write()
            .insert(channel.id, Arc::new(channel));
    }

    /// Makes a guild available only through the remote API.
    pub fn insert_remote_guild(&self, guild: Guild) {
        self.remote_guilds.write().insert(guild.id, guild);
    }

    /// Makes a channel available only through the remote API.
    pub fn insert_remote_channel(&self, channel: Channel) {
        self.remote_channels.write().insert(channel.id, channel);
    }

    /// Makes a message fetchable through the remote API.
    pub fn insert_remote_message(&self, message: Message) {
        self.remote_messages
            .write()
            .insert((message.channel_id, message.id), message);
    }

    /// Grants `user` the given permissions in `channel`.
    pub fn grant(&self, user: UserId, channel: ChannelId, permissions: Permissions) {
        self.permissions.write().insert((user, channel), permissions);
    }

    /// Makes every subsequent cache insert fail.
    pub fn reject_cache_writes(&self, reject: bool) {
        self.reject_cache_writes.store(reject, Ordering::SeqCst);
    }

    /// Makes every subsequent send fail.
    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Whether a guild is currently cached.
    pub fn is_guild_cached(&self, id: GuildId) -> bool {
        self.cached_guilds.read().contains_key(&id)
    }

    /// Whether a channel is currently cached.
    pub fn is_channel_cached(&self, id: ChannelId) -> bool {
        self.cached_channels.read().contains_key(&id)
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Text of every plain message sent so far, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter_map(|m| m.content.clone())
            .collect()
    }

    /// Every ban issued so far.
    pub fn bans(&self) -> Vec<BanRecord> {
        self.bans.lock().clone()
    }

    /// Every voice join so far.
    pub fn voice_connections(&self) -> Vec<VoiceConnection> {
        self.voice.lock().clone()
    }

    fn record_send(
        &self,
        channel: ChannelId,
        content: Option<&str>,
        embed: Option<&Embed>,
    ) -> ClientResult<Message> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                code: 50013,
                message: "Missing Permissions".into(),
            });
        }

        self.sent.lock().push(SentMessage {
            channel_id: channel,
            content: content.map(str::to_owned),
            embed: embed.cloned(),
        });

        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        Ok(Message::new(
            id,
            channel,
            self.user.clone(),
            content.unwrap_or_default(),
        ))
    }
}

#[async_trait]
impl Client for MemoryClient {
    fn current_user(&self) -> &User {
        &self.user
    }

    fn shard_id(&self) -> u32 {
        self.shard_id
    }

    fn cached_guild(&self, id: GuildId) -> ClientResult<Arc<Guild>> {
        self.cached_guilds
            .read()
            .get(&id)
            .cloned()
            .ok_or(ClientError::not_cached("guild", id.get()))
    }

    fn cache_guild(&self, guild: Arc<Guild>) -> ClientResult<()> {
        if self.reject_cache_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Other("cache is read-only".into()));
        }
        self.cached_guilds.write().insert(guild.id, guild);
        Ok(())
    }

    fn cached_channel(&self, id: ChannelId) -> ClientResult<Arc<Channel>> {
        self.cached_channels
            .read()
            .get(&id)
            .cloned()
            .ok_or(ClientError::not_cached("channel", id.get()))
    }

    fn cache_channel(&self, channel: Arc<Channel>) -> ClientResult<()> {
        if self.reject_cache_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Other("cache is read-only".into()));
        }
        self.cached_channels.write().insert(channel.id, channel);
        Ok(())
    }

    async fn fetch_guild(&self, id: GuildId) -> ClientResult<Guild> {
        debug!(guild = %id, "Remote guild fetch");
        self.remote_guilds
            .read()
            .get(&id)
            .cloned()
            .ok_or(ClientError::not_found("guild", id.get()))
    }

    async fn fetch_channel(&self, id: ChannelId) -> ClientResult<Channel> {
        debug!(channel = %id, "Remote channel fetch");
        self.remote_channels
            .read()
            .get(&id)
            .cloned()
            .ok_or(ClientError::not_found("channel", id.get()))
    }

    async fn fetch_message(&self, channel: ChannelId, message: MessageId) -> ClientResult<Message> {
        self.remote_messages
            .read()
            .get(&(channel, message))
            .cloned()
            .ok_or(ClientError::not_found("message", message.get()))
    }

    fn channel_permissions(&self, user: UserId, channel: ChannelId) -> ClientResult<Permissions> {
        Ok(self
            .permissions
            .read()
            .get(&(user, channel))
            .copied()
            .unwrap_or_else(Permissions::empty))
    }

    async fn send_message(&self, channel: ChannelId, content: &str) -> ClientResult<Message> {
        self.record_send(channel, Some(content), None)
    }

    async fn send_embed(
        &self,
        channel: ChannelId,
        content: Option<&str>,
        embed: &Embed,
    ) -> ClientResult<Message> {
        self.record_send(channel, content, Some(embed))
    }

    async fn join_voice(
        &self,
        guild: GuildId,
        channel: ChannelId,
        self_mute: bool,
        self_deaf: bool,
    ) -> ClientResult<VoiceConnection> {
        let connection = VoiceConnection {
            guild_id: guild,
            channel_id: channel,
            self_mute,
            self_deaf,
        };
        self.voice.lock().push(connection.clone());
        Ok(connection)
    }

    async fn create_ban(
        &self,
        guild: GuildId,
        user: UserId,
        delete_message_days: u8,
    ) -> ClientResult<()> {
        self.bans.lock().push(BanRecord {
            guild_id: guild,
            user_id: user,
            delete_message_days,
        });
        Ok(())
    }

    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl std::fmt::Debug for MemoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryClient")
            .field("user", &self.user.id)
            .field("shard_id", &self.shard_id)
            .field("cached_guilds", &self.cached_guilds.read().len())
            .field("cached_channels", &self.cached_channels.read().len())
            .finish_non_exhaustive()
    }
}
