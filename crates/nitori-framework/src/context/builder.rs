//! Context construction.
//!
//! Message-derived contexts (message create, reaction add/remove) resolve
//! their guild and channel through the cache-then-fetch helpers and run
//! targeting on the message text. Other contexts are assembled directly from
//! the event payload.

use std::sync::Arc;

use tracing::{debug, error};

use nitori_core::{
    BoxedClient, Channel, Client, Event, Guild, GuildId, GuildMemberUpdate, Member, Message,
    Reaction, User,
};

use super::Context;
use crate::fetch;
use crate::multiplexer::Multiplexer;
use crate::targeting::{self, Targeting};

/// What to do when a guild cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildRequirement {
    /// Abort context construction.
    Required,
    /// Continue with a placeholder carrying only the identifier.
    Placeholder,
}

/// Resolves a guild, applying `requirement` on failure.
pub(crate) async fn resolve_guild(
    client: &dyn Client,
    id: GuildId,
    requirement: GuildRequirement,
) -> Option<Arc<Guild>> {
    match fetch::get_guild(client, id).await {
        Some(guild) => Some(guild),
        None => match requirement {
            GuildRequirement::Required => None,
            GuildRequirement::Placeholder => {
                debug!(guild = %id, "Using placeholder guild");
                Some(Arc::new(Guild::placeholder(id)))
            }
        },
    }
}

impl Context {
    /// Creates an empty context for `event`.
    pub(crate) fn new(mux: Arc<Multiplexer>, client: BoxedClient, event: Event) -> Self {
        Self {
            mux,
            client,
            event,
            user: None,
            member: None,
            message: None,
            guild: None,
            channel: None,
            text: String::new(),
            fields: Vec::new(),
            is_private: false,
            targeting: Targeting::default(),
        }
    }

    /// Builds the context handed to the hooks of `event`.
    ///
    /// Returns `None` when a required guild, channel or message cannot be
    /// resolved.
    pub(crate) async fn from_event(
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        event: Event,
    ) -> Option<Self> {
        match event {
            Event::Ready(ready) => {
                let user = client.current_user().clone();
                Some(Self::new(mux, client, Event::Ready(ready)).with_user(user))
            }
            Event::MessageCreate(message) => {
                let event = Event::MessageCreate(message.clone());
                Self::from_message(mux, client, message, event).await
            }
            Event::MessageUpdate(message) => {
                let event = Event::MessageUpdate(message.clone());
                Some(Self::new(mux, client, event).with_message(message))
            }
            Event::MessageDelete(delete) => {
                let message = delete.message.clone();
                let mut ctx = Self::new(mux, client, Event::MessageDelete(delete));
                ctx.message = message;
                Some(ctx)
            }
            Event::ReactionAdd(reaction) => {
                Self::from_reaction(mux, client, reaction, Event::ReactionAdd).await
            }
            Event::ReactionRemove(reaction) => {
                Self::from_reaction(mux, client, reaction, Event::ReactionRemove).await
            }
            Event::GuildMemberAdd(update) => {
                Self::from_member(mux, client, update, Event::GuildMemberAdd).await
            }
            Event::GuildMemberRemove(update) => {
                Self::from_member(mux, client, update, Event::GuildMemberRemove).await
            }
            Event::GuildDelete(delete) => {
                let guild = Arc::new(delete.guild.clone());
                Some(Self::new(mux, client, Event::GuildDelete(delete)).with_guild(guild))
            }
        }
    }

    /// Fetches the reacted-to message and builds its context.
    async fn from_reaction(
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        reaction: Reaction,
        wrap: fn(Reaction) -> Event,
    ) -> Option<Self> {
        let message = match client
            .fetch_message(reaction.channel_id, reaction.message_id)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                error!(
                    message = %reaction.message_id,
                    channel = %reaction.channel_id,
                    error = %e,
                    "Unable to get reacted message"
                );
                return None;
            }
        };
        Self::from_message(mux, client, message, wrap(reaction)).await
    }

    /// Builds a member add/remove context, tolerating an unresolvable guild.
    async fn from_member(
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        update: GuildMemberUpdate,
        wrap: fn(GuildMemberUpdate) -> Event,
    ) -> Option<Self> {
        let guild =
            resolve_guild(client.as_ref(), update.guild_id, GuildRequirement::Placeholder).await?;
        let member = update.member.clone();
        Some(
            Self::new(mux, client, wrap(update))
                .with_user(member.user.clone())
                .with_member(member)
                .with_guild(guild),
        )
    }

    /// Builds the context of a message, or of a reaction on that message.
    ///
    /// The channel is resolved first. Outside private channels the guild
    /// comes from the message or, failing that, from the channel, since
    /// fetched messages may carry no guild id.
    ///
    /// Returns `None` when the channel cannot be resolved, or when a
    /// non-private context has no resolvable guild.
    pub(crate) async fn from_message(
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        message: Message,
        event: Event,
    ) -> Option<Self> {
        let channel = fetch::get_channel(client.as_ref(), message.channel_id).await?;
        let is_private = channel.kind.is_private();

        let guild = if is_private {
            None
        } else {
            let Some(id) = message.guild_id.or(channel.guild_id) else {
                debug!(channel = %channel.id, "Guild channel without a guild id");
                return None;
            };
            Some(resolve_guild(client.as_ref(), id, GuildRequirement::Required).await?)
        };

        let prefix = mux.effective_prefix(guild.as_ref().map(|g| g.id)).await;
        let targeting = targeting::resolve(
            message.content.trim(),
            client.current_user().id,
            &message.mentions,
            &prefix,
        );

        let member = if is_private {
            None
        } else {
            message.member.clone()
        };

        let mut ctx = Self::new(mux, client, event)
            .with_user(message.author.clone())
            .with_channel(channel)
            .with_private(is_private)
            .with_targeting(targeting);
        ctx.guild = guild;
        ctx.member = member;
        ctx.message = Some(message);
        Some(ctx)
    }

    pub(crate) fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub(crate) fn with_member(mut self, member: Member) -> Self {
        self.member = Some(member);
        self
    }

    pub(crate) fn with_message(mut self, message: Message) -> Self {
        self.message = Some(message);
        self
    }

    pub(crate) fn with_guild(mut self, guild: Arc<Guild>) -> Self {
        self.guild = Some(guild);
        self
    }

    pub(crate) fn with_channel(mut self, channel: Arc<Channel>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub(crate) fn with_private(mut self, is_private: bool) -> Self {
        self.is_private = is_private;
        self
    }

    pub(crate) fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.text = targeting.text.clone();
        self.targeting = targeting;
        self
    }

    pub(crate) fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }
}
