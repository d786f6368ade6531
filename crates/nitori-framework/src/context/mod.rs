//! The per-event execution context.
//!
//! One [`Context`] is built for every event the multiplexer handles and handed
//! to hooks and route handlers as `Arc<Context>`. It bundles the resolved
//! identities (user, member, guild, channel), the source message, the event
//! itself, and the targeting state of the message text.
//!
//! The context is read-only once handed out. The only field written after
//! construction is [`fields`](Context::fields), set by the command path right
//! before the route handler runs.
//!
//! Operations are grouped by concern:
//!
//! - [`reply`] sends messages and embeds and reports handler errors;
//! - [`lookup`] resolves members, channels, roles and voice state from query
//!   strings;
//! - [`moderation`] issues bans.

mod builder;
mod lookup;
mod moderation;
mod reply;

use std::fmt;
use std::sync::Arc;

use nitori_core::{BoxedClient, Channel, ChannelId, Event, Guild, Member, Message, Permissions, User};

use crate::multiplexer::Multiplexer;
use crate::targeting::Targeting;

pub use builder::GuildRequirement;

/// Everything a hook or route handler knows about one event.
#[derive(Clone)]
pub struct Context {
    mux: Arc<Multiplexer>,
    client: BoxedClient,
    event: Event,
    user: Option<User>,
    member: Option<Member>,
    message: Option<Message>,
    guild: Option<Arc<Guild>>,
    channel: Option<Arc<Channel>>,
    text: String,
    fields: Vec<String>,
    is_private: bool,
    targeting: Targeting,
}

impl Context {
    // ─── Event and collaborators ─────────────────────────────────────────────

    /// The event this context was built for.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// The multiplexer dispatching this event.
    pub fn multiplexer(&self) -> &Arc<Multiplexer> {
        &self.mux
    }

    pub fn client(&self) -> &BoxedClient {
        &self.client
    }

    /// Returns a clone of the client `Arc`.
    pub fn client_arc(&self) -> BoxedClient {
        Arc::clone(&self.client)
    }

    // ─── Resolved identities ─────────────────────────────────────────────────

    /// The acting user. Absent for guild-delete contexts.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The acting member. Only set in guild contexts.
    pub fn member(&self) -> Option<&Member> {
        self.member.as_ref()
    }

    /// The source message, if the event carries one.
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// The guild the event happened in. Absent for private contexts.
    pub fn guild(&self) -> Option<&Arc<Guild>> {
        self.guild.as_ref()
    }

    pub fn channel(&self) -> Option<&Arc<Channel>> {
        self.channel.as_ref()
    }

    /// The channel replies go to: the resolved channel, else the message's.
    pub fn channel_id(&self) -> Option<ChannelId> {
        self.channel
            .as_ref()
            .map(|c| c.id)
            .or_else(|| self.message.as_ref().map(|m| m.channel_id))
    }

    // ─── Text and targeting ──────────────────────────────────────────────────

    /// The normalized message text with the addressing token stripped.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The matched command fields. `fields()[0]` is the command token.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn is_private(&self) -> bool {
        self.is_private
    }

    /// Whether the message addresses the bot by mention or prefix.
    pub fn is_targeted(&self) -> bool {
        self.targeting.is_targeted()
    }

    pub fn has_prefix(&self) -> bool {
        self.targeting.has_prefix
    }

    pub fn has_mention(&self) -> bool {
        self.targeting.has_mention
    }

    pub fn has_leading_mention(&self) -> bool {
        self.targeting.has_leading_mention
    }

    /// Joins the fields from `start` on with single spaces.
    ///
    /// Returns an empty string when `start` is past the last field.
    pub fn stitch_fields(&self, start: usize) -> String {
        self.fields.get(start..).map(|f| f.join(" ")).unwrap_or_default()
    }

    /// The command prefix in effect for this context.
    ///
    /// Private contexts always use the multiplexer default; guild contexts
    /// ask the configured prefix source.
    pub async fn prefix(&self) -> String {
        let guild = if self.is_private {
            None
        } else {
            self.guild.as_ref().map(|g| g.id)
        };
        self.mux.effective_prefix(guild).await
    }

    // ─── Privileges ──────────────────────────────────────────────────────────

    /// Whether the acting user holds operator rank.
    pub fn is_operator(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| self.mux.privileges().is_operator(u.id))
    }

    /// Whether the acting user is the system administrator.
    pub fn is_administrator(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| self.mux.privileges().is_administrator(u.id))
    }

    /// Whether the acting user holds `permission` in this channel.
    ///
    /// Operators and the administrator always pass.
    pub fn has_permission(&self, permission: Permissions) -> bool {
        let Some(user) = &self.user else {
            return false;
        };
        if self.mux.privileges().is_operator(user.id) {
            return true;
        }
        let Some(channel) = self.channel_id() else {
            return false;
        };
        self.client
            .channel_permissions(user.id, channel)
            .is_ok_and(|p| p.contains(permission))
    }

    /// Whether the bot itself holds `permission` in this channel.
    pub(crate) fn bot_has_permission(&self, permission: Permissions) -> bool {
        let Some(channel) = self.channel_id() else {
            return false;
        };
        self.client
            .channel_permissions(self.client.current_user().id, channel)
            .is_ok_and(|p| p.contains(permission))
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("event", &self.event.kind())
            .field("user", &self.user.as_ref().map(|u| u.id))
            .field("guild", &self.guild.as_ref().map(|g| g.id))
            .field("channel", &self.channel_id())
            .field("text", &self.text)
            .field("fields", &self.fields)
            .field("is_private", &self.is_private)
            .field("targeting", &self.targeting)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::categories::SYSTEM;
    use crate::{HandlerResult, Route};
    use nitori_core::{ChannelKind, MemoryClient, UserId};

    const BOT: u64 = 900000000000000001;
    const ADMIN: u64 = 100000000000000001;
    const OPERATOR: u64 = 100000000000000002;
    const MEMBER: u64 = 100000000000000003;

    async fn noop(_ctx: Arc<Context>) -> HandlerResult {
        Ok(())
    }

    fn mux() -> Arc<Multiplexer> {
        Multiplexer::builder("!")
            .route(Route::new("ping", SYSTEM, noop))
            .unwrap()
            .administrator(UserId(ADMIN))
            .operator(UserId(OPERATOR))
            .build()
    }

    fn context_for(user: u64, client: Arc<MemoryClient>) -> Context {
        let message = Message::new(1u64, 20u64, User::new(user, "someone"), "!ping a b c");
        Context::new(mux(), client, Event::MessageCreate(message.clone()))
            .with_user(message.author.clone())
            .with_channel(Arc::new(Channel::text(20u64, 10u64, "general")))
            .with_message(message)
            .with_fields(vec!["ping".into(), "a".into(), "b".into(), "c".into()])
    }

    fn client() -> Arc<MemoryClient> {
        Arc::new(MemoryClient::new(User::new(BOT, "nitori").automated()))
    }

    #[test]
    fn test_stitch_fields() {
        let ctx = context_for(MEMBER, client());
        assert_eq!(ctx.stitch_fields(0), "ping a b c");
        assert_eq!(ctx.stitch_fields(1), "a b c");
        assert_eq!(ctx.stitch_fields(3), "c");
        assert_eq!(ctx.stitch_fields(4), "");
        assert_eq!(ctx.stitch_fields(99), "");
    }

    #[test]
    fn test_privilege_checks() {
        let admin = context_for(ADMIN, client());
        assert!(admin.is_administrator());
        assert!(admin.is_operator());

        let operator = context_for(OPERATOR, client());
        assert!(!operator.is_administrator());
        assert!(operator.is_operator());

        let member = context_for(MEMBER, client());
        assert!(!member.is_administrator());
        assert!(!member.is_operator());
    }

    #[test]
    fn test_has_permission_overrides_and_bits() {
        let client = client();
        client.grant(UserId(MEMBER), ChannelId(20), Permissions::SEND_MESSAGES);

        let member = context_for(MEMBER, Arc::clone(&client));
        assert!(member.has_permission(Permissions::SEND_MESSAGES));
        assert!(!member.has_permission(Permissions::BAN_MEMBERS));
        assert!(
            !member.has_permission(Permissions::SEND_MESSAGES | Permissions::BAN_MEMBERS)
        );

        let operator = context_for(OPERATOR, client);
        assert!(operator.has_permission(Permissions::BAN_MEMBERS));
    }

    #[test]
    fn test_channel_id_falls_back_to_message() {
        let message = Message::new(1u64, 30u64, User::new(MEMBER, "someone"), "hi");
        let ctx = Context::new(mux(), client(), Event::MessageUpdate(message.clone()))
            .with_message(message);
        assert_eq!(ctx.channel_id(), Some(ChannelId(30)));
        assert!(ctx.user().is_none());
    }

    #[tokio::test]
    async fn test_private_prefix_uses_default() {
        let ctx = Context::new(
            mux(),
            client(),
            Event::MessageCreate(Message::new(1u64, 40u64, User::new(MEMBER, "a"), "hi")),
        )
        .with_channel(Arc::new(Channel::direct(40u64)))
        .with_private(true);
        assert_eq!(ctx.channel().unwrap().kind, ChannelKind::DirectMessage);
        assert_eq!(ctx.prefix().await, "!");
    }
}
