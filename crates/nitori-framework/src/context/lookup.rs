//! Free-form lookups inside the context's guild.
//!
//! A query is either an identifier or a name. It is treated as an identifier
//! when it is a mention of the matching kind or parses as an integer; the
//! identifier must then be exactly
//! [`SNOWFLAKE_LENGTH`](nitori_core::SNOWFLAKE_LENGTH) digits, otherwise the
//! lookup fails without falling back to names. Every other query is compared
//! against names exactly.
//!
//! All lookups are guild-only and return `None` in private contexts.

use nitori_core::{
    Channel, ChannelId, ClientResult, Guild, Member, Role, RoleId, UserId,
    VoiceConnection, VoiceState,
};

use super::Context;

/// Whether `query` is a `<{open}...>` mention or an integer.
pub(crate) fn is_id_query(query: &str, open: &str) -> bool {
    (query.starts_with(open) && query.ends_with('>')) || query.parse::<i64>().is_ok()
}

/// Keeps only the ASCII digits of `query`.
pub(crate) fn digits(query: &str) -> String {
    query.chars().filter(char::is_ascii_digit).collect()
}

impl Context {
    /// Finds a guild member by mention, identifier, username or nickname.
    pub fn get_member(&self, query: &str) -> Option<&Member> {
        let guild = self.lookup_guild()?;

        if is_id_query(query, "<@") {
            let raw = query.strip_prefix("<@").unwrap_or(query);
            let raw = raw.strip_prefix('!').unwrap_or(raw);
            let raw = raw.strip_suffix('>').unwrap_or(raw);
            let id = UserId::parse_exact(raw)?;
            guild.members.iter().find(|m| m.user.id == id)
        } else {
            guild
                .members
                .iter()
                .find(|m| m.user.username == query || m.nick.as_deref() == Some(query))
        }
    }

    /// Finds a guild channel by mention, identifier or name.
    pub fn get_channel(&self, query: &str) -> Option<&Channel> {
        let guild = self.lookup_guild()?;

        if is_id_query(query, "<#") {
            let id = ChannelId::parse_exact(&digits(query))?;
            guild.channels.iter().find(|c| c.id == id)
        } else {
            guild.channels.iter().find(|c| c.name == query)
        }
    }

    /// Finds a guild role by mention, identifier or name.
    pub fn get_role(&self, query: &str) -> Option<&Role> {
        let guild = self.lookup_guild()?;

        if is_id_query(query, "<@&") {
            let id = RoleId::parse_exact(&digits(query))?;
            guild.roles.iter().find(|r| r.id == id)
        } else {
            guild.roles.iter().find(|r| r.name == query)
        }
    }

    /// The acting user's voice state in this guild.
    pub fn voice_state(&self) -> Option<&VoiceState> {
        let guild = self.lookup_guild()?;
        let user = self.user.as_ref()?;
        guild.voice_states.iter().find(|v| v.user_id == user.id)
    }

    /// Joins the acting user's voice channel, deafened and unmuted.
    ///
    /// Returns `Ok(None)` in private contexts or when the user is not in a
    /// voice channel.
    pub async fn make_voice_connection(&self) -> ClientResult<Option<VoiceConnection>> {
        let Some(state) = self.voice_state() else {
            return Ok(None);
        };
        let (guild, channel) = (state.guild_id, state.channel_id);
        self.client.join_voice(guild, channel, false, true).await.map(Some)
    }

    fn lookup_guild(&self) -> Option<&Guild> {
        if self.is_private {
            return None;
        }
        self.guild.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::multiplexer::Multiplexer;
    use nitori_core::{BoxedClient, Event, GuildId, MemoryClient, Message, User};

    const REIMU: u64 = 123456789012345678;
    const MARISA: u64 = 223456789012345678;
    const GENERAL: u64 = 323456789012345678;
    const MODS: u64 = 423456789012345678;
    const VOICE: u64 = 523456789012345678;
    const GUILD: u64 = 623456789012345678;

    fn guild() -> Guild {
        Guild::new(GUILD, "Kappa")
            .with_member(Member::new(GUILD, User::new(REIMU, "reimu")))
            .with_member(Member::new(GUILD, User::new(MARISA, "marisa")).with_nick("witch"))
            .with_channel(Channel::text(GENERAL, GUILD, "general"))
            .with_channel(Channel::voice(VOICE, GUILD, "lounge"))
            .with_role(Role::new(MODS, "mods"))
            .with_voice_state(VoiceState {
                guild_id: GuildId(GUILD),
                channel_id: ChannelId(VOICE),
                user_id: UserId(REIMU),
            })
    }

    fn context(user: u64, private: bool) -> (Context, Arc<MemoryClient>) {
        let client = Arc::new(MemoryClient::new(User::new(1u64, "nitori").automated()));
        let author = User::new(user, "someone");
        let message = Message::new(1u64, GENERAL, author.clone(), "hi");
        let ctx = Context::new(
            Multiplexer::builder("!").build(),
            Arc::clone(&client) as BoxedClient,
            Event::MessageCreate(message),
        )
        .with_user(author)
        .with_guild(Arc::new(guild()))
        .with_private(private);
        (ctx, client)
    }

    #[test]
    fn test_get_member_forms() {
        let (ctx, _) = context(REIMU, false);
        let by = |q: &str| ctx.get_member(q).map(|m| m.user.username.clone());

        assert_eq!(by("<@123456789012345678>").as_deref(), Some("reimu"));
        assert_eq!(by("<@!223456789012345678>").as_deref(), Some("marisa"));
        assert_eq!(by("123456789012345678").as_deref(), Some("reimu"));
        assert_eq!(by("reimu").as_deref(), Some("reimu"));
        assert_eq!(by("witch").as_deref(), Some("marisa"));
        assert_eq!(by("Reimu"), None);
    }

    #[test]
    fn test_short_identifier_never_matches() {
        let (ctx, _) = context(REIMU, false);
        assert!(ctx.get_member("12345").is_none());
        assert!(ctx.get_member("<@12345678901234567>").is_none());
        assert!(ctx.get_channel("32345678901234567").is_none());
        assert!(ctx.get_role("<@&4234567890123456789>").is_none());
    }

    #[test]
    fn test_get_channel_forms() {
        let (ctx, _) = context(REIMU, false);
        assert_eq!(ctx.get_channel("<#323456789012345678>").unwrap().name, "general");
        assert_eq!(ctx.get_channel("523456789012345678").unwrap().name, "lounge");
        assert_eq!(ctx.get_channel("general").unwrap().id, ChannelId(GENERAL));
        assert!(ctx.get_channel("#general").is_none());
    }

    #[test]
    fn test_get_role_forms() {
        let (ctx, _) = context(REIMU, false);
        assert_eq!(ctx.get_role("<@&423456789012345678>").unwrap().name, "mods");
        assert_eq!(ctx.get_role("423456789012345678").unwrap().name, "mods");
        assert_eq!(ctx.get_role("mods").unwrap().id, RoleId(MODS));
        assert!(ctx.get_role("admins").is_none());
    }

    #[test]
    fn test_lookups_are_guild_only() {
        let (ctx, _) = context(REIMU, true);
        assert!(ctx.get_member("reimu").is_none());
        assert!(ctx.get_channel("general").is_none());
        assert!(ctx.get_role("mods").is_none());
        assert!(ctx.voice_state().is_none());
    }

    #[tokio::test]
    async fn test_voice_connection() {
        let (ctx, client) = context(REIMU, false);
        let connection = ctx.make_voice_connection().await.unwrap().unwrap();
        assert_eq!(connection.channel_id, ChannelId(VOICE));
        assert!(!connection.self_mute);
        assert!(connection.self_deaf);
        assert_eq!(client.voice_connections().len(), 1);
    }

    #[tokio::test]
    async fn test_no_voice_state_no_connection() {
        let (ctx, client) = context(MARISA, false);
        assert!(ctx.voice_state().is_none());
        assert!(ctx.make_voice_connection().await.unwrap().is_none());
        assert!(client.voice_connections().is_empty());
    }
}
