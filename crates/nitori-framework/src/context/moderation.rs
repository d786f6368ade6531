//! Moderation actions.

use tracing::info;

use nitori_core::{Permissions, UserId};

use super::Context;
use super::lookup::{digits, is_id_query};
use crate::error::BanError;

impl Context {
    /// Bans the user named by `query` from the context's guild.
    ///
    /// Mentions and numeric queries ban by identifier, so users who already
    /// left can still be banned; any other query must name a current member.
    /// Returns the banned user's id.
    pub async fn ban(&self, query: &str) -> Result<UserId, BanError> {
        if !self.bot_has_permission(Permissions::BAN_MEMBERS) {
            return Err(BanError::Unauthorized);
        }
        let guild = match (&self.guild, self.is_private) {
            (Some(guild), false) => guild.id,
            _ => return Err(BanError::GuildOnly),
        };

        let user = if is_id_query(query, "<@") {
            UserId::parse_exact(&digits(query)).ok_or(BanError::UserNotFound)?
        } else {
            self.get_member(query)
                .map(|m| m.user.id)
                .ok_or(BanError::UserNotFound)?
        };

        self.client.create_ban(guild, user, 0).await?;
        info!(guild = %guild, user = %user, "Issued ban");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::multiplexer::Multiplexer;
    use nitori_core::{
        BoxedClient, Channel, ChannelId, Event, Guild, GuildId, Member, MemoryClient, Message, User,
    };

    const BOT: u64 = 900000000000000001;
    const GUILD: u64 = 623456789012345678;
    const CHANNEL: u64 = 323456789012345678;
    const MARISA: u64 = 223456789012345678;

    fn context(client: &Arc<MemoryClient>, private: bool) -> Context {
        let guild = Guild::new(GUILD, "Kappa")
            .with_member(Member::new(GUILD, User::new(MARISA, "marisa")).with_nick("witch"));
        let author = User::new(5u64, "reimu");
        let message = Message::new(1u64, CHANNEL, author.clone(), "!ban marisa");
        Context::new(
            Multiplexer::builder("!").build(),
            Arc::clone(client) as BoxedClient,
            Event::MessageCreate(message.clone()),
        )
        .with_user(author)
        .with_message(message)
        .with_channel(Arc::new(Channel::text(CHANNEL, GUILD, "general")))
        .with_guild(Arc::new(guild))
        .with_private(private)
    }

    fn client(can_ban: bool) -> Arc<MemoryClient> {
        let client = Arc::new(MemoryClient::new(User::new(BOT, "nitori").automated()));
        if can_ban {
            client.grant(UserId(BOT), ChannelId(CHANNEL), Permissions::BAN_MEMBERS);
        }
        client
    }

    #[tokio::test]
    async fn test_ban_requires_bot_permission() {
        let client = client(false);
        let err = context(&client, false).ban("marisa").await.unwrap_err();
        assert!(matches!(err, BanError::Unauthorized));
        assert!(client.bans().is_empty());
    }

    #[tokio::test]
    async fn test_ban_by_name_and_nick() {
        let client = client(true);
        let ctx = context(&client, false);
        assert_eq!(ctx.ban("marisa").await.unwrap(), UserId(MARISA));
        assert_eq!(ctx.ban("witch").await.unwrap(), UserId(MARISA));

        let bans = client.bans();
        assert_eq!(bans.len(), 2);
        assert_eq!(bans[0].guild_id, GuildId(GUILD));
        assert_eq!(bans[0].delete_message_days, 0);
    }

    #[tokio::test]
    async fn test_ban_by_id_does_not_need_membership() {
        let client = client(true);
        let ctx = context(&client, false);
        let banned = ctx.ban("<@!999999999999999999>").await.unwrap();
        assert_eq!(banned, UserId(999999999999999999));
        assert_eq!(ctx.ban("999999999999999998").await.unwrap().get(), 999999999999999998);
    }

    #[tokio::test]
    async fn test_ban_unknown_user() {
        let client = client(true);
        let ctx = context(&client, false);
        assert!(matches!(ctx.ban("alice").await, Err(BanError::UserNotFound)));
        assert!(matches!(ctx.ban("<@1234>").await, Err(BanError::UserNotFound)));
        assert!(client.bans().is_empty());
    }

    #[tokio::test]
    async fn test_ban_is_guild_only() {
        let client = client(true);
        let ctx = context(&client, true);
        assert!(matches!(ctx.ban("marisa").await, Err(BanError::GuildOnly)));
    }
}
