//! Inbound platform events.
//!
//! The router supports a closed set of event kinds, so events are modeled as
//! a tagged union rather than a type-erased payload. Each variant carries its
//! own strongly-typed payload and [`Event::kind`] yields the discriminant used
//! to select the hook registry.
//!
//! ```text
//! Event
//! ├── Ready(Ready)                          → EventKind::Ready
//! ├── MessageCreate(Message)                → EventKind::MessageCreate
//! ├── MessageUpdate(Message)                → EventKind::MessageUpdate
//! ├── MessageDelete(MessageDelete)          → EventKind::MessageDelete
//! ├── ReactionAdd(Reaction)                 → EventKind::ReactionAdd
//! ├── ReactionRemove(Reaction)              → EventKind::ReactionRemove
//! ├── GuildMemberAdd(GuildMemberUpdate)     → EventKind::GuildMemberAdd
//! ├── GuildMemberRemove(GuildMemberUpdate)  → EventKind::GuildMemberRemove
//! └── GuildDelete(GuildDelete)              → EventKind::GuildDelete
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ChannelId, Guild, GuildId, Member, Message, MessageId, User, UserId};

/// Selects one of the per-event-type hook registries.
///
/// [`EventKind::NotTargeted`] has no matching [`Event`] variant: it is the
/// registry for message-create events that did not address the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Ready,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    ReactionAdd,
    ReactionRemove,
    GuildMemberAdd,
    GuildMemberRemove,
    GuildDelete,
    NotTargeted,
}

impl EventKind {
    /// Every registry, in a stable order.
    pub const ALL: [EventKind; 10] = [
        EventKind::Ready,
        EventKind::MessageCreate,
        EventKind::MessageUpdate,
        EventKind::MessageDelete,
        EventKind::ReactionAdd,
        EventKind::ReactionRemove,
        EventKind::GuildMemberAdd,
        EventKind::GuildMemberRemove,
        EventKind::GuildDelete,
        EventKind::NotTargeted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::MessageCreate => "message_create",
            Self::MessageUpdate => "message_update",
            Self::MessageDelete => "message_delete",
            Self::ReactionAdd => "reaction_add",
            Self::ReactionRemove => "reaction_remove",
            Self::GuildMemberAdd => "guild_member_add",
            Self::GuildMemberRemove => "guild_member_remove",
            Self::GuildDelete => "guild_delete",
            Self::NotTargeted => "not_targeted",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The session is ready; the bot's own identity is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ready {
    pub user: User,
    #[serde(default)]
    pub guilds: Vec<GuildId>,
    #[serde(default)]
    pub session_id: String,
}

/// A message was removed. Only identifiers survive deletion; `message` holds
/// the last cached copy when the client had one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDelete {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// A reaction was added to or removed from a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// The reacting user.
    pub user_id: UserId,
    pub message_id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Unicode emoji or the custom emoji name.
    pub emoji: String,
}

/// A member joined or left a guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildMemberUpdate {
    pub guild_id: GuildId,
    pub member: Member,
}

/// The bot was removed from a guild, or the guild became unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildDelete {
    pub guild: Guild,
}

/// An inbound platform event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    Ready(Ready),
    MessageCreate(Message),
    MessageUpdate(Message),
    MessageDelete(MessageDelete),
    ReactionAdd(Reaction),
    ReactionRemove(Reaction),
    GuildMemberAdd(GuildMemberUpdate),
    GuildMemberRemove(GuildMemberUpdate),
    GuildDelete(GuildDelete),
}

impl Event {
    /// Returns the registry this event dispatches to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::Ready(_) => EventKind::Ready,
            Self::MessageCreate(_) => EventKind::MessageCreate,
            Self::MessageUpdate(_) => EventKind::MessageUpdate,
            Self::MessageDelete(_) => EventKind::MessageDelete,
            Self::ReactionAdd(_) => EventKind::ReactionAdd,
            Self::ReactionRemove(_) => EventKind::ReactionRemove,
            Self::GuildMemberAdd(_) => EventKind::GuildMemberAdd,
            Self::GuildMemberRemove(_) => EventKind::GuildMemberRemove,
            Self::GuildDelete(_) => EventKind::GuildDelete,
        }
    }

    /// Returns the message carried directly by this event, if any.
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::MessageCreate(message) | Self::MessageUpdate(message) => Some(message),
            Self::MessageDelete(delete) => delete.message.as_ref(),
            _ => None,
        }
    }

    /// Returns the reaction payload, if this is a reaction event.
    pub fn reaction(&self) -> Option<&Reaction> {
        match self {
            Self::ReactionAdd(reaction) | Self::ReactionRemove(reaction) => Some(reaction),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        let author = User::new(1u64, "alice");
        let message = Message::new(10u64, 20u64, author, "hi");
        assert_eq!(
            Event::MessageCreate(message.clone()).kind(),
            EventKind::MessageCreate
        );
        assert_eq!(Event::MessageUpdate(message).kind(), EventKind::MessageUpdate);

        let reaction = Reaction {
            user_id: UserId(1),
            message_id: MessageId(10),
            channel_id: ChannelId(20),
            guild_id: None,
            emoji: "👍".into(),
        };
        assert_eq!(Event::ReactionAdd(reaction.clone()).kind(), EventKind::ReactionAdd);
        assert_eq!(Event::ReactionRemove(reaction).kind(), EventKind::ReactionRemove);
    }

    #[test]
    fn test_message_accessor() {
        let author = User::new(1u64, "alice");
        let message = Message::new(10u64, 20u64, author, "hi");
        let event = Event::MessageCreate(message.clone());
        assert_eq!(event.message(), Some(&message));

        let delete = Event::MessageDelete(MessageDelete {
            id: MessageId(10),
            channel_id: ChannelId(20),
            guild_id: None,
            message: None,
        });
        assert!(delete.message().is_none());
    }

    #[test]
    fn test_not_targeted_is_registry_only() {
        assert!(EventKind::ALL.contains(&EventKind::NotTargeted));
        assert_eq!(EventKind::NotTargeted.to_string(), "not_targeted");
    }
}
