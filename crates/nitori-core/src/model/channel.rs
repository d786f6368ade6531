use serde::{Deserialize, Serialize};

use super::id::{ChannelId, GuildId};

/// The kind of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    GuildText,
    DirectMessage,
    GuildVoice,
    GroupDirectMessage,
    GuildCategory,
    GuildNews,
    GuildStore,
}

impl ChannelKind {
    /// Whether messages in this channel live outside any guild.
    pub fn is_private(self) -> bool {
        matches!(self, Self::DirectMessage | Self::GroupDirectMessage)
    }
}

/// A channel, either inside a guild or a private conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ChannelId,
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    pub name: String,
    pub kind: ChannelKind,
}

impl Channel {
    /// Creates a text channel inside a guild.
    pub fn text(id: impl Into<ChannelId>, guild_id: impl Into<GuildId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            guild_id: Some(guild_id.into()),
            name: name.into(),
            kind: ChannelKind::GuildText,
        }
    }

    /// Creates a direct-message channel.
    pub fn direct(id: impl Into<ChannelId>) -> Self {
        Self {
            id: id.into(),
            guild_id: None,
            name: String::new(),
            kind: ChannelKind::DirectMessage,
        }
    }

    /// Creates a voice channel inside a guild.
    pub fn voice(id: impl Into<ChannelId>, guild_id: impl Into<GuildId>, name: impl Into<String>) -> Self {
        Self {
            kind: ChannelKind::GuildVoice,
            ..Self::text(id, guild_id, name)
        }
    }
}
