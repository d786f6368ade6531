use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::id::{ChannelId, GuildId, RoleId, UserId};
use super::permissions::Permissions;
use super::user::Member;

/// A guild together with the state the client caches for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub voice_states: Vec<VoiceState>,
    /// Set on guild-delete stubs when the guild is only temporarily gone.
    #[serde(default)]
    pub unavailable: bool,
}

impl Guild {
    /// Creates an empty guild.
    pub fn new(id: impl Into<GuildId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members: Vec::new(),
            channels: Vec::new(),
            roles: Vec::new(),
            voice_states: Vec::new(),
            unavailable: false,
        }
    }

    /// A stand-in for a guild that could not be resolved.
    ///
    /// Carries the identifier only; every collection is empty.
    pub fn placeholder(id: GuildId) -> Self {
        Self::new(id, String::new())
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.push(role);
        self
    }

    pub fn with_voice_state(mut self, state: VoiceState) -> Self {
        self.voice_states.push(state);
        self
    }
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default)]
    pub permissions: Permissions,
}

impl Role {
    pub fn new(id: impl Into<RoleId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            permissions: Permissions::empty(),
        }
    }
}

/// A user's presence in a voice channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceState {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub user_id: UserId,
}
