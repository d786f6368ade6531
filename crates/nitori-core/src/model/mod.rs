//! Platform object model.
//!
//! These types mirror what the platform client hands over: they are plain
//! data, cheap to clone, and carry no behavior beyond small constructors.

pub mod channel;
pub mod guild;
pub mod id;
pub mod message;
pub mod permissions;
pub mod user;

pub use channel::{Channel, ChannelKind};
pub use guild::{Guild, Role, VoiceState};
pub use id::{ChannelId, GuildId, MessageId, RoleId, SNOWFLAKE_LENGTH, UserId};
pub use message::{Embed, EmbedField, Message};
pub use permissions::Permissions;
pub use user::{Member, User};
