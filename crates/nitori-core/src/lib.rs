//! # Nitori Core
//!
//! The platform-facing foundation of the Nitori command multiplexer.
//!
//! This crate owns everything the routing core needs to know about the chat
//! platform without knowing how the platform is reached:
//!
//! - **Platform Model**: snowflake identifiers, users, members, guilds,
//!   channels, roles, voice states, messages and permission bits
//!   ([`model`]).
//! - **Event System**: the closed set of inbound events as a tagged union
//!   ([`Event`], [`EventKind`]).
//! - **Client Interface**: the capabilities consumed from the platform client
//!   ([`Client`]), and an in-process implementation ([`MemoryClient`]) used by
//!   tests and demos.
//!
//! ```text
//! ┌──────────────┐  Event   ┌──────────────┐  Arc<Context>  ┌──────────┐
//! │    Client    │─────────▶│  Multiplexer │───────────────▶│  Hooks   │
//! │ (cache, API) │◀─────────│   (router)   │───────────────▶│  Routes  │
//! └──────────────┘  lookups └──────────────┘                └──────────┘
//! ```

pub mod client;
pub mod event;
pub mod memory;
pub mod model;

pub use client::{
    BoxedClient, Client, ClientError, ClientResult, VoiceConnection, downcast_client,
};
pub use event::{
    Event, EventKind, GuildDelete, GuildMemberUpdate, MessageDelete, Reaction, Ready,
};
pub use memory::{BanRecord, MemoryClient, SentMessage};
pub use model::{
    Channel, ChannelId, ChannelKind, Embed, EmbedField, Guild, GuildId, Member, Message,
    MessageId, Permissions, Role, RoleId, SNOWFLAKE_LENGTH, User, UserId, VoiceState,
};
