//! # Nitori Framework
//!
//! Command routing and event dispatch on top of [`nitori_core`].
//!
//! This layer provides:
//! - The route table: routes, aliases and categories ([`Route`], [`RouteTable`])
//! - Fuzzy command matching over the route table
//! - Targeting detection (mention vs. prefix vs. untargeted)
//! - The per-event [`Context`] with cache-then-fetch resolution, replies,
//!   lookups and moderation helpers
//! - Per-event-type hook registries and the dispatcher
//!   ([`Multiplexer::dispatch`])
//! - The administrator/operator privilege tiers
//!
//! The router is assembled once through [`MultiplexerBuilder`] and is
//! immutable afterwards.

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod fetch;
pub mod handler;
pub mod matcher;
pub mod multiplexer;
pub mod prefix;
pub mod privilege;
pub mod route;
pub mod strings;
pub mod targeting;

pub use context::{Context, GuildRequirement};
pub use dispatcher::{CommandOutcome, Dispatch};
pub use error::{BanError, HandlerError, HandlerPanic, HandlerResult, RegistrationError};
pub use fetch::{get_channel, get_guild};
pub use handler::{BoxFuture, BoxedCommandHandler, BoxedHook, CommandHandler, Hook, into_hook};
pub use matcher::RouteMatch;
pub use multiplexer::{Multiplexer, MultiplexerBuilder};
pub use prefix::{DefaultPrefix, PrefixSource, StaticPrefixes};
pub use privilege::Privileges;
pub use route::{Category, CategoryId, Route, RouteTable, categories};
pub use targeting::Targeting;
