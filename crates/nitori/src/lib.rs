//! # Nitori
//!
//! A command multiplexer for chat bots: fuzzy command routing, mention and
//! prefix targeting, and per-event-type hooks.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐  Event  ┌────────────┐  message create  ┌──────────────┐
//! │   Runtime   │────────▶│ Multiplexer│─────────────────▶│ Route handler│
//! │ (event pump)│         │            │                  └──────────────┘
//! └─────────────┘         │            │  every event     ┌──────────────┐
//!                         │            │─────────────────▶│ Hooks (task) │
//!                         └────────────┘                  └──────────────┘
//! ```
//!
//! - **Core** ([`core`]): platform model, events and the client interface
//! - **Framework** ([`framework`]): routes, matching, contexts, dispatch
//! - **Runtime** ([`runtime`]): configuration, logging and the event pump
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nitori::prelude::*;
//!
//! async fn ping(ctx: Arc<Context>) -> HandlerResult {
//!     ctx.send_message("Pong!").await;
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = NitoriRuntime::new();
//!     let mux = runtime
//!         .multiplexer_builder()
//!         .route(Route::new("ping", categories::SYSTEM, ping).description("Pong."))?
//!         .build();
//!
//!     let (tx, rx) = tokio::sync::mpsc::channel(256);
//!     // forward platform events into `tx`
//!     runtime.run(mux, client, rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use nitori_core as core;
pub use nitori_framework as framework;
pub use nitori_runtime as runtime;

/// Commonly used types for building a bot.
///
/// ```rust,ignore
/// use nitori::prelude::*;
/// ```
pub mod prelude {
    pub use std::sync::Arc;

    // Runtime
    pub use nitori_runtime::{ConfigLoader, NitoriConfig, NitoriRuntime};

    // Routing and dispatch
    pub use nitori_framework::{
        CommandOutcome, Context, HandlerError, HandlerResult, Multiplexer, MultiplexerBuilder,
        PrefixSource, Route, categories,
    };

    // Platform model
    pub use nitori_core::{
        BoxedClient, Channel, ChannelId, Client, Embed, Event, EventKind, Guild, GuildId, Member,
        Message, Permissions, User, UserId,
    };
}
