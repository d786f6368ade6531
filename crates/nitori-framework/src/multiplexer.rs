//! The command multiplexer.
//!
//! A [`Multiplexer`] is the frozen router state: the route table, the hook
//! registries, the privilege tiers and the prefix settings. It is assembled
//! once during startup through a [`MultiplexerBuilder`] and then shared
//! read-only as `Arc<Multiplexer>`; nothing about it changes while events are
//! being dispatched.
//!
//! ```rust,ignore
//! use nitori_framework::{Multiplexer, Route, categories};
//!
//! let mux = Multiplexer::builder("!")
//!     .route(Route::new("ping", categories::SYSTEM, ping).description("Pong."))?
//!     .hook(EventKind::GuildMemberAdd, welcome)
//!     .administrator(UserId(100000000000000001))
//!     .build();
//!
//! mux.dispatch(client, event).await;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tokio::sync::Semaphore;

use nitori_core::{EventKind, GuildId, UserId};

use crate::context::Context;
use crate::error::RegistrationError;
use crate::handler::{BoxedHook, Hook, into_hook};
use crate::matcher::RouteMatch;
use crate::prefix::{DefaultPrefix, PrefixSource};
use crate::privilege::Privileges;
use crate::route::{Category, CategoryId, Route, RouteTable};
use crate::strings::COMMAND_NOT_FOUND;

/// Default reply for targeted messages that match no route.
async fn command_not_found(ctx: Arc<Context>) {
    ctx.send_message(COMMAND_NOT_FOUND).await;
}

/// The frozen router.
pub struct Multiplexer {
    prefix: String,
    routes: RouteTable,
    privileges: Privileges,
    hooks: HashMap<EventKind, Vec<BoxedHook>>,
    no_command_matched: BoxedHook,
    prefix_source: Arc<dyn PrefixSource>,
    reveal_errors: bool,
    pub(crate) task_limit: Option<Arc<Semaphore>>,
}

impl Multiplexer {
    /// Starts building a multiplexer with the given default prefix.
    pub fn builder(prefix: impl Into<String>) -> MultiplexerBuilder {
        MultiplexerBuilder::new(prefix)
    }

    /// The default command prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn categories(&self) -> &[Category] {
        self.routes.categories()
    }

    pub fn privileges(&self) -> &Privileges {
        &self.privileges
    }

    /// Whether `id` holds operator rank.
    pub fn is_operator(&self, id: UserId) -> bool {
        self.privileges.is_operator(id)
    }

    /// Whether `id` is the system administrator.
    pub fn is_administrator(&self, id: UserId) -> bool {
        self.privileges.is_administrator(id)
    }

    /// Whether handler error text is shown to users.
    pub fn reveal_errors(&self) -> bool {
        self.reveal_errors
    }

    /// The hooks registered for `kind`, in registration order.
    pub fn hooks(&self, kind: EventKind) -> &[BoxedHook] {
        self.hooks.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Matches normalized command text against the route table.
    pub fn match_route(&self, text: &str) -> Option<RouteMatch<'_>> {
        self.routes.match_route(text)
    }

    pub(crate) fn no_command_matched(&self) -> &BoxedHook {
        &self.no_command_matched
    }

    /// The prefix in effect for `guild`, or the default outside guilds.
    pub(crate) async fn effective_prefix(&self, guild: Option<GuildId>) -> String {
        match guild {
            Some(guild) => self.prefix_source.guild_prefix(guild, &self.prefix).await,
            None => self.prefix.clone(),
        }
    }
}

impl fmt::Debug for Multiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hook_counts: HashMap<_, _> = self.hooks.iter().map(|(k, v)| (*k, v.len())).collect();
        f.debug_struct("Multiplexer")
            .field("prefix", &self.prefix)
            .field("routes", &self.routes.len())
            .field("categories", &self.routes.categories().len())
            .field("hooks", &hook_counts)
            .field("privileges", &self.privileges)
            .field("reveal_errors", &self.reveal_errors)
            .field(
                "task_limit",
                &self.task_limit.as_ref().map(|s| s.available_permits()),
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`Multiplexer`].
pub struct MultiplexerBuilder {
    prefix: String,
    routes: RouteTable,
    privileges: Privileges,
    hooks: HashMap<EventKind, Vec<BoxedHook>>,
    no_command_matched: Option<BoxedHook>,
    prefix_source: Option<Arc<dyn PrefixSource>>,
    reveal_errors: bool,
    max_concurrent_tasks: Option<usize>,
}

impl MultiplexerBuilder {
    /// Creates a builder seeded with the predefined categories.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            routes: RouteTable::new(),
            privileges: Privileges::default(),
            hooks: HashMap::new(),
            no_command_matched: None,
            prefix_source: None,
            reveal_errors: false,
            max_concurrent_tasks: None,
        }
    }

    /// Replaces the default prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Adds a category and returns its id.
    pub fn add_category(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> CategoryId {
        self.routes.add_category(title, description)
    }

    /// Registers a route in place.
    pub fn add_route(&mut self, route: Route) -> Result<&Route, RegistrationError> {
        self.routes.register(route)
    }

    /// Registers a route (builder pattern).
    pub fn route(mut self, route: Route) -> Result<Self, RegistrationError> {
        self.routes.register(route)?;
        Ok(self)
    }

    /// Appends a hook to the registry of `kind`.
    pub fn add_hook<H: Hook>(&mut self, kind: EventKind, hook: H) {
        self.hooks.entry(kind).or_default().push(into_hook(hook));
    }

    /// Appends a hook to the registry of `kind` (builder pattern).
    pub fn hook<H: Hook>(mut self, kind: EventKind, hook: H) -> Self {
        self.add_hook(kind, hook);
        self
    }

    /// Replaces the reply for targeted messages that match no route.
    pub fn no_command_matched<H: Hook>(mut self, hook: H) -> Self {
        self.no_command_matched = Some(into_hook(hook));
        self
    }

    /// Resolves guild prefixes through `source` instead of the default.
    pub fn prefix_source<P: PrefixSource + 'static>(mut self, source: P) -> Self {
        self.prefix_source = Some(Arc::new(source));
        self
    }

    /// Sets the system administrator.
    pub fn administrator(mut self, id: UserId) -> Self {
        self.privileges.set_administrator(Some(id));
        self
    }

    /// Adds an operator.
    pub fn operator(mut self, id: UserId) -> Self {
        self.privileges.add_operator(id);
        self
    }

    /// Shows handler error text to users after the generic failure reply.
    pub fn reveal_errors(mut self, reveal: bool) -> Self {
        self.reveal_errors = reveal;
        self
    }

    /// Bounds the number of concurrently running hook tasks.
    ///
    /// `0` is treated as unbounded.
    pub fn max_concurrent_tasks(mut self, limit: usize) -> Self {
        self.max_concurrent_tasks = (limit > 0).then_some(limit);
        self
    }

    /// Freezes the configuration.
    pub fn build(self) -> Arc<Multiplexer> {
        Arc::new(Multiplexer {
            prefix: self.prefix,
            routes: self.routes,
            privileges: self.privileges,
            hooks: self.hooks,
            no_command_matched: self
                .no_command_matched
                .unwrap_or_else(|| into_hook(command_not_found)),
            prefix_source: self
                .prefix_source
                .unwrap_or_else(|| Arc::new(DefaultPrefix)),
            reveal_errors: self.reveal_errors,
            task_limit: self
                .max_concurrent_tasks
                .map(|limit| Arc::new(Semaphore::new(limit))),
        })
    }
}

impl fmt::Debug for MultiplexerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiplexerBuilder")
            .field("prefix", &self.prefix)
            .field("routes", &self.routes.len())
            .field("privileges", &self.privileges)
            .finish_non_exhaustive()
    }
}
