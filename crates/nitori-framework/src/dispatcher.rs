//! Event dispatch.
//!
//! [`Multiplexer::dispatch`] is the single entry point for platform events.
//! Every event fans out to the hooks registered for its kind: the hooks run
//! sequentially, in registration order, inside one spawned task per event,
//! so a slow or panicking hook never holds up the caller or other events.
//!
//! Message-create events additionally take the command path, which runs
//! inline on the dispatch call:
//!
//! 1. Self-authored and bot-authored messages are ignored.
//! 2. Untargeted messages and messages that mention the bot anywhere but the
//!    start go to the not-targeted hooks.
//! 3. Targeted messages are logged and matched against the route table. The
//!    matched route's handler runs; its error or panic is reported back to
//!    the user. Without a match, the no-command-matched hook runs.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{Instrument, Level, Span, debug, error, info, span, trace};

use nitori_core::{BoxedClient, Event, EventKind};

use crate::context::Context;
use crate::error::{HandlerPanic, HandlerResult};
use crate::multiplexer::Multiplexer;

/// What the command path did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The event is not a message create; only hooks ran.
    Skipped,
    /// Self or bot author, or no context could be built.
    Ignored,
    /// Handed to the not-targeted hooks.
    NotTargeted,
    /// A route handler ran. `ok` is false when it failed or panicked.
    Routed { pattern: String, ok: bool },
    /// Nothing matched; the fallback ran.
    NoMatch,
}

/// The result of dispatching one event.
#[derive(Debug)]
pub struct Dispatch {
    outcome: CommandOutcome,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatch {
    pub fn outcome(&self) -> &CommandOutcome {
        &self.outcome
    }

    /// Number of hook tasks spawned for the event.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Waits for every hook task of the event, logging panics.
    ///
    /// Dropping the `Dispatch` instead detaches the tasks.
    pub async fn join(self) -> CommandOutcome {
        for task in self.tasks {
            if let Err(e) = task.await
                && e.is_panic()
            {
                error!(error = %e, "Hook task panicked");
            }
        }
        self.outcome
    }
}

impl Multiplexer {
    /// Dispatches one platform event.
    ///
    /// Returns once the command path (if any) has finished; hook tasks may
    /// still be running and can be awaited through [`Dispatch::join`].
    pub async fn dispatch(self: &Arc<Self>, client: BoxedClient, event: Event) -> Dispatch {
        let kind = event.kind();
        let span = span!(Level::DEBUG, "dispatch", event = %kind, shard = client.shard_id());
        self.dispatch_event(client, event).instrument(span).await
    }

    async fn dispatch_event(self: &Arc<Self>, client: BoxedClient, event: Event) -> Dispatch {
        let mut tasks = Vec::new();

        let message = match event {
            Event::MessageCreate(message) => message,
            event => {
                let kind = event.kind();
                let mux = Arc::clone(self);
                let make = async move {
                    Context::from_event(mux, client, event)
                        .await
                        .map(Arc::new)
                };
                tasks.extend(self.spawn_hooks(kind, make).await);
                return Dispatch {
                    outcome: CommandOutcome::Skipped,
                    tasks,
                };
            }
        };

        let event = Event::MessageCreate(message.clone());
        let Some(ctx) = Context::from_message(Arc::clone(self), client, message, event).await
        else {
            debug!("Message context unavailable, dropping event");
            return Dispatch {
                outcome: CommandOutcome::Ignored,
                tasks,
            };
        };
        let ctx = Arc::new(ctx);

        let hook_ctx = Arc::clone(&ctx);
        tasks.extend(
            self.spawn_hooks(EventKind::MessageCreate, async move { Some(hook_ctx) })
                .await,
        );

        let outcome = self.run_command(ctx, &mut tasks).await;
        Dispatch { outcome, tasks }
    }

    /// The inline command path of a message-create event.
    async fn run_command(
        self: &Arc<Self>,
        ctx: Arc<Context>,
        tasks: &mut Vec<JoinHandle<()>>,
    ) -> CommandOutcome {
        let bot = ctx.client().current_user().id;
        let Some(author) = ctx.user() else {
            return CommandOutcome::Ignored;
        };
        if author.id == bot || author.bot {
            trace!(author = %author.id, "Ignoring self or bot message");
            return CommandOutcome::Ignored;
        }

        if !ctx.is_targeted() || (ctx.has_mention() && !ctx.has_leading_mention()) {
            let hook_ctx = Arc::clone(&ctx);
            tasks.extend(
                self.spawn_hooks(EventKind::NotTargeted, async move { Some(hook_ctx) })
                    .await,
            );
            return CommandOutcome::NotTargeted;
        }

        let host = match ctx.guild() {
            Some(guild) if !ctx.is_private() => format!("\"{}\"", guild.name),
            _ => "Private Messages".to_owned(),
        };
        info!(
            "(Shard {}) \"{}\"@{} > {}",
            ctx.client().shard_id(),
            author.tag(),
            host,
            ctx.message().map(|m| m.content.as_str()).unwrap_or_default()
        );

        let Some(matched) = self.match_route(ctx.text()) else {
            debug!(text = ctx.text(), "No command matched");
            self.no_command_matched().call(ctx).await;
            return CommandOutcome::NoMatch;
        };

        let pattern = matched.route.pattern().to_owned();
        let handler = Arc::clone(matched.route.handler());
        let routed = Arc::new(Context::clone(&ctx).with_fields(matched.fields));
        debug!(route = %pattern, fields = ?routed.fields(), "Routing command");

        let result: HandlerResult = match AssertUnwindSafe(handler.call(Arc::clone(&routed)))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(payload) => Err(Box::new(HandlerPanic::from_payload(payload))),
        };
        let ok = routed.handle_error(result).await;

        CommandOutcome::Routed { pattern, ok }
    }

    /// Spawns one task running every hook of `kind` against the context
    /// produced by `make`.
    ///
    /// Nothing is spawned when no hooks are registered, so contexts are only
    /// built for kinds someone listens to.
    async fn spawn_hooks<F>(&self, kind: EventKind, make: F) -> Option<JoinHandle<()>>
    where
        F: Future<Output = Option<Arc<Context>>> + Send + 'static,
    {
        let hooks = self.hooks(kind).to_vec();
        if hooks.is_empty() {
            return None;
        }

        let permit = match &self.task_limit {
            Some(limit) => Some(Arc::clone(limit).acquire_owned().await.ok()?),
            None => None,
        };

        let span = Span::current();
        let task = async move {
            let _permit = permit;
            let Some(ctx) = make.await else {
                debug!(event = %kind, "Hook context unavailable");
                return;
            };
            for hook in &hooks {
                hook.call(Arc::clone(&ctx)).await;
            }
            trace!(event = %kind, hooks = hooks.len(), "Hooks finished");
        };
        Some(tokio::spawn(task.instrument(span)))
    }
}
