//! Handler system for the Nitori framework.
//!
//! Two kinds of callables are registered with the multiplexer:
//!
//! - [`Hook`]s run for every event of one [`EventKind`](nitori_core::EventKind).
//!   They are fire-and-forget and return nothing.
//! - [`CommandHandler`]s back a [`Route`](crate::Route). Exactly one runs per
//!   matched command, and its [`HandlerResult`] is reported to the user.
//!
//! Both are implemented for async closures and functions taking the shared
//! context, so no wrapper type is needed at registration:
//!
//! ```rust,ignore
//! async fn greet(ctx: Arc<Context>) {
//!     ctx.send_message("Welcome!").await;
//! }
//!
//! async fn ping(ctx: Arc<Context>) -> HandlerResult {
//!     ctx.send_message("Pong!").await;
//!     Ok(())
//! }
//!
//! builder.hook(EventKind::GuildMemberAdd, greet);
//! builder.route(Route::new("ping", SYSTEM, ping))?;
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::HandlerResult;

/// A type alias for a boxed, pinned future that is `Send`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ============================================================================
// Hook
// ============================================================================

/// A handler invoked for every event of one kind.
pub trait Hook: Send + Sync + 'static {
    /// Runs the hook against the event's context.
    fn call(&self, ctx: Arc<Context>) -> BoxFuture<'static, ()>;
}

impl<F, Fut> Hook for F
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn call(&self, ctx: Arc<Context>) -> BoxFuture<'static, ()> {
        Box::pin((self)(ctx))
    }
}

/// A type-erased hook that can be stored in registries.
pub type BoxedHook = Arc<dyn Hook>;

/// Converts a hook function into a [`BoxedHook`].
pub fn into_hook<H: Hook>(hook: H) -> BoxedHook {
    Arc::new(hook)
}

// ============================================================================
// CommandHandler
// ============================================================================

/// The handler behind a route.
pub trait CommandHandler: Send + Sync + 'static {
    /// Runs the command. Errors are reported in-band to the invoking user.
    fn call(&self, ctx: Arc<Context>) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut> CommandHandler for F
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: Arc<Context>) -> BoxFuture<'static, HandlerResult> {
        Box::pin((self)(ctx))
    }
}

/// A type-erased command handler.
pub type BoxedCommandHandler = Arc<dyn CommandHandler>;
