//! Error types for the Nitori framework.

use thiserror::Error;

use nitori_core::ClientError;

/// Error type route handlers return.
///
/// Any error works; it is reported through
/// [`Context::handle_error`](crate::Context::handle_error).
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type route handlers return.
pub type HandlerResult = Result<(), HandlerError>;

/// Errors raised while registering routes at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// A pattern or alias is already claimed by another route.
    #[error("pattern '{token}' is already registered by route '{owner}'")]
    Conflict {
        /// The duplicated pattern or alias.
        token: String,
        /// Primary pattern of the route that already owns it.
        owner: String,
    },

    /// A route pattern or alias is empty or contains whitespace.
    #[error("invalid pattern '{0}': patterns must be a single non-empty token")]
    InvalidPattern(String),

    /// The route names a category the builder does not know.
    #[error("unknown category #{0}")]
    UnknownCategory(usize),
}

/// Errors returned by [`Context::ban`](crate::Context::ban).
#[derive(Debug, Clone, Error)]
pub enum BanError {
    /// The bot lacks the ban capability in this channel.
    #[error("unauthorized")]
    Unauthorized,

    /// The query did not resolve to a user.
    #[error("user not found")]
    UserNotFound,

    /// Bans are guild-only.
    #[error("bans can only be issued from a guild")]
    GuildOnly,

    /// The platform rejected the ban.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// A route handler panicked on the command path.
#[derive(Debug, Clone, Error)]
#[error("handler panicked: {0}")]
pub struct HandlerPanic(pub String);

impl HandlerPanic {
    /// Extracts the panic message from a caught payload.
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_owned())
                .unwrap_or_else(|| "unknown panic".to_owned()),
        };
        Self(message)
    }
}
