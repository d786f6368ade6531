//! User-facing reply strings shared by the core and command handlers.

/// Sent when the user passes an invalid argument.
pub const INVALID_ARGUMENT: &str = "Invalid argument.";

/// Sent when a handler fails.
pub const ERROR_OCCURRED: &str = "Something went wrong and I am very confused! Please try again!";

/// Sent when a guild-only command is issued in private.
pub const GUILD_ONLY: &str = "This command can only be issued from a guild.";

/// Sent when a requested feature is disabled.
pub const FEATURE_DISABLED: &str = "This feature is currently disabled.";

/// Sent when an unprivileged user invokes an administrator-only request.
pub const ADMIN_ONLY: &str = "This command is only available to system administrators!";

/// Sent when an unprivileged user invokes an operator-only request.
pub const OPERATOR_ONLY: &str = "This command is only available to operators!";

/// Sent when the user lacks permission for a request.
pub const PERMISSION_DENIED: &str = "You are not allowed to issue this command!";

/// Sent when a specified user does not exist.
pub const MISSING_USER: &str = "Specified user does not exist.";

/// Sent when the bot lacks permission for an operation.
pub const LACKING_PERMISSION: &str = "Lacking permission to perform specified action.";

/// Default reply when no route matches.
pub const COMMAND_NOT_FOUND: &str = "Command not found.";

/// Primary embed color.
pub const KAPPA_COLOR: u32 = 0x3492c4;
