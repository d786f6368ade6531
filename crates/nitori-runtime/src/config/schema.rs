//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use nitori_core::UserId;
use nitori_framework::MultiplexerBuilder;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct NitoriConfig {
    /// Command router settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NitoriConfig {
    /// Whether handler error text reaches users.
    pub fn reveal_errors(&self) -> bool {
        self.router
            .reveal_errors
            .unwrap_or_else(|| self.logging.level.is_verbose())
    }

    /// Applies the router settings to a multiplexer builder, deriving error
    /// reveal from the log level unless set explicitly.
    pub fn apply_to(&self, builder: MultiplexerBuilder) -> MultiplexerBuilder {
        self.router
            .apply_to(builder)
            .reveal_errors(self.reveal_errors())
    }
}

/// Command router settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouterConfig {
    /// Default command prefix.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// The system administrator's user id.
    #[serde(default)]
    pub administrator: Option<u64>,

    /// Operator user ids.
    #[serde(default)]
    pub operators: Vec<u64>,

    /// Upper bound on concurrently running hook tasks. Unbounded when unset.
    #[serde(default)]
    pub max_concurrent_tasks: Option<usize>,

    /// Show handler error text to users. Defaults to on when logging at
    /// debug level or finer.
    #[serde(default)]
    pub reveal_errors: Option<bool>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            administrator: None,
            operators: Vec::new(),
            max_concurrent_tasks: None,
            reveal_errors: None,
        }
    }
}

impl RouterConfig {
    /// Applies these settings to a multiplexer builder.
    pub fn apply_to(&self, builder: MultiplexerBuilder) -> MultiplexerBuilder {
        let mut builder = builder
            .prefix(self.prefix.clone())
            .max_concurrent_tasks(self.max_concurrent_tasks.unwrap_or(0));
        if let Some(reveal) = self.reveal_errors {
            builder = builder.reveal_errors(reveal);
        }
        if let Some(id) = self.administrator {
            builder = builder.administrator(UserId(id));
        }
        for &id in &self.operators {
            builder = builder.operator(UserId(id));
        }
        builder
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Debug or trace.
    pub fn is_verbose(self) -> bool {
        matches!(self, Self::Trace | Self::Debug)
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature; falls back to compact otherwise.
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    /// Log file, required when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module levels, e.g. `nitori_framework = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers.
    #[serde(default)]
    pub file_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            output: LogOutput::Stdout,
            file_path: None,
            filters: HashMap::new(),
            span_events: SpanEventConfig::default(),
            thread_ids: false,
            file_location: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nitori_framework::Multiplexer;

    #[test]
    fn test_router_config_applies() {
        let router = RouterConfig {
            prefix: "?".to_string(),
            administrator: Some(100000000000000001),
            operators: vec![100000000000000002],
            max_concurrent_tasks: Some(4),
            reveal_errors: Some(true),
        };
        let mux = router.apply_to(Multiplexer::builder("!")).build();

        assert_eq!(mux.prefix(), "?");
        assert!(mux.reveal_errors());
        assert!(mux.is_administrator(UserId(100000000000000001)));
        assert!(mux.is_operator(UserId(100000000000000002)));
        assert!(!mux.is_administrator(UserId(100000000000000002)));
    }

    #[test]
    fn test_reveal_errors_follows_log_level() {
        let mut config = NitoriConfig::default();
        assert!(!config.apply_to(Multiplexer::builder("!")).build().reveal_errors());

        config.logging.level = LogLevel::Debug;
        assert!(config.apply_to(Multiplexer::builder("!")).build().reveal_errors());

        config.router.reveal_errors = Some(false);
        assert!(!config.apply_to(Multiplexer::builder("!")).build().reveal_errors());

        config.logging.level = LogLevel::Warn;
        config.router.reveal_errors = Some(true);
        assert!(config.reveal_errors());
    }
}
