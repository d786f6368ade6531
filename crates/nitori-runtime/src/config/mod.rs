//! Configuration module for the Nitori runtime.
//!
//! Configuration is layered with figment: built-in defaults, then config
//! files, then `NITORI_*` environment variables, then programmatic
//! overrides.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    LogFormat, LogLevel, LogOutput, LoggingConfig, NitoriConfig, RouterConfig, SpanEventConfig,
};
pub use validation::validate_config;
