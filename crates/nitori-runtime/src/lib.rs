//! # Nitori Runtime
//!
//! The process-level layer around the multiplexer:
//!
//! - Layered configuration loading and validation ([`ConfigLoader`])
//! - Logging initialization on `tracing-subscriber` ([`LoggingBuilder`])
//! - The event pump feeding platform events into
//!   [`Multiplexer::dispatch`](nitori_framework::Multiplexer::dispatch)
//!   ([`NitoriRuntime`])
//!
//! ```rust,ignore
//! use nitori_runtime::NitoriRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = NitoriRuntime::new();
//!     let mux = runtime.multiplexer_builder().build();
//!     let (tx, rx) = tokio::sync::mpsc::channel(256);
//!     // connect the platform client and forward its events into `tx`
//!     runtime.run(mux, client, rx).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

pub use config::{
    ConfigError, ConfigLoader, ConfigResult, LoggingConfig, NitoriConfig, Profile, RouterConfig,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{FmtSpan, LoggingBuilder};
pub use runtime::{NitoriRuntime, RuntimeBuilder, RuntimeStats};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Logging macros and span helpers.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
