//! The event pump.
//!
//! [`NitoriRuntime`] owns the loaded configuration. Given a frozen
//! multiplexer, a platform client and a channel of platform events, it
//! spawns one dispatch task per event until the channel closes or a
//! shutdown signal arrives, then waits for in-flight dispatches.
//!
//! ```rust,ignore
//! use nitori_runtime::NitoriRuntime;
//!
//! let runtime = NitoriRuntime::builder()
//!     .config_file("config/nitori.toml")
//!     .build()?;
//!
//! let mux = runtime
//!     .multiplexer_builder()
//!     .route(Route::new("ping", categories::SYSTEM, ping))?
//!     .build();
//!
//! let (events, rx) = tokio::sync::mpsc::channel(256);
//! // hand `events` to the gateway connection
//! runtime.run(mux, client, rx).await?;
//! ```

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use nitori_core::{BoxedClient, Event};
use nitori_framework::{CommandOutcome, Multiplexer, MultiplexerBuilder};

use crate::config::{ConfigLoader, ConfigResult, NitoriConfig};
use crate::error::RuntimeResult;
use crate::logging;

/// Counters collected while the runtime runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Events received from the channel.
    pub events: u64,
    /// Commands routed to a handler.
    pub commands: u64,
    /// Routed commands whose handler failed or panicked.
    pub failed_commands: u64,
    /// Targeted messages that matched no route.
    pub unmatched: u64,
}

#[derive(Default)]
struct Counters {
    events: AtomicU64,
    commands: AtomicU64,
    failed_commands: AtomicU64,
    unmatched: AtomicU64,
}

impl Counters {
    fn record(&self, outcome: &CommandOutcome) {
        match outcome {
            CommandOutcome::Routed { ok, .. } => {
                self.commands.fetch_add(1, Ordering::Relaxed);
                if !ok {
                    self.failed_commands.fetch_add(1, Ordering::Relaxed);
                }
            }
            CommandOutcome::NoMatch => {
                self.unmatched.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn snapshot(&self) -> RuntimeStats {
        RuntimeStats {
            events: self.events.load(Ordering::Relaxed),
            commands: self.commands.load(Ordering::Relaxed),
            failed_commands: self.failed_commands.load(Ordering::Relaxed),
            unmatched: self.unmatched.load(Ordering::Relaxed),
        }
    }
}

/// Configuration, logging and the event pump.
#[derive(Debug)]
pub struct NitoriRuntime {
    config: NitoriConfig,
}

impl NitoriRuntime {
    /// Creates a runtime from the configuration found in the current
    /// directory, falling back to defaults.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                NitoriConfig::default()
            });

        Self::from_config(&config)
    }

    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from configuration and initializes logging.
    pub fn from_config(config: &NitoriConfig) -> Self {
        logging::init_from_config(&config.logging);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            prefix = %config.router.prefix,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &NitoriConfig {
        &self.config
    }

    /// A multiplexer builder carrying the configured router settings.
    pub fn multiplexer_builder(&self) -> MultiplexerBuilder {
        self.config
            .apply_to(Multiplexer::builder(self.config.router.prefix.clone()))
    }

    /// Pumps `events` until the channel closes or Ctrl+C / SIGTERM arrives.
    pub async fn run(
        &self,
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        events: mpsc::Receiver<Event>,
    ) -> RuntimeResult<RuntimeStats> {
        info!("Nitori runtime is now running. Press Ctrl+C to stop.");
        self.pump(mux, client, events, wait_for_shutdown()).await
    }

    /// Pumps `events` until the channel closes or `shutdown` completes.
    pub async fn run_until<F>(
        &self,
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        events: mpsc::Receiver<Event>,
        shutdown: F,
    ) -> RuntimeResult<RuntimeStats>
    where
        F: Future<Output = ()>,
    {
        self.pump(mux, client, events, async {
            shutdown.await;
            Ok(())
        })
        .await
    }

    async fn pump<F>(
        &self,
        mux: Arc<Multiplexer>,
        client: BoxedClient,
        mut events: mpsc::Receiver<Event>,
        shutdown: F,
    ) -> RuntimeResult<RuntimeStats>
    where
        F: Future<Output = RuntimeResult<()>>,
    {
        let counters = Arc::new(Counters::default());
        let mut tasks = JoinSet::new();
        tokio::pin!(shutdown);

        debug!(
            routes = mux.routes().len(),
            shard = client.shard_id(),
            "Event pump started"
        );

        let result = loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        info!("Event channel closed, shutting down");
                        break Ok(());
                    };
                    counters.events.fetch_add(1, Ordering::Relaxed);
                    let mux = Arc::clone(&mux);
                    let client = Arc::clone(&client);
                    let counters = Arc::clone(&counters);
                    tasks.spawn(async move {
                        let outcome = mux.dispatch(client, event).await.join().await;
                        counters.record(&outcome);
                    });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined
                        && e.is_panic()
                    {
                        error!(error = %e, "Dispatch task panicked");
                    }
                }
                result = &mut shutdown => break result,
            }
        };

        debug!(in_flight = tasks.len(), "Waiting for in-flight dispatches");
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined
                && e.is_panic()
            {
                error!(error = %e, "Dispatch task panicked");
            }
        }

        let stats = counters.snapshot();
        info!(
            events = stats.events,
            commands = stats.commands,
            failed = stats.failed_commands,
            "Runtime stopped"
        );
        result.map(|()| stats)
    }
}

impl Default for NitoriRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for Ctrl+C or SIGTERM.
async fn wait_for_shutdown() -> RuntimeResult<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

/// Builder for creating a `NitoriRuntime` with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: NitoriConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> ConfigResult<NitoriRuntime> {
        let config = self.config_loader.load()?;
        Ok(NitoriRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
