//! Per-guild command prefixes.
//!
//! The multiplexer carries one default prefix. Deployments that let guilds
//! pick their own plug a [`PrefixSource`] into the builder; private contexts
//! always use the default.

use std::collections::HashMap;

use async_trait::async_trait;

use nitori_core::GuildId;

/// Resolves the effective command prefix of a guild.
#[async_trait]
pub trait PrefixSource: Send + Sync {
    /// Returns the prefix for `guild`, given the multiplexer default.
    async fn guild_prefix(&self, guild: GuildId, default: &str) -> String;
}

/// Every guild uses the default prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPrefix;

#[async_trait]
impl PrefixSource for DefaultPrefix {
    async fn guild_prefix(&self, _guild: GuildId, default: &str) -> String {
        default.to_owned()
    }
}

/// Fixed per-guild overrides, falling back to the default.
#[derive(Debug, Clone, Default)]
pub struct StaticPrefixes {
    overrides: HashMap<GuildId, String>,
}

impl StaticPrefixes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix used in `guild`.
    pub fn with(mut self, guild: impl Into<GuildId>, prefix: impl Into<String>) -> Self {
        self.overrides.insert(guild.into(), prefix.into());
        self
    }
}

#[async_trait]
impl PrefixSource for StaticPrefixes {
    async fn guild_prefix(&self, guild: GuildId, default: &str) -> String {
        self.overrides
            .get(&guild)
            .cloned()
            .unwrap_or_else(|| default.to_owned())
    }
}
