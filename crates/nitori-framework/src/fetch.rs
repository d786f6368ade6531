//! Cache-then-remote lookups.
//!
//! Both helpers try the client cache first, fall back to the remote API, and
//! then try to cache what they fetched. A failed cache insert is only logged;
//! a failed fetch yields `None`.

use std::sync::Arc;

use tracing::{error, trace, warn};

use nitori_core::{Channel, ChannelId, Client, Guild, GuildId};

/// Resolves a guild from cache, then the remote API.
pub async fn get_guild(client: &dyn Client, id: GuildId) -> Option<Arc<Guild>> {
    if let Ok(guild) = client.cached_guild(id) {
        return Some(guild);
    }

    trace!(guild = %id, "Guild cache miss, fetching");
    let guild = match client.fetch_guild(id).await {
        Ok(guild) => Arc::new(guild),
        Err(e) => {
            error!(guild = %id, error = %e, "Unable to fetch guild from API or cache");
            return None;
        }
    };

    if let Err(e) = client.cache_guild(Arc::clone(&guild)) {
        warn!(guild = %id, error = %e, "Unable to cache guild fetched from API");
    }
    Some(guild)
}

/// Resolves a channel from cache, then the remote API.
pub async fn get_channel(client: &dyn Client, id: ChannelId) -> Option<Arc<Channel>> {
    if let Ok(channel) = client.cached_channel(id) {
        return Some(channel);
    }

    trace!(channel = %id, "Channel cache miss, fetching");
    let channel = match client.fetch_channel(id).await {
        Ok(channel) => Arc::new(channel),
        Err(e) => {
            error!(channel = %id, error = %e, "Unable to fetch channel from API or cache");
            return None;
        }
    };

    if let Err(e) = client.cache_channel(Arc::clone(&channel)) {
        warn!(channel = %id, error = %e, "Unable to cache channel fetched from API");
    }
    Some(channel)
}
