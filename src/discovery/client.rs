//! The vtctld API client and the discovery orchestrator

use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, error};

use crate::cache::TtlCache;
use crate::config::{ClientConfig, DiscoverySettings};

use super::{DiscoveryError, Tablet, TabletHealth};

/// Request timeout applied when the per-call setting is zero.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Tablet cache TTL applied when the client config leaves it at zero.
const DEFAULT_TABLET_CACHE_TTL: Duration = Duration::from_secs(600);

/// Returns the base URL of the vtctld API: trailing slashes stripped, then a
/// single `/api` suffix. Malformed addresses are only detected once a
/// request is attempted.
pub fn api_root(api: &str) -> String {
    let api = api.trim_end_matches('/');
    if api.ends_with("/api") {
        api.to_string()
    } else {
        format!("{api}/api")
    }
}

/// Returns the configured cell names, trimmed, with empties dropped.
/// Duplicates are kept as configured. An empty result means every cell
/// should be queried.
pub fn parse_cells(settings: &DiscoverySettings) -> Vec<String> {
    settings
        .cells
        .iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Client for the vtctld API
///
/// Holds the HTTP client and the resolved-tablet cache; safe to share across
/// concurrent discovery calls. Request timeouts are applied per request, the
/// shared HTTP client itself is never reconfigured.
pub struct Client {
    pub(super) http: reqwest::Client,
    pub(super) tablet_cache: TtlCache<Tablet>,
    max_concurrent_resolves: usize,
}

impl Client {
    /// Create a client. Must be called inside a Tokio runtime: the cache
    /// sweep task is spawned here.
    pub fn new(config: &ClientConfig) -> Self {
        let default_ttl = if config.tablet_cache_ttl_secs > 0 {
            Duration::from_secs(config.tablet_cache_ttl_secs)
        } else {
            DEFAULT_TABLET_CACHE_TTL
        };
        let tablet_cache = TtlCache::new(default_ttl);
        tablet_cache.spawn_sweeper();

        Self {
            http: reqwest::Client::new(),
            tablet_cache,
            max_concurrent_resolves: config.max_concurrent_resolves.max(1),
        }
    }

    /// Discover the healthy replica tablets of the configured keyspace.
    ///
    /// Fetches the per-cell status grids, filters to healthy tablets, and
    /// resolves each one concurrently (bounded by the configured cap),
    /// joining every resolution before returning. A tablet whose resolution
    /// fails is logged and dropped from the result; only a status fetch
    /// failure fails the whole call. Result order is unspecified.
    pub async fn healthy_replica_tablets(
        &self,
        settings: &DiscoverySettings,
    ) -> Result<Vec<Tablet>, DiscoveryError> {
        let statuses = self.replica_tablet_statuses(settings).await?;

        let healthy: Vec<_> = statuses
            .into_iter()
            .filter(|status| status.health == TabletHealth::Healthy)
            .collect();
        debug!(
            keyspace = %settings.keyspace,
            healthy = healthy.len(),
            "Resolving healthy tablets"
        );

        let tablets: Vec<Tablet> = stream::iter(healthy)
            .map(|status| async move {
                match self.tablet(settings, &status.alias).await {
                    Ok(tablet) => Some(tablet),
                    Err(e) => {
                        error!(
                            alias = %status.alias,
                            error = %e,
                            "Unable to get tablet from vtctld API"
                        );
                        None
                    }
                }
            })
            .buffer_unordered(self.max_concurrent_resolves)
            .filter_map(|tablet| async move { tablet })
            .collect()
            .await;

        Ok(tablets)
    }

    /// Issue a GET with the per-call timeout. Status handling is left to
    /// the caller.
    pub(super) async fn get(
        &self,
        url: &str,
        settings: &DiscoverySettings,
    ) -> Result<reqwest::Response, DiscoveryError> {
        let timeout = if settings.timeout_secs > 0 {
            Duration::from_secs(settings.timeout_secs)
        } else {
            DEFAULT_TIMEOUT
        };
        Ok(self.http.get(url).timeout(timeout).send().await?)
    }
}
