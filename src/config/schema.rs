use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Discovery poll loop settings (binary only)
    #[serde(default)]
    pub poll: PollConfig,
    /// Client-wide defaults (cache TTL, fan-out cap)
    #[serde(default)]
    pub client: ClientConfig,
    /// Per-call discovery settings
    #[serde(default)]
    pub vitess: DiscoverySettings,
}

// ============================================================================
// Poll Loop Configuration
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    /// Seconds between discovery rounds
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

fn default_poll_interval_secs() -> u64 {
    5
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

// ============================================================================
// Client Configuration
// ============================================================================

/// Client-wide defaults, fixed for the lifetime of a `Client`
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Default tablet cache TTL in seconds (0 = built-in 10 minute default)
    #[serde(default)]
    pub tablet_cache_ttl_secs: u64,
    /// Maximum concurrent tablet resolutions per discovery call
    #[serde(default = "default_max_concurrent_resolves")]
    pub max_concurrent_resolves: usize,
}

fn default_max_concurrent_resolves() -> usize {
    16
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tablet_cache_ttl_secs: 0,
            max_concurrent_resolves: default_max_concurrent_resolves(),
        }
    }
}

// ============================================================================
// Discovery Settings
// ============================================================================

/// Settings for one discovery call against the vtctld API
///
/// Immutable for the duration of a call; different calls may use different
/// settings against the same client (and hence share its tablet cache).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscoverySettings {
    /// Base address of the vtctld API, e.g. "http://vtctld:15000"
    #[serde(default)]
    pub api: String,
    /// Keyspace to discover tablets for
    #[serde(default)]
    pub keyspace: String,
    /// Shard within the keyspace (empty = unsharded)
    #[serde(default)]
    pub shard: String,
    /// Cells to restrict discovery to (empty = all cells)
    #[serde(default)]
    pub cells: Vec<String>,
    /// Per-request timeout in seconds (0 = built-in 5 second default)
    #[serde(default)]
    pub timeout_secs: u64,
    /// Tablet cache TTL override in seconds (0 = client default)
    #[serde(default)]
    pub tablet_cache_ttl_secs: u64,
}

impl DiscoverySettings {
    /// Whether the settings are missing the fields discovery cannot run
    /// without.
    pub fn is_empty(&self) -> bool {
        self.api.is_empty() || self.keyspace.is_empty()
    }
}
