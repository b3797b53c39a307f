//! vtscout: healthy-tablet discovery against the vtctld topology API.
//!
//! The [`discovery::Client`] fetches per-cell health-status grids from a
//! vtctld server, resolves each healthy tablet to its MySQL connection
//! details, and caches those details with a TTL so that periodic discovery
//! rounds stay cheap.

pub mod cache;
pub mod config;
pub mod discovery;

pub use discovery::{
    Client, DiscoveryError, Tablet, TabletAlias, TabletHealth, TabletStatus, TabletType,
};
