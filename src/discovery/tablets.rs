//! Tablet detail resolution via `/api/tablets/{cell}-{uid}` and keyspace
//! tablet listing via `/api/keyspace/{keyspace}/tablets/{shard}`

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::DiscoverySettings;

use super::client::{api_root, Client};
use super::{DiscoveryError, TabletAlias};

/// Tablet role types, numbered as in the Vitess topodata schema. Numbers we
/// do not recognize map to `Unknown` rather than failing the decode, so a
/// topology running newer tablet types still resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "u8")]
pub enum TabletType {
    Unknown,
    Primary,
    Replica,
    Rdonly,
    Spare,
    Experimental,
    Backup,
    Restore,
    Drained,
}

impl From<u8> for TabletType {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Primary,
            2 => Self::Replica,
            3 => Self::Rdonly,
            4 => Self::Spare,
            5 => Self::Experimental,
            6 => Self::Backup,
            7 => Self::Restore,
            8 => Self::Drained,
            _ => Self::Unknown,
        }
    }
}

/// Connection details for a running vttablet instance
///
/// The alias and role type are only present on endpoints that surface the
/// richer tablet record.
#[derive(Debug, Clone, Deserialize)]
pub struct Tablet {
    #[serde(default)]
    pub alias: Option<TabletAlias>,
    #[serde(default)]
    pub mysql_hostname: String,
    #[serde(default)]
    pub mysql_port: i32,
    #[serde(rename = "type", default)]
    pub tablet_type: Option<TabletType>,
}

impl Tablet {
    pub fn is_replica(&self) -> bool {
        self.tablet_type == Some(TabletType::Replica)
    }

    /// Whether the tablet's cell is in `cells`. An empty list accepts every
    /// cell; a tablet without an alias only passes the empty list.
    pub fn has_valid_cell(&self, cells: &[String]) -> bool {
        if cells.is_empty() {
            return true;
        }
        self.alias
            .as_ref()
            .is_some_and(|alias| cells.iter().any(|cell| *cell == alias.cell))
    }
}

/// Cache key for resolved tablets. Keyspace-qualified so that identical
/// aliases from different keyspaces sharing one client never collide.
fn tablet_cache_key(settings: &DiscoverySettings, alias: &TabletAlias) -> String {
    format!("{}-{}-{}", settings.keyspace, alias.cell, alias.uid)
}

impl Client {
    /// Resolve a tablet alias to its connection details, consulting the
    /// tablet cache first. A live cache entry is authoritative; no
    /// revalidation happens before it expires.
    ///
    /// On a miss the tablet is fetched from `/tablets/{cell}-{uid}` and
    /// cached with the per-call TTL override if positive, else the client
    /// default. A non-200 answer yields [`DiscoveryError::TabletNotFound`]
    /// and is never cached.
    pub async fn tablet(
        &self,
        settings: &DiscoverySettings,
        alias: &TabletAlias,
    ) -> Result<Tablet, DiscoveryError> {
        let key = tablet_cache_key(settings, alias);
        if let Some(tablet) = self.tablet_cache.get(&key) {
            debug!(alias = %alias, "Tablet cache hit");
            return Ok(tablet);
        }

        let url = format!("{}/tablets/{}", api_root(&settings.api), alias);
        let resp = self.get(&url, settings).await?;
        if resp.status() != StatusCode::OK {
            return Err(DiscoveryError::TabletNotFound(alias.clone()));
        }

        let body = resp.text().await?;
        let tablet: Tablet = serde_json::from_str(&body)?;

        let ttl = if settings.tablet_cache_ttl_secs > 0 {
            Duration::from_secs(settings.tablet_cache_ttl_secs)
        } else {
            self.tablet_cache.default_ttl()
        };
        self.tablet_cache.set(key, tablet.clone(), ttl);
        debug!(alias = %alias, host = %tablet.mysql_hostname, "Resolved tablet");
        Ok(tablet)
    }

    /// List the replica tablets of the configured keyspace (and shard, when
    /// set) from `/keyspace/{keyspace}/tablets/{shard}`. Results are not
    /// cached.
    ///
    /// A 404 maps to an empty list: one observed vtctld variant answers 404
    /// for keyspaces it does not know.
    pub async fn keyspace_tablets(
        &self,
        settings: &DiscoverySettings,
    ) -> Result<Vec<Tablet>, DiscoveryError> {
        let url = format!(
            "{}/keyspace/{}/tablets/{}",
            api_root(&settings.api),
            settings.keyspace,
            settings.shard,
        );
        let resp = self.get(&url, settings).await?;
        match resp.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => return Ok(Vec::new()),
            status => return Err(DiscoveryError::BadStatus { status, url }),
        }

        let body = resp.text().await?;
        let tablets: Vec<Tablet> = serde_json::from_str(&body)?;
        Ok(tablets.into_iter().filter(Tablet::is_replica).collect())
    }
}
