//! Health-status fetching from `/api/tablet_statuses/`
//!
//! The endpoint returns a JSON array with exactly one element holding two
//! parallel jagged grids, `Aliases[i][j]` and `Data[i][j]`, indexed
//! identically. Flattening iterates the outer index then the inner index,
//! preserving API order.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::config::DiscoverySettings;

use super::client::{api_root, parse_cells, Client};
use super::{DiscoveryError, TabletAlias};

/// Health states reported in the status grid, decoded from the small
/// integers used by vtctld's tablet stats cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabletHealth {
    Healthy,
    Degraded,
    Unhealthy,
}

impl TryFrom<u8> for TabletHealth {
    type Error = DiscoveryError;

    fn try_from(code: u8) -> Result<Self, DiscoveryError> {
        match code {
            0 => Ok(Self::Healthy),
            1 => Ok(Self::Degraded),
            2 => Ok(Self::Unhealthy),
            other => Err(DiscoveryError::MalformedResponse(format!(
                "unknown tablet health code {other}"
            ))),
        }
    }
}

/// One element of a `/tablet_statuses/` response: parallel grids of aliases
/// and health codes.
#[derive(Debug, Deserialize)]
pub(super) struct TabletStatusGrid {
    #[serde(rename = "Aliases", alias = "aliases")]
    aliases: Vec<Vec<TabletAlias>>,
    #[serde(rename = "Data", alias = "data")]
    data: Vec<Vec<u8>>,
}

/// Health of a single tablet within one discovery round. Consumed once and
/// discarded; connection details live in the tablet cache instead.
#[derive(Debug, Clone)]
pub struct TabletStatus {
    pub alias: TabletAlias,
    pub health: TabletHealth,
}

/// Zip the alias grid with the health-code grid, rejecting any shape
/// mismatch rather than indexing defensively.
pub(super) fn flatten_grid(grid: TabletStatusGrid) -> Result<Vec<TabletStatus>, DiscoveryError> {
    if grid.aliases.len() != grid.data.len() {
        return Err(DiscoveryError::MalformedResponse(format!(
            "alias grid has {} rows, data grid has {}",
            grid.aliases.len(),
            grid.data.len()
        )));
    }

    let mut statuses = Vec::new();
    for (row, (aliases, codes)) in grid.aliases.into_iter().zip(grid.data).enumerate() {
        if aliases.len() != codes.len() {
            return Err(DiscoveryError::MalformedResponse(format!(
                "row {row}: {} aliases but {} health codes",
                aliases.len(),
                codes.len()
            )));
        }
        for (alias, code) in aliases.into_iter().zip(codes) {
            statuses.push(TabletStatus {
                alias,
                health: TabletHealth::try_from(code)?,
            });
        }
    }
    Ok(statuses)
}

impl Client {
    /// Read `/tablet_statuses/` for every selected cell (or the `all`
    /// sentinel when none is configured) and flatten the grids into a single
    /// status list, in API order.
    ///
    /// Any transport error, non-200 status, decode failure, or unexpected
    /// response cardinality fails the whole call; partial results from
    /// already-processed cells are discarded. Zero tablets across all cells
    /// is reported as [`DiscoveryError::NoTablets`] so callers can tell an
    /// empty keyspace from a silently empty round (the remote API answers
    /// 200 with empty grids for unknown keyspaces too; that ambiguity cannot
    /// be resolved at this layer).
    pub async fn replica_tablet_statuses(
        &self,
        settings: &DiscoverySettings,
    ) -> Result<Vec<TabletStatus>, DiscoveryError> {
        let mut cells = parse_cells(settings);
        if cells.is_empty() {
            cells.push("all".to_string());
        }

        let mut statuses = Vec::new();
        for cell in &cells {
            let url = format!(
                "{}/tablet_statuses/?cell={}&keyspace={}&metric=health&type=replica",
                api_root(&settings.api),
                cell,
                settings.keyspace,
            );
            let resp = self.get(&url, settings).await?;
            if resp.status() != StatusCode::OK {
                return Err(DiscoveryError::BadStatus {
                    status: resp.status(),
                    url,
                });
            }

            let body = resp.text().await?;
            let mut grids: Vec<TabletStatusGrid> = serde_json::from_str(&body)?;
            if grids.len() != 1 {
                return Err(DiscoveryError::MalformedResponse(format!(
                    "expected 1 status grid, got {}",
                    grids.len()
                )));
            }
            statuses.extend(flatten_grid(grids.swap_remove(0))?);
        }

        if statuses.is_empty() {
            return Err(DiscoveryError::NoTablets);
        }
        debug!(
            keyspace = %settings.keyspace,
            count = statuses.len(),
            "Fetched tablet statuses"
        );
        Ok(statuses)
    }
}
