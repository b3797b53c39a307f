//! Discovery client for the vtctld topology API
//!
//! This module provides:
//! - Per-cell health-status fetching from `/api/tablet_statuses/`
//! - Resolution of tablet aliases to MySQL connection details, backed by a
//!   TTL cache
//! - A fan-out orchestrator returning the healthy replica tablets of a
//!   keyspace

mod client;
mod statuses;
mod tablets;

pub use client::{api_root, parse_cells, Client};
pub use statuses::{TabletHealth, TabletStatus};
pub use tablets::{Tablet, TabletType};

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Identity of a tablet: the cell it lives in plus a numeric id issued by
/// the topology service. Serves as the join key between status and detail
/// responses and (keyspace-qualified) as the tablet cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct TabletAlias {
    #[serde(rename = "Cell", alias = "cell")]
    pub cell: String,
    #[serde(rename = "Uid", alias = "uid")]
    pub uid: u32,
}

impl TabletAlias {
    pub fn new(cell: impl Into<String>, uid: u32) -> Self {
        Self {
            cell: cell.into(),
            uid,
        }
    }
}

impl fmt::Display for TabletAlias {
    /// The `{cell}-{uid}` form used in vtctld URLs and log lines.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.cell, self.uid)
    }
}

/// Error during a discovery operation
///
/// Fatal errors abort the entire call with no partial result; the one
/// recoverable case is `TabletNotFound` during the orchestrator's fan-out,
/// where the tablet is logged and omitted. Nothing is retried here, callers
/// re-invoke discovery on their own schedule.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status {status} from {url}")]
    BadStatus {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("found no tablets")]
    NoTablets,
    #[error("tablet {0} not found")]
    TabletNotFound(TabletAlias),
}
