//! Status endpoint error policy: emptiness, cardinality, ordering

use serde_json::json;

use vtscout::config::ClientConfig;
use vtscout::{Client, DiscoveryError, TabletAlias, TabletHealth};

use crate::mock::{status_grid, MockVtctld};

#[tokio::test]
async fn test_empty_grids_are_reported_as_no_tablets() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(json!([{"Aliases": [], "Data": []}]));

    let client = Client::new(&ClientConfig::default());
    let err = client
        .replica_tablet_statuses(&mock.settings("test_ks"))
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::NoTablets));
}

#[tokio::test]
async fn test_empty_response_array_is_rejected() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(json!([]));

    let client = Client::new(&ClientConfig::default());
    let err = client
        .replica_tablet_statuses(&mock.settings("test_ks"))
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_two_element_response_array_is_rejected() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(json!([
        {"Aliases": [[{"Cell": "ac4", "Uid": 1}]], "Data": [[0]]},
        {"Aliases": [], "Data": []}
    ]));

    let client = Client::new(&ClientConfig::default());
    let err = client
        .replica_tablet_statuses(&mock.settings("test_ks"))
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_grid_shape_mismatch_is_rejected() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(json!([
        {"Aliases": [[{"Cell": "ac4", "Uid": 1}]], "Data": [[0, 1]]}
    ]));

    let client = Client::new(&ClientConfig::default());
    let err = client
        .replica_tablet_statuses(&mock.settings("test_ks"))
        .await
        .unwrap_err();

    assert!(matches!(err, DiscoveryError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_statuses_preserve_api_order() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(status_grid(&[
        &[("ac4", 1, 0)],
        &[("ac4", 2, 1), ("va3", 3, 2)],
    ]));

    let client = Client::new(&ClientConfig::default());
    let statuses = client
        .replica_tablet_statuses(&mock.settings("test_ks"))
        .await
        .unwrap();

    let aliases: Vec<TabletAlias> = statuses.iter().map(|s| s.alias.clone()).collect();
    assert_eq!(
        aliases,
        vec![
            TabletAlias::new("ac4", 1),
            TabletAlias::new("ac4", 2),
            TabletAlias::new("va3", 3),
        ]
    );
    assert_eq!(statuses[0].health, TabletHealth::Healthy);
    assert_eq!(statuses[1].health, TabletHealth::Degraded);
    assert_eq!(statuses[2].health, TabletHealth::Unhealthy);
}

#[tokio::test]
async fn test_duplicate_cells_fetch_twice() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(status_grid(&[&[("ac4", 1, 0)]]));

    let client = Client::new(&ClientConfig::default());
    let mut settings = mock.settings("test_ks");
    settings.cells = vec!["ac4".to_string(), "ac4".to_string()];

    let statuses = client.replica_tablet_statuses(&settings).await.unwrap();

    // Duplicate cells are not deduplicated: two fetches, duplicate entries.
    assert_eq!(mock.status_hits(), 2);
    assert_eq!(statuses.len(), 2);
}
