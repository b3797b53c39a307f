//! Tablet cache behavior observed through the HTTP layer

use std::time::Duration;

use vtscout::config::ClientConfig;
use vtscout::{Client, TabletAlias};

use crate::mock::{status_grid, MockVtctld};

#[tokio::test]
async fn test_second_resolution_is_served_from_cache() {
    let mock = MockVtctld::start().await;
    mock.add_tablet("ac4-1", "h1", 3306);

    let client = Client::new(&ClientConfig::default());
    let settings = mock.settings("test_ks");
    let alias = TabletAlias::new("ac4", 1);

    let first = client.tablet(&settings, &alias).await.unwrap();
    let second = client.tablet(&settings, &alias).await.unwrap();

    assert_eq!(first.mysql_hostname, second.mysql_hostname);
    assert_eq!(mock.tablet_hits("ac4-1"), 1);
}

#[tokio::test]
async fn test_repeated_discovery_reuses_cached_details() {
    let mock = MockVtctld::start().await;
    mock.set_statuses(status_grid(&[&[("ac4", 1, 0)]]));
    mock.add_tablet("ac4-1", "h1", 3306);

    let client = Client::new(&ClientConfig::default());
    let settings = mock.settings("test_ks");

    client.healthy_replica_tablets(&settings).await.unwrap();
    client.healthy_replica_tablets(&settings).await.unwrap();

    // Statuses are refetched every round, details only once.
    assert_eq!(mock.status_hits(), 2);
    assert_eq!(mock.tablet_hits("ac4-1"), 1);
}

#[tokio::test]
async fn test_expired_entry_triggers_a_fresh_fetch() {
    let mock = MockVtctld::start().await;
    mock.add_tablet("ac4-1", "h1", 3306);

    let client = Client::new(&ClientConfig::default());
    let mut settings = mock.settings("test_ks");
    settings.tablet_cache_ttl_secs = 1;
    let alias = TabletAlias::new("ac4", 1);

    client.tablet(&settings, &alias).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1100)).await;
    client.tablet(&settings, &alias).await.unwrap();

    assert_eq!(mock.tablet_hits("ac4-1"), 2);
}

#[tokio::test]
async fn test_cache_is_scoped_by_keyspace() {
    let mock = MockVtctld::start().await;
    mock.add_tablet("ac4-1", "h1", 3306);

    let client = Client::new(&ClientConfig::default());
    let alias = TabletAlias::new("ac4", 1);

    client
        .tablet(&mock.settings("ks_one"), &alias)
        .await
        .unwrap();
    client
        .tablet(&mock.settings("ks_two"), &alias)
        .await
        .unwrap();

    // Same alias, different keyspaces: two distinct cache entries.
    assert_eq!(mock.tablet_hits("ac4-1"), 2);
}

#[tokio::test]
async fn test_failed_lookups_are_not_cached() {
    let mock = MockVtctld::start().await;

    let client = Client::new(&ClientConfig::default());
    let settings = mock.settings("test_ks");
    let alias = TabletAlias::new("ac4", 1);

    client.tablet(&settings, &alias).await.unwrap_err();

    // The tablet appears; the earlier miss must not shadow it.
    mock.add_tablet("ac4-1", "h1", 3306);
    let tablet = client.tablet(&settings, &alias).await.unwrap();
    assert_eq!(tablet.mysql_hostname, "h1");
    assert_eq!(mock.tablet_hits("ac4-1"), 2);
}
