use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

use vtscout::config::{self, Config};
use vtscout::discovery::Client;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    if config.vitess.is_empty() {
        anyhow::bail!("config must set vitess.api and vitess.keyspace");
    }

    let client = Client::new(&config.client);

    info!(
        api = %config.vitess.api,
        keyspace = %config.vitess.keyspace,
        cells = ?config.vitess.cells,
        interval_secs = config.poll.interval_secs,
        "Starting tablet discovery"
    );

    let mut ticker = interval(Duration::from_secs(config.poll.interval_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        match client.healthy_replica_tablets(&config.vitess).await {
            Ok(tablets) => {
                info!(count = tablets.len(), "Discovered healthy replica tablets");
                for tablet in &tablets {
                    debug!(
                        host = %tablet.mysql_hostname,
                        port = tablet.mysql_port,
                        "Healthy replica"
                    );
                }
            }
            Err(e) => {
                error!(error = %e, "Discovery round failed");
            }
        }
    }
}

fn load_config() -> Config {
    // Explicit path from argv wins; otherwise try the default locations
    let candidates: Vec<String> = match std::env::args().nth(1) {
        Some(path) => vec![path],
        None => vec!["config/vtscout.toml".to_string(), "vtscout.toml".to_string()],
    };

    for path in &candidates {
        match config::load_config(path) {
            Ok(config) => {
                info!(path = %path, "Loaded configuration");
                return config;
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to load config");
            }
        }
    }

    info!("Using default configuration");
    Config::default()
}
