use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use nfl_elo_dashboard::config::DashboardConfig;
use nfl_elo_dashboard::dashboard::Dashboard;
use nfl_elo_dashboard::server;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = DashboardConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(
        source = %cfg.csv_url,
        cache_ttl_secs = cfg.cache_ttl.map(|d| d.as_secs()),
        "starting nfl elo dashboard"
    );

    let dashboard = Arc::new(Dashboard::from_config(&cfg));
    server::serve(dashboard, &cfg.addr).await
}
