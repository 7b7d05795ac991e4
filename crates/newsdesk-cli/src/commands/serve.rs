use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use newsdesk_core::{AppConfig, NewsAggregator};

pub async fn run(config: AppConfig) -> Result<()> {
    let aggregator = Arc::new(NewsAggregator::from_config(&config)?);

    info!(
        "Serving {} sources, cache TTL {}s",
        aggregator.registry().len(),
        config.sync.cache_ttl_secs
    );

    newsdesk_server::run_server(&config, aggregator).await?;
    Ok(())
}
