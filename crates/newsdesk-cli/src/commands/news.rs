use anyhow::Result;
use serde::Serialize;

use newsdesk_core::feed::{parse_source_keys, FeedItem};
use newsdesk_core::{AppConfig, NewsAggregator, NewsRequest};

#[derive(Serialize)]
struct NewsOutput {
    items: Vec<FeedItem>,
}

pub async fn run(config: &AppConfig, sources: Option<&str>, q: Option<String>, limit: Option<i64>) -> Result<()> {
    let aggregator = NewsAggregator::from_config(config)?;

    let request = NewsRequest {
        sources: sources.map(parse_source_keys).unwrap_or_default(),
        keywords: q,
        limit,
    };
    let items = aggregator.news(&request).await;

    println!("{}", serde_json::to_string_pretty(&NewsOutput { items })?);
    Ok(())
}
