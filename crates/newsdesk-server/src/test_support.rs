use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use newsdesk_core::feed::{FeedUpstream, RawEntry, Source, SourceRegistry};
use newsdesk_core::{AppConfig, Error, NewsAggregator, Result};

use crate::state::AppState;

/// Upstream serving fixed entries per source key
pub struct StaticUpstream {
    feeds: HashMap<String, Vec<RawEntry>>,
}

#[async_trait]
impl FeedUpstream for StaticUpstream {
    async fn fetch_entries(&self, source: &Source) -> Result<Vec<RawEntry>> {
        self.feeds
            .get(&source.key)
            .cloned()
            .ok_or_else(|| Error::FeedParse(format!("no feed for {}", source.key)))
    }
}

pub fn entry(title: &str, published: &str) -> RawEntry {
    RawEntry {
        title: Some(title.to_string()),
        summary: Some(format!("About {}.", title)),
        link: Some(format!("https://example.com/{}", title)),
        published: Some(published.to_string()),
        ..Default::default()
    }
}

/// State over sources `a`, `b`, ... named "Source A", "Source B", ...
pub fn app_state(feeds: Vec<(&str, Vec<RawEntry>)>) -> AppState {
    let sources = feeds
        .iter()
        .map(|(key, _)| {
            Source::new(
                *key,
                format!("Source {}", key.to_uppercase()),
                format!("https://{}.example.com/rss", key),
            )
        })
        .collect();
    let upstream = StaticUpstream {
        feeds: feeds
            .into_iter()
            .map(|(key, entries)| (key.to_string(), entries))
            .collect(),
    };

    let aggregator = NewsAggregator::new(SourceRegistry::new(sources), Arc::new(upstream), &AppConfig::default());
    AppState::new(Arc::new(aggregator))
}
