use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::cache::{CacheStatus, FeedCache};
use super::query::query_items;
use crate::config::AppConfig;
use crate::feed::{normalize_entries, FeedFetcher, FeedItem, FeedUpstream, Source, SourceRegistry};
use crate::Result;

/// A request for the merged news list
#[derive(Debug, Clone, Default)]
pub struct NewsRequest {
    /// Source keys to include; empty or all unknown means every source
    pub sources: Vec<String>,
    /// Whitespace-separated keywords that must all match
    pub keywords: Option<String>,
    /// Requested item count, the configured default when absent
    pub limit: Option<i64>,
}

/// Fetches, caches and merges news from the registered sources
pub struct NewsAggregator {
    registry: SourceRegistry,
    upstream: Arc<dyn FeedUpstream>,
    cache: FeedCache,
    max_entries: usize,
    default_limit: usize,
    max_limit: usize,
}

impl NewsAggregator {
    /// Create an aggregator over `registry` reading feeds from `upstream`
    pub fn new(registry: SourceRegistry, upstream: Arc<dyn FeedUpstream>, config: &AppConfig) -> Self {
        Self {
            registry,
            upstream,
            cache: FeedCache::new(Duration::from_secs(config.sync.cache_ttl_secs)),
            max_entries: config.sync.max_entries_per_feed,
            default_limit: config.query.default_limit,
            max_limit: config.query.max_limit,
        }
    }

    /// Built-in sources fetched over HTTP
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = FeedFetcher::new(config)?;
        Ok(Self::new(SourceRegistry::builtin(), Arc::new(fetcher), config))
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Normalized items of one source, served from cache while fresh.
    ///
    /// Concurrent callers for the same source share a single upstream fetch.
    /// A failed fetch yields an empty list, which is cached like any other
    /// result.
    pub async fn fetch_feed(&self, source: &Source) -> Vec<FeedItem> {
        if let Some(items) = self.cache.get_fresh(&source.key).await {
            debug!("Cache hit for '{}'", source.key);
            return items;
        }

        let lock = self.cache.fetch_lock(&source.key).await;
        let _guard = lock.lock().await;

        // Someone else may have refreshed it while we waited
        if let Some(items) = self.cache.get_fresh(&source.key).await {
            debug!("Cache filled while waiting for '{}'", source.key);
            return items;
        }

        let items = match self.refresh(source).await {
            Ok(items) => {
                info!("Fetched {} items from '{}'", items.len(), source.key);
                items
            }
            Err(e) => {
                warn!("Failed to fetch feed '{}' ({}): {}", source.key, source.url, e);
                Vec::new()
            }
        };

        self.cache.store(&source.key, items.clone()).await;
        items
    }

    async fn refresh(&self, source: &Source) -> Result<Vec<FeedItem>> {
        let entries = self.upstream.fetch_entries(source).await?;
        Ok(normalize_entries(&entries, &source.name, self.max_entries))
    }

    /// Concatenate the items of `sources`, in source order.
    ///
    /// Sources are fetched concurrently; a slow source delays the result only
    /// by its own fetch time.
    pub async fn orchestrate(&self, sources: &[Source]) -> Vec<FeedItem> {
        let fetches = sources.iter().map(|source| self.fetch_feed(source));
        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Resolve the requested sources, merge their items and apply the query
    pub async fn news(&self, request: &NewsRequest) -> Vec<FeedItem> {
        let sources = self.registry.resolve(&request.sources[..]);
        let merged = self.orchestrate(&sources).await;
        let limit = request.limit.unwrap_or(self.default_limit as i64);

        query_items(merged, request.keywords.as_deref(), limit, self.max_limit)
    }

    pub async fn cache_status(&self) -> Vec<CacheStatus> {
        self.cache.status().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::RawEntry;
    use crate::Error;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Upstream serving canned entries and counting fetches per source
    #[derive(Default)]
    struct FakeUpstream {
        feeds: Mutex<HashMap<String, Vec<RawEntry>>>,
        calls: Mutex<HashMap<String, usize>>,
        total_calls: AtomicUsize,
        delay: Option<Duration>,
    }

    impl FakeUpstream {
        fn with_delay(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Default::default()
            }
        }

        fn set_feed(&self, key: &str, entries: Vec<RawEntry>) {
            self.feeds.lock().unwrap().insert(key.to_string(), entries);
        }

        fn remove_feed(&self, key: &str) {
            self.feeds.lock().unwrap().remove(key);
        }

        fn calls(&self, key: &str) -> usize {
            self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl FeedUpstream for FakeUpstream {
        async fn fetch_entries(&self, source: &Source) -> Result<Vec<RawEntry>> {
            self.total_calls.fetch_add(1, Ordering::SeqCst);
            *self.calls.lock().unwrap().entry(source.key.clone()).or_default() += 1;

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.feeds
                .lock()
                .unwrap()
                .get(&source.key)
                .cloned()
                .ok_or_else(|| Error::FeedParse(format!("no feed for {}", source.key)))
        }
    }

    fn entry(title: &str, published: &str) -> RawEntry {
        RawEntry {
            title: Some(title.to_string()),
            summary: Some(format!("About {}.", title)),
            link: Some(format!("https://example.com/{}", title)),
            published: Some(published.to_string()),
            ..Default::default()
        }
    }

    fn registry() -> SourceRegistry {
        SourceRegistry::new(vec![
            Source::new("a", "Source A", "https://a.example.com/rss"),
            Source::new("b", "Source B", "https://b.example.com/rss"),
        ])
    }

    fn aggregator(upstream: Arc<FakeUpstream>) -> NewsAggregator {
        NewsAggregator::new(registry(), upstream, &AppConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_fetch_within_ttl_hits_cache() {
        let upstream = Arc::new(FakeUpstream::default());
        upstream.set_feed("a", vec![entry("one", "Tue, 10 Jun 2003 04:00:00 GMT")]);
        let agg = aggregator(upstream.clone());
        let source = agg.registry().get("a").unwrap().clone();

        let first = agg.fetch_feed(&source).await;
        tokio::time::advance(Duration::from_secs(300)).await;
        let second = agg.fetch_feed(&source).await;

        assert_eq!(upstream.calls("a"), 1);
        assert_eq!(first, second);
        assert_eq!(first[0].source_name, "Source A");
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_replaced() {
        let upstream = Arc::new(FakeUpstream::default());
        upstream.set_feed("a", vec![entry("one", ""), entry("two", "")]);
        let agg = aggregator(upstream.clone());
        let source = agg.registry().get("a").unwrap().clone();

        assert_eq!(agg.fetch_feed(&source).await.len(), 2);

        upstream.set_feed("a", Vec::new());
        tokio::time::advance(Duration::from_secs(601)).await;

        assert!(agg.fetch_feed(&source).await.is_empty());
        assert_eq!(upstream.calls("a"), 2);
        assert_eq!(agg.cache_status().await[0].items, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_is_empty_and_cached() {
        let upstream = Arc::new(FakeUpstream::default());
        let agg = aggregator(upstream.clone());
        let source = agg.registry().get("b").unwrap().clone();

        assert!(agg.fetch_feed(&source).await.is_empty());

        // The failure is remembered for the whole TTL
        upstream.set_feed("b", vec![entry("late", "")]);
        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(agg.fetch_feed(&source).await.is_empty());
        assert_eq!(upstream.calls("b"), 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(agg.fetch_feed(&source).await.len(), 1);
        assert_eq!(upstream.calls("b"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_fetches_share_one_request() {
        let upstream = Arc::new(FakeUpstream::with_delay(Duration::from_secs(1)));
        upstream.set_feed("a", vec![entry("one", "")]);
        let agg = aggregator(upstream.clone());
        let source = agg.registry().get("a").unwrap().clone();

        let (first, second, third) = tokio::join!(
            agg.fetch_feed(&source),
            agg.fetch_feed(&source),
            agg.fetch_feed(&source)
        );

        assert_eq!(upstream.calls("a"), 1);
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(second, third);
    }

    #[tokio::test(start_paused = true)]
    async fn test_orchestrate_keeps_source_order() {
        let upstream = Arc::new(FakeUpstream::default());
        upstream.set_feed("a", vec![entry("a1", ""), entry("a2", "")]);
        upstream.set_feed("b", vec![entry("b1", "")]);
        let agg = aggregator(upstream.clone());

        let sources = agg.registry().all().to_vec();
        let merged = agg.orchestrate(&sources).await;
        let titles: Vec<&str> = merged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2", "b1"]);

        upstream.remove_feed("a");
        assert_eq!(agg.orchestrate(&sources).await.len(), 3);
        assert_eq!(upstream.total_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_orchestrate_fetches_sources_concurrently() {
        let upstream = Arc::new(FakeUpstream::with_delay(Duration::from_secs(5)));
        upstream.set_feed("a", vec![entry("a1", "")]);
        upstream.set_feed("b", vec![entry("b1", "")]);
        let agg = aggregator(upstream.clone());

        let started = tokio::time::Instant::now();
        let merged = agg.orchestrate(agg.registry().all()).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        let titles: Vec<&str> = merged.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "b1"]);
    }

    #[tokio::test]
    async fn test_upstream_timeout_is_empty_and_cached() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                held.push(socket);
            }
        });

        let mut config = AppConfig::default();
        config.sync.request_timeout_secs = 1;
        config.sync.max_retries = 0;
        let source = Source::new("slow", "Slow", format!("http://{}/rss", addr));
        let fetcher = FeedFetcher::new(&config).unwrap();
        let agg = NewsAggregator::new(SourceRegistry::new(vec![source.clone()]), Arc::new(fetcher), &config);

        assert!(agg.fetch_feed(&source).await.is_empty());

        let started = std::time::Instant::now();
        assert!(agg.fetch_feed(&source).await.is_empty());
        assert!(started.elapsed() < Duration::from_millis(500));
        assert!(accepted.load(Ordering::SeqCst) <= 1);

        let status = agg.cache_status().await;
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].items, 0);
        assert!(status[0].fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_news_merges_sorts_and_limits() {
        let upstream = Arc::new(FakeUpstream::default());
        upstream.set_feed(
            "a",
            vec![
                entry("a-old", "Mon, 01 Jan 2024 10:00:00 GMT"),
                entry("a-undated", "not a date"),
                entry("a-new", "Wed, 03 Jan 2024 10:00:00 GMT"),
            ],
        );
        upstream.set_feed(
            "b",
            vec![
                entry("b-mid", "Tue, 02 Jan 2024 10:00:00 GMT"),
                entry("b-newest", "Thu, 04 Jan 2024 10:00:00 GMT"),
            ],
        );
        let agg = aggregator(upstream.clone());

        let request = NewsRequest {
            limit: Some(4),
            ..Default::default()
        };
        let items = agg.news(&request).await;
        let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["b-newest", "a-new", "b-mid", "a-old"]);

        let all = agg
            .news(&NewsRequest {
                limit: Some(10),
                ..Default::default()
            })
            .await;
        assert_eq!(all.len(), 5);
        assert_eq!(all[4].title, "a-undated");
        assert_eq!(all[4].published_display, "not a date");
        assert_eq!(all[4].published_timestamp, 0);
        assert_eq!(upstream.calls("a"), 1);
        assert_eq!(upstream.calls("b"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_news_source_selection() {
        let upstream = Arc::new(FakeUpstream::default());
        upstream.set_feed("a", vec![entry("a1", "")]);
        upstream.set_feed("b", vec![entry("b1", "")]);
        let agg = aggregator(upstream.clone());

        let only_b = agg
            .news(&NewsRequest {
                sources: vec!["b".to_string()],
                ..Default::default()
            })
            .await;
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].source_name, "Source B");
        assert_eq!(upstream.calls("a"), 0);

        let unknown = agg
            .news(&NewsRequest {
                sources: vec!["nope".to_string()],
                ..Default::default()
            })
            .await;
        assert_eq!(unknown.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_news_keywords_and_limit_bounds() {
        let upstream = Arc::new(FakeUpstream::default());
        let entries: Vec<RawEntry> = (0..20).map(|i| entry(&format!("story{}", i), "")).collect();
        upstream.set_feed("a", entries.clone());
        upstream.set_feed("b", entries);
        let agg = aggregator(upstream);

        let many = agg
            .news(&NewsRequest {
                limit: Some(100),
                ..Default::default()
            })
            .await;
        assert_eq!(many.len(), 40);

        let default_limit = agg.news(&NewsRequest::default()).await;
        assert_eq!(default_limit.len(), 20);

        let matched = agg
            .news(&NewsRequest {
                keywords: Some("STORY1".to_string()),
                limit: Some(50),
                ..Default::default()
            })
            .await;
        // story1 and story10..story19, from both sources
        assert_eq!(matched.len(), 22);

        let none = agg
            .news(&NewsRequest {
                limit: Some(0),
                ..Default::default()
            })
            .await;
        assert!(none.is_empty());
    }
}
