use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::feed::FeedItem;

/// Items of one source as of its last fetch
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub source_key: String,
    pub fetched_at: DateTime<Utc>,
    fetched_instant: Instant,
    pub items: Vec<FeedItem>,
}

impl CacheEntry {
    fn new(source_key: &str, items: Vec<FeedItem>) -> Self {
        Self {
            source_key: source_key.to_string(),
            fetched_at: Utc::now(),
            fetched_instant: Instant::now(),
            items,
        }
    }

    /// Fresh while less than `ttl` has passed since the fetch
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_instant.elapsed() < ttl
    }
}

/// Cache state of one source, as reported by the API
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    pub key: String,
    pub fetched_at: DateTime<Utc>,
    pub items: usize,
    pub fresh: bool,
}

/// Per-source memo of normalized items with a fixed time to live.
///
/// There is at most one entry per source key. A stale entry stays in place
/// until the next fetch of that source replaces it wholesale.
pub struct FeedCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// One lock per source key, held while that source is being fetched
    fetch_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            fetch_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Items of `key` if its entry is still fresh
    pub async fn get_fresh(&self, key: &str) -> Option<Vec<FeedItem>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .map(|entry| entry.items.clone())
    }

    /// Replace whatever is cached for `key`
    pub async fn store(&self, key: &str, items: Vec<FeedItem>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(key, items));
    }

    /// Lock serializing fetches of one source key
    pub async fn fetch_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fetch_locks.lock().await;
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Status of every cached source, sorted by key
    pub async fn status(&self) -> Vec<CacheStatus> {
        let entries = self.entries.read().await;
        let mut status: Vec<CacheStatus> = entries
            .values()
            .map(|entry| CacheStatus {
                key: entry.source_key.clone(),
                fetched_at: entry.fetched_at,
                items: entry.items.len(),
                fresh: entry.is_fresh(self.ttl),
            })
            .collect();
        status.sort_by(|a, b| a.key.cmp(&b.key));
        status
    }
}
