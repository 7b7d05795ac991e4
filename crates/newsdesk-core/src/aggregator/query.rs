use crate::feed::FeedItem;

/// Items returned when a request does not ask for a limit
pub const DEFAULT_LIMIT: usize = 20;

/// Largest number of items a single request can receive
pub const MAX_LIMIT: usize = 50;

/// Lowercase whitespace-separated tokens of a keyword query
pub fn keyword_tokens(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Check that every token occurs in the item title or summary, ignoring case
pub fn matches_all(item: &FeedItem, tokens: &[String]) -> bool {
    let haystack = format!("{} {}", item.title, item.summary).to_lowercase();
    tokens.iter().all(|token| haystack.contains(token.as_str()))
}

/// Filter, rank and cut a merged item list.
///
/// Items must contain every keyword of `keyword_query`. The rest are ordered
/// newest first with undated items last; equal timestamps keep their input
/// order. `limit` is capped at `max_limit` and a non-positive limit yields
/// nothing.
pub fn query_items(
    mut items: Vec<FeedItem>,
    keyword_query: Option<&str>,
    limit: i64,
    max_limit: usize,
) -> Vec<FeedItem> {
    let limit = usize::try_from(limit).unwrap_or(0).min(max_limit);
    if limit == 0 {
        return Vec::new();
    }

    let tokens = keyword_query.map(keyword_tokens).unwrap_or_default();
    if !tokens.is_empty() {
        items.retain(|item| matches_all(item, &tokens));
    }

    // sort_by is stable
    items.sort_by(|a, b| recency_key(b).cmp(&recency_key(a)));
    items.truncate(limit);
    items
}

fn recency_key(item: &FeedItem) -> (bool, i64) {
    (item.is_dated(), item.published_timestamp)
}
