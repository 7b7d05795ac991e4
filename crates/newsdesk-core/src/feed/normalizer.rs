use chrono::{DateTime, FixedOffset, NaiveDateTime};

use super::markup::clean_markup;
use super::models::{FeedItem, RawEntry};
use super::summarizer::{summarize, DEFAULT_SENTENCES};

/// Entries taken from a single feed response
pub const MAX_ENTRIES_PER_FEED: usize = 20;

const UNTITLED: &str = "Untitled";

/// RFC 2822 layouts without a zone; such dates are read as UTC
const ZONELESS_FORMATS: &[&str] = &[
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%a, %d %b %Y %H:%M",
    "%d %b %Y %H:%M",
];

/// Convert a raw feed entry into a [`FeedItem`]
pub fn normalize(raw: &RawEntry, source_name: &str) -> FeedItem {
    let title = raw
        .title
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(UNTITLED)
        .to_string();

    let body = raw
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(raw.description.as_deref())
        .unwrap_or("");
    let summary = summarize(&clean_markup(body), DEFAULT_SENTENCES);

    let published_raw = raw
        .published
        .as_deref()
        .filter(|p| !p.is_empty())
        .or(raw.updated.as_deref())
        .unwrap_or("");

    let (published_display, published_timestamp) = match parse_published(published_raw) {
        Some(date) => (date.to_rfc3339(), date.timestamp()),
        None => {
            if !published_raw.is_empty() {
                tracing::debug!("Unrecognized date '{}' in '{}'", published_raw, title);
            }
            (published_raw.to_string(), 0)
        }
    };

    FeedItem {
        title,
        summary,
        link: raw.link.clone().unwrap_or_default(),
        published_display,
        published_timestamp,
        source_name: source_name.to_string(),
    }
}

/// Normalize the leading entries of a feed, dropping the rest
pub fn normalize_entries(entries: &[RawEntry], source_name: &str, max_entries: usize) -> Vec<FeedItem> {
    entries
        .iter()
        .take(max_entries)
        .map(|entry| normalize(entry, source_name))
        .collect()
}

/// Parse a syndication date.
///
/// RFC 2822 is the expected layout. Dates without a zone or with a `UTC`
/// zone name are taken as UTC, and a weekday that does not match the date is
/// ignored. RFC 3339 (used by Atom) is accepted as well.
pub fn parse_published(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(date) = parse_rfc2822(raw) {
        return Some(date);
    }

    // "UTC" and "UT" are common zone names that RFC 2822 parsing rejects
    if let Some(head) = raw.strip_suffix(" UTC").or_else(|| raw.strip_suffix(" UT")) {
        if let Some(date) = parse_rfc2822(&format!("{} +0000", head)) {
            return Some(date);
        }
    }

    for format in ZONELESS_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    DateTime::parse_from_rfc3339(raw).ok()
}

fn parse_rfc2822(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(raw).ok().or_else(|| {
        // Some feeds carry a wrong weekday, retry without it
        let (_, rest) = raw.split_once(',')?;
        DateTime::parse_from_rfc2822(rest.trim()).ok()
    })
}
