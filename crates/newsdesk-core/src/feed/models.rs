use serde::{Deserialize, Serialize};

/// A registered news source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Identifier used in the `sources` query parameter
    pub key: String,
    /// Display name attached to every item of this source
    pub name: String,
    /// Feed URL
    pub url: String,
}

impl Source {
    pub fn new(key: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An entry as found in a feed document, before normalization.
///
/// Every field holds the raw text of the element, untouched. Dates in
/// particular are kept as strings so that the normalizer can decide how to
/// interpret them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
}

/// A normalized news item as served by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub summary: String,
    pub link: String,
    /// ISO-8601 date when the entry date could be parsed, the raw date string otherwise
    #[serde(rename = "published")]
    pub published_display: String,
    /// Seconds since the Unix epoch, 0 when the entry has no usable date
    #[serde(rename = "timestamp")]
    pub published_timestamp: i64,
    #[serde(rename = "source")]
    pub source_name: String,
}

impl FeedItem {
    /// Check if the item carries a parsed publication date
    pub fn is_dated(&self) -> bool {
        self.published_timestamp != 0
    }
}
