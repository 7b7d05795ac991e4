use super::models::Source;

/// Built-in feeds as `(key, name, url)`
const BUILTIN_SOURCES: &[(&str, &str, &str)] = &[
    ("bbc", "BBC World", "http://feeds.bbci.co.uk/news/world/rss.xml"),
    (
        "nytimes",
        "The New York Times",
        "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
    ),
    ("meduza", "Meduza", "https://meduza.io/rss/en/all"),
    (
        "reuters",
        "Reuters World News",
        "http://feeds.reuters.com/Reuters/worldNews",
    ),
];

/// Ordered, immutable set of the sources this process serves
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl SourceRegistry {
    /// Registry holding the compiled-in sources
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_SOURCES
                .iter()
                .map(|(key, name, url)| Source::new(*key, *name, *url))
                .collect(),
        )
    }

    pub fn new(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    /// All sources in definition order
    pub fn all(&self) -> &[Source] {
        &self.sources
    }

    pub fn get(&self, key: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.key == key)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Select the sources to serve for a request.
    ///
    /// Known keys are returned in registry order, not request order. Unknown
    /// keys are skipped; when nothing matches (or nothing was requested) the
    /// whole registry is returned.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Vec<Source> {
        if requested.is_empty() {
            return self.sources.clone();
        }

        let resolved: Vec<Source> = self
            .sources
            .iter()
            .filter(|source| requested.iter().any(|key| key.as_ref() == source.key))
            .cloned()
            .collect();

        if resolved.is_empty() {
            tracing::debug!("No requested source is registered, serving all sources");
            self.sources.clone()
        } else {
            resolved
        }
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Split a comma-separated `sources` parameter into trimmed, non-empty keys
pub fn parse_source_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
