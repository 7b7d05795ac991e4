mod fetcher;
mod markup;
mod models;
mod normalizer;
mod parser;
mod registry;
mod summarizer;

pub use fetcher::{FeedFetcher, FeedUpstream};
pub use markup::clean_markup;
pub use models::{FeedItem, RawEntry, Source};
pub use normalizer::{normalize, normalize_entries, parse_published, MAX_ENTRIES_PER_FEED};
pub use parser::parse_entries;
pub use registry::{parse_source_keys, SourceRegistry};
pub use summarizer::{summarize, DEFAULT_SENTENCES};
