pub mod aggregator;
pub mod config;
pub mod error;
pub mod feed;

pub use aggregator::{NewsAggregator, NewsRequest};
pub use config::AppConfig;
pub use error::{Error, Result};
