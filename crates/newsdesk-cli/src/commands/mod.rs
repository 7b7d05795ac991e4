pub mod news;
pub mod serve;
pub mod sources;
