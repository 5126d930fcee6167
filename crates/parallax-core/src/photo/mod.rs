mod fetcher;
mod models;

pub use fetcher::{parse_search_response, ImageFetcher};
pub use models::{ImageRecord, SearchRequest};
