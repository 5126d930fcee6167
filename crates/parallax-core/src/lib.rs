pub mod carousel;
pub mod config;
pub mod error;
pub mod photo;

pub use carousel::{pad_entries, CarouselEntry, CarouselLayout};
pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
pub use photo::{ImageFetcher, ImageRecord, SearchRequest};
