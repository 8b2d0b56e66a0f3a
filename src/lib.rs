pub mod aggregator;
pub mod cache;
pub mod config;
pub mod fetcher;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod price;
pub mod service;
pub mod stores;
pub mod tasks;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use cache::{Clock, ManualClock, ResultCache, SystemClock};
pub use config::AppConfig;
pub use fetcher::{HttpFetcher, PageFetcher};
pub use models::{FetchFailure, FetchResult, FetchTask, Gender, ProductRecord, StoreId};
pub use parsers::{ParserRegistry, SourceParser};
pub use pipeline::{DealPipeline, PipelineStage};
pub use service::{DealService, ScrapeResponse};
pub use stores::StoreCatalog;
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
