use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::cache::ResultCache;
use crate::models::ProductRecord;
use crate::pipeline::DealPipeline;

/// The JSON document served for one scrape request.
///
/// Successful documents carry `cached` plus either `cache_age_seconds` or
/// `scrape_time_seconds`; failures carry only `success` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ProductRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_time_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResponse {
    fn success(items: Vec<ProductRecord>) -> Self {
        Self {
            success: true,
            total: Some(items.len()),
            items: Some(items),
            timestamp: Some(Utc::now()),
            cached: None,
            cache_age_seconds: None,
            scrape_time_seconds: None,
            error: None,
        }
    }

    pub fn cached(items: Vec<ProductRecord>, age: Duration) -> Self {
        Self {
            cached: Some(true),
            cache_age_seconds: Some(age.as_secs_f64().round() as u64),
            ..Self::success(items)
        }
    }

    pub fn fresh(items: Vec<ProductRecord>, took: Duration) -> Self {
        Self {
            cached: Some(false),
            scrape_time_seconds: Some((took.as_secs_f64() * 100.0).round() / 100.0),
            ..Self::success(items)
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            items: None,
            total: None,
            timestamp: None,
            cached: None,
            cache_age_seconds: None,
            scrape_time_seconds: None,
            error: Some(error.into()),
        }
    }
}

/// Serves deal batches, reusing the last one while it is fresh.
pub struct DealService {
    pipeline: Arc<DealPipeline>,
    cache: ResultCache,
    /// Serializes refreshes so concurrent misses trigger one batch.
    refresh: Mutex<()>,
}

impl DealService {
    pub fn new(pipeline: Arc<DealPipeline>, cache: ResultCache) -> Self {
        Self {
            pipeline,
            cache,
            refresh: Mutex::new(()),
        }
    }

    pub fn pipeline(&self) -> &DealPipeline {
        &self.pipeline
    }

    /// Returns the cached batch when one is fresh, otherwise runs a new
    /// batch and caches it. Never fails; a batch that panics becomes a
    /// failure document.
    ///
    /// Empty batches are returned but never cached.
    pub async fn scrape(&self) -> ScrapeResponse {
        if let Some(response) = self.from_cache().await {
            return response;
        }

        let _refresh = self.refresh.lock().await;
        if let Some(response) = self.from_cache().await {
            return response;
        }

        tracing::info!("Cache miss, scraping fresh data");
        let started = Instant::now();
        let pipeline = Arc::clone(&self.pipeline);

        match tokio::spawn(async move { pipeline.run().await }).await {
            Ok(items) => {
                let took = started.elapsed();
                tracing::info!(
                    "Scraping complete: {} items in {:.2}s",
                    items.len(),
                    took.as_secs_f64()
                );
                if !items.is_empty() {
                    self.cache.put(items.clone()).await;
                }
                ScrapeResponse::fresh(items, took)
            }
            Err(e) => {
                tracing::error!("Scrape batch aborted: {}", e);
                ScrapeResponse::failure(format!("scrape batch aborted: {}", e))
            }
        }
    }

    async fn from_cache(&self) -> Option<ScrapeResponse> {
        let (items, age) = self.cache.get().await?;
        tracing::info!("Serving cached data ({}s old)", age.as_secs());
        Some(ScrapeResponse::cached(items, age))
    }
}
