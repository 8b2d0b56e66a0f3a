use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::aggregator::Aggregator;
use crate::config::ScraperConfig;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::models::{ProductRecord, StoreId};
use crate::parsers::ParserRegistry;
use crate::stores::StoreCatalog;
use crate::tasks::build_tasks;
use crate::Result;

/// Progress of one batch. `Fetching` is the only stage in which tasks
/// advance independently of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    TasksBuilt,
    Fetching,
    Parsing,
    Aggregated,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::TasksBuilt => "tasks_built",
            PipelineStage::Fetching => "fetching",
            PipelineStage::Parsing => "parsing",
            PipelineStage::Aggregated => "aggregated",
            PipelineStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// One end-to-end deal collection: build tasks, fetch every page, parse and
/// rank the results.
///
/// A batch never fails. Fetch and parse problems are logged and shrink the
/// result, possibly to nothing.
pub struct DealPipeline {
    fetcher: Arc<dyn PageFetcher>,
    aggregator: Aggregator,
    catalog: StoreCatalog,
    enabled: Vec<StoreId>,
    batch_delay: Duration,
    /// When the previous batch finished. Held for the whole batch so that
    /// batches never overlap.
    last_batch: Mutex<Option<Instant>>,
}

impl DealPipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        registry: Arc<ParserRegistry>,
        catalog: StoreCatalog,
        enabled: Vec<StoreId>,
    ) -> Self {
        Self {
            fetcher,
            aggregator: Aggregator::new(registry),
            catalog,
            enabled,
            batch_delay: Duration::ZERO,
            last_batch: Mutex::new(None),
        }
    }

    /// Production wiring: HTTP fetcher plus a parser for every catalog store.
    /// Fails if an enabled store has no parser.
    pub fn from_config(config: &ScraperConfig, catalog: StoreCatalog) -> Result<Self> {
        let registry = ParserRegistry::for_catalog(&catalog);
        registry.ensure_covers(&config.enabled_stores)?;

        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::new(
            Arc::new(fetcher),
            Arc::new(registry),
            catalog,
            config.enabled_stores.clone(),
        )
        .with_batch_delay(Duration::from_millis(config.batch_delay_ms)))
    }

    /// Minimum pause between the end of one batch and the start of the next.
    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn enabled_stores(&self) -> &[StoreId] {
        &self.enabled
    }

    /// Runs a batch over every enabled store.
    pub async fn run(&self) -> Vec<ProductRecord> {
        self.run_for(&self.enabled).await
    }

    /// Runs a batch over `stores` only.
    pub async fn run_for(&self, stores: &[StoreId]) -> Vec<ProductRecord> {
        let batch_id = Uuid::new_v4();
        self.run_batch(stores)
            .instrument(tracing::info_span!("batch", %batch_id))
            .await
    }

    async fn run_batch(&self, stores: &[StoreId]) -> Vec<ProductRecord> {
        let mut last_batch = self.last_batch.lock().await;
        if let Some(finished) = *last_batch {
            let elapsed = finished.elapsed();
            if elapsed < self.batch_delay {
                let wait = self.batch_delay - elapsed;
                tracing::debug!("Waiting {}ms before next batch", wait.as_millis());
                tokio::time::sleep(wait).await;
            }
        }

        let started = Instant::now();
        stage(PipelineStage::Idle);

        let tasks = build_tasks(stores, &self.catalog);
        stage(PipelineStage::TasksBuilt);
        tracing::info!("Built {} fetch tasks for {} stores", tasks.len(), stores.len());

        stage(PipelineStage::Fetching);
        let results = self.fetcher.fetch_all(&tasks).await;
        let failed = results.iter().filter(|r| r.is_failure()).count();
        tracing::info!("Fetched {} pages ({} failed)", results.len() - failed, failed);

        stage(PipelineStage::Parsing);
        let records = self.aggregator.aggregate(results);
        stage(PipelineStage::Aggregated);

        let elapsed = started.elapsed();
        metrics::histogram!("deals_batch_seconds").record(elapsed.as_secs_f64());
        tracing::info!(
            "Collected {} discounted items in {:.2}s",
            records.len(),
            elapsed.as_secs_f64()
        );
        stage(PipelineStage::Done);

        *last_batch = Some(Instant::now());
        records
    }
}

fn stage(next: PipelineStage) {
    tracing::debug!("Pipeline stage: {}", next);
}
