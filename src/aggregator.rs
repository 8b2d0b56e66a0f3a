use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::{FetchResult, ProductRecord, StoreId};
use crate::parsers::ParserRegistry;

/// Turns a batch of fetch results into one ranked list of records.
pub struct Aggregator {
    registry: Arc<ParserRegistry>,
}

impl Aggregator {
    pub fn new(registry: Arc<ParserRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Parses every successful page with its store's parser, merges the
    /// records, and sorts them by discount, largest first.
    ///
    /// Failed fetches contribute nothing. Records with equal discounts keep
    /// the order in which their pages appear in `results`.
    pub fn aggregate(&self, results: Vec<FetchResult>) -> Vec<ProductRecord> {
        let mut records = Vec::new();
        let mut per_store: BTreeMap<StoreId, usize> = BTreeMap::new();

        for result in results {
            let task = result.task;
            let markup = match result.outcome {
                Ok(markup) => markup,
                Err(failure) => {
                    tracing::debug!("{}/{}: no page to parse ({})", task.store, task.category, failure);
                    continue;
                }
            };

            let parsed = match self.registry.parse(task.store, &markup, &task.category) {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::error!("{}/{}: {}", task.store, task.category, e);
                    continue;
                }
            };

            if !parsed.is_empty() {
                tracing::info!("{} {}: {} items", task.store.display_name(), task.category, parsed.len());
            }

            *per_store.entry(task.store).or_default() += parsed.len();
            records.extend(parsed);
        }

        for (store, count) in &per_store {
            tracing::info!("{}: {} items total", store.display_name(), count);
            metrics::counter!("deals_records_total", "store" => store.as_str()).increment(*count as u64);
        }

        sort_by_discount(&mut records);
        records
    }
}

/// Stable descending sort on `discount_percent`.
pub fn sort_by_discount(records: &mut [ProductRecord]) {
    records.sort_by(|a, b| {
        b.discount_percent
            .partial_cmp(&a.discount_percent)
            .unwrap_or(Ordering::Equal)
    });
}
