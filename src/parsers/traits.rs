use scraper::{ElementRef, Html};

use crate::models::{ProductRecord, StoreId};
use crate::parsers::matcher::{first_non_empty, Matcher};
use crate::Result;

/// A storefront-specific extraction strategy.
///
/// Implementations are stateless apart from configuration and never fail:
/// a page that cannot be understood yields an empty list.
pub trait SourceParser: Send + Sync {
    fn store(&self) -> StoreId;
    fn description(&self) -> &str;

    /// Extracts every recognisable product listing from one category page.
    fn parse(&self, markup: &str, category: &str) -> Vec<ProductRecord>;
}

/// How a store's listing page is carved into product containers.
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub store: StoreId,
    /// Container discovery cascade, primary selector first.
    pub containers: &'static [Matcher],
    /// Maximum number of containers considered per page.
    pub limit: Option<usize>,
}

impl PageLayout {
    /// Finds the product containers on a page and runs `extract` on each.
    ///
    /// A container whose extraction fails is logged and skipped; the rest of
    /// the page is still processed. A page with no containers, or none that
    /// produced a record, is logged and yields an empty list.
    pub fn extract<F>(&self, markup: &str, category: &str, extract: F) -> Vec<ProductRecord>
    where
        F: Fn(ElementRef<'_>) -> Result<ProductRecord>,
    {
        if markup.trim().is_empty() {
            tracing::warn!("{}/{}: empty page body", self.store, category);
            return Vec::new();
        }

        let document = Html::parse_document(markup);
        let Some((matcher_index, containers)) =
            first_non_empty(document.root_element(), self.containers)
        else {
            tracing::warn!(
                "{}/{}: no product containers found after {} selectors",
                self.store,
                category,
                self.containers.len()
            );
            return Vec::new();
        };

        if matcher_index > 0 {
            tracing::debug!(
                "{}/{}: primary selector missed, fallback #{} matched {} containers",
                self.store,
                category,
                matcher_index,
                containers.len()
            );
        }

        let limit = self.limit.unwrap_or(usize::MAX);
        let mut records = Vec::new();

        for (position, container) in containers.into_iter().take(limit).enumerate() {
            match extract(container) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "{}/{}: skipping product container #{}: {}",
                        self.store,
                        category,
                        position,
                        e
                    );
                }
            }
        }

        if records.is_empty() {
            tracing::warn!("{}/{}: page yielded no products", self.store, category);
        }

        records
    }
}
