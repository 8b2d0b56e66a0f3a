// Storefront parser implementations
pub mod asos;
pub mod davidjones;
pub mod iconic;
pub mod jbhifi;
pub mod myer;

pub use asos::AsosParser;
pub use davidjones::DavidJonesParser;
pub use iconic::IconicParser;
pub use jbhifi::JbHifiParser;
pub use myer::MyerParser;

use scraper::ElementRef;

use crate::models::{Gender, ListingFields, ProductRecord, StoreId};
use crate::parsers::dom::{self, ScannedPrices};
use crate::parsers::matcher::{first_of, Matcher};
use crate::utils::text::element_text;
use crate::{AppError, Result};

/// Normalizes extracted fields, failing the container when the listing has
/// no name or no usable current price.
pub(crate) fn build_record(
    store: StoreId,
    gender: Gender,
    category: &str,
    fields: ListingFields,
) -> Result<ProductRecord> {
    ProductRecord::from_listing(store, gender, category, fields).ok_or_else(|| AppError::Parse {
        message: "listing has no name or current price".to_string(),
    })
}

/// Keeps only listings with a positive discount. A page whose listings were
/// all full price is reported at warn level, like any other empty page.
pub(crate) fn retain_markdowns(
    store: StoreId,
    category: &str,
    mut records: Vec<ProductRecord>,
) -> Vec<ProductRecord> {
    let before = records.len();
    records.retain(ProductRecord::has_markdown);

    let dropped = before - records.len();
    if dropped > 0 {
        tracing::debug!("{}/{}: dropped {} listings without a markdown", store, category, dropped);
        if records.is_empty() {
            tracing::warn!("{}/{}: page yielded no marked-down products", store, category);
        }
    }
    records
}

/// Keyword-driven price lookup shared by the stores whose markup labels
/// prices loosely (`sale`, `now`, `was`, `rrp` ...).
pub(crate) struct PriceRules {
    pub sale: &'static [Matcher],
    pub was: &'static [Matcher],
    /// Generic price element used when no sale element is labelled.
    pub fallback: &'static [Matcher],
}

impl PriceRules {
    /// Resolves `(current, original)` display strings inside `root`.
    ///
    /// Labelled sale/was elements win. Without a sale element the generic
    /// price element becomes the current price, and without either the raw
    /// text is scanned for dollar amounts.
    pub fn resolve(&self, root: ElementRef<'_>) -> Result<(String, String)> {
        let was = first_of(root, self.was).map(element_text);

        if let Some(sale) = first_of(root, self.sale).or_else(|| first_of(root, self.fallback)) {
            return Ok((element_text(sale), was.unwrap_or_default()));
        }

        match dom::scan_prices(root) {
            Some(ScannedPrices { current, original }) => {
                Ok((current, was.or(original).unwrap_or_default()))
            }
            None => Err(AppError::not_found("price")),
        }
    }
}
