use scraper::ElementRef;

use super::build_record;
use crate::models::{Gender, ListingFields, ProductRecord, StoreId};
use crate::parsers::dom::{self, nearest_ancestor};
use crate::parsers::matcher::Matcher;
use crate::parsers::traits::{PageLayout, SourceParser};
use crate::stores::ICONIC_URL;
use crate::utils::text::{absolute_url, element_text};
use crate::{AppError, Result};

/// Every product card on The Iconic carries exactly one brand label, so the
/// labels themselves are the containers.
const CONTAINERS: &[Matcher] = &[
    Matcher::Css("span.brand"),
    Matcher::class_contains(Some("span"), &["brand"]),
];

const NAME: Matcher = Matcher::Css("span.name");
const FINAL_PRICE: Matcher = Matcher::class_contains(Some("span"), &["price", "final"]).exact_case();
const ORIGINAL_PRICE: Matcher =
    Matcher::class_contains(Some("span"), &["price", "original"]).exact_case();

const LAYOUT: PageLayout = PageLayout {
    store: StoreId::Iconic,
    containers: CONTAINERS,
    limit: None,
};

pub struct IconicParser {
    base_url: String,
}

impl IconicParser {
    pub fn new() -> Self {
        Self::with_base_url(ICONIC_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn extract(&self, brand: ElementRef<'_>, category: &str) -> Result<ProductRecord> {
        let brand_name = element_text(brand);
        if brand_name.is_empty() {
            return Err(AppError::not_found("span.brand text"));
        }

        let link = nearest_ancestor(brand, "a").ok_or_else(|| AppError::not_found("a"))?;
        let href = link
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|href| !href.is_empty() && *href != "#")
            .ok_or_else(|| AppError::not_found("a[href]"))?;

        let name = dom::text_of(link, &NAME).ok_or_else(|| AppError::not_found("span.name"))?;

        // Prices sit beside the link rather than inside it.
        let card = link.parent().and_then(ElementRef::wrap).unwrap_or(link);
        let current = dom::text_of(card, &FINAL_PRICE)
            .ok_or_else(|| AppError::not_found("span.price.final"))?;
        let original = dom::text_of(card, &ORIGINAL_PRICE).unwrap_or_default();

        build_record(
            StoreId::Iconic,
            Gender::Men,
            category,
            ListingFields {
                brand: Some(brand_name),
                name,
                current_price: current,
                original_price: original,
                url: absolute_url(&self.base_url, href),
            },
        )
    }
}

impl Default for IconicParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for IconicParser {
    fn store(&self) -> StoreId {
        StoreId::Iconic
    }

    fn description(&self) -> &str {
        "Brand-label anchored product cards with final/original price spans"
    }

    fn parse(&self, markup: &str, category: &str) -> Vec<ProductRecord> {
        LAYOUT.extract(markup, category, |brand| self.extract(brand, category))
    }
}
