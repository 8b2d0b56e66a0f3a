use scraper::ElementRef;

use super::{build_record, PriceRules};
use crate::models::{Gender, ListingFields, ProductRecord, StoreId};
use crate::parsers::dom;
use crate::parsers::matcher::Matcher;
use crate::parsers::traits::{PageLayout, SourceParser};
use crate::stores::MYER_URL;
use crate::utils::text::{absolute_url, element_text};
use crate::{AppError, Result};

const CONTAINERS: &[Matcher] = &[
    Matcher::class_contains(Some("div"), &["product", "tile"]),
    Matcher::class_contains(Some("article"), &["product"]),
];

const BRAND: Matcher = Matcher::class_contains(None, &["brand"]);
const NAME: Matcher = Matcher::class_contains_any(None, &["name", "title"]);

const PRICES: PriceRules = PriceRules {
    sale: &[Matcher::class_contains_any(None, &["sale", "now"])],
    was: &[Matcher::class_contains_any(None, &["was", "rrp"])],
    fallback: &[Matcher::class_contains(None, &["price"])],
};

const LAYOUT: PageLayout = PageLayout {
    store: StoreId::Myer,
    containers: CONTAINERS,
    limit: Some(50),
};

pub struct MyerParser {
    base_url: String,
}

impl MyerParser {
    pub fn new() -> Self {
        Self::with_base_url(MYER_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn extract(&self, product: ElementRef<'_>, category: &str) -> Result<ProductRecord> {
        let (link, href) = dom::first_link(product).ok_or_else(|| AppError::not_found("a[href]"))?;

        let brand = dom::text_of(product, &BRAND);
        let name = dom::text_of(product, &NAME).unwrap_or_else(|| element_text(link));
        let (current, original) = PRICES.resolve(product)?;

        build_record(
            StoreId::Myer,
            Gender::Men,
            category,
            ListingFields {
                brand,
                name,
                current_price: current,
                original_price: original,
                url: absolute_url(&self.base_url, href),
            },
        )
    }
}

impl Default for MyerParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for MyerParser {
    fn store(&self) -> StoreId {
        StoreId::Myer
    }

    fn description(&self) -> &str {
        "Product tiles with sale/now and was/RRP price labels"
    }

    fn parse(&self, markup: &str, category: &str) -> Vec<ProductRecord> {
        LAYOUT.extract(markup, category, |product| self.extract(product, category))
    }
}
