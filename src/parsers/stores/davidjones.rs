use scraper::ElementRef;

use super::{build_record, retain_markdowns};
use crate::models::{Gender, ListingFields, ProductRecord, StoreId};
use crate::parsers::dom;
use crate::parsers::matcher::{first_of, Matcher};
use crate::parsers::traits::{PageLayout, SourceParser};
use crate::stores::DAVIDJONES_URL;
use crate::utils::text::{absolute_url, element_text};
use crate::{AppError, Result};

// Class names are CSS-module hashes (`ProductCard_root__a1b2c`), so only
// the stable prefix is matched.
const CONTAINERS: &[Matcher] = &[
    Matcher::class_contains(Some("article"), &["ProductCard_root"]).exact_case(),
    Matcher::class_contains(Some("div"), &["ProductCard_root"]).exact_case(),
];

const BRAND: Matcher = Matcher::class_contains(Some("p"), &["ProductCard_brand"]).exact_case();
const NAME: Matcher = Matcher::class_contains(Some("h2"), &["ProductCard_name"]).exact_case();

const SALE_PRICE: &[Matcher] = &[
    Matcher::class_contains(None, &["Price_salePrice"]).exact_case(),
    Matcher::class_contains(None, &["Price_price"])
        .exact_case()
        .excluding(&["inactive"]),
];
const WAS_PRICE: Matcher = Matcher::class_contains(None, &["Price_inactivePrice"]).exact_case();

/// Product pages live under this path; anything else is a promo tile.
const PRODUCT_PATH: &str = "/product/";

const LAYOUT: PageLayout = PageLayout {
    store: StoreId::DavidJones,
    containers: CONTAINERS,
    limit: Some(60),
};

pub struct DavidJonesParser {
    base_url: String,
}

impl DavidJonesParser {
    pub fn new() -> Self {
        Self::with_base_url(DAVIDJONES_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn extract(&self, product: ElementRef<'_>, category: &str) -> Result<ProductRecord> {
        let (_, href) = dom::first_link(product).ok_or_else(|| AppError::not_found("a[href]"))?;
        if !href.starts_with(PRODUCT_PATH) {
            return Err(AppError::Parse {
                message: format!("'{}' is not a product link", href),
            });
        }

        let name = dom::text_of(product, &NAME)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::not_found("h2.ProductCard_name"))?;

        let current = first_of(product, SALE_PRICE)
            .map(element_text)
            .ok_or_else(|| AppError::not_found("Price_salePrice"))?;
        let original = dom::text_of(product, &WAS_PRICE).unwrap_or_default();

        build_record(
            StoreId::DavidJones,
            Gender::Men,
            category,
            ListingFields {
                brand: dom::text_of(product, &BRAND),
                name,
                current_price: current,
                original_price: original,
                url: absolute_url(&self.base_url, href),
            },
        )
    }
}

impl Default for DavidJonesParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for DavidJonesParser {
    fn store(&self) -> StoreId {
        StoreId::DavidJones
    }

    fn description(&self) -> &str {
        "ProductCard articles with sale/inactive price classes, marked-down items only"
    }

    fn parse(&self, markup: &str, category: &str) -> Vec<ProductRecord> {
        let records = LAYOUT.extract(markup, category, |product| self.extract(product, category));
        retain_markdowns(StoreId::DavidJones, category, records)
    }
}
