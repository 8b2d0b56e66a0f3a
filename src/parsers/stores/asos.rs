use scraper::ElementRef;

use super::{build_record, PriceRules};
use crate::models::{Gender, ListingFields, ProductRecord, StoreId};
use crate::parsers::dom;
use crate::parsers::matcher::{first_of, Matcher};
use crate::parsers::traits::{PageLayout, SourceParser};
use crate::stores::ASOS_URL;
use crate::utils::text::{absolute_url, element_text};
use crate::{AppError, Result};

const CONTAINERS: &[Matcher] = &[
    Matcher::Css(r#"article[data-auto-id="productTile"]"#),
    Matcher::class_contains(Some("div"), &["productTile"]).exact_case(),
];

const BRAND: &[Matcher] = &[
    Matcher::Css("h2"),
    Matcher::class_contains(Some("span"), &["brand"]),
];

const NAME: &[Matcher] = &[
    Matcher::Css("p"),
    Matcher::class_contains(Some("div"), &["title"]),
];

const PRICE_BOX: Matcher = Matcher::class_contains(Some("div"), &["price"]);

const PRICES: PriceRules = PriceRules {
    sale: &[Matcher::class_contains_any(Some("span"), &["sale", "current"])],
    was: &[Matcher::class_contains_any(Some("span"), &["rrp", "previous"])],
    fallback: &[],
};

const LAYOUT: PageLayout = PageLayout {
    store: StoreId::Asos,
    containers: CONTAINERS,
    limit: Some(50),
};

pub struct AsosParser {
    base_url: String,
}

impl AsosParser {
    pub fn new() -> Self {
        Self::with_base_url(ASOS_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn extract(&self, product: ElementRef<'_>, category: &str) -> Result<ProductRecord> {
        let (link, href) = dom::first_link(product).ok_or_else(|| AppError::not_found("a[href]"))?;

        let brand = first_of(product, BRAND)
            .map(element_text)
            .unwrap_or_else(|| "ASOS".to_string());

        let name = first_of(product, NAME)
            .map(element_text)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| dom::link_title(link));

        let price_box = PRICE_BOX.find_first(product).unwrap_or(product);
        let (current, original) = PRICES.resolve(price_box)?;

        build_record(
            StoreId::Asos,
            Gender::Men,
            category,
            ListingFields {
                brand: Some(brand),
                name,
                current_price: current,
                original_price: original,
                url: absolute_url(&self.base_url, href),
            },
        )
    }
}

impl Default for AsosParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for AsosParser {
    fn store(&self) -> StoreId {
        StoreId::Asos
    }

    fn description(&self) -> &str {
        "productTile articles with sale/RRP price spans"
    }

    fn parse(&self, markup: &str, category: &str) -> Vec<ProductRecord> {
        LAYOUT.extract(markup, category, |product| self.extract(product, category))
    }
}
