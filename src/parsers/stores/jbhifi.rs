use scraper::ElementRef;

use super::{build_record, retain_markdowns, PriceRules};
use crate::models::{Gender, ListingFields, ProductRecord, StoreId};
use crate::parsers::dom;
use crate::parsers::matcher::{first_of, Matcher};
use crate::parsers::traits::{PageLayout, SourceParser};
use crate::stores::JBHIFI_URL;
use crate::utils::text::{absolute_url, element_text};
use crate::{AppError, Result};

const CONTAINERS: &[Matcher] = &[
    Matcher::class_contains(Some("div"), &["product"]),
    Matcher::class_contains(Some("article"), &["product"]),
];

const NAME: &[Matcher] = &[
    Matcher::class_contains(Some("span"), &["title"]),
    Matcher::Css("h2"),
    Matcher::Css("h3"),
    Matcher::class_contains(None, &["name"]),
];

const PRICES: PriceRules = PriceRules {
    sale: &[Matcher::class_contains_any(None, &["sale", "current", "now"])],
    was: &[Matcher::class_contains_any(None, &["was", "original", "rrp"])],
    fallback: &[Matcher::class_contains(None, &["price"])],
};

const LAYOUT: PageLayout = PageLayout {
    store: StoreId::JbHifi,
    containers: CONTAINERS,
    limit: Some(50),
};

/// Names too short to be a real listing are usually badges or icons.
const MIN_NAME_LEN: usize = 3;

/// Brands recognised inside JB Hi-Fi product titles, checked in order.
const KNOWN_BRANDS: &[&str] = &[
    "Apple", "Samsung", "Sony", "LG", "Bose", "JBL", "Beats", "Sennheiser",
    "Microsoft", "HP", "Dell", "Lenovo", "ASUS", "Acer", "MSI", "Razer",
    "Logitech", "Nintendo", "PlayStation", "Xbox", "Canon", "Nikon", "GoPro",
    "Fitbit", "Garmin", "Google", "Amazon", "Sonos", "Bang & Olufsen",
    "Marshall", "Audio-Technica", "Jabra", "Skullcandy", "Panasonic",
    "TCL", "Hisense", "Philips", "Pioneer", "Denon", "Yamaha", "DJI",
    "Fujifilm", "Olympus", "SanDisk", "Western Digital", "Seagate",
    "Kingston", "Corsair", "HyperX", "SteelSeries", "Turtle Beach",
];

/// Derives a brand from a product title: the first known brand appearing
/// anywhere in it (case-insensitive), else the first word.
pub fn brand_from_title(title: &str) -> String {
    let upper = title.to_uppercase();
    KNOWN_BRANDS
        .iter()
        .find(|brand| upper.contains(&brand.to_uppercase()))
        .map(|brand| brand.to_string())
        .or_else(|| title.split_whitespace().next().map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string())
}

pub struct JbHifiParser {
    base_url: String,
}

impl JbHifiParser {
    pub fn new() -> Self {
        Self::with_base_url(JBHIFI_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn extract(&self, product: ElementRef<'_>, category: &str) -> Result<ProductRecord> {
        let (link, href) = dom::first_link(product).ok_or_else(|| AppError::not_found("a[href]"))?;

        let name = first_of(product, NAME)
            .map(element_text)
            .unwrap_or_else(|| dom::link_title(link));
        if name.chars().count() < MIN_NAME_LEN {
            return Err(AppError::Parse {
                message: format!("product name '{}' is too short", name),
            });
        }

        let (current, original) = PRICES.resolve(product)?;

        build_record(
            StoreId::JbHifi,
            Gender::Unisex,
            category,
            ListingFields {
                brand: Some(brand_from_title(&name)),
                name,
                current_price: current,
                original_price: original,
                url: absolute_url(&self.base_url, href),
            },
        )
    }
}

impl Default for JbHifiParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for JbHifiParser {
    fn store(&self) -> StoreId {
        StoreId::JbHifi
    }

    fn description(&self) -> &str {
        "Electronics product cards, marked-down items only"
    }

    fn parse(&self, markup: &str, category: &str) -> Vec<ProductRecord> {
        let records = LAYOUT.extract(markup, category, |product| self.extract(product, category));
        retain_markdowns(StoreId::JbHifi, category, records)
    }
}
