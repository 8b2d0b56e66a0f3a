//! Static per-store configuration: where each storefront lives and which sale
//! listing pages to pull from it.

use crate::models::StoreId;

/// One storefront's fetch configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub id: StoreId,
    pub base_url: String,
    /// Appended verbatim to every category URL (Myer's on-sale filter).
    pub url_suffix: String,
    /// Ordered `(category label, relative path)` pairs.
    pub categories: Vec<(String, String)>,
}

impl StoreConfig {
    pub fn new(id: StoreId, base_url: impl Into<String>) -> Self {
        Self {
            id,
            base_url: base_url.into(),
            url_suffix: String::new(),
            categories: Vec::new(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.url_suffix = suffix.into();
        self
    }

    pub fn with_category(mut self, label: impl Into<String>, path: impl Into<String>) -> Self {
        self.categories.push((label.into(), path.into()));
        self
    }

    fn with_categories(mut self, categories: &[(&str, &str)]) -> Self {
        self.categories.extend(
            categories
                .iter()
                .map(|(label, path)| (label.to_string(), path.to_string())),
        );
        self
    }
}

/// All known storefronts, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCatalog {
    stores: Vec<StoreConfig>,
}

pub const ICONIC_URL: &str = "https://www.theiconic.com.au";
pub const ASOS_URL: &str = "https://www.asos.com";
pub const MYER_URL: &str = "https://www.myer.com.au";
pub const JBHIFI_URL: &str = "https://www.jbhifi.com.au";
pub const DAVIDJONES_URL: &str = "https://www.davidjones.com";

const ICONIC_CATEGORIES: &[(&str, &str)] = &[
    // Clothing
    ("Shirts & Polos", "mens-clothing-shirts-polos-sale/"),
    ("T-Shirts & Singlets", "mens-clothing-t-shirts-singlets-sale/"),
    ("Coats & Jackets", "mens-clothing-coats-jackets-sale/"),
    ("Pants", "mens-clothing-pants-sale/"),
    ("Sweats & Hoodies", "mens-clothing-sweats-hoodies-sale/"),
    ("Jumpers & Cardigans", "mens-clothing-jumpers-cardigans-sale/"),
    ("Jeans", "mens-clothing-jeans-sale/"),
    ("Shorts", "mens-clothing-shorts-sale/"),
    ("Suits & Blazers", "mens-clothing-suits-blazers-sale/"),
    ("Swimwear", "mens-clothing-swimwear-sale/"),
    ("Loungewear", "mens-clothing-loungewear-sale/"),
    ("Underwear", "mens-clothing-underwear-sale/"),
    ("Socks", "mens-clothing-socks-sale/"),
    ("Sleepwear", "mens-clothing-sleepwear-sale/"),
    ("Base Layers", "mens-clothing-base-layers-sale/"),
    ("Underwear & Socks", "mens-clothing-underwear-socks-sale/"),
    ("Socks & Stockings", "mens-clothing-socks-stockings-sale/"),
    // Shoes
    ("Sneakers", "mens-shoes-sneakers-sale/"),
    ("Boots", "mens-shoes-boots-sale/"),
    ("Casual Shoes", "mens-shoes-casual-shoes-sale/"),
    ("Dress Shoes", "mens-shoes-dress-shoes-sale/"),
    ("Sandals & Thongs", "mens-shoes-sandals-thongs-sale/"),
    ("Slip Ons & Loafers", "mens-shoes-slip-ons-loafers-sale/"),
];

const ASOS_CATEGORIES: &[(&str, &str)] = &[
    ("T-Shirts", "au/men/sale/t-shirts-vests/cat/?cid=5990"),
    ("Shirts", "au/men/sale/shirts/cat/?cid=5988"),
    ("Hoodies & Sweatshirts", "au/men/sale/hoodies-sweatshirts/cat/?cid=5979"),
    ("Jackets & Coats", "au/men/sale/jackets-coats/cat/?cid=3606"),
    ("Jeans", "au/men/sale/jeans/cat/?cid=4208"),
    ("Trousers & Chinos", "au/men/sale/trousers-chinos/cat/?cid=4910"),
    ("Shorts", "au/men/sale/shorts/cat/?cid=7078"),
    ("Knitwear", "au/men/sale/jumpers-cardigans/cat/?cid=7617"),
    ("Shoes", "au/men/sale/shoes/cat/?cid=6930"),
    ("Trainers", "au/men/sale/shoes/trainers/cat/?cid=5775"),
];

const MYER_CATEGORIES: &[(&str, &str)] = &[
    ("Shirts", "men/shirts"),
    ("T-Shirts", "men/t-shirts"),
    ("Jackets & Coats", "men/jackets-coats"),
    ("Pants", "men/pants"),
    ("Jeans", "men/jeans"),
    ("Knitwear", "men/knitwear"),
    ("Shorts", "men/shorts"),
    ("Suits", "men/suits"),
    ("Shoes", "men/shoes"),
];

/// Collection filter shared by every JB Hi-Fi category: on-sale items, 60 per page.
const JBHIFI_SALE_QUERY: &str =
    "?q=&hPP=60&idx=shopify_products_price_asc&p=0&fR[named_tags.on_sale][0]=true";

const JBHIFI_COLLECTIONS: &[(&str, &str)] = &[
    ("Laptops", "collections/computers-tablets-laptops"),
    ("Headphones", "collections/headphones"),
    ("Speakers", "collections/speakers"),
    ("TVs", "collections/tvs"),
    ("Phones", "collections/mobile-phones"),
    ("Gaming", "collections/gaming"),
    ("Cameras", "collections/cameras"),
    ("Smart Home", "collections/smart-home"),
    ("Wearables", "collections/wearable-technology"),
    ("Audio", "collections/hi-fi-turntables"),
];

/// David Jones sale sections and how many listing pages each spans.
const DAVIDJONES_SECTIONS: &[(&str, &str, u32)] = &[
    ("Clothing", "sale/men/clothing", 12),
    ("Shoes", "sale/men/shoes", 6),
    ("Accessories", "sale/men/accessories", 4),
    ("Bags", "sale/men/bags", 3),
    ("Suits", "sale/men/suits", 3),
    ("Underwear", "sale/men/underwear", 2),
    // Often the deepest discounts
    ("Clearance", "sale/men/clearance", 3),
];

impl StoreCatalog {
    pub fn new(stores: Vec<StoreConfig>) -> Self {
        Self { stores }
    }

    /// The production storefronts and their sale categories.
    pub fn builtin() -> Self {
        let jbhifi = JBHIFI_COLLECTIONS.iter().fold(
            StoreConfig::new(StoreId::JbHifi, JBHIFI_URL),
            |store, (label, path)| store.with_category(*label, format!("{}{}", path, JBHIFI_SALE_QUERY)),
        );

        let davidjones = DAVIDJONES_SECTIONS.iter().fold(
            StoreConfig::new(StoreId::DavidJones, DAVIDJONES_URL),
            |store, (label, path, pages)| {
                (1..=*pages).fold(store, |store, page| {
                    if page == 1 {
                        store.with_category(*label, *path)
                    } else {
                        store.with_category(
                            format!("{} Page {}", label, page),
                            format!("{}?page={}", path, page),
                        )
                    }
                })
            },
        );

        Self::new(vec![
            StoreConfig::new(StoreId::Iconic, ICONIC_URL).with_categories(ICONIC_CATEGORIES),
            StoreConfig::new(StoreId::Asos, ASOS_URL).with_categories(ASOS_CATEGORIES),
            StoreConfig::new(StoreId::Myer, MYER_URL)
                .with_suffix("?sortBy=OnSale")
                .with_categories(MYER_CATEGORIES),
            jbhifi,
            davidjones,
        ])
    }

    pub fn get(&self, store: StoreId) -> Option<&StoreConfig> {
        self.stores.iter().find(|config| config.id == store)
    }

    pub fn stores(&self) -> &[StoreConfig] {
        &self.stores
    }

    /// Points `store` at a different origin, e.g. a local mock server.
    pub fn with_base_url(mut self, store: StoreId, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        if let Some(config) = self.stores.iter_mut().find(|config| config.id == store) {
            config.base_url = base_url;
        }
        self
    }
}
