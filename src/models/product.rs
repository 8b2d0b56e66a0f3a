use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Gender, StoreId};
use crate::price::{self, NOT_AVAILABLE};

/// One discounted listing, normalized across storefronts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    pub source: String,
    pub brand: String,
    pub name: String,
    pub current_price: String,
    pub original_price: String,
    pub discount_percent: f64,
    pub category: String,
    pub gender: Gender,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
}

/// Raw fields pulled out of one product container before normalization.
#[derive(Debug, Clone, Default)]
pub struct ListingFields {
    pub brand: Option<String>,
    pub name: String,
    pub current_price: String,
    pub original_price: String,
    pub url: String,
}

impl ProductRecord {
    /// Builds a record from extracted fields, cleaning both prices and
    /// deriving the discount. Returns `None` when the listing has no name or
    /// no usable current price.
    pub fn from_listing(
        store: StoreId,
        gender: Gender,
        category: &str,
        fields: ListingFields,
    ) -> Option<Self> {
        let name = fields.name.trim().to_string();
        if name.is_empty() {
            return None;
        }

        let current_price = price::clean_price(&fields.current_price);
        if current_price == NOT_AVAILABLE {
            return None;
        }
        let original_price = price::clean_price(&fields.original_price);
        let discount_percent = price::discount_percent(&current_price, &original_price);

        let brand = fields
            .brand
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| "Unknown".to_string());

        Some(Self {
            source: store.display_name().to_string(),
            brand,
            name,
            current_price,
            original_price,
            discount_percent,
            category: category.to_string(),
            gender,
            url: fields.url,
            scraped_at: Utc::now(),
        })
    }

    pub fn has_markdown(&self) -> bool {
        self.discount_percent > 0.0
    }
}
