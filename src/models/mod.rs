use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod product;
pub mod task;

// Re-exports for convenience
pub use product::*;
pub use task::*;

/// A storefront the pipeline knows how to fetch and parse.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StoreId {
    Iconic,
    Asos,
    Myer,
    #[serde(rename = "jbhifi")]
    JbHifi,
    #[serde(rename = "davidjones")]
    DavidJones,
}

impl StoreId {
    pub const ALL: [StoreId; 5] = [
        StoreId::Iconic,
        StoreId::Asos,
        StoreId::Myer,
        StoreId::JbHifi,
        StoreId::DavidJones,
    ];

    /// Short identifier used in configuration and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreId::Iconic => "iconic",
            StoreId::Asos => "asos",
            StoreId::Myer => "myer",
            StoreId::JbHifi => "jbhifi",
            StoreId::DavidJones => "davidjones",
        }
    }

    /// Human-readable name carried on every emitted record.
    pub fn display_name(&self) -> &'static str {
        match self {
            StoreId::Iconic => "The Iconic",
            StoreId::Asos => "ASOS",
            StoreId::Myer => "Myer",
            StoreId::JbHifi => "JB Hi-Fi",
            StoreId::DavidJones => "David Jones",
        }
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreId {
    type Err = crate::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        StoreId::ALL
            .into_iter()
            .find(|store| store.as_str() == wanted)
            .ok_or_else(|| crate::AppError::UnknownStore(s.to_string()))
    }
}

/// Audience a store's listing pages are aimed at. Fixed per store, never
/// detected per product.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Men,
    Unisex,
}
