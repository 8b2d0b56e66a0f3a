use std::collections::HashMap;

use super::stores::{AsosParser, DavidJonesParser, IconicParser, JbHifiParser, MyerParser};
use super::traits::SourceParser;
use crate::models::{ProductRecord, StoreId};
use crate::stores::StoreCatalog;
use crate::{AppError, Result};

pub type SourceParserBox = Box<dyn SourceParser>;

/// Maps each store to the parser that understands its listing pages.
///
/// Built once at startup and shared read-only across the pipeline.
pub struct ParserRegistry {
    parsers: HashMap<StoreId, SourceParserBox>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Registry holding every built-in parser at its production origin.
    pub fn with_default_parsers() -> Self {
        Self::for_catalog(&StoreCatalog::builtin())
    }

    /// Registry whose parsers resolve relative links against the base URLs
    /// configured in `catalog`.
    pub fn for_catalog(catalog: &StoreCatalog) -> Self {
        let mut registry = Self::new();

        for store in catalog.stores() {
            let base_url = store.base_url.clone();
            let parser: SourceParserBox = match store.id {
                StoreId::Iconic => Box::new(IconicParser::with_base_url(base_url)),
                StoreId::Asos => Box::new(AsosParser::with_base_url(base_url)),
                StoreId::Myer => Box::new(MyerParser::with_base_url(base_url)),
                StoreId::JbHifi => Box::new(JbHifiParser::with_base_url(base_url)),
                StoreId::DavidJones => Box::new(DavidJonesParser::with_base_url(base_url)),
            };
            registry.register(parser);
        }

        registry
    }

    /// Registers a parser, replacing any previous one for the same store.
    pub fn register(&mut self, parser: SourceParserBox) {
        let store = parser.store();
        tracing::debug!("Registering parser for {}: {}", store, parser.description());
        if self.parsers.insert(store, parser).is_some() {
            tracing::warn!("Replaced existing parser for {}", store);
        }
    }

    pub fn get(&self, store: StoreId) -> Option<&dyn SourceParser> {
        self.parsers.get(&store).map(|parser| parser.as_ref())
    }

    pub fn has_parser(&self, store: StoreId) -> bool {
        self.parsers.contains_key(&store)
    }

    /// Registered stores in a stable order.
    pub fn list_stores(&self) -> Vec<StoreId> {
        let mut stores: Vec<StoreId> = self.parsers.keys().copied().collect();
        stores.sort();
        stores
    }

    /// Fails if any of `stores` has no parser. Run at startup so that a
    /// misconfigured store is caught before any page is fetched.
    pub fn ensure_covers(&self, stores: &[StoreId]) -> Result<()> {
        match stores.iter().find(|store| !self.has_parser(**store)) {
            Some(store) => Err(AppError::MissingParser {
                store: store.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Dispatches one page to its store's parser.
    pub fn parse(&self, store: StoreId, markup: &str, category: &str) -> Result<Vec<ProductRecord>> {
        let parser = self.get(store).ok_or_else(|| AppError::MissingParser {
            store: store.to_string(),
        })?;
        Ok(parser.parse(markup, category))
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
