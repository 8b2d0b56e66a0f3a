use crate::models::{FetchTask, StoreId};
use crate::stores::StoreCatalog;
use crate::utils::text::join_path;

/// Expands the catalog into one fetch task per (enabled store, category).
///
/// Stores are visited in catalog order and categories in their configured
/// order. Enabled stores missing from the catalog contribute nothing; no
/// deduplication is attempted.
pub fn build_tasks(enabled: &[StoreId], catalog: &StoreCatalog) -> Vec<FetchTask> {
    let mut tasks = Vec::new();

    for store in catalog.stores().iter().filter(|s| enabled.contains(&s.id)) {
        for (category, path) in &store.categories {
            tasks.push(FetchTask {
                store: store.id,
                category: category.clone(),
                url: format!("{}{}", join_path(&store.base_url, path), store.url_suffix),
                referer: Some(store.base_url.clone()),
            });
        }
    }

    for store in enabled {
        if catalog.get(*store).is_none() {
            tracing::warn!("Enabled store {} has no catalog entry", store);
        }
    }

    tasks
}
