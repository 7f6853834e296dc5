use crate::error::Result;
use crate::index::IndexStats;
use crate::store::DataStore;

/// Discards the cached index and rebuilds it from the collection.
pub fn reindex<S: DataStore>(store: &mut S) -> Result<IndexStats> {
    store.invalidate_index();
    let stats = store.search_index()?.stats();
    tracing::info!(entries = stats.entries, terms = stats.terms, "index rebuilt");
    Ok(stats)
}

pub fn stats<S: DataStore>(store: &mut S) -> Result<IndexStats> {
    Ok(store.search_index()?.stats())
}
