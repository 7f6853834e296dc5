use crate::error::Result;
use crate::store::DataStore;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub name: String,
    /// Distinct signatures carrying the facet.
    pub count: usize,
}

/// Every tag in use, alphabetically.
pub fn list_tags<S: DataStore>(store: &mut S) -> Result<Vec<FacetCount>> {
    Ok(to_facets(store.search_index()?.tag_counts()))
}

/// Every category in use, alphabetically.
pub fn list_categories<S: DataStore>(store: &mut S) -> Result<Vec<FacetCount>> {
    Ok(to_facets(store.search_index()?.category_counts()))
}

fn to_facets(counts: Vec<(String, usize)>) -> Vec<FacetCount> {
    counts
        .into_iter()
        .map(|(name, count)| FacetCount { name, count })
        .collect()
}
