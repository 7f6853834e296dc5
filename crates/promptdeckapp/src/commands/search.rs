use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::search::{Ranker, SearchQuery};
use crate::store::DataStore;

/// Ranks the query against the store's index.
///
/// `hits` carries the scores; `listed` carries the matching templates in the
/// same order (the first stored record for each signature).
pub fn run<S: DataStore>(store: &mut S, ranker: &Ranker, query: &SearchQuery) -> Result<CmdResult> {
    let hits = ranker.rank(store.search_index()?, query);
    let templates = store.templates()?;
    let listed = hits
        .iter()
        .filter_map(|hit| templates.iter().find(|t| t.signature == hit.signature))
        .cloned()
        .collect();

    let mut result = CmdResult::default().with_listed(listed);
    if hits.is_empty() {
        result.add_message(CmdMessage::info("No templates match"));
    }
    result.hits = hits;
    Ok(result)
}
