use crate::error::{PromptDeckError, Result};
use crate::model::Template;
use crate::store::DataStore;
use uuid::Uuid;

/// Serializes templates as a pretty JSON array with every field.
///
/// `ids` selects a subset in stored order; `None` exports everything.
pub fn run<S: DataStore>(store: &mut S, ids: Option<&[Uuid]>) -> Result<String> {
    let templates: Vec<&Template> = store
        .templates()?
        .iter()
        .filter(|t| ids.map_or(true, |ids| ids.contains(&t.id)))
        .collect();
    tracing::debug!(count = templates.len(), "exporting templates");
    serde_json::to_string_pretty(&templates).map_err(PromptDeckError::Serialization)
}
