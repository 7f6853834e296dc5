use crate::commands::{CmdMessage, CmdResult};
use crate::error::{PromptDeckError, Result};
use crate::store::DataStore;
use uuid::Uuid;

pub fn run<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    store.get_template(id)?;
    run_many(store, &[*id])
}

/// Deletes every known id and persists once. Unknown ids produce a warning.
pub fn run_many<S: DataStore>(store: &mut S, ids: &[Uuid]) -> Result<CmdResult> {
    if ids.is_empty() {
        return Err(PromptDeckError::Api("No templates selected".to_string()));
    }

    let (removed, durability) = store.remove_templates(ids)?;
    let mut result = CmdResult::default();
    for template in &removed {
        result.add_message(CmdMessage::success(format!(
            "Template deleted: {}",
            template.name
        )));
    }
    for id in ids {
        if !removed.iter().any(|t| t.id == *id) {
            result.add_message(CmdMessage::warning(format!("Template not found: {}", id)));
        }
    }
    result.note_durability(&durability);
    result.affected = removed;
    Ok(result)
}
