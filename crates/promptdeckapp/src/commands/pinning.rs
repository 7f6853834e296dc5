use crate::commands::{update, CmdResult};
use crate::error::{PromptDeckError, Result};
use crate::model::TemplatePatch;
use crate::store::DataStore;
use uuid::Uuid;

pub fn pin<S: DataStore>(store: &mut S, ids: &[Uuid]) -> Result<CmdResult> {
    set_pinned(store, ids, true)
}

pub fn unpin<S: DataStore>(store: &mut S, ids: &[Uuid]) -> Result<CmdResult> {
    set_pinned(store, ids, false)
}

pub fn set_pinned<S: DataStore>(store: &mut S, ids: &[Uuid], pinned: bool) -> Result<CmdResult> {
    let patch = TemplatePatch {
        pinned: Some(pinned),
        ..Default::default()
    };
    apply_flag(store, ids, patch)
}

pub fn set_favorite<S: DataStore>(
    store: &mut S,
    ids: &[Uuid],
    favorite: bool,
) -> Result<CmdResult> {
    let patch = TemplatePatch {
        favorite: Some(favorite),
        ..Default::default()
    };
    apply_flag(store, ids, patch)
}

fn apply_flag<S: DataStore>(store: &mut S, ids: &[Uuid], patch: TemplatePatch) -> Result<CmdResult> {
    if ids.is_empty() {
        return Err(PromptDeckError::Api("No templates selected".to_string()));
    }
    let patches: Vec<(Uuid, TemplatePatch)> = ids.iter().map(|id| (*id, patch.clone())).collect();
    update::run_many(store, &patches)
}
