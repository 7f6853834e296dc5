use crate::canonical::canonicalize;
use crate::commands::{gate, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Template, TemplateDraft};
use crate::signature::signature;
use crate::store::DataStore;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
    Created,
    /// An existing record with the same signature absorbed the draft.
    Merged,
}

#[derive(Debug, Clone)]
pub struct UpsertResult {
    pub outcome: UpsertOutcome,
    pub result: CmdResult,
}

/// Create-or-merge by signature.
///
/// On a signature hit the existing record keeps its id, `created_at`, usage
/// counters and flags; its tags become the union of old and new.
pub fn run<S: DataStore>(store: &mut S, draft: &TemplateDraft) -> Result<UpsertResult> {
    let canonical = canonicalize(draft);
    let (report, warnings) = gate(&canonical)?;
    let sig = signature(&canonical)?;

    let mut result = CmdResult::default();
    let (outcome, template, durability) = match store.find_by_signature(&sig)? {
        Some(mut existing) => {
            existing.merge_content(&canonical, sig, report.quality);
            let durability = store.replace_templates(vec![existing.clone()])?;
            result.add_message(CmdMessage::success(format!(
                "Template updated: {}",
                existing.name
            )));
            (UpsertOutcome::Merged, existing, durability)
        }
        None => {
            let template = Template::from_canonical(&canonical, sig, report.quality);
            let durability = store.insert_templates(vec![template.clone()])?;
            result.add_message(CmdMessage::success(format!(
                "Template saved: {}",
                template.name
            )));
            (UpsertOutcome::Created, template, durability)
        }
    };

    result.messages.extend(warnings);
    result.note_durability(&durability);
    result.affected.push(template);
    Ok(UpsertResult { outcome, result })
}
