use crate::canonical::canonicalize;
use crate::commands::{gate, CmdMessage, CmdResult};
use crate::error::{PromptDeckError, Result};
use crate::model::{Template, TemplatePatch};
use crate::signature::signature;
use crate::store::DataStore;
use uuid::Uuid;

pub fn run<S: DataStore>(store: &mut S, id: &Uuid, patch: &TemplatePatch) -> Result<CmdResult> {
    run_many(store, &[(*id, patch.clone())])
}

/// Applies every patch, then persists once. Nothing is stored if any id is
/// unknown or any edited record lints RED.
pub fn run_many<S: DataStore>(
    store: &mut S,
    patches: &[(Uuid, TemplatePatch)],
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let mut updated = Vec::with_capacity(patches.len());

    for (id, patch) in patches {
        let current = store.get_template(id)?;
        let (template, warnings) = apply_patch(current, patch)?;
        result.add_message(CmdMessage::success(format!(
            "Template updated: {}",
            template.name
        )));
        result.messages.extend(warnings);
        updated.push(template);
    }

    let durability = store.replace_templates(updated.clone())?;
    result.note_durability(&durability);
    result.affected = updated;
    Ok(result)
}

/// Content edits are re-canonicalized, re-signed and re-linted, with tags
/// replaced rather than merged. Flag-only patches skip the linter.
pub(crate) fn apply_patch(
    mut template: Template,
    patch: &TemplatePatch,
) -> Result<(Template, Vec<CmdMessage>)> {
    let content_patch = TemplatePatch {
        favorite: None,
        pinned: None,
        thumbnail: None,
        ..patch.clone()
    };

    let mut warnings = Vec::new();
    if content_patch.is_empty() {
        template.touch();
    } else {
        let mut draft = template.draft();
        content_patch.apply_to_draft(&mut draft);
        let canonical = canonicalize(&draft);
        let (report, lint_warnings) = gate(&canonical).map_err(|e| match e {
            PromptDeckError::Rejected { issues } => PromptDeckError::Rejected {
                issues: issues
                    .into_iter()
                    .map(|issue| format!("{}: {}", template.name, issue))
                    .collect(),
            },
            other => other,
        })?;
        let sig = signature(&canonical)?;
        template.replace_content(&canonical, sig, report.quality);
        warnings = lint_warnings;
    }
    patch.apply_flags(&mut template);
    Ok((template, warnings))
}
