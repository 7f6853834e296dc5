use crate::canonical::canonicalize;
use crate::commands::{gate, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{Template, TemplateDraft, TemplatePatch};
use crate::signature::signature;
use crate::store::DataStore;
use uuid::Uuid;

/// Stores the draft as a new record even if its signature already exists.
pub fn run<S: DataStore>(store: &mut S, draft: &TemplateDraft) -> Result<CmdResult> {
    let canonical = canonicalize(draft);
    let (report, warnings) = gate(&canonical)?;
    let sig = signature(&canonical)?;

    let mut result = CmdResult::default();
    if store.find_by_signature(&sig)?.is_some() {
        result.add_message(CmdMessage::info(
            "A template with identical content already exists; stored a duplicate",
        ));
    }

    let template = Template::from_canonical(&canonical, sig, report.quality);
    store_new(store, template, warnings, result)
}

/// Creates a new template from `parent` with `patch` applied on top.
/// The new record points back at the parent's signature via `variant_of`.
pub fn derive_variant<S: DataStore>(
    store: &mut S,
    parent: &Uuid,
    patch: &TemplatePatch,
) -> Result<CmdResult> {
    let parent = store.get_template(parent)?;
    let mut draft = parent.draft();
    patch.apply_to_draft(&mut draft);

    let canonical = canonicalize(&draft);
    let (report, warnings) = gate(&canonical)?;
    let sig = signature(&canonical)?;

    let mut template = Template::from_canonical(&canonical, sig, report.quality);
    template.variant_of = Some(parent.signature.clone());
    patch.apply_flags(&mut template);
    store_new(store, template, warnings, CmdResult::default())
}

fn store_new<S: DataStore>(
    store: &mut S,
    template: Template,
    warnings: Vec<CmdMessage>,
    mut result: CmdResult,
) -> Result<CmdResult> {
    let durability = store.insert_templates(vec![template.clone()])?;
    result.add_message(CmdMessage::success(format!(
        "Template created: {}",
        template.name
    )));
    result.messages.extend(warnings);
    result.note_durability(&durability);
    result.affected.push(template);
    Ok(result)
}
