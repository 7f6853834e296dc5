use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;
use chrono::Utc;
use uuid::Uuid;

/// Counts one application of the template to the prompt builder.
pub fn apply_usage<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut template = store.get_template(id)?;
    template.usage_count = template.usage_count.saturating_add(1);
    template.last_used = Some(Utc::now());
    template.touch();

    let durability = store.replace_templates(vec![template.clone()])?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Using template: {} ({} uses)",
        template.name, template.usage_count
    )));
    result.note_durability(&durability);
    result.affected.push(template);
    Ok(result)
}

/// Counts one render the user confirmed as good.
pub fn record_success<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let mut template = store.get_template(id)?;
    template.render_success_count = template.render_success_count.saturating_add(1);
    template.touch();

    let durability = store.replace_templates(vec![template.clone()])?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Recorded a good render for: {}",
        template.name
    )));
    result.note_durability(&durability);
    result.affected.push(template);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn usage_counts_and_stamps() {
        let mut fixture = StoreFixture::new().with_templates(1);
        let id = fixture.id_of("Template 1");

        apply_usage(&mut fixture.store, &id).unwrap();
        let result = apply_usage(&mut fixture.store, &id).unwrap();

        let t = &result.affected[0];
        assert_eq!(t.usage_count, 2);
        assert!(t.last_used.is_some());
        assert_eq!(fixture.store.get_template(&id).unwrap().usage_count, 2);
    }

    #[test]
    fn success_counts_without_touching_usage() {
        let mut fixture = StoreFixture::new().with_templates(1);
        let id = fixture.id_of("Template 1");

        let t = record_success(&mut fixture.store, &id).unwrap().affected.remove(0);
        assert_eq!(t.render_success_count, 1);
        assert_eq!(t.usage_count, 0);
        assert!(t.last_used.is_none());
    }
}
