use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::DataStore;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub pinned_only: bool,
    pub favorites_only: bool,
}

/// Templates in stored order, optionally narrowed to pinned or favorite ones.
pub fn run<S: DataStore>(store: &mut S, filter: TemplateFilter) -> Result<CmdResult> {
    let listed = store
        .templates()?
        .iter()
        .filter(|t| !filter.pinned_only || t.pinned)
        .filter(|t| !filter.favorites_only || t.favorite)
        .cloned()
        .collect();
    Ok(CmdResult::default().with_listed(listed))
}

pub fn pinned<S: DataStore>(store: &mut S) -> Result<CmdResult> {
    run(
        store,
        TemplateFilter {
            pinned_only: true,
            ..Default::default()
        },
    )
}

pub fn show<S: DataStore>(store: &mut S, id: &Uuid) -> Result<CmdResult> {
    let template = store.get_template(id)?;
    Ok(CmdResult::default().with_listed(vec![template]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PromptDeckError;
    use crate::store::memory::fixtures::StoreFixture;

    #[test]
    fn lists_everything_by_default() {
        let mut fixture = StoreFixture::new().with_templates(3).with_pinned("Pinned");
        let result = run(&mut fixture.store, TemplateFilter::default()).unwrap();
        assert_eq!(result.listed.len(), 4);
    }

    #[test]
    fn pinned_filter() {
        let mut fixture = StoreFixture::new().with_templates(2).with_pinned("Pinned");
        let result = pinned(&mut fixture.store).unwrap();
        assert_eq!(result.listed.len(), 1);
        assert_eq!(result.listed[0].name, "Pinned");
    }

    #[test]
    fn show_unknown_id_fails() {
        let mut fixture = StoreFixture::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            show(&mut fixture.store, &id),
            Err(PromptDeckError::TemplateNotFound(_))
        ));
    }
}
