use super::mem_backend::MemBackend;
use super::template_store::TemplateStore;

pub type InMemoryStore = TemplateStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// An empty store that stays empty on first load.
    pub fn new() -> Self {
        TemplateStore::with_backend(MemBackend::new()).with_seed_presets(false)
    }

    /// An empty store that seeds the presets on first load, like a fresh install.
    pub fn seeded() -> Self {
        TemplateStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::lint::lint;
    use crate::model::{Quality, Template, TemplateDraft};
    use crate::signature::signature;
    use crate::store::DataStore;

    /// A draft that lints GREEN: all six prompt fields filled.
    pub fn green_draft(name: &str, subject: &str) -> TemplateDraft {
        TemplateDraft::new(name, subject)
            .with_action("standing still")
            .with_environment("open field")
            .with_style("oil painting")
            .with_lighting("golden hour")
            .with_camera("50mm")
    }

    /// The draft as a freshly stored template.
    pub fn stored(draft: &TemplateDraft) -> Template {
        let canonical = canonicalize(draft);
        let sig = signature(&canonical).unwrap();
        let quality = lint(&canonical).quality;
        Template::from_canonical(&canonical, sig, quality)
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_templates(mut self, count: usize) -> Self {
            let templates = (0..count)
                .map(|i| stored(&green_draft(&format!("Template {}", i + 1), &format!("subject {}", i + 1))))
                .collect();
            self.store.insert_templates(templates).unwrap();
            self
        }

        pub fn with_template(mut self, draft: TemplateDraft) -> Self {
            self.store.insert_templates(vec![stored(&draft)]).unwrap();
            self
        }

        pub fn with_pinned(mut self, name: &str) -> Self {
            let mut template = stored(&green_draft(name, &format!("{} subject", name)));
            template.pinned = true;
            self.store.insert_templates(vec![template]).unwrap();
            self
        }

        /// A template with preset usage counters and grade.
        pub fn with_usage(mut self, name: &str, usage: u32, successes: u32, quality: Quality) -> Self {
            let mut template = stored(&green_draft(name, &format!("{} subject", name)));
            template.usage_count = usage;
            template.render_success_count = successes;
            template.quality = quality;
            self.store.insert_templates(vec![template]).unwrap();
            self
        }

        /// Id of the first template named `name`.
        pub fn id_of(&mut self, name: &str) -> uuid::Uuid {
            self.store
                .templates()
                .unwrap()
                .iter()
                .find(|t| t.name == name)
                .map(|t| t.id)
                .unwrap()
        }
    }
}
