use super::backend::StorageBackend;
use super::{
    ChangeEvent, ChangeKind, DataStore, Durability, Listener, SubscriptionId, COLLECTION_KEY,
    LEGACY_KEY,
};
use crate::error::{PromptDeckError, Result};
use crate::index::SearchIndex;
use crate::model::{ImportRecord, LegacyEntry, Template};
use crate::presets;
use std::collections::HashSet;
use uuid::Uuid;

pub struct TemplateStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    templates: Vec<Template>,
    loaded: bool,
    index: Option<SearchIndex>,
    seed_presets: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<B: StorageBackend> TemplateStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            templates: Vec::new(),
            loaded: false,
            index: None,
            seed_presets: true,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Whether an empty collection with nothing to migrate gets the presets.
    pub fn with_seed_presets(mut self, seed_presets: bool) -> Self {
        self.seed_presets = seed_presets;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Discards the cached index and builds a fresh one.
    pub fn rebuild_index(&mut self) -> Result<&SearchIndex> {
        self.index = None;
        self.search_index()
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.loaded {
            return Ok(());
        }
        self.loaded = true;
        self.templates = self.read_collection();
        self.index = None;
        tracing::debug!(count = self.templates.len(), "template collection loaded");
        if self.templates.is_empty() {
            self.bootstrap()?;
        }
        Ok(())
    }

    /// Reads the stored collection. Any failure degrades to an empty one.
    fn read_collection(&self) -> Vec<Template> {
        let raw = match self.backend.read_blob(COLLECTION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read template collection");
                return Vec::new();
            }
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::error!(error = %e, "template collection is unreadable");
                return Vec::new();
            }
        };
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<Template>(value) {
                Ok(template) => Some(template),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable stored template");
                    None
                }
            })
            .collect()
    }

    fn bootstrap(&mut self) -> Result<()> {
        let migrated = self.read_legacy()?;
        if !migrated.is_empty() {
            tracing::info!(count = migrated.len(), "migrating legacy templates");
            let ids = migrated.iter().map(|t| t.id).collect();
            self.templates = migrated;
            self.index = None;
            let durability = self.commit(ChangeEvent::new(ChangeKind::Migrated, ids));
            if durability.is_persisted() {
                if let Err(e) = self.backend.delete_blob(LEGACY_KEY) {
                    tracing::warn!(error = %e, "failed to delete legacy templates");
                }
            }
            return Ok(());
        }

        if self.seed_presets {
            let seeds = presets::seed_templates()?;
            tracing::info!(count = seeds.len(), "seeding preset templates");
            let ids = seeds.iter().map(|t| t.id).collect();
            self.templates = seeds;
            self.index = None;
            self.commit(ChangeEvent::new(ChangeKind::Seeded, ids));
        }
        Ok(())
    }

    /// Legacy `{name, data}` entries as templates. Entries without a subject,
    /// or repeating an earlier signature, are dropped.
    fn read_legacy(&self) -> Result<Vec<Template>> {
        let raw = match self.backend.read_blob(LEGACY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read legacy templates");
                return Ok(Vec::new());
            }
        };
        let entries: Vec<LegacyEntry> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "legacy templates are unreadable");
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let mut migrated = Vec::new();
        for entry in entries {
            let mut record: ImportRecord = match serde_json::from_value(entry.data) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(name = %entry.name, error = %e, "skipping legacy template");
                    continue;
                }
            };
            if record.name.as_deref().map_or(true, |n| n.trim().is_empty()) {
                record.name = Some(entry.name.clone());
            }
            let Some(template) = record.into_template()? else {
                tracing::warn!(name = %entry.name, "skipping legacy template without subject");
                continue;
            };
            if seen.insert(template.signature.clone()) {
                migrated.push(template);
            }
        }
        Ok(migrated)
    }

    /// Writes the whole collection and notifies listeners on success.
    fn commit(&mut self, event: ChangeEvent) -> Durability {
        let written = serde_json::to_string_pretty(&self.templates)
            .map_err(PromptDeckError::Serialization)
            .and_then(|json| self.backend.write_blob(COLLECTION_KEY, &json));

        match written {
            Ok(()) => {
                tracing::debug!(kind = ?event.kind, count = event.ids.len(), "collection persisted");
                for (_, listener) in self.listeners.iter_mut() {
                    listener(&event);
                }
                Durability::Persisted
            }
            Err(e) => {
                tracing::error!(kind = ?event.kind, error = %e, "failed to persist template collection");
                Durability::Unsaved(e.to_string())
            }
        }
    }

    fn position(&self, id: &Uuid) -> Option<usize> {
        self.templates.iter().position(|t| t.id == *id)
    }
}

impl<B: StorageBackend> DataStore for TemplateStore<B> {
    fn templates(&mut self) -> Result<&[Template]> {
        self.ensure_loaded()?;
        Ok(&self.templates)
    }

    fn get_template(&mut self, id: &Uuid) -> Result<Template> {
        self.ensure_loaded()?;
        self.position(id)
            .map(|pos| self.templates[pos].clone())
            .ok_or(PromptDeckError::TemplateNotFound(*id))
    }

    fn find_by_signature(&mut self, signature: &str) -> Result<Option<Template>> {
        self.ensure_loaded()?;
        Ok(self
            .templates
            .iter()
            .find(|t| t.signature == signature)
            .cloned())
    }

    fn insert_templates(&mut self, templates: Vec<Template>) -> Result<Durability> {
        self.ensure_loaded()?;
        if templates.is_empty() {
            return Ok(Durability::Persisted);
        }
        let ids = templates.iter().map(|t| t.id).collect();
        for template in templates {
            if let Some(index) = self.index.as_mut() {
                index.add_entry(&template);
            }
            self.templates.push(template);
        }
        Ok(self.commit(ChangeEvent::new(ChangeKind::Created, ids)))
    }

    fn replace_templates(&mut self, templates: Vec<Template>) -> Result<Durability> {
        self.ensure_loaded()?;
        let positions = templates
            .iter()
            .map(|t| self.position(&t.id).ok_or(PromptDeckError::TemplateNotFound(t.id)))
            .collect::<Result<Vec<usize>>>()?;
        if templates.is_empty() {
            return Ok(Durability::Persisted);
        }

        let ids = templates.iter().map(|t| t.id).collect();
        for (pos, template) in positions.into_iter().zip(templates) {
            let old = std::mem::replace(&mut self.templates[pos], template);
            if let Some(index) = self.index.as_mut() {
                index.remove_entry(&old);
                index.add_entry(&self.templates[pos]);
            }
        }
        Ok(self.commit(ChangeEvent::new(ChangeKind::Updated, ids)))
    }

    fn remove_templates(&mut self, ids: &[Uuid]) -> Result<(Vec<Template>, Durability)> {
        self.ensure_loaded()?;
        let (removed, kept): (Vec<Template>, Vec<Template>) = std::mem::take(&mut self.templates)
            .into_iter()
            .partition(|t| ids.contains(&t.id));
        self.templates = kept;
        if removed.is_empty() {
            return Ok((removed, Durability::Persisted));
        }

        if let Some(index) = self.index.as_mut() {
            for template in &removed {
                index.remove_entry(template);
            }
        }
        let removed_ids = removed.iter().map(|t| t.id).collect();
        let durability = self.commit(ChangeEvent::new(ChangeKind::Deleted, removed_ids));
        Ok((removed, durability))
    }

    fn import_templates(&mut self, templates: Vec<Template>) -> Result<Durability> {
        self.ensure_loaded()?;
        if templates.is_empty() {
            return Ok(Durability::Persisted);
        }
        let ids = templates.iter().map(|t| t.id).collect();
        self.templates.extend(templates);
        self.index = None;
        Ok(self.commit(ChangeEvent::new(ChangeKind::Imported, ids)))
    }

    fn search_index(&mut self) -> Result<&SearchIndex> {
        self.ensure_loaded()?;
        let templates = &self.templates;
        Ok(self
            .index
            .get_or_insert_with(|| SearchIndex::build(templates)))
    }

    fn invalidate_index(&mut self) {
        self.index = None;
    }

    fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }
}
