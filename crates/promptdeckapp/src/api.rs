//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the
//! single entry point for all promptdeck operations, regardless of the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (resolving id prefixes to full ids)
//! - **Carries settings** the commands need (ranking thresholds, best-of defaults)
//! - **Returns structured types** (`CmdResult`, `UpsertResult`, `ImportSummary`, ...)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **I/O operations**: No stdout, stderr, or file formatting
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Id Prefixes
//!
//! UIs show shortened ids. [`PromptDeckApi::resolve_ids`] accepts full ids or
//! any unambiguous prefix of at least [`MIN_ID_PREFIX`] characters.
//!
//! ## Generic Over DataStore
//!
//! `PromptDeckApi<S: DataStore>` is generic over the storage backend:
//! - Production: `PromptDeckApi<FileStore>`
//! - Testing: `PromptDeckApi<InMemoryStore>`

use crate::canonical::canonicalize;
use crate::commands::{
    self, best_of, create, delete, export, get, import, pinning, reindex, tags, update, upsert,
    usage, CmdResult,
};
use crate::config::PromptDeckConfig;
use crate::error::{PromptDeckError, Result};
use crate::index::IndexStats;
use crate::lint::{lint, LintReport};
use crate::model::{TemplateDraft, TemplatePatch};
use crate::search::{Ranker, SearchQuery};
use crate::store::{ChangeEvent, DataStore, SubscriptionId};
use uuid::Uuid;

pub const MIN_ID_PREFIX: usize = 4;

/// The main API facade for promptdeck operations.
pub struct PromptDeckApi<S: DataStore> {
    store: S,
    ranker: Ranker,
    best_of_limit: usize,
    best_of_min_uses: u32,
}

impl<S: DataStore> PromptDeckApi<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, &PromptDeckConfig::default())
    }

    pub fn with_config(store: S, config: &PromptDeckConfig) -> Self {
        Self {
            store,
            ranker: config.ranker(),
            best_of_limit: config.best_of_limit,
            best_of_min_uses: config.best_of_min_uses,
        }
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // --- Reads ---

    pub fn get_all(&mut self) -> Result<CmdResult> {
        get::run(&mut self.store, get::TemplateFilter::default())
    }

    pub fn get_pinned(&mut self) -> Result<CmdResult> {
        get::pinned(&mut self.store)
    }

    pub fn get_favorites(&mut self) -> Result<CmdResult> {
        get::run(
            &mut self.store,
            get::TemplateFilter {
                favorites_only: true,
                ..Default::default()
            },
        )
    }

    pub fn get(&mut self, id: &Uuid) -> Result<CmdResult> {
        get::show(&mut self.store, id)
    }

    pub fn search(&mut self, query: &SearchQuery) -> Result<CmdResult> {
        commands::search::run(&mut self.store, &self.ranker, query)
    }

    /// Best-of list; `None` falls back to the configured defaults.
    pub fn best_of(&mut self, limit: Option<usize>, min_uses: Option<u32>) -> Result<CmdResult> {
        best_of::run(
            &mut self.store,
            limit.unwrap_or(self.best_of_limit),
            min_uses.unwrap_or(self.best_of_min_uses),
        )
    }

    /// Lints the draft in canonical form, exactly as a save would.
    pub fn validate(&self, draft: &TemplateDraft) -> LintReport {
        lint(&canonicalize(draft))
    }

    pub fn list_tags(&mut self) -> Result<Vec<tags::FacetCount>> {
        tags::list_tags(&mut self.store)
    }

    pub fn list_categories(&mut self) -> Result<Vec<tags::FacetCount>> {
        tags::list_categories(&mut self.store)
    }

    // --- Writes ---

    /// Always stores a new record, even when the signature already exists.
    pub fn create(&mut self, draft: &TemplateDraft) -> Result<CmdResult> {
        create::run(&mut self.store, draft)
    }

    pub fn upsert(&mut self, draft: &TemplateDraft) -> Result<upsert::UpsertResult> {
        upsert::run(&mut self.store, draft)
    }

    pub fn derive_variant(&mut self, parent: &Uuid, patch: &TemplatePatch) -> Result<CmdResult> {
        create::derive_variant(&mut self.store, parent, patch)
    }

    pub fn update_by_id(&mut self, id: &Uuid, patch: &TemplatePatch) -> Result<CmdResult> {
        update::run(&mut self.store, id, patch)
    }

    pub fn update_many(&mut self, patches: &[(Uuid, TemplatePatch)]) -> Result<CmdResult> {
        update::run_many(&mut self.store, patches)
    }

    pub fn delete_by_id(&mut self, id: &Uuid) -> Result<CmdResult> {
        delete::run(&mut self.store, id)
    }

    pub fn delete_many(&mut self, ids: &[Uuid]) -> Result<CmdResult> {
        delete::run_many(&mut self.store, ids)
    }

    pub fn set_pinned(&mut self, ids: &[Uuid], pinned: bool) -> Result<CmdResult> {
        pinning::set_pinned(&mut self.store, ids, pinned)
    }

    pub fn set_favorite(&mut self, ids: &[Uuid], favorite: bool) -> Result<CmdResult> {
        pinning::set_favorite(&mut self.store, ids, favorite)
    }

    pub fn apply_usage(&mut self, id: &Uuid) -> Result<CmdResult> {
        usage::apply_usage(&mut self.store, id)
    }

    pub fn record_success(&mut self, id: &Uuid) -> Result<CmdResult> {
        usage::record_success(&mut self.store, id)
    }

    pub fn export_all(&mut self, ids: Option<&[Uuid]>) -> Result<String> {
        export::run(&mut self.store, ids)
    }

    pub fn import_all(&mut self, json: &str) -> Result<import::ImportSummary> {
        import::run(&mut self.store, json)
    }

    // --- Index ---

    pub fn reindex(&mut self) -> Result<IndexStats> {
        reindex::reindex(&mut self.store)
    }

    pub fn index_stats(&mut self) -> Result<IndexStats> {
        reindex::stats(&mut self.store)
    }

    // --- Notifications ---

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    // --- Input normalization ---

    /// Resolves full ids or unambiguous id prefixes, preserving order and
    /// dropping repeats.
    pub fn resolve_ids<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<Vec<Uuid>> {
        if inputs.is_empty() {
            return Err(PromptDeckError::Api("No templates selected".to_string()));
        }
        let known: Vec<Uuid> = self.store.templates()?.iter().map(|t| t.id).collect();

        let mut resolved = Vec::with_capacity(inputs.len());
        for input in inputs {
            let id = resolve_one(&known, input.as_ref().trim())?;
            if !resolved.contains(&id) {
                resolved.push(id);
            }
        }
        Ok(resolved)
    }

    pub fn resolve_id(&mut self, input: &str) -> Result<Uuid> {
        let ids = self.resolve_ids(&[input])?;
        ids.into_iter()
            .next()
            .ok_or_else(|| PromptDeckError::Api(format!("No template matches '{}'", input)))
    }
}

fn resolve_one(known: &[Uuid], input: &str) -> Result<Uuid> {
    if let Ok(id) = Uuid::parse_str(input) {
        return Ok(id);
    }
    if input.chars().count() < MIN_ID_PREFIX {
        return Err(PromptDeckError::Api(format!(
            "Id prefix '{}' is too short (need at least {} characters)",
            input, MIN_ID_PREFIX
        )));
    }
    let needle = input.to_lowercase();
    let mut matches = known.iter().filter(|id| id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(id), None) => Ok(*id),
        (None, _) => Err(PromptDeckError::Api(format!(
            "No template matches '{}'",
            input
        ))),
        (Some(_), Some(_)) => Err(PromptDeckError::Api(format!(
            "Id prefix '{}' is ambiguous",
            input
        ))),
    }
}
