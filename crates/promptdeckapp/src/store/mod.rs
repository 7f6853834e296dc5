//! # Storage Layer
//!
//! This module defines the storage abstraction for promptdeck. The [`DataStore`]
//! trait is what the command layer talks to; [`template_store::TemplateStore`]
//! is its one implementation, generic over a raw [`backend::StorageBackend`].
//!
//! ## One Blob, Whole-Collection Writes
//!
//! The entire template collection is one JSON array stored under
//! [`COLLECTION_KEY`]. Every mutation rewrites that blob in full; there are no
//! partial writes and no transactions beyond "the last write wins".
//!
//! ```text
//! <data dir>/
//! ├── templates.v2.json      # Vec<Template>
//! └── saved_templates.json   # legacy [{name, data}], consumed once by bootstrap
//! ```
//!
//! ## Lazy Load and Bootstrap
//!
//! The collection is read on first access. If it is empty (never written, or
//! the read failed, or the blob was unreadable) the store bootstraps:
//!
//! 1. **Migration**: entries under [`LEGACY_KEY`] are converted, persisted and
//!    the legacy blob is deleted.
//! 2. **Seeding**: otherwise, when enabled, the built-in presets are stored
//!    (pinned).
//!
//! ## Failure Semantics
//!
//! - Read failure: logged, treated as an empty collection.
//! - Write failure: logged; the in-memory mutation stands and the caller gets
//!   [`Durability::Unsaved`] back instead of an error.
//!
//! ## Search Index Cache
//!
//! The store owns the [`crate::index::SearchIndex`]. It is built lazily, patched
//! per record on single-record mutations (old entry removed, new one added)
//! and discarded after bulk ones (import, seed, migration).
//!
//! ## Change Notifications
//!
//! Listeners registered with [`DataStore::subscribe`] receive a
//! [`ChangeEvent`] after every mutation whose blob write succeeded.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `TemplateStore` over the filesystem.
//! - [`memory::InMemoryStore`]: For testing logic without filesystem I/O.

use crate::error::Result;
use crate::index::SearchIndex;
use crate::model::Template;
use serde::Serialize;
use uuid::Uuid;

pub mod backend;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;
pub mod template_store;

/// Blob key of the current collection.
pub const COLLECTION_KEY: &str = "templates.v2";

/// Blob key of the pre-migration collection.
pub const LEGACY_KEY: &str = "saved_templates";

/// Whether a mutation reached the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Durability {
    Persisted,
    /// The write failed; the in-memory collection is ahead of storage.
    Unsaved(String),
}

impl Durability {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Durability::Persisted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    Imported,
    Seeded,
    Migrated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub ids: Vec<Uuid>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, ids: Vec<Uuid>) -> Self {
        Self { kind, ids }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

pub type Listener = Box<dyn FnMut(&ChangeEvent)>;

/// Abstract interface for template storage.
///
/// Reads take `&mut self` because the first access loads (and possibly
/// bootstraps) the collection.
pub trait DataStore {
    /// The whole collection, in stored order.
    fn templates(&mut self) -> Result<&[Template]>;

    /// Get a template by id
    fn get_template(&mut self, id: &Uuid) -> Result<Template>;

    /// First template carrying `signature`, if any
    fn find_by_signature(&mut self, signature: &str) -> Result<Option<Template>>;

    /// Append records one by one, patching the index for each.
    fn insert_templates(&mut self, templates: Vec<Template>) -> Result<Durability>;

    /// Replace records matched by id, patching the index for each.
    /// Fails without changing anything if any id is unknown.
    fn replace_templates(&mut self, templates: Vec<Template>) -> Result<Durability>;

    /// Remove records by id. Unknown ids are ignored; removed records are returned.
    fn remove_templates(&mut self, ids: &[Uuid]) -> Result<(Vec<Template>, Durability)>;

    /// Append records in bulk; the index is invalidated rather than patched.
    fn import_templates(&mut self, templates: Vec<Template>) -> Result<Durability>;

    /// The search index, built on demand.
    fn search_index(&mut self) -> Result<&SearchIndex>;

    /// Drop the cached index; the next access rebuilds it.
    fn invalidate_index(&mut self);

    fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ChangeEvent) + 'static;

    /// Returns false if the id was not subscribed.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}
