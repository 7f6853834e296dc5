//! # Command Layer
//!
//! This module contains the **core business logic** of promptdeck. Each command
//! lives in its own submodule and implements plain Rust functions over a
//! [`DataStore`](crate::store::DataStore).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Canonicalize, sign and lint drafts before anything is stored
//! - Decide between merge and create (`upsert`), patch and replace (`update`)
//! - Return structured results with affected templates and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Blob I/O**: the store owns persistence and the index cache
//! - **Argument parsing**: That's the CLI layer's job
//! - **Rendering**: no stdout, colors or time formatting
//!
//! ## Structured Returns
//!
//! Most commands return [`CmdResult`]:
//! - `affected`: templates created or modified by the call
//! - `listed`: templates to display
//! - `hits`: ranked search hits (search only)
//! - `messages`: leveled messages (info, success, warning, error)
//! - `persisted`: false when the blob write failed and the change lives only
//!   in memory
//!
//! `upsert` and `import` return richer types ([`upsert::UpsertResult`],
//! [`import::ImportSummary`]) because callers branch on their outcome.
//!
//! ## Save Gate
//!
//! Every user-facing save (`create`, `upsert`, content edits through
//! `update`, `derive_variant`) lints the canonical draft first. A RED grade
//! aborts with [`PromptDeckError::Rejected`](crate::error::PromptDeckError)
//! and nothing is stored; AMBER saves with a warning message. Import, seeding
//! and migration are not gated.
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests use
//! `InMemoryStore` and the fixtures in `store::memory::fixtures`.
//!
//! ## Command Modules
//!
//! - [`get`]: list, show, pinned
//! - [`create`]: create (duplicates allowed) and derive variants
//! - [`upsert`]: create-or-merge by signature
//! - [`update`]: patch by id, single and bulk
//! - [`delete`]: delete by id, single and bulk
//! - [`pinning`]: pinned and favorite flags
//! - [`usage`]: usage and render-success counters
//! - [`best_of`]: usage/success ranking
//! - [`search`]: faceted search through the index
//! - [`export`] / [`import`]: JSON interchange
//! - [`tags`]: tag and category catalogue
//! - [`reindex`]: index rebuild and stats

use crate::error::{PromptDeckError, Result};
use crate::lint::{lint, LintReport};
use crate::model::{Quality, Template};
use crate::search::SearchHit;
use crate::store::Durability;
use serde::Serialize;

pub mod best_of;
pub mod create;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod pinning;
pub mod reindex;
pub mod search;
pub mod tags;
pub mod update;
pub mod upsert;
pub mod usage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmdResult {
    pub affected: Vec<Template>,
    pub listed: Vec<Template>,
    pub hits: Vec<SearchHit>,
    pub messages: Vec<CmdMessage>,
    pub persisted: bool,
}

impl Default for CmdResult {
    fn default() -> Self {
        Self {
            affected: Vec::new(),
            listed: Vec::new(),
            hits: Vec::new(),
            messages: Vec::new(),
            persisted: true,
        }
    }
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_listed(mut self, templates: Vec<Template>) -> Self {
        self.listed = templates;
        self
    }

    /// Records the outcome of a blob write. A failed write adds a warning.
    pub fn note_durability(&mut self, durability: &Durability) {
        if let Durability::Unsaved(reason) = durability {
            self.persisted = false;
            self.add_message(CmdMessage::warning(format!(
                "Changes are kept in memory but were not saved: {}",
                reason
            )));
        }
    }
}

/// Lints a canonical draft for saving. RED is an error; AMBER issues are
/// returned as warning messages alongside the report.
pub(crate) fn gate(draft: &crate::model::TemplateDraft) -> Result<(LintReport, Vec<CmdMessage>)> {
    let report = lint(draft);
    if report.quality == Quality::Red {
        return Err(PromptDeckError::Rejected {
            issues: report.messages(),
        });
    }
    let warnings = report
        .issues
        .iter()
        .map(|issue| CmdMessage::warning(issue.message.clone()))
        .collect();
    Ok((report, warnings))
}
