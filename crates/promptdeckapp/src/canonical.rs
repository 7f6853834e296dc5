//! Canonical form of template content.
//!
//! Canonicalization makes two drafts that differ only in incidental formatting
//! compare (and hash) equal:
//!
//! - every text field: internal whitespace runs collapse to one space, ends trimmed
//! - prompt fields and `category`: lowercased
//! - `name`: casing preserved for display
//! - `category`: blank becomes [`DEFAULT_CATEGORY`]
//! - `tags`: trimmed, lowercased, blanks dropped, deduplicated in order of
//!   appearance, capped at [`MAX_TAGS`]
//!
//! The transformation is idempotent. Identity, usage and timestamp fields are
//! not part of a draft and so are never touched.

use std::collections::HashSet;
use std::ops::Deref;

use crate::model::TemplateDraft;

pub const MAX_TAGS: usize = 10;
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// A draft that has been through [`canonicalize`].
///
/// Only this module can construct one, so holding a `CanonicalDraft` is proof
/// the content is in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDraft(TemplateDraft);

impl CanonicalDraft {
    pub fn as_draft(&self) -> &TemplateDraft {
        &self.0
    }

    pub fn into_draft(self) -> TemplateDraft {
        self.0
    }
}

impl Deref for CanonicalDraft {
    type Target = TemplateDraft;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub fn canonicalize(draft: &TemplateDraft) -> CanonicalDraft {
    CanonicalDraft(TemplateDraft {
        name: collapse_whitespace(&draft.name),
        subject: normalize_field(&draft.subject),
        action: normalize_field(&draft.action),
        environment: normalize_field(&draft.environment),
        style: normalize_field(&draft.style),
        lighting: normalize_field(&draft.lighting),
        camera: normalize_field(&draft.camera),
        category: normalize_category(&draft.category),
        tags: normalize_tags(&draft.tags),
    })
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_field(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}

pub fn normalize_category(category: &str) -> String {
    let normalized = normalize_field(category);
    if normalized.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        normalized
    }
}

pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| normalize_tag(t.as_ref()))
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .take(MAX_TAGS)
        .collect()
}

/// Union of two tag lists: `existing` first, then unseen entries of
/// `incoming`, re-capped at [`MAX_TAGS`].
pub fn merge_tags(existing: &[String], incoming: &[String]) -> Vec<String> {
    let combined: Vec<&String> = existing.iter().chain(incoming.iter()).collect();
    normalize_tags(&combined)
}
