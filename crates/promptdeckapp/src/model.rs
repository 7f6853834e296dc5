//! # Domain Model: Templates, Drafts and Patches
//!
//! This module defines the core data structures for promptdeck: [`Template`],
//! [`TemplateDraft`], [`TemplatePatch`] and the [`Quality`] grade.
//!
//! ## Three Shapes of a Template
//!
//! ```text
//! TemplateDraft  <-- what a UI hands us: raw, user-typed content fields
//! CanonicalDraft <-- the draft after canonicalization (see canonical.rs)
//! Template       <-- a stored record: canonical content + identity + usage
//! ```
//!
//! A draft carries only content (`name`, the six prompt fields, `category`,
//! `tags`). Identity (`id`, `signature`), usage counters and timestamps belong
//! to the stored [`Template`] and are never taken from a draft.
//!
//! ## Merging
//!
//! There are two ways content lands on an existing record, and they differ in
//! how they treat tags:
//!
//! - [`Template::replace_content`]: the `update` path. Tags are replaced.
//! - [`Template::merge_content`]: the `upsert` path. Tags are the union of old
//!   and new.
//!
//! Both preserve `id`, `created_at`, usage counters and the favorite/pinned
//! flags, and both advance `updated_at` via [`next_timestamp`].
//!
//! ## Import Records
//!
//! [`ImportRecord`] is the tolerant shape used for JSON import and legacy
//! migration: every field is optional and missing ones are backfilled.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::canonical::{canonicalize, merge_tags, CanonicalDraft};
use crate::error::Result;
use crate::lint::lint;
use crate::signature::signature;

/// Tri-level lint grade. Ordered `Red < Amber < Green`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Quality {
    #[serde(alias = "red", alias = "RED")]
    Red,
    #[serde(alias = "amber", alias = "AMBER")]
    Amber,
    #[serde(alias = "green", alias = "GREEN")]
    Green,
}

impl Default for Quality {
    fn default() -> Self {
        Self::Amber
    }
}

impl Quality {
    /// Weight used by the best-of ranking.
    pub fn weight(self) -> f64 {
        match self {
            Quality::Green => 1.0,
            Quality::Amber => 0.5,
            Quality::Red => 0.0,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quality::Green => "green",
            Quality::Amber => "amber",
            Quality::Red => "red",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for Quality {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "green" => Ok(Quality::Green),
            "amber" => Ok(Quality::Amber),
            "red" => Ok(Quality::Red),
            other => Err(format!("unknown quality grade '{}'", other)),
        }
    }
}

/// Content fields of a template, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub name: String,
    pub subject: String,
    pub action: String,
    pub environment: String,
    pub style: String,
    pub lighting: String,
    pub camera: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl TemplateDraft {
    pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subject: subject.into(),
            ..Default::default()
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_lighting(mut self, lighting: impl Into<String>) -> Self {
        self.lighting = lighting.into();
        self
    }

    pub fn with_camera(mut self, camera: impl Into<String>) -> Self {
        self.camera = camera.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// The six descriptive prompt fields, in display order.
    pub fn prompt_fields(&self) -> [&str; 6] {
        [
            &self.subject,
            &self.action,
            &self.environment,
            &self.style,
            &self.lighting,
            &self.camera,
        ]
    }
}

/// A saved, reusable prompt definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub signature: String,
    pub name: String,
    pub subject: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub lighting: String,
    #[serde(default)]
    pub camera: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub render_success_count: u32,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub variant_of: Option<String>,
}

impl Template {
    /// Builds a fresh record with a new id and zeroed usage counters.
    pub fn from_canonical(canonical: &CanonicalDraft, signature: String, quality: Quality) -> Self {
        let now = Utc::now();
        let draft = canonical.as_draft();
        Self {
            id: Uuid::new_v4(),
            signature,
            name: draft.name.clone(),
            subject: draft.subject.clone(),
            action: draft.action.clone(),
            environment: draft.environment.clone(),
            style: draft.style.clone(),
            lighting: draft.lighting.clone(),
            camera: draft.camera.clone(),
            category: draft.category.clone(),
            tags: draft.tags.clone(),
            favorite: false,
            pinned: false,
            usage_count: 0,
            render_success_count: 0,
            last_used: None,
            created_at: now,
            updated_at: now,
            quality,
            thumbnail: None,
            variant_of: None,
        }
    }

    /// The content fields of this record as a draft.
    pub fn draft(&self) -> TemplateDraft {
        TemplateDraft {
            name: self.name.clone(),
            subject: self.subject.clone(),
            action: self.action.clone(),
            environment: self.environment.clone(),
            style: self.style.clone(),
            lighting: self.lighting.clone(),
            camera: self.camera.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn prompt_fields(&self) -> [&str; 6] {
        [
            &self.subject,
            &self.action,
            &self.environment,
            &self.style,
            &self.lighting,
            &self.camera,
        ]
    }

    /// Concatenation of the six prompt fields, space separated, skipping blanks.
    pub fn field_text(&self) -> String {
        self.prompt_fields()
            .iter()
            .filter(|f| !f.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Overwrites content fields and replaces tags (the `update` path).
    pub fn replace_content(&mut self, canonical: &CanonicalDraft, signature: String, quality: Quality) {
        self.assign_fields(canonical);
        self.tags = canonical.tags.clone();
        self.signature = signature;
        self.quality = quality;
        self.touch();
    }

    /// Overwrites content fields and unions tags (the `upsert` path).
    pub fn merge_content(&mut self, canonical: &CanonicalDraft, signature: String, quality: Quality) {
        self.assign_fields(canonical);
        self.tags = merge_tags(&self.tags, &canonical.tags);
        self.signature = signature;
        self.quality = quality;
        self.touch();
    }

    /// Advances `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = next_timestamp(self.updated_at);
    }

    fn assign_fields(&mut self, canonical: &CanonicalDraft) {
        let draft = canonical.as_draft();
        self.name = draft.name.clone();
        self.subject = draft.subject.clone();
        self.action = draft.action.clone();
        self.environment = draft.environment.clone();
        self.style = draft.style.clone();
        self.lighting = draft.lighting.clone();
        self.camera = draft.camera.clone();
        self.category = draft.category.clone();
    }
}

/// Returns "now", or one millisecond past `previous` when the clock has not
/// moved forward (same tick, or clock skew).
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

/// A typed partial update.
///
/// Content fields that are `Some` replace the record's value; `tags`, when
/// present, replaces the whole tag set. Identity, `created_at` and usage
/// counters are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplatePatch {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub action: Option<String>,
    pub environment: Option<String>,
    pub style: Option<String>,
    pub lighting: Option<String>,
    pub camera: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
    pub pinned: Option<bool>,
    pub thumbnail: Option<String>,
}

impl TemplatePatch {
    pub fn is_empty(&self) -> bool {
        *self == TemplatePatch::default()
    }

    /// Applies the content half of the patch onto a draft.
    pub fn apply_to_draft(&self, draft: &mut TemplateDraft) {
        let fields: [(&Option<String>, &mut String); 8] = [
            (&self.name, &mut draft.name),
            (&self.subject, &mut draft.subject),
            (&self.action, &mut draft.action),
            (&self.environment, &mut draft.environment),
            (&self.style, &mut draft.style),
            (&self.lighting, &mut draft.lighting),
            (&self.camera, &mut draft.camera),
            (&self.category, &mut draft.category),
        ];
        for (patch, target) in fields {
            if let Some(value) = patch {
                *target = value.clone();
            }
        }
        if let Some(tags) = &self.tags {
            draft.tags = tags.clone();
        }
    }

    /// Applies the flag half of the patch (favorite, pinned, thumbnail).
    pub fn apply_flags(&self, template: &mut Template) {
        if let Some(favorite) = self.favorite {
            template.favorite = favorite;
        }
        if let Some(pinned) = self.pinned {
            template.pinned = pinned;
        }
        if let Some(thumbnail) = &self.thumbnail {
            template.thumbnail = Some(thumbnail.clone());
        }
    }
}

/// Tolerant import shape: any field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRecord {
    pub id: Option<String>,
    pub signature: Option<String>,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub action: Option<String>,
    pub environment: Option<String>,
    pub style: Option<String>,
    pub lighting: Option<String>,
    pub camera: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub favorite: Option<bool>,
    pub pinned: Option<bool>,
    pub usage_count: Option<u32>,
    pub render_success_count: Option<u32>,
    pub last_used: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub quality: Option<Quality>,
    pub thumbnail: Option<String>,
    pub variant_of: Option<String>,
}

/// Legacy storage entry: a display name paired with a template-shaped payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntry {
    pub name: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

const MAX_DERIVED_NAME_CHARS: usize = 60;

impl ImportRecord {
    /// Turns the record into a stored template, backfilling defaults.
    ///
    /// Returns `Ok(None)` when the record has no usable `subject`. A signature
    /// carried by the record is trusted as-is; otherwise one is computed.
    pub fn into_template(self) -> Result<Option<Template>> {
        let subject = match self.subject.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Ok(None),
        };
        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => subject.chars().take(MAX_DERIVED_NAME_CHARS).collect(),
        };

        let draft = TemplateDraft {
            name,
            subject,
            action: self.action.unwrap_or_default(),
            environment: self.environment.unwrap_or_default(),
            style: self.style.unwrap_or_default(),
            lighting: self.lighting.unwrap_or_default(),
            camera: self.camera.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
        };
        let canonical = canonicalize(&draft);
        let signature = match self.signature.filter(|s| !s.trim().is_empty()) {
            Some(trusted) => trusted,
            None => signature(&canonical)?,
        };
        let quality = self.quality.unwrap_or_else(|| lint(&canonical).quality);

        let mut template = Template::from_canonical(&canonical, signature, quality);
        if let Some(id) = self.id.as_deref().and_then(|s| Uuid::parse_str(s).ok()) {
            template.id = id;
        }
        if let Some(created_at) = self.created_at {
            template.created_at = created_at;
        }
        template.updated_at = self
            .updated_at
            .unwrap_or(template.created_at)
            .max(template.created_at);
        template.favorite = self.favorite.unwrap_or(false);
        template.pinned = self.pinned.unwrap_or(false);
        template.usage_count = self.usage_count.unwrap_or(0);
        template.render_success_count = self.render_success_count.unwrap_or(0);
        template.last_used = self.last_used;
        template.thumbnail = self.thumbnail;
        template.variant_of = self.variant_of;
        Ok(Some(template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Template {
        let draft = TemplateDraft::new("Neon Alley", "A cyborg")
            .with_style("cyberpunk")
            .with_tags(["night", "neon"]);
        let canonical = canonicalize(&draft);
        let sig = signature(&canonical).unwrap();
        Template::from_canonical(&canonical, sig, Quality::Amber)
    }

    #[test]
    fn quality_orders_red_below_green() {
        assert!(Quality::Red < Quality::Amber);
        assert!(Quality::Amber < Quality::Green);
        assert_eq!(Quality::default(), Quality::Amber);
    }

    #[test]
    fn quality_parses_case_insensitively() {
        assert_eq!("GREEN".parse::<Quality>().unwrap(), Quality::Green);
        assert_eq!(" amber ".parse::<Quality>().unwrap(), Quality::Amber);
        assert!("blue".parse::<Quality>().is_err());
    }

    #[test]
    fn template_serializes_camel_case() {
        let t = sample();
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("usageCount").is_some());
        assert!(json.get("renderSuccessCount").is_some());
        assert!(json.get("variantOf").is_some());
        assert_eq!(json["quality"], "Amber");
    }

    #[test]
    fn replace_content_replaces_tags() {
        let mut t = sample();
        let next = canonicalize(&t.draft().with_tags(["day"]));
        t.replace_content(&next, "sig".into(), Quality::Green);
        assert_eq!(t.tags, vec!["day"]);
        assert_eq!(t.quality, Quality::Green);
    }

    #[test]
    fn merge_content_unions_tags() {
        let mut t = sample();
        let next = canonicalize(&t.draft().with_tags(["day", "neon"]));
        t.merge_content(&next, "sig".into(), Quality::Green);
        assert_eq!(t.tags, vec!["night", "neon", "day"]);
    }

    #[test]
    fn content_changes_preserve_identity_and_advance_updated_at() {
        let mut t = sample();
        t.usage_count = 4;
        let (id, created, updated) = (t.id, t.created_at, t.updated_at);
        let next = canonicalize(&t.draft().with_action("running"));
        t.merge_content(&next, "sig".into(), Quality::Green);
        assert_eq!(t.id, id);
        assert_eq!(t.created_at, created);
        assert_eq!(t.usage_count, 4);
        assert!(t.updated_at > updated);
    }

    #[test]
    fn next_timestamp_moves_past_future_value() {
        let future = Utc::now() + Duration::hours(1);
        assert!(next_timestamp(future) > future);
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut draft = TemplateDraft::new("Name", "subject").with_style("oil");
        let patch = TemplatePatch {
            style: Some("watercolor".into()),
            tags: Some(vec!["soft".into()]),
            ..Default::default()
        };
        patch.apply_to_draft(&mut draft);
        assert_eq!(draft.name, "Name");
        assert_eq!(draft.style, "watercolor");
        assert_eq!(draft.tags, vec!["soft"]);
    }

    #[test]
    fn import_record_backfills_defaults() {
        let record: ImportRecord =
            serde_json::from_str(r#"{"subject": "A lighthouse", "style": "Oil Painting"}"#)
                .unwrap();
        let t = record.into_template().unwrap().unwrap();
        assert_eq!(t.name, "A lighthouse");
        assert_eq!(t.style, "oil painting");
        assert_eq!(t.category, "uncategorized");
        assert_eq!(t.usage_count, 0);
        assert_eq!(t.signature.len(), 64);
    }

    #[test]
    fn import_record_without_subject_is_skipped() {
        let record: ImportRecord = serde_json::from_str(r#"{"name": "Nothing"}"#).unwrap();
        assert!(record.into_template().unwrap().is_none());
    }

    #[test]
    fn import_record_trusts_carried_signature_and_id() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"id": "{}", "signature": "abc", "subject": "x", "usageCount": 7, "quality": "green"}}"#,
            id
        );
        let record: ImportRecord = serde_json::from_str(&json).unwrap();
        let t = record.into_template().unwrap().unwrap();
        assert_eq!(t.id, id);
        assert_eq!(t.signature, "abc");
        assert_eq!(t.usage_count, 7);
        assert_eq!(t.quality, Quality::Green);
    }
}
