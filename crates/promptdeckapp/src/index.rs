//! # Search Index
//!
//! An in-memory, derived, disposable cache over the template collection.
//! It never holds data that cannot be rebuilt from the stored templates.
//!
//! ## Maps
//!
//! ```text
//! terms:      token    -> postings   (tokens of the six prompt fields)
//! tags:       tag      -> postings
//! categories: category -> postings
//! meta:       signature -> record id -> EntryMeta (name, quality, tags, category, text_len, updated_at)
//! ```
//!
//! A posting list maps signature -> multiplicity. Signatures are unique under
//! `upsert`, but the create and import paths may store two records with the
//! same signature; counting occurrences keeps `remove_entry` the exact
//! inverse of `add_entry` in that case too. Meta is kept per record for the
//! same reason, and [`SearchIndex::meta`] reports the most recently updated
//! record of a signature (ties broken by id), so the answer does not depend
//! on the order entries were added.
//!
//! ## Maintenance
//!
//! - [`SearchIndex::build`] indexes a whole collection.
//! - [`SearchIndex::add_entry`] / [`SearchIndex::remove_entry`] patch one
//!   record. A key whose posting list empties is removed from its map, so the
//!   maps never accumulate empty buckets.
//!
//! Callers replacing a record must remove the old version before adding the
//! new one, even when the signature did not change: tags, category and
//! quality can all move independently of it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use uuid::Uuid;

use crate::canonical::{normalize_category, normalize_tag};
use crate::model::{Quality, Template};
use crate::tokenize::tokenize_all;

/// signature -> number of indexed records carrying it.
pub type Postings = BTreeMap<String, usize>;

/// Denormalized summary used for scoring without touching the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    pub name: String,
    pub quality: Quality,
    pub tags: Vec<String>,
    pub category: String,
    pub text_len: usize,
    pub updated_at: DateTime<Utc>,
}

impl EntryMeta {
    fn of(template: &Template) -> Self {
        Self {
            name: template.name.clone(),
            quality: template.quality,
            tags: template.tags.iter().map(|t| normalize_tag(t)).collect(),
            category: normalize_category(&template.category),
            text_len: template.field_text().chars().count(),
            updated_at: template.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub entries: usize,
    pub terms: usize,
    pub tags: usize,
    pub categories: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchIndex {
    terms: HashMap<String, Postings>,
    tags: HashMap<String, Postings>,
    categories: HashMap<String, Postings>,
    meta: HashMap<String, BTreeMap<Uuid, EntryMeta>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(templates: &[Template]) -> Self {
        let mut index = Self::new();
        for template in templates {
            index.add_entry(template);
        }
        tracing::debug!(
            templates = templates.len(),
            terms = index.terms.len(),
            "search index built"
        );
        index
    }

    pub fn add_entry(&mut self, template: &Template) {
        let sig = template.signature.as_str();
        if sig.is_empty() {
            return;
        }
        for term in tokenize_all(template.prompt_fields()) {
            post(&mut self.terms, term, sig);
        }
        let entry = EntryMeta::of(template);
        for tag in &entry.tags {
            post(&mut self.tags, tag.clone(), sig);
        }
        post(&mut self.categories, entry.category.clone(), sig);

        self.meta
            .entry(sig.to_string())
            .or_default()
            .insert(template.id, entry);
    }

    pub fn remove_entry(&mut self, template: &Template) {
        let sig = template.signature.as_str();
        if sig.is_empty() {
            return;
        }
        for term in tokenize_all(template.prompt_fields()) {
            unpost(&mut self.terms, &term, sig);
        }
        for tag in &template.tags {
            unpost(&mut self.tags, &normalize_tag(tag), sig);
        }
        unpost(&mut self.categories, &normalize_category(&template.category), sig);

        if let Some(records) = self.meta.get_mut(sig) {
            records.remove(&template.id);
            if records.is_empty() {
                self.meta.remove(sig);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meta.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meta.len()
    }

    pub fn meta(&self, signature: &str) -> Option<&EntryMeta> {
        self.meta.get(signature)?
            .iter()
            .max_by(|(a_id, a), (b_id, b)| {
                a.updated_at.cmp(&b.updated_at).then_with(|| a_id.cmp(b_id))
            })
            .map(|(_, meta)| meta)
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.meta.contains_key(signature)
    }

    /// Every indexed signature.
    pub fn universe(&self) -> BTreeSet<String> {
        self.meta.keys().cloned().collect()
    }

    pub fn term_postings(&self, term: &str) -> Option<&Postings> {
        self.terms.get(term)
    }

    pub fn tag_postings(&self, tag: &str) -> Option<&Postings> {
        self.tags.get(tag)
    }

    pub fn category_postings(&self, category: &str) -> Option<&Postings> {
        self.categories.get(category)
    }

    pub fn has_term(&self, term: &str, signature: &str) -> bool {
        self.terms
            .get(term)
            .is_some_and(|p| p.contains_key(signature))
    }

    /// Tag -> number of distinct signatures carrying it, sorted by tag.
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        sorted_counts(&self.tags)
    }

    /// Category -> number of distinct signatures in it, sorted by category.
    pub fn category_counts(&self) -> Vec<(String, usize)> {
        sorted_counts(&self.categories)
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entries: self.meta.len(),
            terms: self.terms.len(),
            tags: self.tags.len(),
            categories: self.categories.len(),
        }
    }
}

fn post(map: &mut HashMap<String, Postings>, key: String, sig: &str) {
    *map.entry(key)
        .or_default()
        .entry(sig.to_string())
        .or_insert(0) += 1;
}

fn unpost(map: &mut HashMap<String, Postings>, key: &str, sig: &str) {
    let Some(postings) = map.get_mut(key) else {
        return;
    };
    if let Some(count) = postings.get_mut(sig) {
        *count -= 1;
        if *count == 0 {
            postings.remove(sig);
        }
    }
    if postings.is_empty() {
        map.remove(key);
    }
}

fn sorted_counts(map: &HashMap<String, Postings>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = map.iter().map(|(k, p)| (k.clone(), p.len())).collect();
    counts.sort();
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::canonicalize;
    use crate::model::TemplateDraft;
    use crate::signature::signature;

    fn template(name: &str, subject: &str, tags: &[&str], category: &str) -> Template {
        let draft = TemplateDraft::new(name, subject)
            .with_style("oil painting")
            .with_category(category)
            .with_tags(tags.iter().copied());
        let canonical = canonicalize(&draft);
        let sig = signature(&canonical).unwrap();
        Template::from_canonical(&canonical, sig, Quality::Green)
    }

    #[test]
    fn build_populates_all_maps() {
        let t = template("Harbor", "a red boat", &["sea"], "Marine");
        let index = SearchIndex::build(std::slice::from_ref(&t));
        assert!(index.has_term("red", &t.signature));
        assert!(index.has_term("boat", &t.signature));
        assert!(index.has_term("oil", &t.signature));
        assert!(!index.has_term("a", &t.signature));
        assert!(index.tag_postings("sea").unwrap().contains_key(&t.signature));
        assert!(index
            .category_postings("marine")
            .unwrap()
            .contains_key(&t.signature));
        let meta = index.meta(&t.signature).unwrap();
        assert_eq!(meta.name, "Harbor");
        assert_eq!(meta.text_len, "a red boat oil painting".len());
    }

    #[test]
    fn add_then_remove_restores_previous_state() {
        let a = template("Harbor", "a red boat", &["sea"], "marine");
        let b = template("Forest", "a red fox", &["woods", "sea"], "nature");
        let mut index = SearchIndex::build(std::slice::from_ref(&a));
        let before = index.clone();

        index.add_entry(&b);
        assert_ne!(index, before);
        index.remove_entry(&b);

        assert_eq!(index, before);
        assert!(index.term_postings("fox").is_none());
        assert!(index.tag_postings("woods").is_none());
        assert!(index.category_postings("nature").is_none());
    }

    #[test]
    fn removing_last_entry_leaves_no_empty_buckets() {
        let a = template("Harbor", "a red boat", &["sea"], "marine");
        let mut index = SearchIndex::build(std::slice::from_ref(&a));
        index.remove_entry(&a);
        assert_eq!(index, SearchIndex::new());
        assert_eq!(index.stats(), IndexStats::default());
    }

    #[test]
    fn duplicate_signatures_are_counted() {
        let a = template("Harbor", "a red boat", &["sea"], "marine");
        let mut dup = a.clone();
        dup.id = Uuid::new_v4();
        let mut index = SearchIndex::build(&[a.clone(), dup.clone()]);
        assert_eq!(index.len(), 1);

        index.remove_entry(&a);
        assert!(index.has_term("boat", &a.signature));
        assert!(index.contains(&a.signature));

        index.remove_entry(&dup);
        assert!(index.is_empty());
    }

    #[test]
    fn removing_a_duplicate_matches_a_fresh_build() {
        let plain = template("Harbor", "a red boat", &[], "marine");
        let mut tagged = plain.clone();
        tagged.id = Uuid::new_v4();
        tagged.tags = vec!["night".to_string()];
        tagged.quality = Quality::Amber;
        tagged.updated_at = plain.updated_at + chrono::Duration::seconds(5);

        let mut index = SearchIndex::build(&[plain.clone(), tagged.clone()]);
        assert_eq!(index.meta(&plain.signature).unwrap().tags, vec!["night"]);

        index.remove_entry(&tagged);
        assert_eq!(index, SearchIndex::build(std::slice::from_ref(&plain)));
        let meta = index.meta(&plain.signature).unwrap();
        assert!(meta.tags.is_empty());
        assert_eq!(meta.quality, Quality::Green);
        assert_eq!(meta.updated_at, plain.updated_at);
        assert!(index.tag_postings("night").is_none());
    }

    #[test]
    fn duplicate_meta_does_not_depend_on_insertion_order() {
        let older = template("Harbor", "a red boat", &["sea"], "marine");
        let mut newer = older.clone();
        newer.id = Uuid::new_v4();
        newer.tags = vec!["night".to_string()];
        newer.updated_at = older.updated_at + chrono::Duration::seconds(5);

        let forward = SearchIndex::build(&[older.clone(), newer.clone()]);
        let backward = SearchIndex::build(&[newer.clone(), older.clone()]);
        assert_eq!(forward, backward);
        assert_eq!(forward.meta(&older.signature).unwrap().tags, vec!["night"]);
    }

    #[test]
    fn blank_category_indexes_as_default() {
        let mut t = template("Harbor", "a red boat", &[], "");
        t.category = String::new();
        let index = SearchIndex::build(&[t]);
        assert_eq!(index.category_counts(), vec![("uncategorized".to_string(), 1)]);
    }

    #[test]
    fn entries_without_signature_are_ignored() {
        let mut t = template("Harbor", "a red boat", &[], "");
        t.signature.clear();
        let index = SearchIndex::build(&[t]);
        assert!(index.is_empty());
        assert_eq!(index.stats().terms, 0);
    }

    #[test]
    fn tag_counts_are_sorted() {
        let a = template("Harbor", "a red boat", &["sea", "boats"], "marine");
        let b = template("Forest", "a red fox", &["sea"], "nature");
        let index = SearchIndex::build(&[a, b]);
        assert_eq!(
            index.tag_counts(),
            vec![("boats".to_string(), 1), ("sea".to_string(), 2)]
        );
    }
}
