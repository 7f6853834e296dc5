//! # Search and Ranking
//!
//! Runs a [`SearchQuery`] against a [`SearchIndex`] and returns scored hits.
//!
//! ## Candidate Generation
//!
//! 1. Text: the query is tokenized; a candidate must appear under **every**
//!    query term (posting lists are intersected, smallest first).
//! 2. Tags: a candidate must carry **every** selected tag.
//! 3. Category: unless absent, blank or the sentinel `"All"`, a candidate must
//!    be in that category.
//! 4. With none of the above, every indexed signature is a candidate.
//! 5. Quality floor: `Green` keeps only green, `Amber` drops red.
//!
//! ## Scoring
//!
//! ```text
//! score = 0.6 * text      fraction of query terms present (neutral 0.5 with no query text)
//!       + tags            0.1 per matched selected tag, capped at 0.2
//!       + 0.1             if the candidate is in the selected category
//!       + 0.1 * quality   green 1.0, amber 0.5, red 0.0
//!       + brevity         up to 0.02 for text shorter than the candidate average
//! ```
//!
//! The sum is clamped to `[0, 1]`. Hits below the minimum score are dropped;
//! the rest sort by score, then most recently updated, then signature.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::canonical::{normalize_category, normalize_tags};
use crate::index::{Postings, SearchIndex};
use crate::model::Quality;
use crate::tokenize::tokenize;

pub const TEXT_WEIGHT: f64 = 0.6;
pub const TAG_CREDIT: f64 = 0.1;
pub const TAG_WEIGHT: f64 = 0.2;
pub const CATEGORY_WEIGHT: f64 = 0.1;
pub const QUALITY_WEIGHT: f64 = 0.1;
pub const NEUTRAL_TEXT_SCORE: f64 = 0.5;
pub const BREVITY_NUDGE: f64 = 0.02;
pub const DEFAULT_MIN_SCORE: f64 = 0.15;
pub const DEFAULT_LIMIT: usize = 50;

/// Category filter value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub min_quality: Option<Quality>,
    pub limit: Option<usize>,
}

impl SearchQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_min_quality(mut self, quality: Quality) -> Self {
        self.min_quality = Some(quality);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub signature: String,
    pub score: f64,
    pub name: String,
    pub quality: Quality,
    pub category: String,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

/// Scoring thresholds. `Default` uses [`DEFAULT_MIN_SCORE`] and [`DEFAULT_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranker {
    pub min_score: f64,
    pub default_limit: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

/// Ranks with the default thresholds.
pub fn search(index: &SearchIndex, query: &SearchQuery) -> Vec<SearchHit> {
    Ranker::default().rank(index, query)
}

impl Ranker {
    pub fn rank(&self, index: &SearchIndex, query: &SearchQuery) -> Vec<SearchHit> {
        let terms: Vec<String> = query
            .text
            .as_deref()
            .map(tokenize)
            .unwrap_or_default()
            .into_iter()
            .collect();
        let tags = normalize_tags(&query.tags);
        let category = query
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES))
            .map(normalize_category);

        let mut candidates: Option<BTreeSet<String>> = None;
        if !terms.is_empty() {
            let lists: Vec<Option<&Postings>> =
                terms.iter().map(|t| index.term_postings(t)).collect();
            candidates = Some(intersect(&lists));
        }
        for tag in &tags {
            narrow(&mut candidates, index.tag_postings(tag));
        }
        if let Some(category) = &category {
            narrow(&mut candidates, index.category_postings(category));
        }

        let floor = query.min_quality;
        let candidates: Vec<String> = candidates
            .unwrap_or_else(|| index.universe())
            .into_iter()
            .filter(|sig| match (floor, index.meta(sig)) {
                (_, None) => false,
                (None, Some(_)) => true,
                (Some(min), Some(meta)) => meta.quality >= min,
            })
            .collect();
        if candidates.is_empty() {
            return Vec::new();
        }

        let avg_len = candidates
            .iter()
            .filter_map(|sig| index.meta(sig))
            .map(|m| m.text_len as f64)
            .sum::<f64>()
            / candidates.len() as f64;

        let mut hits: Vec<SearchHit> = candidates
            .into_iter()
            .filter_map(|sig| {
                let meta = index.meta(&sig)?;

                let text_score = if terms.is_empty() {
                    NEUTRAL_TEXT_SCORE
                } else {
                    let matched = terms.iter().filter(|t| index.has_term(t, &sig)).count();
                    matched as f64 / terms.len() as f64
                };
                let matched_tags = tags.iter().filter(|t| meta.tags.contains(t)).count();
                let tag_score = (matched_tags as f64 * TAG_CREDIT).min(TAG_WEIGHT);
                let category_score = match &category {
                    Some(c) if *c == meta.category => CATEGORY_WEIGHT,
                    _ => 0.0,
                };
                let quality_score = QUALITY_WEIGHT * meta.quality.weight();
                let brevity = if avg_len > 0.0 && (meta.text_len as f64) < avg_len {
                    BREVITY_NUDGE * (1.0 - meta.text_len as f64 / avg_len)
                } else {
                    0.0
                };

                let score = (TEXT_WEIGHT * text_score
                    + tag_score
                    + category_score
                    + quality_score
                    + brevity)
                    .clamp(0.0, 1.0);

                Some(SearchHit {
                    score,
                    name: meta.name.clone(),
                    quality: meta.quality,
                    category: meta.category.clone(),
                    tags: meta.tags.clone(),
                    updated_at: meta.updated_at,
                    signature: sig,
                })
            })
            .filter(|hit| hit.score >= self.min_score)
            .collect();

        hits.sort_by(compare_hits);
        hits.truncate(query.limit.unwrap_or(self.default_limit));
        hits
    }
}

fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.updated_at.cmp(&a.updated_at))
        .then_with(|| a.signature.cmp(&b.signature))
}

/// Intersection of posting lists; any missing list empties the result.
fn intersect(lists: &[Option<&Postings>]) -> BTreeSet<String> {
    let mut present: Vec<&Postings> = match lists.iter().copied().collect::<Option<Vec<_>>>() {
        Some(present) => present,
        None => return BTreeSet::new(),
    };
    present.sort_by_key(|p| p.len());
    let Some((smallest, rest)) = present.split_first() else {
        return BTreeSet::new();
    };
    smallest
        .keys()
        .filter(|sig| rest.iter().all(|p| p.contains_key(*sig)))
        .cloned()
        .collect()
}

fn narrow(candidates: &mut Option<BTreeSet<String>>, postings: Option<&Postings>) {
    let allowed: BTreeSet<String> = postings
        .map(|p| p.keys().cloned().collect())
        .unwrap_or_default();
    match candidates {
        Some(set) => set.retain(|sig| allowed.contains(sig)),
        None => *candidates = Some(allowed),
    }
}
