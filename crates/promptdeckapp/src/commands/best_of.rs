//! Best-of ranking: which templates actually produce good renders.
//!
//! ```text
//! ratio       = min(successes / max(usage, 1), 1)
//! successNorm = ratio / max ratio among candidates
//! usageNorm   = usage / max usage among candidates
//! score       = 0.6 * successNorm + 0.3 * usageNorm + 0.1 * quality weight
//! ```
//!
//! Normalizing the success *ratio* rather than the raw success count keeps a
//! heavily used template with few good renders from outranking a rarely used
//! one that always delivers. Candidates need at least `min_uses` uses. Ties go
//! to the most recently updated template.

use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::Template;
use crate::store::DataStore;

pub const SUCCESS_WEIGHT: f64 = 0.6;
pub const USAGE_WEIGHT: f64 = 0.3;
pub const QUALITY_WEIGHT: f64 = 0.1;

pub fn run<S: DataStore>(store: &mut S, limit: usize, min_uses: u32) -> Result<CmdResult> {
    let ranked = rank(store.templates()?, limit, min_uses);
    let listed = ranked.into_iter().map(|(t, _)| t.clone()).collect();
    Ok(CmdResult::default().with_listed(listed))
}

/// Scored candidates, best first.
pub fn rank(templates: &[Template], limit: usize, min_uses: u32) -> Vec<(&Template, f64)> {
    let candidates: Vec<&Template> = templates
        .iter()
        .filter(|t| t.usage_count >= min_uses)
        .collect();

    let ratio = |t: &Template| {
        (t.render_success_count as f64 / t.usage_count.max(1) as f64).min(1.0)
    };
    let max_ratio = candidates.iter().map(|t| ratio(*t)).fold(0.0, f64::max);
    let max_usage = candidates.iter().map(|t| t.usage_count).max().unwrap_or(0);

    let mut scored: Vec<(&Template, f64)> = candidates
        .into_iter()
        .map(|t| {
            let success_norm = if max_ratio > 0.0 {
                ratio(t) / max_ratio
            } else {
                0.0
            };
            let usage_norm = if max_usage > 0 {
                t.usage_count as f64 / max_usage as f64
            } else {
                0.0
            };
            let score = SUCCESS_WEIGHT * success_norm
                + USAGE_WEIGHT * usage_norm
                + QUALITY_WEIGHT * t.quality.weight();
            (t, score)
        })
        .collect();

    scored.sort_by(|(a, sa), (b, sb)| {
        sb.total_cmp(sa)
            .then_with(|| b.updated_at.cmp(&a.updated_at))
    });
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Quality;
    use crate::store::memory::fixtures::StoreFixture;

    fn names(result: &CmdResult) -> Vec<&str> {
        result.listed.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn success_ratio_beats_raw_usage() {
        let mut fixture = StoreFixture::new()
            .with_usage("Reliable", 10, 8, Quality::Green)
            .with_usage("Popular Flop", 10, 2, Quality::Red)
            .with_usage("Rare Gem", 1, 1, Quality::Amber);

        let result = run(&mut fixture.store, 5, 1).unwrap();
        assert_eq!(names(&result), vec!["Reliable", "Rare Gem", "Popular Flop"]);
    }

    #[test]
    fn scores_follow_the_weights() {
        let fixture = StoreFixture::new()
            .with_usage("Reliable", 10, 8, Quality::Green)
            .with_usage("Popular Flop", 10, 2, Quality::Red)
            .with_usage("Rare Gem", 1, 1, Quality::Amber);
        let mut store = fixture.store;
        let ranked = rank(store.templates().unwrap(), 5, 1);
        let scores: Vec<f64> = ranked.iter().map(|(_, s)| *s).collect();
        assert!((scores[0] - 0.88).abs() < 1e-9);
        assert!((scores[1] - 0.68).abs() < 1e-9);
        assert!((scores[2] - 0.42).abs() < 1e-9);
    }

    #[test]
    fn min_uses_and_limit() {
        let mut fixture = StoreFixture::new()
            .with_usage("Unused", 0, 0, Quality::Green)
            .with_usage("Once", 1, 0, Quality::Green)
            .with_usage("Often", 5, 5, Quality::Green);

        let result = run(&mut fixture.store, 5, 1).unwrap();
        assert_eq!(names(&result), vec!["Often", "Once"]);

        let result = run(&mut fixture.store, 1, 1).unwrap();
        assert_eq!(names(&result), vec!["Often"]);

        let result = run(&mut fixture.store, 5, 0).unwrap();
        assert_eq!(result.listed.len(), 3);
    }

    #[test]
    fn empty_collection() {
        let mut fixture = StoreFixture::new();
        assert!(run(&mut fixture.store, 5, 1).unwrap().listed.is_empty());
    }

    #[test]
    fn successes_above_usage_are_capped() {
        let mut fixture = StoreFixture::new()
            .with_usage("Odd", 1, 5, Quality::Amber)
            .with_usage("Normal", 1, 1, Quality::Amber);
        let result = run(&mut fixture.store, 5, 1).unwrap();
        let ranked = rank(&result.listed, 5, 1);
        assert!((ranked[0].1 - ranked[1].1).abs() < 1e-9);
    }
}
