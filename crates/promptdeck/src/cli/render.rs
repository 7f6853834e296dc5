//! Terminal rendering.
//!
//! Every function here returns a `String` so the layout can be tested without
//! a terminal; handlers print the result. Width math is Unicode-aware.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use promptdeckapp::commands::tags::FacetCount;
use promptdeckapp::commands::{CmdMessage, MessageLevel};
use promptdeckapp::index::IndexStats;
use promptdeckapp::lint::{IssueLevel, LintReport};
use promptdeckapp::model::{Quality, Template};
use promptdeckapp::search::SearchHit;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 16;
pub const SHORT_ID_LEN: usize = 8;
pub const PIN_MARKER: &str = "⚲";
pub const FAVORITE_MARKER: &str = "★";
const QUALITY_MARKER: &str = "●";

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        println!("{}", style_message(message));
    }
}

fn style_message(message: &CmdMessage) -> ColoredString {
    match message.level {
        MessageLevel::Info => message.content.dimmed(),
        MessageLevel::Success => message.content.green(),
        MessageLevel::Warning => message.content.yellow(),
        MessageLevel::Error => message.content.red(),
    }
}

pub fn short_id(template: &Template) -> String {
    template.id.to_string().chars().take(SHORT_ID_LEN).collect()
}

fn quality_marker(quality: Quality) -> ColoredString {
    match quality {
        Quality::Green => QUALITY_MARKER.green(),
        Quality::Amber => QUALITY_MARKER.yellow(),
        Quality::Red => QUALITY_MARKER.red(),
    }
}

fn quality_label(quality: Quality) -> ColoredString {
    let label = quality.to_string();
    match quality {
        Quality::Green => label.green(),
        Quality::Amber => label.yellow(),
        Quality::Red => label.red(),
    }
}

/// One line per template, pinned ones first.
pub fn render_template_list(templates: &[Template]) -> String {
    if templates.is_empty() {
        return "No templates found.\n".to_string();
    }

    let (pinned, rest): (Vec<&Template>, Vec<&Template>) =
        templates.iter().partition(|t| t.pinned);

    let mut out = String::new();
    for t in &pinned {
        out.push_str(&render_row(t));
    }
    if !pinned.is_empty() && !rest.is_empty() {
        out.push('\n');
    }
    for t in &rest {
        out.push_str(&render_row(t));
    }
    out
}

/// Rows in the given order, for ranked results where pinning must not
/// reorder anything.
pub fn render_ranked_list(templates: &[Template]) -> String {
    if templates.is_empty() {
        return "No templates found.\n".to_string();
    }
    templates.iter().map(render_row).collect()
}

fn render_row(template: &Template) -> String {
    let left_prefix = if template.pinned {
        format!("  {} ", PIN_MARKER)
    } else {
        "    ".to_string()
    };
    let id = format!("{}  ", short_id(template));
    let right_suffix = if template.favorite {
        format!(" {} ", FAVORITE_MARKER)
    } else {
        "   ".to_string()
    };

    let summary = format!("{}  {}", template.name, template.subject);
    // One column for the quality marker, one for the gap before it.
    let fixed = left_prefix.width() + id.width() + right_suffix.width() + 2 + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let summary = truncate_to_width(&summary, available);
    let padding = available.saturating_sub(summary.width());

    let id = if template.pinned {
        id.yellow()
    } else {
        id.normal()
    };

    format!(
        "{}{}{}{}{}{} {}\n",
        left_prefix,
        id,
        summary,
        " ".repeat(padding),
        right_suffix,
        quality_marker(template.quality),
        format_time_ago(template.updated_at).dimmed()
    )
}

/// Every field of one template.
pub fn render_full_template(template: &Template) -> String {
    let mut out = format!("{} {}\n", short_id(template).yellow(), template.name.bold());
    out.push_str("--------------------------------\n");

    let fields = [
        ("subject", &template.subject),
        ("action", &template.action),
        ("environment", &template.environment),
        ("style", &template.style),
        ("lighting", &template.lighting),
        ("camera", &template.camera),
    ];
    for (label, value) in fields {
        if !value.is_empty() {
            out.push_str(&format!("{:<12} {}\n", label.dimmed(), value));
        }
    }

    out.push_str(&format!("{:<12} {}\n", "category".dimmed(), template.category));
    if !template.tags.is_empty() {
        out.push_str(&format!("{:<12} {}\n", "tags".dimmed(), template.tags.join(", ")));
    }
    out.push_str(&format!(
        "{:<12} {}\n",
        "quality".dimmed(),
        quality_label(template.quality)
    ));

    let mut flags = Vec::new();
    if template.pinned {
        flags.push("pinned");
    }
    if template.favorite {
        flags.push("favorite");
    }
    if !flags.is_empty() {
        out.push_str(&format!("{:<12} {}\n", "flags".dimmed(), flags.join(", ")));
    }

    out.push_str(&format!(
        "{:<12} {} uses, {} good renders\n",
        "usage".dimmed(),
        template.usage_count,
        template.render_success_count
    ));
    if let Some(parent) = &template.variant_of {
        let parent: String = parent.chars().take(12).collect();
        out.push_str(&format!("{:<12} {}\n", "variant of".dimmed(), parent));
    }
    out.push_str(&format!("{:<12} {}\n", "id".dimmed(), template.id));
    out.push_str(&format!(
        "{:<12} {}\n",
        "updated".dimmed(),
        format_time_ago(template.updated_at).trim()
    ));
    out
}

/// The prompt a template assembles to: the filled fields, comma separated.
pub fn render_prompt(template: &Template) -> String {
    let parts: Vec<&str> = template
        .prompt_fields()
        .into_iter()
        .filter(|f| !f.is_empty())
        .collect();
    format!("{}\n", parts.join(", "))
}

/// Search hits with their scores. `templates` is aligned with `hits`.
pub fn render_hits(hits: &[SearchHit], templates: &[Template]) -> String {
    let mut out = String::new();
    for (hit, template) in hits.iter().zip(templates) {
        let tags = if hit.tags.is_empty() {
            String::new()
        } else {
            format!("  #{}", hit.tags.join(" #"))
        };
        let line = format!(
            "{} {} {}  {} [{}]{}",
            format!("{:>5.2}", hit.score).cyan(),
            quality_marker(hit.quality),
            short_id(template).yellow(),
            hit.name,
            hit.category,
            tags.dimmed()
        );
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn render_lint_report(report: &LintReport) -> String {
    let mut out = format!("{} {}\n", quality_marker(report.quality), quality_label(report.quality));
    for issue in &report.issues {
        let marker = match issue.level {
            IssueLevel::Blocking => "✗".red(),
            IssueLevel::Warning => "!".yellow(),
        };
        out.push_str(&format!("  {} {}\n", marker, issue.message));
    }
    out
}

pub fn render_facets(title: &str, facets: &[FacetCount]) -> String {
    let mut out = format!("{}\n", title.bold());
    if facets.is_empty() {
        out.push_str(&format!("  {}\n", "none".dimmed()));
        return out;
    }
    let width = facets.iter().map(|f| f.name.width()).max().unwrap_or(0);
    for facet in facets {
        let padding = width.saturating_sub(facet.name.width());
        out.push_str(&format!(
            "  {}{}  {}\n",
            facet.name,
            " ".repeat(padding),
            facet.count.to_string().dimmed()
        ));
    }
    out
}

pub fn render_index_stats(stats: &IndexStats) -> String {
    format!(
        "Index: {} templates, {} terms, {} tags, {} categories\n",
        stats.entries, stats.terms, stats.tags, stats.categories
    )
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use promptdeckapp::model::TemplateDraft;
    use uuid::Uuid;

    fn template(name: &str, subject: &str) -> Template {
        Template {
            id: Uuid::new_v4(),
            signature: "ab".repeat(32),
            name: name.to_string(),
            subject: subject.to_string(),
            action: "walking".to_string(),
            environment: String::new(),
            style: "ink".to_string(),
            lighting: String::new(),
            camera: String::new(),
            category: "uncategorized".to_string(),
            tags: vec!["sea".to_string()],
            favorite: false,
            pinned: false,
            usage_count: 3,
            render_success_count: 2,
            last_used: None,
            created_at: Utc::now() - Duration::hours(2),
            updated_at: Utc::now() - Duration::hours(2),
            quality: Quality::Green,
            thumbnail: None,
            variant_of: None,
        }
    }

    #[test]
    fn truncation_respects_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("a much longer line of text", 10);
        assert!(cut.ends_with('…'));
        assert!(cut.width() <= 10);
        // Wide characters count double
        let cut = truncate_to_width("日本語のテキスト", 7);
        assert!(cut.width() <= 7);
    }

    #[test]
    fn empty_list_has_a_message() {
        assert_eq!(render_template_list(&[]), "No templates found.\n");
    }

    #[test]
    fn pinned_rows_come_first() {
        let plain = template("Plain", "a cat");
        let mut pinned = template("Pinned", "a dog");
        pinned.pinned = true;
        let out = render_template_list(&[plain, pinned]);
        let pinned_at = out.find("Pinned").unwrap();
        let plain_at = out.find("Plain").unwrap();
        assert!(pinned_at < plain_at);
        assert!(out.contains(PIN_MARKER));
    }

    #[test]
    fn ranked_list_keeps_ranking_order() {
        let winner = template("Winner", "a cat");
        let mut loser = template("Loser", "a dog");
        loser.pinned = true;
        let out = render_ranked_list(&[winner, loser]);
        let winner_at = out.find("Winner").unwrap();
        let loser_at = out.find("Loser").unwrap();
        assert!(winner_at < loser_at);
        assert!(out.contains(PIN_MARKER));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn variant_parent_is_cut_on_char_boundaries() {
        let mut t = template("Harbor", "a red boat");
        t.variant_of = Some("aéééééééééééééé".to_string());
        let out = render_full_template(&t);
        assert!(out.contains("aééééééééééé\n"));
    }

    #[test]
    fn row_shows_short_id_and_age() {
        let t = template("Harbor", "a red boat");
        let out = render_template_list(std::slice::from_ref(&t));
        assert!(out.contains(&short_id(&t)));
        assert!(out.contains("2 hours ago"));
        assert_eq!(out.lines().count(), 1);
    }

    #[test]
    fn full_view_skips_blank_fields() {
        let out = render_full_template(&template("Harbor", "a red boat"));
        assert!(out.contains("a red boat"));
        assert!(out.contains("walking"));
        assert!(!out.contains("lighting"));
        assert!(out.contains("3 uses, 2 good renders"));
    }

    #[test]
    fn prompt_joins_filled_fields() {
        let t = template("Harbor", "a red boat");
        assert_eq!(render_prompt(&t), "a red boat, walking, ink\n");
    }

    #[test]
    fn lint_report_lists_issues() {
        let report = promptdeckapp::lint::lint(&TemplateDraft::new("ab", ""));
        let out = render_lint_report(&report);
        assert!(out.contains("red"));
        assert!(out.contains("Subject is required"));
    }

    #[test]
    fn facets_are_aligned() {
        let facets = vec![
            FacetCount { name: "sea".into(), count: 2 },
            FacetCount { name: "boats".into(), count: 1 },
        ];
        let out = render_facets("Tags", &facets);
        assert!(out.contains("sea"));
        assert!(out.contains("boats"));
        assert_eq!(out.lines().count(), 3);
    }
}
