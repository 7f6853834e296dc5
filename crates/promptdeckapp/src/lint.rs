//! Template linter.
//!
//! [`lint`] checks a draft against a fixed rule set and grades it:
//!
//! | Rule | Level |
//! |------|-------|
//! | `name` is 3–60 chars (trimmed) | blocking |
//! | `subject` is non-empty and at most 300 chars (trimmed) | blocking |
//! | at least 4 of the 6 prompt fields are filled | blocking |
//! | no contradictory lighting phrases | blocking |
//! | no doubled intensifiers ("very very") | warning |
//!
//! Grade is RED if any blocking issue fired, AMBER if only warnings fired,
//! GREEN otherwise. Linting is pure and never fails: invalid input produces a
//! report, not an error. Whether a RED grade blocks a save is up to the caller.

use serde::Serialize;

use crate::model::{Quality, TemplateDraft};

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 60;
pub const SUBJECT_MAX_CHARS: usize = 300;
pub const MIN_FILLED_FIELDS: usize = 4;

/// Phrase pairs that cannot describe the same lighting setup.
const CONTRADICTIONS: &[(&str, &str)] = &[
    ("soft studio lighting", "high contrast"),
    ("flat lighting", "chiaroscuro"),
    ("overexposed", "underexposed"),
];

const INTENSIFIERS: &[&str] = &[
    "very",
    "ultra",
    "super",
    "extremely",
    "highly",
    "really",
    "hyper",
    "incredibly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    /// Forces a RED grade.
    Blocking,
    /// Forces at most an AMBER grade.
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    pub level: IssueLevel,
    pub message: String,
}

impl LintIssue {
    fn blocking(message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Blocking,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    /// `true` unless the grade is RED.
    pub ok: bool,
    pub issues: Vec<LintIssue>,
    pub quality: Quality,
}

impl LintReport {
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.message.clone()).collect()
    }
}

pub fn lint(draft: &TemplateDraft) -> LintReport {
    let mut issues = Vec::new();

    let name_len = draft.name.trim().chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
        issues.push(LintIssue::blocking(format!(
            "Name must be {}-{} characters (got {})",
            NAME_MIN_CHARS, NAME_MAX_CHARS, name_len
        )));
    }

    let subject_len = draft.subject.trim().chars().count();
    if subject_len == 0 {
        issues.push(LintIssue::blocking("Subject is required"));
    } else if subject_len > SUBJECT_MAX_CHARS {
        issues.push(LintIssue::blocking(format!(
            "Subject must be at most {} characters (got {})",
            SUBJECT_MAX_CHARS, subject_len
        )));
    }

    let filled = draft
        .prompt_fields()
        .iter()
        .filter(|f| !f.trim().is_empty())
        .count();
    if filled < MIN_FILLED_FIELDS {
        issues.push(LintIssue::blocking(format!(
            "Fill at least {} of the 6 prompt fields (got {})",
            MIN_FILLED_FIELDS, filled
        )));
    }

    let text = draft.prompt_fields().join(" ").to_lowercase();
    for (a, b) in CONTRADICTIONS {
        if text.contains(a) && text.contains(b) {
            issues.push(LintIssue::blocking(format!(
                "Contradictory lighting: \"{}\" with \"{}\"",
                a, b
            )));
        }
    }

    for word in doubled_intensifiers(&text) {
        issues.push(LintIssue::warning(format!(
            "Redundant intensifier: \"{} {}\"",
            word, word
        )));
    }

    let quality = if issues.iter().any(|i| i.level == IssueLevel::Blocking) {
        Quality::Red
    } else if !issues.is_empty() {
        Quality::Amber
    } else {
        Quality::Green
    };

    LintReport {
        ok: quality != Quality::Red,
        issues,
        quality,
    }
}

/// Intensifiers that appear twice in a row, each reported once.
fn doubled_intensifiers(text: &str) -> Vec<String> {
    let words: Vec<&str> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mut found: Vec<String> = Vec::new();
    for pair in words.windows(2) {
        if pair[0] == pair[1]
            && INTENSIFIERS.contains(&pair[0])
            && !found.iter().any(|f| f == pair[0])
        {
            found.push(pair[0].to_string());
        }
    }
    found
}
