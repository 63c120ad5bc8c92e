//! Naive cyclomatic complexity over raw source text.
//!
//! The score is `1 + number of decision points`, where decision points are
//! literal token matches anywhere in the text. There is no lexing: tokens
//! inside string literals and comments are counted too. That overcount is a
//! known limitation of the heuristic and is kept as is.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::ComplexityLevel;

/// Decision-point patterns, in the order they are reported by [`breakdown`].
const DECISION_POINTS: &[(&str, &str)] = &[
    ("if", r"\bif\b"),
    ("else", r"\belse\b"),
    ("while", r"\bwhile\b"),
    ("for", r"\bfor\b"),
    ("case", r"\bcase\b"),
    ("catch", r"\bcatch\b"),
    ("&&", r"&&"),
    ("||", r"\|\|"),
    ("?", r"\?"),
];

fn patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DECISION_POINTS
            .iter()
            .map(|(name, pattern)| {
                (
                    *name,
                    Regex::new(pattern).expect("decision-point patterns are valid regexes"),
                )
            })
            .collect()
    })
}

/// Per-token occurrence counts, non-overlapping, in declaration order.
pub fn breakdown(text: &str) -> Vec<(&'static str, u32)> {
    patterns()
        .iter()
        .map(|(name, re)| (*name, re.find_iter(text).count() as u32))
        .collect()
}

/// Estimates the complexity score of `text`. Always at least 1.
pub fn estimate(text: &str) -> u32 {
    breakdown(text)
        .iter()
        .fold(1u32, |score, (_, count)| score.saturating_add(*count))
}

/// Estimates the score and maps it to its severity band.
pub fn assess(text: &str) -> (u32, ComplexityLevel) {
    let score = estimate(text);
    (score, ComplexityLevel::from_score(score))
}
