//! Free-text age and children-count sanitizing, including the two-pass
//! excursion correction for children counts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::Age;

static FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+").unwrap());

/// Whole-field negations ("nenhum", "none", "zero", ...).
static NEGATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)^(?:
            nenhum | nenhuma | nenhuns | nehum | nemhum |
            n[aã]o | n[aã]o\s+tem | sem | sem\s+crian[cç]as? |
            zero | none | no | nope | nil | nothing | -
        )\.?$",
    )
    .unwrap()
});

/// Spelled-out small counts, pt-BR and English.
const NUMBER_WORDS: &[(&str, u64)] = &[
    ("um", 1),
    ("uma", 1),
    ("one", 1),
    ("dois", 2),
    ("duas", 2),
    ("two", 2),
    ("tres", 3),
    ("três", 3),
    ("three", 3),
    ("quatro", 4),
    ("four", 4),
    ("cinco", 5),
    ("five", 5),
    ("seis", 6),
    ("six", 6),
];

fn first_integer(text: &str) -> Option<i64> {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Extracts an age in `[min, max]` from text such as `"42 anos"`.
pub fn parse_age(text: &str, min: u8, max: u8) -> Age {
    match first_integer(text) {
        Some(n) if n >= i64::from(min) && n <= i64::from(max) => Age::Known(n as u8),
        _ => Age::Unknown,
    }
}

/// A children-count field before excursion correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildrenField {
    /// A number was written (negations count as 0).
    Stated(u64),
    /// Empty or unreadable; becomes 0 after correction.
    Unstated,
}

pub fn parse_children(text: &str) -> ChildrenField {
    let s = text.trim();
    if s.is_empty() {
        return ChildrenField::Unstated;
    }
    if NEGATION.is_match(s) {
        return ChildrenField::Stated(0);
    }
    if let Some(n) = first_integer(s) {
        return ChildrenField::Stated(n.max(0) as u64);
    }
    let lowered = s.to_lowercase();
    let first_word = lowered
        .split(|c: char| !c.is_alphanumeric())
        .find(|w| !w.is_empty())
        .unwrap_or("");
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == first_word)
        .map(|(_, n)| ChildrenField::Stated(*n))
        .unwrap_or(ChildrenField::Unstated)
}

/// Pass 1 of the excursion correction: the rounded mean of every stated
/// count at or below `threshold`. Returns 0 when no count qualifies.
///
/// Rounds half to even, so a mean of 2.5 yields 2.
pub fn excursion_replacement(fields: &[ChildrenField], threshold: u32) -> u32 {
    let compliant: Vec<f64> = fields
        .iter()
        .filter_map(|f| match f {
            ChildrenField::Stated(n) if *n <= u64::from(threshold) => Some(*n as f64),
            _ => None,
        })
        .collect();

    if compliant.is_empty() {
        return 0;
    }
    let mean = compliant.iter().sum::<f64>() / compliant.len() as f64;
    if !mean.is_finite() {
        return 0;
    }
    mean.round_ties_even() as u32
}

/// Pass 2 of the excursion correction, applied to one field.
///
/// Returns the sanitized count and whether it was replaced.
pub fn correct_children(field: ChildrenField, threshold: u32, replacement: u32) -> (u32, bool) {
    match field {
        ChildrenField::Unstated => (0, false),
        ChildrenField::Stated(n) if n > u64::from(threshold) => (replacement, true),
        ChildrenField::Stated(n) => (n as u32, false),
    }
}

/// Result of running both passes over a full population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcursionCorrection {
    pub replacement: u32,
    pub corrected: usize,
    pub counts: Vec<(u32, bool)>,
}

/// Runs the two-pass correction. The replacement is fixed from the whole
/// population before any single field is corrected.
pub fn sanitize_children(fields: &[ChildrenField], threshold: u32) -> ExcursionCorrection {
    let replacement = excursion_replacement(fields, threshold);
    let counts: Vec<(u32, bool)> = fields
        .iter()
        .map(|f| correct_children(*f, threshold, replacement))
        .collect();
    let corrected = counts.iter().filter(|(_, c)| *c).count();
    ExcursionCorrection {
        replacement,
        corrected,
        counts,
    }
}
