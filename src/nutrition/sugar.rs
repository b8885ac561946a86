//! Sugar strategies
//!
//! Per-serving sugar is searched around the sugar keyword; per-pack sugar is
//! only taken when the label states it outright, which is rare.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use super::chain::{first_match_indexed, Rule};
use super::lines::LabelLines;
use super::scanner::{all_numbers, floor_char_boundary, parse_number, unit_quantities};
use super::units::{LabelUnit, Quantity};
use super::vocabulary::{contains_any, find_any, SALT_KEYWORDS, SUGAR_KEYWORDS, SUGAR_PER_PACK_PHRASES};

/// Longest run of non-digit text allowed between the keyword and its value
pub const SUGAR_WINDOW_CHARS: usize = 80;

/// Upper bound (exclusive) for a plausible per-serving sugar guess
pub const PLAUSIBLE_SUGAR_MAX: f64 = 60.0;

static SUGAR_TOTAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?:gula|sugars?)\s+total[^\d]{{0,{}}}(\d+(?:[.,]\d+)?)\s*(?:(mg|gram|g)\b)?",
        SUGAR_WINDOW_CHARS
    ))
    .expect("sugar total pattern should be valid")
});

static SUGAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(?:gula|sugars?)\b[^\d]{{0,{}}}(\d+(?:[.,]\d+)?)\s*(?:(mg|gram|g)\b)?",
        SUGAR_WINDOW_CHARS
    ))
    .expect("sugar pattern should be valid")
});

static SUGAR_PER_PACK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:gula total per kemasan|total gula per kemasan|total sugar per pack|sugar total per pack)[^\d]{0,20}(\d+(?:[.,]\d+)?)\s*(?:(mg|gram|g)\b)?",
    )
    .expect("sugar per pack pattern should be valid")
});

const PER_SERVING_RULES: [Rule<LabelLines, f64>; 4] =
    [sugar_total_window, sugar_window, keyword_lines_with_unit, keyword_lines_bare];

/// Sugar per serving in grams
pub fn parse_sugar_per_serving<S: AsRef<str>>(lines: &[S]) -> Option<f64> {
    let input = LabelLines::new(lines, "\n");
    if input.is_empty() {
        return None;
    }
    let (rule, grams) = first_match_indexed(&PER_SERVING_RULES, &input)?;
    debug!(rule, grams, "sugar per serving matched");
    Some(grams)
}

/// Sugar per pack in grams, only when a line states it explicitly
pub fn parse_sugar_per_pack<S: AsRef<str>>(lines: &[S]) -> Option<f64> {
    let input = LabelLines::new(lines, "\n");
    let grams = input
        .lines()
        .iter()
        .filter_map(|line| SUGAR_PER_PACK_REGEX.captures(line))
        .find_map(|caps| quantity_from(&caps))
        .and_then(|q| non_negative(q.to_grams()))?;
    debug!(grams, "sugar per pack matched");
    Some(grams)
}

/// Largest number in `(0, 60)` grams; the last resort for a sugar crop
/// that OCR'd without its keyword
pub fn plausible_sugar_guess(text: &str) -> Option<f64> {
    all_numbers(text)
        .into_iter()
        .filter(|v| *v > 0.0 && *v < PLAUSIBLE_SUGAR_MAX)
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v))))
}

fn sugar_total_window(input: &LabelLines) -> Option<f64> {
    keyword_window(&SUGAR_TOTAL_REGEX, input.joined())
}

fn sugar_window(input: &LabelLines) -> Option<f64> {
    keyword_window(&SUGAR_REGEX, input.joined())
}

/// First keyword match whose value belongs to sugar
///
/// The value is rejected when a salt keyword sits between the keyword and the
/// number, or when the keyword is part of an explicit per-pack phrase.
fn keyword_window(regex: &Regex, text: &str) -> Option<f64> {
    regex.captures_iter(text).find_map(|caps| {
        let whole = caps.get(0)?;
        let number = caps.get(1)?;
        let gap = &text[whole.start()..number.start()];
        if contains_any(gap, SALT_KEYWORDS) {
            return None;
        }
        let context_start = floor_char_boundary(text, whole.start().saturating_sub(6));
        if contains_any(&text[context_start..number.start()], SUGAR_PER_PACK_PHRASES) {
            return None;
        }
        non_negative(quantity_from(&caps)?.to_grams())
    })
}

/// Last unit-qualified number on a sugar line and the line below it
///
/// Tables print the per-100 g value before the per-serving one, hence last.
fn keyword_lines_with_unit(input: &LabelLines) -> Option<f64> {
    input.matching(SUGAR_KEYWORDS).find_map(|idx| {
        let combo = input.with_next(idx);
        let scope = sugar_scope(&combo)?;
        unit_quantities(scope)
            .last()
            .and_then(|q| non_negative(q.to_grams()))
    })
}

/// First bare number on a sugar line; lines mentioning salt are skipped so a
/// sodium value is never read as sugar
fn keyword_lines_bare(input: &LabelLines) -> Option<f64> {
    input.matching(SUGAR_KEYWORDS).find_map(|idx| {
        let combo = input.with_next(idx);
        if contains_any(&combo, SALT_KEYWORDS) {
            return None;
        }
        let scope = sugar_scope(&combo)?;
        all_numbers(scope).first().copied().and_then(non_negative)
    })
}

/// Text from the sugar keyword up to the next salt keyword
fn sugar_scope(combo: &str) -> Option<&str> {
    let start = find_any(combo, SUGAR_KEYWORDS, 0)?;
    let scope = &combo[start..];
    Some(match find_any(scope, SALT_KEYWORDS, 0) {
        Some(end) => &scope[..end],
        None => scope,
    })
}

fn quantity_from(caps: &Captures<'_>) -> Option<Quantity> {
    let value = parse_number(caps.get(1)?.as_str())?;
    let unit = caps.get(2).and_then(|u| LabelUnit::from_str(u.as_str()));
    Some(Quantity::new(value, unit))
}

fn non_negative(grams: f64) -> Option<f64> {
    (grams.is_finite() && grams >= 0.0).then_some(grams)
}
