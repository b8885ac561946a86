//! Serving size strategy
//!
//! Rules, first hit wins:
//! 1. unit-qualified number inside the serving-size window
//! 2. split-digit repair on the bare numbers of that window
//! 3. the same two rules on each serving-size line paired with the next line
//!
//! The window starts at the serving-size phrase and ends at the
//! servings-per-pack phrase, or [`WINDOW_CHARS`] bytes later.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::chain::{first_match_indexed, Rule};
use super::lines::LabelLines;
use super::scanner::{all_numbers, floor_char_boundary, parse_number, NUMBER_PATTERN};
use super::units::{LabelUnit, Quantity};
use super::vocabulary::{find_any, SERVINGS_PER_PACK_PHRASES, SERVING_SIZE_PHRASES};

/// Window length when no servings-per-pack phrase closes it
pub const WINDOW_CHARS: usize = 200;

static SERVING_UNIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(gram|ml|g)\b").expect("serving unit pattern should be valid")
});

static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMBER_PATTERN).expect("number pattern should be valid"));

const RULES: [Rule<LabelLines, f64>; 3] = [window_with_unit, window_split_digits, paired_lines];

/// Serving size in grams (or ml), if the transcript states one
pub fn parse_serving_size<S: AsRef<str>>(lines: &[S]) -> Option<f64> {
    let input = LabelLines::new(lines, "\n");
    if input.is_empty() {
        return None;
    }
    let (rule, value) = first_match_indexed(&RULES, &input)?;
    debug!(rule, value, "serving size matched");
    Some(value)
}

/// Substring from the first serving-size phrase up to the servings-per-pack phrase
fn serving_window(text: &str) -> Option<&str> {
    let start = find_any(text, SERVING_SIZE_PHRASES, 0)?;
    let end = find_any(text, SERVINGS_PER_PACK_PHRASES, start)
        .unwrap_or_else(|| floor_char_boundary(text, start + WINDOW_CHARS));
    text.get(start..end)
}

fn window_with_unit(input: &LabelLines) -> Option<f64> {
    with_unit(serving_window(input.joined())?)
}

fn window_split_digits(input: &LabelLines) -> Option<f64> {
    split_digits(serving_window(input.joined())?)
}

fn paired_lines(input: &LabelLines) -> Option<f64> {
    input
        .matching(SERVING_SIZE_PHRASES)
        .map(|idx| input.with_next(idx))
        .find_map(|combo| with_unit(&combo).or_else(|| split_digits(&combo)))
}

/// First number followed by `g`, `gram` or `ml`, in grams
///
/// A lone digit preceded only by whitespace and another lone digit
/// (`"1 4 g"`) is a number OCR split in two and is joined back together.
fn with_unit(text: &str) -> Option<f64> {
    let caps = SERVING_UNIT_REGEX.captures(text)?;
    let number = caps.get(1)?;
    let value = parse_number(number.as_str())?;
    let unit = caps.get(2).and_then(|u| LabelUnit::from_str(u.as_str()));

    let value = match preceding_single_digit(&text[..number.start()]) {
        Some(tens) if is_single_digit(value) => join_digits(tens, value),
        _ => value,
    };
    positive(Quantity::new(value, unit).to_grams())
}

/// Rebuild a two-digit value OCR split into separate digits
///
/// Heuristic: a genuine `"1 g ... 5 g"` sequence with no unit between the
/// numbers reads as 15 as well.
fn split_digits(text: &str) -> Option<f64> {
    let nums = all_numbers(text);
    let first = *nums.first()?;

    let value = match nums.as_slice() {
        // "1 1 4 g": a doubled leading 1
        [a, b, c, ..] if *a == 1.0 && *b == 1.0 && *c < 10.0 => join_digits(*b, *c),
        // "1 4 g"
        [a, b, ..] if *a < 10.0 && *b < 10.0 => join_digits(*a, *b),
        _ if first >= 10.0 => first,
        _ => return None,
    };
    positive(value)
}

fn join_digits(tens: f64, ones: f64) -> f64 {
    (10 * tens as i64 + ones as i64) as f64
}

fn is_single_digit(value: f64) -> bool {
    value < 10.0 && value.fract() == 0.0
}

/// The single-digit number `prefix` ends with, followed only by whitespace
fn preceding_single_digit(prefix: &str) -> Option<f64> {
    let last = NUMBER_REGEX.find_iter(prefix).last()?;
    let gap = &prefix[last.end()..];
    let starts_token = prefix[..last.start()]
        .chars()
        .next_back()
        .map_or(true, |c| !c.is_ascii_digit());
    if !starts_token || gap.is_empty() || !gap.trim().is_empty() {
        return None;
    }
    parse_number(last.as_str()).filter(|v| is_single_digit(*v))
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}
