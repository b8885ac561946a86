//! Numeric token scanner
//!
//! Pulls numbers out of OCR text. Both '.' and ',' are accepted as the
//! decimal separator.

use once_cell::sync::Lazy;
use regex::Regex;

use super::units::{LabelUnit, Quantity};

/// A number with an optional decimal fraction
pub const NUMBER_PATTERN: &str = r"\d+(?:[.,]\d+)?";

static NUMBER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMBER_PATTERN).expect("number pattern should be valid"));

/// Number followed by a weight unit. `mg` is listed before `g` so the longer
/// token wins; the trailing word boundary stops `g` from eating `garam`.
static UNIT_NUMBER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*(mg|gram|g)\b").expect("unit number pattern should be valid")
});

/// Parse a number token, accepting ',' as decimal separator
pub fn parse_number(token: &str) -> Option<f64> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// All numbers in `text`, left to right
pub fn all_numbers(text: &str) -> Vec<f64> {
    NUMBER_REGEX
        .find_iter(text)
        .filter_map(|m| parse_number(m.as_str()))
        .collect()
}

/// All numbers directly followed by a weight unit (`g`, `gram`, `mg`), left to right
pub fn unit_quantities(text: &str) -> Vec<Quantity> {
    UNIT_NUMBER_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let value = parse_number(caps.get(1)?.as_str())?;
            let unit = caps.get(2).and_then(|u| LabelUnit::from_str(u.as_str()));
            Some(Quantity::new(value, unit))
        })
        .collect()
}

/// Largest byte index `<= idx` that lies on a char boundary of `text`
pub fn floor_char_boundary(text: &str, idx: usize) -> usize {
    if idx >= text.len() {
        return text.len();
    }
    let mut i = idx;
    while !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
