//! Servings-per-pack strategy

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::chain::{first_match_indexed, Rule};
use super::lines::LabelLines;
use super::scanner::{all_numbers, parse_number};
use super::vocabulary::SERVINGS_PER_PACK_KEYWORDS;

/// Number immediately before a servings-per-pack phrase
static SERVINGS_PHRASE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+(?:[.,]\d+)?)\s*(?:sajian\s*(?:per|/)?\s*kemasan|servings\s*(?:per|/)\s*pack|porsi\s*(?:per|/)?\s*kemasan|portions\s*(?:per|/)\s*pack)",
    )
    .expect("servings per pack pattern should be valid")
});

const RULES: [Rule<LabelLines, u32>; 2] = [number_before_phrase, keyword_line];

/// Number of servings in the pack, rounded to the nearest whole serving
pub fn parse_servings_per_pack<S: AsRef<str>>(lines: &[S]) -> Option<u32> {
    let input = LabelLines::new(lines, " ");
    if input.is_empty() {
        return None;
    }
    let (rule, servings) = first_match_indexed(&RULES, &input)?;
    debug!(rule, servings, "servings per pack matched");
    Some(servings)
}

fn number_before_phrase(input: &LabelLines) -> Option<u32> {
    let caps = SERVINGS_PHRASE_REGEX.captures(input.joined())?;
    round_servings(parse_number(caps.get(1)?.as_str())?)
}

/// First number on a line carrying both halves of the phrase
fn keyword_line(input: &LabelLines) -> Option<u32> {
    input
        .lines()
        .iter()
        .filter(|line| {
            SERVINGS_PER_PACK_KEYWORDS
                .iter()
                .any(|(a, b)| line.contains(a) && line.contains(b))
        })
        .find_map(|line| all_numbers(line).first().copied().and_then(round_servings))
}

/// Round half away from zero; a pack holds at least one serving
fn round_servings(value: f64) -> Option<u32> {
    let rounded = value.round();
    (rounded >= 1.0 && rounded <= f64::from(u32::MAX)).then(|| rounded as u32)
}
