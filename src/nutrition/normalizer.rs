//! OCR transcript normalizer
//!
//! Canonicalizes raw label text before any field logic runs. The repairs
//! target one observed OCR failure: the unit letter `g` read as the digit `9`.
//! They are deliberately narrow and only ever rewrite in that direction.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// `<number> <lone 9>` at a token boundary on the same line
static LONE_NINE_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)[ \t]+9\b").expect("lone nine pattern should be valid"));

/// Serving-size phrase followed by a 2-3 digit number whose last digit is a misread `g`
static SERVING_SIZE_GLUED_NINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(takaran saji|serving size)\s*(\d{1,2})9\b")
        .expect("serving size repair pattern should be valid")
});

/// A unit already printed after a number
static LEADING_UNIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:g|gr|gram|mg|ml)\b").expect("unit pattern should be valid"));

static SLASH_PER_PACK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(sajian|porsi)\s*/\s*kemasan|(servings|portions)\s*/\s*pack")
        .expect("slash phrase pattern should be valid")
});

/// Normalize a raw OCR transcript
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let repaired = repair_lone_nine(&lowered);
    let repaired = repair_serving_size_nine(&repaired);
    unify_phrases(&repaired).into_owned()
}

/// `"7 9"` -> `"7 g"`
fn repair_lone_nine(text: &str) -> Cow<'_, str> {
    LONE_NINE_UNIT.replace_all(text, "$1 g")
}

/// `"takaran saji 209"` -> `"takaran saji 20 g"`
///
/// A number that already carries a unit is left alone, otherwise a genuine
/// `"19 g"` would lose its last digit.
fn repair_serving_size_nine(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    let mut last = 0;

    for caps in SERVING_SIZE_GLUED_NINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if LEADING_UNIT.is_match(&text[whole.end()..]) {
            continue;
        }
        out.push_str(&text[last..whole.start()]);
        out.push_str(&serving_size_replacement(&caps));
        last = whole.end();
    }

    out.push_str(&text[last..]);
    out
}

fn serving_size_replacement(caps: &Captures<'_>) -> String {
    format!("{} {} g", &caps[1], &caps[2])
}

/// `"sajian/kemasan"` -> `"sajian per kemasan"`
fn unify_phrases(text: &str) -> Cow<'_, str> {
    SLASH_PER_PACK.replace_all(text, |caps: &Captures<'_>| {
        match (caps.get(1), caps.get(2)) {
            (Some(word), _) => format!("{} per kemasan", word.as_str()),
            (None, Some(word)) => format!("{} per pack", word.as_str()),
            (None, None) => caps[0].to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n\n"), "\n\n");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize("Gula Total 5 g"), "gula total 5 g");
    }

    #[test]
    fn test_lone_nine_becomes_gram() {
        assert_eq!(normalize("lemak total 7 9"), "lemak total 7 g");
        assert_eq!(normalize("protein 11 9\n"), "protein 11 g\n");
    }

    #[test]
    fn test_nine_on_next_line_is_a_count() {
        assert_eq!(
            normalize("gula total 12\n9 sajian per kemasan"),
            "gula total 12\n9 sajian per kemasan"
        );
    }

    #[test]
    fn test_nine_inside_number_untouched() {
        assert_eq!(normalize("natrium 95 mg"), "natrium 95 mg");
        assert_eq!(normalize("energi 7 99 kkal"), "energi 7 99 kkal");
    }

    #[test]
    fn test_serving_size_glued_nine() {
        assert_eq!(normalize("Takaran Saji 209"), "takaran saji 20 g");
        assert_eq!(normalize("serving size 159"), "serving size 15 g");
        assert_eq!(normalize("takaran saji19"), "takaran saji 1 g");
    }

    #[test]
    fn test_serving_size_single_digit_untouched() {
        assert_eq!(normalize("takaran saji 9"), "takaran saji 9");
    }

    #[test]
    fn test_serving_size_with_unit_untouched() {
        assert_eq!(normalize("takaran saji 19 g"), "takaran saji 19 g");
        assert_eq!(normalize("serving size 29ml"), "serving size 29ml");
    }

    #[test]
    fn test_slash_phrase_unified() {
        assert_eq!(normalize("4 Sajian / Kemasan"), "4 sajian per kemasan");
        assert_eq!(normalize("3 porsi/kemasan"), "3 porsi per kemasan");
        assert_eq!(normalize("2 servings/pack"), "2 servings per pack");
        assert_eq!(normalize("5 Portions / Pack"), "5 portions per pack");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "INFORMASI NILAI GIZI\nTakaran saji 209\n4 Sajian/Kemasan",
            "gula 7 9 9 9",
            "takaran saji 299 9",
            "Serving Size 1 4 g\nSugar 500 mg",
            "natrium 95 mg garam 9",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
