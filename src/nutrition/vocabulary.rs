//! Keyword tables
//!
//! Indonesian label wording first, English equivalents after. All entries are
//! lower case; matching always happens on lower-cased text.

pub const SERVING_SIZE_PHRASES: &[&str] = &["takaran saji", "serving size"];

pub const SERVINGS_PER_PACK_PHRASES: &[&str] = &[
    "sajian per kemasan",
    "servings per pack",
    "porsi per kemasan",
    "portions per pack",
];

/// Keyword pairs that mark a servings-per-pack line when both appear
pub const SERVINGS_PER_PACK_KEYWORDS: &[(&str, &str)] = &[
    ("sajian", "kemasan"),
    ("servings", "pack"),
    ("porsi", "kemasan"),
    ("portions", "pack"),
];

pub const SUGAR_KEYWORDS: &[&str] = &["gula", "sugar"];

pub const SALT_KEYWORDS: &[&str] = &["natrium", "garam", "sodium", "salt"];

pub const SUGAR_PER_PACK_PHRASES: &[&str] = &[
    "gula total per kemasan",
    "total gula per kemasan",
    "total sugar per pack",
    "sugar total per pack",
];

/// Byte offset of the earliest occurrence of any phrase at or after `from`
pub fn find_any(text: &str, phrases: &[&str], from: usize) -> Option<usize> {
    let tail = text.get(from..)?;
    phrases
        .iter()
        .filter_map(|p| tail.find(p))
        .min()
        .map(|idx| idx + from)
}

pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_any_returns_earliest() {
        let text = "serving size 10 g takaran saji 20 g";
        assert_eq!(find_any(text, SERVING_SIZE_PHRASES, 0), Some(0));
        assert_eq!(find_any(text, SERVING_SIZE_PHRASES, 1), Some(18));
        assert_eq!(find_any(text, SERVING_SIZE_PHRASES, 100), None);
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("natrium 120 mg", SALT_KEYWORDS));
        assert!(!contains_any("gula 5 g", SALT_KEYWORDS));
    }
}
