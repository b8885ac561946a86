//! Extracted nutrition record
//!
//! The closed output type of the extractor. Every numeric field is either
//! absent or a finite, non-negative value read from (or derived from) label text.

use serde::{Deserialize, Serialize};

/// Nutrition facts recovered from one label scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Transcript used for the global fallback path, passed through untouched
    pub raw_text: String,
    /// Never filled by the extractor; supplied by the user downstream
    pub product_name: Option<String>,
    pub serving_size_grams: Option<f64>,
    pub servings_per_pack: Option<u32>,
    pub sugar_per_serving_grams: Option<f64>,
    pub sugar_per_pack_grams: Option<f64>,
}

impl NutritionRecord {
    /// A record with no extracted fields
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// True when no numeric field could be extracted
    pub fn is_empty(&self) -> bool {
        self.serving_size_grams.is_none()
            && self.servings_per_pack.is_none()
            && self.sugar_per_serving_grams.is_none()
            && self.sugar_per_pack_grams.is_none()
    }

    /// Sugar per pack computed from per-serving sugar and a positive servings count
    ///
    /// None when the product overflows to infinity.
    pub fn derived_sugar_per_pack(&self) -> Option<f64> {
        match (self.sugar_per_serving_grams, self.servings_per_pack) {
            (Some(per_serving), Some(servings)) if servings > 0 => {
                Some(per_serving * f64::from(servings)).filter(|v| v.is_finite())
            }
            _ => None,
        }
    }
}

/// Where a field's value came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    /// Read from the region transcript cropped for this field
    Region,
    /// Read from the global (union) transcript
    Global,
    /// Computed from other fields
    Derived,
    /// Read from the sugar region by the plausible-value guess
    Guessed,
    #[default]
    Absent,
}

/// Per-field provenance of a [`NutritionRecord`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub serving_size: FieldSource,
    pub servings_per_pack: FieldSource,
    pub sugar_per_serving: FieldSource,
    pub sugar_per_pack: FieldSource,
}
