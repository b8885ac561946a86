//! Label units and conversion constants
//!
//! Nutrition labels only print a handful of units next to the values this
//! crate extracts. Everything is normalized to grams.

use serde::{Deserialize, Serialize};

/// Unit printed next to a label value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelUnit {
    Gram,
    Milligram,
    /// Liquid serving sizes; taken 1:1 as grams
    Milliliter,
}

impl LabelUnit {
    /// Parse a unit token as it appears after a number
    pub fn from_str(s: &str) -> Option<Self> {
        let lower = s.to_lowercase();
        match lower.trim() {
            "g" | "gr" | "gram" | "grams" => Some(LabelUnit::Gram),
            "mg" | "milligram" | "milligrams" => Some(LabelUnit::Milligram),
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => {
                Some(LabelUnit::Milliliter)
            }
            _ => None,
        }
    }

    /// Conversion factor to grams
    pub fn grams_per_unit(&self) -> f64 {
        match self {
            LabelUnit::Gram => 1.0,
            LabelUnit::Milligram => G_PER_MG,
            LabelUnit::Milliliter => G_PER_ML,
        }
    }

    /// Convert a value in this unit to grams
    pub fn to_grams(&self, value: f64) -> f64 {
        match self {
            LabelUnit::Milligram => value / MG_PER_G,
            _ => value * self.grams_per_unit(),
        }
    }
}

/// Grams per milligram
pub const G_PER_MG: f64 = 0.001;
/// Milligrams per gram
pub const MG_PER_G: f64 = 1000.0;
/// Grams per milliliter (water density; labels rarely print anything else)
pub const G_PER_ML: f64 = 1.0;

/// A number read from a label, with the unit printed after it if any
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: Option<LabelUnit>,
}

impl Quantity {
    pub fn new(value: f64, unit: Option<LabelUnit>) -> Self {
        Self { value, unit }
    }

    /// Value in grams; a bare number is assumed to already be grams
    pub fn to_grams(&self) -> f64 {
        match self.unit {
            Some(unit) => unit.to_grams(self.value),
            None => self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(LabelUnit::from_str("g"), Some(LabelUnit::Gram));
        assert_eq!(LabelUnit::from_str("Gram"), Some(LabelUnit::Gram));
        assert_eq!(LabelUnit::from_str("mg"), Some(LabelUnit::Milligram));
        assert_eq!(LabelUnit::from_str(" ml "), Some(LabelUnit::Milliliter));
        assert_eq!(LabelUnit::from_str("kkal"), None);
    }

    #[test]
    fn test_unit_to_grams() {
        assert_eq!(LabelUnit::Gram.to_grams(12.0), 12.0);
        assert_eq!(LabelUnit::Milliliter.to_grams(200.0), 200.0);
        assert!((LabelUnit::Milligram.to_grams(500.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_quantity_bare_number_is_grams() {
        assert_eq!(Quantity::new(9.0, None).to_grams(), 9.0);
        let q = Quantity::new(250.0, Some(LabelUnit::Milligram));
        assert!((q.to_grams() - 0.25).abs() < 1e-9);
    }
}
